use keyset::FieldSelection;
use keyset_core::stmt::Value;
use pretty_assertions::assert_eq;
use tests::{assert_err, fixtures::ids, Fixture};

#[tokio::test]
async fn looks_up_nodes_in_request_order() {
    let mut fixture = Fixture::new();

    let selection = FieldSelection::new("nodes").select_all(["title"]);
    let nodes = fixture
        .planner
        .nodes("Todo", &ids([3, 99, 1]), &selection)
        .await
        .unwrap();

    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].as_ref().unwrap().id, Value::I64(3));
    assert_eq!(
        nodes[0].as_ref().unwrap().get("title"),
        Some(&Value::from("todo 3"))
    );
    assert!(nodes[1].is_none());
    assert_eq!(nodes[2].as_ref().unwrap().id, Value::I64(1));

    assert_eq!(fixture.log().len(), 1);
}

#[tokio::test]
async fn nodes_load_their_edges() {
    let fixture = Fixture::new();

    let selection = FieldSelection::new("node").select(
        FieldSelection::new("todos")
            .argument("first", 1)
            .select(FieldSelection::new("totalCount"))
            .select(FieldSelection::new("edges").select(FieldSelection::new("cursor"))),
    );

    let nodes = fixture
        .planner
        .nodes("User", &ids([2]), &selection)
        .await
        .unwrap();

    let bob = nodes[0].as_ref().unwrap();
    let todos = bob.connection("todos").unwrap();
    assert_eq!(todos.edges.len(), 1);
    assert!(todos.edges[0].node.is_none());
    assert_eq!(todos.total_count, Some(1));
}

#[tokio::test]
async fn no_ids_no_queries() {
    let mut fixture = Fixture::new();

    let selection = FieldSelection::new("nodes").select_all(["title"]);
    let nodes = fixture
        .planner
        .nodes("Todo", &[], &selection)
        .await
        .unwrap();

    assert!(nodes.is_empty());
    assert!(fixture.log().is_empty());
}

#[tokio::test]
async fn ids_of_the_wrong_type_are_rejected() {
    let mut fixture = Fixture::new();

    let selection = FieldSelection::new("nodes").select_all(["title"]);
    let err = assert_err!(
        fixture
            .planner
            .nodes("Todo", &[Value::I64(1), Value::from("1")], &selection)
            .await
    );

    assert!(err.is_invalid_argument());
    assert!(fixture.log().is_empty());
}
