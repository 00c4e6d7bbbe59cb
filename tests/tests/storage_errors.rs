use keyset::FieldSelection;
use tests::{assert_err, fixtures::page_of, Fixture};

#[tokio::test]
async fn driver_errors_pass_through() {
    let fixture = Fixture::new();
    fixture.memory.fail_next("disk on fire");

    let err = assert_err!(
        fixture
            .planner
            .connection("Todo", &page_of("todos", ["title"]))
            .await
    );

    assert!(err.is_driver());
    assert!(err.to_string().contains("disk on fire"), "{err}");

    // The failure is not sticky
    let result = fixture
        .planner
        .connection("Todo", &page_of("todos", ["title"]))
        .await
        .unwrap();
    assert_eq!(result.edges.len(), 5);
}

#[tokio::test]
async fn nested_load_errors_fail_the_whole_request() {
    let fixture = Fixture::new();

    let selection = FieldSelection::new("users").select(
        FieldSelection::new("edges").select(
            FieldSelection::new("node").select(page_of("todos", ["title"]).argument("first", 1)),
        ),
    );

    fixture.memory.fail_next_on("todos", "replica lost");

    let err = assert_err!(fixture.planner.connection("User", &selection).await);
    assert!(err.is_driver());
    assert!(err.to_string().contains("replica lost"), "{err}");

    let users = fixture
        .planner
        .connection("User", &selection)
        .await
        .unwrap();
    assert_eq!(users.edges.len(), 3);
}

#[tokio::test]
async fn unknown_entity() {
    let fixture = Fixture::new();

    let err = assert_err!(
        fixture
            .planner
            .connection("Widget", &page_of("widgets", ["id"]))
            .await
    );
    assert!(!err.is_driver());
}
