use keyset::{FieldSelection, Planner};
use pretty_assertions::assert_eq;
use tests::{
    fixtures::{by_priority_desc, page_of},
    Fixture,
};

#[tokio::test]
async fn total_count_alone_transfers_no_rows() {
    let mut fixture = Fixture::new();

    let selection = FieldSelection::new("todos").select(FieldSelection::new("totalCount"));
    let result = fixture
        .planner
        .connection("Todo", &selection)
        .await
        .unwrap();

    assert_eq!(result.total_count, Some(5));
    assert!(result.edges.is_empty());

    let log = fixture.log();
    assert_eq!(log.len(), 1);
    assert_eq!(log.count_queries("todos"), 1);
}

#[tokio::test]
async fn page_info_without_edges() {
    let mut fixture = Fixture::new();

    let selection = FieldSelection::new("todos")
        .argument("first", 2)
        .select(FieldSelection::new("pageInfo").select_all(["hasNextPage", "hasPreviousPage"]));

    let result = fixture
        .planner
        .connection("Todo", &selection)
        .await
        .unwrap();

    assert!(result.page_info.has_next_page);
    assert!(!result.page_info.has_previous_page);
    assert_eq!(result.total_count, None);
    assert_eq!(fixture.log().row_queries("todos"), 0);
}

#[tokio::test]
async fn page_info_without_edges_counts_between_cursors() {
    let fixture = Fixture::new();

    let first = fixture
        .planner
        .connection(
            "Todo",
            &page_of("todos", ["title"])
                .argument("first", 3)
                .argument("orderBy", by_priority_desc()),
        )
        .await
        .unwrap();
    let after = first.page_info.end_cursor.clone().unwrap();

    let counts_only = |first: i64| {
        FieldSelection::new("todos")
            .argument("first", first)
            .argument("after", after.clone())
            .argument("orderBy", by_priority_desc())
            .select(FieldSelection::new("totalCount"))
            .select(FieldSelection::new("pageInfo").select_all(["hasNextPage"]))
    };

    // Two todos remain after the third
    let result = fixture
        .planner
        .connection("Todo", &counts_only(1))
        .await
        .unwrap();
    assert!(result.page_info.has_next_page);
    assert!(result.page_info.has_previous_page);
    assert_eq!(result.total_count, Some(5));

    let result = fixture
        .planner
        .connection("Todo", &counts_only(2))
        .await
        .unwrap();
    assert!(!result.page_info.has_next_page);
}

#[tokio::test]
async fn total_count_ignores_the_page_window() {
    let mut fixture = Fixture::new();

    let selection = page_of("todos", ["title"])
        .argument("first", 2)
        .select(FieldSelection::new("totalCount"));

    let result = fixture
        .planner
        .connection("Todo", &selection)
        .await
        .unwrap();

    assert_eq!(result.edges.len(), 2);
    assert_eq!(result.total_count, Some(5));

    let log = fixture.log();
    assert_eq!(log.row_queries("todos"), 1);
    assert_eq!(log.count_queries("todos"), 1);
}

#[tokio::test]
async fn unbounded_total_count_reuses_the_rows() {
    let mut fixture = Fixture::with_builder(Planner::builder().default_page_size(None::<u64>));

    let selection = page_of("todos", ["title"]).select(FieldSelection::new("totalCount"));

    let result = fixture
        .planner
        .connection("Todo", &selection)
        .await
        .unwrap();

    assert_eq!(result.edges.len(), 5);
    assert_eq!(result.total_count, Some(5));
    assert_eq!(fixture.log().count_queries("todos"), 0);
}
