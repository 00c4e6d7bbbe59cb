use keyset::{Argument, FieldSelection, Planner};
use tests::{
    assert_err,
    fixtures::{by_priority_desc, page_of},
    Fixture,
};

async fn rejects(fixture: &mut Fixture, selection: FieldSelection) -> keyset::Error {
    let err = assert_err!(fixture.planner.connection("Todo", &selection).await);
    assert!(fixture.log().is_empty(), "queried storage before failing: {err}");
    err
}

#[tokio::test]
async fn negative_page_size() {
    let mut fixture = Fixture::new();

    let err = rejects(&mut fixture, page_of("todos", ["title"]).argument("first", -1)).await;
    assert!(err.is_invalid_argument());

    let err = rejects(&mut fixture, page_of("todos", ["title"]).argument("last", -3)).await;
    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn first_and_last_together() {
    let mut fixture = Fixture::new();

    let selection = page_of("todos", ["title"])
        .argument("first", 1)
        .argument("last", 1);

    assert!(rejects(&mut fixture, selection).await.is_invalid_argument());
}

#[tokio::test]
async fn page_size_above_the_maximum() {
    let mut fixture = Fixture::with_builder(Planner::builder().max_page_size(10u64));

    let selection = page_of("todos", ["title"]).argument("first", 11);
    assert!(rejects(&mut fixture, selection).await.is_invalid_argument());
}

#[tokio::test]
async fn malformed_cursor() {
    let mut fixture = Fixture::new();

    let selection = page_of("todos", ["title"]).argument("after", "not a cursor");
    assert!(rejects(&mut fixture, selection).await.is_invalid_cursor());
}

#[tokio::test]
async fn cursor_from_another_ordering() {
    let mut fixture = Fixture::new();

    let by_priority = fixture
        .planner
        .connection(
            "Todo",
            &page_of("todos", ["title"])
                .argument("first", 1)
                .argument("orderBy", by_priority_desc()),
        )
        .await
        .unwrap();
    let cursor = by_priority.page_info.end_cursor.clone().unwrap();
    fixture.log().clear();

    let by_due = page_of("todos", ["title"])
        .argument("after", cursor)
        .argument(
            "orderBy",
            Argument::object([("field", Argument::enum_value("DUE_AT"))]),
        );

    assert!(rejects(&mut fixture, by_due).await.is_invalid_cursor());
}

#[tokio::test]
async fn unknown_or_unorderable_order_field() {
    let mut fixture = Fixture::new();

    for field in ["NOPE", "TITLE"] {
        let selection = page_of("todos", ["title"]).argument(
            "orderBy",
            Argument::object([("field", Argument::enum_value(field))]),
        );

        assert!(rejects(&mut fixture, selection).await.is_unknown_order_field());
    }
}

#[tokio::test]
async fn unsupported_fields() {
    let mut fixture = Fixture::new();

    let err = rejects(&mut fixture, page_of("todos", ["title", "secret"])).await;
    assert!(err.is_unsupported_field());

    let selection = FieldSelection::new("todos").select(FieldSelection::new("nodes"));
    assert!(rejects(&mut fixture, selection).await.is_unsupported_field());

    let selection = FieldSelection::new("todos")
        .select(FieldSelection::new("pageInfo").select_all(["hasNextPage", "pageCount"]));
    assert!(rejects(&mut fixture, selection).await.is_unsupported_field());
}

#[tokio::test]
async fn pagination_arguments_on_lists() {
    let mut fixture = Fixture::new();

    let selection = FieldSelection::new("users").select(
        FieldSelection::new("edges").select(
            FieldSelection::new("node")
                .select(FieldSelection::new("tags").argument("first", 1).select_all(["label"])),
        ),
    );

    let err = assert_err!(fixture.planner.connection("User", &selection).await);
    assert!(err.is_invalid_argument());
    assert!(fixture.log().is_empty());
}

#[tokio::test]
async fn introspection_fields_are_skipped() {
    let fixture = Fixture::new();

    let selection = page_of("todos", ["__typename", "title"])
        .select(FieldSelection::new("__typename"));

    let result = fixture
        .planner
        .connection("Todo", &selection)
        .await
        .unwrap();
    assert_eq!(result.edges.len(), 5);
}
