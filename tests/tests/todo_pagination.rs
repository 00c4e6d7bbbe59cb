use keyset::{Cursor, CursorValues, FieldSelection, PageResult};
use keyset_core::stmt::Value;
use pretty_assertions::assert_eq;
use tests::{
    fixtures::{by_priority_desc, ids, page_of},
    Fixture,
};

fn todos(first: Option<i64>, after: Option<&Cursor>) -> FieldSelection {
    page_of("todos", ["title", "priority"])
        .argument("first", first)
        .argument("after", after.cloned())
        .argument("orderBy", by_priority_desc())
}

fn todos_backward(last: Option<i64>, before: Option<&Cursor>) -> FieldSelection {
    page_of("todos", ["title"])
        .argument("last", last)
        .argument("before", before.cloned())
        .argument("orderBy", by_priority_desc())
}

async fn page(fixture: &Fixture, selection: &FieldSelection) -> PageResult {
    fixture.planner.connection("Todo", selection).await.unwrap()
}

#[tokio::test]
async fn pages_forward_through_todos() {
    let fixture = Fixture::new();

    let first = page(&fixture, &todos(Some(2), None)).await;
    assert_eq!(first.ids(), ids([5, 4]));
    assert!(first.page_info.has_next_page);
    assert!(!first.page_info.has_previous_page);

    let end = first.page_info.end_cursor.clone().unwrap();
    assert_eq!(Some(&end), first.cursors().last().copied());

    let plan = fixture
        .planner
        .plan_connection("Todo", &todos(Some(2), None))
        .unwrap();
    let todo = fixture.planner.schema().entity(plan.entity);
    assert_eq!(
        end.decode(&plan.order, todo).unwrap(),
        CursorValues {
            id: Value::I64(4),
            primary: Some(Value::I32(3)),
        }
    );

    let second = page(&fixture, &todos(Some(2), Some(&end))).await;
    assert_eq!(second.ids(), ids([3, 2]));
    assert!(second.page_info.has_next_page);
    assert!(second.page_info.has_previous_page);

    let third = page(&fixture, &todos(Some(2), second.cursors().last().copied())).await;
    assert_eq!(third.ids(), ids([1]));
    assert!(!third.page_info.has_next_page);

    let node = third.nodes().next().unwrap();
    assert_eq!(node.get("title"), Some(&Value::from("todo 1")));
    assert_eq!(node.get("priority"), Some(&Value::I32(1)));
}

#[tokio::test]
async fn pages_backward_through_todos() {
    let fixture = Fixture::new();

    let last = page(&fixture, &todos_backward(Some(2), None)).await;
    assert_eq!(last.ids(), ids([2, 1]));
    assert!(!last.page_info.has_next_page);
    assert!(last.page_info.has_previous_page);

    let start = last.page_info.start_cursor.clone().unwrap();
    let middle = page(&fixture, &todos_backward(Some(2), Some(&start))).await;
    assert_eq!(middle.ids(), ids([4, 3]));
    assert!(middle.page_info.has_next_page);
    assert!(middle.page_info.has_previous_page);

    let start = middle.page_info.start_cursor.clone().unwrap();
    let head = page(&fixture, &todos_backward(Some(2), Some(&start))).await;
    assert_eq!(head.ids(), ids([5]));
    assert!(head.page_info.has_next_page);
    assert!(!head.page_info.has_previous_page);
}

#[tokio::test]
async fn every_page_size_visits_each_todo_once() {
    let fixture = Fixture::new();

    for size in 1..=6 {
        let mut seen = vec![];
        let mut after = None;

        loop {
            let result = page(&fixture, &todos(Some(size), after.as_ref())).await;
            assert!(result.edges.len() as i64 <= size);
            seen.extend(result.ids());

            if !result.page_info.has_next_page {
                break;
            }

            after = result.page_info.end_cursor.clone();
        }

        assert_eq!(seen, ids([5, 4, 3, 2, 1]), "page size {size}");
    }
}

#[tokio::test]
async fn empty_page_still_reports_more_rows() {
    let fixture = Fixture::new();

    let result = page(&fixture, &todos(Some(0), None)).await;
    assert!(result.edges.is_empty());
    assert!(result.page_info.has_next_page);
    assert_eq!(result.page_info.start_cursor, None);
    assert_eq!(result.page_info.end_cursor, None);
}

#[tokio::test]
async fn cursors_round_trip_for_every_row() {
    let fixture = Fixture::new();
    let selection = todos(None, None);

    let result = page(&fixture, &selection).await;
    let plan = fixture.planner.plan_connection("Todo", &selection).unwrap();
    let todo = fixture.planner.schema().entity(plan.entity);

    for edge in &result.edges {
        let node = edge.node.as_ref().unwrap();
        let values = edge.cursor.decode(&plan.order, todo).unwrap();

        assert_eq!(values.id, node.id);
        assert_eq!(values.primary.as_ref(), node.get("priority"));
        assert_eq!(Cursor::encode(&plan.order, todo, &values).unwrap(), edge.cursor);
    }
}

#[tokio::test]
async fn nullable_order_field_sorts_nulls_first() {
    let fixture = Fixture::new();
    let by_due = |direction: &str, after: Option<&Cursor>| {
        page_of("todos", ["title"])
            .argument("first", 2)
            .argument("after", after.cloned())
            .argument(
                "orderBy",
                keyset::Argument::object([
                    ("field", keyset::Argument::enum_value("DUE_AT")),
                    ("direction", keyset::Argument::enum_value(direction)),
                ]),
            )
    };

    let asc = page(&fixture, &by_due("ASC", None)).await;
    assert_eq!(asc.ids(), ids([1, 3]));

    // Continue from a cursor holding a null value
    let asc = page(&fixture, &by_due("ASC", asc.page_info.end_cursor.as_ref())).await;
    assert_eq!(asc.ids(), ids([4, 2]));

    let desc = page(&fixture, &by_due("DESC", None)).await;
    assert_eq!(desc.ids(), ids([5, 2]));

    let desc = page(&fixture, &by_due("DESC", desc.page_info.end_cursor.as_ref())).await;
    assert_eq!(desc.ids(), ids([4, 3]));
    assert!(desc.page_info.has_next_page);

    let desc = page(&fixture, &by_due("DESC", desc.page_info.end_cursor.as_ref())).await;
    assert_eq!(desc.ids(), ids([1]));
    assert!(!desc.page_info.has_next_page);
}
