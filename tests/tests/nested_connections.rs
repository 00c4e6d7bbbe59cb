use keyset::{Argument, FieldSelection};
use keyset_core::stmt::Value;
use pretty_assertions::assert_eq;
use tests::{
    fixtures::{by_priority_desc, ids, page_of},
    Fixture,
};

fn users_with(todos: FieldSelection) -> FieldSelection {
    FieldSelection::new("users")
        .argument("first", 10)
        .select(
            FieldSelection::new("edges").select(
                FieldSelection::new("node")
                    .select(FieldSelection::new("name"))
                    .select(todos),
            ),
        )
}

#[tokio::test]
async fn nested_connection_is_windowed_per_user() {
    let mut fixture = Fixture::new();

    let todos = page_of("todos", ["title"])
        .argument("first", 2)
        .argument("orderBy", by_priority_desc())
        .select(FieldSelection::new("totalCount"));

    let users = fixture
        .planner
        .connection("User", &users_with(todos))
        .await
        .unwrap();

    assert_eq!(users.ids(), ids([1, 2, 3]));

    let pages: Vec<_> = users
        .nodes()
        .map(|user| user.connection("todos").unwrap())
        .collect();

    assert_eq!(pages[0].ids(), ids([4, 3]));
    assert!(pages[0].page_info.has_next_page);
    assert_eq!(pages[0].total_count, Some(4));

    assert_eq!(pages[1].ids(), ids([5]));
    assert!(!pages[1].page_info.has_next_page);
    assert_eq!(pages[1].total_count, Some(1));

    assert!(pages[2].edges.is_empty());
    assert!(!pages[2].page_info.has_next_page);
    assert_eq!(pages[2].total_count, Some(0));

    // One query for the users, one windowed query and one grouped count
    // for every user's todos at once.
    let log = fixture.log();
    assert_eq!(log.len(), 3);
    assert_eq!(log.row_queries("users"), 1);
    assert_eq!(log.row_queries("todos"), 1);
    assert_eq!(log.count_queries("todos"), 1);

    let windowed = log
        .queries()
        .into_iter()
        .find(|query| query.is_windowed())
        .unwrap();
    assert_eq!(windowed.window.unwrap().limit, 3);
}

#[tokio::test]
async fn nested_pages_never_exceed_the_requested_size() {
    let fixture = Fixture::new();

    for size in 0..=4 {
        let todos = page_of("todos", ["title"]).argument("first", size);

        let users = fixture
            .planner
            .connection("User", &users_with(todos))
            .await
            .unwrap();

        for user in users.nodes() {
            let page = user.connection("todos").unwrap();
            assert!(page.edges.len() as i64 <= size);
        }
    }
}

#[tokio::test]
async fn lists_and_to_one_edges() {
    let mut fixture = Fixture::new();

    let selection = FieldSelection::new("users")
        .select(
            FieldSelection::new("edges").select(
                FieldSelection::new("node")
                    .select(FieldSelection::new("tags").select_all(["label"]))
                    .select(
                        FieldSelection::new("todos")
                            .argument("first", 1)
                            .argument("orderBy", by_priority_desc())
                            .select(
                                FieldSelection::new("edges").select(
                                    FieldSelection::new("node").select(
                                        FieldSelection::new("owner")
                                            .alias("author")
                                            .select_all(["name"]),
                                    ),
                                ),
                            ),
                    ),
            ),
        );

    let users = fixture
        .planner
        .connection("User", &selection)
        .await
        .unwrap();
    let users: Vec<_> = users.nodes().collect();

    let labels = |index: usize| -> Vec<Value> {
        users[index]
            .list("tags")
            .unwrap()
            .iter()
            .map(|tag| tag.get("label").cloned().unwrap())
            .collect()
    };

    assert_eq!(
        labels(0),
        vec![Value::from("home"), Value::from("work"), Value::from("yard")]
    );
    assert_eq!(labels(1), vec![Value::from("work"), Value::from("yard")]);
    assert!(labels(2).is_empty());

    let top = users[0].connection("todos").unwrap();
    let todo = top.nodes().next().unwrap();
    assert_eq!(todo.id, Value::I64(4));

    let author = todo.one("author").unwrap().unwrap();
    assert_eq!(author.get("name"), Some(&Value::from("alice")));

    // users, tags through the join table, todos, owners
    let log = fixture.log();
    assert_eq!(log.len(), 4);
    assert_eq!(log.row_queries("tags"), 1);
    assert!(log
        .queries()
        .iter()
        .any(|query| query.source.join.is_some()));
}

#[tokio::test]
async fn nested_filters_are_passed_to_storage() {
    let fixture = Fixture::new();

    let urgent = keyset_core::stmt::Expr::ge(
        keyset_core::stmt::ColumnRef::new("todos", "priority"),
        2,
    );
    let todos = page_of("todos", ["title"]).argument("where", Argument::Filter(urgent));

    let users = fixture
        .planner
        .connection("User", &users_with(todos))
        .await
        .unwrap();

    let pages: Vec<_> = users
        .nodes()
        .map(|user| user.connection("todos").unwrap().ids())
        .collect();

    assert_eq!(pages, vec![ids([3, 4]), ids([5]), vec![]]);
}

#[tokio::test]
async fn connection_through_join_table_is_windowed_per_user() {
    let mut fixture = Fixture::new();

    let labels = page_of("labels", ["label"])
        .argument("first", 1)
        .argument(
            "orderBy",
            Argument::object([
                ("field", Argument::enum_value("LABEL")),
                ("direction", Argument::enum_value("DESC")),
            ]),
        )
        .select(FieldSelection::new("totalCount"));

    let users = fixture
        .planner
        .connection("User", &users_with(labels))
        .await
        .unwrap();

    let pages: Vec<_> = users
        .nodes()
        .map(|user| user.connection("labels").unwrap())
        .collect();

    assert_eq!(pages[0].ids(), ids([3]));
    assert!(pages[0].page_info.has_next_page);
    assert_eq!(pages[0].total_count, Some(3));

    assert_eq!(pages[1].ids(), ids([3]));
    assert!(pages[1].page_info.has_next_page);
    assert_eq!(pages[1].total_count, Some(2));

    assert!(pages[2].edges.is_empty());
    assert!(!pages[2].page_info.has_next_page);
    assert_eq!(pages[2].total_count, Some(0));

    let log = fixture.log();
    assert_eq!(log.len(), 3);
    assert_eq!(log.row_queries("tags"), 1);
    assert_eq!(log.count_queries("tags"), 1);

    let windowed = log
        .queries()
        .into_iter()
        .find(|query| query.is_windowed())
        .unwrap();
    assert!(windowed.source.join.is_some());
    assert_eq!(windowed.window.unwrap().limit, 2);
}

#[tokio::test]
async fn nested_last_returns_each_users_tail_in_order() {
    let fixture = Fixture::new();

    let todos = page_of("todos", ["title"])
        .argument("last", 2)
        .argument("orderBy", by_priority_desc())
        .select(FieldSelection::new("totalCount"));

    let users = fixture
        .planner
        .connection("User", &users_with(todos))
        .await
        .unwrap();

    let pages: Vec<_> = users
        .nodes()
        .map(|user| user.connection("todos").unwrap())
        .collect();

    assert_eq!(pages[0].ids(), ids([2, 1]));
    assert!(pages[0].page_info.has_previous_page);
    assert!(!pages[0].page_info.has_next_page);
    assert_eq!(pages[0].total_count, Some(4));

    assert_eq!(pages[1].ids(), ids([5]));
    assert!(!pages[1].page_info.has_previous_page);

    assert!(pages[2].edges.is_empty());
    assert!(!pages[2].page_info.has_previous_page);

    let cursors = pages[0].cursors();
    assert_eq!(pages[0].page_info.start_cursor.as_ref(), Some(cursors[0]));
    assert_eq!(pages[0].page_info.end_cursor.as_ref(), Some(cursors[1]));
}
