//! Shared schema and seed data.
//!
//! Todos, ordered by `priority desc, id desc`:
//!
//! | id | priority | dueAt | owner |
//! |----|----------|-------|-------|
//! | 5  | 3        | 30    | 2     |
//! | 4  | 3        | 10    | 1     |
//! | 3  | 2        | null  | 1     |
//! | 2  | 1        | 20    | 1     |
//! | 1  | 1        | null  | 1     |
//!
//! Users `1 alice`, `2 bob` and `3 carol`. Alice is tagged `home`, `work`
//! and `yard`, bob `work` and `yard`. `tags` loads them as a plain list and
//! `labels` as a connection over the same join table.

use crate::{ExecLog, LoggingDriver};

use keyset::{planner, Argument, FieldSelection, Planner};
use keyset_core::{
    schema::{Builder, EdgeDef, EntityDef, FieldDef},
    stmt::{Type, Value},
    Schema,
};
use keyset_driver_memory::Memory;
use std::sync::Arc;

pub struct Fixture {
    pub planner: Planner,

    /// The storage behind the planner, for seeding and fault injection
    pub memory: Arc<Memory>,

    log: ExecLog,
}

impl Fixture {
    pub fn new() -> Fixture {
        Fixture::with_builder(&Planner::builder())
    }

    pub fn with_builder(builder: &planner::Builder) -> Fixture {
        crate::init_tracing();

        let memory = Arc::new(Memory::new());
        seed(&memory);

        let driver = LoggingDriver::new(memory.clone());
        let log = ExecLog::new(driver.ops_log_handle());

        let planner = builder
            .build(schema(), driver)
            .expect("failed to build planner");

        Fixture {
            planner,
            memory,
            log,
        }
    }

    pub fn log(&mut self) -> &mut ExecLog {
        &mut self.log
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Fixture::new()
    }
}

pub fn schema() -> Schema {
    Builder::new()
        .entity(
            EntityDef::new("User")
                .identifier("id", Type::I64)
                .field(FieldDef::new("name", Type::String).orderable())
                .edge(EdgeDef::many("todos", "Todo").inverse("userId"))
                .edge(EdgeDef::list("tags", "Tag").through("user_tags", "user_id", "tag_id"))
                .edge(EdgeDef::many("labels", "Tag").through("user_tags", "user_id", "tag_id")),
        )
        .entity(
            EntityDef::new("Todo")
                .identifier("id", Type::I64)
                .field(FieldDef::new("title", Type::String))
                .field(FieldDef::new("priority", Type::I32).orderable())
                .field(FieldDef::new("dueAt", Type::I64).orderable().nullable())
                .field(FieldDef::new("userId", Type::I64).nullable())
                .edge(EdgeDef::one("owner", "User").owned("userId")),
        )
        .entity(
            EntityDef::new("Tag")
                .identifier("id", Type::I64)
                .field(FieldDef::new("label", Type::String).orderable()),
        )
        .build()
        .expect("invalid test schema")
}

fn seed(memory: &Memory) {
    for (id, name) in [(1, "alice"), (2, "bob"), (3, "carol")] {
        memory.insert("users", [("id", Value::I64(id)), ("name", name.into())]);
    }

    let todos = [
        (1, 1, None, 1),
        (2, 1, Some(20), 1),
        (3, 2, None, 1),
        (4, 3, Some(10), 1),
        (5, 3, Some(30), 2),
    ];

    for (id, priority, due_at, user_id) in todos {
        memory.insert(
            "todos",
            [
                ("id", Value::I64(id)),
                ("title", format!("todo {id}").into()),
                ("priority", Value::I32(priority)),
                ("due_at", due_at.map(Value::I64).unwrap_or_default()),
                ("user_id", Value::I64(user_id)),
            ],
        );
    }

    for (id, label) in [(1, "home"), (2, "work"), (3, "yard")] {
        memory.insert("tags", [("id", Value::I64(id)), ("label", label.into())]);
    }

    for (user_id, tag_id) in [(1, 1), (1, 2), (1, 3), (2, 2), (2, 3)] {
        memory.insert(
            "user_tags",
            [("user_id", Value::I64(user_id)), ("tag_id", Value::I64(tag_id))],
        );
    }
}

/// `orderBy: { field: PRIORITY, direction: DESC }`
pub fn by_priority_desc() -> Argument {
    Argument::object([
        ("field", Argument::enum_value("PRIORITY")),
        ("direction", Argument::enum_value("DESC")),
    ])
}

/// `edges { cursor node { <fields> } } pageInfo { .. }`
pub fn page_of<'a>(name: &str, fields: impl IntoIterator<Item = &'a str>) -> FieldSelection {
    FieldSelection::new(name)
        .select(
            FieldSelection::new("edges")
                .select(FieldSelection::new("cursor"))
                .select(FieldSelection::new("node").select_all(fields)),
        )
        .select(FieldSelection::new("pageInfo").select_all([
            "hasNextPage",
            "hasPreviousPage",
            "startCursor",
            "endCursor",
        ]))
}

/// Shorthand for integer identifiers.
pub fn ids<const N: usize>(ids: [i64; N]) -> Vec<Value> {
    ids.into_iter().map(Value::I64).collect()
}
