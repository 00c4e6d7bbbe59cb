mod args;
pub use args::{PaginationArgs, Scan};

mod config;
pub use config::{Config, ConnectionNames};

mod cursor;
pub use cursor::{Cursor, CursorValues};

pub mod engine;
pub use engine::{ConnectionPlan, EdgePlan, NodePlan};

mod order;
pub use order::OrderSpec;

mod page;
pub use page::{Edge, EdgeValue, Node, PageInfo, PageResult};

pub mod planner;
pub use planner::Planner;

mod selection;
pub use selection::{Argument, FieldSelection};

pub use keyset_core::{driver, schema, stmt, Error, Result, Schema};
