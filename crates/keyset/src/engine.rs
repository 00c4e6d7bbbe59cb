//! Planning and execution of connection queries.
//!
//! A request flows through the stages in order: the walker turns a
//! [`FieldSelection`](crate::FieldSelection) into an immutable plan tree,
//! `exec` dispatches the plan's queries (building them with `paginate` and
//! `window`), and `assemble` shapes the fetched rows into pages.

mod assemble;

mod exec;
pub(crate) use exec::Exec;

mod paginate;

mod plan;
pub use plan::{ConnectionPlan, EdgeLoad, EdgePlan, EdgesPlan, Link, NodePlan, RelatedPlan};

mod walk;
pub(crate) use walk::Walker;

mod window;
