mod column_ref;
pub use column_ref::ColumnRef;

mod direction;
pub use direction::Direction;

mod eval;

mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_in_list;
pub use expr_in_list::ExprInList;

mod expr_is_null;
pub use expr_is_null::ExprIsNull;

mod expr_or;
pub use expr_or::ExprOr;

mod op_binary;
pub use op_binary::BinaryOp;

mod order_by_expr;
pub use order_by_expr::OrderByExpr;

mod query_spec;
pub use query_spec::QuerySpec;

mod returning;
pub use returning::Returning;

mod source;
pub use source::{Join, Source};

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod value_cmp;

mod value_record;
pub use value_record::ValueRecord;

mod value_serde;

mod value_stream;
pub use value_stream::ValueStream;

mod window;
pub use window::Window;
