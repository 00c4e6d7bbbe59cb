#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod flavor;
use flavor::Flavor;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod expr;
mod query;
mod value;

use keyset_core::stmt::QuerySpec;

/// Serialize a query to a SQL string
#[derive(Debug)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl Serializer {
    /// Serializes `query`, pushing every bound value onto `params` in
    /// placeholder order.
    pub fn serialize(&self, query: &QuerySpec, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        query.to_sql(&mut fmt);

        ret.push(';');
        ret
    }
}
