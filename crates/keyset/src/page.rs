use crate::Cursor;

use indexmap::IndexMap;
use keyset_core::{schema::EntityId, stmt::Value};
use serde::Serialize;

/// One page of a Relay connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub edges: Vec<Edge>,
    pub page_info: PageInfo,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    /// Absent when the selection does not ask for `node`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<Node>,

    pub cursor: Cursor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<Cursor>,
    pub end_cursor: Option<Cursor>,
}

/// A loaded entity row holding exactly the selected fields and edges,
/// keyed by response key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(skip)]
    pub entity: EntityId,

    /// Identifier value, always loaded
    #[serde(skip)]
    pub id: Value,

    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,

    #[serde(flatten)]
    pub edges: IndexMap<String, EdgeValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EdgeValue {
    One(Option<Box<Node>>),
    List(Vec<Node>),
    Connection(PageResult),
}

impl PageResult {
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.edges.iter().filter_map(|edge| edge.node.as_ref())
    }

    /// Identifiers of the page's nodes, in order.
    pub fn ids(&self) -> Vec<Value> {
        self.nodes().map(|node| node.id.clone()).collect()
    }

    pub fn cursors(&self) -> Vec<&Cursor> {
        self.edges.iter().map(|edge| &edge.cursor).collect()
    }
}

impl Node {
    pub fn new(entity: EntityId, id: Value) -> Node {
        Node {
            entity,
            id,
            fields: IndexMap::new(),
            edges: IndexMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn edge(&self, key: &str) -> Option<&EdgeValue> {
        self.edges.get(key)
    }

    pub fn connection(&self, key: &str) -> Option<&PageResult> {
        match self.edge(key)? {
            EdgeValue::Connection(page) => Some(page),
            _ => None,
        }
    }

    pub fn list(&self, key: &str) -> Option<&[Node]> {
        match self.edge(key)? {
            EdgeValue::List(nodes) => Some(nodes),
            _ => None,
        }
    }

    /// Returns the target of a to-one edge; the inner option is `None` when
    /// the edge is unset.
    pub fn one(&self, key: &str) -> Option<Option<&Node>> {
        match self.edge(key)? {
            EdgeValue::One(node) => Some(node.as_deref()),
            _ => None,
        }
    }
}
