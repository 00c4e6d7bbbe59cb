use keyset_core::stmt::Expr;

use indexmap::IndexMap;

/// One field of a resolved GraphQL selection set.
///
/// The execution engine resolves fragments and variables before handing the
/// tree over, so every argument is a concrete value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSelection {
    pub name: String,
    pub alias: Option<String>,
    pub arguments: IndexMap<String, Argument>,
    pub selections: Vec<FieldSelection>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Null,
    Int(i64),
    String(String),
    Enum(String),
    List(Vec<Argument>),
    Object(IndexMap<String, Argument>),

    /// Pre-compiled `where` predicate, passed to storage as is
    Filter(Expr),
}

impl FieldSelection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            arguments: IndexMap::new(),
            selections: vec![],
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn argument(mut self, name: impl Into<String>, value: impl Into<Argument>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    pub fn select(mut self, selection: FieldSelection) -> Self {
        self.selections.push(selection);
        self
    }

    /// Selects leaf fields by name.
    pub fn select_all<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.selections
            .extend(names.into_iter().map(FieldSelection::new));
        self
    }

    /// The key the field is reported under: its alias, or its name.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// `__typename` and friends are answered by the execution engine.
    pub fn is_introspection(&self) -> bool {
        self.name.starts_with("__")
    }
}

impl Argument {
    pub fn enum_value(value: impl Into<String>) -> Self {
        Self::Enum(value.into())
    }

    pub fn object<'a>(entries: impl IntoIterator<Item = (&'a str, Argument)>) -> Self {
        Self::Object(
            entries
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "an integer",
            Self::String(_) => "a string",
            Self::Enum(_) => "an enum value",
            Self::List(_) => "a list",
            Self::Object(_) => "an object",
            Self::Filter(_) => "a filter",
        }
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Argument {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Expr> for Argument {
    fn from(value: Expr) -> Self {
        Self::Filter(value)
    }
}

impl From<crate::Cursor> for Argument {
    fn from(value: crate::Cursor) -> Self {
        Self::String(value.into_string())
    }
}

impl<T: Into<Argument>> From<Option<T>> for Argument {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}
