use super::*;
use crate::stmt;

#[derive(Debug, Clone)]
pub struct Field {
    /// Uniquely identifies the field within the containing entity
    pub id: FieldId,

    /// The field name
    pub name: FieldName,

    /// Semantic type of the field's values
    pub ty: stmt::Type,

    /// True if the field can be used as the primary key of an ordering
    pub orderable: bool,

    /// True if the field may hold null values
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldName {
    /// Name exposed to GraphQL
    pub app_name: String,

    /// Name of the backing storage column
    pub storage_name: String,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId {
    pub entity: EntityId,
    pub index: usize,
}

impl Field {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn app_name(&self) -> &str {
        &self.name.app_name
    }

    /// Returns `true` if `value` may be stored in this field.
    pub fn accepts(&self, value: &stmt::Value) -> bool {
        if value.is_null() {
            self.nullable
        } else {
            value.is_a(self.ty)
        }
    }
}

impl From<&Field> for FieldId {
    fn from(value: &Field) -> Self {
        value.id
    }
}

impl std::fmt::Debug for FieldId {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(fmt, "FieldId({}/{})", self.entity.0, self.index)
    }
}
