use super::*;

#[derive(Debug)]
pub struct Entity {
    /// Uniquely identifies the entity within the schema
    pub id: EntityId,

    /// Name of the entity
    pub name: Name,

    /// Storage table holding the entity's rows
    pub table_name: String,

    /// Scalar fields, including the identifier
    pub fields: Vec<Field>,

    /// Relationships to other entities
    pub edges: Vec<Edge>,

    /// The unique, orderable field used as the tie-break of every ordering
    pub identifier: FieldId,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

impl Entity {
    pub fn field(&self, id: impl Into<FieldId>) -> &Field {
        let id = id.into();
        assert_eq!(self.id, id.entity);
        &self.fields[id.index]
    }

    pub fn identifier(&self) -> &Field {
        self.field(self.identifier)
    }

    /// Finds a field by its GraphQL name.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.name.app_name == name)
    }

    /// Finds an edge by its GraphQL name.
    pub fn edge_by_name(&self, name: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.name == name)
    }
}

impl From<&Entity> for EntityId {
    fn from(value: &Entity) -> Self {
        value.id
    }
}

impl From<&EntityId> for EntityId {
    fn from(value: &EntityId) -> Self {
        *value
    }
}
