mod builder;
pub use builder::{Builder, EdgeDef, EntityDef, FieldDef};

mod edge;
pub use edge::{Cardinality, Edge, EdgeId, EdgeLink, JoinTable};

mod entity;
pub use entity::{Entity, EntityId};

mod field;
pub use field::{Field, FieldId, FieldName};

mod name;
pub use name::Name;

use crate::{stmt::ColumnRef, Result};

/// The set of entity types the planner can query.
///
/// Built once with [`Builder`] and shared immutably afterwards.
#[derive(Debug, Default)]
pub struct Schema {
    pub entities: Vec<Entity>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub fn entity(&self, id: impl Into<EntityId>) -> &Entity {
        &self.entities[id.into().0]
    }

    /// Finds an entity by its name, as written in the schema definition.
    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.name.as_str() == name)
    }

    /// Like [`Schema::entity_by_name`], failing with `UnsupportedField` when
    /// no entity has that name.
    pub fn resolve_entity(&self, name: &str) -> Result<&Entity> {
        self.entity_by_name(name)
            .ok_or_else(|| crate::Error::unsupported_field("Query", name))
    }

    pub fn field(&self, id: FieldId) -> &Field {
        &self.entity(id.entity).fields[id.index]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.entity(id.entity).edges[id.index]
    }

    /// Returns the qualified storage column backing `field`.
    pub fn column(&self, field: FieldId) -> ColumnRef {
        let entity = self.entity(field.entity);
        ColumnRef::new(&entity.table_name, &entity.fields[field.index].name.storage_name)
    }
}
