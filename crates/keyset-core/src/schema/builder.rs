use super::*;
use crate::{stmt, Error, Result};

use indexmap::IndexMap;

/// Builds a [`Schema`] from entity definitions and verifies it.
#[derive(Debug, Default)]
pub struct Builder {
    /// If set, prefix all table names with this string
    table_name_prefix: Option<String>,

    entities: Vec<EntityDef>,
}

/// Definition of one entity type.
#[derive(Debug, Clone)]
pub struct EntityDef {
    name: String,
    table_name: Option<String>,
    identifier: Option<String>,
    fields: Vec<FieldDef>,
    edges: Vec<EdgeDef>,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    name: String,
    column: Option<String>,
    ty: stmt::Type,
    orderable: bool,
    nullable: bool,
}

#[derive(Debug, Clone)]
pub struct EdgeDef {
    name: String,
    target: String,
    cardinality: Cardinality,
    link: Option<LinkDef>,
}

#[derive(Debug, Clone)]
enum LinkDef {
    Owned(String),
    Inverse(String),
    Through(JoinTable),
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn entity(&mut self, def: EntityDef) -> &mut Self {
        self.entities.push(def);
        self
    }

    pub fn build(&self) -> Result<Schema> {
        let mut lookup = IndexMap::new();

        for (index, def) in self.entities.iter().enumerate() {
            if lookup.insert(def.name.clone(), EntityId(index)).is_some() {
                return Err(Error::invalid_schema(format!(
                    "duplicate entity `{}`",
                    def.name
                )));
            }
        }

        let mut entities = self
            .entities
            .iter()
            .enumerate()
            .map(|(index, def)| self.build_entity(EntityId(index), def))
            .collect::<Result<Vec<_>>>()?;

        // Edges reference fields of other entities, so they are resolved once
        // every entity exists.
        for (index, def) in self.entities.iter().enumerate() {
            let edges = def
                .edges
                .iter()
                .enumerate()
                .map(|(edge_index, edge)| {
                    let id = EdgeId {
                        entity: EntityId(index),
                        index: edge_index,
                    };
                    build_edge(&entities, &lookup, id, edge)
                })
                .collect::<Result<Vec<_>>>()?;

            entities[index].edges = edges;
        }

        let schema = Schema { entities };
        schema.verify()?;
        Ok(schema)
    }

    fn build_entity(&self, id: EntityId, def: &EntityDef) -> Result<Entity> {
        let name = Name::new(&def.name);

        let table_name = match &def.table_name {
            Some(table_name) => table_name.clone(),
            None => pluralizer::pluralize(&name.snake_case(), 2, false),
        };

        let table_name = match &self.table_name_prefix {
            Some(prefix) => format!("{prefix}{table_name}"),
            None => table_name,
        };

        let fields = def
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| Field {
                id: FieldId { entity: id, index },
                name: FieldName {
                    app_name: field.name.clone(),
                    storage_name: field
                        .column
                        .clone()
                        .unwrap_or_else(|| Name::new(&field.name).snake_case()),
                },
                ty: field.ty,
                orderable: field.orderable,
                nullable: field.nullable,
            })
            .collect::<Vec<_>>();

        let Some(identifier) = &def.identifier else {
            return Err(Error::invalid_schema(format!(
                "entity `{}` has no identifier",
                def.name
            )));
        };

        let identifier = fields
            .iter()
            .find(|field| &field.name.app_name == identifier)
            .map(|field| field.id)
            .ok_or_else(|| {
                Error::invalid_schema(format!(
                    "identifier `{}.{identifier}` is not a field",
                    def.name
                ))
            })?;

        Ok(Entity {
            id,
            name,
            table_name,
            fields,
            edges: vec![],
            identifier,
        })
    }
}

fn build_edge(
    entities: &[Entity],
    lookup: &IndexMap<String, EntityId>,
    id: EdgeId,
    def: &EdgeDef,
) -> Result<Edge> {
    let source = &entities[id.entity.0];
    let qualified = format!("{}.{}", source.name, def.name);

    let target = *lookup.get(&def.target).ok_or_else(|| {
        Error::invalid_schema(format!(
            "edge `{qualified}` targets unknown entity `{}`",
            def.target
        ))
    })?;
    let target_entity = &entities[target.0];

    let link = match &def.link {
        None => {
            return Err(Error::invalid_schema(format!(
                "edge `{qualified}` does not declare how it is linked"
            )))
        }
        Some(LinkDef::Owned(field)) => {
            if !matches!(def.cardinality, Cardinality::One) {
                return Err(Error::invalid_schema(format!(
                    "edge `{qualified}` stores the target identifier so it must be to-one"
                )));
            }

            let field = link_field(source, field, &qualified)?;
            check_link_type(field, target_entity.identifier(), &qualified)?;
            EdgeLink::Owned { field: field.id }
        }
        Some(LinkDef::Inverse(field)) => {
            let field = link_field(target_entity, field, &qualified)?;
            check_link_type(field, source.identifier(), &qualified)?;
            EdgeLink::Inverse { field: field.id }
        }
        Some(LinkDef::Through(join)) => {
            if matches!(def.cardinality, Cardinality::One) {
                return Err(Error::invalid_schema(format!(
                    "edge `{qualified}` links through a join table so it must be to-many"
                )));
            }

            EdgeLink::Through(join.clone())
        }
    };

    Ok(Edge {
        id,
        name: def.name.clone(),
        target,
        cardinality: def.cardinality,
        link,
    })
}

fn link_field<'a>(entity: &'a Entity, name: &str, qualified: &str) -> Result<&'a Field> {
    entity.field_by_name(name).ok_or_else(|| {
        Error::invalid_schema(format!(
            "edge `{qualified}` links through unknown field `{}.{name}`",
            entity.name
        ))
    })
}

fn check_link_type(field: &Field, identifier: &Field, qualified: &str) -> Result<()> {
    if field.ty != identifier.ty {
        return Err(Error::invalid_schema(format!(
            "edge `{qualified}`: link field `{}` is {} but the identifier it references is {}",
            field.name.app_name, field.ty, identifier.ty
        )));
    }

    Ok(())
}

impl Schema {
    fn verify(&self) -> Result<()> {
        for entity in &self.entities {
            let identifier = entity.identifier();

            if identifier.nullable || !identifier.orderable {
                return Err(Error::invalid_schema(format!(
                    "identifier `{}.{}` must be orderable and not nullable",
                    entity.name, identifier.name.app_name
                )));
            }

            let mut names = IndexMap::new();
            let members = entity
                .fields
                .iter()
                .map(|field| &field.name.app_name)
                .chain(entity.edges.iter().map(|edge| &edge.name));

            for name in members {
                if names.insert(name, ()).is_some() {
                    return Err(Error::invalid_schema(format!(
                        "duplicate member `{}.{name}`",
                        entity.name
                    )));
                }
            }
        }

        Ok(())
    }
}

impl EntityDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: None,
            identifier: None,
            fields: vec![],
            edges: vec![],
        }
    }

    /// Overrides the storage table name.
    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    /// Adds the identifier field. It is always orderable and never null.
    pub fn identifier(mut self, name: impl Into<String>, ty: stmt::Type) -> Self {
        let field = FieldDef::new(name, ty).orderable();
        self.identifier = Some(field.name.clone());
        self.fields.push(field);
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn edge(mut self, edge: EdgeDef) -> Self {
        self.edges.push(edge);
        self
    }
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: stmt::Type) -> Self {
        Self {
            name: name.into(),
            column: None,
            ty,
            orderable: false,
            nullable: false,
        }
    }

    pub fn orderable(mut self) -> Self {
        self.orderable = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Overrides the storage column name.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

impl EdgeDef {
    /// A to-one edge.
    pub fn one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, target, Cardinality::One)
    }

    /// A to-many edge exposed as a paginated connection.
    pub fn many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, target, Cardinality::Many { paginated: true })
    }

    /// A to-many edge exposed as a plain list.
    pub fn list(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, target, Cardinality::Many { paginated: false })
    }

    fn new(name: impl Into<String>, target: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            cardinality,
            link: None,
        }
    }

    /// The source entity's `field` holds the target identifier.
    pub fn owned(mut self, field: impl Into<String>) -> Self {
        self.link = Some(LinkDef::Owned(field.into()));
        self
    }

    /// The target entity's `field` holds the source identifier.
    pub fn inverse(mut self, field: impl Into<String>) -> Self {
        self.link = Some(LinkDef::Inverse(field.into()));
        self
    }

    /// Rows are linked through `table`.
    pub fn through(
        mut self,
        table: impl Into<String>,
        source_column: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        self.link = Some(LinkDef::Through(JoinTable {
            table: table.into(),
            source_column: source_column.into(),
            target_column: target_column.into(),
        }));
        self
    }
}
