use super::{ConnectionPlan, EdgeLoad, EdgePlan, EdgesPlan, Link, NodePlan, RelatedPlan};
use crate::{Argument, Config, Cursor, FieldSelection, OrderSpec, PaginationArgs, Result};

use keyset_core::{
    schema::{Cardinality, Edge, EdgeLink, Entity, EntityId},
    stmt::{ColumnRef, Direction, Expr, Join},
    Error, Schema,
};

/// Turns a selection tree into an immutable plan.
///
/// Every argument is checked and every cursor decoded here, so a plan that
/// was built successfully never fails validation at execution time.
#[derive(Debug)]
pub(crate) struct Walker<'a> {
    schema: &'a Schema,
    config: &'a Config,
}

/// Arguments read off one connection or list field.
#[derive(Debug, Default)]
struct Arguments {
    pagination: PaginationArgs,
    order_field: Option<String>,
    direction: Option<Direction>,
    filter: Option<Expr>,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(schema: &'a Schema, config: &'a Config) -> Self {
        Self { schema, config }
    }

    /// Plans a connection field of `entity`.
    pub(crate) fn connection(
        &self,
        entity: EntityId,
        selection: &FieldSelection,
    ) -> Result<ConnectionPlan> {
        let names = &self.config.names;
        let entity = self.schema.entity(entity);

        let args = self.arguments(selection, true)?;
        args.pagination.validate(self.config)?;

        let order = OrderSpec::resolve(entity, args.order_field.as_deref(), args.direction)?;

        let decode = |cursor: &Option<Cursor>| {
            cursor
                .as_ref()
                .map(|cursor| cursor.decode(&order, entity))
                .transpose()
        };
        let after = decode(&args.pagination.after)?;
        let before = decode(&args.pagination.before)?;

        let mut edges_selected = false;
        let mut select_node = false;
        let mut node_selections: Vec<&FieldSelection> = vec![];
        let mut page_info = false;
        let mut total_count = false;

        for child in &selection.selections {
            if child.is_introspection() {
                continue;
            }

            if child.name == names.edges {
                edges_selected = true;

                for edge_child in &child.selections {
                    if edge_child.is_introspection() || edge_child.name == names.cursor {
                        continue;
                    }

                    if edge_child.name != names.node {
                        return Err(Error::unsupported_field(
                            format!("{}Edge", entity.name),
                            &edge_child.name,
                        ));
                    }

                    select_node = true;
                    node_selections.extend(&edge_child.selections);
                }
            } else if child.name == names.page_info {
                page_info = true;

                if let Some(unknown) = child
                    .selections
                    .iter()
                    .find(|field| !field.is_introspection() && !names.is_page_info_field(&field.name))
                {
                    return Err(Error::unsupported_field("PageInfo", &unknown.name));
                }
            } else if child.name == names.total_count {
                total_count = true;
            } else {
                return Err(Error::unsupported_field(
                    format!("{}Connection", entity.name),
                    &child.name,
                ));
            }
        }

        let edges = if edges_selected {
            let mut node = self.node(entity.id, node_selections)?;
            let primary_column = (!order.is_identifier_only()).then(|| node.require(order.primary));

            Some(EdgesPlan {
                node,
                select_node,
                primary_column,
            })
        } else {
            None
        };

        let page_size = args.pagination.page_size(self.config);

        if args.pagination.first.is_none() && args.pagination.last.is_none() {
            tracing::debug!(
                entity = %entity.name,
                ?page_size,
                "connection requested without `first` or `last`; using the default page size"
            );
        }

        let plan = ConnectionPlan {
            entity: entity.id,
            order,
            scan: args.pagination.scan(),
            page_size,
            args: args.pagination,
            filter: args.filter,
            edges,
            page_info,
            total_count,
            after,
            before,
        };

        tracing::trace!(entity = %entity.name, order = ?plan.order, scan = ?plan.scan, "planned connection");

        Ok(plan)
    }

    /// Plans the fields and edges selected on rows of `entity`.
    pub(crate) fn node<'s>(
        &self,
        entity: EntityId,
        selections: impl IntoIterator<Item = &'s FieldSelection>,
    ) -> Result<NodePlan> {
        let entity = self.schema.entity(entity);
        let mut plan = NodePlan::new(entity.id, entity.identifier);

        for selection in selections {
            if selection.is_introspection() {
                continue;
            }

            let key = selection.response_key().to_string();

            if let Some(field) = entity.field_by_name(&selection.name) {
                let index = plan.require(field.id);
                plan.fields.push((key, index));
            } else if let Some(edge) = entity.edge_by_name(&selection.name) {
                let edge = self.edge(&mut plan, edge, selection)?;
                plan.edges.push((key, edge));
            } else {
                return Err(Error::unsupported_field(entity.name.as_str(), &selection.name));
            }
        }

        Ok(plan)
    }

    fn edge(&self, parent: &mut NodePlan, edge: &Edge, selection: &FieldSelection) -> Result<EdgePlan> {
        let target = self.schema.entity(edge.target);
        let link = self.link(parent, edge, target);

        let load = match edge.cardinality {
            Cardinality::One => {
                if let Some(name) = selection.arguments.keys().next() {
                    return Err(Error::invalid_argument(format!(
                        "`{}` is a to-one edge and does not accept `{name}`",
                        edge.name
                    )));
                }

                EdgeLoad::One(RelatedPlan {
                    order: OrderSpec::identifier(target),
                    filter: None,
                    node: self.node(target.id, &selection.selections)?,
                })
            }
            Cardinality::Many { paginated: false } => {
                let args = self.arguments(selection, false)?;

                EdgeLoad::List(RelatedPlan {
                    order: OrderSpec::resolve(target, args.order_field.as_deref(), args.direction)?,
                    filter: args.filter,
                    node: self.node(target.id, &selection.selections)?,
                })
            }
            Cardinality::Many { paginated: true } => {
                EdgeLoad::Connection(self.connection(target.id, selection)?)
            }
        };

        Ok(EdgePlan { link, load })
    }

    /// Works out which parent column and which target column hold the
    /// shared key, projecting the parent column if needed.
    fn link(&self, parent: &mut NodePlan, edge: &Edge, target: &Entity) -> Link {
        let (parent_key, partition, join) = match &edge.link {
            EdgeLink::Owned { field } => (
                parent.require(*field),
                self.schema.column(target.identifier),
                None,
            ),
            EdgeLink::Inverse { field } => (0, self.schema.column(*field), None),
            EdgeLink::Through(join_table) => (
                0,
                ColumnRef::new(&join_table.table, &join_table.source_column),
                Some(Join {
                    table: join_table.table.clone(),
                    column: join_table.target_column.clone(),
                    on: self.schema.column(target.identifier),
                }),
            ),
        };

        Link {
            edge: edge.id,
            parent_key,
            partition,
            join,
        }
    }

    fn arguments(&self, selection: &FieldSelection, paginated: bool) -> Result<Arguments> {
        let names = &self.config.names;
        let mut args = Arguments::default();

        for (name, value) in &selection.arguments {
            let is_pagination = *name == names.first
                || *name == names.last
                || *name == names.after
                || *name == names.before;

            if is_pagination && !paginated {
                return Err(Error::invalid_argument(format!(
                    "`{}` is not a connection and does not accept `{name}`",
                    selection.name
                )));
            }

            if *name == names.first {
                args.pagination.first = count(name, value)?;
            } else if *name == names.last {
                args.pagination.last = count(name, value)?;
            } else if *name == names.after {
                args.pagination.after = cursor(name, value)?;
            } else if *name == names.before {
                args.pagination.before = cursor(name, value)?;
            } else if *name == names.order_by {
                self.order_by(value, &mut args)?;
            } else if *name == names.filter {
                args.filter = match value {
                    Argument::Null => None,
                    Argument::Filter(expr) => Some(expr.clone()),
                    _ => return Err(ill_typed(name, "a filter", value)),
                };
            } else {
                return Err(Error::invalid_argument(format!(
                    "unknown argument `{name}` on `{}`",
                    selection.name
                )));
            }
        }

        Ok(args)
    }

    fn order_by(&self, value: &Argument, args: &mut Arguments) -> Result<()> {
        let names = &self.config.names;

        let entries = match value {
            Argument::Null => return Ok(()),
            Argument::Object(entries) => entries,
            _ => return Err(ill_typed(&names.order_by, "an object", value)),
        };

        for (name, value) in entries {
            if *name == names.order_field {
                args.order_field = match value {
                    Argument::Null => None,
                    Argument::Enum(field) | Argument::String(field) => Some(field.clone()),
                    _ => return Err(ill_typed(name, "an enum value", value)),
                };
            } else if *name == names.order_direction {
                args.direction = match value {
                    Argument::Null => None,
                    Argument::Enum(direction) | Argument::String(direction) => {
                        Some(parse_direction(direction)?)
                    }
                    _ => return Err(ill_typed(name, "an enum value", value)),
                };
            } else {
                return Err(Error::invalid_argument(format!(
                    "unknown field `{name}` in `{}`",
                    names.order_by
                )));
            }
        }

        Ok(())
    }
}

fn count(name: &str, value: &Argument) -> Result<Option<i64>> {
    match value {
        Argument::Null => Ok(None),
        Argument::Int(count) => Ok(Some(*count)),
        _ => Err(ill_typed(name, "an integer", value)),
    }
}

fn cursor(name: &str, value: &Argument) -> Result<Option<Cursor>> {
    match value {
        Argument::Null => Ok(None),
        Argument::String(token) => Ok(Some(Cursor::new(token.as_str()))),
        _ => Err(ill_typed(name, "a string", value)),
    }
}

fn parse_direction(direction: &str) -> Result<Direction> {
    if direction.eq_ignore_ascii_case("asc") {
        Ok(Direction::Asc)
    } else if direction.eq_ignore_ascii_case("desc") {
        Ok(Direction::Desc)
    } else {
        Err(Error::invalid_argument(format!(
            "`{direction}` is not an order direction; expected `ASC` or `DESC`"
        )))
    }
}

fn ill_typed(name: &str, expected: &str, value: &Argument) -> Error {
    Error::invalid_argument(format!(
        "`{name}` must be {expected}, got {}",
        value.kind()
    ))
}
