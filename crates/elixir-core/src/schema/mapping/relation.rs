use crate::schema::app::{Entity, OnDelete, Registry, Relation, RelationKind};
use crate::schema::{AssociationKey, Provenance, ResolvedPair};
use crate::{Error, Options, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RelationMapping {
    pub side_a: Side,

    /// `None` for unidirectional relations
    pub side_b: Option<Side>,

    pub association: Association,

    pub provenance: Provenance,
}

/// One attribute of an association, as the mapping library sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Side {
    pub entity: String,

    pub attribute: String,

    pub kind: RelationKind,

    /// Columns joining this side to the association: the foreign key columns,
    /// or the association table columns referencing this side's entity.
    pub join_columns: Vec<String>,

    /// True if the attribute holds a collection
    pub collection: bool,

    pub order_by: Vec<String>,

    pub filter: Option<String>,

    pub on_delete: Option<OnDelete>,

    /// True if the attribute was synthesized as an inverse
    pub synthesized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum Association {
    ForeignKey(ForeignKey),
    Table(AssociationTable),
}

/// Foreign key columns added to an entity table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ForeignKey {
    pub constraint: ForeignKeyConstraint,

    pub nullable: bool,
}

/// Association table backing a many-to-many relation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AssociationTable {
    pub name: String,

    /// One constraint per endpoint: the first side's entity, then the
    /// second's.
    pub constraints: [ForeignKeyConstraint; 2],
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ForeignKeyConstraint {
    pub name: String,

    /// Table holding the columns
    pub table: String,

    pub columns: Vec<String>,

    pub referenced_table: String,

    pub referenced_columns: Vec<String>,
}

impl RelationMapping {
    pub(super) fn build(
        registry: &Registry,
        options: &Options,
        pair: &ResolvedPair,
    ) -> Result<RelationMapping> {
        let relation_a = registry.relation(pair.side_a);
        let relation_b = pair.side_b.map(|id| registry.relation(id));

        let entity_a = registry.get(pair.side_a.entity);
        let entity_b = match registry.target_of(pair.side_a) {
            Some(target) => registry.get(target),
            None => {
                return Err(Error::unknown_entity(
                    &entity_a.name,
                    &relation_a.name,
                    &relation_a.target,
                ))
            }
        };

        let on_delete = relation_a
            .on_delete
            .or_else(|| relation_b.and_then(|relation| relation.on_delete))
            .or(options.default_on_delete);

        let (association, join_a, join_b) = match &pair.association {
            AssociationKey::ForeignKey { table, columns } => {
                let (owner, referenced, relation) = match relation_b {
                    Some(relation_b) if relation_b.kind.owns_foreign_key() => {
                        (entity_b, entity_a, Some(relation_b))
                    }
                    _ if relation_a.kind.owns_foreign_key() => {
                        (entity_a, entity_b, Some(relation_a))
                    }
                    // One-way has_many / has_one: the target holds the key.
                    _ => (entity_b, entity_a, None),
                };
                debug_assert_eq!(*table, owner.table_name(options));

                let constraint = ForeignKeyConstraint {
                    name: match relation {
                        Some(relation) => format!("{}_fk", relation.name),
                        None => format!("{}_fk", referenced.snake_name()),
                    },
                    table: table.clone(),
                    columns: columns.clone(),
                    referenced_table: referenced.table_name(options),
                    referenced_columns: referenced.primary_key(options)?,
                };

                let nullable =
                    !relation_a.required && !relation_b.is_some_and(|relation| relation.required);

                (
                    Association::ForeignKey(ForeignKey {
                        constraint,
                        nullable,
                    }),
                    columns.clone(),
                    columns.clone(),
                )
            }
            AssociationKey::Table { name } => {
                let self_referential = entity_a.id == entity_b.id;

                let first = endpoint(name, entity_a, self_referential.then_some("1"), options)?;
                let second = endpoint(name, entity_b, self_referential.then_some("2"), options)?;

                let (join_a, join_b) = (first.columns.clone(), second.columns.clone());

                (
                    Association::Table(AssociationTable {
                        name: name.clone(),
                        constraints: [first, second],
                    }),
                    join_a,
                    join_b,
                )
            }
        };

        Ok(RelationMapping {
            side_a: Side::build(entity_a, relation_a, join_a, on_delete),
            side_b: relation_b.map(|relation| Side::build(entity_b, relation, join_b, on_delete)),
            association,
            provenance: pair.provenance,
        })
    }

    /// Returns the side for `entity::attribute`, if it belongs to this record.
    pub fn side(&self, entity: &str, attribute: &str) -> Option<&Side> {
        std::iter::once(&self.side_a)
            .chain(self.side_b.as_ref())
            .find(|side| side.entity == entity && side.attribute == attribute)
    }

    pub fn association_table(&self) -> Option<&AssociationTable> {
        match &self.association {
            Association::Table(table) => Some(table),
            Association::ForeignKey(_) => None,
        }
    }

    pub fn foreign_key(&self) -> Option<&ForeignKey> {
        match &self.association {
            Association::ForeignKey(foreign_key) => Some(foreign_key),
            Association::Table(_) => None,
        }
    }
}

impl Side {
    fn build(
        entity: &Entity,
        relation: &Relation,
        join_columns: Vec<String>,
        on_delete: Option<OnDelete>,
    ) -> Side {
        Side {
            entity: entity.name.clone(),
            attribute: relation.name.clone(),
            kind: relation.kind,
            join_columns,
            collection: relation.kind.is_collection(),
            order_by: relation.order_by.clone(),
            filter: relation.filter.clone(),
            on_delete,
            synthesized: relation.is_synthesized(),
        }
    }
}

/// Columns of an association table referencing one endpoint entity. On a
/// self-referential association each endpoint gets a suffix so the column
/// names do not collide.
fn endpoint(
    table: &str,
    entity: &Entity,
    suffix: Option<&str>,
    options: &Options,
) -> Result<ForeignKeyConstraint> {
    let entity_table = entity.table_name(options);
    let primary_key = entity.primary_key(options)?;

    let columns = primary_key
        .iter()
        .map(|key| format!("{entity_table}_{key}{}", suffix.unwrap_or("")))
        .collect();

    Ok(ForeignKeyConstraint {
        name: format!("{entity_table}{}_fk", suffix.unwrap_or("")),
        table: table.to_string(),
        columns,
        referenced_table: entity_table,
        referenced_columns: primary_key,
    })
}
