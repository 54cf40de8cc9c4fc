use super::{Association, RelationMapping};
use crate::schema::app::Entity;
use crate::{Options, Result};

/// Table configuration for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EntityMapping {
    pub name: String,

    pub table: String,

    /// Primary key column names
    pub primary_key: Vec<String>,

    /// Columns the mapping library must add to the entity's table: the auto
    /// primary key, then foreign key columns in relation order.
    pub added_columns: Vec<String>,
}

impl EntityMapping {
    pub(super) fn build(
        entity: &Entity,
        options: &Options,
        relations: &[RelationMapping],
    ) -> Result<EntityMapping> {
        let table = entity.table_name(options);

        // Entities never used as a relation endpoint may lack a primary key;
        // the mapping library decides what to do with them.
        let primary_key = entity.primary_key(options).unwrap_or_default();

        let mut added_columns = vec![];

        if entity.uses_auto_primary_key(options) {
            added_columns.extend(primary_key.iter().cloned());
        }

        for relation in relations {
            let Association::ForeignKey(foreign_key) = &relation.association else {
                continue;
            };

            if foreign_key.constraint.table != table {
                continue;
            }

            for column in &foreign_key.constraint.columns {
                let declared = entity
                    .fields
                    .iter()
                    .any(|field| field.column_name() == column.as_str());

                if !declared && !added_columns.contains(column) {
                    added_columns.push(column.clone());
                }
            }
        }

        Ok(EntityMapping {
            name: entity.name.clone(),
            table,
            primary_key,
            added_columns,
        })
    }
}
