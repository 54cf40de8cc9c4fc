mod entity;
pub use entity::EntityMapping;

mod relation;
pub use relation::{
    Association, AssociationTable, ForeignKey, ForeignKeyConstraint, RelationMapping, Side,
};

use super::{app::Registry, ResolvedPair};
use crate::{Options, Result};

/// Configuration handed to the relational mapping library once setup has
/// resolved every relation.
///
/// The mapping is built once and remains immutable afterwards. It carries no
/// SQL: each record describes which attributes exist, which columns join them
/// and which tables back many-to-many associations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Mapping {
    /// Per-entity table configuration, in declaration order.
    pub entities: Vec<EntityMapping>,

    /// One record per resolved pair.
    pub relations: Vec<RelationMapping>,
}

impl Mapping {
    /// Builds the mapping for a resolved registry.
    pub fn build(
        registry: &Registry,
        options: &Options,
        pairs: &[ResolvedPair],
    ) -> Result<Mapping> {
        let relations = pairs
            .iter()
            .map(|pair| RelationMapping::build(registry, options, pair))
            .collect::<Result<Vec<_>>>()?;

        let entities = registry
            .all_entities()
            .map(|entity| EntityMapping::build(entity, options, &relations))
            .collect::<Result<Vec<_>>>()?;

        Ok(Mapping {
            entities,
            relations,
        })
    }

    pub fn entity(&self, name: &str) -> Option<&EntityMapping> {
        self.entities.iter().find(|entity| entity.name == name)
    }

    /// Returns the record for the relation `entity::attribute`, whichever side
    /// of the pair it is on.
    pub fn relation(&self, entity: &str, attribute: &str) -> Option<&RelationMapping> {
        self.relations
            .iter()
            .find(|relation| relation.side(entity, attribute).is_some())
    }

    /// Serializes the mapping to JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
