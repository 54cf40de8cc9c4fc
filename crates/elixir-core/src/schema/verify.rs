mod association_identity;
mod relation_kinds;

use super::{
    app::{Registry, Relation},
    resolve::{AssociationKey, Pairing, ResolvedPair},
};
use crate::{Error, Options, Result};

use std::collections::HashMap;

struct Verify<'a> {
    registry: &'a Registry,
}

/// Checks that the sides of a pair can describe one association.
///
/// Runs for every pair before its association identity is derived. Any
/// failure aborts setup.
pub(super) fn verify_pair(registry: &Registry, pairing: &Pairing) -> Result<()> {
    let verify = Verify { registry };
    let side_a = registry.relation(pairing.side_a);

    let Some(side_b) = pairing.side_b.map(|id| registry.relation(id)) else {
        return verify.verify_association_table_is_many_to_many(side_a);
    };

    verify.verify_association_table_is_many_to_many(side_a)?;
    verify.verify_association_table_is_many_to_many(side_b)?;
    verify.verify_kinds_pair(side_a, side_b)?;
    verify.verify_association_tables_match(side_a, side_b)?;
    verify.verify_foreign_keys_match(side_a, side_b)?;
    verify.verify_on_delete_matches(side_a, side_b)?;
    Ok(())
}

/// Checks that no two pairs share an association table, and that no
/// association table reuses an entity's table.
pub(super) fn verify_associations_are_unique(
    registry: &Registry,
    options: &Options,
    pairs: &[ResolvedPair],
) -> Result<()> {
    let entity_tables: HashMap<_, _> = registry
        .all_entities()
        .map(|entity| (entity.table_name(options), &entity.name))
        .collect();

    let mut tables = HashMap::new();

    for pair in pairs {
        let AssociationKey::Table { name } = &pair.association else {
            continue;
        };

        if let Some(entity) = entity_tables.get(name) {
            return Err(Error::conflicting_association(
                registry.full_name(pair.side_a),
                name,
                *entity,
                name,
            ));
        }

        if let Some(first) = tables.insert(name, pair.side_a) {
            return Err(Error::conflicting_association(
                registry.full_name(first),
                name,
                registry.full_name(pair.side_a),
                name,
            ));
        }
    }

    Ok(())
}

impl Verify<'_> {
    fn full_name(&self, relation: &Relation) -> String {
        self.registry.full_name(relation.id)
    }
}
