use super::*;
use crate::schema::app::RelationKind;

impl Verify<'_> {
    /// Two `belongs_to` would both own the foreign key; two collections or a
    /// collection and a `has_one` would have nobody owning it; a many-to-many
    /// only pairs with another many-to-many.
    pub(super) fn verify_kinds_pair(&self, side_a: &Relation, side_b: &Relation) -> Result<()> {
        if side_a.kind.pairs_with(side_b.kind) {
            return Ok(());
        }

        Err(Error::incompatible_relation_kind(
            self.full_name(side_a),
            side_a.kind.as_str(),
            self.full_name(side_b),
            side_b.kind.as_str(),
        ))
    }

    pub(super) fn verify_association_table_is_many_to_many(
        &self,
        relation: &Relation,
    ) -> Result<()> {
        match &relation.association {
            Some(table) if relation.kind != RelationKind::ManyToMany => {
                Err(Error::invalid_schema(format!(
                    "`{}` is a {} relation and cannot use association table `{table}`",
                    self.full_name(relation),
                    relation.kind,
                )))
            }
            _ => Ok(()),
        }
    }
}
