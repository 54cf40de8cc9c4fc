use super::*;

impl Verify<'_> {
    /// Explicit association tables on both sides must name the same table. A
    /// side without one inherits the other's.
    pub(super) fn verify_association_tables_match(
        &self,
        side_a: &Relation,
        side_b: &Relation,
    ) -> Result<()> {
        match (&side_a.association, &side_b.association) {
            (Some(lhs), Some(rhs)) if lhs != rhs => Err(Error::conflicting_association(
                self.full_name(side_a),
                lhs,
                self.full_name(side_b),
                rhs,
            )),
            _ => Ok(()),
        }
    }

    pub(super) fn verify_foreign_keys_match(
        &self,
        side_a: &Relation,
        side_b: &Relation,
    ) -> Result<()> {
        if side_a.foreign_key.is_empty()
            || side_b.foreign_key.is_empty()
            || side_a.foreign_key == side_b.foreign_key
        {
            return Ok(());
        }

        Err(Error::conflicting_association(
            self.full_name(side_a),
            side_a.foreign_key.join(", "),
            self.full_name(side_b),
            side_b.foreign_key.join(", "),
        ))
    }

    pub(super) fn verify_on_delete_matches(
        &self,
        side_a: &Relation,
        side_b: &Relation,
    ) -> Result<()> {
        match (side_a.on_delete, side_b.on_delete) {
            (Some(lhs), Some(rhs)) if lhs != rhs => Err(Error::conflicting_association(
                self.full_name(side_a),
                format!("on_delete {}", lhs.as_str()),
                self.full_name(side_b),
                format!("on_delete {}", rhs.as_str()),
            )),
            _ => Ok(()),
        }
    }
}
