use super::Error;

/// Error when two relations resolved as one association disagree on what
/// backs it: association table, foreign key columns, inverse names or delete
/// policy.
#[derive(Debug)]
pub(super) struct ConflictingAssociationError {
    lhs: Box<str>,
    lhs_identity: Box<str>,
    rhs: Box<str>,
    rhs_identity: Box<str>,
}

impl std::error::Error for ConflictingAssociationError {}

impl core::fmt::Display for ConflictingAssociationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "conflicting association: `{}` uses `{}` but `{}` uses `{}`",
            self.lhs, self.lhs_identity, self.rhs, self.rhs_identity
        )
    }
}

impl Error {
    /// Creates a conflicting association error.
    ///
    /// Each side is a fully qualified relation name with the identity it
    /// declared.
    pub fn conflicting_association(
        lhs: impl Into<String>,
        lhs_identity: impl Into<String>,
        rhs: impl Into<String>,
        rhs_identity: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::ConflictingAssociation(
            ConflictingAssociationError {
                lhs: lhs.into().into(),
                lhs_identity: lhs_identity.into().into(),
                rhs: rhs.into().into(),
                rhs_identity: rhs_identity.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a conflicting association error.
    pub fn is_conflicting_association(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ConflictingAssociation(_))
    }
}
