use super::Error;

/// Error when two paired relations have kinds that cannot describe one
/// association, e.g. two `belongs_to` both owning the foreign key.
#[derive(Debug)]
pub(super) struct IncompatibleRelationKindError {
    lhs: Box<str>,
    lhs_kind: &'static str,
    rhs: Box<str>,
    rhs_kind: &'static str,
}

impl std::error::Error for IncompatibleRelationKindError {}

impl core::fmt::Display for IncompatibleRelationKindError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "incompatible relation kinds: `{}` ({}) cannot pair with `{}` ({})",
            self.lhs, self.lhs_kind, self.rhs, self.rhs_kind
        )
    }
}

impl Error {
    /// Creates an incompatible relation kind error.
    pub fn incompatible_relation_kind(
        lhs: impl Into<String>,
        lhs_kind: &'static str,
        rhs: impl Into<String>,
        rhs_kind: &'static str,
    ) -> Error {
        Error::from(super::ErrorKind::IncompatibleRelationKind(
            IncompatibleRelationKindError {
                lhs: lhs.into().into(),
                lhs_kind,
                rhs: rhs.into().into(),
                rhs_kind,
            },
        ))
    }

    /// Returns `true` if this error is an incompatible relation kind error.
    pub fn is_incompatible_relation_kind(&self) -> bool {
        matches!(
            self.kind(),
            super::ErrorKind::IncompatibleRelationKind(_)
        )
    }
}
