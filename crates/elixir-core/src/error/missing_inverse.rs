use super::Error;

/// Error when a relation names an inverse that the target cannot provide.
#[derive(Debug)]
pub(super) struct MissingInverseError {
    relation: Box<str>,
    target: Box<str>,
    inverse: Box<str>,
    reason: Option<Box<str>>,
}

impl std::error::Error for MissingInverseError {}

impl core::fmt::Display for MissingInverseError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "missing inverse: `{}` names inverse `{}`, ",
            self.relation, self.inverse
        )?;
        match &self.reason {
            Some(reason) => f.write_str(reason),
            None => write!(f, "but `{}` has no relation with that name", self.target),
        }
    }
}

impl Error {
    /// Creates a missing inverse error.
    ///
    /// `relation` is the fully qualified name of the relation declaring the
    /// inverse, `target` the entity that was searched.
    pub fn missing_inverse(
        relation: impl Into<String>,
        target: impl Into<String>,
        inverse: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::MissingInverse(MissingInverseError {
            relation: relation.into().into(),
            target: target.into().into(),
            inverse: inverse.into().into(),
            reason: None,
        }))
    }

    /// Creates a missing inverse error where the named relation exists but
    /// cannot act as the inverse.
    pub fn invalid_inverse(
        relation: impl Into<String>,
        target: impl Into<String>,
        inverse: impl Into<String>,
        reason: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::MissingInverse(MissingInverseError {
            relation: relation.into().into(),
            target: target.into().into(),
            inverse: inverse.into().into(),
            reason: Some(reason.into().into()),
        }))
    }

    /// Returns `true` if this error is a missing inverse error.
    pub fn is_missing_inverse(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MissingInverse(_))
    }
}
