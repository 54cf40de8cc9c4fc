use super::Error;

/// Error when a relation targets an entity that was never declared.
#[derive(Debug)]
pub(super) struct UnknownEntityError {
    entity: Box<str>,
    relation: Box<str>,
    target: Box<str>,
}

impl std::error::Error for UnknownEntityError {}

impl core::fmt::Display for UnknownEntityError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unknown entity: `{}::{}` references `{}`, which was never declared",
            self.entity, self.relation, self.target
        )
    }
}

impl Error {
    /// Creates an unknown entity error for a dangling forward reference.
    pub fn unknown_entity(
        entity: impl Into<String>,
        relation: impl Into<String>,
        target: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::UnknownEntity(UnknownEntityError {
            entity: entity.into().into(),
            relation: relation.into().into(),
            target: target.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown entity error.
    pub fn is_unknown_entity(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownEntity(_))
    }
}
