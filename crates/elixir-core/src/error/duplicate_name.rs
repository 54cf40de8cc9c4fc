use super::Error;

/// Error when a name is declared twice.
///
/// This occurs when:
/// - Two entities are registered under the same name
/// - Two fields or relations on one entity claim the same attribute name
#[derive(Debug)]
pub(super) struct DuplicateNameError {
    entity: Box<str>,
    attribute: Option<Box<str>>,
}

impl std::error::Error for DuplicateNameError {}

impl core::fmt::Display for DuplicateNameError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.attribute {
            Some(attribute) => write!(
                f,
                "duplicate name: `{}::{}` is declared more than once",
                self.entity, attribute
            ),
            None => write!(
                f,
                "duplicate name: entity `{}` is declared more than once",
                self.entity
            ),
        }
    }
}

impl Error {
    /// Creates a duplicate name error for an entity declared twice.
    pub fn duplicate_entity(entity: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateName(DuplicateNameError {
            entity: entity.into().into(),
            attribute: None,
        }))
    }

    /// Creates a duplicate name error for an attribute declared twice on one
    /// entity.
    pub fn duplicate_field(entity: impl Into<String>, attribute: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateName(DuplicateNameError {
            entity: entity.into().into(),
            attribute: Some(attribute.into().into()),
        }))
    }

    /// Returns `true` if this error is a duplicate name error.
    pub fn is_duplicate_name(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DuplicateName(_))
    }
}
