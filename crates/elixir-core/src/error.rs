mod adhoc;
mod ambiguous_relation;
mod conflicting_association;
mod duplicate_name;
mod incompatible_relation_kind;
mod invalid_schema;
mod missing_inverse;
mod unknown_entity;

use adhoc::AdhocError;
use ambiguous_relation::AmbiguousRelationError;
use conflicting_association::ConflictingAssociationError;
use duplicate_name::DuplicateNameError;
use incompatible_relation_kind::IncompatibleRelationKindError;
use invalid_schema::InvalidSchemaError;
use missing_inverse::MissingInverseError;
use std::sync::Arc;
use unknown_entity::UnknownEntityError;

/// Returns early with an ad-hoc [`Error`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// An error raised while declaring or resolving entities.
///
/// Every error is a configuration error: none of them are retryable. The type
/// is a single pointer wide and cheap to clone, which lets the setup
/// coordinator cache a failure and hand the same error to every caller.
#[derive(Clone)]
pub struct Error {
    inner: Arc<ErrorKind>,
}

impl Error {
    /// Returns `true` if both values point at the same underlying error.
    pub fn ptr_eq(&self, other: &Error) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn kind(&self) -> &ErrorKind {
        &self.inner
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => err.source(),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self.kind(), f)
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error").field("kind", self.kind()).finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    DuplicateName(DuplicateNameError),
    MissingInverse(MissingInverseError),
    AmbiguousRelation(AmbiguousRelationError),
    ConflictingAssociation(ConflictingAssociationError),
    IncompatibleRelationKind(IncompatibleRelationKindError),
    UnknownEntity(UnknownEntityError),
    InvalidSchema(InvalidSchemaError),
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            DuplicateName(err) => core::fmt::Display::fmt(err, f),
            MissingInverse(err) => core::fmt::Display::fmt(err, f),
            AmbiguousRelation(err) => core::fmt::Display::fmt(err, f),
            ConflictingAssociation(err) => core::fmt::Display::fmt(err, f),
            IncompatibleRelationKind(err) => core::fmt::Display::fmt(err, f),
            UnknownEntity(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Arc::new(kind),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        // Ensure Error stays at one word (size of pointer/Arc)
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("test error: {}", 42));
        assert_eq!(err.to_string(), "test error: 42");
    }

    #[test]
    fn predicates_match_the_kind() {
        let err = Error::unknown_entity("Animal", "owner", "Person");

        assert!(err.is_unknown_entity());
        assert!(!err.is_duplicate_name());
        assert_eq!(
            err.to_string(),
            "unknown entity: `Animal::owner` references `Person`, which was never declared"
        );
    }

    #[test]
    fn clones_share_the_same_error() {
        let err = Error::duplicate_field("User", "name");
        let clone = err.clone();

        assert!(err.ptr_eq(&clone));
        assert!(!err.ptr_eq(&Error::duplicate_field("User", "name")));
    }

    #[test]
    fn anyhow_bridge_keeps_the_outer_message() {
        let anyhow_err = anyhow::anyhow!("file not found").context("failed to read options");
        let our_err: Error = anyhow_err.into();

        assert_eq!(our_err.to_string(), "failed to read options");
        assert!(std::error::Error::source(&our_err).is_some());
    }

    #[test]
    fn ambiguous_relation_lists_every_candidate() {
        let err = Error::ambiguous_relation(
            "Author::book",
            vec!["Book::writer".into(), "Book::editor".into()],
        );
        assert_eq!(
            err.to_string(),
            "ambiguous relation: `Author::book` matches several inverse candidates \
             (`Book::writer`, `Book::editor`); name the inverse explicitly"
        );
    }

    #[test]
    fn conflicting_association_lists_both_identities() {
        let err = Error::conflicting_association("A::bs", "a_b", "B::as_", "ab_link");
        assert_eq!(
            err.to_string(),
            "conflicting association: `A::bs` uses `a_b` but `B::as_` uses `ab_link`"
        );
    }
}
