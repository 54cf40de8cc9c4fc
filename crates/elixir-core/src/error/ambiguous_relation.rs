use super::Error;

/// Error when more than one relation could be the inverse of another.
#[derive(Debug)]
pub(super) struct AmbiguousRelationError {
    relation: Box<str>,
    candidates: Vec<String>,
}

impl std::error::Error for AmbiguousRelationError {}

impl core::fmt::Display for AmbiguousRelationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "ambiguous relation: `{}` matches several inverse candidates (",
            self.relation
        )?;
        for (i, candidate) in self.candidates.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "`{candidate}`")?;
        }
        f.write_str("); name the inverse explicitly")
    }
}

impl Error {
    /// Creates an ambiguous relation error listing every candidate.
    pub fn ambiguous_relation(relation: impl Into<String>, candidates: Vec<String>) -> Error {
        Error::from(super::ErrorKind::AmbiguousRelation(AmbiguousRelationError {
            relation: relation.into().into(),
            candidates,
        }))
    }

    /// Returns `true` if this error is an ambiguous relation error.
    pub fn is_ambiguous_relation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::AmbiguousRelation(_))
    }
}
