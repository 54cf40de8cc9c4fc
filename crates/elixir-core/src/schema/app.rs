//! Declared entities and relation statements

mod entity;
pub use entity::{Entity, EntityBuilder, EntityId};

mod field;
pub use field::{Field, FieldBuilder};

mod registry;
pub use registry::Registry;

mod relation;
pub use relation::{OnDelete, Origin, Relation, RelationBuilder, RelationId, RelationKind};

use super::Name;
