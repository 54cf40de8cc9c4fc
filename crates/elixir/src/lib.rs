//! Declarative relationships for mapped entities.
//!
//! Entities are declared one side at a time: each relation statement only
//! names its target. When the mapping is first needed, every statement is
//! paired with its inverse (synthesizing the missing half when nobody
//! declared it), the pairs are validated and a [`Mapping`] is produced.
//!
//! ```
//! let elixir = elixir::Elixir::new();
//!
//! elixir.declare(|registry| {
//!     registry.entity("Director")?.has_many("movies", "Movie")?;
//!     registry.entity("Movie")?;
//!     Ok(())
//! })?;
//!
//! let movie = elixir.relation("Movie", "director")?;
//! assert!(movie.side_b.as_ref().is_some_and(|side| side.synthesized));
//! # Ok::<_, elixir::Error>(())
//! ```

mod builder;
pub use builder::Builder;

mod options;
pub use options::{load_options, parse_options};

pub use elixir_core::{
    bail,
    schema::{
        app::{Entity, EntityBuilder, OnDelete, Registry, RelationBuilder, RelationKind},
        mapping::{Association, AssociationTable, EntityMapping, ForeignKey, RelationMapping, Side},
        Mapping, Provenance, Resolved, SetupState,
    },
    Error, Options, Result, Setup,
};

use std::sync::{Arc, OnceLock};

/// Handle to a set of entity declarations and their resolved mapping.
///
/// Cloning the handle is cheap; clones share the same declarations and the
/// same setup outcome.
#[derive(Debug, Clone)]
pub struct Elixir {
    setup: Arc<Setup>,
}

impl Elixir {
    /// Creates a handle with default options.
    pub fn new() -> Elixir {
        Elixir::builder().build()
    }

    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The process-wide default instance, created on first use with default
    /// options.
    pub fn global() -> &'static Elixir {
        static GLOBAL: OnceLock<Elixir> = OnceLock::new();
        GLOBAL.get_or_init(Elixir::new)
    }

    pub fn options(&self) -> &Options {
        self.setup.options()
    }

    pub fn state(&self) -> SetupState {
        self.setup.state()
    }

    /// Declares entities. Fails once setup has run.
    pub fn declare<R>(&self, f: impl FnOnce(&mut Registry) -> Result<R>) -> Result<R> {
        self.setup.declare(f)
    }

    /// Resolves every declared relation. Only the first call does any work;
    /// later calls return the cached outcome.
    pub fn setup_all(&self) -> Result<Arc<Resolved>> {
        self.setup.ensure_resolved()
    }

    /// The resolved mapping, running setup if needed.
    pub fn mapping(&self) -> Result<Mapping> {
        Ok(self.setup_all()?.mapping.clone())
    }

    /// The mapping record for the relation `entity::attribute`, running setup
    /// if needed.
    pub fn relation(&self, entity: &str, attribute: &str) -> Result<RelationMapping> {
        let resolved = self.setup_all()?;

        match resolved.mapping.relation(entity, attribute) {
            Some(relation) => Ok(relation.clone()),
            None => bail!("`{entity}::{attribute}` is not a relation"),
        }
    }
}

impl Default for Elixir {
    fn default() -> Self {
        Elixir::new()
    }
}

impl From<Setup> for Elixir {
    fn from(setup: Setup) -> Self {
        Elixir {
            setup: Arc::new(setup),
        }
    }
}
