use super::{app::Registry, resolve, Mapping, ResolvedPair};
use crate::{Error, Options, Result};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Runs relation resolution exactly once, after every entity is declared.
///
/// Declarations are accepted while the setup is collecting. The first call to
/// [`Setup::ensure_resolved`] resolves the complete declaration set; the
/// outcome is cached, so later calls return the same mapping or the same
/// error. Concurrent first calls are serialized by a lock and only one of
/// them runs the resolution.
///
/// Declaring entities from several threads at once is not supported:
/// declaration is expected to finish before the mapping is first used.
#[derive(Debug)]
pub struct Setup {
    options: Options,
    state: Mutex<State>,
}

/// Observable lifecycle of a [`Setup`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SetupState {
    /// Declarations are accepted; nothing has been resolved.
    Collecting,

    /// Resolution is running.
    Resolving,

    /// Resolution succeeded. Terminal.
    Resolved,

    /// Resolution failed. Terminal; the error is returned on every use.
    Failed,
}

/// Outcome of a successful setup.
#[derive(Debug)]
pub struct Resolved {
    /// The declarations, including synthesized inverses
    pub registry: Registry,

    pub pairs: Vec<ResolvedPair>,

    pub mapping: Mapping,
}

#[derive(Debug)]
enum State {
    Collecting {
        registry: Registry,

        /// First error raised while declaring. Setup fails with it.
        error: Option<Error>,
    },
    Resolving,
    Resolved(Arc<Resolved>),
    Failed(Error),
}

impl Setup {
    pub fn new(options: Options) -> Setup {
        Setup::with_registry(Registry::new(), options)
    }

    /// Creates a setup collecting into an existing registry.
    pub fn with_registry(registry: Registry, options: Options) -> Setup {
        Setup {
            options,
            state: Mutex::new(State::Collecting {
                registry,
                error: None,
            }),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn state(&self) -> SetupState {
        match &*self.lock() {
            State::Collecting { .. } => SetupState::Collecting,
            State::Resolving => SetupState::Resolving,
            State::Resolved(_) => SetupState::Resolved,
            State::Failed(_) => SetupState::Failed,
        }
    }

    /// Runs `f` against the registry while declarations are still accepted.
    ///
    /// An error returned by `f` is also remembered: setup will fail with it
    /// rather than resolve a partial declaration set.
    pub fn declare<R>(&self, f: impl FnOnce(&mut Registry) -> Result<R>) -> Result<R> {
        let mut state = self.lock();

        let State::Collecting { registry, error } = &mut *state else {
            return Err(Error::invalid_schema(
                "entities cannot be declared after setup has run",
            ));
        };

        let result = f(registry);

        if let Err(err) = &result {
            error.get_or_insert_with(|| err.clone());
        }

        result
    }

    /// Resolves all declarations if that has not happened yet.
    pub fn ensure_resolved(&self) -> Result<Arc<Resolved>> {
        let mut state = self.lock();

        let (registry, error) = match std::mem::replace(&mut *state, State::Resolving) {
            State::Collecting { registry, error } => (registry, error),
            State::Resolved(resolved) => {
                *state = State::Resolved(resolved.clone());
                return Ok(resolved);
            }
            State::Failed(err) => {
                *state = State::Failed(err.clone());
                return Err(err);
            }
            State::Resolving => {
                // Only reachable if a previous resolution panicked.
                let err = Error::invalid_schema("setup was interrupted");
                *state = State::Failed(err.clone());
                return Err(err);
            }
        };

        let outcome = match error {
            Some(err) => Err(err),
            None => run(registry, &self.options),
        };

        match outcome {
            Ok(resolved) => {
                tracing::info!(
                    entities = resolved.registry.len(),
                    relations = resolved.pairs.len(),
                    "relation setup complete"
                );

                let resolved = Arc::new(resolved);
                *state = State::Resolved(resolved.clone());
                Ok(resolved)
            }
            Err(err) => {
                tracing::warn!(error = %err, "relation setup failed");

                *state = State::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Setup {
    fn default() -> Self {
        Setup::new(Options::default())
    }
}

fn run(mut registry: Registry, options: &Options) -> Result<Resolved> {
    let pairs = resolve(&mut registry, options)?;
    let mapping = Mapping::build(&registry, options, &pairs)?;

    Ok(Resolved {
        registry,
        pairs,
        mapping,
    })
}
