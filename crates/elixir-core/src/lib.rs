//! Relationship resolution for declaratively mapped entities.
//!
//! Entities and their one-sided relation statements are collected in a
//! [`Registry`](schema::app::Registry). The [`Setup`](schema::Setup)
//! coordinator then pairs every statement with its inverse, synthesizing the
//! missing half where needed, validates the result and produces a
//! [`Mapping`](schema::Mapping) for the relational mapping library.

mod error;
pub use error::Error;

mod options;
pub use options::Options;

pub mod schema;
pub use schema::Setup;

/// A Result type alias that uses Elixir's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
