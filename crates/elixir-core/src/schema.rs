pub mod app;

pub mod mapping;
pub use mapping::Mapping;

mod name;
pub use name::Name;

mod resolve;
pub use resolve::{resolve, AssociationKey, Provenance, ResolvedPair};

mod setup;
pub use setup::{Resolved, Setup, SetupState};

mod verify;
