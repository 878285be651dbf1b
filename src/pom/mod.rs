//! The descriptor's domain vocabulary.
//!
//! - [`coordinate`] - requested coordinates and their identity keys
//! - [`properties`] - property tables and `${...}` expansion
//! - [`view`] - the structured view extracted from a parsed document

pub mod coordinate;
pub mod properties;
pub mod view;

pub use coordinate::{Coordinate, DEFAULT_TYPE, IdentityKey};
pub use properties::{PropertyTable, Unresolved, single_property};
pub use view::{DeclaredDependency, ParentRef, PomView, PropertyDecl, RelativePath, extract};
