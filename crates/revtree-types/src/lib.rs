//! Foundation types for revtree.
//!
//! This crate provides the identity and value types shared by every other
//! revtree crate: the opaque [`Revision`] token that pins a consistent view of
//! the whole tree, absolute node path helpers, and the scalar value model used
//! for node properties.
//!
//! # Key Types
//!
//! - [`Revision`] -- Opaque token naming an immutable point-in-time tree view
//! - [`CoreValue`] -- A single typed scalar (integer, floating point, boolean, string)
//! - [`PropertyValue`] -- A single scalar or an ordered sequence of scalars
//! - [`ValueFactory`] -- Collaborator that constructs typed value handles

pub mod error;
pub mod factory;
pub mod path;
pub mod revision;
pub mod value;

pub use error::{TypeError, TypeResult};
pub use factory::{PlainValueFactory, ValueFactory};
pub use path::{child_path, is_root, segments, validate_name, validate_path, ROOT};
pub use revision::Revision;
pub use value::{CoreValue, PropertyValue};
