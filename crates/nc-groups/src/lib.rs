//! G-group reference data.
//!
//! A G group is a set of mutually exclusive machine codes (motion type,
//! plane selection, feed type, ...). Modal groups keep their selection until
//! another code of the same group is programmed; non-modal groups act on a
//! single block.

#![deny(unsafe_code)]

pub mod embedded;
pub mod error;
pub mod loader;
pub mod registry;
pub mod types;

pub use crate::error::RegistryError;
pub use crate::registry::{GGroupRegistry, shared_registry};
pub use crate::types::{Effectiveness, GGroup, GGroupEntry, normalize_code};
