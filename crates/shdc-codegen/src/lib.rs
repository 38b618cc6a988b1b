//! Back end of the shader library compiler.
//!
//! Turns a validated library plus its reflection into the artifact pair a
//! runtime embeds: a declarations file and a definitions file.
//! - [`BlockLayout`] places uniform block members and their padding
//! - [`type_hash`] fingerprints a block's member types
//! - a [`Backend`] writes the artifacts; [`CBackend`] emits C

mod backend;
mod c;
mod hash;
mod layout;

pub use backend::{Artifacts, Backend, Unit};
pub use c::CBackend;
pub use hash::type_hash;
pub use layout::{round_up, BlockLayout, Field};

pub use shdc_reflect::{ErrorKind, ShdcError, ShdcResult};
