//! Reflection data for compiled shaders, and the checks that run on it.
//!
//! The external compile step produces, for every shader and every requested
//! target variant, a [`ReflectionRecord`] describing the shader's inputs,
//! outputs, uniform blocks and textures. Those records are collected in a
//! [`ReflectionStore`] and checked against the library by [`validate`].

mod lang;
mod record;
mod store;
mod types;
mod validate;

pub use lang::{Family, Packing, ShaderLang};
pub use record::{ReflectionRecord, StageVar, Texture, UniformBlock, UniformMember};
pub use store::{CompiledVariant, Payload, ReflectionStore};
pub use types::{SamplerType, ValueType, ARRAY_UNIFORM_TYPES, INPUT_TYPES, UNIFORM_TYPES};
pub use validate::validate;

pub use shdc_lang::{ErrorKind, ShdcError, ShdcResult};
