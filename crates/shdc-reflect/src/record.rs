//! Reflection documents, as written by the external cross-compiler.
//!
//! ```json
//! {
//!   "inputs":  [ { "name": "position", "type": "vec4", "slot": 0 } ],
//!   "outputs": [ { "name": "color", "type": "vec4" } ],
//!   "uniform_blocks": [ {
//!     "type": "vsParams", "name": "params", "slot": 0, "size": 64,
//!     "members": [ { "name": "mvp", "type": "mat4", "num": 1, "offset": 0 } ]
//!   } ],
//!   "textures": [ { "name": "tex", "slot": 0, "type": "sampler2D" } ]
//! }
//! ```
//!
//! Type names are kept as written; they are checked against the legal sets
//! by validation, not while loading.

use serde::Deserialize;
use shdc_lang::{ShdcError, ShdcResult};

use crate::types::{SamplerType, ValueType};

/// Interface of one shader for one target variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReflectionRecord {
    #[serde(default)]
    pub inputs: Vec<StageVar>,
    #[serde(default)]
    pub outputs: Vec<StageVar>,
    #[serde(default)]
    pub uniform_blocks: Vec<UniformBlock>,
    #[serde(default)]
    pub textures: Vec<Texture>,
}

/// A stage input or output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StageVar {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub slot: Option<u32>,
}

/// A named group of uniforms bound to one slot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UniformBlock {
    /// Block type name, used in generated struct names
    #[serde(rename = "type")]
    pub type_name: String,
    /// Instance name
    pub name: String,
    #[serde(default)]
    pub slot: u32,
    /// Byte size reported by the compiler
    pub size: u32,
    #[serde(default)]
    pub members: Vec<UniformMember>,
}

/// One scalar, vector or matrix field of a uniform block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UniformMember {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Element count, 1 for a plain member
    #[serde(default = "one")]
    pub num: u32,
    pub offset: u32,
}

/// A sampler binding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Texture {
    pub name: String,
    #[serde(default)]
    pub slot: Option<u32>,
    #[serde(rename = "type")]
    pub ty: String,
}

fn one() -> u32 {
    1
}

impl ReflectionRecord {
    /// Parse a reflection document.
    ///
    /// `origin` names the document in the error message.
    pub fn from_json(text: &str, origin: &str) -> ShdcResult<Self> {
        serde_json::from_str(text).map_err(|e| {
            ShdcError::reflection(format!("malformed reflection document '{}': {}", origin, e))
        })
    }
}

impl StageVar {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        StageVar {
            name: name.into(),
            ty: ty.into(),
            slot: None,
        }
    }

    pub fn value_type(&self) -> Option<ValueType> {
        ValueType::from_name(&self.ty)
    }
}

impl UniformMember {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, num: u32, offset: u32) -> Self {
        UniformMember {
            name: name.into(),
            ty: ty.into(),
            num,
            offset,
        }
    }

    pub fn value_type(&self) -> Option<ValueType> {
        ValueType::from_name(&self.ty)
    }

    pub fn is_array(&self) -> bool {
        self.num > 1
    }
}

impl Texture {
    pub fn sampler_type(&self) -> Option<SamplerType> {
        SamplerType::from_name(&self.ty)
    }
}
