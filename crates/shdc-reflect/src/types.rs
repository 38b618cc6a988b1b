//! Value and sampler type tables.

use core::fmt;

/// Scalar, vector and matrix types that can appear as stage inputs,
/// outputs or uniform block members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

/// Types allowed for a uniform block member with an element count of 1.
pub const UNIFORM_TYPES: &[ValueType] = &[
    ValueType::Mat4,
    ValueType::Mat2,
    ValueType::Vec4,
    ValueType::Vec3,
    ValueType::Vec2,
    ValueType::Float,
];

/// Types allowed for array members. Their sizes are multiples of 16, so
/// std140 array strides add no hidden padding.
pub const ARRAY_UNIFORM_TYPES: &[ValueType] = &[ValueType::Mat4, ValueType::Mat2, ValueType::Vec4];

/// Types allowed for vertex shader inputs.
pub const INPUT_TYPES: &[ValueType] = &[
    ValueType::Float,
    ValueType::Vec2,
    ValueType::Vec3,
    ValueType::Vec4,
];

impl ValueType {
    pub const ALL: [ValueType; 7] = [
        ValueType::Float,
        ValueType::Vec2,
        ValueType::Vec3,
        ValueType::Vec4,
        ValueType::Mat2,
        ValueType::Mat3,
        ValueType::Mat4,
    ];

    /// Look up a type by its shading-language spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueType::Float => "float",
            ValueType::Vec2 => "vec2",
            ValueType::Vec3 => "vec3",
            ValueType::Vec4 => "vec4",
            ValueType::Mat2 => "mat2",
            ValueType::Mat3 => "mat3",
            ValueType::Mat4 => "mat4",
        }
    }

    /// Tightly packed byte size of one element.
    pub fn size(self) -> u32 {
        match self {
            ValueType::Float => 4,
            ValueType::Vec2 => 8,
            ValueType::Vec3 => 12,
            ValueType::Vec4 => 16,
            ValueType::Mat2 => 16,
            ValueType::Mat3 => 36,
            ValueType::Mat4 => 64,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Texture sampler kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SamplerType {
    Sampler2D,
    SamplerArray,
    SamplerCube,
    Sampler3D,
}

impl SamplerType {
    pub const ALL: [SamplerType; 4] = [
        SamplerType::Sampler2D,
        SamplerType::SamplerArray,
        SamplerType::SamplerCube,
        SamplerType::Sampler3D,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            SamplerType::Sampler2D => "sampler2D",
            SamplerType::SamplerArray => "sampler2DArray",
            SamplerType::SamplerCube => "samplerCube",
            SamplerType::Sampler3D => "sampler3D",
        }
    }
}

impl fmt::Display for SamplerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comma-separated list of type names, for diagnostics.
pub(crate) fn type_list(types: &[ValueType]) -> String {
    types
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(",")
}
