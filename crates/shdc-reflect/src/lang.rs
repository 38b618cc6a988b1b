//! Target shading-language variants and the family selector.

use core::{fmt, str::FromStr};

use serde::Deserialize;

/// One concrete target dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderLang {
    Glsl100,
    Glsl330,
    GlslEs3,
    Metal,
    Hlsl5,
}

/// Uniform block packing discipline of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packing {
    /// Members at their reported offsets, no extra rounding
    Native,
    /// Block size rounded up to a multiple of 16
    Std140,
}

impl ShaderLang {
    pub const ALL: [ShaderLang; 5] = [
        ShaderLang::Glsl100,
        ShaderLang::Glsl330,
        ShaderLang::GlslEs3,
        ShaderLang::Metal,
        ShaderLang::Hlsl5,
    ];

    /// Name used in file names and reflection paths.
    pub fn name(self) -> &'static str {
        match self {
            ShaderLang::Glsl100 => "glsl100",
            ShaderLang::Glsl330 => "glsl330",
            ShaderLang::GlslEs3 => "glsles3",
            ShaderLang::Metal => "metal",
            ShaderLang::Hlsl5 => "hlsl",
        }
    }

    /// Whether the variant is embedded as inline source text.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            ShaderLang::Glsl100 | ShaderLang::Glsl330 | ShaderLang::GlslEs3
        )
    }

    pub fn packing(self) -> Packing {
        if self.is_text() {
            Packing::Std140
        } else {
            Packing::Native
        }
    }

    /// Suffix of the embedded blob symbol for byte-code variants.
    pub fn binary_suffix(self) -> Option<&'static str> {
        match self {
            ShaderLang::Metal => Some("metallib"),
            ShaderLang::Hlsl5 => Some("hlsl5"),
            _ => None,
        }
    }

    /// Fixed entry point, for variants that are cross-compiled with a
    /// renamed `main`.
    pub fn entry_point(self) -> Option<&'static str> {
        match self {
            ShaderLang::Metal => Some("main0"),
            _ => None,
        }
    }
}

impl fmt::Display for ShaderLang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShaderLang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.name() == s)
            .ok_or_else(|| format!("unknown shading language variant '{}'", s))
    }
}

/// Shading-language family selector.
///
/// A family expands to the ordered list of variants generated together; the
/// first one is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Glsl,
    Gles,
    Msl,
    Hlsl,
}

impl Family {
    pub fn langs(self) -> &'static [ShaderLang] {
        match self {
            Family::Glsl => &[ShaderLang::Glsl330],
            Family::Gles => &[ShaderLang::Glsl100, ShaderLang::GlslEs3],
            Family::Msl => &[ShaderLang::Metal],
            Family::Hlsl => &[ShaderLang::Hlsl5],
        }
    }

    pub fn default_lang(self) -> ShaderLang {
        self.langs()[0]
    }

    pub fn name(self) -> &'static str {
        match self {
            Family::Glsl => "glsl",
            Family::Gles => "gles",
            Family::Msl => "msl",
            Family::Hlsl => "hlsl",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "glsl" => Ok(Family::Glsl),
            "gles" => Ok(Family::Gles),
            "msl" => Ok(Family::Msl),
            "hlsl" => Ok(Family::Hlsl),
            _ => Err(format!(
                "unknown shading language family '{}', expected glsl, gles, msl or hlsl",
                s
            )),
        }
    }
}
