//! Generation run configuration.
//!
//! A run is described by a [`GenerateConfig`], loaded from a JSON file,
//! built from command line flags, or both (flags win):
//!
//! ```json
//! {
//!   "sources": ["shaders/lit.shd"],
//!   "header": "gen/shaders.h",
//!   "source": "gen/shaders.c",
//!   "family": "gles",
//!   "work_dir": "build/shaders",
//!   "compiler": "toolchain"
//! }
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;
use shdc_reflect::{Family, ShaderLang, ShdcError, ShdcResult};

pub const DEFAULT_GLSLANG: &str = "glslangValidator";
pub const DEFAULT_CROSS_COMPILER: &str = "spirv-cross-shdc";

/// Where compiled variants come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerKind {
    /// Run the external front end and cross-compiler
    #[default]
    Toolchain,
    /// Load outputs a previous toolchain run left in the work directory
    Prebuilt,
}

impl FromStr for CompilerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "toolchain" => Ok(CompilerKind::Toolchain),
            "prebuilt" => Ok(CompilerKind::Prebuilt),
            _ => Err(format!(
                "unknown compiler '{}', expected toolchain or prebuilt",
                s
            )),
        }
    }
}

/// Everything one generation run needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateConfig {
    /// Source documents, parsed in order into one library
    pub sources: Vec<PathBuf>,
    /// Declarations artifact
    pub header: PathBuf,
    /// Definitions artifact
    pub source: PathBuf,
    pub family: Family,
    /// Directory for compiler inputs and outputs, defaults to the header's
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
    #[serde(default)]
    pub compiler: CompilerKind,
    #[serde(default = "default_glslang")]
    pub glslang: PathBuf,
    #[serde(default = "default_cross_compiler")]
    pub cross_compiler: PathBuf,
}

fn default_glslang() -> PathBuf {
    PathBuf::from(DEFAULT_GLSLANG)
}

fn default_cross_compiler() -> PathBuf {
    PathBuf::from(DEFAULT_CROSS_COMPILER)
}

/// Settings given on the command line; each one replaces the config file's.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub sources: Vec<PathBuf>,
    pub header: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub family: Option<Family>,
    pub work_dir: Option<PathBuf>,
    pub compiler: Option<CompilerKind>,
    pub glslang: Option<PathBuf>,
    pub cross_compiler: Option<PathBuf>,
}

impl GenerateConfig {
    pub fn from_json(text: &str, origin: &str) -> ShdcResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| ShdcError::io(format!("malformed config '{}': {}", origin, e)))
    }

    pub fn load(path: &Path) -> ShdcResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            ShdcError::io(format!("cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_json(&text, &path.display().to_string())
    }

    /// Build a config from an optional file plus command line overrides.
    ///
    /// # Errors
    ///
    /// Fails when the file can't be loaded, or when no source, output or
    /// family is given by either.
    pub fn resolve(file: Option<&Path>, overrides: Overrides) -> ShdcResult<Self> {
        let mut config = match file {
            Some(path) => Self::load(path)?,
            None => {
                let missing = |flag: &str| ShdcError::io(format!("missing --{}", flag));
                GenerateConfig {
                    sources: Vec::new(),
                    header: overrides.header.clone().ok_or_else(|| missing("header"))?,
                    source: overrides.source.clone().ok_or_else(|| missing("source"))?,
                    family: overrides.family.ok_or_else(|| missing("family"))?,
                    work_dir: None,
                    compiler: CompilerKind::default(),
                    glslang: default_glslang(),
                    cross_compiler: default_cross_compiler(),
                }
            }
        };
        config.apply(overrides);
        if config.sources.is_empty() {
            return Err(ShdcError::io("no source documents given"));
        }
        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if !overrides.sources.is_empty() {
            self.sources = overrides.sources;
        }
        if let Some(header) = overrides.header {
            self.header = header;
        }
        if let Some(source) = overrides.source {
            self.source = source;
        }
        if let Some(family) = overrides.family {
            self.family = family;
        }
        if let Some(work_dir) = overrides.work_dir {
            self.work_dir = Some(work_dir);
        }
        if let Some(compiler) = overrides.compiler {
            self.compiler = compiler;
        }
        if let Some(glslang) = overrides.glslang {
            self.glslang = glslang;
        }
        if let Some(cross_compiler) = overrides.cross_compiler {
            self.cross_compiler = cross_compiler;
        }
    }

    pub fn langs(&self) -> &'static [ShaderLang] {
        self.family.langs()
    }

    pub fn work_dir(&self) -> PathBuf {
        match &self.work_dir {
            Some(dir) => dir.clone(),
            None => parent_dir(&self.header),
        }
    }

    /// Header file stem, shared by every intermediate file name.
    pub fn stem(&self) -> String {
        self.header
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("shaders"))
    }

    /// Name the definitions artifact includes the header by.
    pub fn header_name(&self) -> String {
        self.header
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.header.display().to_string())
    }
}

pub(crate) fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "sources": ["lit.shd", "post.shd"],
        "header": "gen/shaders.h",
        "source": "gen/shaders.c",
        "family": "gles"
    }"#;

    #[test]
    fn test_from_json_defaults() {
        let config = GenerateConfig::from_json(CONFIG, "shdc.json").unwrap();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.family, Family::Gles);
        assert_eq!(config.compiler, CompilerKind::Toolchain);
        assert_eq!(config.glslang, PathBuf::from(DEFAULT_GLSLANG));
        assert_eq!(config.work_dir(), PathBuf::from("gen"));
        assert_eq!(config.stem(), "shaders");
        assert_eq!(config.header_name(), "shaders.h");
        assert_eq!(config.langs(), [ShaderLang::Glsl100, ShaderLang::GlslEs3]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = GenerateConfig::from_json(r#"{"sources": [], "slang": "gles"}"#, "bad.json")
            .unwrap_err();
        assert!(err.message.contains("'bad.json'"));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = GenerateConfig::from_json(CONFIG, "shdc.json").unwrap();
        config.apply(Overrides {
            family: Some(Family::Glsl),
            work_dir: Some(PathBuf::from("build")),
            compiler: Some(CompilerKind::Prebuilt),
            ..Overrides::default()
        });
        assert_eq!(config.family, Family::Glsl);
        assert_eq!(config.work_dir(), PathBuf::from("build"));
        assert_eq!(config.compiler, CompilerKind::Prebuilt);
        assert_eq!(config.sources.len(), 2);
    }

    #[test]
    fn test_resolve_from_flags_only() {
        let config = GenerateConfig::resolve(
            None,
            Overrides {
                sources: vec![PathBuf::from("lit.shd")],
                header: Some(PathBuf::from("lit.h")),
                source: Some(PathBuf::from("lit.c")),
                family: Some(Family::Msl),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(config.work_dir(), PathBuf::from("."));
        assert_eq!(config.langs(), [ShaderLang::Metal]);
    }

    #[test]
    fn test_resolve_requires_outputs() {
        let err = GenerateConfig::resolve(
            None,
            Overrides {
                sources: vec![PathBuf::from("lit.shd")],
                family: Some(Family::Glsl),
                ..Overrides::default()
            },
        )
        .unwrap_err();
        assert!(err.message.contains("--header"));
    }

    #[test]
    fn test_compiler_kind_from_str() {
        assert_eq!("prebuilt".parse::<CompilerKind>(), Ok(CompilerKind::Prebuilt));
        assert!("magic".parse::<CompilerKind>().is_err());
    }
}
