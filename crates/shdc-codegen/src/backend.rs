//! Artifact backend interface.

use log::info;
use shdc_lang::Library;
use shdc_reflect::{ReflectionStore, ShaderLang, ShdcResult};

/// Everything a backend reads for one generation run.
#[derive(Debug, Clone, Copy)]
pub struct Unit<'a> {
    pub library: &'a Library,
    pub store: &'a ReflectionStore,
    /// Requested variants; the first one is the default
    pub langs: &'a [ShaderLang],
    /// Name the definitions file includes the declarations file by
    pub header_name: &'a str,
}

/// Generated artifact pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub declarations: String,
    pub definitions: String,
}

/// Emission strategy for the artifact pair.
///
/// Layout and validation are shared; a backend only decides the concrete
/// shape of the emitted declarations and definitions. Output must depend
/// on the unit alone, so identical input gives byte-identical artifacts.
pub trait Backend {
    fn name(&self) -> &'static str;

    /// Write the declarations artifact.
    fn declarations(&self, unit: &Unit<'_>) -> ShdcResult<String>;

    /// Write the definitions artifact.
    fn definitions(&self, unit: &Unit<'_>) -> ShdcResult<String>;

    fn generate(&self, unit: &Unit<'_>) -> ShdcResult<Artifacts> {
        info!(
            "generating {} artifacts for {} shaders, {} programs",
            self.name(),
            unit.library.shaders().len(),
            unit.library.programs().len()
        );
        Ok(Artifacts {
            declarations: self.declarations(unit)?,
            definitions: self.definitions(unit)?,
        })
    }
}
