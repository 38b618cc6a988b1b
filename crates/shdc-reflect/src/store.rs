//! Per shader, per variant compile results.

use std::collections::BTreeMap;

use shdc_lang::{Shader, ShaderStage, ShdcError, ShdcResult};

use crate::{lang::ShaderLang, record::ReflectionRecord};

/// How a compiled variant is embedded in the definitions artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Cross-compiled source text, inlined as string literals
    Source(String),
    /// Byte code compiled into a C header that defines the blob symbol.
    /// `header` is used verbatim in an `#include`, so it is either absolute
    /// or relative to the definitions artifact.
    Binary { header: String },
}

/// Output of the external compile step for one shader in one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledVariant {
    pub reflection: ReflectionRecord,
    pub payload: Payload,
}

type Key = (ShaderStage, String, ShaderLang);

/// Compile results for every shader and requested variant.
#[derive(Debug, Clone, Default)]
pub struct ReflectionStore {
    variants: BTreeMap<Key, CompiledVariant>,
}

impl ReflectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result for one shader and variant, replacing any earlier one.
    pub fn insert(
        &mut self,
        stage: ShaderStage,
        shader: impl Into<String>,
        lang: ShaderLang,
        variant: CompiledVariant,
    ) {
        self.variants.insert((stage, shader.into(), lang), variant);
    }

    pub fn contains(&self, stage: ShaderStage, shader: &str, lang: ShaderLang) -> bool {
        self.variants
            .contains_key(&(stage, shader.to_string(), lang))
    }

    /// Compile result for `shader` in `lang`.
    ///
    /// # Errors
    ///
    /// Returns a missing-reflection error located at the shader's declaration.
    pub fn get(&self, shader: &Shader, lang: ShaderLang) -> ShdcResult<&CompiledVariant> {
        self.variants
            .get(&(shader.stage, shader.name.clone(), lang))
            .ok_or_else(|| {
                ShdcError::reflection_missing(format!(
                    "no {} reflection for {} shader '{}'",
                    lang,
                    shader.stage,
                    shader.name
                ))
                .at(shader.loc.clone())
            })
    }

    /// Reflection record for `shader` in `lang`.
    pub fn record(&self, shader: &Shader, lang: ShaderLang) -> ShdcResult<&ReflectionRecord> {
        self.get(shader, lang).map(|v| &v.reflection)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
