//! Library completeness and cross-stage interface checks.
//!
//! Every check fails fast: the first violation aborts validation.

use log::{debug, info};
use shdc_lang::{Library, Program, Shader, ShaderStage, ShdcError, ShdcResult};

use crate::{
    lang::ShaderLang,
    record::{ReflectionRecord, UniformBlock},
    store::ReflectionStore,
    types::{type_list, SamplerType, ValueType, ARRAY_UNIFORM_TYPES, INPUT_TYPES, UNIFORM_TYPES},
};

/// Check `library` against the compile results in `store` for every variant
/// in `langs`.
///
/// In order:
/// 1. every program names existing shaders
/// 2. every shader belongs to at least one program
/// 3. per variant, input, uniform and texture types are legal
/// 4. per variant, each program's vertex outputs match its fragment inputs
pub fn validate(library: &Library, store: &ReflectionStore, langs: &[ShaderLang]) -> ShdcResult<()> {
    info!(
        "validating {} shaders and {} programs for {}",
        library.shaders().len(),
        library.programs().len(),
        lang_list(langs)
    );

    let programs = library
        .programs()
        .iter()
        .map(|p| resolve(library, p))
        .collect::<ShdcResult<Vec<_>>>()?;

    check_orphans(library)?;

    for &lang in langs {
        debug!("checking {} reflection", lang);
        for shader in library.shaders() {
            check_types(shader, store.record(shader, lang)?, lang)?;
        }
        for (program, vs, fs) in &programs {
            check_interface(program, vs, fs, store, lang)?;
        }
    }
    Ok(())
}

fn resolve<'a>(
    library: &'a Library,
    program: &'a Program,
) -> ShdcResult<(&'a Program, &'a Shader, &'a Shader)> {
    let lookup = |stage: ShaderStage, name: &str| {
        library.shader(stage, name).ok_or_else(|| {
            ShdcError::structural(format!(
                "{} shader '{}' of program '{}' doesn't exist",
                stage, name, program.name
            ))
            .at(program.loc.clone())
        })
    };
    let vs = lookup(ShaderStage::Vertex, &program.vs)?;
    let fs = lookup(ShaderStage::Fragment, &program.fs)?;
    Ok((program, vs, fs))
}

fn check_orphans(library: &Library) -> ShdcResult<()> {
    for shader in library.shaders() {
        let used = library.programs().iter().any(|p| match shader.stage {
            ShaderStage::Vertex => p.vs == shader.name,
            ShaderStage::Fragment => p.fs == shader.name,
        });
        if !used {
            return Err(ShdcError::structural(format!(
                "{} shader '{}' is not part of a program",
                shader.stage, shader.name
            ))
            .at(shader.loc.clone()));
        }
    }
    Ok(())
}

fn check_types(shader: &Shader, record: &ReflectionRecord, lang: ShaderLang) -> ShdcResult<()> {
    let fail = |message: String| -> ShdcResult<()> {
        Err(ShdcError::type_error(format!(
            "{} in {} shader '{}' ({})",
            message, shader.stage, shader.name, lang
        ))
        .at(shader.loc.clone()))
    };

    if shader.stage == ShaderStage::Vertex {
        for input in &record.inputs {
            if !is_one_of(input.value_type(), INPUT_TYPES) {
                return fail(format!(
                    "invalid vertex shader input type '{}' for '{}', must be ({})",
                    input.ty,
                    input.name,
                    type_list(INPUT_TYPES)
                ));
            }
        }
    }

    for block in &record.uniform_blocks {
        check_members(block).or_else(fail)?;
    }

    for texture in &record.textures {
        if texture.sampler_type().is_none() {
            let legal: Vec<&str> = SamplerType::ALL.iter().map(|s| s.name()).collect();
            return fail(format!(
                "invalid texture type '{}' for '{}', must be ({})",
                texture.ty,
                texture.name,
                legal.join(",")
            ));
        }
    }
    Ok(())
}

/// Uniform member types, returning the diagnostic text on failure.
fn check_members(block: &UniformBlock) -> Result<(), String> {
    for member in &block.members {
        if member.num == 0 {
            return Err(format!(
                "uniform block member '{}.{}' has no elements",
                block.type_name, member.name
            ));
        }
        let legal = if member.is_array() {
            ARRAY_UNIFORM_TYPES
        } else {
            UNIFORM_TYPES
        };
        if !is_one_of(member.value_type(), legal) {
            let ty = if member.is_array() {
                format!("{}[{}]", member.ty, member.num)
            } else {
                member.ty.clone()
            };
            return Err(format!(
                "invalid uniform block member type '{}' for '{}.{}', must be ({})",
                ty,
                block.type_name,
                member.name,
                type_list(legal)
            ));
        }
    }
    Ok(())
}

fn check_interface(
    program: &Program,
    vs: &Shader,
    fs: &Shader,
    store: &ReflectionStore,
    lang: ShaderLang,
) -> ShdcResult<()> {
    let outputs = &store.record(vs, lang)?.outputs;
    let inputs = &store.record(fs, lang)?.inputs;

    let matched = outputs.len() == inputs.len()
        && outputs
            .iter()
            .all(|out| inputs.iter().any(|i| i.name == out.name && i.ty == out.ty));
    if !matched {
        return Err(ShdcError::interface_mismatch(format!(
            "outputs of vs '{}' don't match inputs of fs '{}' in program '{}' ({}), \
             unused items might have been removed by the compiler",
            vs.name, fs.name, program.name, lang
        ))
        .at(vs.loc.clone()));
    }
    Ok(())
}

fn is_one_of(ty: Option<ValueType>, legal: &[ValueType]) -> bool {
    ty.is_some_and(|t| legal.contains(&t))
}

fn lang_list(langs: &[ShaderLang]) -> String {
    langs.iter().map(|l| l.name()).collect::<Vec<_>>().join(",")
}
