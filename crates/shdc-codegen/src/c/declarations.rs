//! Declarations artifact.

use core::fmt::Write;

use log::{debug, warn};
use shdc_lang::{Shader, ShaderStage};
use shdc_reflect::{ShaderLang, ShdcError, ShdcResult, UniformBlock};

use super::{
    names::{block_struct, c_type, inputs_struct, program_enum, program_fn, shader_fn},
    prelude, VERSION,
};
use crate::{
    backend::Unit,
    hash::type_hash,
    layout::{BlockLayout, Field},
};

pub fn write_declarations(out: &mut String, unit: &Unit<'_>) -> ShdcResult<()> {
    writeln!(out, "#pragma once")?;
    writeln!(out, "/* #version:{}# machine generated, do not edit! */", VERSION)?;
    writeln!(out, "#include <stdint.h>")?;
    writeln!(out, "#ifdef __cplusplus")?;
    writeln!(out, "extern \"C\" {{")?;
    writeln!(out, "#endif")?;

    prelude::write_value_types(out)?;
    prelude::write_enums(out)?;
    prelude::write_descriptors(out)?;

    writeln!(out, "enum SHD_PROGRAMS {{")?;
    writeln!(out, "    SHD_PROGRAM_INVALID = 0,")?;
    for program in unit.library.programs() {
        writeln!(out, "    {},", program_enum(&program.name))?;
    }
    writeln!(out, "}};")?;
    prelude::write_program_descriptors(out)?;

    for shader in unit.library.shaders() {
        if shader.stage == ShaderStage::Vertex {
            if let Some(&default) = unit.langs.first() {
                write_inputs_struct(out, unit, shader, default)?;
            }
        }
        for &lang in unit.langs {
            for block in &unit.store.record(shader, lang)?.uniform_blocks {
                write_block_struct(out, shader, lang, block)?;
            }
        }
    }

    writeln!(out)?;
    for shader in unit.library.shaders() {
        writeln!(
            out,
            "SHD_API shd_shader {}(enum SHD_SHADER_TARGET_TYPE type);",
            shader_fn(shader)
        )?;
    }
    for program in unit.library.programs() {
        writeln!(
            out,
            "SHD_API shd_program {}(enum SHD_SHADER_TARGET_TYPE type);",
            program_fn(&program.name)
        )?;
    }
    writeln!(
        out,
        "SHD_API shd_program_collection shd_get_programs(enum SHD_SHADER_TARGET_TYPE type);"
    )?;
    writeln!(
        out,
        "SHD_API const enum SHD_SHADER_TARGET_TYPE *shd_get_slangs(int *count);"
    )?;
    writeln!(
        out,
        "SHD_API enum SHD_SHADER_TARGET_TYPE shd_get_default_slang(void);"
    )?;

    writeln!(out, "#ifdef __cplusplus")?;
    writeln!(out, "}}")?;
    writeln!(out, "#endif")?;
    Ok(())
}

/// Vertex attribute struct, from the default variant's reflection.
fn write_inputs_struct(
    out: &mut String,
    unit: &Unit<'_>,
    shader: &Shader,
    lang: ShaderLang,
) -> ShdcResult<()> {
    let inputs = &unit.store.record(shader, lang)?.inputs;
    if inputs.is_empty() {
        return Ok(());
    }
    writeln!(out, "typedef struct {{")?;
    for input in inputs {
        let ty = input.value_type().ok_or_else(|| {
            ShdcError::reflection(format!(
                "input '{}' of vertex shader '{}' has unknown type '{}'",
                input.name, shader.name, input.ty
            ))
            .at(shader.loc.clone())
        })?;
        writeln!(out, "    {} {};", c_type(ty), input.name)?;
    }
    writeln!(out, "}} {};", inputs_struct(shader))?;
    Ok(())
}

/// Struct mirroring one uniform block, followed by its hash, slot and size.
fn write_block_struct(
    out: &mut String,
    shader: &Shader,
    lang: ShaderLang,
    block: &UniformBlock,
) -> ShdcResult<()> {
    let layout = BlockLayout::new(block, lang.packing()).map_err(|e| e.at(shader.loc.clone()))?;
    let name = block_struct(shader, lang, block);
    if layout.fields.is_empty() {
        warn!(
            "uniform block '{}' of '{}' is empty, no struct emitted",
            block.type_name, shader.name
        );
        return Ok(());
    }
    debug!("{}: {} bytes", name, layout.size);

    writeln!(out, "typedef struct {{")?;
    for field in &layout.fields {
        match *field {
            Field::Padding { offset, size } => {
                writeln!(out, "    uint8_t _pad_{}[{}];", offset, size)?;
            }
            Field::Member { member, ty, .. } => {
                if member.is_array() {
                    writeln!(out, "    {} {}[{}];", c_type(ty), member.name, member.num)?;
                } else {
                    writeln!(out, "    {} {};", c_type(ty), member.name)?;
                }
            }
        }
    }
    writeln!(out, "}} {};", name)?;

    let macro_prefix = name.to_uppercase();
    writeln!(out, "#define {}_HASH 0x{:08x}u", macro_prefix, type_hash(block))?;
    writeln!(out, "#define {}_SLOT {}", macro_prefix, block.slot)?;
    writeln!(out, "#define {}_SIZE {}", macro_prefix, layout.size)?;
    Ok(())
}
