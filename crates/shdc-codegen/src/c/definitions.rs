//! Definitions artifact: descriptor tables and dispatch accessors.

use core::fmt::Write;

use shdc_lang::{Program, Shader};
use shdc_reflect::{
    CompiledVariant, Payload, ReflectionRecord, ShaderLang, ShdcError, ShdcResult, INPUT_TYPES,
};

use super::{
    names::{
        blob_symbol, escape, input_enum, program_enum, program_fn, sampler_enum, shader_fn,
        stage_enum, target_enum, uniform_enum, variant_prefix, DEFAULT_TARGET,
    },
    VERSION,
};
use crate::{
    backend::Unit,
    layout::{BlockLayout, Field},
};

pub fn write_definitions(out: &mut String, unit: &Unit<'_>) -> ShdcResult<()> {
    writeln!(
        out,
        "/* -----------------------------------------------------------------------------"
    )?;
    writeln!(out, " * #version:{}# machine generated, do not edit!", VERSION)?;
    writeln!(
        out,
        " * ---------------------------------------------------------------------------*/"
    )?;
    writeln!(out, "#include \"{}\"", unit.header_name)?;
    if unit.langs.contains(&ShaderLang::Hlsl5) {
        writeln!(out, "typedef unsigned char shd_byte;")?;
    }
    for shader in unit.library.shaders() {
        for &lang in unit.langs {
            if let Payload::Binary { header } = &unit.store.get(shader, lang)?.payload {
                writeln!(out, "#include \"{}\"", escape(header))?;
            }
        }
    }

    for shader in unit.library.shaders() {
        writeln!(out)?;
        write_shader(out, unit, shader)?;
    }
    for program in unit.library.programs() {
        writeln!(out)?;
        write_program(out, program)?;
    }
    writeln!(out)?;
    write_collection(out, unit.library.programs())?;
    writeln!(out)?;
    write_slangs(out, unit.langs)?;
    Ok(())
}

fn write_shader(out: &mut String, unit: &Unit<'_>, shader: &Shader) -> ShdcResult<()> {
    let mut cases = String::new();
    for (i, &lang) in unit.langs.iter().enumerate() {
        let variant = unit.store.get(shader, lang)?;
        let prefix = variant_prefix(shader, lang);
        write_tables(out, shader, lang, &prefix, variant)?;

        if i == 0 {
            writeln!(cases, "    case {}:", DEFAULT_TARGET)?;
        }
        writeln!(cases, "    case {}:", target_enum(lang))?;
        write_case(&mut cases, shader, lang, &prefix, variant)?;
        writeln!(cases, "        break;")?;
    }

    writeln!(
        out,
        "shd_shader {}(enum SHD_SHADER_TARGET_TYPE type) {{",
        shader_fn(shader)
    )?;
    writeln!(out, "    shd_shader shader = {{0}};")?;
    writeln!(out, "    shader.type = {};", stage_enum(shader.stage))?;
    writeln!(out, "    shader.name = \"{}\";", shader.name)?;
    writeln!(out, "    switch (type) {{")?;
    out.push_str(&cases);
    writeln!(out, "    default:")?;
    writeln!(out, "        break;")?;
    writeln!(out, "    }}")?;
    writeln!(out, "    return shader;")?;
    writeln!(out, "}}")?;
    Ok(())
}

/// Static tables of one variant: inputs, uniforms, textures and source.
fn write_tables(
    out: &mut String,
    shader: &Shader,
    lang: ShaderLang,
    prefix: &str,
    variant: &CompiledVariant,
) -> ShdcResult<()> {
    let record = &variant.reflection;

    if !record.inputs.is_empty() {
        writeln!(
            out,
            "static const shd_input {}_inputs[{}] = {{",
            prefix,
            record.inputs.len()
        )?;
        for input in &record.inputs {
            let ty = match input.value_type() {
                Some(ty) if INPUT_TYPES.contains(&ty) => input_enum(ty),
                _ => String::from("SHD_INPUT_TYPE_INVALID"),
            };
            writeln!(
                out,
                "    {{ {}, {}, \"{}\" }},",
                ty,
                input.slot.unwrap_or(0),
                input.name
            )?;
        }
        writeln!(out, "}};")?;
    }

    let mut blocks = Vec::with_capacity(record.uniform_blocks.len());
    for block in &record.uniform_blocks {
        let layout =
            BlockLayout::new(block, lang.packing()).map_err(|e| e.at(shader.loc.clone()))?;
        let uniforms = format!("{}_{}_uniforms", prefix, block.type_name);
        if !block.members.is_empty() {
            writeln!(
                out,
                "static const shd_uniform {}[{}] = {{",
                uniforms,
                block.members.len()
            )?;
            for field in layout.members() {
                if let Field::Member {
                    member, ty, offset, ..
                } = *field
                {
                    writeln!(
                        out,
                        "    {{ \"{}\", {}, {}, {}, {} }},",
                        member.name,
                        uniform_enum(ty),
                        offset,
                        ty.size(),
                        member.num
                    )?;
                }
            }
            writeln!(out, "}};")?;
        }
        let uniforms_ptr = if block.members.is_empty() {
            String::from("0")
        } else {
            uniforms
        };
        blocks.push(format!(
            "    {{ \"{}\", {}, {}, {}, {} }},",
            block.type_name,
            layout.size,
            block.slot,
            block.members.len(),
            uniforms_ptr
        ));
    }
    if !blocks.is_empty() {
        writeln!(
            out,
            "static const shd_uniform_block {}_blocks[{}] = {{",
            prefix,
            blocks.len()
        )?;
        for block in &blocks {
            writeln!(out, "{}", block)?;
        }
        writeln!(out, "}};")?;
    }

    if !record.textures.is_empty() {
        writeln!(
            out,
            "static const shd_texture {}_textures[{}] = {{",
            prefix,
            record.textures.len()
        )?;
        for texture in &record.textures {
            let ty = texture.sampler_type().ok_or_else(|| {
                ShdcError::reflection(format!(
                    "texture '{}' of '{}' has unknown type '{}'",
                    texture.name, shader.name, texture.ty
                ))
                .at(shader.loc.clone())
            })?;
            writeln!(
                out,
                "    {{ {}, {}, \"{}\" }},",
                sampler_enum(ty),
                texture.slot.unwrap_or(0),
                texture.name
            )?;
        }
        writeln!(out, "}};")?;
    }

    if let Payload::Source(source) = &variant.payload {
        writeln!(out, "static const char {}_source[] =", prefix)?;
        let lines: Vec<&str> = source.lines().collect();
        if lines.is_empty() {
            writeln!(out, "    \"\";")?;
        }
        for (i, line) in lines.iter().enumerate() {
            let end = if i + 1 == lines.len() { ";" } else { "" };
            writeln!(out, "    \"{}\\n\"{}", escape(line), end)?;
        }
    }
    Ok(())
}

/// Body of one `case` of a shader accessor.
fn write_case(
    out: &mut String,
    shader: &Shader,
    lang: ShaderLang,
    prefix: &str,
    variant: &CompiledVariant,
) -> ShdcResult<()> {
    writeln!(out, "        shader.targetType = {};", target_enum(lang))?;
    if let Some(entry) = lang.entry_point() {
        writeln!(out, "        shader.entry = \"{}\";", entry)?;
    }
    match &variant.payload {
        Payload::Source(_) => {
            writeln!(out, "        shader.source = {}_source;", prefix)?;
        }
        Payload::Binary { .. } => {
            let suffix = lang.binary_suffix().ok_or_else(|| {
                ShdcError::reflection(format!(
                    "{} is a source variant, but '{}' was compiled to byte code",
                    lang, shader.name
                ))
                .at(shader.loc.clone())
            })?;
            let symbol = blob_symbol(shader, suffix);
            writeln!(
                out,
                "        shader.binary = (const unsigned char *) {};",
                symbol
            )?;
            writeln!(out, "        shader.size = (int) sizeof({});", symbol)?;
        }
    }
    write_counts(out, prefix, &variant.reflection)
}

fn write_counts(out: &mut String, prefix: &str, record: &ReflectionRecord) -> ShdcResult<()> {
    let tables = [
        ("inputCount", "inputs", "inputs", record.inputs.len()),
        (
            "uniformBlockCount",
            "uniformBlocks",
            "blocks",
            record.uniform_blocks.len(),
        ),
        ("textureCount", "textures", "textures", record.textures.len()),
    ];
    for (count_field, field, table, len) in tables {
        if len > 0 {
            writeln!(out, "        shader.{} = {};", count_field, len)?;
            writeln!(out, "        shader.{} = {}_{};", field, prefix, table)?;
        }
    }
    Ok(())
}

fn write_program(out: &mut String, program: &Program) -> ShdcResult<()> {
    writeln!(
        out,
        "shd_program {}(enum SHD_SHADER_TARGET_TYPE type) {{",
        program_fn(&program.name)
    )?;
    writeln!(out, "    shd_program program;")?;
    writeln!(out, "    program.id = {};", program_enum(&program.name))?;
    writeln!(out, "    program.name = \"{}\";", program.name)?;
    writeln!(out, "    program.vs = shd_vs_{}(type);", program.vs)?;
    writeln!(out, "    program.fs = shd_fs_{}(type);", program.fs)?;
    writeln!(out, "    return program;")?;
    writeln!(out, "}}")?;
    Ok(())
}

fn write_collection(out: &mut String, programs: &[Program]) -> ShdcResult<()> {
    writeln!(
        out,
        "shd_program_collection shd_get_programs(enum SHD_SHADER_TARGET_TYPE type) {{"
    )?;
    if programs.is_empty() {
        writeln!(out, "    shd_program_collection collection = {{0, 0}};")?;
        writeln!(out, "    (void) type;")?;
        writeln!(out, "    return collection;")?;
        writeln!(out, "}}")?;
        return Ok(());
    }
    writeln!(out, "    static shd_program programs[{}];", programs.len())?;
    writeln!(out, "    shd_program_collection collection;")?;
    for (i, program) in programs.iter().enumerate() {
        writeln!(
            out,
            "    programs[{}] = {}(type);",
            i,
            program_fn(&program.name)
        )?;
    }
    writeln!(out, "    collection.count = {};", programs.len())?;
    writeln!(out, "    collection.programs = programs;")?;
    writeln!(out, "    return collection;")?;
    writeln!(out, "}}")?;
    Ok(())
}

/// Default variant and the list of every generated variant.
fn write_slangs(out: &mut String, langs: &[ShaderLang]) -> ShdcResult<()> {
    let default = langs.first().map_or(DEFAULT_TARGET, |&l| target_enum(l));
    writeln!(out, "enum SHD_SHADER_TARGET_TYPE shd_get_default_slang(void) {{")?;
    writeln!(out, "    return {};", default)?;
    writeln!(out, "}}")?;

    writeln!(
        out,
        "const enum SHD_SHADER_TARGET_TYPE *shd_get_slangs(int *count) {{"
    )?;
    writeln!(
        out,
        "    static const enum SHD_SHADER_TARGET_TYPE slangs[{}] = {{",
        langs.len().max(1)
    )?;
    if langs.is_empty() {
        writeln!(out, "        {},", DEFAULT_TARGET)?;
    }
    for &lang in langs {
        writeln!(out, "        {},", target_enum(lang))?;
    }
    writeln!(out, "    }};")?;
    writeln!(out, "    *count = {};", langs.len())?;
    writeln!(out, "    return slangs;")?;
    writeln!(out, "}}")?;
    Ok(())
}
