//! Fixed part of the declarations artifact: value types, enumerations and
//! descriptor structs.
//!
//! Value types are only defined when the includer hasn't provided its own
//! (`#define SHD_VEC4 my_vec4` before the include).

use core::fmt::Write;

use shdc_reflect::{SamplerType, ValueType, INPUT_TYPES};

use super::names::{
    c_type, input_enum, sampler_enum, target_enum, uniform_enum, DEFAULT_TARGET, TARGET_ORDER,
};

pub fn write_value_types(out: &mut String) -> core::fmt::Result {
    writeln!(out, "#ifndef SHD_API")?;
    writeln!(out, "#define SHD_API extern")?;
    writeln!(out, "#endif")?;
    writeln!(out, "#ifndef SHD_FLOAT")?;
    writeln!(out, "#define SHD_FLOAT float")?;
    writeln!(out, "#endif")?;

    for ty in ValueType::ALL {
        let fields = components(ty);
        if fields.is_empty() {
            continue;
        }
        let macro_name = c_type(ty);
        writeln!(out, "#ifndef {}", macro_name)?;
        writeln!(out, "typedef struct {{")?;
        for field in fields {
            writeln!(out, "    SHD_FLOAT {};", field)?;
        }
        writeln!(out, "}} shd_{};", ty.name())?;
        writeln!(out, "#define {} shd_{}", macro_name, ty.name())?;
        writeln!(out, "#endif")?;
    }
    Ok(())
}

/// Component names of a vector or matrix type; empty for scalars.
fn components(ty: ValueType) -> Vec<String> {
    let vector = |n: usize| -> Vec<String> {
        ["x", "y", "z", "w"][..n]
            .iter()
            .map(|c| c.to_string())
            .collect()
    };
    let matrix = |n: usize| -> Vec<String> {
        (0..n)
            .flat_map(|row| (0..n).map(move |col| format!("m{}{}", row, col)))
            .collect()
    };
    match ty {
        ValueType::Float => Vec::new(),
        ValueType::Vec2 => vector(2),
        ValueType::Vec3 => vector(3),
        ValueType::Vec4 => vector(4),
        ValueType::Mat2 => matrix(2),
        ValueType::Mat3 => matrix(3),
        ValueType::Mat4 => matrix(4),
    }
}

pub fn write_enums(out: &mut String) -> core::fmt::Result {
    writeln!(out, "enum SHD_INPUT_TYPE {{")?;
    writeln!(out, "    SHD_INPUT_TYPE_INVALID = 0,")?;
    for &ty in INPUT_TYPES {
        writeln!(out, "    {},", input_enum(ty))?;
    }
    writeln!(out, "}};")?;

    writeln!(out, "enum SHD_SAMPLER_TYPE {{")?;
    writeln!(out, "    SHD_SAMPLER_TYPE_INVALID = 0,")?;
    for ty in SamplerType::ALL {
        writeln!(out, "    {},", sampler_enum(ty))?;
    }
    writeln!(out, "}};")?;

    writeln!(out, "enum SHD_UNIFORM_TYPE {{")?;
    writeln!(out, "    SHD_UNIFORM_TYPE_INVALID = 0,")?;
    for ty in ValueType::ALL {
        writeln!(out, "    {},", uniform_enum(ty))?;
    }
    writeln!(out, "}};")?;

    writeln!(out, "enum SHD_SHADER_TYPE {{")?;
    writeln!(out, "    SHD_SHADER_TYPE_INVALID = 0,")?;
    writeln!(out, "    SHD_SHADER_TYPE_VERTEX,")?;
    writeln!(out, "    SHD_SHADER_TYPE_FRAGMENT,")?;
    writeln!(out, "}};")?;

    writeln!(out, "enum SHD_SHADER_TARGET_TYPE {{")?;
    writeln!(out, "    {},", DEFAULT_TARGET)?;
    for lang in TARGET_ORDER {
        writeln!(out, "    {},", target_enum(lang))?;
    }
    writeln!(out, "}};")?;
    Ok(())
}

const DESCRIPTORS: &str = "\
typedef struct {
    enum SHD_SAMPLER_TYPE type;
    int slot;
    const char *name;
} shd_texture;
typedef struct {
    enum SHD_INPUT_TYPE type;
    int slot;
    const char *name;
} shd_input;
typedef struct {
    const char *name;
    enum SHD_UNIFORM_TYPE type;
    int offset;
    int size;
    int count;
} shd_uniform;
typedef struct {
    const char *name;
    int byteSize;
    int slot;
    int count;
    const shd_uniform *uniforms;
} shd_uniform_block;
typedef struct {
    enum SHD_SHADER_TARGET_TYPE targetType;
    enum SHD_SHADER_TYPE type;
    const char *name;
    const char *entry;
    int size;
    const unsigned char *binary;
    const char *source;
    int inputCount;
    const shd_input *inputs;
    int uniformBlockCount;
    const shd_uniform_block *uniformBlocks;
    int textureCount;
    const shd_texture *textures;
} shd_shader;
";

/// Program descriptors; these need `enum SHD_PROGRAMS` declared first.
const PROGRAM_DESCRIPTORS: &str = "\
typedef struct {
    enum SHD_PROGRAMS id;
    const char *name;
    shd_shader vs;
    shd_shader fs;
} shd_program;
typedef struct {
    int count;
    const shd_program *programs;
} shd_program_collection;
";

pub fn write_descriptors(out: &mut String) -> core::fmt::Result {
    out.write_str(DESCRIPTORS)
}

pub fn write_program_descriptors(out: &mut String) -> core::fmt::Result {
    out.write_str(PROGRAM_DESCRIPTORS)
}
