//! C identifiers and literals used by the generated artifacts.

use shdc_lang::{Shader, ShaderStage};
use shdc_reflect::{SamplerType, ShaderLang, UniformBlock, ValueType};

/// Enumerator order of `SHD_SHADER_TARGET_TYPE`, after `DEFAULT`.
pub const TARGET_ORDER: [ShaderLang; 5] = [
    ShaderLang::Glsl100,
    ShaderLang::GlslEs3,
    ShaderLang::Glsl330,
    ShaderLang::Metal,
    ShaderLang::Hlsl5,
];

pub const DEFAULT_TARGET: &str = "SHD_SHADER_TARGET_TYPE_DEFAULT";

/// Overridable C type used for a value type.
pub fn c_type(ty: ValueType) -> String {
    format!("SHD_{}", ty.name().to_uppercase())
}

pub fn uniform_enum(ty: ValueType) -> String {
    format!("SHD_UNIFORM_TYPE_{}", ty.name().to_uppercase())
}

pub fn input_enum(ty: ValueType) -> String {
    format!("SHD_INPUT_TYPE_{}", ty.name().to_uppercase())
}

pub fn sampler_enum(ty: SamplerType) -> &'static str {
    match ty {
        SamplerType::Sampler2D => "SHD_SAMPLER_TYPE_2D",
        SamplerType::SamplerArray => "SHD_SAMPLER_TYPE_ARRAY",
        SamplerType::SamplerCube => "SHD_SAMPLER_TYPE_CUBE",
        SamplerType::Sampler3D => "SHD_SAMPLER_TYPE_3D",
    }
}

pub fn target_enum(lang: ShaderLang) -> &'static str {
    match lang {
        ShaderLang::Glsl100 => "SHD_SHADER_TARGET_TYPE_GLSL100",
        ShaderLang::Glsl330 => "SHD_SHADER_TARGET_TYPE_GLSL330",
        ShaderLang::GlslEs3 => "SHD_SHADER_TARGET_TYPE_GLSLES3",
        ShaderLang::Metal => "SHD_SHADER_TARGET_TYPE_METAL",
        ShaderLang::Hlsl5 => "SHD_SHADER_TARGET_TYPE_HLSL5",
    }
}

pub fn stage_enum(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex => "SHD_SHADER_TYPE_VERTEX",
        ShaderStage::Fragment => "SHD_SHADER_TYPE_FRAGMENT",
    }
}

pub fn program_enum(program: &str) -> String {
    format!("SHD_PROGRAM_{}", program.to_uppercase())
}

/// Accessor returning the descriptor of a shader, e.g. `shd_vs_main`.
pub fn shader_fn(shader: &Shader) -> String {
    format!("shd_{}_{}", shader.stage.tag(), shader.name)
}

pub fn program_fn(program: &str) -> String {
    format!("shd_get_program_{}", program)
}

/// Prefix of the static tables for one shader variant.
pub fn variant_prefix(shader: &Shader, lang: ShaderLang) -> String {
    format!("shd_{}_{}_{}", shader.stage.tag(), shader.name, lang)
}

/// Struct mirroring a uniform block, e.g. `shd_vs_glsl330_params_main_vsParams`.
pub fn block_struct(shader: &Shader, lang: ShaderLang, block: &UniformBlock) -> String {
    format!(
        "shd_{}_{}_params_{}_{}",
        shader.stage.tag(),
        lang,
        shader.name,
        block.type_name
    )
}

pub fn inputs_struct(shader: &Shader) -> String {
    format!("shd_inputs_{}", shader.name)
}

/// Symbol of the byte-code blob defined by a compiled header.
pub fn blob_symbol(shader: &Shader, suffix: &str) -> String {
    format!("{}_{}_{}", shader.name, shader.stage.tag(), suffix)
}

/// Body of a C string literal holding `text`.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use shdc_lang::SourceLoc;

    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape(r#"#include "a\b""#), r#"#include \"a\\b\""#);
    }

    #[test]
    fn test_shader_names() {
        let shader = Shader::new("litVS", ShaderStage::Vertex, SourceLoc::new("lib.shd", 1));
        let block = UniformBlock {
            type_name: String::from("vsParams"),
            name: String::from("params"),
            slot: 0,
            size: 64,
            members: Vec::new(),
        };
        assert_eq!(shader_fn(&shader), "shd_vs_litVS");
        assert_eq!(
            block_struct(&shader, ShaderLang::GlslEs3, &block),
            "shd_vs_glsles3_params_litVS_vsParams"
        );
        assert_eq!(blob_symbol(&shader, "metallib"), "litVS_vs_metallib");
        assert_eq!(variant_prefix(&shader, ShaderLang::Hlsl5), "shd_vs_litVS_hlsl");
    }

    #[test]
    fn test_enums() {
        assert_eq!(c_type(ValueType::Mat4), "SHD_MAT4");
        assert_eq!(uniform_enum(ValueType::Vec2), "SHD_UNIFORM_TYPE_VEC2");
        assert_eq!(target_enum(ShaderLang::Hlsl5), "SHD_SHADER_TARGET_TYPE_HLSL5");
        assert_eq!(program_enum("lit"), "SHD_PROGRAM_LIT");
    }
}
