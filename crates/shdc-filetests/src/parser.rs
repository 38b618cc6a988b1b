//! Test file parsing
//!
//! ```text
//! test definitions
//! family glsl
//!
//! === source
//! @vs a
//! ...
//! === reflect vs a *
//! { "inputs": [ ... ] }
//! === text vs a glsl330
//! #version 330
//! ...
//! === expect
//! check: shd_shader shd_vs_a(enum SHD_SHADER_TARGET_TYPE type) {
//! ```
//!
//! A `reflect` section applies to one variant, or to every variant of the
//! family for `*`. A `text` section gives the cross-compiled source of one
//! variant of the shader reflected just before it.

use shdc_lang::ShaderStage;
use shdc_reflect::{Family, ShaderLang};

/// What a test file checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Filecheck the declarations artifact
    Declarations,
    /// Filecheck the definitions artifact
    Definitions,
    /// Expect validation to pass or fail with a given error
    Validate,
}

/// Reflection of one shader, for one variant or all of them.
#[derive(Debug, Clone)]
pub struct ReflectSection {
    pub stage: ShaderStage,
    pub shader: String,
    /// `None` for every variant of the family
    pub variant: Option<ShaderLang>,
    pub json: String,
    /// Cross-compiled sources from the `text` sections that follow
    pub texts: Vec<(ShaderLang, String)>,
}

/// A parsed test file
#[derive(Debug, Clone)]
pub struct TestFile {
    pub command: Command,
    pub family: Family,
    pub source: String,
    pub reflections: Vec<ReflectSection>,
    /// The expected output text: filecheck directives or an error expectation
    pub expected_text: String,
}

enum Section {
    Source,
    Reflect(ReflectSection),
    Text(ShaderStage, String, ShaderLang),
    Expect,
}

/// Parse a test file
pub fn parse_test_file(content: &str) -> Result<TestFile, String> {
    let mut command = None;
    let mut family = None;
    let mut source = None;
    let mut reflections: Vec<ReflectSection> = Vec::new();
    let mut expected_text = None;

    let mut section: Option<Section> = None;
    let mut body = String::new();

    for (i, line) in content.lines().enumerate() {
        let line_no = i + 1;
        if let Some(header) = line.strip_prefix("===") {
            if let Some(done) = section.take() {
                close(done, &mut body, &mut source, &mut reflections, &mut expected_text)?;
            }
            let next = parse_section(header).map_err(|e| format!("line {}: {}", line_no, e))?;
            section = Some(next);
            continue;
        }
        if section.is_some() {
            body.push_str(line);
            body.push('\n');
            continue;
        }

        // Header lines before the first section
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }
        if let Some(name) = trimmed.strip_prefix("test ") {
            command = Some(
                parse_command(name.trim()).map_err(|e| format!("line {}: {}", line_no, e))?,
            );
        } else if let Some(name) = trimmed.strip_prefix("family ") {
            family = Some(
                name.trim()
                    .parse::<Family>()
                    .map_err(|e| format!("line {}: {}", line_no, e))?,
            );
        } else {
            return Err(format!("line {}: unexpected '{}'", line_no, trimmed));
        }
    }
    if let Some(done) = section.take() {
        close(done, &mut body, &mut source, &mut reflections, &mut expected_text)?;
    }

    Ok(TestFile {
        command: command.ok_or("missing 'test' line")?,
        family: family.ok_or("missing 'family' line")?,
        source: source.ok_or("missing '=== source' section")?,
        reflections,
        expected_text: expected_text.ok_or("missing '=== expect' section")?,
    })
}

fn parse_command(name: &str) -> Result<Command, String> {
    match name {
        "declarations" => Ok(Command::Declarations),
        "definitions" => Ok(Command::Definitions),
        "validate" => Ok(Command::Validate),
        _ => Err(format!("unknown test command '{}'", name)),
    }
}

fn parse_section(header: &str) -> Result<Section, String> {
    let words: Vec<&str> = header.split_whitespace().collect();
    match words.as_slice() {
        ["source"] => Ok(Section::Source),
        ["expect"] => Ok(Section::Expect),
        ["reflect", stage, shader, variant] => Ok(Section::Reflect(ReflectSection {
            stage: parse_stage(stage)?,
            shader: String::from(*shader),
            variant: match *variant {
                "*" => None,
                name => Some(name.parse::<ShaderLang>()?),
            },
            json: String::new(),
            texts: Vec::new(),
        })),
        ["text", stage, shader, variant] => Ok(Section::Text(
            parse_stage(stage)?,
            String::from(*shader),
            variant.parse::<ShaderLang>()?,
        )),
        _ => Err(format!("malformed section header '==={}'", header)),
    }
}

fn parse_stage(tag: &str) -> Result<ShaderStage, String> {
    match tag {
        "vs" => Ok(ShaderStage::Vertex),
        "fs" => Ok(ShaderStage::Fragment),
        _ => Err(format!("unknown stage '{}', expected vs or fs", tag)),
    }
}

fn close(
    section: Section,
    body: &mut String,
    source: &mut Option<String>,
    reflections: &mut Vec<ReflectSection>,
    expected_text: &mut Option<String>,
) -> Result<(), String> {
    let text = core::mem::take(body);
    match section {
        Section::Source => *source = Some(text),
        Section::Expect => *expected_text = Some(text),
        Section::Reflect(mut reflect) => {
            reflect.json = text;
            reflections.push(reflect);
        }
        Section::Text(stage, shader, lang) => {
            let owner = reflections
                .last_mut()
                .filter(|r| r.stage == stage && r.shader == shader)
                .ok_or_else(|| {
                    format!(
                        "text section for {} '{}' doesn't follow its reflect section",
                        stage.tag(),
                        shader
                    )
                })?;
            owner.texts.push((lang, text));
        }
    }
    Ok(())
}
