//! External shader compilation.
//!
//! A [`ShaderCompiler`] turns one expanded shader into a [`CompiledVariant`]
//! per requested variant. Every compiler leaves or expects the same files
//! under the work directory, keyed by a per-shader base path
//! `<work>/<stem>_<shader>.<vs|fs>`:
//!
//! | file | content |
//! |---|---|
//! | `<base>.glsl` | expanded shader source handed to the front end |
//! | `<base>.spv` | SPIR-V produced by the front end |
//! | `<base>.<variant>.json` | reflection document |
//! | `<base>.<variant>` | cross-compiled source, text variants |
//! | `<base>.<variant>.h` | C header defining the byte-code blob, byte-code variants |

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use log::debug;
use shdc_lang::{Shader, ShaderStage};
use shdc_reflect::{
    CompiledVariant, Payload, ReflectionRecord, ShaderLang, ShdcError, ShdcResult,
};

use crate::config::{CompilerKind, GenerateConfig};

/// One shader to compile.
#[derive(Debug, Clone, Copy)]
pub struct CompileJob<'a> {
    pub shader: &'a Shader,
    pub work_dir: &'a Path,
    /// Header file stem, prefix of every intermediate file
    pub stem: &'a str,
    pub langs: &'a [ShaderLang],
}

impl CompileJob<'_> {
    pub fn base(&self) -> PathBuf {
        self.work_dir.join(format!(
            "{}_{}.{}",
            self.stem,
            self.shader.name,
            self.shader.stage.tag()
        ))
    }
}

/// Capability to produce compiled variants for a shader.
///
/// Selected once per run by [`select_compiler`]; jobs for different shaders
/// run concurrently, so implementations must not share mutable state.
pub trait ShaderCompiler: Sync {
    fn name(&self) -> &'static str;

    /// Compile `job.shader` into every variant in `job.langs`, in that order.
    fn compile(&self, job: &CompileJob<'_>) -> ShdcResult<Vec<(ShaderLang, CompiledVariant)>>;
}

/// Pick the compiler for a run.
///
/// # Errors
///
/// Returns a compile error when the toolchain is asked for a byte-code
/// variant this host can't build.
pub fn select_compiler(config: &GenerateConfig) -> ShdcResult<Box<dyn ShaderCompiler>> {
    match config.compiler {
        CompilerKind::Toolchain => {
            check_host(config.langs(), std::env::consts::OS)?;
            Ok(Box::new(ToolchainCompiler::new(
                config.glslang.clone(),
                config.cross_compiler.clone(),
            )))
        }
        CompilerKind::Prebuilt => Ok(Box::new(PrebuiltCompiler)),
    }
}

/// Byte-code variants need the platform's native shader compiler.
pub fn check_host(langs: &[ShaderLang], os: &str) -> ShdcResult<()> {
    for &lang in langs {
        let required = match lang {
            ShaderLang::Metal => "macos",
            ShaderLang::Hlsl5 => "windows",
            _ => continue,
        };
        if os != required {
            return Err(ShdcError::compile(format!(
                "{} shaders can only be compiled on {}, this host is {}",
                lang, required, os
            )));
        }
    }
    Ok(())
}

/// Runs the GLSL front end and the cross-compiler for every shader.
#[derive(Debug, Clone)]
pub struct ToolchainCompiler {
    glslang: PathBuf,
    cross_compiler: PathBuf,
}

impl ToolchainCompiler {
    pub fn new(glslang: PathBuf, cross_compiler: PathBuf) -> Self {
        ToolchainCompiler {
            glslang,
            cross_compiler,
        }
    }

    fn run(&self, job: &CompileJob<'_>, command: &mut Command) -> ShdcResult<()> {
        debug!("running {:?}", command);
        let output = command.output().map_err(|e| {
            ShdcError::compile(format!(
                "cannot run {:?} for '{}': {}",
                command.get_program(),
                job.shader.name,
                e
            ))
            .at(job.shader.loc.clone())
        })?;
        if !output.status.success() {
            let mut transcript = String::from_utf8_lossy(&output.stdout).into_owned();
            transcript.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(ShdcError::compile(format!(
                "{:?} failed for {} shader '{}' ({}):\n{}",
                command.get_program(),
                job.shader.stage,
                job.shader.name,
                output.status,
                transcript.trim_end()
            ))
            .at(job.shader.loc.clone()));
        }
        Ok(())
    }
}

impl ShaderCompiler for ToolchainCompiler {
    fn name(&self) -> &'static str {
        "toolchain"
    }

    fn compile(&self, job: &CompileJob<'_>) -> ShdcResult<Vec<(ShaderLang, CompiledVariant)>> {
        let base = job.base();
        let glsl = with_suffix(&base, "glsl");
        let spirv = with_suffix(&base, "spv");

        fs::create_dir_all(job.work_dir).map_err(|e| io_error(job.work_dir, e))?;
        fs::write(&glsl, job.shader.source()).map_err(|e| io_error(&glsl, e))?;

        let stage = match job.shader.stage {
            ShaderStage::Vertex => "vert",
            ShaderStage::Fragment => "frag",
        };
        self.run(
            job,
            Command::new(&self.glslang)
                .args(["-G", "-S", stage, "-o"])
                .arg(&spirv)
                .arg(&glsl),
        )?;
        self.run(
            job,
            Command::new(&self.cross_compiler)
                .arg(&spirv)
                .arg(&base)
                .args(job.langs.iter().map(|l| l.name())),
        )?;

        load_variants(job)
    }
}

/// Loads the outputs of an earlier toolchain run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrebuiltCompiler;

impl ShaderCompiler for PrebuiltCompiler {
    fn name(&self) -> &'static str {
        "prebuilt"
    }

    fn compile(&self, job: &CompileJob<'_>) -> ShdcResult<Vec<(ShaderLang, CompiledVariant)>> {
        load_variants(job)
    }
}

/// Read the reflection and payload of every requested variant.
pub fn load_variants(job: &CompileJob<'_>) -> ShdcResult<Vec<(ShaderLang, CompiledVariant)>> {
    let base = job.base();
    job.langs
        .iter()
        .map(|&lang| load_variant(job, &base, lang).map(|v| (lang, v)))
        .collect()
}

fn load_variant(
    job: &CompileJob<'_>,
    base: &Path,
    lang: ShaderLang,
) -> ShdcResult<CompiledVariant> {
    let missing = |path: &Path| {
        ShdcError::reflection_missing(format!(
            "no {} output for {} shader '{}': '{}' doesn't exist",
            lang,
            job.shader.stage,
            job.shader.name,
            path.display()
        ))
        .at(job.shader.loc.clone())
    };

    let json_path = with_suffix(base, &format!("{}.json", lang));
    if !json_path.is_file() {
        return Err(missing(&json_path));
    }
    let json = fs::read_to_string(&json_path).map_err(|e| io_error(&json_path, e))?;
    let reflection = ReflectionRecord::from_json(&json, &json_path.display().to_string())
        .map_err(|e| e.at(job.shader.loc.clone()))?;

    let payload = if lang.is_text() {
        let text_path = with_suffix(base, lang.name());
        if !text_path.is_file() {
            return Err(missing(&text_path));
        }
        Payload::Source(fs::read_to_string(&text_path).map_err(|e| io_error(&text_path, e))?)
    } else {
        let header = with_suffix(base, &format!("{}.h", lang));
        if !header.is_file() {
            return Err(missing(&header));
        }
        // Included from the definitions artifact, wherever that is written
        let header = absolute(&header)?;
        Payload::Binary {
            header: header.display().to_string().replace('\\', "/"),
        }
    };
    Ok(CompiledVariant {
        reflection,
        payload,
    })
}

/// `base` with `.suffix` appended to its file name.
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// `path` anchored at the current directory when relative.
fn absolute(path: &Path) -> ShdcResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| io_error(path, e))?;
    Ok(cwd.join(path))
}

pub(crate) fn io_error(path: &Path, err: std::io::Error) -> ShdcError {
    ShdcError::io(format!("'{}': {}", path.display(), err))
}
