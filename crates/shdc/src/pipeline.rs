//! One generation run, from source documents to artifact files.

use std::{fs, path::Path, time::Instant};

use log::{debug, info, warn};
use rayon::prelude::*;
use shdc_codegen::{Artifacts, Backend, CBackend, Unit};
use shdc_lang::{parse_library, Library};
use shdc_reflect::{validate, ReflectionStore, ShaderLang, ShdcError, ShdcResult};

use crate::{
    compiler::{io_error, select_compiler, CompileJob, ShaderCompiler},
    config::GenerateConfig,
    output::write_atomic,
};

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct Generated {
    pub library: Library,
    pub artifacts: Artifacts,
}

/// Run the whole pipeline and replace the configured artifact files.
///
/// Nothing is written unless every stage succeeds.
pub fn run(config: &GenerateConfig) -> ShdcResult<Generated> {
    let compiler = select_compiler(config)?;
    let generated = generate(config, compiler.as_ref())?;
    write_atomic(&[
        (
            config.header.as_path(),
            generated.artifacts.declarations.as_str(),
        ),
        (
            config.source.as_path(),
            generated.artifacts.definitions.as_str(),
        ),
    ])?;
    info!(
        "wrote {} and {}",
        config.header.display(),
        config.source.display()
    );
    Ok(generated)
}

/// Parse, compile, validate and emit, without touching the artifact files.
pub fn generate(config: &GenerateConfig, compiler: &dyn ShaderCompiler) -> ShdcResult<Generated> {
    let start = Instant::now();
    let library = load_library(config.sources.iter().map(|p| p.as_path()))?;
    if library.is_empty() {
        warn!("no shaders or programs found in the given sources");
    }

    let langs = config.langs();
    let store = compile_all(
        &library,
        compiler,
        &config.work_dir(),
        &config.stem(),
        langs,
    )?;
    validate(&library, &store, langs)?;

    let header_name = config.header_name();
    let artifacts = CBackend.generate(&Unit {
        library: &library,
        store: &store,
        langs,
        header_name: &header_name,
    })?;
    debug!("generation took {:?}", start.elapsed());
    Ok(Generated { library, artifacts })
}

/// Read and parse the source documents, in order, into one library.
pub fn load_library<'a>(paths: impl IntoIterator<Item = &'a Path>) -> ShdcResult<Library> {
    let mut documents = Vec::new();
    for path in paths {
        let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        documents.push((path.display().to_string(), text));
    }
    let sources: Vec<(&str, &str)> = documents
        .iter()
        .map(|(path, text)| (path.as_str(), text.as_str()))
        .collect();
    parse_library(&sources)
}

/// Compile every shader of `library` into every variant of `langs`.
///
/// Shaders compile in parallel; results are gathered in declaration order
/// and the first failure in that order is reported.
pub fn compile_all(
    library: &Library,
    compiler: &dyn ShaderCompiler,
    work_dir: &Path,
    stem: &str,
    langs: &[ShaderLang],
) -> ShdcResult<ReflectionStore> {
    info!(
        "compiling {} shaders into {} variants with the {} compiler",
        library.shaders().len(),
        langs.len(),
        compiler.name()
    );
    if !library.shaders().is_empty() {
        fs::create_dir_all(work_dir).map_err(|e| io_error(work_dir, e))?;
    }

    let results: Vec<_> = library
        .shaders()
        .par_iter()
        .map(|shader| {
            compiler.compile(&CompileJob {
                shader,
                work_dir,
                stem,
                langs,
            })
        })
        .collect();

    let mut store = ReflectionStore::new();
    for (shader, result) in library.shaders().iter().zip(results) {
        let variants = result?;
        if variants.len() != langs.len() {
            return Err(ShdcError::compile(format!(
                "{} compiler produced {} variants for '{}', expected {}",
                compiler.name(),
                variants.len(),
                shader.name,
                langs.len()
            ))
            .at(shader.loc.clone()));
        }
        for (lang, variant) in variants {
            debug!("compiled {} shader '{}' ({})", shader.stage, shader.name, lang);
            store.insert(shader.stage, shader.name.clone(), lang, variant);
        }
    }
    Ok(store)
}
