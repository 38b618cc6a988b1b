use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use log::{error, LevelFilter};
use shdc::{CompilerKind, Family, GenerateConfig, Overrides};

/// Compile an annotated shader library into a C header and source file.
#[derive(Debug, Parser)]
#[command(name = "shdc", version, about)]
struct Cli {
    /// Shader library documents, parsed in order
    sources: Vec<PathBuf>,

    /// JSON run configuration; flags override its settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Declarations file to write
    #[arg(long)]
    header: Option<PathBuf>,

    /// Definitions file to write
    #[arg(long)]
    source: Option<PathBuf>,

    /// Target family: glsl, gles, msl or hlsl
    #[arg(long)]
    family: Option<Family>,

    /// Directory for compiler inputs and outputs
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Where compiled variants come from: toolchain or prebuilt
    #[arg(long)]
    compiler: Option<CompilerKind>,

    /// GLSL front end executable
    #[arg(long)]
    glslang: Option<PathBuf>,

    /// Cross-compiler executable
    #[arg(long)]
    spirv_cross: Option<PathBuf>,

    /// Log every step
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(self) -> (Option<PathBuf>, Overrides) {
        let overrides = Overrides {
            sources: self.sources,
            header: self.header,
            source: self.source,
            family: self.family,
            work_dir: self.work_dir,
            compiler: self.compiler,
            glslang: self.glslang,
            cross_compiler: self.spirv_cross,
        };
        (self.config, overrides)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .init();

    let (config_file, overrides) = cli.overrides();
    let result = GenerateConfig::resolve(config_file.as_deref(), overrides)
        .and_then(|config| shdc::run(&config));
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
