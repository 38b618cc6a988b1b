//! Whole generation runs against a scratch directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use shdc::{run, CompilerKind, ErrorKind, Family, GenerateConfig, Overrides};

const LIB: &str = "\
@block common
uniform float time;
@end
@vs a
@include common
in vec4 position;
out vec4 color;
void main() { gl_Position = position; color = position; }
@end
@fs b
in vec4 color;
out vec4 frag;
void main() { frag = color; }
@end
@program p a b
";

const VS_JSON: &str = r#"{
    "inputs": [ { "name": "position", "type": "vec4", "slot": 0 } ],
    "outputs": [ { "name": "color", "type": "vec4" } ]
}"#;

const FS_JSON: &str = r#"{ "inputs": [ { "name": "color", "type": "vec4" } ] }"#;

/// Scratch directory holding sources, prebuilt compiler outputs and artifacts.
struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    fn new(name: &str) -> Self {
        Self::at(std::env::temp_dir().join(format!("shdc-{}-{}", name, std::process::id())))
    }

    /// Scratch directory relative to the working directory of the test.
    fn relative(name: &str) -> Self {
        Self::at(PathBuf::from(format!("shdc-{}-{}", name, std::process::id())))
    }

    fn at(dir: PathBuf) -> Self {
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("build")).unwrap();
        fs::create_dir_all(dir.join("gen")).unwrap();
        Scratch { dir }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Leave the outputs a glsl330 toolchain run would have produced.
    fn prebuilt(&self, shader: &str, tag: &str, json: &str) {
        let base = format!("build/shaders_{}.{}.glsl330", shader, tag);
        self.write(&format!("{}.json", base), json);
        self.write(&base, "#version 330\nvoid main() {}\n");
    }

    fn config(&self, sources: Vec<PathBuf>) -> GenerateConfig {
        GenerateConfig::resolve(
            None,
            Overrides {
                sources,
                header: Some(self.header()),
                source: Some(self.source()),
                family: Some(Family::Glsl),
                work_dir: Some(self.dir.join("build")),
                compiler: Some(CompilerKind::Prebuilt),
                ..Overrides::default()
            },
        )
        .unwrap()
    }

    fn header(&self) -> PathBuf {
        self.dir.join("gen").join("shaders.h")
    }

    fn source(&self) -> PathBuf {
        self.dir.join("gen").join("shaders.c")
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn tmp_exists(path: &Path) -> bool {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    Path::new(&name).exists()
}

#[test]
fn test_run_writes_artifact_pair() {
    let scratch = Scratch::new("pair");
    let lib = scratch.write("lib.shd", LIB);
    scratch.prebuilt("a", "vs", VS_JSON);
    scratch.prebuilt("b", "fs", FS_JSON);

    let generated = run(&scratch.config(vec![lib])).unwrap();
    assert_eq!(generated.library.programs().len(), 1);

    let header = fs::read_to_string(scratch.header()).unwrap();
    let source = fs::read_to_string(scratch.source()).unwrap();
    assert_eq!(header, generated.artifacts.declarations);
    assert!(header.contains("SHD_PROGRAM_P"));
    assert!(source.contains("#include \"shaders.h\""));
    assert!(source.contains("shd_program shd_get_program_p(enum SHD_SHADER_TARGET_TYPE type) {"));
    assert!(!tmp_exists(&scratch.header()));
    assert!(!tmp_exists(&scratch.source()));
}

#[test]
fn test_include_spans_documents() {
    let scratch = Scratch::new("multi");
    let (common, rest) = LIB.split_at(LIB.find("@vs a").unwrap());
    let first = scratch.write("common.shd", common);
    let second = scratch.write("lit.shd", rest);
    scratch.prebuilt("a", "vs", VS_JSON);
    scratch.prebuilt("b", "fs", FS_JSON);

    let generated = run(&scratch.config(vec![first, second])).unwrap();
    let vs = &generated.library.shaders()[0];
    assert!(vs.source().contains("uniform float time;"));
}

#[test]
fn test_mismatch_writes_nothing() {
    let scratch = Scratch::new("mismatch");
    let lib = scratch.write("lib.shd", LIB);
    scratch.prebuilt("a", "vs", VS_JSON);
    scratch.prebuilt(
        "b",
        "fs",
        r#"{ "inputs": [ { "name": "tint", "type": "vec4" } ] }"#,
    );

    let err = run(&scratch.config(vec![lib])).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InterfaceMismatch);
    assert!(!scratch.header().exists());
    assert!(!scratch.source().exists());
}

#[test]
fn test_missing_prebuilt_output() {
    let scratch = Scratch::new("missing");
    let lib = scratch.write("lib.shd", LIB);
    scratch.prebuilt("a", "vs", VS_JSON);

    let err = run(&scratch.config(vec![lib])).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReflectionMissing);
    assert_eq!(err.loc.unwrap().line, 10);
}

#[test]
fn test_missing_source_document() {
    let scratch = Scratch::new("nosource");
    let err = run(&scratch.config(vec![scratch.dir.join("absent.shd")])).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Io);
    assert!(err.message.contains("absent.shd"));
}

#[test]
fn test_unavailable_toolchain() {
    let scratch = Scratch::new("toolchain");
    let lib = scratch.write("lib.shd", LIB);
    let mut config = scratch.config(vec![lib]);
    config.compiler = CompilerKind::Toolchain;
    config.glslang = scratch.dir.join("no-such-glslang");

    let err = run(&config).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Compile);
    assert!(!scratch.header().exists());
}

#[test]
fn test_runs_are_deterministic() {
    let scratch = Scratch::new("determinism");
    let lib = scratch.write("lib.shd", LIB);
    scratch.prebuilt("a", "vs", VS_JSON);
    scratch.prebuilt("b", "fs", FS_JSON);
    let config = scratch.config(vec![lib]);

    let first = run(&config).unwrap().artifacts;
    let second = run(&config).unwrap().artifacts;
    assert_eq!(first, second);
}

#[test]
fn test_blob_include_resolves_from_source_dir() {
    let scratch = Scratch::relative("blob");
    let lib = scratch.write("lib.shd", LIB);
    // default work dir is the header's directory
    for (shader, tag, json) in [("a", "vs", VS_JSON), ("b", "fs", FS_JSON)] {
        let base = format!("gen/shaders_{}.{}.metal", shader, tag);
        scratch.write(&format!("{}.json", base), json);
        scratch.write(&format!("{}.h", base), "static const unsigned char blob[] = { 0 };\n");
    }
    let mut config = scratch.config(vec![lib]);
    config.family = Family::Msl;
    config.work_dir = None;

    run(&config).unwrap();
    let source = fs::read_to_string(scratch.source()).unwrap();
    let includes: Vec<&str> = source
        .lines()
        .filter_map(|l| l.strip_prefix("#include \""))
        .filter_map(|l| l.strip_suffix('"'))
        .filter(|path| path.ends_with(".metal.h"))
        .collect();
    assert_eq!(includes.len(), 2);
    for include in includes {
        let include = Path::new(include);
        assert!(include.is_absolute(), "{} is relative", include.display());
        assert!(include.is_file());
    }
}
