//! The `declarations` and `definitions` subtests - filecheck the generated artifacts

use shdc_codegen::{Backend, CBackend, Unit};
use shdc_lang::{parse_str, Library};
use shdc_reflect::{
    validate, CompiledVariant, Payload, ReflectionRecord, ReflectionStore, ShaderLang, ShdcResult,
};

use crate::{
    filecheck::match_filecheck,
    parser::{parse_test_file, Command, TestFile},
};

/// Path the library source of every test file is parsed under.
pub const SOURCE_PATH: &str = "lib.shd";

/// Header name the definitions artifact includes.
pub const HEADER_NAME: &str = "lib.h";

/// Build the reflection store described by a test file's `reflect` sections.
///
/// Text variants without a `text` section get an empty source; byte-code
/// variants point at `<shader>_<vs|fs>.<variant>.h`.
pub fn build_store(test: &TestFile) -> ShdcResult<ReflectionStore> {
    let mut store = ReflectionStore::new();
    for section in &test.reflections {
        let langs: Vec<ShaderLang> = match section.variant {
            Some(lang) => vec![lang],
            None => test.family.langs().to_vec(),
        };
        let origin = format!("reflect {} {}", section.stage.tag(), section.shader);
        let reflection = ReflectionRecord::from_json(&section.json, &origin)?;

        for lang in langs {
            let payload = if lang.is_text() {
                let text = section
                    .texts
                    .iter()
                    .find(|(l, _)| *l == lang)
                    .map(|(_, text)| text.clone())
                    .unwrap_or_default();
                Payload::Source(text)
            } else {
                Payload::Binary {
                    header: format!("{}_{}.{}.h", section.shader, section.stage.tag(), lang),
                }
            };
            let variant = CompiledVariant {
                reflection: reflection.clone(),
                payload,
            };
            store.insert(section.stage, section.shader.clone(), lang, variant);
        }
    }
    Ok(store)
}

fn prepare(test: &TestFile) -> ShdcResult<(Library, ReflectionStore)> {
    let library = parse_str(SOURCE_PATH, &test.source)?;
    let store = build_store(test)?;
    validate(&library, &store, test.family.langs())?;
    Ok((library, store))
}

/// Run a single generation test
pub fn run_generate_test(test: &TestFile) {
    let (library, store) = prepare(test)
        .unwrap_or_else(|e| panic!("Generate test failed before generation: {}", e));
    let artifacts = CBackend
        .generate(&Unit {
            library: &library,
            store: &store,
            langs: test.family.langs(),
            header_name: HEADER_NAME,
        })
        .unwrap_or_else(|e| panic!("Generate test failed: {}", e));

    let actual = match test.command {
        Command::Declarations => &artifacts.declarations,
        Command::Definitions => &artifacts.definitions,
        Command::Validate => panic!("Not a generation test: test validate"),
    };
    if let Err(e) = match_filecheck(actual, &test.expected_text) {
        panic!(
            "Generate test failed ({:?}):\n{}\n\nActual output:\n{}",
            test.command, e, actual
        );
    }
}

/// Run the generation test in a file
#[allow(dead_code)]
fn run_test_from_file(content: &str, command: Command) {
    let test = parse_test_file(content).unwrap_or_else(|e| panic!("Bad test file: {}", e));
    assert_eq!(
        test.command, command,
        "Unexpected test command: {:?}",
        test.command
    );
    run_generate_test(&test);
}
