//! Nesting discipline: no section may open while another is open.

use shdc_lang::{parse_str, ErrorKind};

const OPENERS: [&str; 3] = ["@block inner", "@vs inner", "@fs inner"];

#[test]
fn test_every_opener_pair_is_rejected() {
    for outer in OPENERS {
        for inner in OPENERS {
            let source = format!("{}_outer\nfloat x;\n{}\nfloat y;\n@end\n@end\n", outer, inner);
            let err = parse_str("nest.shd", &source).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Structural, "{} inside {}", inner, outer);
            assert_eq!(err.loc.unwrap().line, 3);
        }
    }
}

#[test]
fn test_program_inside_every_section_is_rejected() {
    for outer in OPENERS {
        let source = format!("{}\nfloat x;\n@program p a b\n@end\n", outer);
        let err = parse_str("nest.shd", &source).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Structural);
        assert!(err.message.contains("@program 'p'"));
    }
}

#[test]
fn test_sequential_sections_are_fine() {
    let source = "\
@block a
float a;
@end
@block b
float b;
@end
@vs v
void main() {}
@end
@fs f
void main() {}
@end
";
    let lib = parse_str("seq.shd", source).unwrap();
    assert_eq!(lib.blocks().len(), 2);
    assert_eq!(lib.shaders().len(), 2);
}

#[test]
fn test_duplicate_names() {
    let blocks = "@block a\nx\n@end\n@block a\ny\n@end\n";
    assert_eq!(parse_str("d.shd", blocks).unwrap_err().kind, ErrorKind::Structural);

    let shaders = "@vs a\nx\n@end\n@vs a\ny\n@end\n";
    assert_eq!(parse_str("d.shd", shaders).unwrap_err().kind, ErrorKind::Structural);

    // Vertex and fragment shaders don't share a namespace
    let mixed = "@vs a\nx\n@end\n@fs a\ny\n@end\n";
    assert!(parse_str("d.shd", mixed).is_ok());
}

#[test]
fn test_comment_in_comment_is_syntax_error() {
    let source = "@vs a\n/* open\n/* again */\n@end\n";
    let err = parse_str("c.shd", source).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.loc.unwrap().line, 3);
}
