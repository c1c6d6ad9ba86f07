use std::fs;
use std::path::Path;

use super::*;

const SIMPLE_SCSS: &str = "$primary: #333;\n.nav {\n  color: $primary;\n  a { text-decoration: none; }\n}\n";

#[test]
fn compiles_string_expanded() {
    let result = GrassCompiler::new().compile_string(
        SIMPLE_SCSS,
        Path::new("source.scss"),
        Path::new("source.css"),
        &CompileOptions::default(),
    );
    assert!(result.is_success(), "unexpected failure: {:?}", result.error_message);
    let css = result.css.expect("css");
    assert!(css.contains(".nav {"));
    assert!(css.contains("color: #333;"));
    assert!(css.contains(".nav a {"));
    assert!(result.source_map.is_none());
}

#[test]
fn compressed_style_strips_whitespace() {
    let options = CompileOptions::new(OutputStyle::Compressed);
    let result =
        GrassCompiler::new().compile_string(SIMPLE_SCSS, Path::new("source.scss"), Path::new("source.css"), &options);
    let css = result.css.expect("css");
    assert!(css.contains(".nav{color:#333}"), "got {css:?}");
    assert!(!css.contains("\n  "));
}

#[test]
fn malformed_source_reports_message_and_json() {
    let result = GrassCompiler::new().compile_string(
        ".broken { color: red",
        Path::new("source.scss"),
        Path::new("source.css"),
        &CompileOptions::default(),
    );
    assert!(!result.is_success());
    assert_eq!(result.error_status, STATUS_SASS_ERROR);
    assert!(result.css.is_none());

    let message = result.error_message.expect("message");
    assert!(!message.is_empty());
    assert!(!message.starts_with("Error: "));

    let detail: serde_json::Value = serde_json::from_str(&result.error_json.expect("json")).expect("valid json");
    assert_eq!(detail["status"], 1);
    assert_eq!(detail["file"], "source.scss");
    assert_eq!(detail["message"], message.as_str());
    assert!(detail["formatted"].as_str().is_some_and(|f| f.contains(&message)));
}

#[test]
fn missing_file_is_a_file_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope.scss");
    let result = GrassCompiler::new().compile_file(&missing, None, &CompileOptions::default());
    assert_eq!(result.error_status, STATUS_FILE_ERROR);
    assert!(result.error_message.expect("message").contains("nope.scss"));
}

#[test]
fn directory_input_is_a_file_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let styles = dir.path().join("styles");
    fs::create_dir(&styles).expect("create dir");

    let result = GrassCompiler::new().compile_file(&styles, None, &CompileOptions::default());
    assert_eq!(result.error_status, STATUS_FILE_ERROR);
    assert!(result.error_message.expect("message").contains("not a regular file"));
    let detail: serde_json::Value = serde_json::from_str(&result.error_json.expect("json")).expect("valid json");
    assert_eq!(detail["status"], 3);
}

#[test]
fn compile_file_resolves_relative_imports() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("_colors.scss"), "$accent: blue;\n").expect("write partial");
    let main = dir.path().join("main.scss");
    fs::write(&main, "@import 'colors';\np { color: $accent; }\n").expect("write main");

    let result = GrassCompiler::new().compile_file(&main, None, &CompileOptions::default());
    assert!(result.is_success(), "unexpected failure: {:?}", result.error_message);
    assert!(result.css.expect("css").contains("color: blue;"));
}

#[test]
fn load_paths_are_searched() {
    let lib = tempfile::tempdir().expect("tempdir");
    fs::write(lib.path().join("_theme.scss"), "$size: 12px;\n").expect("write partial");

    let options = CompileOptions::default().with_load_paths(vec![lib.path().to_path_buf()]);
    let result = GrassCompiler::new().compile_string(
        "@import 'theme';\nbody { font-size: $size; }\n",
        Path::new("source.scss"),
        Path::new("source.css"),
        &options,
    );
    assert!(result.is_success(), "unexpected failure: {:?}", result.error_message);
    assert!(result.css.expect("css").contains("font-size: 12px;"));
}

#[test]
fn source_map_is_attached_when_requested() {
    let options = CompileOptions::default().with_source_map(Some("out/site.css.map".into()));
    let result = GrassCompiler::new().compile_string(
        "a { b: c; }",
        Path::new("source.scss"),
        Path::new("out/site.css"),
        &options,
    );
    let css = result.css.expect("css");
    assert!(css.ends_with("/*# sourceMappingURL=site.css.map */"), "got {css:?}");

    let map: serde_json::Value = serde_json::from_str(&result.source_map.expect("map")).expect("valid json");
    assert_eq!(map["version"], 3);
    assert_eq!(map["file"], "site.css");
    assert_eq!(map["sources"][0], "source.scss");
}

#[test]
fn identical_inputs_compile_identically() {
    let compiler = GrassCompiler::new();
    let options = CompileOptions::default();
    let first = compiler.compile_string(SIMPLE_SCSS, Path::new("source.scss"), Path::new("source.css"), &options);
    let second = compiler.compile_string(SIMPLE_SCSS, Path::new("source.scss"), Path::new("source.css"), &options);
    assert_eq!(first.css, second.css);
}
