use super::config::{load_tsconfig, parse_tsconfig, resolve_compiler_options};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use tsdl_common::{JsxEmit, ModuleKind, NewLineKind, ScriptTarget};

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write test file");
    path
}

#[test]
fn parses_jsonc_with_trailing_commas() {
    let input = r#"
    {
      // comment
      "compilerOptions": {
        "target": "es2017", /* inline */
        "module": "commonjs",
      },
      "include": ["src/**/*",],
    }
    "#;

    let config = parse_tsconfig(input).expect("should parse JSONC");
    let options = config.compiler_options.expect("compilerOptions missing");

    assert_eq!(options.target.as_deref(), Some("es2017"));
    assert_eq!(options.module.as_deref(), Some("commonjs"));
    assert_eq!(config.include, Some(vec!["src/**/*".to_string()]));
}

#[test]
fn comment_markers_inside_strings_survive() {
    let input = r#"{"include": ["src//special/*", "a/*b*/c"]}"#;

    let config = parse_tsconfig(input).expect("should parse");
    assert_eq!(
        config.include,
        Some(vec!["src//special/*".to_string(), "a/*b*/c".to_string()])
    );
}

#[test]
fn accepts_booleans_spelled_as_strings() {
    let config = parse_tsconfig(
        r#"{
          "compilerOptions": {
            "noEmit": "yes",
            "removeComments": "1",
            "preserveConstEnums": true,
            "noEmitOnError": "off"
          }
        }"#,
    )
    .expect("should parse config");
    let options = config.compiler_options.expect("compilerOptions missing");

    assert_eq!(options.no_emit, Some(true));
    assert_eq!(options.remove_comments, Some(true));
    assert_eq!(options.preserve_const_enums, Some(true));
    assert_eq!(options.no_emit_on_error, Some(false));
}

#[test]
fn rejects_unrecognized_boolean_strings() {
    let err = parse_tsconfig(r#"{"compilerOptions": {"noEmit": "maybe"}}"#)
        .expect_err("bad boolean should error");
    let message = format!("{err:#}");
    assert!(message.contains("invalid boolean value"), "{message}");
}

#[test]
fn load_tsconfig_merges_extends() {
    let temp = TempDir::new().expect("temp dir");

    write_file(
        temp.path(),
        "tsconfig.base.json",
        r#"{
          "compilerOptions": {"target": "es2015", "removeComments": true},
          "include": ["src"],
          "exclude": ["dist"]
        }"#,
    );

    let child_path = write_file(
        temp.path(),
        "tsconfig.json",
        r#"{
          "extends": "./tsconfig.base.json",
          "compilerOptions": {"module": "commonjs", "removeComments": false},
          "files": ["main.ts"]
        }"#,
    );

    let config = load_tsconfig(&child_path).expect("should load config");
    let options = config.compiler_options.expect("compilerOptions missing");

    assert_eq!(options.target.as_deref(), Some("es2015"));
    assert_eq!(options.module.as_deref(), Some("commonjs"));
    assert_eq!(options.remove_comments, Some(false));
    assert_eq!(config.include, Some(vec!["src".to_string()]));
    assert_eq!(config.exclude, Some(vec!["dist".to_string()]));
    assert_eq!(config.files, Some(vec!["main.ts".to_string()]));
}

#[test]
fn extends_path_defaults_to_json_extension() {
    let temp = TempDir::new().expect("temp dir");

    write_file(
        temp.path(),
        "base.json",
        r#"{"compilerOptions": {"target": "es2016"}}"#,
    );
    let child = write_file(temp.path(), "tsconfig.json", r#"{"extends": "./base"}"#);

    let config = load_tsconfig(&child).expect("should load config");
    let options = config.compiler_options.expect("compilerOptions missing");
    assert_eq!(options.target.as_deref(), Some("es2016"));
}

#[test]
fn load_tsconfig_detects_extends_cycle() {
    let temp = TempDir::new().expect("temp dir");

    write_file(temp.path(), "a.json", r#"{"extends":"./b.json"}"#);
    write_file(temp.path(), "b.json", r#"{"extends":"./a.json"}"#);

    let err = load_tsconfig(&temp.path().join("a.json")).expect_err("cycle should error");
    let message = err.to_string();
    assert!(message.contains("extends cycle"), "{message}");
}

#[test]
fn resolve_compiler_options_defaults() {
    let resolved = resolve_compiler_options(None).expect("defaults should resolve");

    assert_eq!(resolved.compiler.target, ScriptTarget::EsNext);
    assert_eq!(resolved.compiler.module, ModuleKind::CommonJs);
    assert_eq!(resolved.compiler.jsx, JsxEmit::Preserve);
    assert_eq!(resolved.compiler.new_line, NewLineKind::LineFeed);
    assert!(resolved.root_dir.is_none());
    assert!(resolved.out_dir.is_none());
    assert!(!resolved.no_emit);
    assert!(!resolved.no_emit_on_error);
}

#[test]
fn resolve_compiler_options_overrides() {
    let config = parse_tsconfig(
        r#"{
          "compilerOptions": {
            "target": "ES2020",
            "module": "common-js",
            "jsx": "preserve",
            "newLine": "crlf",
            "rootDir": "src",
            "outDir": "dist",
            "useDefineForClassFields": false,
            "preserveConstEnums": true,
            "noEmit": true,
            "noEmitOnError": true
          }
        }"#,
    )
    .expect("should parse config");

    let resolved = resolve_compiler_options(config.compiler_options.as_ref())
        .expect("compiler options should resolve");

    assert_eq!(resolved.compiler.target, ScriptTarget::Es2020);
    assert_eq!(resolved.compiler.module, ModuleKind::CommonJs);
    assert_eq!(resolved.compiler.new_line, NewLineKind::CarriageReturnLineFeed);
    assert_eq!(resolved.compiler.use_define_for_class_fields, Some(false));
    assert!(resolved.compiler.preserve_const_enums);
    assert_eq!(resolved.root_dir, Some(PathBuf::from("src")));
    assert_eq!(resolved.out_dir, Some(PathBuf::from("dist")));
    assert!(resolved.no_emit);
    assert!(resolved.no_emit_on_error);
}

#[test]
fn resolve_compiler_options_rejects_unknown_values() {
    let config = parse_tsconfig(
        r#"{
          "compilerOptions": {
            "target": "es2999"
          }
        }"#,
    )
    .expect("should parse config");

    let err = resolve_compiler_options(config.compiler_options.as_ref())
        .expect_err("unknown compilerOptions should error");
    let message = err.to_string();
    assert!(message.contains("compilerOptions.target"), "{message}");
}

#[test]
fn resolve_compiler_options_rejects_es5_target() {
    let config = parse_tsconfig(r#"{"compilerOptions": {"target": "es5"}}"#)
        .expect("should parse config");

    let err = resolve_compiler_options(config.compiler_options.as_ref())
        .expect_err("es5 target should error");
    assert!(err.to_string().contains("es5"), "{err}");
}

#[test]
fn resolve_compiler_options_rejects_unsupported_jsx() {
    let config = parse_tsconfig(
        r#"{
          "compilerOptions": {
            "jsx": "react"
          }
        }"#,
    )
    .expect("should parse config");

    let err = resolve_compiler_options(config.compiler_options.as_ref())
        .expect_err("unsupported jsx should error");
    let message = err.to_string();
    assert!(message.contains("compilerOptions.jsx"), "{message}");
}

#[test]
fn module_spellings_collapse_to_supported_kinds() {
    for spelling in ["es2015", "es2020", "es2022", "esnext", "ES-Next", "es6"] {
        let source = format!(r#"{{"compilerOptions": {{"module": "{spelling}"}}}}"#);
        let config = parse_tsconfig(&source).expect("should parse config");
        let resolved = resolve_compiler_options(config.compiler_options.as_ref())
            .unwrap_or_else(|err| panic!("{spelling} should resolve: {err}"));
        assert_eq!(resolved.compiler.module, ModuleKind::EsNext, "{spelling}");
    }
}
