use super::args::{CliArgs, Module, Target};
use super::driver::compile;
use std::path::Path;
use tempfile::TempDir;

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create parent directory");
    }
    std::fs::write(path, contents).expect("failed to write file");
}

fn default_args() -> CliArgs {
    CliArgs {
        project: None,
        target: None,
        module: None,
        use_define_for_class_fields: None,
        out_dir: None,
        root_dir: None,
        no_emit: false,
        no_emit_on_error: false,
        new_line: None,
        remove_comments: false,
        preserve_const_enums: false,
        pretty: None,
        json: false,
        list_files: false,
        list_emitted_files: false,
        files: Vec::new(),
    }
}

#[test]
fn compile_with_tsconfig_emits_outputs() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();

    write_file(
        &base.join("tsconfig.json"),
        r#"{
          "compilerOptions": {
            "outDir": "dist"
          },
          "include": ["src/**/*.ts"]
        }"#,
    );
    write_file(&base.join("src/index.ts"), "export const value = 1;\n");

    let args = default_args();
    let result = compile(&args, base).expect("compile should succeed");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.emitted_files.len(), 1);
    let output = base.join("dist/src/index.js");
    assert!(output.is_file());

    let contents = std::fs::read_to_string(&output).expect("read js output");
    assert!(contents.contains("__esModule"), "{contents}");
    assert!(contents.contains("exports.value"), "{contents}");
}

#[test]
fn explicit_files_compile_in_place() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();
    write_file(&base.join("main.ts"), "const x: number = 1;\n");

    let mut args = default_args();
    args.files = vec!["main.ts".into()];
    let result = compile(&args, base).expect("compile should succeed");

    assert!(result.diagnostics.is_empty());
    let output = base.join("main.js");
    assert!(output.is_file());
    assert_eq!(
        std::fs::read_to_string(&output).expect("read js output"),
        "const x = 1;\n"
    );
}

#[test]
fn root_dir_is_stripped_from_output_layout() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();

    write_file(
        &base.join("tsconfig.json"),
        r#"{
          "compilerOptions": {
            "rootDir": "src",
            "outDir": "dist"
          },
          "include": ["src"]
        }"#,
    );
    write_file(&base.join("src/nested/mod.ts"), "let a = 1;\n");

    let args = default_args();
    let result = compile(&args, base).expect("compile should succeed");

    assert!(result.diagnostics.is_empty());
    assert!(base.join("dist/nested/mod.js").is_file());
    assert!(!base.join("dist/src/nested/mod.js").exists());
}

#[test]
fn tsx_outputs_keep_jsx_extension() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();

    write_file(
        &base.join("tsconfig.json"),
        r#"{"compilerOptions": {"outDir": "dist"}, "include": ["**/*"]}"#,
    );
    write_file(&base.join("view.tsx"), "const n: number = 2;\n");

    let args = default_args();
    let result = compile(&args, base).expect("compile should succeed");

    assert!(result.diagnostics.is_empty());
    assert!(base.join("dist/view.jsx").is_file());
}

#[test]
fn declaration_files_produce_no_output() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();

    write_file(
        &base.join("tsconfig.json"),
        r#"{"compilerOptions": {"outDir": "dist"}}"#,
    );
    write_file(&base.join("types.d.ts"), "declare const version: string;\n");
    write_file(&base.join("app.ts"), "let ready = true;\n");

    let args = default_args();
    let result = compile(&args, base).expect("compile should succeed");

    assert_eq!(result.emitted_files.len(), 1);
    assert!(base.join("dist/app.js").is_file());
    assert!(!base.join("dist/types.js").exists());
    // Both files were part of the compilation.
    assert_eq!(result.files_read.len(), 2);
}

#[test]
fn cli_module_overrides_tsconfig() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();

    write_file(
        &base.join("tsconfig.json"),
        r#"{"compilerOptions": {"module": "esnext"}, "include": ["**/*"]}"#,
    );
    write_file(&base.join("lib.ts"), "export const flag = true;\n");

    let mut args = default_args();
    args.module = Some(Module::CommonJs);
    let result = compile(&args, base).expect("compile should succeed");

    assert!(result.diagnostics.is_empty());
    let contents = std::fs::read_to_string(base.join("lib.js")).expect("read js output");
    assert!(contents.contains("exports.flag"), "{contents}");
    assert!(!contents.contains("export const"), "{contents}");
}

#[test]
fn cli_target_switches_class_field_lowering() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();
    write_file(&base.join("c.ts"), "class C {\n    x = 1;\n}\n");

    let mut args = default_args();
    args.files = vec!["c.ts".into()];
    args.target = Some(Target::Es2015);
    compile(&args, base).expect("compile should succeed");

    let downlevel = std::fs::read_to_string(base.join("c.js")).expect("read js output");
    assert!(downlevel.contains("this.x = 1"), "{downlevel}");
    assert!(downlevel.contains("constructor()"), "{downlevel}");

    args.target = Some(Target::Es2022);
    compile(&args, base).expect("compile should succeed");

    let modern = std::fs::read_to_string(base.join("c.js")).expect("read js output");
    assert!(!modern.contains("this.x"), "{modern}");
    assert!(modern.contains("x = 1;"), "{modern}");
}

#[test]
fn no_emit_suppresses_outputs() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();
    write_file(&base.join("main.ts"), "let ok = true;\n");

    let mut args = default_args();
    args.files = vec!["main.ts".into()];
    args.no_emit = true;
    let result = compile(&args, base).expect("compile should succeed");

    assert!(result.emitted_files.is_empty());
    assert!(!base.join("main.js").exists());
}

#[test]
fn no_emit_on_error_skips_all_outputs() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();
    write_file(&base.join("good.ts"), "let fine = 1;\n");
    write_file(&base.join("bad.ts"), "const = 1;\n");

    let mut args = default_args();
    args.files = vec!["good.ts".into(), "bad.ts".into()];
    args.no_emit_on_error = true;
    let result = compile(&args, base).expect("compile should succeed");

    assert!(!result.diagnostics.is_empty());
    assert!(result.emitted_files.is_empty());
    assert!(!base.join("good.js").exists());
}

#[test]
fn parse_failure_skips_only_that_file() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();
    write_file(&base.join("good.ts"), "let fine = 1;\n");
    write_file(&base.join("bad.ts"), "const = 1;\n");

    let mut args = default_args();
    args.files = vec!["good.ts".into(), "bad.ts".into()];
    let result = compile(&args, base).expect("compile should succeed");

    assert!(result.diagnostics.iter().any(|diag| diag.is_error()));
    assert!(base.join("good.js").is_file());
    assert!(!base.join("bad.js").exists());
}

#[test]
fn diagnostics_are_sorted_by_file_then_position() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();
    write_file(&base.join("b.ts"), "enum E { A = , }\n");
    write_file(&base.join("a.ts"), "const = 1;\nconst = 2;\n");

    let mut args = default_args();
    args.files = vec!["b.ts".into(), "a.ts".into()];
    let result = compile(&args, base).expect("compile should succeed");

    assert!(result.diagnostics.len() >= 2);
    let ordered: Vec<_> = result
        .diagnostics
        .iter()
        .map(|diag| (diag.file.clone(), diag.start))
        .collect();
    let mut sorted = ordered.clone();
    sorted.sort();
    assert_eq!(ordered, sorted);
}

#[test]
fn errors_without_inputs_or_config() {
    let temp = TempDir::new().expect("temp dir");

    let args = default_args();
    let err = compile(&args, temp.path()).expect_err("missing inputs should error");
    assert!(
        err.to_string().contains("no input files specified"),
        "{err}"
    );
}

#[test]
fn project_flag_selects_tsconfig_in_directory() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();

    write_file(
        &base.join("proj/tsconfig.json"),
        r#"{"compilerOptions": {"outDir": "out"}, "include": ["**/*"]}"#,
    );
    write_file(&base.join("proj/entry.ts"), "let n = 0;\n");

    let mut args = default_args();
    args.project = Some("proj".into());
    let result = compile(&args, base).expect("compile should succeed");

    assert_eq!(result.emitted_files.len(), 1);
    assert!(base.join("proj/out/entry.js").is_file());
}

#[test]
fn missing_project_path_errors() {
    let temp = TempDir::new().expect("temp dir");

    let mut args = default_args();
    args.project = Some("nowhere".into());
    let err = compile(&args, temp.path()).expect_err("missing project should error");
    assert!(err.to_string().contains("tsconfig not found"), "{err}");
}
