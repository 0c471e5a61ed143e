//! Compilation driver: resolves configuration, discovers inputs, runs
//! the pipeline over every file in parallel, and writes the outputs.

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use tsdl_common::{Diagnostic, JsxEmit};

use crate::cli::args::CliArgs;
use crate::cli::config::{
    ResolvedCompilerOptions, TsConfig, load_tsconfig, resolve_compiler_options,
};
use crate::cli::fs::{FileDiscoveryOptions, canonicalize_or_owned, discover_ts_files};
use crate::{CompileOutput, compile_source};

#[derive(Debug, Clone)]
pub struct CompilationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub emitted_files: Vec<PathBuf>,
    pub files_read: Vec<PathBuf>,
}

struct CompiledUnit {
    path: PathBuf,
    output: CompileOutput,
}

struct OutputFile {
    path: PathBuf,
    contents: String,
}

/// Run one full compilation for the given arguments.
///
/// Every file is compiled independently, so the only ordering in the
/// result is the explicit sort of the diagnostics.
pub fn compile(args: &CliArgs, cwd: &Path) -> Result<CompilationResult> {
    let cwd = canonicalize_or_owned(cwd);
    let tsconfig_path = resolve_tsconfig_path(&cwd, args.project.as_deref())?;
    let config = load_config(tsconfig_path.as_deref())?;

    let mut resolved = resolve_compiler_options(
        config
            .as_ref()
            .and_then(|cfg| cfg.compiler_options.as_ref()),
    )?;
    apply_cli_overrides(&mut resolved, args);

    let base_dir = config_base_dir(&cwd, tsconfig_path.as_deref());
    let base_dir = canonicalize_or_owned(&base_dir);
    let root_dir = normalize_root_dir(&base_dir, resolved.root_dir.clone());
    let out_dir = normalize_output_dir(&base_dir, resolved.out_dir.clone());

    let discovery = build_discovery_options(
        args,
        &base_dir,
        tsconfig_path.as_deref(),
        config.as_ref(),
        out_dir.as_deref(),
    )?;
    let file_paths = discover_ts_files(&discovery)?;
    if file_paths.is_empty() {
        bail!("no input files found");
    }

    let mut sources = Vec::with_capacity(file_paths.len());
    for path in &file_paths {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        sources.push((path.clone(), text));
    }

    let mut files_read = file_paths;
    files_read.sort();

    let options = &resolved.compiler;
    let units: Vec<CompiledUnit> = sources
        .into_par_iter()
        .map(|(path, text)| {
            let file_name = path.to_string_lossy().into_owned();
            let output = compile_source(&file_name, &text, options);
            CompiledUnit { path, output }
        })
        .collect();

    let mut diagnostics: Vec<Diagnostic> = units
        .iter()
        .flat_map(|unit| unit.output.diagnostics.iter().cloned())
        .collect();
    diagnostics.sort_by(|left, right| {
        left.file
            .cmp(&right.file)
            .then(left.start.cmp(&right.start))
            .then(left.code.cmp(&right.code))
    });

    let has_error = diagnostics.iter().any(|diag| diag.is_error());
    let should_emit = !(resolved.no_emit || (resolved.no_emit_on_error && has_error));

    let emitted_files = if !should_emit {
        Vec::new()
    } else {
        let outputs = plan_outputs(
            units,
            &base_dir,
            root_dir.as_deref(),
            out_dir.as_deref(),
            resolved.compiler.jsx,
        );
        write_outputs(&outputs)?
    };

    Ok(CompilationResult {
        diagnostics,
        emitted_files,
        files_read,
    })
}

pub(crate) fn find_tsconfig(cwd: &Path) -> Option<PathBuf> {
    let candidate = cwd.join("tsconfig.json");
    if candidate.is_file() {
        Some(canonicalize_or_owned(&candidate))
    } else {
        None
    }
}

pub(crate) fn resolve_tsconfig_path(cwd: &Path, project: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(project) = project else {
        return Ok(find_tsconfig(cwd));
    };

    let mut candidate = if project.is_absolute() {
        project.to_path_buf()
    } else {
        cwd.join(project)
    };

    if candidate.is_dir() {
        candidate = candidate.join("tsconfig.json");
    }

    if !candidate.exists() {
        bail!("tsconfig not found at {}", candidate.display());
    }

    if !candidate.is_file() {
        bail!("project path is not a file: {}", candidate.display());
    }

    Ok(Some(canonicalize_or_owned(&candidate)))
}

pub(crate) fn load_config(path: Option<&Path>) -> Result<Option<TsConfig>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let config = load_tsconfig(path)?;
    Ok(Some(config))
}

pub(crate) fn config_base_dir(cwd: &Path, tsconfig_path: Option<&Path>) -> PathBuf {
    tsconfig_path
        .and_then(|path| path.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| cwd.to_path_buf())
}

fn build_discovery_options(
    args: &CliArgs,
    base_dir: &Path,
    tsconfig_path: Option<&Path>,
    config: Option<&TsConfig>,
    out_dir: Option<&Path>,
) -> Result<FileDiscoveryOptions> {
    let follow_links = env_flag("TSDL_FOLLOW_SYMLINKS");
    if !args.files.is_empty() {
        return Ok(FileDiscoveryOptions {
            base_dir: base_dir.to_path_buf(),
            files: args.files.clone(),
            include: None,
            exclude: None,
            out_dir: out_dir.map(Path::to_path_buf),
            follow_links,
        });
    }

    let Some(config) = config else {
        bail!("no input files specified and no tsconfig.json found");
    };
    let Some(tsconfig_path) = tsconfig_path else {
        bail!("no tsconfig.json path available");
    };

    let mut options = FileDiscoveryOptions::from_tsconfig(tsconfig_path, config, out_dir);
    options.follow_links = follow_links;
    Ok(options)
}

fn apply_cli_overrides(resolved: &mut ResolvedCompilerOptions, args: &CliArgs) {
    args.apply_to(&mut resolved.compiler);

    if let Some(out_dir) = args.out_dir.as_ref() {
        resolved.out_dir = Some(out_dir.clone());
    }
    if let Some(root_dir) = args.root_dir.as_ref() {
        resolved.root_dir = Some(root_dir.clone());
    }
    if args.no_emit {
        resolved.no_emit = true;
    }
    if args.no_emit_on_error {
        resolved.no_emit_on_error = true;
    }
}

fn plan_outputs(
    units: Vec<CompiledUnit>,
    base_dir: &Path,
    root_dir: Option<&Path>,
    out_dir: Option<&Path>,
    jsx: JsxEmit,
) -> Vec<OutputFile> {
    let mut outputs = Vec::new();
    for unit in units {
        // A unit that failed to parse produced no text; skip it rather
        // than writing an empty file over the previous output.
        if unit.output.text.is_empty() && unit.output.has_errors() {
            continue;
        }

        if let Some(path) = js_output_path(base_dir, root_dir, out_dir, jsx, &unit.path) {
            outputs.push(OutputFile {
                path,
                contents: unit.output.text,
            });
        }
    }
    outputs
}

fn write_outputs(outputs: &[OutputFile]) -> Result<Vec<PathBuf>> {
    outputs.par_iter().try_for_each(|output| -> Result<()> {
        if let Some(parent) = output.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        std::fs::write(&output.path, &output.contents)
            .with_context(|| format!("failed to write {}", output.path.display()))?;
        Ok(())
    })?;

    Ok(outputs.iter().map(|output| output.path.clone()).collect())
}

fn js_output_path(
    base_dir: &Path,
    root_dir: Option<&Path>,
    out_dir: Option<&Path>,
    jsx: JsxEmit,
    input_path: &Path,
) -> Option<PathBuf> {
    if is_declaration_file(input_path) {
        return None;
    }

    let extension = js_extension_for(input_path, jsx)?;
    let relative = output_relative_path(base_dir, root_dir, input_path);
    let mut output = match out_dir {
        Some(out_dir) => out_dir.join(relative),
        None => input_path.to_path_buf(),
    };
    output.set_extension(extension);
    Some(output)
}

fn output_relative_path(base_dir: &Path, root_dir: Option<&Path>, input_path: &Path) -> PathBuf {
    if let Some(root_dir) = root_dir
        && let Ok(relative) = input_path.strip_prefix(root_dir)
    {
        return relative.to_path_buf();
    }

    input_path
        .strip_prefix(base_dir)
        .unwrap_or(input_path)
        .to_path_buf()
}

fn is_declaration_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    name.ends_with(".d.ts")
}

fn js_extension_for(path: &Path, jsx: JsxEmit) -> Option<&'static str> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("ts") => Some("js"),
        // JSX is only ever preserved, so .tsx stays JSX on disk.
        Some("tsx") => match jsx {
            JsxEmit::Preserve => Some("jsx"),
        },
        _ => None,
    }
}

pub(crate) fn normalize_output_dir(base_dir: &Path, dir: Option<PathBuf>) -> Option<PathBuf> {
    dir.map(|dir| {
        if dir.is_absolute() {
            dir
        } else {
            base_dir.join(dir)
        }
    })
}

pub(crate) fn normalize_root_dir(base_dir: &Path, dir: Option<PathBuf>) -> Option<PathBuf> {
    dir.map(|dir| {
        let resolved = if dir.is_absolute() {
            dir
        } else {
            base_dir.join(dir)
        };
        canonicalize_or_owned(&resolved)
    })
}

fn env_flag(name: &str) -> bool {
    let Ok(value) = std::env::var(name) else {
        return false;
    };
    let normalized = value.trim().to_ascii_lowercase();
    matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
}
