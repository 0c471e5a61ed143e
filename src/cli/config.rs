//! tsconfig.json loading.
//!
//! Accepts the JSONC dialect tsc accepts (comments, trailing commas),
//! follows `extends` chains with cycle detection, and resolves the
//! compilerOptions subset the pipeline honors into [`CompilerOptions`]
//! plus the output-layout fields the driver consumes directly.

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tsdl_common::{JsxEmit, ModuleKind, NewLineKind, ScriptTarget};

// tsconfig in the wild carries booleans as strings often enough that
// rejecting them outright is a support burden.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(value)) => Ok(Some(value)),
        Some(BoolOrString::String(value)) => {
            match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                other => Err(serde::de::Error::custom(format!(
                    "invalid boolean value '{other}'"
                ))),
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub compiler_options: Option<ConfigOptions>,
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

/// Raw compilerOptions as they appear in the JSON, before validation.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOptions {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub jsx: Option<String>,
    #[serde(default)]
    pub new_line: Option<String>,
    #[serde(default)]
    pub root_dir: Option<String>,
    #[serde(default)]
    pub out_dir: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub use_define_for_class_fields: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub remove_comments: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub preserve_const_enums: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub no_emit: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub no_emit_on_error: Option<bool>,
}

/// Validated compilerOptions. The pipeline options travel as one value;
/// the rest only matters to the driver's output planning.
#[derive(Debug, Clone, Default)]
pub struct ResolvedCompilerOptions {
    pub compiler: tsdl_common::CompilerOptions,
    pub root_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub no_emit: bool,
    pub no_emit_on_error: bool,
}

pub fn resolve_compiler_options(
    options: Option<&ConfigOptions>,
) -> Result<ResolvedCompilerOptions> {
    let mut resolved = ResolvedCompilerOptions::default();
    let Some(options) = options else {
        return Ok(resolved);
    };

    if let Some(target) = options.target.as_deref() {
        resolved.compiler.target = parse_script_target(target)?;
    }

    if let Some(module) = options.module.as_deref() {
        resolved.compiler.module = parse_module_kind(module)?;
    }

    if let Some(jsx) = options.jsx.as_deref() {
        resolved.compiler.jsx = parse_jsx_emit(jsx)?;
    }

    if let Some(new_line) = options.new_line.as_deref() {
        resolved.compiler.new_line = parse_new_line_kind(new_line)?;
    }

    if let Some(use_define) = options.use_define_for_class_fields {
        resolved.compiler.use_define_for_class_fields = Some(use_define);
    }

    if let Some(remove_comments) = options.remove_comments {
        resolved.compiler.remove_comments = remove_comments;
    }

    if let Some(preserve_const_enums) = options.preserve_const_enums {
        resolved.compiler.preserve_const_enums = preserve_const_enums;
    }

    if let Some(root_dir) = options.root_dir.as_deref()
        && !root_dir.is_empty()
    {
        resolved.root_dir = Some(PathBuf::from(root_dir));
    }

    if let Some(out_dir) = options.out_dir.as_deref()
        && !out_dir.is_empty()
    {
        resolved.out_dir = Some(PathBuf::from(out_dir));
    }

    if let Some(no_emit) = options.no_emit {
        resolved.no_emit = no_emit;
    }

    if let Some(no_emit_on_error) = options.no_emit_on_error {
        resolved.no_emit_on_error = no_emit_on_error;
    }

    Ok(resolved)
}

pub fn parse_tsconfig(source: &str) -> Result<TsConfig> {
    let stripped = strip_jsonc(source);
    let normalized = remove_trailing_commas(&stripped);
    let config = serde_json::from_str(&normalized).context("failed to parse tsconfig JSON")?;
    Ok(config)
}

pub fn load_tsconfig(path: &Path) -> Result<TsConfig> {
    let mut visited = HashSet::new();
    load_tsconfig_inner(path, &mut visited)
}

fn load_tsconfig_inner(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<TsConfig> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        bail!("tsconfig extends cycle detected at {}", canonical.display());
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tsconfig: {}", path.display()))?;
    let mut config = parse_tsconfig(&source)
        .with_context(|| format!("failed to parse tsconfig: {}", path.display()))?;

    let extends = config.extends.take();
    if let Some(extends_path) = extends {
        let base_path = resolve_extends_path(path, &extends_path)?;
        let base_config = load_tsconfig_inner(&base_path, visited)?;
        config = merge_configs(base_config, config);
    }

    visited.remove(&canonical);
    Ok(config)
}

fn resolve_extends_path(current_path: &Path, extends: &str) -> Result<PathBuf> {
    let base_dir = current_path
        .parent()
        .ok_or_else(|| anyhow!("tsconfig has no parent directory"))?;
    let mut candidate = PathBuf::from(extends);
    if candidate.extension().is_none() {
        candidate.set_extension("json");
    }

    if candidate.is_absolute() {
        Ok(candidate)
    } else {
        Ok(base_dir.join(candidate))
    }
}

fn merge_configs(base: TsConfig, mut child: TsConfig) -> TsConfig {
    let merged_options = match (base.compiler_options, child.compiler_options.take()) {
        (Some(base_opts), Some(child_opts)) => Some(merge_config_options(base_opts, child_opts)),
        (Some(base_opts), None) => Some(base_opts),
        (None, Some(child_opts)) => Some(child_opts),
        (None, None) => None,
    };

    TsConfig {
        extends: None,
        compiler_options: merged_options,
        include: child.include.or(base.include),
        exclude: child.exclude.or(base.exclude),
        files: child.files.or(base.files),
    }
}

fn merge_config_options(base: ConfigOptions, child: ConfigOptions) -> ConfigOptions {
    ConfigOptions {
        target: child.target.or(base.target),
        module: child.module.or(base.module),
        jsx: child.jsx.or(base.jsx),
        new_line: child.new_line.or(base.new_line),
        root_dir: child.root_dir.or(base.root_dir),
        out_dir: child.out_dir.or(base.out_dir),
        use_define_for_class_fields: child
            .use_define_for_class_fields
            .or(base.use_define_for_class_fields),
        remove_comments: child.remove_comments.or(base.remove_comments),
        preserve_const_enums: child.preserve_const_enums.or(base.preserve_const_enums),
        no_emit: child.no_emit.or(base.no_emit),
        no_emit_on_error: child.no_emit_on_error.or(base.no_emit_on_error),
    }
}

fn parse_script_target(value: &str) -> Result<ScriptTarget> {
    ScriptTarget::from_str_ignore_case(&normalize_option(value))
        .ok_or_else(|| anyhow!("unsupported compilerOptions.target '{}'", value))
}

fn parse_module_kind(value: &str) -> Result<ModuleKind> {
    ModuleKind::from_str_ignore_case(&normalize_option(value))
        .ok_or_else(|| anyhow!("unsupported compilerOptions.module '{}'", value))
}

fn parse_jsx_emit(value: &str) -> Result<JsxEmit> {
    match normalize_option(value).as_str() {
        "preserve" => Ok(JsxEmit::Preserve),
        _ => bail!("unsupported compilerOptions.jsx '{}'", value),
    }
}

fn parse_new_line_kind(value: &str) -> Result<NewLineKind> {
    match normalize_option(value).as_str() {
        "lf" => Ok(NewLineKind::LineFeed),
        "crlf" => Ok(NewLineKind::CarriageReturnLineFeed),
        _ => bail!("unsupported compilerOptions.newLine '{}'", value),
    }
}

// tsconfig option values ignore case, dashes, and underscores, so
// "ES2015", "es-2015" and "es_2015" all name the same target.
fn normalize_option(value: &str) -> String {
    let mut normalized = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '-' || ch == '_' || ch.is_whitespace() {
            continue;
        }
        normalized.push(ch.to_ascii_lowercase());
    }
    normalized
}

// Replaces // and /* */ comments with nothing, keeping the newlines
// inside them so serde_json error lines still match the file.
fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;

    while let Some(ch) = chars.next() {
        if in_line_comment {
            if ch == '\n' {
                in_line_comment = false;
                out.push(ch);
            }
            continue;
        }

        if in_block_comment {
            if ch == '*' {
                if let Some('/') = chars.peek().copied() {
                    chars.next();
                    in_block_comment = false;
                }
            } else if ch == '\n' {
                out.push(ch);
            }
            continue;
        }

        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
            out.push(ch);
            continue;
        }

        if ch == '/'
            && let Some(&next) = chars.peek()
        {
            if next == '/' {
                chars.next();
                in_line_comment = true;
                continue;
            }
            if next == '*' {
                chars.next();
                in_block_comment = true;
                continue;
            }
        }

        out.push(ch);
    }

    out
}

fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
            out.push(ch);
            continue;
        }

        if ch == ',' {
            // Drop the comma when the next non-whitespace is a closer.
            let mut lookahead = chars.clone();
            while lookahead.peek().is_some_and(|next| next.is_whitespace()) {
                lookahead.next();
            }
            if let Some(&next) = lookahead.peek()
                && (next == '}' || next == ']')
            {
                continue;
            }
        }

        out.push(ch);
    }

    out
}
