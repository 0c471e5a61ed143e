//! Input file discovery.
//!
//! Inputs come from three places with tsc's precedence: explicit paths
//! on the command line, the tsconfig `files` list, and an
//! include/exclude walk of the config directory. Walks skip the usual
//! package directories and the configured outDir.

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cli::config::TsConfig;

const DEFAULT_EXCLUDES: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

/// Where to look for inputs and what to skip.
#[derive(Debug, Clone, Default)]
pub struct FileDiscoveryOptions {
    pub base_dir: PathBuf,
    /// Exact paths, taken as-is without glob matching.
    pub files: Vec<PathBuf>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    /// Output directory, never walked.
    pub out_dir: Option<PathBuf>,
    pub follow_links: bool,
}

impl FileDiscoveryOptions {
    pub fn from_tsconfig(tsconfig_path: &Path, config: &TsConfig, out_dir: Option<&Path>) -> Self {
        let base_dir = tsconfig_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let files = config
            .files
            .iter()
            .flatten()
            .map(PathBuf::from)
            .collect();

        FileDiscoveryOptions {
            base_dir,
            files,
            include: config.include.clone(),
            exclude: config.exclude.clone(),
            out_dir: out_dir.map(Path::to_path_buf),
            follow_links: false,
        }
    }
}

/// Collect the compilation's input files, sorted and deduplicated.
///
/// Explicit `files` are unioned with the include walk when both are
/// present, the way tsc builds its program. With neither, everything
/// under the base directory is in.
pub fn discover_ts_files(options: &FileDiscoveryOptions) -> Result<Vec<PathBuf>> {
    let mut found = BTreeSet::new();

    for file in &options.files {
        let path = if file.is_absolute() {
            file.clone()
        } else {
            options.base_dir.join(file)
        };
        found.insert(canonicalize_or_owned(&path));
    }

    let walk_needed = options.files.is_empty() || options.include.is_some();
    if walk_needed {
        walk_base_dir(options, &mut found)?;
    }

    Ok(found.into_iter().collect())
}

fn walk_base_dir(options: &FileDiscoveryOptions, found: &mut BTreeSet<PathBuf>) -> Result<()> {
    let default_include = vec!["**/*".to_string()];
    let include = options.include.as_deref().unwrap_or(&default_include);
    let include_set = build_glob_set(include)?;

    let mut exclude_patterns: Vec<String> = options
        .exclude
        .as_deref()
        .unwrap_or_default()
        .to_vec();
    for default in DEFAULT_EXCLUDES {
        exclude_patterns.push((*default).to_string());
    }
    let exclude_set = build_glob_set(&exclude_patterns)?;

    let out_dir = options.out_dir.as_deref().map(canonicalize_or_owned);

    let walker = WalkDir::new(&options.base_dir)
        .follow_links(options.follow_links)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir_entry(entry));

    for entry in walker {
        let entry = entry.context("failed to walk input directory")?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !is_compilable_file(path) {
            continue;
        }
        if let Some(out_dir) = out_dir.as_deref()
            && canonicalize_or_owned(path).starts_with(out_dir)
        {
            continue;
        }

        let Ok(relative) = path.strip_prefix(&options.base_dir) else {
            continue;
        };
        let relative = normalize_slashes(relative);
        if exclude_set.is_match(&relative) || !include_set.is_match(&relative) {
            continue;
        }

        found.insert(path.to_path_buf());
    }

    Ok(())
}

fn is_skipped_dir_entry(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let Some(name) = entry.file_name().to_str() else {
        return true;
    };
    name.starts_with('.') || DEFAULT_EXCLUDES.contains(&name)
}

/// Only TypeScript sources participate. Declaration files still count:
/// they produce no output but appear in the file list like tsc's.
fn is_compilable_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("ts") | Some("tsx")
    )
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        for expanded in expand_pattern(pattern) {
            // Literal separators give tsc's wildcard semantics: * stays
            // within one directory level, ** crosses.
            let glob = GlobBuilder::new(&expanded)
                .literal_separator(true)
                .build()
                .with_context(|| format!("invalid file pattern '{}'", pattern))?;
            builder.add(glob);
        }
    }
    builder.build().context("failed to build file patterns")
}

// "src" in include means the directory and everything under it, so a
// bare name doubles as "src/**". Patterns with glob metacharacters are
// taken literally.
fn expand_pattern(pattern: &str) -> Vec<String> {
    let trimmed = pattern.trim_end_matches('/');
    let mut expanded = vec![trimmed.to_string()];
    if !trimmed.contains(['*', '?', '[', '{']) {
        expanded.push(format!("{}/**", trimmed));
    }
    expanded
}

fn normalize_slashes(path: &Path) -> String {
    let text = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

pub(crate) fn canonicalize_or_owned(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
