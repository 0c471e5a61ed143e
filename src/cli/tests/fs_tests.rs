use super::fs::{FileDiscoveryOptions, discover_ts_files};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn touch(dir: &Path, rel: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, "export {};\n").unwrap();
    path
}

fn relative_names(paths: &[PathBuf], base: &Path) -> Vec<String> {
    let mut names: Vec<String> = paths
        .iter()
        .map(|path| {
            path.strip_prefix(base)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    names.sort();
    names
}

fn base_dir(temp: &TempDir) -> PathBuf {
    temp.path().canonicalize().unwrap()
}

#[test]
fn walks_everything_by_default() {
    let temp = TempDir::new().unwrap();
    let base = base_dir(&temp);
    touch(&base, "a.ts");
    touch(&base, "b.tsx");
    touch(&base, "c.js");
    touch(&base, "types.d.ts");
    touch(&base, "src/deep/y.ts");
    touch(&base, "node_modules/pkg/z.ts");
    touch(&base, ".cache/hidden.ts");

    let options = FileDiscoveryOptions {
        base_dir: base.clone(),
        ..Default::default()
    };
    let found = discover_ts_files(&options).unwrap();

    assert_eq!(
        relative_names(&found, &base),
        vec!["a.ts", "b.tsx", "src/deep/y.ts", "types.d.ts"]
    );
}

#[test]
fn explicit_files_skip_the_walk() {
    let temp = TempDir::new().unwrap();
    let base = base_dir(&temp);
    let wanted = touch(&base, "main.ts");
    touch(&base, "other.ts");

    let options = FileDiscoveryOptions {
        base_dir: base.clone(),
        files: vec![PathBuf::from("main.ts")],
        ..Default::default()
    };
    let found = discover_ts_files(&options).unwrap();

    assert_eq!(found, vec![wanted]);
}

#[test]
fn explicit_files_union_with_include() {
    let temp = TempDir::new().unwrap();
    let base = base_dir(&temp);
    touch(&base, "extra.ts");
    touch(&base, "src/x.ts");

    let options = FileDiscoveryOptions {
        base_dir: base.clone(),
        files: vec![PathBuf::from("extra.ts")],
        include: Some(vec!["src".to_string()]),
        ..Default::default()
    };
    let found = discover_ts_files(&options).unwrap();

    assert_eq!(relative_names(&found, &base), vec!["extra.ts", "src/x.ts"]);
}

#[test]
fn include_directory_names_cover_their_subtree() {
    let temp = TempDir::new().unwrap();
    let base = base_dir(&temp);
    touch(&base, "top.ts");
    touch(&base, "src/x.ts");
    touch(&base, "src/deep/y.ts");

    let options = FileDiscoveryOptions {
        base_dir: base.clone(),
        include: Some(vec!["src".to_string()]),
        ..Default::default()
    };
    let found = discover_ts_files(&options).unwrap();

    assert_eq!(
        relative_names(&found, &base),
        vec!["src/deep/y.ts", "src/x.ts"]
    );
}

#[test]
fn single_star_stays_within_one_level() {
    let temp = TempDir::new().unwrap();
    let base = base_dir(&temp);
    touch(&base, "a.ts");
    touch(&base, "src/x.ts");

    let options = FileDiscoveryOptions {
        base_dir: base.clone(),
        include: Some(vec!["*.ts".to_string()]),
        ..Default::default()
    };
    let found = discover_ts_files(&options).unwrap();

    assert_eq!(relative_names(&found, &base), vec!["a.ts"]);
}

#[test]
fn exclude_prunes_matched_directories() {
    let temp = TempDir::new().unwrap();
    let base = base_dir(&temp);
    touch(&base, "src/x.ts");
    touch(&base, "generated/g.ts");

    let options = FileDiscoveryOptions {
        base_dir: base.clone(),
        exclude: Some(vec!["generated".to_string()]),
        ..Default::default()
    };
    let found = discover_ts_files(&options).unwrap();

    assert_eq!(relative_names(&found, &base), vec!["src/x.ts"]);
}

#[test]
fn out_dir_is_never_walked() {
    let temp = TempDir::new().unwrap();
    let base = base_dir(&temp);
    touch(&base, "src/x.ts");
    touch(&base, "dist/stale.ts");

    let options = FileDiscoveryOptions {
        base_dir: base.clone(),
        out_dir: Some(base.join("dist")),
        ..Default::default()
    };
    let found = discover_ts_files(&options).unwrap();

    assert_eq!(relative_names(&found, &base), vec!["src/x.ts"]);
}
