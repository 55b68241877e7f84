use bundler_core::{BundlerConfig, FilePattern, FsProjectStore, ProjectStore, StoreError};
use std::fs;

#[test]
fn list_matching_is_non_recursive_and_filters_by_glob() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.py"), "b").unwrap();
    fs::write(dir.path().join("a.py"), "a").unwrap();
    fs::write(dir.path().join("a.pyc"), "compiled").unwrap();
    fs::write(dir.path().join("README.md"), "docs").unwrap();
    fs::create_dir(dir.path().join("pkg.py")).unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("nested.py"), "nested").unwrap();

    let store = FsProjectStore::new(dir.path());
    let names = store
        .list_matching(&FilePattern::parse("*.py").unwrap())
        .unwrap();
    assert_eq!(names, vec!["a.py", "b.py"]);
}

#[test]
fn list_matching_reports_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsProjectStore::new(dir.path().join("gone"));
    let err = store
        .list_matching(&FilePattern::parse("*.py").unwrap())
        .unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}

#[test]
fn write_creates_and_truncates_then_read_returns_text() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsProjectStore::new(dir.path());

    assert!(!store.exists("main.py"));
    store.write_file("main.py", "a much longer first version").unwrap();
    assert!(store.exists("main.py"));
    store.write_file("main.py", "short").unwrap();

    assert_eq!(store.read_file("main.py").as_deref(), Some("short"));
    assert_eq!(
        fs::read_to_string(dir.path().join("main.py")).unwrap(),
        "short"
    );
}

#[test]
fn read_failures_are_absent_not_errors() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("binary.py"), b"\xff\xfe\x00").unwrap();
    let store = FsProjectStore::new(dir.path());

    assert_eq!(store.read_file("missing.py"), None);
    assert_eq!(store.read_file("binary.py"), None);
}

#[test]
fn write_into_directory_path_fails_without_panicking() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("taken.py")).unwrap();
    let store = FsProjectStore::new(dir.path());

    let err = store.write_file("taken.py", "x").unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(err.to_string().contains("taken.py"));
}

#[test]
fn store_never_leaves_project_directory() {
    let root = tempfile::tempdir().unwrap();
    let project = root.path().join("project");
    fs::create_dir(&project).unwrap();
    let store = FsProjectStore::from_config(&BundlerConfig::new(&project).unwrap());

    let err = store.write_file("../outside.py", "x").unwrap_err();
    assert!(matches!(err, StoreError::InvalidFileName(_)));
    assert!(!root.path().join("outside.py").exists());
    assert_eq!(store.root(), project.as_path());
}
