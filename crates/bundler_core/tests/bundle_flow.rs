use bundler_core::{
    decode, read_header, BundleError, BundleService, BundlerConfig, FsProjectStore,
    PreparedAnswers, RestoreRequest, RestoreService,
};
use chrono::NaiveDate;
use std::fs;

fn generated_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 12, 24)
        .and_then(|date| date.and_hms_opt(18, 0, 5))
        .unwrap()
}

#[test]
fn bundle_collects_matching_files_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("zeta.py"), "z = 26\n").unwrap();
    fs::write(dir.path().join("alpha.py"), "a = 1\n").unwrap();
    fs::write(dir.path().join("notes.md"), "not bundled").unwrap();
    let config = BundlerConfig::new(dir.path()).unwrap();
    let service = BundleService::new(FsProjectStore::from_config(&config));

    let outcome = service
        .bundle_at("demo", config.file_pattern(), generated_at())
        .unwrap();

    assert_eq!(outcome.included, vec!["alpha.py", "zeta.py"]);
    assert!(outcome.unreadable.is_empty());
    let alpha_at = outcome.archive_text.find("=== alpha.py ===").unwrap();
    let zeta_at = outcome.archive_text.find("=== zeta.py ===").unwrap();
    assert!(alpha_at < zeta_at);
    assert!(!outcome.archive_text.contains("not bundled"));

    let header = read_header(&outcome.archive_text);
    assert_eq!(header.declared_file_count, Some(2));
    assert_eq!(header.generated_at, Some(generated_at()));
}

#[test]
fn bundle_leaves_out_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("good.py"), "ok = 1").unwrap();
    fs::write(dir.path().join("bad.py"), b"\xc3\x28").unwrap();
    let config = BundlerConfig::new(dir.path()).unwrap();
    let service = BundleService::new(FsProjectStore::from_config(&config));

    let outcome = service.bundle("demo", config.file_pattern()).unwrap();

    assert_eq!(outcome.included, vec!["good.py"]);
    assert_eq!(outcome.unreadable, vec!["bad.py"]);
    assert_eq!(decode(&outcome.archive_text).unwrap().filenames(), vec!["good.py"]);
}

#[test]
fn bundle_without_matches_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();
    let config = BundlerConfig::new(dir.path()).unwrap();
    let service = BundleService::new(FsProjectStore::from_config(&config));

    let err = service.bundle("demo", config.file_pattern()).unwrap_err();
    assert!(matches!(err, BundleError::NoMatchingFiles(pattern) if pattern == "*.py"));

    let rust_config = config.with_pattern("*.rs").unwrap();
    let outcome = service.bundle("demo", rust_config.file_pattern()).unwrap();
    assert_eq!(outcome.included, vec!["main.rs"]);
}

#[test]
fn bundle_then_restore_into_other_directory() {
    let source = tempfile::tempdir().unwrap();
    fs::write(source.path().join("app.py"), "from lib import go\ngo()\n").unwrap();
    fs::write(source.path().join("lib.py"), "def go():\n    pass\n").unwrap();
    fs::write(source.path().join("empty.py"), "").unwrap();
    let source_config = BundlerConfig::new(source.path()).unwrap();
    let outcome = BundleService::new(FsProjectStore::from_config(&source_config))
        .bundle(&source_config.project_label(), source_config.file_pattern())
        .unwrap();
    assert_eq!(outcome.included.len(), 3);

    let target = tempfile::tempdir().unwrap();
    fs::write(target.path().join("lib.py"), "old").unwrap();
    let archive = decode(&outcome.archive_text).unwrap();
    // Empty files carry no content and are dropped on decode.
    assert_eq!(archive.filenames(), vec!["app.py", "lib.py"]);

    let target_config = BundlerConfig::new(target.path()).unwrap();
    let restorer = RestoreService::new(FsProjectStore::from_config(&target_config));
    let mut answers = PreparedAnswers::new(true);
    let report = restorer.restore(&archive, &RestoreRequest::all(true), &mut answers);

    assert_eq!((report.overwritten, report.created, report.errors), (1, 1, 0));
    assert_eq!(
        fs::read_to_string(target.path().join("app.py")).unwrap(),
        "from lib import go\ngo()"
    );
    assert_eq!(
        fs::read_to_string(target.path().join("lib.py")).unwrap(),
        "def go():\n    pass"
    );
}

#[test]
fn bundle_with_only_unreadable_files_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.py"), b"\xc3\x28").unwrap();
    let config = BundlerConfig::new(dir.path()).unwrap();
    let service = BundleService::new(FsProjectStore::from_config(&config));

    let err = service.bundle("demo", config.file_pattern()).unwrap_err();
    assert!(matches!(&err, BundleError::NoReadableFiles(names) if names == &["bad.py"]));
    assert!(err.to_string().contains("bad.py"));
}

#[test]
fn bundle_skips_files_holding_archive_text() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "remember the milk\n").unwrap();
    let config = BundlerConfig::new(dir.path()).unwrap().with_pattern("*.txt").unwrap();
    let service = BundleService::new(FsProjectStore::from_config(&config));

    let first = service
        .bundle_at("demo", config.file_pattern(), generated_at())
        .unwrap();
    fs::write(dir.path().join("demo_backup.txt"), &first.archive_text).unwrap();

    let second = service.bundle("demo", config.file_pattern()).unwrap();
    assert_eq!(second.included, vec!["notes.txt"]);
    assert_eq!(second.nested_archives, vec!["demo_backup.txt"]);
    assert_eq!(decode(&second.archive_text).unwrap().filenames(), vec!["notes.txt"]);

    fs::remove_file(dir.path().join("notes.txt")).unwrap();
    let err = service.bundle("demo", config.file_pattern()).unwrap_err();
    assert!(
        matches!(err, BundleError::NoReadableFiles(names) if names == vec!["demo_backup.txt".to_string()])
    );
}
