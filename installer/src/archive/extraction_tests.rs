//! Unit tests for archive extraction.

use super::*;
use crate::archive::walk;
use crate::test_utils::{TarFixture, noise_bytes};
use rstest::rstest;
use tempfile::TempDir;

fn sample() -> TarFixture {
    TarFixture::new()
        .dir("go/")
        .file("go/VERSION", b"go1.21.4\n", 0o644)
        .dir("go/bin/")
        .file("go/bin/go", b"#!/bin/true\n", 0o755)
        .dir("go/pkg/tool/")
        .file("go/pkg/tool/vet", b"vet", 0o750)
        .symlink("go/bin/gofmt-link", "gofmt")
}

fn write_archive(temp_dir: &TempDir, bytes: &[u8]) -> PathBuf {
    let path = temp_dir.path().join("archive.tar.gz");
    fs::write(&path, bytes).expect("write archive");
    path
}

#[rstest]
#[case::parent_dir("../escape.txt")]
#[case::nested_parent("foo/../../escape.txt")]
#[case::inner_parent("go/../escape.txt")]
fn rejects_path_traversal(#[case] bad_path: &str) {
    let result = validate_entry_path(Path::new(bad_path));
    assert!(
        matches!(result, Err(EntryError::PathTraversal { .. })),
        "expected PathTraversal for {bad_path}"
    );
}

#[rstest]
#[case::nested("go/bin/go")]
#[case::current_dir("./go/VERSION")]
#[case::bare_dot(".")]
fn accepts_contained_paths(#[case] good_path: &str) {
    assert!(validate_entry_path(Path::new(good_path)).is_ok());
}

#[test]
fn rejects_absolute_path() {
    let result = validate_entry_path(Path::new("/etc/passwd"));
    assert!(matches!(result, Err(EntryError::PathTraversal { .. })));
}

#[rstest]
#[case::plain(sample().to_tar())]
#[case::gzip(sample().to_tar_gz().expect("gzip fixture"))]
fn extracts_tree_with_contents(#[case] bytes: Vec<u8>) {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let archive = write_archive(&temp_dir, &bytes);
    let dest = temp_dir.path().join("out");

    let report = extract_file(&archive, &dest).expect("extract");

    assert_eq!(report.entries(), 7);
    assert!(report.is_clean());
    assert!(dest.join("go/bin").is_dir());
    assert!(dest.join("go/pkg/tool").is_dir());
    assert_eq!(
        fs::read(dest.join("go/VERSION")).expect("read VERSION"),
        b"go1.21.4\n"
    );
    assert_eq!(fs::read(dest.join("go/bin/go")).expect("read go"), b"#!/bin/true\n");
    assert_eq!(fs::read(dest.join("go/pkg/tool/vet")).expect("read vet"), b"vet");
}

#[test]
fn skips_links_and_special_entries() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let archive = write_archive(&temp_dir, &sample().to_tar_gz().expect("gzip fixture"));
    let dest = temp_dir.path().join("out");

    extract_file(&archive, &dest).expect("extract");

    assert!(fs::symlink_metadata(dest.join("go/bin/gofmt-link")).is_err());
}

#[cfg(unix)]
#[rstest]
#[case::readable("go/VERSION", 0o644)]
#[case::executable("go/bin/go", 0o755)]
#[case::group_only("go/pkg/tool/vet", 0o750)]
fn applies_archive_file_modes(#[case] name: &str, #[case] expected: u32) {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempfile::tempdir().expect("temp dir");
    let archive = write_archive(&temp_dir, &sample().to_tar_gz().expect("gzip fixture"));
    let dest = temp_dir.path().join("out");

    extract_file(&archive, &dest).expect("extract");

    let mode = fs::metadata(dest.join(name))
        .expect("metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, expected);
}

#[test]
fn creates_parents_missing_from_archive() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let bytes = TarFixture::new()
        .file("a/b/c/deep.txt", b"deep", 0o644)
        .to_tar();
    let archive = write_archive(&temp_dir, &bytes);
    let dest = temp_dir.path().join("out");

    extract_file(&archive, &dest).expect("extract");

    assert_eq!(fs::read(dest.join("a/b/c/deep.txt")).expect("read"), b"deep");
}

#[test]
fn extracting_twice_tolerates_existing_tree() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let archive = write_archive(&temp_dir, &sample().to_tar_gz().expect("gzip fixture"));
    let dest = temp_dir.path().join("out");

    extract_file(&archive, &dest).expect("first extraction");
    extract_file(&archive, &dest).expect("second extraction");

    assert_eq!(fs::read(dest.join("go/bin/go")).expect("read"), b"#!/bin/true\n");
}

#[test]
fn truncates_existing_files() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let archive = write_archive(&temp_dir, &sample().to_tar_gz().expect("gzip fixture"));
    let dest = temp_dir.path().join("out");
    fs::create_dir_all(dest.join("go")).expect("create go");
    fs::write(dest.join("go/VERSION"), b"a much longer stale version file").expect("write stale");

    extract_file(&archive, &dest).expect("extract");

    assert_eq!(
        fs::read(dest.join("go/VERSION")).expect("read"),
        b"go1.21.4\n"
    );
}

#[rstest]
#[case::parent_file(TarFixture::new().file("../escape.txt", b"x", 0o644))]
#[case::nested_parent_file(TarFixture::new().dir("go/").file("go/../../escape.txt", b"x", 0o644))]
#[case::parent_dir(TarFixture::new().dir("../escape.txt/"))]
fn traversal_entries_fail_without_escaping(#[case] fixture: TarFixture) {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let archive = write_archive(&temp_dir, &fixture.to_tar());
    let dest = temp_dir.path().join("out");

    let err = extract_file(&archive, &dest).expect_err("traversal must fail");

    assert!(matches!(
        err,
        WalkError::Handler {
            source: EntryError::PathTraversal { .. },
            ..
        }
    ));
    assert!(!temp_dir.path().join("escape.txt").exists());
}

#[test]
fn absolute_entries_fail() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let target = temp_dir.path().join("absolute.txt");
    let name = target.to_str().expect("utf-8 temp path");
    let bytes = TarFixture::new().file(name, b"x", 0o644).to_tar();
    let archive = write_archive(&temp_dir, &bytes);
    let dest = temp_dir.path().join("out");

    let err = extract_file(&archive, &dest).expect_err("absolute path must fail");

    assert!(matches!(
        err,
        WalkError::Handler {
            source: EntryError::PathTraversal { .. },
            ..
        }
    ));
    assert!(!target.exists());
}

#[test]
fn continue_policy_extracts_safe_entries_around_traversal() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let bytes = TarFixture::new()
        .file("safe-before.txt", b"before", 0o644)
        .file("../escape.txt", b"x", 0o644)
        .file("safe-after.txt", b"after", 0o644)
        .to_tar();
    let dest = temp_dir.path().join("out");
    let mut extractor = Extractor::new(&dest);

    let report = walk(bytes.as_slice(), &mut extractor, ErrorPolicy::ContinueOnError)
        .expect("structurally sound archive");

    assert_eq!(report.failures().len(), 1);
    assert_eq!(extractor.files_written(), 2);
    assert!(dest.join("safe-before.txt").exists());
    assert!(dest.join("safe-after.txt").exists());
    assert!(!temp_dir.path().join("escape.txt").exists());
}

#[test]
fn truncated_payload_is_structural() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let mut bytes = TarFixture::new()
        .dir("go/")
        .file("go/big", &noise_bytes(200 * 1024), 0o644)
        .to_tar_gz()
        .expect("gzip fixture");
    bytes.truncate(bytes.len() / 2);
    let archive = write_archive(&temp_dir, &bytes);
    let dest = temp_dir.path().join("out");

    let err = extract_file(&archive, &dest).expect_err("corrupt stream");
    assert!(matches!(err, WalkError::Structural(_)), "got {err}");
}
