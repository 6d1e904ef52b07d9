//! Unit tests for the archive walker.

use super::*;
use crate::archive::entry::EntryKind;
use crate::test_utils::{TarFixture, noise_bytes};
use rstest::rstest;
use std::io;

fn sample() -> TarFixture {
    TarFixture::new()
        .dir("go/")
        .file("go/VERSION", b"go1.21.4", 0o644)
        .dir("go/bin/")
        .file("go/bin/go", b"#!/bin/true\n", 0o755)
        .symlink("go/bin/gofmt-link", "gofmt")
}

/// Records every entry it sees along with the bytes it read.
#[derive(Default)]
struct Recorder {
    seen: Vec<(EntryKind, String, Vec<u8>)>,
}

impl EntryHandler for Recorder {
    fn handle(&mut self, entry: &ArchiveEntry, contents: &mut dyn Read) -> Result<(), EntryError> {
        let mut body = Vec::new();
        contents.read_to_end(&mut body)?;
        self.seen
            .push((entry.kind(), entry.path().display().to_string(), body));
        Ok(())
    }
}

#[rstest]
#[case::plain(sample().to_tar())]
#[case::gzip(sample().to_tar_gz().expect("gzip fixture"))]
fn visits_entries_in_order(#[case] bytes: Vec<u8>) {
    let mut recorder = Recorder::default();
    let report = walk(bytes.as_slice(), &mut recorder, ErrorPolicy::StopOnError).expect("walk");

    assert_eq!(report.entries(), 5);
    assert!(report.is_clean());
    let names: Vec<&str> = recorder.seen.iter().map(|(_, name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        ["go/", "go/VERSION", "go/bin/", "go/bin/go", "go/bin/gofmt-link"]
    );
    let kinds: Vec<EntryKind> = recorder.seen.iter().map(|(kind, _, _)| *kind).collect();
    assert_eq!(
        kinds,
        [
            EntryKind::Directory,
            EntryKind::RegularFile,
            EntryKind::Directory,
            EntryKind::RegularFile,
            EntryKind::Other,
        ]
    );
    assert_eq!(
        recorder.seen.get(1).map(|(_, _, body)| body.as_slice()),
        Some(&b"go1.21.4"[..])
    );
}

#[test]
fn entry_metadata_comes_from_the_header() {
    let bytes = TarFixture::new()
        .file("tool", b"0123456789", 0o751)
        .to_tar();
    let mut seen = Vec::new();
    let mut handler = |entry: &ArchiveEntry, _contents: &mut dyn Read| -> Result<(), EntryError> {
        seen.push(entry.clone());
        Ok(())
    };
    walk(bytes.as_slice(), &mut handler, ErrorPolicy::StopOnError).expect("walk");
    assert_eq!(
        seen,
        vec![ArchiveEntry::new(EntryKind::RegularFile, "tool", 10, 0o751)]
    );
}

#[test]
fn unread_contents_are_skipped() {
    let bytes = sample().to_tar_gz().expect("gzip fixture");
    let mut handler =
        |_entry: &ArchiveEntry, _contents: &mut dyn Read| -> Result<(), EntryError> { Ok(()) };
    let report = walk(bytes.as_slice(), &mut handler, ErrorPolicy::StopOnError).expect("walk");
    assert_eq!(report.entries(), 5);
}

#[test]
fn empty_stream_is_an_empty_archive() {
    let mut recorder = Recorder::default();
    let report = walk(&[][..], &mut recorder, ErrorPolicy::StopOnError).expect("walk");
    assert_eq!(report.entries(), 0);
}

fn failing_on(
    target: &'static str,
) -> impl FnMut(&ArchiveEntry, &mut dyn Read) -> Result<(), EntryError> {
    move |entry, _contents| {
        if entry.path() == Path::new(target) {
            Err(EntryError::Io(io::Error::other("boom")))
        } else {
            Ok(())
        }
    }
}

#[test]
fn stop_on_error_returns_the_first_failure() {
    let bytes = sample().to_tar();
    let mut visited = 0usize;
    let mut inner = failing_on("go/VERSION");
    let mut handler = |entry: &ArchiveEntry, contents: &mut dyn Read| -> Result<(), EntryError> {
        visited += 1;
        inner(entry, contents)
    };

    let err = walk(bytes.as_slice(), &mut handler, ErrorPolicy::StopOnError)
        .expect_err("handler failure");
    assert!(matches!(
        err,
        WalkError::Handler { ref path, .. } if path == Path::new("go/VERSION")
    ));
    assert_eq!(visited, 2);
}

#[test]
fn continue_on_error_processes_remaining_entries() {
    let bytes = sample().to_tar();
    let mut visited = Vec::new();
    let mut inner = failing_on("go/VERSION");
    let mut handler = |entry: &ArchiveEntry, contents: &mut dyn Read| -> Result<(), EntryError> {
        visited.push(entry.path().display().to_string());
        inner(entry, contents)
    };

    let report = walk(bytes.as_slice(), &mut handler, ErrorPolicy::ContinueOnError)
        .expect("walk completes");
    assert_eq!(visited.len(), 5);
    assert_eq!(report.entries(), 5);
    let [failure] = report.failures() else {
        panic!("expected one failure, got {:?}", report.failures());
    };
    assert_eq!(failure.path, Path::new("go/VERSION"));
}

#[test]
fn continue_on_error_collects_every_failure() {
    let bytes = sample().to_tar();
    let mut handler = |entry: &ArchiveEntry, _contents: &mut dyn Read| -> Result<(), EntryError> {
        if entry.kind() == EntryKind::RegularFile {
            return Err(EntryError::PathTraversal {
                path: entry.path().display().to_string(),
            });
        }
        Ok(())
    };
    let report = walk(bytes.as_slice(), &mut handler, ErrorPolicy::ContinueOnError)
        .expect("walk completes");
    let failed: Vec<&Path> = report.failures().iter().map(|f| f.path.as_path()).collect();
    assert_eq!(failed, [Path::new("go/VERSION"), Path::new("go/bin/go")]);
}

#[rstest]
#[case::stop(ErrorPolicy::StopOnError)]
#[case::continue_on(ErrorPolicy::ContinueOnError)]
fn truncated_stream_is_structural_under_any_policy(#[case] policy: ErrorPolicy) {
    let bytes = TarFixture::new()
        .file("big", &[9u8; 2048], 0o644)
        .to_tar();
    let truncated = bytes.get(..1024).expect("prefix");
    let mut recorder = Recorder::default();
    let err = walk(truncated, &mut recorder, policy).expect_err("corrupt stream");
    assert!(matches!(err, WalkError::Structural(_)), "got {err}");
}

#[rstest]
#[case::stop(ErrorPolicy::StopOnError)]
#[case::continue_on(ErrorPolicy::ContinueOnError)]
fn corrupt_gzip_is_structural_under_any_policy(#[case] policy: ErrorPolicy) {
    let mut bytes = sample().to_tar_gz().expect("gzip fixture");
    bytes.truncate(bytes.len() / 2);
    let mut recorder = Recorder::default();
    let err = walk(bytes.as_slice(), &mut recorder, policy).expect_err("corrupt stream");
    assert!(matches!(err, WalkError::Structural(_)), "got {err}");
}

#[rstest]
#[case::stop(ErrorPolicy::StopOnError)]
#[case::continue_on(ErrorPolicy::ContinueOnError)]
fn corruption_inside_a_payload_is_structural(#[case] policy: ErrorPolicy) {
    let mut bytes = TarFixture::new()
        .file("big", &noise_bytes(200 * 1024), 0o644)
        .file("after", b"tail", 0o644)
        .to_tar_gz()
        .expect("gzip fixture");
    bytes.truncate(bytes.len() / 2);
    let mut recorder = Recorder::default();
    let err = walk(bytes.as_slice(), &mut recorder, policy).expect_err("corrupt stream");
    assert!(matches!(err, WalkError::Structural(_)), "got {err}");
    assert!(recorder.seen.is_empty());
}

#[test]
fn handler_sees_the_stream_error_it_hit() {
    let mut bytes = TarFixture::new()
        .file("big", &noise_bytes(200 * 1024), 0o644)
        .to_tar_gz()
        .expect("gzip fixture");
    bytes.truncate(bytes.len() / 2);
    let mut handler_error = None;
    let mut handler = |_entry: &ArchiveEntry, contents: &mut dyn Read| -> Result<(), EntryError> {
        let mut sink = Vec::new();
        if let Err(err) = contents.read_to_end(&mut sink) {
            handler_error = Some(err.kind());
            return Err(err.into());
        }
        Ok(())
    };
    let err = walk(bytes.as_slice(), &mut handler, ErrorPolicy::ContinueOnError)
        .expect_err("corrupt stream");
    assert!(matches!(err, WalkError::Structural(_)), "got {err}");
    assert!(handler_error.is_some());
}

#[test]
fn handler_errors_after_a_clean_read_stay_per_entry() {
    let bytes = TarFixture::new()
        .file("big", &noise_bytes(4096), 0o644)
        .to_tar_gz()
        .expect("gzip fixture");
    let mut handler = |_entry: &ArchiveEntry, contents: &mut dyn Read| -> Result<(), EntryError> {
        io::copy(contents, &mut io::sink())?;
        Err(EntryError::Io(io::Error::other("disk full")))
    };
    let err = walk(bytes.as_slice(), &mut handler, ErrorPolicy::StopOnError)
        .expect_err("handler failure");
    assert!(matches!(err, WalkError::Handler { .. }), "got {err}");
}

#[test]
fn bad_header_checksum_is_structural() {
    let mut bytes = sample().to_tar();
    if let Some(byte) = bytes.get_mut(148) {
        *byte ^= 0x01;
    }
    let mut recorder = Recorder::default();
    let err = walk(bytes.as_slice(), &mut recorder, ErrorPolicy::ContinueOnError)
        .expect_err("corrupt header");
    assert!(matches!(err, WalkError::Structural(_)));
}

#[test]
fn walk_file_reports_missing_archive() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let mut recorder = Recorder::default();
    let err = walk_file(
        &temp_dir.path().join("missing.tar.gz"),
        &mut recorder,
        ErrorPolicy::StopOnError,
    )
    .expect_err("missing file");
    assert!(matches!(err, WalkError::Open { .. }));
}
