// Transcript sink behavior: created empty, append-only, committed-only.

use dialbridge::transcription::TranscriptSink;
use std::fs;

#[test]
fn test_sink_created_empty() {
    let dir = tempfile::tempdir().unwrap();
    let sink = TranscriptSink::create(dir.path(), "CA123").unwrap();

    let content = fs::read_to_string(sink.path()).unwrap();
    assert_eq!(content, "");
    assert!(sink.path().ends_with("CA123.txt"));
}

#[test]
fn test_sink_truncates_previous_call_file() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut sink = TranscriptSink::create(dir.path(), "CA123").unwrap();
        sink.append("stale text").unwrap();
    }

    let sink = TranscriptSink::create(dir.path(), "CA123").unwrap();
    let content = fs::read_to_string(sink.path()).unwrap();
    assert_eq!(content, "");
}

#[test]
fn test_commits_append_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = TranscriptSink::create(dir.path(), "CA123").unwrap();

    sink.append("hello").unwrap();
    sink.append("world").unwrap();
    sink.append("again").unwrap();

    let content = fs::read_to_string(sink.path()).unwrap();
    assert_eq!(content, "hello world again ");
}

#[test]
fn test_sink_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("transcriptions");

    let sink = TranscriptSink::create(&nested, "CA999").unwrap();
    assert!(sink.path().exists());
}

#[test]
fn test_sinks_are_scoped_per_call() {
    let dir = tempfile::tempdir().unwrap();
    let mut a = TranscriptSink::create(dir.path(), "CA1").unwrap();
    let mut b = TranscriptSink::create(dir.path(), "CA2").unwrap();

    a.append("first call").unwrap();
    b.append("second call").unwrap();

    assert_eq!(fs::read_to_string(a.path()).unwrap(), "first call ");
    assert_eq!(fs::read_to_string(b.path()).unwrap(), "second call ");
}
