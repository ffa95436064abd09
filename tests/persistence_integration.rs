use std::fs;

use mdpad::persistence::{
    Downloads, FileError, FileHandle, FilePersistence, FileState, PersistenceMode, SaveOutcome,
    UnsupportedPlatform,
};

#[test]
fn test_open_edit_save_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.md");
    fs::write(&path, "# Notes\n").unwrap();

    let mut files = FilePersistence::native();
    assert_eq!(files.state(), FileState::EnabledNoFile);

    let text = files.open_file(FileHandle::new(&path)).unwrap();
    assert_eq!(text, "# Notes\n");
    assert_eq!(files.state(), FileState::EnabledWithFile);

    let outcome = files.save_file("# Notes\n\nmore\n").unwrap();
    assert_eq!(outcome, SaveOutcome::Saved(path.clone()));
    assert_eq!(fs::read_to_string(&path).unwrap(), "# Notes\n\nmore\n");

    files.close_file();
    assert_eq!(files.state(), FileState::EnabledNoFile);
    assert_eq!(files.save_file("x").unwrap(), SaveOutcome::NeedsTarget);
}

#[test]
fn test_save_as_switches_current_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("copy.md");

    let mut files = FilePersistence::native();
    let outcome = files.save_as(FileHandle::new(&target), "copy").unwrap();
    assert_eq!(outcome, SaveOutcome::Saved(target.clone()));
    assert_eq!(files.current_file().map(FileHandle::path), Some(target.as_path()));
}

#[test]
fn test_invalid_utf8_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("binary.md");
    fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

    let mut files = FilePersistence::native();
    let err = files.open_file(FileHandle::new(&path)).unwrap_err();
    assert!(matches!(err, FileError::InvalidEncoding(_)));
    assert!(files.current_file().is_none());
}

#[test]
fn test_download_mode_numbers_files_like_a_browser() {
    let dir = tempfile::tempdir().unwrap();
    let mut files = FilePersistence::native()
        .with_mode(PersistenceMode::Download)
        .with_downloads(Downloads::new(dir.path()));
    assert_eq!(files.state(), FileState::Disabled);

    for expected in ["markdownfile.md", "markdownfile (1).md", "markdownfile (2).md"] {
        let outcome = files.save_file("body").unwrap();
        assert_eq!(outcome, SaveOutcome::Downloaded(dir.path().join(expected)));
    }
    assert!(matches!(
        files.open_file(FileHandle::new(dir.path().join("markdownfile.md"))),
        Err(FileError::CapabilityUnavailable)
    ));
}

#[test]
fn test_unsupported_platform_rejects_launch() {
    let mut files = FilePersistence::new(Box::new(UnsupportedPlatform));
    let err = files
        .handle_launch(FileHandle::new("anything.md"))
        .unwrap_err();
    assert_eq!(err.to_string(), "File access is not available here");
}
