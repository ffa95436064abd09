use std::path::PathBuf;

use mdpad::config::{ConfigFlags, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".mdpadrc");
    let content = r#"
# comment
--download

--download-dir /tmp/out

--log-file=mdpad.log
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.download);
    assert!(!flags.static_commands);
    assert_eq!(flags.download_dir, Some(PathBuf::from("/tmp/out")));
    assert_eq!(flags.log_file, Some(PathBuf::from("mdpad.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".mdpadrc");
    let content = "--download\n--download-dir file-dir\n--log-file file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "mdpad".to_string(),
        "--download-dir".to_string(),
        "cli-dir".to_string(),
        "--static-commands".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.download, "file flags should remain enabled");
    assert!(effective.static_commands, "cli flags should be applied");
    assert_eq!(
        effective.download_dir,
        Some(PathBuf::from("cli-dir")),
        "cli should override the download dir"
    );
    assert_eq!(
        effective.log_file,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "mdpad".to_string(),
        "--settings=custom.json".to_string(),
        "--download-dir=out".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.settings, Some(PathBuf::from("custom.json")));
    assert_eq!(flags.download_dir, Some(PathBuf::from("out")));
}

#[test]
fn test_config_union_merges_booleans() {
    let file = ConfigFlags {
        download: true,
        ..ConfigFlags::default()
    };
    let cli = ConfigFlags {
        static_commands: true,
        ..ConfigFlags::default()
    };
    let merged = file.union(&cli);
    assert!(merged.download);
    assert!(merged.static_commands);
}
