use std::path::PathBuf;

use tabpress::config::{ConfigFlags, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".tabpressrc");
    let content = r#"
# comment
--plain

--width 64

--storage-dir=site-storage
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.plain);
    assert_eq!(flags.width, Some(64));
    assert_eq!(flags.storage_dir, Some(PathBuf::from("site-storage")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".tabpressrc");
    let content = "--plain\n--width 64\n--defaults site/tab-content.js\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "tabpress".to_string(),
        "--width".to_string(),
        "100".to_string(),
        "--storage-dir".to_string(),
        "elsewhere".to_string(),
        "show".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.plain, "file flags should remain enabled");
    assert_eq!(effective.width, Some(100), "cli should override width");
    assert_eq!(effective.storage_dir, Some(PathBuf::from("elsewhere")));
    assert_eq!(
        effective.defaults,
        Some(PathBuf::from("site/tab-content.js")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "tabpress".to_string(),
        "--width=40".to_string(),
        "--defaults=content.json".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.width, Some(40));
    assert_eq!(flags.defaults, Some(PathBuf::from("content.json")));
}

#[test]
fn test_config_union_merges_booleans() {
    let file = ConfigFlags {
        plain: true,
        ..ConfigFlags::default()
    };
    let cli = ConfigFlags::default();
    assert!(file.union(&cli).plain);
    assert!(cli.union(&file).plain);
}
