use super::*;

fn temp_root(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "unused-analyzer-cache-test-{tag}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock drift")
            .as_nanos()
    ))
}

#[test]
fn disk_cache_roundtrip_and_invalidation() {
    let root = temp_root("roundtrip");
    let records = vec![
        (true, "src/a.cpp:3:5".to_owned()),
        (false, "src/a.cpp:9:1".to_owned()),
    ];

    save(&root, "/proj/src/a.cpp", "source-hash-1", "cmd-hash-1", &records);

    let loaded = load(&root, "/proj/src/a.cpp", "source-hash-1", "cmd-hash-1");
    assert_eq!(loaded, Some(records));

    let stale_source = load(&root, "/proj/src/a.cpp", "source-hash-2", "cmd-hash-1");
    assert!(stale_source.is_none(), "cache must invalidate by source hash");

    let stale_command = load(&root, "/proj/src/a.cpp", "source-hash-1", "cmd-hash-2");
    assert!(stale_command.is_none(), "cache must invalidate by command fingerprint");

    let other_file = load(&root, "/proj/src/b.cpp", "source-hash-1", "cmd-hash-1");
    assert!(other_file.is_none(), "cache entries are per source file");

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn missing_cache_is_a_clean_miss() {
    let root = temp_root("missing");
    assert!(load(&root, "/proj/x.cpp", "h", "c").is_none());
}

#[test]
fn fingerprints_are_stable_and_content_sensitive() {
    assert_eq!(
        args_fingerprint(&["clang++".to_owned(), "-c".to_owned()]),
        args_fingerprint(&["clang++".to_owned(), "-c".to_owned()])
    );
    assert_ne!(
        args_fingerprint(&["clang++".to_owned(), "-c".to_owned()]),
        args_fingerprint(&["clang++".to_owned(), "-O2".to_owned()])
    );
}

#[test]
fn source_fingerprint_tracks_file_content() {
    let root = temp_root("fingerprint");
    std::fs::create_dir_all(&root).expect("create temp dir");
    let file = root.join("x.cpp");
    let path = file.display().to_string();

    std::fs::write(&file, "int main() {}\n").expect("write");
    let first = source_fingerprint(&path).expect("fingerprint");
    std::fs::write(&file, "int main() { return 1; }\n").expect("write");
    let second = source_fingerprint(&path).expect("fingerprint");
    assert_ne!(first, second);

    assert!(source_fingerprint("/does/not/exist.cpp").is_none());

    let _ = std::fs::remove_dir_all(root);
}
