use chrono::{Local, TimeZone};
use mediaferry::config::Config;
use mediaferry::filetypes::FileTypeRegistry;
use mediaferry::meta::parse_filename_pattern;
use mediaferry::target::{has_unresolved_tokens, normalize_target_path, resolve_target_path};
use mediaferry::{FerryError, FileMetadata};
use std::path::Path;

fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

// --- filename pattern compiler ---

#[test]
fn test_pattern_date_and_time_defaults() {
    let meta = parse_filename_pattern(
        "2023-05-15 10-30-45.jpg",
        "{meta.taken.date} {meta.taken.time}.jpg",
    )
    .unwrap();
    assert_eq!(meta.taken_time, Some(local(2023, 5, 15, 10, 30, 45)));
    assert_eq!(meta.extension, "jpg");
}

#[test]
fn test_pattern_date_only_is_local_midnight() {
    let meta = parse_filename_pattern("2023-05-15.jpg", "{meta.taken.date}.jpg").unwrap();
    assert_eq!(meta.taken_time, Some(local(2023, 5, 15, 0, 0, 0)));
}

#[test]
fn test_pattern_time_format_hhmmss() {
    let meta = parse_filename_pattern(
        "Still 2026-01-23 222212_1.1.1.jpg",
        "Still {meta.taken.date} {meta.taken.time:hhmmss}_1.1.1.jpg",
    )
    .unwrap();
    assert_eq!(meta.taken_time, Some(local(2026, 1, 23, 22, 22, 12)));
    assert_eq!(meta.extension, "jpg");
}

#[test]
fn test_pattern_time_format_hhmm() {
    let meta = parse_filename_pattern(
        "2023-05-15 1030.mp4",
        "{meta.taken.date} {meta.taken.time:hhmm}.mp4",
    )
    .unwrap();
    assert_eq!(meta.taken_time, Some(local(2023, 5, 15, 10, 30, 0)));
    assert_eq!(meta.extension, "mp4");
}

#[test]
fn test_pattern_bare_time_token_rejects_compact_time() {
    // Default time rule wants dashes; a 6-digit blob needs the hhmmss specifier.
    assert!(
        parse_filename_pattern("2023-05-15 103045.jpg", "{meta.taken.date} {meta.taken.time}.jpg")
            .is_none()
    );
}

#[test]
fn test_pattern_hhmmss_specifier_rejects_dashed_time() {
    // The specifier and the default rule are mutually exclusive shapes.
    assert!(
        parse_filename_pattern(
            "2023-05-15 10-30-45.jpg",
            "{meta.taken.date} {meta.taken.time:hhmmss}.jpg"
        )
        .is_none()
    );
}

#[test]
fn test_pattern_structural_match_with_invalid_time() {
    // The regex matches but 25-99-99 is not a valid wall-clock time.
    assert!(
        parse_filename_pattern("2023-05-15 25-99-99.jpg", "{meta.taken.date} {meta.taken.time}.jpg")
            .is_none()
    );
}

#[test]
fn test_pattern_non_matching_filename() {
    assert!(parse_filename_pattern("IMG_1234.jpg", "{meta.taken.date}.jpg").is_none());
}

#[test]
fn test_pattern_is_anchored() {
    assert!(
        parse_filename_pattern("prefix 2023-05-15.jpg", "{meta.taken.date}.jpg").is_none()
    );
    assert!(
        parse_filename_pattern("2023-05-15.jpg.bak", "{meta.taken.date}.jpg").is_none()
    );
}

#[test]
fn test_pattern_unknown_token_never_matches() {
    assert!(parse_filename_pattern("whatever.jpg", "{no.such.token}.jpg").is_none());
}

#[test]
fn test_pattern_without_date_never_yields_metadata() {
    // A time-only pattern matches structurally but produces no taken_time.
    assert!(
        parse_filename_pattern("10-30-45.jpg", "{meta.taken.time}.jpg").is_none()
    );
}

// --- target path resolution ---

fn sample_meta() -> FileMetadata {
    FileMetadata {
        taken_time: Some(local(2023, 5, 15, 10, 30, 45)),
        extension: "jpg".to_string(),
        camera_maker: "Canon".to_string(),
        camera_model: "EOS R5".to_string(),
    }
}

#[test]
fn test_resolve_all_tokens() {
    let resolved = resolve_target_path(
        "/media/{meta.taken.year}/{meta.taken.datetime}-{meta.camera.model}.{file.extension}",
        Some(&sample_meta()),
    )
    .unwrap();
    assert_eq!(
        resolved,
        Path::new("/media/2023/2023-05-15-10-30-45-EOS R5.jpg")
    );
}

#[test]
fn test_resolve_empty_camera_fields_collapse() {
    let meta = FileMetadata {
        camera_maker: String::new(),
        camera_model: String::new(),
        ..sample_meta()
    };
    let resolved = resolve_target_path(
        "photos/{meta.taken.date}-{meta.camera.maker}-{meta.camera.model}.{file.extension}",
        Some(&meta),
    )
    .unwrap();
    assert_eq!(resolved, Path::new("photos/2023-05-15.jpg"));
}

#[test]
fn test_resolve_without_metadata_fails() {
    let err = resolve_target_path("/media/{file.extension}", None).unwrap_err();
    assert!(matches!(err, FerryError::NoMetadata));
    assert_eq!(err.to_string(), "no metadata");
}

#[test]
fn test_resolve_without_taken_time_leaves_time_tokens() {
    let meta = FileMetadata {
        taken_time: None,
        ..sample_meta()
    };
    let resolved = resolve_target_path("/media/{meta.taken.year}/x.{file.extension}", Some(&meta))
        .unwrap();
    assert!(has_unresolved_tokens(&resolved.to_string_lossy()));
}

#[test]
fn test_normalize_is_idempotent() {
    let once = normalize_target_path("photos/2023-05-15---x__.jpg");
    assert_eq!(once, "photos/2023-05-15-x.jpg");
    assert_eq!(normalize_target_path(&once), once);
}

#[test]
fn test_normalize_only_touches_filename() {
    assert_eq!(
        normalize_target_path("a--b/c__d/e--f.jpg"),
        "a--b/c__d/e-f.jpg"
    );
}

#[test]
fn test_normalize_empty_stem_keeps_extension() {
    assert_eq!(normalize_target_path("out/--.jpg"), "out/.jpg");
}

// --- unresolved token predicate ---

#[test]
fn test_has_unresolved_tokens() {
    assert!(has_unresolved_tokens("/media/{meta.taken.year}/x.jpg"));
    assert!(has_unresolved_tokens("a{b}c"));
    // a stray second opener must not hide the token run
    assert!(has_unresolved_tokens("x{{}y"));
    assert!(has_unresolved_tokens("{}{a}"));
    assert!(!has_unresolved_tokens("/media/2023/x.jpg"));
    assert!(!has_unresolved_tokens("{}"));
    assert!(!has_unresolved_tokens("{unclosed"));
    assert!(!has_unresolved_tokens("unopened}"));
}

// --- metadata merge ---

#[test]
fn test_merge_extracted_fields_win_when_present() {
    let mut meta = FileMetadata {
        taken_time: Some(local(2023, 5, 15, 10, 30, 45)),
        extension: "JPG".to_string(),
        camera_maker: String::new(),
        camera_model: String::new(),
    };
    let extracted = FileMetadata {
        taken_time: Some(local(2024, 1, 1, 0, 0, 0)),
        extension: "jpg".to_string(),
        camera_maker: "Canon".to_string(),
        camera_model: String::new(),
    };
    meta.merge_extracted(&extracted);
    assert_eq!(meta.taken_time, Some(local(2024, 1, 1, 0, 0, 0)));
    assert_eq!(meta.extension, "jpg");
    assert_eq!(meta.camera_maker, "Canon");
    assert_eq!(meta.camera_model, "");
}

#[test]
fn test_merge_keeps_pattern_fields_when_extracted_empty() {
    let mut meta = FileMetadata {
        taken_time: Some(local(2023, 5, 15, 10, 30, 45)),
        extension: "jpg".to_string(),
        camera_maker: "Sony".to_string(),
        camera_model: "A7".to_string(),
    };
    meta.merge_extracted(&FileMetadata {
        extension: "jpg".to_string(),
        ..Default::default()
    });
    assert_eq!(meta.taken_time, Some(local(2023, 5, 15, 10, 30, 45)));
    assert_eq!(meta.camera_maker, "Sony");
    assert_eq!(meta.camera_model, "A7");
}

// --- file type registry ---

#[test]
fn test_registry_categories() {
    let reg = FileTypeRegistry::default();
    let image = ["image".to_string()];
    let raw = ["image.raw".to_string()];
    let video = ["video".to_string()];

    assert!(reg.matches(Path::new("a/b.JPG"), &image));
    assert!(reg.matches(Path::new("a/b.dng"), &raw));
    assert!(!reg.matches(Path::new("a/b.dng"), &image));
    assert!(reg.matches(Path::new("a/b.mkv"), &video));
    assert!(!reg.matches(Path::new("a/b.txt"), &image));
    assert!(!reg.matches(Path::new("noext"), &image));
}

#[test]
fn test_registry_multiple_and_unknown_types() {
    let reg = FileTypeRegistry::default();
    let both = ["image".to_string(), "video".to_string()];
    assert!(reg.matches(Path::new("x.png"), &both));
    assert!(reg.matches(Path::new("x.mp4"), &both));
    assert!(!reg.matches(Path::new("x.mp4"), &["audio".to_string()]));
}

// --- config parsing and validation ---

#[test]
fn test_config_parse_full() {
    let cfg = Config::parse(
        r#"
[profiles.camera]
patterns = ["{meta.taken.date} {meta.taken.time}.jpg"]

[[profiles.camera.sources]]
path = "/in/camera"
recurse = true
types = ["image", "video"]
filenames = ["{meta.taken.date}.jpg"]

[profiles.camera.target]
path = "/out/{meta.taken.year}/{meta.taken.date}.{file.extension}"
"#,
    )
    .unwrap();
    let prof = &cfg.profiles["camera"];
    assert_eq!(prof.sources.len(), 1);
    assert!(prof.sources[0].recurse);
    assert_eq!(prof.sources[0].types, ["image", "video"]);
    assert_eq!(prof.patterns.len(), 1);
    assert!(prof.target.path.starts_with("/out/"));
}

#[test]
fn test_config_missing_target_rejected() {
    let err = Config::parse(
        r#"
[[profiles.p.sources]]
path = "/in"
types = ["image"]
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("missing target.path"));
}

#[test]
fn test_config_empty_source_path_rejected() {
    let err = Config::parse(
        r#"
[[profiles.p.sources]]
path = ""
types = ["image"]

[profiles.p.target]
path = "/out/{file.extension}"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("source path is empty"));
}

#[test]
fn test_config_duplicate_source_across_profiles_rejected() {
    let err = Config::parse(
        r#"
[[profiles.a.sources]]
path = "/in/shared"
types = ["image"]

[profiles.a.target]
path = "/out/a/{file.extension}"

[[profiles.b.sources]]
path = "/in/shared"
types = ["video"]

[profiles.b.target]
path = "/out/b/{file.extension}"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("defined in profile"));
}
