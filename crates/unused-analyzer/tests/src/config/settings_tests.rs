use super::*;

fn parse(settings_toml: &str) -> Settings {
    let patch: SettingsPatch = toml::from_str(settings_toml).expect("parse");
    let mut settings = Settings::default();
    settings.apply_patch(patch);
    settings
}

#[test]
fn toml_patch_fills_every_category() {
    let settings = parse(
        r#"
        [scope]
        projectRoot = "/proj"
        buildDir = "/proj/build"
        exclude = ["third_party", "vendor/"]

        [driver]
        jobs = 4
        cache = false
        cacheDir = "/tmp/tu-cache"
        compilers = ["armclang"]
        extraFlags = ["-Wno-everything"]

        [logging]
        level = "debug"
        file = "/tmp/ua.log"
        "#,
    );
    assert_eq!(settings.scope.project_root, "/proj");
    assert_eq!(settings.scope.build_dir, "/proj/build");
    assert_eq!(settings.scope.exclude, vec!["third_party", "vendor/"]);
    assert_eq!(settings.driver.jobs, 4);
    assert!(!settings.driver.cache);
    assert_eq!(settings.driver.cache_dir, "/tmp/tu-cache");
    assert_eq!(settings.driver.compilers, vec!["armclang"]);
    assert_eq!(settings.driver.extra_flags, vec!["-Wno-everything"]);
    assert_eq!(settings.logging.level, LogLevel::Debug);
    assert_eq!(settings.logging.file, "/tmp/ua.log");
}

#[test]
fn unknown_keys_are_tolerated() {
    let settings = parse(
        r#"
        [scope]
        projectRoot = "/proj"
        futureKnob = true
        "#,
    );
    assert_eq!(settings.scope.project_root, "/proj");
}

#[test]
fn missing_categories_keep_defaults() {
    let settings = parse("[logging]\nlevel = \"warn\"\n");
    assert_eq!(settings.logging.level, LogLevel::Warn);
    assert!(settings.driver.cache);
    assert!(settings.scope.exclude.is_empty());
}

#[test]
fn normalize_cleans_exclusions_and_defaults_build_dir() {
    let mut settings = parse(
        r#"
        [scope]
        projectRoot = "/proj/"
        exclude = [" third_party/ ", "", "./vendor"]
        "#,
    );
    settings.normalize();
    assert_eq!(settings.scope.project_root, "/proj");
    assert_eq!(settings.scope.build_dir, "/proj");
    assert_eq!(settings.scope.exclude, vec!["third_party", "vendor"]);
}

#[test]
fn normalize_clamps_jobs() {
    let mut settings = parse("[scope]\nprojectRoot = \"/proj\"\n[driver]\njobs = 100000\n");
    settings.normalize();
    assert_eq!(settings.driver.jobs, MAX_JOBS);

    let mut settings = parse("[scope]\nprojectRoot = \"/proj\"\n");
    settings.normalize();
    assert!(settings.driver.jobs >= MIN_JOBS);
    assert!(settings.driver.jobs <= MAX_JOBS);
}

#[test]
fn level_directive_targets_this_crate() {
    let settings = parse("[logging]\nlevel = \"trace\"\n");
    assert_eq!(settings.logging.directive(), "unused_analyzer=trace");
}
