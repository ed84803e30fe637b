use super::*;

fn scope(project_root: &str, build_dir: &str, excluded: &[&str]) -> PathScope {
    PathScope::new(ScopeConfig {
        project_root: project_root.to_owned(),
        build_dir: build_dir.to_owned(),
        excluded: excluded.iter().map(|s| s.to_string()).collect(),
    })
    .expect("valid scope")
}

#[test]
fn absolute_in_scope_path_becomes_project_relative() {
    let scope = scope("/proj", "/proj", &[]);
    assert_eq!(scope.resolve("/proj/src/a.cpp").as_deref(), Some("src/a.cpp"));
}

#[test]
fn relative_path_is_joined_onto_build_dir() {
    let scope = scope("/proj", "/proj/build", &[]);
    assert_eq!(scope.resolve("gen.cpp").as_deref(), Some("build/gen.cpp"));
    assert_eq!(scope.resolve("../src/a.cpp").as_deref(), Some("src/a.cpp"));
}

#[test]
fn paths_outside_the_project_are_rejected() {
    let scope = scope("/proj", "/proj", &[]);
    assert_eq!(scope.resolve("/usr/include/stdio.h"), None);
    assert_eq!(scope.resolve("/proj/../other/x.c"), None);
}

#[test]
fn dot_and_dotdot_segments_resolve_lexically() {
    let scope = scope("/proj", "/proj", &[]);
    assert_eq!(
        scope.resolve("/proj/src/../include/./x.h").as_deref(),
        Some("include/x.h")
    );
}

#[test]
fn excluded_subpath_matches_exactly_and_below() {
    let scope = scope("/proj", "/proj", &["third_party/lib"]);
    assert_eq!(scope.resolve("/proj/third_party/lib"), None);
    assert_eq!(scope.resolve("/proj/third_party/lib/x.cpp"), None);
    assert_eq!(scope.resolve("/proj/third_party/lib/deep/y.cpp"), None);
}

#[test]
fn exclusion_requires_a_component_boundary() {
    let scope = scope("/proj", "/proj", &["third_party"]);
    assert_eq!(
        scope.resolve("/proj/third_party_other/x.cpp").as_deref(),
        Some("third_party_other/x.cpp")
    );
    assert_eq!(scope.resolve("/proj/third_party/x.cpp"), None);
}

#[test]
fn trailing_slash_on_exclusions_is_normalized() {
    let scope = scope("/proj", "/proj", &["vendor/"]);
    assert_eq!(scope.resolve("/proj/vendor/z.c"), None);
    assert_eq!(scope.resolve("/proj/vendored/z.c").as_deref(), Some("vendored/z.c"));
}

#[test]
fn empty_exclusion_is_forbidden() {
    let error = PathScope::new(ScopeConfig {
        project_root: "/proj".to_owned(),
        build_dir: "/proj".to_owned(),
        excluded: vec![String::new()],
    })
    .expect_err("empty exclusion");
    assert!(matches!(error, ScopeError::EmptyExclusion), "got {error:?}");
}

#[test]
fn relative_roots_are_forbidden() {
    let error = PathScope::new(ScopeConfig {
        project_root: "proj".to_owned(),
        build_dir: "/proj".to_owned(),
        excluded: Vec::new(),
    })
    .expect_err("relative root");
    assert!(matches!(error, ScopeError::RelativeRoot { .. }), "got {error:?}");
}

#[test]
fn resolved_paths_never_escape_or_hit_exclusions() {
    // resolve() must only ever return a clean project-relative path.
    let scope = scope("/proj", "/proj/build", &["third_party"]);
    let inputs = [
        "/proj/a.c",
        "a.c",
        "../a.c",
        "../../a.c",
        "/proj/third_party/a.c",
        "/proj/./src//b.c",
        "/etc/passwd",
        "/proj/third_party",
        "sub/../../src/c.c",
    ];
    for input in inputs {
        let Some(resolved) = scope.resolve(input) else {
            continue;
        };
        assert!(!resolved.starts_with("../"), "{input} escaped: {resolved}");
        assert!(!resolved.starts_with('/'), "{input} stayed absolute: {resolved}");
        assert!(
            resolved != "third_party" && !resolved.starts_with("third_party/"),
            "{input} hit an exclusion: {resolved}"
        );
    }
}
