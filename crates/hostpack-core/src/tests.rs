use super::*;

#[test]
fn parse_manifest() {
    let content = r#"{
  "name": "foo",
  "dependencies": ["bar", "baz"],
  "install_script": "install.sh",
  "installed_path": "/opt/foo/bin",
  "version": "1.2.0"
}"#;

    let parsed = PackageDescriptor::from_json_str(content).expect("manifest should parse");
    assert_eq!(parsed.name, "foo");
    assert_eq!(parsed.dependencies, vec!["bar", "baz"]);
    assert_eq!(parsed.install_script(), Some("install.sh"));
    assert_eq!(parsed.installed_path(), Some("/opt/foo/bin"));
    assert_eq!(parsed.version, "1.2.0");
    assert!(parsed.owner().is_none());
}

#[test]
fn parse_minimal_manifest_defaults_optional_fields() {
    let parsed =
        PackageDescriptor::from_json_str(r#"{"name": "meta"}"#).expect("manifest should parse");
    assert!(parsed.dependencies.is_empty());
    assert!(parsed.install_script().is_none());
    assert!(parsed.installed_path().is_none());
    assert_eq!(parsed.version, "");
}

#[test]
fn empty_strings_read_as_unset() {
    let parsed = PackageDescriptor::from_json_str(
        r#"{"name": "meta", "install_script": "", "installed_path": "", "owner": ""}"#,
    )
    .expect("manifest should parse");
    assert!(parsed.install_script().is_none());
    assert!(parsed.installed_path().is_none());
    assert!(parsed.owner().is_none());
}

#[test]
fn reject_malformed_json() {
    let err = PackageDescriptor::from_json_str(r#"{"name": "foo", "dependencies": "bar"}"#)
        .expect_err("dependencies must be a list");
    assert!(matches!(err, ManifestError::Parse(_)));
}

#[test]
fn reject_missing_name() {
    let err = PackageDescriptor::from_json_str(r#"{"version": "1"}"#)
        .expect_err("name is required");
    assert!(matches!(err, ManifestError::Parse(_)));
}

#[test]
fn reject_relative_installed_path() {
    let err = PackageDescriptor::from_json_str(r#"{"name": "foo", "installed_path": "opt/foo"}"#)
        .expect_err("installed path must be absolute");
    assert!(matches!(err, ManifestError::RelativeInstalledPath(path) if path == "opt/foo"));
}

#[test]
fn reject_install_script_outside_package() {
    for script in ["../evil.sh", "/usr/bin/evil.sh", "scripts/../../evil.sh"] {
        let content = format!(r#"{{"name": "foo", "install_script": "{script}"}}"#);
        let err = PackageDescriptor::from_json_str(&content)
            .expect_err("script must stay inside the package");
        assert!(
            matches!(err, ManifestError::UnsafeInstallScript(_)),
            "unexpected error for {script}: {err}"
        );
    }
}

#[test]
fn reject_dependency_with_path_separator() {
    let err = PackageDescriptor::from_json_str(r#"{"name": "foo", "dependencies": ["a/b"]}"#)
        .expect_err("dependency names are path segments");
    assert!(matches!(
        err,
        ManifestError::Name(NameError::InvalidCharacter { ch: '/', .. })
    ));
}

#[test]
fn set_owner_preserves_unknown_fields() {
    let content = r#"{"name": "foo", "version": "1", "homepage": "https://example.test"}"#;
    let mut parsed = PackageDescriptor::from_json_str(content).expect("manifest should parse");
    parsed.set_owner(&Scope::SystemWide);

    let rendered = parsed.to_json_string().expect("must render");
    let reparsed = PackageDescriptor::from_json_str(&rendered).expect("must reparse");
    assert_eq!(reparsed.owner(), Some(SYSTEM_WIDE_OWNER));
    assert_eq!(
        reparsed.extra.get("homepage").and_then(|value| value.as_str()),
        Some("https://example.test")
    );
    assert_eq!(reparsed.owner_scope(), Some(Scope::SystemWide));
}

#[test]
fn user_scope_owner_tag_is_user_name() {
    let scope = Scope::user("alice").expect("valid user");
    assert_eq!(scope.owner_tag(), "alice");
    assert!(scope.requires_deescalation());
    assert!(!Scope::SystemWide.requires_deescalation());
    assert_eq!(Scope::from_owner_tag("alice"), scope);
    assert_eq!(Scope::from_owner_tag("system-wide"), Scope::SystemWide);
}

#[test]
fn user_scope_rejects_path_like_names() {
    for name in ["", "..", "../root", "al ice"] {
        assert!(Scope::user(name).is_err(), "{name:?} should be rejected");
    }
}

#[test]
fn package_name_validation() {
    assert!(validate_package_name("ripgrep").is_ok());
    assert!(validate_package_name("lib-foo_2.0").is_ok());
    assert!(matches!(
        validate_package_name(""),
        Err(NameError::Empty { kind: "package" })
    ));
    assert!(matches!(
        validate_package_name("."),
        Err(NameError::Reserved { .. })
    ));
    assert!(matches!(
        validate_package_name(&"x".repeat(200)),
        Err(NameError::TooLong { .. })
    ));
}

#[test]
fn parse_repositories_json() {
    let content = r#"[
  {"remoteURL": "https://example.test/foo.git", "localPath": "/packages/repos/foo"}
]"#;
    let repositories = Repository::list_from_json_str(content).expect("must parse");
    assert_eq!(repositories.len(), 1);
    assert_eq!(repositories[0].remote_url, "https://example.test/foo.git");
    assert_eq!(
        repositories[0].local_path,
        std::path::PathBuf::from("/packages/repos/foo")
    );
}
