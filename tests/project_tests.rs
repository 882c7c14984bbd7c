use puli::config::{Origin, check_key, effective};
use puli::project::{PROJECT_FILE, Project};
use std::collections::BTreeMap;

#[test]
fn missing_project_file_is_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let project = Project::open(dir.path()).expect("open");
    assert!(project.file.packages.is_empty());
    assert!(project.file.bindings.is_empty());
}

#[test]
fn installs_and_persists_packages() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("vendor/acme-blog")).expect("mkdir");

    let mut project = Project::open(dir.path()).expect("open");
    let name = project
        .install_package(&dir.path().join("vendor/acme-blog"), None)
        .expect("installed");
    assert_eq!(name, "acme-blog");
    project.save().expect("saved");
    assert!(dir.path().join(PROJECT_FILE).exists());

    let reopened = Project::open(dir.path()).expect("reopen");
    let package = &reopened.file.packages["acme-blog"];
    assert_eq!(package.install_path, "vendor/acme-blog");
    assert_eq!(package.installer, "user");
}

#[test]
fn rejects_duplicate_and_missing_packages() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("blog")).expect("mkdir");

    let mut project = Project::open(dir.path()).expect("open");
    project
        .install_package(std::path::Path::new("blog"), Some("acme/blog"))
        .expect("installed");
    assert!(
        project
            .install_package(std::path::Path::new("blog"), Some("acme/blog"))
            .is_err()
    );
    assert!(
        project
            .install_package(std::path::Path::new("nowhere"), None)
            .is_err()
    );
    assert!(project.remove_package("acme/other").is_err());
}

#[test]
fn renames_and_cleans_packages() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("blog")).expect("mkdir");
    std::fs::create_dir_all(dir.path().join("shop")).expect("mkdir");

    let mut project = Project::open(dir.path()).expect("open");
    project
        .install_package(std::path::Path::new("blog"), None)
        .expect("installed");
    project
        .install_package(std::path::Path::new("shop"), None)
        .expect("installed");
    project.rename_package("blog", "acme/blog").expect("renamed");
    assert!(project.file.packages.contains_key("acme/blog"));
    assert!(project.rename_package("shop", "acme/blog").is_err());

    std::fs::remove_dir_all(dir.path().join("shop")).expect("rm");
    assert_eq!(project.clean_packages(), vec!["shop".to_string()]);
    assert_eq!(project.file.packages.len(), 1);
}

#[test]
fn finds_bindings_by_uuid_prefix() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut project = Project::open(dir.path()).expect("open");
    let uuid = project
        .add_binding("/app/trans/*.yml", "acme/translations")
        .expect("bound");

    let prefix = &uuid.to_string()[..8];
    assert_eq!(project.find_binding(prefix).expect("found"), 0);
    assert!(project.find_binding("zzzz").is_err());
    assert!(project.find_binding("").is_err());
    assert!(project.remove_binding("").is_err());
    assert_eq!(project.file.bindings.len(), 1);

    project.set_binding_enabled(prefix, false).expect("disabled");
    assert!(!project.file.bindings[0].enabled);

    let removed = project.remove_binding(prefix).expect("removed");
    assert_eq!(removed.uuid, uuid);
    assert!(project.file.bindings.is_empty());
}

#[test]
fn rejects_relative_binding_queries() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut project = Project::open(dir.path()).expect("open");
    assert!(project.add_binding("app/*.yml", "acme/type").is_err());
}

#[test]
fn build_report_groups_bindings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut project = Project::open(dir.path()).expect("open");
    project
        .define_type("acme/messages", Some("Message catalogs".to_string()))
        .expect("defined");
    assert!(project.define_type("acme/messages", None).is_err());

    project.add_binding("/app/a", "acme/messages").expect("bound");
    let disabled = project.add_binding("/app/b", "acme/messages").expect("bound");
    project.add_binding("/app/c", "acme/unknown").expect("bound");
    project
        .set_binding_enabled(&disabled.to_string(), false)
        .expect("disabled");
    project.save().expect("saved");

    let reopened = Project::open(dir.path()).expect("reopen");
    let report = reopened.build_report();
    assert_eq!(report.enabled.len(), 1);
    assert_eq!(report.disabled.len(), 1);
    assert_eq!(report.type_missing.len(), 1);
    assert_eq!(report.type_missing[0].query, "/app/c");
}

#[test]
fn config_layers_override_defaults() {
    let mut global = BTreeMap::new();
    global.insert("puli-dir".to_string(), "build/puli".to_string());
    global.insert("repository.type".to_string(), "filesystem".to_string());
    let mut project = BTreeMap::new();
    project.insert("puli-dir".to_string(), "var/puli".to_string());

    let values = effective(&global, &project);
    assert_eq!(values["puli-dir"].value, "var/puli");
    assert_eq!(values["puli-dir"].origin, Origin::Project);
    assert_eq!(values["repository.type"].origin, Origin::Global);
    assert_eq!(values["discovery.type"].origin, Origin::Default);
}

#[test]
fn unknown_config_keys_suggest_known_ones() {
    assert!(check_key("puli-dir").is_ok());
    let err = check_key("puli-dr").unwrap_err().to_string();
    assert!(err.contains("\"puli-dir\""), "{err}");
}
