use puli::{CommandRegistry, RegistryError};

#[test]
fn keeps_registration_order() {
    let mut registry = CommandRegistry::new();
    assert!(registry.is_empty());
    registry.command("pack").expect("registered");
    registry.command("package").expect("registered");
    registry.command("package add").expect("registered");
    registry.alias("package-alias", "package").expect("aliased");

    assert_eq!(registry.len(), 4);
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["pack", "package", "package add", "package-alias"]
    );
}

#[test]
fn classifies_entries() {
    let mut registry = CommandRegistry::new();
    registry.command("package").expect("registered");
    registry.command("package add").expect("registered");
    registry.alias("package a", "package add").expect("aliased");

    let simple = registry.get("package").expect("simple");
    assert!(!simple.is_composite());
    assert!(!simple.is_alias());
    assert_eq!(simple.word_count(), 1);

    let alias = registry.get("package a").expect("alias");
    assert!(alias.is_composite());
    assert!(alias.is_alias());
    assert_eq!(alias.canonical_name, "package add");
    assert_eq!(alias.word_count(), 2);
}

#[test]
fn rejects_duplicate_names() {
    let mut registry = CommandRegistry::new();
    registry.command("pack").expect("registered");
    assert_eq!(
        registry.command("pack").unwrap_err(),
        RegistryError::Duplicate("pack".to_string())
    );
    assert_eq!(
        registry.alias("pack", "pack").unwrap_err(),
        RegistryError::Duplicate("pack".to_string())
    );
    assert_eq!(registry.len(), 1);
}

#[test]
fn rejects_aliases_of_unknown_commands() {
    let mut registry = CommandRegistry::new();
    assert_eq!(
        registry.alias("p", "package").unwrap_err(),
        RegistryError::UnknownCanonical {
            alias: "p".to_string(),
            canonical: "package".to_string(),
        }
    );
    assert!(registry.is_empty());
}

#[test]
fn rejects_aliases_of_aliases() {
    let mut registry = CommandRegistry::new();
    registry.command("package").expect("registered");
    registry.alias("pk", "package").expect("aliased");
    assert_eq!(
        registry.alias("pkk", "pk").unwrap_err(),
        RegistryError::UnknownCanonical {
            alias: "pkk".to_string(),
            canonical: "pk".to_string(),
        }
    );
    assert!(!registry.contains("pkk"));
}

#[test]
fn rejects_invalid_names() {
    let mut registry = CommandRegistry::new();
    for name in ["", "a b c", "a  b", " a", "a\tb"] {
        assert_eq!(
            registry.command(name).unwrap_err(),
            RegistryError::InvalidName(name.to_string()),
            "{name:?}"
        );
    }
    assert!(registry.is_empty());
}
