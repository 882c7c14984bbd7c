use puli::suggest::{find_alternatives, levenshtein};

#[test]
fn computes_edit_distance() {
    assert_eq!(levenshtein("", ""), 0);
    assert_eq!(levenshtein("pack", ""), 4);
    assert_eq!(levenshtein("", "pack"), 4);
    assert_eq!(levenshtein("pack", "pack"), 0);
    assert_eq!(levenshtein("packy", "pack"), 1);
    assert_eq!(levenshtein("kitten", "sitting"), 3);
}

#[test]
fn ranks_closest_candidates_first() {
    let pool = ["build", "binding", "bind"];
    let alternatives = find_alternatives("bindng", pool);
    assert_eq!(alternatives.first().map(String::as_str), Some("binding"));
    assert!(!alternatives.contains(&"build".to_string()));
}

#[test]
fn substring_candidates_qualify() {
    let alternatives = find_alternatives("conf", ["config", "build"]);
    assert_eq!(alternatives, vec!["config"]);
}

#[test]
fn compares_composite_names_word_by_word() {
    let pool = ["package", "package install", "package remove", "type define"];
    let alternatives = find_alternatives("package instal", pool);
    assert_eq!(alternatives.first().map(String::as_str), Some("package install"));
    assert!(!alternatives.contains(&"type define".to_string()));
}

#[test]
fn unrelated_names_are_dropped() {
    assert!(find_alternatives("foo", ["package", "binding", "config"]).is_empty());
}
