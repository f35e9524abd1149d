use super::names::{NameTable, hash_name};

#[test]
fn lookup_by_name() {
    let mut names = NameTable::new();
    names.insert("year", 1);
    names.insert("month", 2);

    assert_eq!(names.lookup("year"), &[1]);
    assert_eq!(names.lookup("month"), &[2]);
    assert!(names.lookup("day").is_empty());
    assert_eq!(names.len(), 2);
}

#[test]
fn duplicate_names_keep_declaration_order() {
    let mut names = NameTable::new();
    names.insert("x", 1);
    names.insert("y", 2);
    names.insert("x", 3);

    assert_eq!(names.lookup("x"), &[1, 3]);
    assert_eq!(names.equal_range(hash_name("x")).collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(names.name_of(3), Some("x"));
    assert_eq!(names.name_of(2), Some("y"));
    assert_eq!(names.name_of(4), None);
}

#[test]
fn equal_range_misses_unknown_hash() {
    let mut names = NameTable::new();
    names.insert("a", 1);
    assert!(names.contains_hash(hash_name("a")));
    assert!(!names.contains_hash(hash_name("b")));
}

#[test]
fn iteration_order() {
    let mut names = NameTable::new();
    names.insert("b", 1);
    names.insert("a", 2);
    let order: Vec<_> = names.iter().map(|(name, _)| name).collect();
    assert_eq!(order, vec!["b", "a"]);
}
