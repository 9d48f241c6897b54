//! Dataset loading lock tests: the finalized JSON array format, exact
//! duplicate collapse, and a digest that ignores input order.

use std::io::Write;
use std::sync::Arc;

use alembic_kernel::{Recipe, RecipeStore, StoreError};
use alembic_search::Searcher;

const DATASET: &str = r#"[
    {"ingredient1": "Air", "ingredient2": "Earth", "result": "Mud"},
    {"ingredient1": "Mud", "ingredient2": "Fire", "result": "Brick"},
    {"ingredient1": "Earth", "ingredient2": "Air", "result": "Mud"},
    {"ingredient1": "Air", "ingredient2": "Water", "result": "Steam"}
]"#;

#[test]
fn dataset_file_loads_and_searches() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DATASET.as_bytes()).unwrap();

    let store = RecipeStore::from_json_file(file.path()).unwrap();
    // `Earth + Air => Mud` is the same recipe as `Air + Earth => Mud`.
    assert_eq!(store.recipes().unwrap().len(), 3);
    assert_eq!(
        store.known_elements().unwrap(),
        ["Air", "Brick", "Earth", "Fire", "Mud", "Steam", "Water"]
    );

    let searcher = Searcher::new(Arc::new(store));
    let found = searcher.find_path_bfs("Brick").unwrap();
    assert_eq!(
        found.path.as_slice(),
        [
            Recipe::new("Air", "Earth", "Mud"),
            Recipe::new("Mud", "Fire", "Brick"),
        ]
    );
}

#[test]
fn malformed_dataset_is_a_parse_error() {
    let err = RecipeStore::from_json_slice(br#"[{"ingredient1": "Air"}]"#).unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }));
}

#[test]
fn missing_dataset_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RecipeStore::from_json_file(dir.path().join("recipes.json")).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}

#[test]
fn dataset_digest_ignores_order_and_ingredient_swaps() {
    let a = RecipeStore::from_json_slice(DATASET.as_bytes()).unwrap();
    let b = RecipeStore::from_recipes(vec![
        Recipe::new("Water", "Air", "Steam"),
        Recipe::new("Fire", "Mud", "Brick"),
        Recipe::new("Earth", "Air", "Mud"),
    ]);
    assert_eq!(a.digest().unwrap(), b.digest().unwrap());
    assert!(a.digest().unwrap().as_str().starts_with("sha256:"));
}

#[test]
fn store_loads_exactly_once() {
    let store = RecipeStore::new();
    assert!(matches!(store.recipes(), Err(StoreError::Uninitialized)));
    assert!(store.load(vec![Recipe::new("Air", "Water", "Steam")]));
    assert!(!store.load(vec![Recipe::new("Air", "Earth", "Mud")]));
    assert!(store.is_known_element("Steam").unwrap());
    assert!(!store.is_known_element("Mud").unwrap());
}
