//! Library crate attribute lock tests.
//!
//! Proves every library crate root forbids unsafe code and carries the same
//! clippy levels, so no crate quietly opts out of the workspace lint posture.

use std::path::Path;

const LIBRARY_ROOTS: [&str; 3] = ["kernel/src/lib.rs", "search/src/lib.rs", "harness/src/lib.rs"];

const REQUIRED: [&str; 3] = [
    "#![forbid(unsafe_code)]",
    "#![deny(clippy::all)]",
    "#![warn(clippy::pedantic)]",
];

#[test]
fn library_roots_carry_lint_attributes() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let mut missing = Vec::new();
    for lib in LIBRARY_ROOTS {
        let source = std::fs::read_to_string(root.join(lib))
            .unwrap_or_else(|e| panic!("cannot read {lib}: {e}"));
        for attribute in REQUIRED {
            if !source.lines().any(|line| line.trim() == attribute) {
                missing.push(format!("{lib}: {attribute}"));
            }
        }
    }
    assert!(missing.is_empty(), "missing crate attributes:\n{}", missing.join("\n"));
}
