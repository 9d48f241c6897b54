//! The four base elements.
//!
//! Base elements need no recipe and terminate every search branch.

/// Base element names in lexicographic order.
pub const BASE_ELEMENTS: [&str; 4] = ["Air", "Earth", "Fire", "Water"];

/// Whether `name` is one of the base elements.
#[must_use]
pub fn is_base_element(name: &str) -> bool {
    BASE_ELEMENTS.contains(&name)
}
