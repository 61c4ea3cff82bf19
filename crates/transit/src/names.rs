//! Deterministic street name generation from a street index.

const STREET_NAMES: &[&str] = &[
    "Oak", "Maple", "Cedar", "Elm", "Pine", "Birch", "Willow", "Ash", "Chestnut", "Walnut",
    "Linden", "Poplar", "Sycamore", "Hawthorn", "Juniper", "Magnolia", "Spruce", "Alder", "Beech",
    "Hazel", "Laurel", "Rowan", "Aspen", "Cypress",
];

const STREET_SUFFIXES: &[&str] = &["Street", "Avenue", "Boulevard", "Lane", "Road", "Way"];

pub fn street_name(index: usize) -> String {
    let name = STREET_NAMES[index % STREET_NAMES.len()];
    let suffix = STREET_SUFFIXES[(index / STREET_NAMES.len()) % STREET_SUFFIXES.len()];
    format!("{} {}", name, suffix)
}
