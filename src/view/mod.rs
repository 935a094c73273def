//! Derived, per-category presentation state

pub mod disclosure;
pub mod grouping;

pub use disclosure::{Disclosure, LayoutOracle, RowLayout};
pub use grouping::{categories, group_by_category, CategoryGroup};
