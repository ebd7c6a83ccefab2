//! Pure variant synthesis.
//!
//! Nothing in this module touches the database or the storefront. Given a set of option groups and a base price, it
//! produces the full list of concrete variants, each carrying the factors needed to reprice it later.
mod errors;
mod expander;
mod group_ordering;
mod modifier_rule;

pub use errors::ValidationError;
pub use expander::{build_option_descriptors, expand, OptionCombinations, MAX_VARIANT_GROUPS};
pub use group_ordering::sort_variant_groups;
pub use modifier_rule::{apply, preview_option_price, ModifierEffect, OUNCES_PER_POUND, WEIGHT_UNIT};
