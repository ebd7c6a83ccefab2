use thiserror::Error;

use crate::db_types::ModifierKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("A product can have at most 3 variant groups, but {0} were supplied")]
    TooManyGroups(usize),
    #[error("Only one variant group can be sold by weight, but {0} were supplied")]
    MultipleWeightGroups(usize),
    #[error("The weight group must be the first group, but it is in position {0}")]
    WeightGroupNotFirst(usize),
    #[error("Variant group names cannot be empty")]
    EmptyGroupName,
    #[error("Variant group '{group}' must have between 1 and {max} options, but has {count}")]
    InvalidOptionCount { group: String, count: usize, max: usize },
    #[error("Option labels in variant group '{0}' cannot be empty")]
    EmptyOptionLabel(String),
    #[error("Option '{option}' in variant group '{group}' needs a value")]
    OptionValueRequired { group: String, option: String },
    #[error("A {0} option needs a modifier value")]
    MissingModifierValue(ModifierKind),
    #[error("{value} is not a valid {kind} modifier value")]
    InvalidModifierValue { kind: ModifierKind, value: f64 },
    #[error("'{0}' is not a supported weight unit")]
    InvalidWeightUnit(String),
    #[error("Variants can only be added to a product with a single variant, but it has {0}")]
    RootHasMultipleVariants(usize),
}
