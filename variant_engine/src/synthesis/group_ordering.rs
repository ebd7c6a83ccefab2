use super::ValidationError;
use crate::db_types::{ModifierKind, VariantGroup};

fn rank(kind: ModifierKind) -> u8 {
    match kind {
        ModifierKind::Weight => 0,
        ModifierKind::Fee => 1,
        ModifierKind::None => 2,
    }
}

/// Orders variant groups so that the weight group (if any) comes first, followed by fee groups and then label-only
/// groups. Groups of the same kind keep their relative order.
///
/// Fails if more than one group is sold by weight.
pub fn sort_variant_groups(groups: Vec<VariantGroup>) -> Result<Vec<VariantGroup>, ValidationError> {
    let weight_groups = groups.iter().filter(|g| g.modifier_kind == ModifierKind::Weight).count();
    if weight_groups > 1 {
        return Err(ValidationError::MultipleWeightGroups(weight_groups));
    }
    let mut groups = groups;
    groups.sort_by_key(|g| rank(g.modifier_kind));
    Ok(groups)
}
