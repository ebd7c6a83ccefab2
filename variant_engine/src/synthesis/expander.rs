use log::*;

use super::{modifier_rule::apply, ValidationError, WEIGHT_UNIT};
use crate::{
    db_types::{ModifierKind, SynthesizedVariant, VariantGroup, VariantOption, INVENTORY_POLICY_CONTINUE},
    traits::OptionDescriptor,
};

/// Storefronts support at most three option slots per product.
pub const MAX_VARIANT_GROUPS: usize = 3;

/// Iterates over every combination of options, taking one option from each slot.
///
/// The first slot varies fastest, so for slots `[a, b] x [x, y]` the combinations are `ax, bx, ay, by`.
pub struct OptionCombinations<'a> {
    slots: Vec<&'a [VariantOption]>,
    cursor: Option<Vec<usize>>,
}

impl<'a> OptionCombinations<'a> {
    pub fn new(slots: Vec<&'a [VariantOption]>) -> Self {
        let cursor = if slots.is_empty() || slots.iter().any(|s| s.is_empty()) { None } else { Some(vec![0; slots.len()]) };
        Self { slots, cursor }
    }

    /// The total number of combinations.
    pub fn count_combinations(&self) -> usize {
        if self.slots.is_empty() {
            0
        } else {
            self.slots.iter().map(|s| s.len()).product()
        }
    }
}

impl<'a> Iterator for OptionCombinations<'a> {
    type Item = Vec<&'a VariantOption>;

    fn next(&mut self) -> Option<Self::Item> {
        let Self { slots, cursor } = self;
        let indices = cursor.as_mut()?;
        let combination = slots.iter().zip(indices.iter()).map(|(&slot, &i)| &slot[i]).collect();
        let mut exhausted = true;
        for (slot, index) in slots.iter().zip(indices.iter_mut()) {
            *index += 1;
            if *index < slot.len() {
                exhausted = false;
                break;
            }
            *index = 0;
        }
        if exhausted {
            *cursor = None;
        }
        Some(combination)
    }
}

/// The groups that take part in synthesis: those with at least one option, in the given order.
fn populated_slots(groups: &[VariantGroup]) -> Vec<&VariantGroup> {
    groups.iter().filter(|g| !g.options.is_empty()).collect()
}

/// Expands the (already ordered) variant groups into the full list of synthesized variants for a product.
///
/// Groups without options are skipped. If no group has options, the result is a single "Default Variant" at the
/// base price. The returned variants carry no remote ids or positions yet.
pub fn expand(
    groups: &[VariantGroup],
    base_price: f64,
    taxable: bool,
    product_id: i64,
) -> Result<Vec<SynthesizedVariant>, ValidationError> {
    if groups.len() > MAX_VARIANT_GROUPS {
        return Err(ValidationError::TooManyGroups(groups.len()));
    }
    let slots = populated_slots(groups);
    if let Some(index) = slots.iter().skip(1).position(|g| g.modifier_kind == ModifierKind::Weight) {
        return Err(ValidationError::WeightGroupNotFirst(index + 2));
    }
    if slots.is_empty() {
        debug!("🧮️ Product {product_id} has no populated variant groups. Using a default variant");
        return Ok(vec![SynthesizedVariant::default_variant(product_id, base_price, taxable)]);
    }
    let combinations = OptionCombinations::new(slots.iter().map(|g| g.options.as_slice()).collect());
    trace!("🧮️ Expanding {} combinations for product {product_id}", combinations.count_combinations());
    combinations.map(|combination| build_variant(&slots, &combination, base_price, taxable, product_id)).collect()
}

fn build_variant(
    slots: &[&VariantGroup],
    combination: &[&VariantOption],
    base_price: f64,
    taxable: bool,
    product_id: i64,
) -> Result<SynthesizedVariant, ValidationError> {
    let effects = slots
        .iter()
        .zip(combination)
        .map(|(group, option)| apply(group.modifier_kind, base_price, option.modifier_value).map(|e| (group, e)))
        .collect::<Result<Vec<_>, _>>()?;
    let to_multiply = effects.iter().find_map(|(_, e)| e.multiplier);
    let weight = effects.iter().find_map(|(_, e)| e.weight);
    let fees = effects.iter().filter(|(g, _)| g.modifier_kind == ModifierKind::Fee).map(|(_, e)| e.price_delta);
    let to_add = slots.iter().any(|g| g.modifier_kind == ModifierKind::Fee).then(|| fees.sum::<f64>());
    let price = base_price * to_multiply.unwrap_or(1.0) + to_add.unwrap_or(0.0);
    let title = combination.iter().map(|o| o.label.as_str()).collect::<Vec<_>>().join(" / ");
    let label = |i: usize| combination.get(i).map(|o| o.label.clone());
    let option_id = |i: usize| combination.get(i).map(|o| o.id);
    Ok(SynthesizedVariant {
        shopify_product_id: product_id,
        title,
        option1: label(0),
        option2: label(1),
        option3: label(2),
        option1_variant: option_id(0),
        option2_variant: option_id(1),
        option3_variant: option_id(2),
        price,
        weight,
        weight_unit: weight.map(|_| WEIGHT_UNIT.to_string()),
        to_multiply,
        to_add,
        taxable,
        inventory_policy: INVENTORY_POLICY_CONTINUE.to_string(),
        shopify_variant_id: None,
        position: None,
    })
}

/// Builds the product option definitions (`option1..3`) that accompany the synthesized variants.
pub fn build_option_descriptors(groups: &[VariantGroup]) -> Vec<OptionDescriptor> {
    populated_slots(groups)
        .into_iter()
        .take(MAX_VARIANT_GROUPS)
        .enumerate()
        .map(|(i, g)| OptionDescriptor {
            name: g.name.clone(),
            position: i as i64 + 1,
            values: g.options.iter().map(|o| o.label.clone()).collect(),
        })
        .collect()
}
