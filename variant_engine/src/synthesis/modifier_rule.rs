//! Price effects of option modifiers.
//!
//! Base prices for sell-by-weight products are quoted per pound, while weight options are entered in ounces.
use vsync_common::format_price;

use super::ValidationError;
use crate::db_types::ModifierKind;

pub const OUNCES_PER_POUND: f64 = 16.0;
/// Weight unit recorded on variants produced by a weight option.
pub const WEIGHT_UNIT: &str = "oz";

/// The effect that a single option has on a variant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModifierEffect {
    /// The amount this option adds to the base price. For weight options it is the difference between the weighed
    /// price and the base price.
    pub price_delta: f64,
    /// The factor applied to the base price. Only weight options set this.
    pub multiplier: Option<f64>,
    /// The weight of the variant in ounces. Only weight options set this.
    pub weight: Option<f64>,
}

/// Computes the effect of an option with the given kind and modifier value on `base_unit_price`.
///
/// * `WEIGHT`: the value is a weight in ounces and the multiplier is `value / 16`.
/// * `FEE`: the value is added to the price.
/// * `NONE`: the option has no effect. Any value is ignored.
pub fn apply(
    kind: ModifierKind,
    base_unit_price: f64,
    modifier_value: Option<f64>,
) -> Result<ModifierEffect, ValidationError> {
    match kind {
        ModifierKind::None => Ok(ModifierEffect::default()),
        ModifierKind::Weight => {
            let ounces = checked_value(kind, modifier_value)?;
            if ounces <= 0.0 {
                return Err(ValidationError::InvalidModifierValue { kind, value: ounces });
            }
            let multiplier = ounces / OUNCES_PER_POUND;
            let price_delta = base_unit_price * multiplier - base_unit_price;
            Ok(ModifierEffect { price_delta, multiplier: Some(multiplier), weight: Some(ounces) })
        },
        ModifierKind::Fee => {
            let fee = checked_value(kind, modifier_value)?;
            if fee < 0.0 {
                return Err(ValidationError::InvalidModifierValue { kind, value: fee });
            }
            Ok(ModifierEffect { price_delta: fee, multiplier: None, weight: None })
        },
    }
}

fn checked_value(kind: ModifierKind, value: Option<f64>) -> Result<f64, ValidationError> {
    let value = value.ok_or(ValidationError::MissingModifierValue(kind))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::InvalidModifierValue { kind, value })
    }
}

/// The price text shown next to an option in the configuration preview.
///
/// Weight options show the weighed price and fee options show the fee itself. Options without an effect, or with an
/// unusable value, have no preview.
pub fn preview_option_price(kind: ModifierKind, base_unit_price: f64, modifier_value: Option<f64>) -> Option<String> {
    let effect = apply(kind, base_unit_price, modifier_value).ok()?;
    match kind {
        ModifierKind::Weight => effect.multiplier.map(|m| format_price(base_unit_price * m)),
        ModifierKind::Fee => Some(format_price(effect.price_delta)),
        ModifierKind::None => None,
    }
}
