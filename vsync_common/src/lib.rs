pub mod helpers;
pub mod money;
mod secret;

pub use money::{format_price, parse_price, round_to_cents, MoneyParseError};
pub use secret::Secret;
