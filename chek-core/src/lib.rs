//! chek-core: canonical receipt types. Integer-cent money, line items,
//! and the keyword category classifier.

pub mod categories;
pub mod item;
pub mod money;

pub use categories::{CategoryRule, CategoryRules, FALLBACK_CATEGORY};
pub use item::LineItem;
pub use money::{InvalidAmount, Money};
