//! Deterministic keyword categorization.
//!
//! An ordered list of keyword→category rules, matched case-insensitively on
//! substrings so "bread" also catches "breadcrumbs". First match wins;
//! anything unmatched lands in [`FALLBACK_CATEGORY`]. The rule set is loaded
//! once at startup and never changes at run time.

use serde::Deserialize;

/// Category assigned when no rule matches.
pub const FALLBACK_CATEGORY: &str = "Other";

/// One keyword→category rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryRule {
    pub keyword: String,
    pub category: String,
}

/// Ordered rule set. Construction lowercases keywords so `classify` only
/// lowercases the probe.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl CategoryRules {
    pub fn new(mut rules: Vec<CategoryRule>) -> Self {
        for rule in &mut rules {
            rule.keyword = rule.keyword.to_lowercase();
        }
        Self { rules }
    }

    /// Map a product name to its category. Total: every input gets exactly
    /// one answer.
    pub fn classify(&self, name: &str) -> &str {
        let name = name.to_lowercase();
        self.rules
            .iter()
            .find(|rule| name.contains(&rule.keyword))
            .map(|rule| rule.category.as_str())
            .unwrap_or(FALLBACK_CATEGORY)
    }

    /// Parse a rules override file:
    ///
    /// ```toml
    /// [[rule]]
    /// keyword = "bread"
    /// category = "Bakery"
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        #[derive(Deserialize)]
        struct RuleFile {
            #[serde(rename = "rule", default)]
            rules: Vec<CategoryRule>,
        }
        let file: RuleFile = toml::from_str(s)?;
        Ok(Self::new(file.rules))
    }
}

impl Default for CategoryRules {
    /// Built-in rules, modeled on the grocery-receipt keyword families the
    /// bot shipped with.
    fn default() -> Self {
        let rules = [
            ("bread", "Bakery"),
            ("bun", "Bakery"),
            ("water", "Drinks"),
            ("juice", "Drinks"),
            ("drink", "Drinks"),
            ("beer", "Alcohol"),
            ("wine", "Alcohol"),
            ("cigarette", "Tobacco"),
            ("tomato", "Vegetables"),
            ("cucumber", "Vegetables"),
            ("potato", "Vegetables"),
            ("onion", "Vegetables"),
            ("apple", "Fruit"),
            ("banana", "Fruit"),
            ("milk", "Dairy"),
            ("cheese", "Dairy"),
            ("butter", "Dairy"),
            ("chicken", "Meat"),
            ("sausage", "Meat"),
        ]
        .into_iter()
        .map(|(keyword, category)| CategoryRule {
            keyword: keyword.to_string(),
            category: category.to_string(),
        })
        .collect();
        Self::new(rules)
    }
}
