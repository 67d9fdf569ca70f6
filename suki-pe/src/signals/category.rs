//! Category group mapping
//!
//! Maps raw category/brand strings to a canonical group name via an ordered
//! list of contains-style patterns; first match wins. The raw category is
//! checked before the brand. Unmapped input yields the "Unknown" sentinel.

/// Sentinel group for unmapped input
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Ordered pattern table. Earlier entries win, so the more specific groups
/// (energy drinks before generic beverages, telecom load before anything a
/// brand name could shadow) come first.
const GROUP_PATTERNS: &[(&str, &[&str])] = &[
    ("Energy Drinks", &["energy", "cobra", "sting", "extra joss", "red bull"]),
    ("Telecom Load", &["load", "e-load", "eload", "globe", "smart", "tnt", "dito"]),
    ("Instant Noodles", &["noodle", "pancit canton", "lucky me", "mi goreng"]),
    ("Canned Goods", &["canned", "sardinas", "sardine", "tuna", "corned", "555", "argentina"]),
    ("School Supplies", &["school", "notebook", "ballpen", "pencil", "paper", "crayon"]),
    ("Tobacco", &["cigarette", "tobacco", "yosi", "marlboro", "fortune", "winston", "mighty"]),
    ("Alcohol", &["beer", "gin", "rum", "brandy", "liquor", "alak", "red horse", "emperador"]),
    ("Dairy", &["milk", "gatas", "bear brand", "alaska", "condensada", "yogurt"]),
    ("Beverages", &["beverage", "soft drink", "softdrink", "soda", "cola", "coke", "pepsi", "sprite", "royal", "juice", "coffee", "kape", "milo", "tea", "water"]),
    ("Snacks", &["snack", "chips", "biscuit", "candy", "chocolate", "piattos", "nova", "skyflakes", "bread", "pandesal"]),
    ("Staples", &["rice", "bigas", "cooking oil", "mantika", "sugar", "asukal", "salt", "asin", "flour", "egg", "itlog"]),
    ("Personal Care", &["shampoo", "soap", "sabon", "toothpaste", "lotion", "deodorant", "diaper", "napkin", "safeguard", "colgate"]),
    ("Household", &["detergent", "bleach", "zonrox", "fabric", "downy", "tide", "surf", "dishwashing", "candle", "match"]),
];

/// Category/brand → canonical group mapper
#[derive(Debug, Clone, Default)]
pub struct CategoryMapper;

impl CategoryMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map raw category and brand strings to a canonical group name.
    ///
    /// Category is consulted first; the brand only decides when the category
    /// is missing or unmapped.
    pub fn map(&self, category: Option<&str>, brand: Option<&str>) -> String {
        if let Some(group) = category.and_then(Self::lookup) {
            return group.to_string();
        }
        if let Some(group) = brand.and_then(Self::lookup) {
            return group.to_string();
        }
        UNKNOWN_GROUP.to_string()
    }

    fn lookup(raw: &str) -> Option<&'static str> {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        for (group, patterns) in GROUP_PATTERNS {
            if patterns.iter().any(|p| needle.contains(p)) {
                return Some(group);
            }
        }
        None
    }
}
