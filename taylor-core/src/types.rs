//! Core data type definitions

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Authorization tier of a platform user
///
/// Ordered by privilege: `Member < Mentor < Admin`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Member,
    Mentor,
    Admin,
}

impl Role {
    /// Parse a stored role string; unknown values yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "MENTOR" => Some(Role::Mentor),
            "MEMBER" => Some(Role::Member),
            _ => None,
        }
    }

    /// Whether this role grants at least the capabilities of `required`
    pub fn satisfies(self, required: Role) -> bool {
        self >= required
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Mentor => "MENTOR",
            Role::Member => "MEMBER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| format!("Unknown role: {}", s))
    }
}

/// Identity resolved from a session token, rebuilt on every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
}

/// A product entry synced from a retailer feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[schema(example = "silvercross-wave-pushchair")]
    pub id: String,
    pub name: String,
    pub brand: String,
    /// Normalized, non-negative amount
    #[schema(example = 129.99)]
    pub price: f64,
    pub category: String,
    pub image_url: String,
    #[schema(example = "SilverCross")]
    pub retailer: String,
    pub url: String,
    #[serde(default)]
    pub notes: String,
}

/// Price as it appears in third-party feeds: either a formatted string or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Amount(f64),
    Text(String),
}

impl RawPrice {
    pub fn normalize(&self) -> f64 {
        match self {
            RawPrice::Amount(amount) if amount.is_finite() && *amount > 0.0 => *amount,
            RawPrice::Amount(_) => 0.0,
            RawPrice::Text(text) => normalize_price(text),
        }
    }
}

impl Default for RawPrice {
    fn default() -> Self {
        RawPrice::Amount(0.0)
    }
}

/// Normalize a currency-formatted string into a numeric amount.
///
/// Everything except ASCII digits and `.` is stripped before parsing, so the
/// result is never negative. Unparseable input yields `0`.
///
/// ```
/// use taylor_core::normalize_price;
///
/// assert_eq!(normalize_price("$129.99"), 129.99);
/// assert_eq!(normalize_price("1,299"), 1299.0);
/// assert_eq!(normalize_price("N/A"), 0.0);
/// ```
pub fn normalize_price(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Build a stable catalog id from a retailer name and the retailer's own product key
pub fn catalog_item_id(retailer: &str, product_key: &str) -> String {
    let slug: String = product_key
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    format!("{}-{}", retailer.to_ascii_lowercase(), slug)
}
