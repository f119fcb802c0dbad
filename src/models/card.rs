use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend-assigned card identifier
///
/// The backend hands out either UUID strings or integer keys depending on
/// the table setup, so both are accepted and kept as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => CardId(s),
            RawId::Number(n) => CardId(n.to_string()),
        })
    }
}

/// Merchant category a bonus rate applies to
///
/// The backend compares categories case-insensitively and stores whatever it
/// was sent, so decoding never fails: known names match in any case and
/// anything else is kept verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Grocery,
    Gas,
    Dining,
    Travel,
    Pharmacy,
    Department,
    Home,
    Entertainment,
    Other(String),
}

impl Category {
    /// All categories in the order the form offers them
    pub const ALL: [Category; 8] = [
        Category::Grocery,
        Category::Gas,
        Category::Dining,
        Category::Travel,
        Category::Pharmacy,
        Category::Department,
        Category::Home,
        Category::Entertainment,
    ];

    /// Decode a category as stored by the backend
    pub fn from_wire(raw: &str) -> Self {
        let raw = raw.trim();
        Category::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(raw))
            .cloned()
            .unwrap_or_else(|| Category::Other(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Grocery => "grocery",
            Category::Gas => "gas",
            Category::Dining => "dining",
            Category::Travel => "travel",
            Category::Pharmacy => "pharmacy",
            Category::Department => "department",
            Category::Home => "home",
            Category::Entertainment => "entertainment",
            Category::Other(raw) => raw,
        }
    }

    /// Label shown in the category select
    pub fn label(&self) -> &str {
        match self {
            Category::Grocery => "Grocery",
            Category::Gas => "Gas",
            Category::Dining => "Dining",
            Category::Travel => "Travel",
            Category::Pharmacy => "Pharmacy",
            Category::Department => "Department Store",
            Category::Home => "Home Improvement",
            Category::Entertainment => "Entertainment",
            Category::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        Category::from_wire(&raw)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    /// Parse a form selection; an empty selection is an error
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(());
        }
        Ok(Category::from_wire(s))
    }
}

/// Elevated cashback rate for one merchant category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBonus {
    pub category: Category,
    pub rate: f64,
}

/// A card as the backend stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub network: String,
    pub color: String,
    pub base_rate: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category_bonuses: Vec<CategoryBonus>,
}

/// Card body sent on create and update (no id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardFields {
    pub name: String,
    pub network: String,
    pub color: String,
    pub base_rate: f64,
    pub category_bonuses: Vec<CategoryBonus>,
}

/// Body of `GET /api/cards`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub location_enabled: bool,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
