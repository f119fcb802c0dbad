use crate::models::{Card, CardFields, CardId, Category, CategoryBonus};

/// Networks offered by the form
pub const NETWORKS: [(&str, &str); 4] = [
    ("visa", "Visa"),
    ("mastercard", "Mastercard"),
    ("amex", "American Express"),
    ("discover", "Discover"),
];

/// Color tags offered by the form; each maps to a card style
pub const COLORS: [(&str, &str); 6] = [
    ("blue", "Blue"),
    ("purple", "Purple"),
    ("green", "Green"),
    ("red", "Red"),
    ("black", "Black"),
    ("gold", "Gold"),
];

/// One editable category-bonus row
///
/// Values are kept as typed so a half-filled row survives re-renders.
#[derive(Debug, Clone, PartialEq)]
pub struct BonusRow {
    pub key: u64,
    pub category: String,
    pub rate: String,
}

/// What a valid form turns into
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(CardFields),
    Update(CardId, CardFields),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormError {
    MissingName,
    InvalidBaseRate,
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FormError::MissingName => write!(f, "Card name is required"),
            FormError::InvalidBaseRate => write!(f, "Base rate must be a number"),
        }
    }
}

impl std::error::Error for FormError {}

/// State of the add/edit card modal
#[derive(Debug, Clone, PartialEq)]
pub struct CardForm {
    /// Card being edited; `None` means the form creates a new card
    pub editing: Option<CardId>,
    pub name: String,
    pub network: String,
    pub color: String,
    pub base_rate: String,
    pub bonuses: Vec<BonusRow>,
    /// Inline validation message
    pub error: Option<String>,
    pub saving: bool,
    next_key: u64,
}

impl CardForm {
    /// Empty form for a new card
    pub fn blank() -> Self {
        Self {
            editing: None,
            name: String::new(),
            network: NETWORKS[0].0.to_string(),
            color: COLORS[0].0.to_string(),
            base_rate: String::new(),
            bonuses: Vec::new(),
            error: None,
            saving: false,
            next_key: 0,
        }
    }

    /// Form pre-populated from a cached card and bound to its id
    pub fn for_card(card: &Card) -> Self {
        let mut form = Self {
            editing: Some(card.id.clone()),
            name: card.name.clone(),
            network: card.network.clone(),
            color: card.color.clone(),
            base_rate: card.base_rate.to_string(),
            ..Self::blank()
        };
        for bonus in &card.category_bonuses {
            form.push_row(bonus.category.as_str().to_string(), bonus.rate.to_string());
        }
        form
    }

    /// Append an empty bonus row, returning its key
    pub fn add_bonus_row(&mut self) -> u64 {
        self.push_row(String::new(), String::new())
    }

    pub fn remove_bonus_row(&mut self, key: u64) {
        self.bonuses.retain(|row| row.key != key);
    }

    pub fn set_bonus_category(&mut self, key: u64, category: String) {
        if let Some(row) = self.row_mut(key) {
            row.category = category;
        }
    }

    pub fn set_bonus_rate(&mut self, key: u64, rate: String) {
        if let Some(row) = self.row_mut(key) {
            row.rate = rate;
        }
    }

    /// Validate and build the request this form stands for
    ///
    /// Bonus rows missing a category or a numeric rate are left out.
    pub fn submission(&self) -> Result<Submission, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }
        let base_rate = parse_rate(&self.base_rate).ok_or(FormError::InvalidBaseRate)?;

        let category_bonuses = self
            .bonuses
            .iter()
            .filter_map(|row| {
                let category = row.category.parse::<Category>().ok()?;
                let rate = parse_rate(&row.rate)?;
                Some(CategoryBonus { category, rate })
            })
            .collect();

        let fields = CardFields {
            name: name.to_string(),
            network: self.network.clone(),
            color: self.color.clone(),
            base_rate,
            category_bonuses,
        };

        Ok(match &self.editing {
            Some(id) => Submission::Update(id.clone(), fields),
            None => Submission::Create(fields),
        })
    }

    fn push_row(&mut self, category: String, rate: String) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        self.bonuses.push(BonusRow { key, category, rate });
        key
    }

    fn row_mut(&mut self, key: u64) -> Option<&mut BonusRow> {
        self.bonuses.iter_mut().find(|row| row.key == key)
    }
}

impl Default for CardForm {
    fn default() -> Self {
        Self::blank()
    }
}

fn parse_rate(input: &str) -> Option<f64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    input.parse::<f64>().ok().filter(|rate| rate.is_finite())
}
