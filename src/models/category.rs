//! Category model
//!
//! Categories are independent of any month; allocations and expenses point
//! at them. Names are unique, ignoring case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// Icon tag shown next to a category or savings goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    ShoppingCart,
    Car,
    Receipt,
    Zap,
    Home,
    Utensils,
    Heart,
    Gift,
    Plane,
    PiggyBank,
    GraduationCap,
    #[default]
    Tag,
}

impl Icon {
    pub fn all() -> &'static [Icon] {
        &[
            Self::ShoppingCart,
            Self::Car,
            Self::Receipt,
            Self::Zap,
            Self::Home,
            Self::Utensils,
            Self::Heart,
            Self::Gift,
            Self::Plane,
            Self::PiggyBank,
            Self::GraduationCap,
            Self::Tag,
        ]
    }
}

/// Colour tag for a category or savings goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Blue,
    Red,
    Yellow,
    Purple,
    Orange,
    Pink,
    Teal,
    #[default]
    Gray,
}

macro_rules! tag_str_impls {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match serde_json::to_value(self) {
                    Ok(serde_json::Value::String(s)) => write!(f, "{}", s),
                    _ => write!(f, "{:?}", self),
                }
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
                    .map_err(|_| format!("Unknown {}: {}", stringify!($ty).to_lowercase(), s))
            }
        }
    };
}

tag_str_impls!(Icon);
tag_str_impls!(Color);

/// A spending category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: Icon,
    pub color: Color,

    /// Seeded on first run rather than created by the user
    #[serde(default)]
    pub is_default: bool,

    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new user category
    pub fn new(name: impl Into<String>, icon: Icon, color: Color) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            icon,
            color,
            is_default: false,
            created_at: Utc::now(),
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Partial update for a category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub icon: Option<Icon>,
    pub color: Option<Color>,
}

impl Category {
    /// Apply a partial update field by field
    pub fn apply(&mut self, update: CategoryUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(icon) = update.icon {
            self.icon = icon;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
    }
}

/// The categories seeded into an empty store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultCategory {
    Groceries,
    Transport,
    Bills,
    Utilities,
}

impl DefaultCategory {
    pub fn all() -> &'static [DefaultCategory] {
        &[
            DefaultCategory::Groceries,
            DefaultCategory::Transport,
            DefaultCategory::Bills,
            DefaultCategory::Utilities,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Groceries => "Groceries",
            Self::Transport => "Transport",
            Self::Bills => "Bills",
            Self::Utilities => "Utilities",
        }
    }

    pub fn icon(&self) -> Icon {
        match self {
            Self::Groceries => Icon::ShoppingCart,
            Self::Transport => Icon::Car,
            Self::Bills => Icon::Receipt,
            Self::Utilities => Icon::Zap,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Groceries => Color::Green,
            Self::Transport => Color::Blue,
            Self::Bills => Color::Red,
            Self::Utilities => Color::Yellow,
        }
    }

    pub fn to_category(&self) -> Category {
        let mut category = Category::new(self.name(), self.icon(), self.color());
        category.is_default = true;
        category
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}
