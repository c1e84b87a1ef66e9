//! User-facing settings record
//!
//! A singleton stored alongside the other records: currency and theme.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display currency code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Inr,
    Jpy,
    Cad,
    Aud,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
            Self::Inr => "₹",
            Self::Jpy => "¥",
            Self::Cad => "C$",
            Self::Aud => "A$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
            Self::Gbp => write!(f, "GBP"),
            Self::Inr => write!(f, "INR"),
            Self::Jpy => write!(f, "JPY"),
            Self::Cad => write!(f, "CAD"),
            Self::Aud => write!(f, "AUD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "INR" => Ok(Self::Inr),
            "JPY" => Ok(Self::Jpy),
            "CAD" => Ok(Self::Cad),
            "AUD" => Ok(Self::Aud),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

/// Colour scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
            Self::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            _ => Err(format!("Unknown theme: {s}")),
        }
    }
}

/// The settings singleton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    pub currency: Currency,
    pub theme: Theme,
}

impl Settings {
    /// Seed settings for a fresh store
    pub fn with_currency(currency: Currency) -> Self {
        Self {
            currency,
            theme: Theme::System,
        }
    }
}

/// Partial update for the settings singleton
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub currency: Option<Currency>,
    pub theme: Option<Theme>,
}

impl Settings {
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(currency) = update.currency {
            self.currency = currency;
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_theme_is_system() {
        let settings = Settings::with_currency(Currency::Eur);
        assert_eq!(settings.theme, Theme::System);
        assert_eq!(settings.currency.symbol(), "€");
    }

    #[test]
    fn test_serialized_codes() {
        let json = serde_json::to_string(&Settings::with_currency(Currency::Gbp)).unwrap();
        assert_eq!(json, r#"{"currency":"GBP","theme":"system"}"#);
    }

    #[test]
    fn test_parse() {
        assert_eq!("inr".parse::<Currency>().unwrap(), Currency::Inr);
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("XYZ".parse::<Currency>().is_err());
    }
}
