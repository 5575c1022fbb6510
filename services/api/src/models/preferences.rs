//! User preference document and its validation rules
//!
//! Preferences are stored as a JSONB blob on the user record. Validation is
//! strict at the write boundary; reads re-validate defensively and fall back
//! to defaults (manual database edits are possible).

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Cryptocurrency ids supported by the market-data provider
pub const SUPPORTED_COINS: [&str; 15] = [
    "bitcoin",
    "ethereum",
    "cardano",
    "solana",
    "binancecoin",
    "ripple",
    "dogecoin",
    "polkadot",
    "avalanche-2",
    "chainlink",
    "polygon",
    "litecoin",
    "uniswap",
    "cosmos",
    "stellar",
];

/// Investor archetypes used to personalize AI insights
pub const INVESTOR_TYPES: [&str; 7] = [
    "HODLer",
    "Day Trader",
    "Swing Trader",
    "NFT Collector",
    "DeFi Enthusiast",
    "Miner",
    "Staker",
];

/// Dashboard content sections a user can toggle
pub const CONTENT_TYPES: [&str; 6] = [
    "prices",
    "news",
    "ai-insights",
    "memes",
    "charts",
    "social",
];

/// Coins assumed when a user has no valid preferences yet
pub const DEFAULT_COINS: [&str; 4] = ["bitcoin", "ethereum", "cardano", "solana"];

/// Archetype assumed when none was chosen
pub const DEFAULT_INVESTOR_TYPE: &str = "HODLer";

const DEFAULT_CONTENT_PREFERENCES: [&str; 3] = ["prices", "news", "ai-insights"];

const MAX_COINS: usize = 10;

/// Candidate preferences as submitted by the client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesInput {
    pub coins: Option<Vec<String>>,
    pub investor_type: Option<String>,
    pub content_preferences: Option<Vec<String>>,
}

/// Validated preferences as persisted on the user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesDocument {
    pub coins: Vec<String>,
    pub investor_type: String,
    pub content_preferences: Vec<String>,
    pub onboarding_completed: bool,
    pub last_updated: String,
}

impl PreferencesInput {
    /// Validate the candidate document against the fixed enumerations and
    /// cardinality bounds.
    ///
    /// Defaults are applied only for wholly-absent fields; an invalid value
    /// is a hard failure, never silently replaced. All violations are
    /// collected, one entry per constraint.
    pub fn validate(&self) -> Result<PreferencesDocument, Vec<FieldError>> {
        let mut errors = Vec::new();

        let coins = match &self.coins {
            None => DEFAULT_COINS.iter().map(|c| c.to_string()).collect(),
            Some(coins) => {
                if coins.is_empty() {
                    errors.push(FieldError::new("coins", "Select at least 1 cryptocurrency"));
                }
                if coins.len() > MAX_COINS {
                    errors.push(FieldError::new("coins", "Maximum 10 cryptocurrencies allowed"));
                }
                for coin in coins {
                    if !SUPPORTED_COINS.contains(&coin.as_str()) {
                        errors.push(FieldError::new(
                            "coins",
                            format!("Unsupported coin: {}", coin),
                        ));
                    }
                }
                coins.clone()
            }
        };

        let investor_type = match &self.investor_type {
            None => DEFAULT_INVESTOR_TYPE.to_string(),
            Some(investor_type) => {
                if !INVESTOR_TYPES.contains(&investor_type.as_str()) {
                    errors.push(FieldError::new(
                        "investorType",
                        format!("Unknown investor type: {}", investor_type),
                    ));
                }
                investor_type.clone()
            }
        };

        let content_preferences = match &self.content_preferences {
            None => DEFAULT_CONTENT_PREFERENCES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            Some(preferences) => {
                if preferences.is_empty() {
                    errors.push(FieldError::new(
                        "contentPreferences",
                        "Select at least 1 content type",
                    ));
                }
                if preferences.len() > CONTENT_TYPES.len() {
                    errors.push(FieldError::new(
                        "contentPreferences",
                        "Maximum 6 content types allowed",
                    ));
                }
                for preference in preferences {
                    if !CONTENT_TYPES.contains(&preference.as_str()) {
                        errors.push(FieldError::new(
                            "contentPreferences",
                            format!("Unknown content type: {}", preference),
                        ));
                    }
                }
                preferences.clone()
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(PreferencesDocument {
            coins,
            investor_type,
            content_preferences,
            onboarding_completed: true,
            last_updated: Utc::now().to_rfc3339(),
        })
    }
}

impl From<&PreferencesDocument> for PreferencesInput {
    fn from(document: &PreferencesDocument) -> Self {
        PreferencesInput {
            coins: Some(document.coins.clone()),
            investor_type: Some(document.investor_type.clone()),
            content_preferences: Some(document.content_preferences.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(ids: &[&str]) -> Option<Vec<String>> {
        Some(ids.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_absent_fields_get_exactly_the_documented_defaults() {
        let document = PreferencesInput::default().validate().unwrap();

        assert_eq!(document.coins, DEFAULT_COINS);
        assert_eq!(document.investor_type, "HODLer");
        assert_eq!(
            document.content_preferences,
            vec!["prices", "news", "ai-insights"]
        );
        assert!(document.onboarding_completed);
    }

    #[test]
    fn test_invalid_values_are_rejected_not_defaulted() {
        let input = PreferencesInput {
            coins: coins(&["bitcoin", "dogeco1n"]),
            investor_type: Some("Gambler".to_string()),
            content_preferences: Some(vec!["prices".to_string(), "videos".to_string()]),
        };

        let errors = input.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();

        assert_eq!(fields, vec!["coins", "investorType", "contentPreferences"]);
    }

    #[test]
    fn test_coin_cardinality_bounds() {
        let too_many: Vec<String> = SUPPORTED_COINS.iter().take(11).map(|c| c.to_string()).collect();
        let errors = PreferencesInput {
            coins: Some(too_many),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(errors.iter().any(|e| e.field == "coins"));

        let errors = PreferencesInput {
            coins: Some(vec![]),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(errors.iter().any(|e| e.field == "coins"));
    }

    #[test]
    fn test_validate_is_idempotent_on_its_own_output() {
        let input = PreferencesInput {
            coins: coins(&["solana", "chainlink"]),
            investor_type: Some("Staker".to_string()),
            content_preferences: Some(vec!["memes".to_string(), "charts".to_string()]),
        };

        let first = input.validate().unwrap();
        let second = PreferencesInput::from(&first).validate().unwrap();

        assert_eq!(first.coins, second.coins);
        assert_eq!(first.investor_type, second.investor_type);
        assert_eq!(first.content_preferences, second.content_preferences);
    }

    #[test]
    fn test_all_violations_are_collected() {
        let input = PreferencesInput {
            coins: Some(vec![]),
            investor_type: Some("Oracle".to_string()),
            content_preferences: Some(vec![]),
        };

        let errors = input.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let document = PreferencesInput::default().validate().unwrap();
        let value = serde_json::to_value(&document).unwrap();

        assert!(value.get("investorType").is_some());
        assert!(value.get("contentPreferences").is_some());
        assert!(value.get("onboardingCompleted").is_some());
        assert!(value.get("lastUpdated").is_some());
    }
}
