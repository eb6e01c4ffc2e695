//! Vocabulary contexts: which screen (or role) is listening decides which rules apply.

use crate::error::ClassifierError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Active keyword vocabulary, selected by the screen hosting the voice assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyContext {
    /// Floating assistant outside any dashboard. Only the generic rules apply.
    #[default]
    Generic,
    CustomerDashboard,
    ProviderDashboard,
}

/// Phrases offered by the voice search box, where speech is taken as a query verbatim.
pub const DICTATION_EXAMPLES: &[&str] = &[
    "Search for cleaning services",
    "Find plumbers near me",
    "Book garden maintenance",
];

const GENERIC_EXAMPLES: &[&str] = &[
    "Accept",
    "Decline",
    "Show earnings",
    "Open profile",
    "Open notifications",
    "Search for services",
    "Show my bookings",
];

const CUSTOMER_EXAMPLES: &[&str] = &[
    "Search for services",
    "Show my bookings",
    "Open notifications",
    "Find cleaning services",
    "Book a plumber",
];

const PROVIDER_EXAMPLES: &[&str] = &[
    "Accept booking",
    "Decline booking",
    "Show earnings",
    "Open profile",
    "View requests",
    "Go to overview",
];

impl VocabularyContext {
    pub const ALL: [VocabularyContext; 3] = [
        VocabularyContext::Generic,
        VocabularyContext::CustomerDashboard,
        VocabularyContext::ProviderDashboard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VocabularyContext::Generic => "generic",
            VocabularyContext::CustomerDashboard => "customer_dashboard",
            VocabularyContext::ProviderDashboard => "provider_dashboard",
        }
    }

    /// "Available commands" shown next to the microphone button.
    pub fn example_phrases(&self) -> &'static [&'static str] {
        match self {
            VocabularyContext::Generic => GENERIC_EXAMPLES,
            VocabularyContext::CustomerDashboard => CUSTOMER_EXAMPLES,
            VocabularyContext::ProviderDashboard => PROVIDER_EXAMPLES,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            VocabularyContext::Generic => 0,
            VocabularyContext::CustomerDashboard => 1,
            VocabularyContext::ProviderDashboard => 2,
        }
    }
}

impl fmt::Display for VocabularyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VocabularyContext {
    type Err = ClassifierError;

    /// Accepts the snake_case name, with `-` or spaces in place of `_`, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "generic" => Ok(VocabularyContext::Generic),
            "customer_dashboard" | "customer" => Ok(VocabularyContext::CustomerDashboard),
            "provider_dashboard" | "provider" => Ok(VocabularyContext::ProviderDashboard),
            _ => Err(ClassifierError::UnknownContext(s.to_string())),
        }
    }
}
