//! Keyword matching strategies.
//!
//! `Substring` is the historical heuristic: a keyword matches anywhere, so "yesterday"
//! contains "yes" and "notification" contains "no". `WholeWord` only matches a keyword
//! as a complete word (optionally pluralised with a trailing `s`). Switching modes
//! changes which intents users get, so it is opt-in.

use crate::error::{ClassifierError, ClassifierResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Substring,
    WholeWord,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Substring => "substring",
            MatchMode::WholeWord => "whole_word",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "substring" => Ok(MatchMode::Substring),
            "whole_word" | "word" => Ok(MatchMode::WholeWord),
            _ => Err(ClassifierError::UnknownMatchMode(s.to_string())),
        }
    }
}

/// Compiled keyword set for one rule. Keywords are stored lower-cased.
#[derive(Debug, Clone)]
pub(crate) enum KeywordMatcher {
    Substring(Vec<String>),
    WholeWord(Regex),
}

impl KeywordMatcher {
    pub(crate) fn compile(keywords: &[String], mode: MatchMode) -> ClassifierResult<Self> {
        let lowered: Vec<String> = keywords.iter().map(|k| k.trim().to_lowercase()).collect();
        match mode {
            MatchMode::Substring => Ok(KeywordMatcher::Substring(lowered)),
            MatchMode::WholeWord => {
                let alternation = lowered
                    .iter()
                    .map(|k| regex::escape(k))
                    .collect::<Vec<_>>()
                    .join("|");
                let pattern = format!(r"\b(?:{})s?\b", alternation);
                Ok(KeywordMatcher::WholeWord(Regex::new(&pattern)?))
            }
        }
    }

    /// First keyword occurrence in an already lower-cased transcript.
    pub(crate) fn find<'a>(&'a self, lowered: &'a str) -> Option<&'a str> {
        match self {
            KeywordMatcher::Substring(keywords) => keywords
                .iter()
                .find(|k| lowered.contains(k.as_str()))
                .map(String::as_str),
            KeywordMatcher::WholeWord(re) => re.find(lowered).map(|m| m.as_str()),
        }
    }
}
