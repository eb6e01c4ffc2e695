//! Error types for building a command classifier.
//!
//! Classification itself is total; only rule tables and configuration can be rejected.

use crate::intent::IntentKind;
use crate::vocabulary::VocabularyContext;
use thiserror::Error;

/// Result type alias for classifier construction
pub type ClassifierResult<T> = Result<T, ClassifierError>;

/// Errors raised while building or configuring a classifier
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("rule for {0} has no keywords")]
    EmptyRule(IntentKind),

    #[error("rule for {0} contains a blank keyword")]
    BlankKeyword(IntentKind),

    #[error("free_text is the fallback and cannot be a rule target")]
    FreeTextTarget,

    #[error("rule for {intent} is anchored before {anchor}, which no rule produces under {context}")]
    UnknownAnchor {
        intent: IntentKind,
        anchor: IntentKind,
        context: VocabularyContext,
    },

    #[error("unknown vocabulary context: {0}")]
    UnknownContext(String),

    #[error("unknown match mode: {0}")]
    UnknownMatchMode(String),

    #[error("keyword pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("rule file error: {0}")]
    Toml(#[from] toml::de::Error),
}
