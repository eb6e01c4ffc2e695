//! # GramSetu Intent - Voice Command Classifier
//!
//! Maps a finalized speech transcript to a marketplace action using keyword rules.
//! One rule table serves every screen; the active [`VocabularyContext`] selects which
//! overlays apply on top of the generic rules.
//!
//! ```text
//! transcript ──► lower-case ──► rules for context (first match wins) ──► Intent
//!                                        │ no match
//!                                        └──────────────► Intent::FreeText(original)
//! ```
//!
//! ```
//! use gramsetu_intent::{classify, Intent, VocabularyContext};
//!
//! assert_eq!(classify("show me my booking", VocabularyContext::ProviderDashboard), Intent::ShowRequests);
//! assert_eq!(classify("show me my booking", VocabularyContext::CustomerDashboard), Intent::ShowBookings);
//! ```

pub mod classifier;
pub mod error;
pub mod intent;
pub mod matcher;
pub mod rules;
pub mod vocabulary;

pub use classifier::{classify, default_classifier, Classification, CommandClassifier};
pub use error::{ClassifierError, ClassifierResult};
pub use intent::{Intent, IntentKind};
pub use matcher::MatchMode;
pub use rules::{Placement, Rule, RuleScope, RuleTable};
pub use vocabulary::{VocabularyContext, DICTATION_EXAMPLES};
