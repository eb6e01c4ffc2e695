//! Transcript → intent classification.
//!
//! Matching runs on a lower-cased copy of the transcript; the transcript forwarded in
//! [`Intent::FreeText`] is the caller's original text. Classification never fails: a
//! transcript that matches no rule is a `FreeText` intent, not an error.

use crate::error::{ClassifierError, ClassifierResult};
use crate::intent::{Intent, IntentKind};
use crate::matcher::{KeywordMatcher, MatchMode};
use crate::rules::RuleTable;
use crate::vocabulary::VocabularyContext;
use std::sync::OnceLock;
use tracing::{debug, error};

#[derive(Debug, Clone)]
struct CompiledRule {
    intent: Intent,
    matcher: KeywordMatcher,
}

/// Result of classifying one transcript, with the evidence for auditing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub intent: Intent,
    /// Keyword (or whole word, in `WholeWord` mode) that selected the rule.
    pub matched_keyword: Option<String>,
    /// Position of the winning rule in the resolved order for the context.
    pub rule_position: Option<usize>,
}

/// Rule table compiled once per context; classification borrows immutably.
#[derive(Debug, Clone)]
pub struct CommandClassifier {
    mode: MatchMode,
    per_context: [Vec<CompiledRule>; 3],
}

static DEFAULT_CLASSIFIER: OnceLock<CommandClassifier> = OnceLock::new();

/// Classify with the built-in vocabulary and substring matching.
pub fn classify(transcript: &str, context: VocabularyContext) -> Intent {
    default_classifier().classify(transcript, context)
}

/// Shared classifier over [`RuleTable::builtin`], built on first use.
pub fn default_classifier() -> &'static CommandClassifier {
    DEFAULT_CLASSIFIER.get_or_init(|| match CommandClassifier::new(&RuleTable::builtin(), MatchMode::Substring) {
        Ok(classifier) => classifier,
        Err(e) => {
            error!("Built-in rule table rejected, every transcript will be free text: {}", e);
            CommandClassifier::empty(MatchMode::Substring)
        }
    })
}

impl CommandClassifier {
    /// Compile `table` for every vocabulary context.
    pub fn new(table: &RuleTable, mode: MatchMode) -> ClassifierResult<Self> {
        let mut per_context: [Vec<CompiledRule>; 3] = Default::default();
        for context in VocabularyContext::ALL {
            let mut compiled = Vec::new();
            for rule in table.for_context(context)? {
                let intent = rule.intent.to_intent().ok_or(ClassifierError::FreeTextTarget)?;
                compiled.push(CompiledRule {
                    intent,
                    matcher: KeywordMatcher::compile(&rule.keywords, mode)?,
                });
            }
            debug!("Compiled {} rules for {} ({})", compiled.len(), context, mode);
            per_context[context.index()] = compiled;
        }
        Ok(Self { mode, per_context })
    }

    /// Built-in vocabulary with the given match mode.
    pub fn builtin(mode: MatchMode) -> ClassifierResult<Self> {
        Self::new(&RuleTable::builtin(), mode)
    }

    /// A classifier with no rules: everything is free text.
    pub fn empty(mode: MatchMode) -> Self {
        Self {
            mode,
            per_context: Default::default(),
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn classify(&self, transcript: &str, context: VocabularyContext) -> Intent {
        self.explain(transcript, context).intent
    }

    /// Classify and report which rule fired.
    pub fn explain(&self, transcript: &str, context: VocabularyContext) -> Classification {
        let lowered = transcript.to_lowercase();
        for (position, rule) in self.per_context[context.index()].iter().enumerate() {
            if let Some(keyword) = rule.matcher.find(&lowered) {
                debug!(
                    "Rule #{} matched \"{}\" -> {} under {}",
                    position, keyword, rule.intent, context
                );
                return Classification {
                    intent: rule.intent.clone(),
                    matched_keyword: Some(keyword.to_string()),
                    rule_position: Some(position),
                };
            }
        }
        debug!("No rule matched under {}, forwarding as free text", context);
        Classification {
            intent: Intent::FreeText(transcript.to_string()),
            matched_keyword: None,
            rule_position: None,
        }
    }

    /// Intent kinds a context can produce, in rule order, ending with `FreeText`.
    pub fn reachable_kinds(&self, context: VocabularyContext) -> Vec<IntentKind> {
        let mut kinds: Vec<IntentKind> = Vec::new();
        for rule in &self.per_context[context.index()] {
            let kind = rule.intent.kind();
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds.push(IntentKind::FreeText);
        kinds
    }
}

impl Default for CommandClassifier {
    fn default() -> Self {
        default_classifier().clone()
    }
}
