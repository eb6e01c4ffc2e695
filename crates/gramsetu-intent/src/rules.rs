//! The shared keyword rule table.
//!
//! One ordered list of rules serves every screen. Generic rules are always active;
//! overlays are scoped to one [`VocabularyContext`] and are either appended or
//! anchored immediately ahead of the first rule producing a given intent kind.
//! First match wins, so anchoring is how an overlay takes priority over a generic rule.
//!
//! Extra rules can be loaded from TOML:
//!
//! ```toml
//! [[rule]]
//! keywords = ["plumber", "electrician"]
//! intent = "show_search"
//! context = "customer_dashboard"   # omit for every context
//! before = "show_bookings"         # omit to append
//! ```

use crate::error::{ClassifierError, ClassifierResult};
use crate::intent::IntentKind;
use crate::vocabulary::VocabularyContext;
use serde::Deserialize;

/// Where a rule is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleScope {
    #[default]
    Always,
    Only(VocabularyContext),
}

/// Where a rule lands in the resolved order for a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    Append,
    /// Immediately ahead of the first rule producing this kind.
    Before(IntentKind),
}

/// A keyword set mapped to one intent kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub keywords: Vec<String>,
    pub intent: IntentKind,
    pub scope: RuleScope,
    pub placement: Placement,
}

impl Rule {
    pub fn new(intent: IntentKind, keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            intent,
            scope: RuleScope::Always,
            placement: Placement::Append,
        }
    }

    pub fn only_in(mut self, context: VocabularyContext) -> Self {
        self.scope = RuleScope::Only(context);
        self
    }

    pub fn before(mut self, anchor: IntentKind) -> Self {
        self.placement = Placement::Before(anchor);
        self
    }

    pub fn applies_to(&self, context: VocabularyContext) -> bool {
        match self.scope {
            RuleScope::Always => true,
            RuleScope::Only(ctx) => ctx == context,
        }
    }

    fn validate(&self) -> ClassifierResult<()> {
        if self.intent == IntentKind::FreeText {
            return Err(ClassifierError::FreeTextTarget);
        }
        if self.keywords.is_empty() {
            return Err(ClassifierError::EmptyRule(self.intent));
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ClassifierError::BlankKeyword(self.intent));
        }
        Ok(())
    }
}

/// Ordered rule list shared by all vocabulary contexts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default, rename = "rule")]
    rules: Vec<RuleSpec>,
}

#[derive(Debug, Deserialize)]
struct RuleSpec {
    keywords: Vec<String>,
    intent: IntentKind,
    #[serde(default)]
    context: Option<VocabularyContext>,
    #[serde(default)]
    before: Option<IntentKind>,
}

impl From<RuleSpec> for Rule {
    fn from(spec: RuleSpec) -> Self {
        Rule {
            keywords: spec.keywords,
            intent: spec.intent,
            scope: spec.context.map(RuleScope::Only).unwrap_or_default(),
            placement: spec.before.map(Placement::Before).unwrap_or_default(),
        }
    }
}

impl RuleTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The marketplace vocabulary: generic rules followed by the dashboard overlays.
    pub fn builtin() -> Self {
        use IntentKind::*;
        use VocabularyContext::{CustomerDashboard, ProviderDashboard};

        Self::empty()
            .with_rule(Rule::new(Accept, &["accept", "yes"]))
            .with_rule(Rule::new(Decline, &["decline", "no", "reject"]))
            .with_rule(Rule::new(ShowEarnings, &["earnings", "money"]))
            .with_rule(Rule::new(ShowProfile, &["profile"]))
            .with_rule(Rule::new(ShowNotifications, &["notification"]))
            .with_rule(Rule::new(ShowSearch, &["search"]))
            .with_rule(Rule::new(ShowBookings, &["booking"]))
            // Providers see bookings as incoming requests.
            .with_rule(
                Rule::new(ShowRequests, &["request", "booking"])
                    .only_in(ProviderDashboard)
                    .before(ShowBookings),
            )
            .with_rule(Rule::new(ShowOverview, &["overview", "dashboard"]).only_in(ProviderDashboard))
            .with_rule(
                Rule::new(ShowSearch, &["find"])
                    .only_in(CustomerDashboard)
                    .before(ShowSearch),
            )
            .with_rule(
                Rule::new(ShowBookings, &["history"])
                    .only_in(CustomerDashboard)
                    .before(ShowBookings),
            )
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append rules parsed from a TOML document (see module docs for the format).
    pub fn with_toml_overlays(mut self, source: &str) -> ClassifierResult<Self> {
        let file: RuleFile = toml::from_str(source)?;
        for spec in file.rules {
            let rule = Rule::from(spec);
            rule.validate()?;
            self.rules.push(rule);
        }
        Ok(self)
    }

    /// Resolve the evaluation order for one context.
    ///
    /// Appended rules keep declaration order. Anchored rules are then inserted, in
    /// declaration order, ahead of the first rule currently producing their anchor.
    pub fn for_context(&self, context: VocabularyContext) -> ClassifierResult<Vec<&Rule>> {
        let active: Vec<&Rule> = self.rules.iter().filter(|r| r.applies_to(context)).collect();
        for rule in &active {
            rule.validate()?;
        }

        let mut ordered: Vec<&Rule> = active
            .iter()
            .copied()
            .filter(|r| r.placement == Placement::Append)
            .collect();

        for rule in active.iter().copied() {
            let Placement::Before(anchor) = rule.placement else {
                continue;
            };
            let position = ordered
                .iter()
                .position(|r| r.intent == anchor)
                .ok_or(ClassifierError::UnknownAnchor {
                    intent: rule.intent,
                    anchor,
                    context,
                })?;
            ordered.insert(position, rule);
        }

        Ok(ordered)
    }
}
