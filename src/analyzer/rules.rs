//! Post-classification business rules.
//!
//! Rules run after the classifier, urgency detector, priority resolver and
//! confidence scorer have produced a complete [`AnalysisResult`]. They may
//! override category and raise priority, and may add keywords; they never
//! lower severity or drop keywords.

use tracing::debug;

use super::model::{AnalysisResult, Category, Priority};

/// A terminal rewrite of an assembled analysis result.
pub trait PostRule: Send + Sync {
    /// Short rule name for logging.
    fn name(&self) -> &str;

    /// Apply the rule. `normalized` is the lowercased message.
    fn apply(&self, normalized: &str, result: &mut AnalysisResult);
}

/// Refund requests are always Billing tickets with at least P1 priority.
#[derive(Debug, Clone)]
pub struct RefundOverride {
    triggers: Vec<String>,
}

impl RefundOverride {
    pub const DEFAULT_TRIGGERS: [&'static str; 2] = ["refund", "money back"];

    pub fn new() -> Self {
        Self {
            triggers: Self::DEFAULT_TRIGGERS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Default for RefundOverride {
    fn default() -> Self {
        Self::new()
    }
}

impl PostRule for RefundOverride {
    fn name(&self) -> &str {
        "refund_override"
    }

    fn apply(&self, normalized: &str, result: &mut AnalysisResult) {
        let matched: Vec<&String> = self
            .triggers
            .iter()
            .filter(|t| normalized.contains(t.as_str()))
            .collect();
        if matched.is_empty() {
            return;
        }

        debug!(
            from_category = %result.category,
            from_priority = %result.priority,
            "Refund override applied"
        );

        result.category = Category::Billing;
        result.priority = result.priority.at_least(Priority::P1);
        for trigger in matched {
            result.push_keyword(trigger);
        }
    }
}

/// Ordered set of post rules, applied in registration order.
pub struct RuleSet {
    rules: Vec<Box<dyn PostRule>>,
}

impl RuleSet {
    /// The production rule set.
    pub fn default_rules() -> Self {
        Self {
            rules: vec![Box::new(RefundOverride::new())],
        }
    }

    pub fn apply(&self, normalized: &str, result: &mut AnalysisResult) {
        for rule in &self.rules {
            rule.apply(normalized, result);
        }
    }

    /// Names of the registered rules, in order.
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::default_rules()
    }
}
