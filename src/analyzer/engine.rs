//! Ticket analysis engine.
//!
//! Pipeline, strictly sequential:
//! 1. normalize (lowercase only)
//! 2. classify category by counting trigger-phrase hits
//! 3. detect urgency
//! 4. resolve priority
//! 5. score confidence
//! 6. collect keywords
//! 7. apply post rules (refund override)
//!
//! The engine is stateless apart from its immutable lexicon and never fails.

use std::sync::Arc;

use tracing::debug;

use super::lexicon::{KeywordTable, Lexicon, UrgencyTable};
use super::model::{AnalysisResult, Category, Priority};
use super::rules::RuleSet;

/// Phrases that make a ticket P0 regardless of anything else.
pub const P0_PHRASES: [&str; 2] = ["system down", "security breach"];

/// Confidence with no matched phrases.
pub const BASELINE_CONFIDENCE: f64 = 0.30;

/// Bonus for landing in a specific (non-Other) category.
pub const SPECIFICITY_BONUS: f64 = 0.05;

/// How far above the baseline the base score can climb.
const CONFIDENCE_HEADROOM: f64 = 0.60;

/// Outcome of the keyword classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Category,
    /// Phrases of the winning category that matched, in table order.
    pub matched: Vec<String>,
}

/// Outcome of the urgency detector.
#[derive(Debug, Clone, PartialEq)]
pub struct UrgencySignal {
    pub urgent: bool,
    pub matched: Vec<String>,
}

/// Lowercase the message. No stemming, punctuation or whitespace changes.
pub fn normalize(message: &str) -> String {
    message.to_lowercase()
}

fn matching_phrases(normalized: &str, phrases: &[String]) -> Vec<String> {
    phrases
        .iter()
        .filter(|p| normalized.contains(p.as_str()))
        .cloned()
        .collect()
}

/// Pick the category with the most distinct phrase hits.
///
/// Ties go to the category listed first in [`Category::RANKED`]; no hits at
/// all yields `Other` with nothing matched.
pub fn classify(normalized: &str, table: &KeywordTable) -> Classification {
    let mut best = Classification {
        category: Category::Other,
        matched: Vec::new(),
    };

    for category in Category::RANKED {
        let matched = matching_phrases(normalized, table.phrases(category));
        // Strictly greater: an equal count never displaces an earlier category.
        if matched.len() > best.matched.len() {
            best = Classification { category, matched };
        }
    }

    best
}

pub fn detect_urgency(normalized: &str, table: &UrgencyTable) -> UrgencySignal {
    let matched = matching_phrases(normalized, table.phrases());
    UrgencySignal {
        urgent: !matched.is_empty(),
        matched,
    }
}

/// First match wins: P0 phrase, then urgency, then actionable category.
pub fn resolve_priority(normalized: &str, category: Category, urgent: bool) -> Priority {
    if P0_PHRASES.iter().any(|p| normalized.contains(p)) {
        Priority::P0
    } else if urgent {
        Priority::P1
    } else if category.is_actionable() {
        Priority::P2
    } else {
        Priority::P3
    }
}

/// Confidence from the winning category's hit count `n`.
///
/// `0.30 + 0.60 * n / (n + 1)`, plus 0.05 unless the category is `Other`,
/// clamped to `[0, 1]`. Strictly increasing in `n`, base tops out below 0.90.
pub fn score_confidence(matches: usize, category: Category) -> f64 {
    let n = matches as f64;
    let base = BASELINE_CONFIDENCE + CONFIDENCE_HEADROOM * n / (n + 1.0);
    let bonus = if category == Category::Other {
        0.0
    } else {
        SPECIFICITY_BONUS
    };
    (base + bonus).clamp(0.0, 1.0)
}

/// Keyword-table support-ticket analyzer.
pub struct TicketAnalyzer {
    lexicon: Arc<Lexicon>,
    rules: RuleSet,
}

impl TicketAnalyzer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            rules: RuleSet::default_rules(),
        }
    }

    /// Analyzer over the built-in lexicon.
    pub fn builtin() -> Self {
        Self::new(Arc::new(Lexicon::builtin()))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Analyze a ticket message.
    ///
    /// The caller guarantees the message is non-empty after trimming; the
    /// engine itself accepts any string and always returns a result.
    pub fn analyze(&self, message: &str) -> AnalysisResult {
        let normalized = normalize(message);

        let classification = classify(&normalized, self.lexicon.keywords());
        let urgency = detect_urgency(&normalized, self.lexicon.urgency());
        let priority = resolve_priority(&normalized, classification.category, urgency.urgent);
        let confidence = score_confidence(classification.matched.len(), classification.category);

        let mut result = AnalysisResult {
            category: classification.category,
            priority,
            urgency: urgency.urgent,
            keywords: Vec::new(),
            confidence,
            message: message.to_string(),
        };
        for keyword in classification.matched.iter().chain(urgency.matched.iter()) {
            result.push_keyword(keyword);
        }

        self.rules.apply(&normalized, &mut result);

        debug!(
            category = %result.category,
            priority = %result.priority,
            urgency = result.urgency,
            confidence = result.confidence,
            keywords = result.keywords.len(),
            "Ticket analyzed"
        );

        result
    }
}

impl Default for TicketAnalyzer {
    fn default() -> Self {
        Self::builtin()
    }
}
