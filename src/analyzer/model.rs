//! Analysis data model — categories, priorities, and the engine's result type.

use serde::{Deserialize, Serialize};

/// Ticket category assigned by the keyword classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Billing,
    Technical,
    Account,
    Feature,
    Other,
}

impl Category {
    /// Categories the classifier scores, in tie-break order.
    ///
    /// When two categories match the same number of phrases, the one listed
    /// first wins. `Other` is never scored; it is the fallback.
    pub const RANKED: [Category; 4] = [
        Category::Billing,
        Category::Technical,
        Category::Account,
        Category::Feature,
    ];

    /// Whether a non-urgent ticket in this category still needs action (P2).
    pub fn is_actionable(self) -> bool {
        matches!(self, Self::Billing | Self::Technical | Self::Account)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Billing => "Billing",
            Self::Technical => "Technical",
            Self::Account => "Account",
            Self::Feature => "Feature",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Billing" => Ok(Self::Billing),
            "Technical" => Ok(Self::Technical),
            "Account" => Ok(Self::Account),
            "Feature" => Ok(Self::Feature),
            "Other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Ticket priority. `P0` is the most severe.
///
/// The derived ordering follows declaration order, so `P0 < P1 < P2 < P3`
/// and "more severe" means "smaller".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::P0 => "P0",
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }

    /// Raise severity to at least `floor`. Never lowers it.
    pub fn at_least(self, floor: Priority) -> Priority {
        self.min(floor)
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P0" => Ok(Self::P0),
            "P1" => Ok(Self::P1),
            "P2" => Ok(Self::P2),
            "P3" => Ok(Self::P3),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Structured output of the ticket analysis engine.
///
/// Only [`TicketAnalyzer`](super::TicketAnalyzer) builds these, so every
/// instance has been through the post-processing rules. Fields are read
/// through accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub(crate) category: Category,
    pub(crate) priority: Priority,
    pub(crate) urgency: bool,
    pub(crate) keywords: Vec<String>,
    pub(crate) confidence: f64,
    pub(crate) message: String,
}

impl AnalysisResult {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn urgency(&self) -> bool {
        self.urgency
    }

    /// Matched phrases, deduplicated, in first-match order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Confidence in `[0.0, 1.0]`.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// The original, unmodified input message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Append a keyword unless it is already present.
    pub(crate) fn push_keyword(&mut self, keyword: &str) {
        if !self.keywords.iter().any(|k| k == keyword) {
            self.keywords.push(keyword.to_string());
        }
    }
}
