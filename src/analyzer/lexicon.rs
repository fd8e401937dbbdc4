//! Trigger-phrase tables for the keyword classifier and urgency detector.
//!
//! Tables are built once at startup (built-in defaults or a JSON file) and
//! shared read-only behind an `Arc`. Phrases are stored lowercased so they
//! can be matched directly against a normalized message.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::model::Category;
use crate::error::LexiconError;

const BILLING: &[&str] = &[
    "payment",
    "refund",
    "invoice",
    "charge",
    "billing",
    "money back",
    "subscription",
    "pricing",
    "receipt",
];

const TECHNICAL: &[&str] = &[
    "error",
    "bug",
    "crash",
    "not working",
    "broken",
    "failed",
    "glitch",
    "outage",
    "slow",
    "timeout",
    "exception",
];

const ACCOUNT: &[&str] = &[
    "login",
    "password",
    "account locked",
    "account",
    "sign in",
    "signup",
    "register",
    "locked out",
    "two factor",
    "2fa",
    "authentication",
];

const FEATURE: &[&str] = &[
    "request",
    "feature",
    "add option",
    "please add",
    "option",
    "enhancement",
    "suggestion",
    "wishlist",
    "improve",
    "would like",
];

const URGENCY: &[&str] = &[
    "urgent",
    "asap",
    "immediately",
    "down",
    "critical",
    "emergency",
    "right now",
    "escalate",
    "blocked",
];

/// Per-category trigger phrases.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    phrases: HashMap<Category, Vec<String>>,
}

impl KeywordTable {
    /// Phrases for a category, in table order. Empty for `Other`.
    pub fn phrases(&self, category: Category) -> &[String] {
        self.phrases
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn insert(&mut self, category: Category, phrases: Vec<String>) {
        self.phrases.insert(category, phrases);
    }
}

/// Urgency-signal phrases.
#[derive(Debug, Clone, Default)]
pub struct UrgencyTable {
    phrases: Vec<String>,
}

impl UrgencyTable {
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

/// Both phrase tables the engine matches against.
#[derive(Debug, Clone)]
pub struct Lexicon {
    keywords: KeywordTable,
    urgency: UrgencyTable,
}

/// On-disk lexicon format.
///
/// ```json
/// { "categories": { "Billing": ["payment"] }, "urgency": ["urgent"] }
/// ```
#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    categories: HashMap<Category, Vec<String>>,
    #[serde(default)]
    urgency: Vec<String>,
}

impl Lexicon {
    /// The built-in support-ticket tables.
    pub fn builtin() -> Self {
        let mut keywords = KeywordTable::default();
        keywords.insert(Category::Billing, clean(BILLING.iter().copied()));
        keywords.insert(Category::Technical, clean(TECHNICAL.iter().copied()));
        keywords.insert(Category::Account, clean(ACCOUNT.iter().copied()));
        keywords.insert(Category::Feature, clean(FEATURE.iter().copied()));

        Self {
            keywords,
            urgency: UrgencyTable {
                phrases: clean(URGENCY.iter().copied()),
            },
        }
    }

    /// Parse a lexicon from JSON. Categories missing from the file get no
    /// phrases; an `Other` entry is rejected since `Other` is never scored.
    pub fn from_json(json: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile =
            serde_json::from_str(json).map_err(|e| LexiconError::Parse(e.to_string()))?;

        if file.categories.contains_key(&Category::Other) {
            return Err(LexiconError::Invalid(
                "category 'Other' cannot have trigger phrases".into(),
            ));
        }

        let mut keywords = KeywordTable::default();
        for (category, phrases) in file.categories {
            keywords.insert(category, clean(phrases.iter().map(String::as_str)));
        }

        Ok(Self {
            keywords,
            urgency: UrgencyTable {
                phrases: clean(file.urgency.iter().map(String::as_str)),
            },
        })
    }

    /// Load a lexicon from a JSON file.
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let json = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let lexicon = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            urgency_phrases = lexicon.urgency.phrases.len(),
            "Lexicon loaded"
        );
        Ok(lexicon)
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    pub fn urgency(&self) -> &UrgencyTable {
        &self.urgency
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lowercase and trim phrases, dropping empties and duplicates.
fn clean<'a>(phrases: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for phrase in phrases {
        let phrase = phrase.trim().to_lowercase();
        if !phrase.is_empty() && !out.contains(&phrase) {
            out.push(phrase);
        }
    }
    out
}
