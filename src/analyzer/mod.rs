//! Local, deterministic support-ticket analysis.
//!
//! Maps a raw message to a category, priority, urgency flag, confidence and
//! matched keywords using plain substring matching against fixed phrase
//! tables. No model, no network, no state beyond the lexicon.

pub mod engine;
pub mod lexicon;
pub mod model;
pub mod rules;

pub use engine::TicketAnalyzer;
pub use lexicon::Lexicon;
pub use model::{AnalysisResult, Category, Priority};
