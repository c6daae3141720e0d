//! Text analysis core.
//!
//! Request and result types, language resolution, PII redaction, the result
//! cache and the orchestration service that fans a request out to the
//! analysis provider.

pub mod cache;
pub mod language;
pub mod pii;
pub mod service;
pub mod types;

pub use cache::ResultCache;
pub use language::LanguageResolver;
pub use service::{TextAnalysisService, SHORT_TEXT_PROVIDER};
pub use types::*;
