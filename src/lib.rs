//! NordicSense - text analysis for Nordic languages
//!
//! Sentiment, topics, keywords, summaries, toxicity and named entities for
//! Swedish, Norwegian, Danish, Finnish and English text, computed by an LLM
//! provider behind a cached, PII-aware orchestration layer.

pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod provider;
