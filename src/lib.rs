//! Microsoft Translator v3 API client
//!
//! This library provides an async client for the Azure Cognitive Services
//! text-translation API: bearer-token authentication with lazy refresh,
//! translation (single, batch, and with word alignment), language
//! detection, sentence segmentation, and language catalog lookup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod core;

// Re-export key types for convenience
pub use crate::core::{
    auth::{BearerToken, TokenManager},
    client::Translator,
    config::TranslatorConfig,
    errors::{Result, TranslatorError},
    models::{
        Alignment, DetectedLanguage, Detection, LanguageCatalog, LanguageInfo, TextType,
        TranslateRequest, Translation, TranslationItem,
    },
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
