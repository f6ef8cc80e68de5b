//! Wire-level data models for the Translator v3 API

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::errors::{Result, TranslatorError};

/// Content type of submitted text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextType {
    /// Plain text (the service default)
    #[default]
    Plain,
    /// HTML markup; tags are preserved, only text nodes are translated
    Html,
}

impl TextType {
    /// Value of the `textType` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            TextType::Plain => "plain",
            TextType::Html => "html",
        }
    }
}

impl fmt::Display for TextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// One text item in a request body array
#[derive(Debug, Clone, Serialize)]
pub struct TextItem {
    /// The text to submit; the service expects the capitalized key
    #[serde(rename = "Text")]
    pub text: String,
}

impl TextItem {
    /// Wrap a single text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Wrap a batch of texts, preserving order
    pub fn batch(texts: &[&str]) -> Vec<Self> {
        texts.iter().map(|t| Self::new(*t)).collect()
    }
}

/// Target language plus the optional translate parameters
#[derive(Debug, Clone)]
pub struct TranslateRequest {
    /// Target language code (required by the service)
    pub to: String,
    /// Source language code; omitted means service-side detection
    pub from: Option<String>,
    /// Content type of the submitted text
    pub text_type: TextType,
    /// Translation category
    pub category: String,
}

impl TranslateRequest {
    /// Request targeting `to`, with plain text and the default category
    pub fn to(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: None,
            text_type: TextType::Plain,
            category: "general".to_string(),
        }
    }

    /// Set the source language
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Set the content type
    pub fn with_text_type(mut self, text_type: TextType) -> Self {
        self.text_type = text_type;
        self
    }

    /// Set the translation category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Check required parameters before any network call
    pub(crate) fn validate(&self) -> Result<()> {
        if self.to.trim().is_empty() {
            return Err(TranslatorError::validation(
                "target language parameter is required",
            ));
        }
        Ok(())
    }

    /// Query parameters for the `translate` endpoint
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("to", self.to.clone()),
            ("category", self.category.clone()),
            ("textType", self.text_type.as_param().to_string()),
        ];
        if let Some(from) = &self.from {
            params.push(("from", from.clone()));
        }
        params
    }
}

/// A single translation within a response item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    /// Translated text
    pub text: String,
    /// Target language the service translated into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Word/phrase alignment metadata, present when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

/// Alignment projection between source and translated text.
///
/// `proj` is the service's colon-separated span format: each
/// `srcStart:srcEnd-dstStart:dstEnd` pair maps a source character range
/// onto a target character range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alignment {
    /// Raw projection string, surfaced verbatim
    pub proj: String,
}

/// Language detected by the service alongside a translation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedLanguage {
    /// Detected language code
    pub language: String,
    /// Detection confidence in `[0, 1]`
    #[serde(default)]
    pub score: f64,
}

/// Per-input response item from the `translate` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationItem {
    /// Source language detection, present when `from` was omitted
    #[serde(
        rename = "detectedLanguage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub detected_language: Option<DetectedLanguage>,
    /// One translation per requested target language
    pub translations: Vec<Translation>,
}

/// Per-input response item from the `detect` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Detected language code
    pub language: String,
    /// Detection confidence in `[0, 1]`
    #[serde(default)]
    pub score: f64,
    /// Whether the detected language is supported for translation
    #[serde(rename = "isTranslationSupported", default)]
    pub is_translation_supported: bool,
    /// Whether the detected language is supported for transliteration
    #[serde(rename = "isTransliterationSupported", default)]
    pub is_transliteration_supported: bool,
}

/// Per-input response item from the `breaksentence` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SentenceBoundaries {
    /// Consecutive sentence lengths in characters, in input order
    #[serde(rename = "sentLen")]
    pub sent_len: Vec<usize>,
    /// Source language detection, present when `language` was omitted
    #[serde(rename = "detectedLanguage", default)]
    pub detected_language: Option<DetectedLanguage>,
}

/// Catalog entry from the `languages` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageInfo {
    /// Display name, localized per the `Accept-Language` request header
    pub name: String,
    /// Name of the language in the language itself
    #[serde(rename = "nativeName")]
    pub native_name: String,
    /// Script direction, `ltr` or `rtl`
    pub dir: String,
}

/// Response from the `languages` endpoint for `scope=translation`
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageCatalog {
    /// Supported languages keyed by code
    pub translation: BTreeMap<String, LanguageInfo>,
}

/// Error body returned by the token issuance endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct IssuanceError {
    /// Service-reported reason
    pub message: String,
}
