//! Async client for the Translator v3 REST API

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::core::auth::TokenManager;
use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslatorError};
use crate::core::models::{
    Detection, LanguageCatalog, SentenceBoundaries, TextItem, TranslateRequest, TranslationItem,
};

/// Maximum input length accepted by `breaksentence`, in characters
const MAX_BREAK_SENTENCES_CHARS: usize = 10000;

/// Exception discriminators the service prepends to bare-string error bodies
const ARGUMENT_OUT_OF_RANGE_PREFIX: &str = "ArgumentOutOfRangeException";
const TRANSLATE_API_PREFIX: &str = "TranslateApiException";

/// Async translator client.
///
/// Owns one pooled HTTP client and one token manager; cloning shares
/// both, so clones reuse the cached bearer token. Every operation
/// obtains a token (refreshing lazily when needed) and issues exactly
/// one API call.
#[derive(Debug, Clone)]
pub struct Translator {
    client: reqwest::Client,
    config: Arc<TranslatorConfig>,
    auth: TokenManager,
}

impl Translator {
    /// Create a new translator client
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()?;

        let auth = TokenManager::new(
            config.subscription_key.clone(),
            config.auth_endpoint.clone(),
            client.clone(),
        );

        Ok(Self {
            client,
            config: Arc::new(config),
            auth,
        })
    }

    /// Create a client with production endpoints for the given key
    pub fn with_key(subscription_key: impl Into<String>) -> Result<Self> {
        Self::new(TranslatorConfig::new(subscription_key))
    }

    /// Translate a single text, returning just the translated string.
    ///
    /// Unwraps the first translation of the first response item; use
    /// [`Translator::translate_batch`] to keep the full response objects.
    pub async fn translate(&self, text: &str, request: &TranslateRequest) -> Result<String> {
        let items = self.run_translate(&[text], request, false).await?;
        items
            .into_iter()
            .next()
            .and_then(|item| item.translations.into_iter().next())
            .map(|t| t.text)
            .ok_or_else(|| TranslatorError::decode("response carried no translations"))
    }

    /// Translate a batch of texts, preserving input order.
    ///
    /// Returns the full per-item translation objects, including detected
    /// source languages when `from` was not given.
    pub async fn translate_batch(
        &self,
        texts: &[&str],
        request: &TranslateRequest,
    ) -> Result<Vec<TranslationItem>> {
        self.run_translate(texts, request, false).await
    }

    /// Translate a batch of texts and request word/phrase alignment.
    ///
    /// Alignment spans come back on each translation as the service's
    /// raw `start:end-start:end` projection string.
    pub async fn translate_batch_with_alignment(
        &self,
        texts: &[&str],
        request: &TranslateRequest,
    ) -> Result<Vec<TranslationItem>> {
        self.run_translate(texts, request, true).await
    }

    async fn run_translate(
        &self,
        texts: &[&str],
        request: &TranslateRequest,
        include_alignment: bool,
    ) -> Result<Vec<TranslationItem>> {
        request.validate()?;

        let mut params = request.query();
        if include_alignment {
            params.push(("includeAlignment", "true".to_string()));
        }

        let payload = self
            .post("translate", &params, &TextItem::batch(texts))
            .await?;
        decode(&payload)
    }

    /// Detect the language of a single text
    pub async fn detect_language(&self, text: &str) -> Result<String> {
        self.detect_languages(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TranslatorError::decode("response carried no detections"))
    }

    /// Detect the language of each text, preserving input order
    pub async fn detect_languages(&self, texts: &[&str]) -> Result<Vec<String>> {
        let payload = self.post("detect", &[], &TextItem::batch(texts)).await?;
        let detections: Vec<Detection> = decode(&payload)?;
        Ok(detections.into_iter().map(|d| d.language).collect())
    }

    /// Split a text into sentences.
    ///
    /// The service reports per-sentence lengths; the substrings are
    /// sliced locally from the original input. Lengths are character
    /// counts, so multi-byte input splits correctly.
    pub async fn break_sentences(&self, text: &str, language: &str) -> Result<Vec<String>> {
        if text.chars().count() > MAX_BREAK_SENTENCES_CHARS {
            return Err(TranslatorError::validation(
                "the text maximum length is 10000 characters",
            ));
        }

        let params = [("language", language.to_string())];
        let payload = self
            .post("breaksentence", &params, &[TextItem::new(text)])
            .await?;
        let boundaries: Vec<SentenceBoundaries> = decode(&payload)?;
        let lengths = boundaries
            .into_iter()
            .next()
            .map(|b| b.sent_len)
            .ok_or_else(|| TranslatorError::decode("response carried no sentence boundaries"))?;

        Ok(split_by_char_lengths(text, &lengths))
    }

    /// List the language codes supported for translation
    pub async fn list_languages(&self) -> Result<Vec<String>> {
        let catalog = self.language_catalog(None).await?;
        Ok(catalog.translation.into_keys().collect())
    }

    /// Localized display names for the given codes, in request order.
    ///
    /// Codes absent from the service catalog are skipped.
    pub async fn language_display_names(
        &self,
        codes: &[&str],
        locale: &str,
    ) -> Result<Vec<String>> {
        let catalog = self.language_catalog(Some(locale)).await?;
        Ok(codes
            .iter()
            .filter_map(|code| catalog.translation.get(*code).map(|info| info.name.clone()))
            .collect())
    }

    async fn language_catalog(&self, locale: Option<&str>) -> Result<LanguageCatalog> {
        let params = [("scope", "translation".to_string())];
        let payload = self.get("languages", &params, locale).await?;
        decode(&payload)
    }

    /// POST a JSON array body to an API action and return the raw response text
    async fn post(
        &self,
        action: &str,
        params: &[(&str, String)],
        body: &[TextItem],
    ) -> Result<String> {
        let token = self.auth.token().await?;
        let url = self.config.action_url(action);
        debug!(%url, items = body.len(), "dispatching translator request");

        let response = self
            .client
            .post(&url)
            .query(&[("api-version", self.config.api_version.as_str())])
            .query(params)
            .bearer_auth(&token)
            .json(body)
            .send()
            .await?;

        Ok(response.text().await?)
    }

    /// GET an API action and return the raw response text
    async fn get(
        &self,
        action: &str,
        params: &[(&str, String)],
        accept_language: Option<&str>,
    ) -> Result<String> {
        let token = self.auth.token().await?;
        let url = self.config.action_url(action);
        debug!(%url, "dispatching translator request");

        let mut request = self
            .client
            .get(&url)
            .query(&[("api-version", self.config.api_version.as_str())])
            .query(params)
            .bearer_auth(&token);
        if let Some(locale) = accept_language {
            request = request.header("Accept-Language", locale);
        }

        let response = request.send().await?;
        Ok(response.text().await?)
    }
}

/// Slice `text` into consecutive pieces of `lengths` characters each.
///
/// Offsets are character counts, never byte counts. A length running
/// past the end of the input yields the remaining characters.
fn split_by_char_lengths(text: &str, lengths: &[usize]) -> Vec<String> {
    let mut chars = text.chars();
    lengths
        .iter()
        .map(|&len| chars.by_ref().take(len).collect())
        .collect()
}

/// Decode a response body, discriminating success payloads from
/// service-declared error shapes.
///
/// The structured success decode is attempted first; on mismatch each
/// known error shape is tried in order, and anything unrecognized
/// surfaces as a decode error rather than a silent misparse.
fn decode<T: DeserializeOwned>(payload: &str) -> Result<T> {
    if let Ok(decoded) = serde_json::from_str::<T>(payload) {
        return Ok(decoded);
    }
    let value: Value = serde_json::from_str(payload)?;
    Err(service_error(&value))
}

/// Map a non-success JSON payload onto the error taxonomy
fn service_error(value: &Value) -> TranslatorError {
    if let Some(text) = value.as_str() {
        if let Some(rest) = text.strip_prefix(ARGUMENT_OUT_OF_RANGE_PREFIX) {
            return TranslatorError::ArgumentOutOfRange {
                message: rest.strip_prefix(": ").unwrap_or(rest).to_string(),
            };
        }
        if let Some(rest) = text.strip_prefix(TRANSLATE_API_PREFIX) {
            return TranslatorError::TranslateApi {
                message: rest.strip_prefix(": ").unwrap_or(rest).to_string(),
            };
        }
    }

    if let Some(message) = value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return TranslatorError::Api {
            message: message.to_string(),
        };
    }

    TranslatorError::decode(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    async fn mock_auth(server: &MockServer) -> httpmock::Mock<'_> {
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/issueToken")
                    .header("Ocp-Apim-Subscription-Key", "test-subscription-key");
                then.status(200).body("test-token");
            })
            .await
    }

    fn translator(server: &MockServer) -> Translator {
        let config = TranslatorConfig::new("test-subscription-key")
            .with_auth_endpoint(server.url("/issueToken"))
            .with_api_endpoint(server.url("/"));
        Translator::new(config).unwrap()
    }

    #[test]
    fn split_by_char_lengths_walks_offsets() {
        let pieces = split_by_char_lengths("Hello. How are you?", &[7, 13]);
        assert_eq!(pieces, vec!["Hello. ", "How are you?"]);
        assert_eq!(pieces.concat(), "Hello. How are you?");
    }

    #[test]
    fn split_by_char_lengths_counts_characters_not_bytes() {
        let text = "Привет. Как дела?";
        let pieces = split_by_char_lengths(text, &[8, 9]);
        assert_eq!(pieces, vec!["Привет. ", "Как дела?"]);
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn split_by_char_lengths_clamps_overrun() {
        assert_eq!(split_by_char_lengths("abc", &[2, 5]), vec!["ab", "c"]);
    }

    #[test]
    fn service_error_discrimination_order() {
        assert!(matches!(
            service_error(&json!("ArgumentOutOfRangeException: bad lang")),
            TranslatorError::ArgumentOutOfRange { message } if message == "bad lang"
        ));
        assert!(matches!(
            service_error(&json!("TranslateApiException: boom")),
            TranslatorError::TranslateApi { message } if message == "boom"
        ));
        assert!(matches!(
            service_error(&json!({"error": {"code": 400036, "message": "The target language is not valid"}})),
            TranslatorError::Api { message } if message == "The target language is not valid"
        ));
        assert!(matches!(
            service_error(&json!({"unexpected": true})),
            TranslatorError::Decode { .. }
        ));
    }

    #[tokio::test]
    async fn translate_unwraps_first_translation() {
        let server = MockServer::start_async().await;
        mock_auth(&server).await;
        let translate = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/translate")
                    .query_param("api-version", "3.0")
                    .query_param("to", "es")
                    .query_param("from", "en")
                    .query_param("category", "general")
                    .query_param("textType", "plain")
                    .header("authorization", "Bearer test-token")
                    .json_body(json!([{"Text": "world"}]));
                then.status(200)
                    .json_body(json!([{"translations": [{"text": "Mundo"}]}]));
            })
            .await;

        let client = translator(&server);
        let request = TranslateRequest::to("es").with_from("en");
        assert_eq!(client.translate("world", &request).await.unwrap(), "Mundo");
        translate.assert_async().await;
    }

    #[tokio::test]
    async fn translate_requires_target_language() {
        let server = MockServer::start_async().await;
        let auth = mock_auth(&server).await;

        let client = translator(&server);
        let request = TranslateRequest::to("");
        let err = client.translate("world", &request).await.unwrap_err();
        assert!(matches!(err, TranslatorError::Validation { .. }));

        // fail fast: no token fetch, no API call
        assert_eq!(auth.hits_async().await, 0);
    }

    #[tokio::test]
    async fn translate_batch_preserves_order() {
        let server = MockServer::start_async().await;
        mock_auth(&server).await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/translate")
                    .json_body(json!([{"Text": "hello"}, {"Text": "world"}]));
                then.status(200).json_body(json!([
                    {"detectedLanguage": {"language": "en", "score": 1.0},
                     "translations": [{"text": "Hola", "to": "es"}]},
                    {"detectedLanguage": {"language": "en", "score": 1.0},
                     "translations": [{"text": "Mundo", "to": "es"}]}
                ]));
            })
            .await;

        let client = translator(&server);
        let items = client
            .translate_batch(&["hello", "world"], &TranslateRequest::to("es"))
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].translations[0].text, "Hola");
        assert_eq!(items[1].translations[0].text, "Mundo");
        assert_eq!(
            items[0].detected_language.as_ref().unwrap().language,
            "en"
        );
    }

    #[tokio::test]
    async fn translate_batch_with_alignment_surfaces_projection() {
        let server = MockServer::start_async().await;
        mock_auth(&server).await;
        let translate = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/translate")
                    .query_param("includeAlignment", "true");
                then.status(200).json_body(json!([
                    {"translations": [
                        {"text": "Mundo", "to": "es",
                         "alignment": {"proj": "0:4-0:4"}}
                    ]}
                ]));
            })
            .await;

        let client = translator(&server);
        let items = client
            .translate_batch_with_alignment(&["world"], &TranslateRequest::to("es"))
            .await
            .unwrap();

        let alignment = items[0].translations[0].alignment.as_ref().unwrap();
        assert_eq!(alignment.proj, "0:4-0:4");
        translate.assert_async().await;
    }

    #[tokio::test]
    async fn translate_maps_prefixed_string_errors() {
        let server = MockServer::start_async().await;
        mock_auth(&server).await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/translate");
                then.status(400)
                    .json_body(json!("ArgumentOutOfRangeException: bad lang"));
            })
            .await;

        let client = translator(&server);
        let err = client
            .translate("world", &TranslateRequest::to("asdf"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, TranslatorError::ArgumentOutOfRange { ref message } if message == "bad lang"),
            "got {:?}",
            err
        );
    }

    #[tokio::test]
    async fn translate_maps_structured_error_objects() {
        let server = MockServer::start_async().await;
        mock_auth(&server).await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/translate");
                then.status(403).json_body(json!({
                    "error": {"code": 401000, "message": "The request is not authorized"}
                }));
            })
            .await;

        let client = translator(&server);
        let err = client
            .translate("world", &TranslateRequest::to("es"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, TranslatorError::Api { ref message } if message == "The request is not authorized")
        );
    }

    #[tokio::test]
    async fn detect_languages_preserve_order() {
        let server = MockServer::start_async().await;
        mock_auth(&server).await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/detect")
                    .json_body(json!([{"Text": "Hello"}, {"Text": "Привет"}]));
                then.status(200)
                    .json_body(json!([{"language": "en"}, {"language": "ru"}]));
            })
            .await;

        let client = translator(&server);
        let langs = client
            .detect_languages(&["Hello", "Привет"])
            .await
            .unwrap();
        assert_eq!(langs, vec!["en", "ru"]);
    }

    #[tokio::test]
    async fn detect_language_returns_single_code() {
        let server = MockServer::start_async().await;
        mock_auth(&server).await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/detect");
                then.status(200).json_body(json!([
                    {"language": "en", "score": 1.0,
                     "isTranslationSupported": true, "isTransliterationSupported": false}
                ]));
            })
            .await;

        let client = translator(&server);
        assert_eq!(client.detect_language("Hello").await.unwrap(), "en");
    }

    #[tokio::test]
    async fn break_sentences_reconstructs_original_text() {
        let server = MockServer::start_async().await;
        mock_auth(&server).await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/breaksentence")
                    .query_param("language", "en")
                    .json_body(json!([{"Text": "Hello. How are you?"}]));
                then.status(200).json_body(json!([{"sentLen": [7, 13]}]));
            })
            .await;

        let client = translator(&server);
        let sentences = client
            .break_sentences("Hello. How are you?", "en")
            .await
            .unwrap();
        assert_eq!(sentences, vec!["Hello. ", "How are you?"]);
        assert_eq!(sentences.concat(), "Hello. How are you?");
    }

    #[tokio::test]
    async fn break_sentences_rejects_oversized_text() {
        let server = MockServer::start_async().await;
        let auth = mock_auth(&server).await;

        let client = translator(&server);
        let text = "a".repeat(10001);
        let err = client.break_sentences(&text, "en").await.unwrap_err();
        assert!(matches!(err, TranslatorError::Validation { .. }));
        assert_eq!(auth.hits_async().await, 0);
    }

    #[tokio::test]
    async fn list_languages_returns_catalog_codes() {
        let server = MockServer::start_async().await;
        mock_auth(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/languages")
                    .query_param("api-version", "3.0")
                    .query_param("scope", "translation");
                then.status(200).json_body(json!({
                    "translation": {
                        "en": {"name": "English", "nativeName": "English", "dir": "ltr"},
                        "ru": {"name": "Russian", "nativeName": "Русский", "dir": "ltr"}
                    }
                }));
            })
            .await;

        let client = translator(&server);
        let langs = client.list_languages().await.unwrap();
        assert_eq!(langs, vec!["en", "ru"]);
    }

    #[tokio::test]
    async fn language_display_names_skip_unknown_codes() {
        let server = MockServer::start_async().await;
        mock_auth(&server).await;
        let languages = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/languages")
                    .header("accept-language", "en");
                then.status(200).json_body(json!({
                    "translation": {
                        "en": {"name": "English", "nativeName": "English", "dir": "ltr"},
                        "ru": {"name": "Russian", "nativeName": "Русский", "dir": "ltr"}
                    }
                }));
            })
            .await;

        let client = translator(&server);
        let names = client
            .language_display_names(&["ru", "en", "zz"], "en")
            .await
            .unwrap();
        assert_eq!(names, vec!["Russian", "English"]);
        languages.assert_async().await;
    }

    #[tokio::test]
    async fn operations_reuse_cached_token() {
        let server = MockServer::start_async().await;
        let auth = mock_auth(&server).await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/detect");
                then.status(200).json_body(json!([{"language": "en"}]));
            })
            .await;

        let client = translator(&server);
        client.detect_language("Hello").await.unwrap();
        client.detect_language("world").await.unwrap();

        assert_eq!(auth.hits_async().await, 1);
    }
}
