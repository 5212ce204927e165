//! Requests handed to external translation providers.
//!
//! The core only builds requests and applies results; network calls,
//! retries and quotas belong to the provider.

use serde::Serialize;
use thiserror::Error;

use super::data::{LanguageInfo, ResourceFile};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("source text must not be empty")]
    EmptySourceText,
    #[error("target language code must not be empty")]
    EmptyTargetLanguage,
}

/// One string to translate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    source_text: String,
    source_language_code: Option<String>,
    source_language_name: Option<String>,
    target_language_code: String,
    target_language_name: String,
    /// Free text for the provider, usually the resource key.
    context: Option<String>,
}

impl TranslationRequest {
    /// Start a request; the required fields are the builder's arguments.
    pub fn builder(
        source_text: impl Into<String>,
        target_language_code: impl Into<String>,
        target_language_name: impl Into<String>,
    ) -> TranslationRequestBuilder {
        TranslationRequestBuilder {
            request: TranslationRequest {
                source_text: source_text.into(),
                source_language_code: None,
                source_language_name: None,
                target_language_code: target_language_code.into(),
                target_language_name: target_language_name.into(),
                context: None,
            },
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn source_language_code(&self) -> Option<&str> {
        self.source_language_code.as_deref()
    }

    pub fn source_language_name(&self) -> Option<&str> {
        self.source_language_name.as_deref()
    }

    pub fn target_language_code(&self) -> &str {
        &self.target_language_code
    }

    pub fn target_language_name(&self) -> &str {
        &self.target_language_name
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct TranslationRequestBuilder {
    request: TranslationRequest,
}

impl TranslationRequestBuilder {
    pub fn source_language(mut self, code: impl Into<String>, name: Option<String>) -> Self {
        self.request.source_language_code = Some(code.into());
        self.request.source_language_name = name;
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.request.context = Some(context.into());
        self
    }

    pub fn build(self) -> Result<TranslationRequest, RequestError> {
        if self.request.source_text.is_empty() {
            return Err(RequestError::EmptySourceText);
        }
        if self.request.target_language_code.trim().is_empty() {
            return Err(RequestError::EmptyTargetLanguage);
        }
        Ok(self.request)
    }
}

/// External machine translation service.
pub trait TranslationProvider {
    type Error: std::error::Error;

    fn name(&self) -> &str;

    fn translate(&self, request: &TranslationRequest) -> Result<String, Self::Error>;
}

fn language_name(language: &LanguageInfo) -> String {
    language
        .display_name()
        .map(str::to_string)
        .unwrap_or_else(|| language.culture().to_string())
}

/// Requests for every key translated in `source` but empty or absent in
/// `target`, in source order. The key is passed as context.
pub fn translation_requests(
    source: &ResourceFile,
    target: &ResourceFile,
) -> Result<Vec<TranslationRequest>, RequestError> {
    let source_language = source.language();
    let target_language = target.language();

    source
        .entries()
        .iter()
        .filter(|entry| !entry.is_empty())
        .filter(|entry| target.get(&entry.key).is_none_or(|t| t.is_empty()))
        .map(|entry| {
            let mut builder = TranslationRequest::builder(
                entry.value.clone(),
                target_language.culture(),
                language_name(target_language),
            )
            .context(entry.key.clone());
            if !source_language.is_invariant() {
                builder = builder.source_language(
                    source_language.culture(),
                    source_language.display_name().map(str::to_string),
                );
            }
            builder.build()
        })
        .collect()
}

/// Outcome of [`fill_translations`].
#[derive(Debug, Default)]
pub struct FillSummary {
    pub translated: Vec<String>,
    /// `(key, provider error)`.
    pub failed: Vec<(String, String)>,
}

/// Translate the gaps of `target` through `provider`, one request per key.
///
/// A failing key is recorded and the remaining keys are still attempted.
pub fn fill_translations<P: TranslationProvider>(
    provider: &P,
    source: &ResourceFile,
    target: &mut ResourceFile,
) -> Result<FillSummary, RequestError> {
    let mut summary = FillSummary::default();
    for request in translation_requests(source, target)? {
        let key = request.context().unwrap_or_default().to_string();
        match provider.translate(&request) {
            Ok(text) => match target.set_value(&key, text) {
                Ok(_) => summary.translated.push(key),
                Err(e) => summary.failed.push((key, e.to_string())),
            },
            Err(e) => summary.failed.push((key, e.to_string())),
        }
    }
    Ok(summary)
}
