// Batched translation with per-item failure tolerance
//
// Items are translated one at a time, strictly in order. A failing item is
// logged and falls back to its source text; it never aborts the batch or
// shifts positions. Output length and order always match the input, which
// is the contract callers rely on to zip translations back with detection
// metadata.

use crate::capabilities::Translator;
use crate::core::config::TranslationConfig;
use crate::core::errors::{TranslationError, TranslationResult};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct TranslationBatcher {
    translator: Arc<dyn Translator>,
    /// Session-fixed language pair, recorded on batch spans.
    source_lang: String,
    target_lang: String,
}

impl TranslationBatcher {
    pub fn new(translator: Arc<dyn Translator>, languages: &TranslationConfig) -> Self {
        Self {
            translator,
            source_lang: languages.source_lang.clone(),
            target_lang: languages.target_lang.clone(),
        }
    }

    /// Translate all texts in order. No retries, no backoff; one synchronous
    /// attempt per item, so batch latency is linear in item count.
    #[instrument(
        skip(self, texts),
        fields(items = texts.len(), source = %self.source_lang, target = %self.target_lang)
    )]
    pub fn translate_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        let translations: Vec<String> = texts
            .iter()
            .map(|text| self.translate_or_fallback(text.as_ref()))
            .collect();
        debug!("Translated batch of {} items", translations.len());
        translations
    }

    /// Single translation attempt with fallback to the source text.
    pub fn translate_or_fallback(&self, text: &str) -> String {
        match self.attempt(text) {
            Ok(translated) => translated,
            Err(e) => {
                warn!("{:#}; keeping original", e);
                text.to_string()
            }
        }
    }

    fn attempt(&self, text: &str) -> TranslationResult<String> {
        let translated = self
            .translator
            .translate(text)
            .map_err(|source| TranslationError::BackendFailed {
                chars: text.len(),
                source,
            })?;
        // An empty result would render an invisible overlay; treat it the
        // same as a backend failure.
        if translated.trim().is_empty() {
            return Err(TranslationError::EmptyResult);
        }
        Ok(translated)
    }
}
