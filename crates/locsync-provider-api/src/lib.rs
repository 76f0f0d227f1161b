use std::collections::BTreeMap;

use locsync_core::FlatEntry;

/// What a provider handed back for a single text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The provider answered with text.
    Text(String),
    /// The provider answered with something that is not text (tool call,
    /// refusal block, ...). Callers fall back to the source text.
    Other { kind: String },
}

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response format: {0}")]
    Format(String),
}

/// Opaque, fallible text translation.
///
/// Implementations are called strictly one request at a time.
pub trait Translator {
    fn name(&self) -> &str;

    /// Translate a batch of `(key, source text)` entries into `target_lang`.
    /// The returned map may omit keys; callers decide what to do with them.
    fn translate_batch(
        &self,
        batch: &[FlatEntry],
        target_lang: &str,
    ) -> Result<BTreeMap<String, String>, ProviderError>;

    /// Translate a single source text into `target_lang`.
    fn translate_one(&self, text: &str, target_lang: &str) -> Result<Reply, ProviderError>;
}
