//! In-memory translator for unit tests.

use locsync_core::FlatEntry;
use locsync_provider_api::{ProviderError, Reply, Translator};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Batch(Vec<String>),
    One(String),
}

/// Translates `text` into `[lang] text`. Failures are configured per key
/// (batch replies) or per source text (single calls).
#[derive(Default)]
pub(crate) struct FakeTranslator {
    pub fail_batches: bool,
    pub omit_keys: HashSet<String>,
    pub fail_texts: HashSet<String>,
    pub non_text: HashSet<String>,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeTranslator {
    pub fn failing_batches() -> Self {
        Self {
            fail_batches: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

pub(crate) fn fake(text: &str, lang: &str) -> String {
    format!("[{lang}] {text}")
}

impl Translator for FakeTranslator {
    fn name(&self) -> &str {
        "fake"
    }

    fn translate_batch(
        &self,
        batch: &[FlatEntry],
        target_lang: &str,
    ) -> Result<BTreeMap<String, String>, ProviderError> {
        self.calls
            .borrow_mut()
            .push(Call::Batch(batch.iter().map(|e| e.key.clone()).collect()));
        if self.fail_batches {
            return Err(ProviderError::Status {
                status: 529,
                body: "overloaded".into(),
            });
        }
        Ok(batch
            .iter()
            .filter(|e| !self.omit_keys.contains(&e.key))
            .map(|e| (e.key.clone(), fake(&e.value, target_lang)))
            .collect())
    }

    fn translate_one(&self, text: &str, target_lang: &str) -> Result<Reply, ProviderError> {
        self.calls.borrow_mut().push(Call::One(text.to_string()));
        if self.fail_texts.contains(text) {
            return Err(ProviderError::Transport("connection reset".into()));
        }
        if self.non_text.contains(text) {
            return Ok(Reply::Other {
                kind: "tool_use".into(),
            });
        }
        // Providers like to quote single answers; callers strip that.
        Ok(Reply::Text(format!("  \"{}\"\n", fake(text, target_lang))))
    }
}
