use locsync_core::FlatEntry;
use locsync_provider_api::{Reply, Translator};
use std::collections::HashMap;

/// Translations for one target file while it is being reconciled, keyed by
/// dotted path.
pub type WorkingMap = HashMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub batches: usize,
    pub failed_batches: usize,
    /// Keys that received a provider translation.
    pub translated: usize,
    /// Keys that fell back to their source text.
    pub fallbacks: usize,
}

/// Translate `pending` into `target_lang` in order, `max_batch_size` entries
/// per request, and store the results in `map`.
///
/// A failed batch is retried key by key. Any key the provider does not
/// translate keeps its source text, so every pending key ends up in `map`.
pub fn translate_missing(
    translator: &dyn Translator,
    pending: &[FlatEntry],
    target_lang: &str,
    max_batch_size: usize,
    map: &mut WorkingMap,
) -> BatchStats {
    let mut stats = BatchStats::default();
    if pending.is_empty() {
        return stats;
    }

    let size = max_batch_size.max(1);
    let total = pending.len().div_ceil(size);
    tracing::info!(
        event = "batch_plan",
        lang = target_lang,
        keys = pending.len(),
        batches = total,
        "translating {} keys in {} batches",
        pending.len(),
        total
    );

    for (idx, batch) in pending.chunks(size).enumerate() {
        let batch_no = idx + 1;
        stats.batches += 1;
        tracing::info!(
            event = "batch_start",
            lang = target_lang,
            batch = batch_no,
            total,
            keys = batch.len(),
            "batch {}/{} with {} keys",
            batch_no,
            total,
            batch.len()
        );

        match translator.translate_batch(batch, target_lang) {
            Ok(mut reply) => {
                for entry in batch {
                    match reply.remove(&entry.key) {
                        Some(text) => {
                            map.insert(entry.key.clone(), text);
                            stats.translated += 1;
                        }
                        None => {
                            tracing::warn!(
                                event = "batch_key_missing",
                                lang = target_lang,
                                key = %entry.key,
                                "missing translation for {}, using source text",
                                entry.key
                            );
                            map.insert(entry.key.clone(), entry.value.clone());
                            stats.fallbacks += 1;
                        }
                    }
                }
            }
            Err(err) => {
                stats.failed_batches += 1;
                tracing::error!(
                    event = "batch_failed",
                    lang = target_lang,
                    batch = batch_no,
                    error = %err,
                    "batch {} failed, translating keys one by one",
                    batch_no
                );
                for entry in batch {
                    if translate_single(translator, entry, target_lang, map) {
                        stats.translated += 1;
                    } else {
                        stats.fallbacks += 1;
                    }
                }
            }
        }
    }

    stats
}

/// Returns false when the source text had to be used.
fn translate_single(
    translator: &dyn Translator,
    entry: &FlatEntry,
    target_lang: &str,
    map: &mut WorkingMap,
) -> bool {
    tracing::debug!(event = "single_start", lang = target_lang, key = %entry.key);
    let (value, translated) = match translator.translate_one(&entry.value, target_lang) {
        Ok(Reply::Text(text)) => (clean_single(&text).to_string(), true),
        Ok(Reply::Other { kind }) => {
            tracing::warn!(
                event = "single_non_text",
                lang = target_lang,
                key = %entry.key,
                kind = %kind,
                "no text reply for {}, using source text",
                entry.key
            );
            (entry.value.clone(), false)
        }
        Err(err) => {
            tracing::error!(
                event = "single_failed",
                lang = target_lang,
                key = %entry.key,
                error = %err,
                "failed to translate {}",
                entry.key
            );
            (entry.value.clone(), false)
        }
    };
    map.insert(entry.key.clone(), value);
    translated
}

/// Trim and drop one pair of surrounding quotes.
fn clean_single(text: &str) -> &str {
    let t = text.trim();
    let t = t.strip_prefix('"').unwrap_or(t);
    t.strip_suffix('"').unwrap_or(t)
}
