//! Translation-string URNs → quoted, length-capped text

use regex::Captures;
use trellis_core::TranslationCache;
use trellis_core::patterns::TRANSLATION_URN;

pub struct TranslationResolver<'a> {
    cache: &'a TranslationCache,
    max_len: usize,
}

impl<'a> TranslationResolver<'a> {
    pub fn new(cache: &'a TranslationCache, max_len: usize) -> Self {
        TranslationResolver { cache, max_len }
    }

    pub fn resolve_text(&self, text: &str, locale: &str) -> String {
        if self.cache.is_empty() {
            return text.to_string();
        }
        TRANSLATION_URN
            .replace_all(text, |caps: &Captures| {
                self.cache
                    .select(&caps[1], locale)
                    .map(|t| render_translation(t, self.max_len))
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Escape quotes, cap at `max_len` characters with a `...` marker, and quote.
pub fn render_translation(text: &str, max_len: usize) -> String {
    let escaped = text.replace('"', "\\\"");
    match escaped.char_indices().nth(max_len) {
        Some((cut, _)) => format!("\"{}...\"", &escaped[..cut]),
        None => format!("\"{escaped}\""),
    }
}
