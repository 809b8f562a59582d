//! Translation strings and property-file labels

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::identifiers::base_id;
use crate::model::{AppObject, ObjectType};

/// (locale, text) pairs in declaration order.
pub type Translations = Vec<(String, String)>;

/// Translation-string id → per-locale text. Keys are lowercased full ids and base forms.
#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: HashMap<String, Translations>,
}

impl TranslationCache {
    pub fn build(objects: &[AppObject]) -> Self {
        let mut cache = TranslationCache::default();
        let mut seen: HashSet<String> = HashSet::new();
        for object in objects
            .iter()
            .filter(|o| o.object_type == ObjectType::TranslationString)
        {
            let translations = collect_translations(object);
            if translations.is_empty() {
                continue;
            }
            let key = object.id.to_lowercase();
            if !seen.insert(key.clone()) {
                warn!("Duplicate translation string id {} ({}); keeping the first", object.id, object.name);
                continue;
            }
            if let Some(base) = base_id(&key) {
                if base != key {
                    cache
                        .entries
                        .entry(base.to_string())
                        .or_insert_with(|| translations.clone());
                }
            }
            // A full id outranks another object's base alias.
            cache.entries.insert(key, translations);
        }
        debug!("Translation cache built: {} keys", cache.entries.len());
        cache
    }

    pub fn get(&self, id: &str) -> Option<&[(String, String)]> {
        self.entries.get(&id.to_lowercase()).map(Vec::as_slice)
    }

    /// Best text for `locale`, see [`select_translation`].
    pub fn select(&self, id: &str, locale: &str) -> Option<&str> {
        self.get(id).and_then(|t| select_translation(t, locale))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn collect_translations(object: &AppObject) -> Translations {
    let mut translations: Translations = Vec::new();
    for item in object.attr_list("translations") {
        let locale = item.get("locale").and_then(|v| v.as_str()).unwrap_or_default();
        let value = item.get("value").and_then(|v| v.as_str()).unwrap_or_default();
        if locale.is_empty() || value.is_empty() {
            continue;
        }
        // A repeated locale replaces the text but keeps its original position.
        match translations.iter_mut().find(|(l, _)| l == locale) {
            Some(slot) => slot.1 = value.to_string(),
            None => translations.push((locale.to_string(), value.to_string())),
        }
    }
    translations
}

/// Exact locale, then the first entry sharing the language prefix, then the first entry.
pub fn select_translation<'a>(translations: &'a [(String, String)], locale: &str) -> Option<&'a str> {
    if let Some((_, text)) = translations
        .iter()
        .find(|(l, _)| l.eq_ignore_ascii_case(locale))
    {
        return Some(text.as_str());
    }
    let language = language_of(locale);
    translations
        .iter()
        .find(|(l, _)| language_of(l).eq_ignore_ascii_case(language))
        .or_else(|| translations.first())
        .map(|(_, text)| text.as_str())
}

fn language_of(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

/// Flat key → label table from `.properties` content. The first definition of a key wins.
#[derive(Debug, Default, Clone)]
pub struct LabelTable {
    labels: HashMap<String, String>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.labels.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Merge `key=value` lines; blank lines and `#` comments are skipped.
    pub fn parse_properties(&mut self, content: &str) {
        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                self.insert(key.trim(), value.trim());
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LabelTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = LabelTable::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}
