//! Quoted identifier tokens → `{sigil}{name}`

use regex::Captures;
use trellis_core::patterns::{BARE_TOKEN, PREFIXED_TOKEN};
use trellis_core::{CatalogEntry, ObjectCatalog, PolicyTable};

pub struct IdentifierResolver<'a> {
    catalog: &'a ObjectCatalog,
    policies: &'a PolicyTable,
}

impl<'a> IdentifierResolver<'a> {
    pub fn new(catalog: &'a ObjectCatalog, policies: &'a PolicyTable) -> Self {
        IdentifierResolver { catalog, policies }
    }

    /// Rewrite `#"_a-…"` tokens (exact, canonical, base) then `#"uuid"` tokens (exact).
    pub fn resolve_text(&self, text: &str) -> String {
        let text = PREFIXED_TOKEN.replace_all(text, |caps: &Captures| {
            self.catalog
                .resolve_identifier(&caps[1])
                .map(|entry| self.render(entry))
                .unwrap_or_else(|| caps[0].to_string())
        });
        BARE_TOKEN
            .replace_all(&text, |caps: &Captures| {
                self.catalog
                    .get(&caps[1])
                    .map(|entry| self.render(entry))
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// A raw reference attribute becomes the plain name of its target.
    pub fn resolve_reference_value(&self, value: &str) -> String {
        self.catalog
            .get(value)
            .map(|entry| entry.name.clone())
            .unwrap_or_else(|| value.to_string())
    }

    fn render(&self, entry: &CatalogEntry) -> String {
        format!("{}{}", self.policies.sigil(&entry.object_type), entry.name)
    }
}
