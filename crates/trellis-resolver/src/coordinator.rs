//! Runs the four resolvers in fixed order over every configured field

use std::ops::Add;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};
use trellis_core::{AppObject, EngineConfig, Lookups, PolicyTable};

use crate::identifier::IdentifierResolver;
use crate::label::LabelResolver;
use crate::record_urn::RecordUrnResolver;
use crate::translation::TranslationResolver;

/// Counters from one resolution run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub objects: usize,
    /// Text fields whose content changed.
    pub text_fields_rewritten: usize,
    /// Raw reference attributes replaced by a name.
    pub reference_fields_named: usize,
}

impl Add for ResolutionStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        ResolutionStats {
            objects: self.objects + other.objects,
            text_fields_rewritten: self.text_fields_rewritten + other.text_fields_rewritten,
            reference_fields_named: self.reference_fields_named + other.reference_fields_named,
        }
    }
}

/// Identifier → record URN → translation → label, over shared read-only caches.
pub struct ReferenceResolver<'a> {
    policies: &'a PolicyTable,
    identifiers: IdentifierResolver<'a>,
    record_urns: RecordUrnResolver<'a>,
    translations: TranslationResolver<'a>,
    labels: LabelResolver<'a>,
    resolve_reference_fields: bool,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(lookups: &'a Lookups, policies: &'a PolicyTable, config: &EngineConfig) -> Self {
        ReferenceResolver {
            policies,
            identifiers: IdentifierResolver::new(&lookups.catalog, policies),
            record_urns: RecordUrnResolver::new(&lookups.schema),
            translations: TranslationResolver::new(&lookups.translations, config.translation_max_len),
            labels: LabelResolver::new(&lookups.labels),
            resolve_reference_fields: config.resolve_reference_fields,
        }
    }

    /// Resolve every recognized reference in one text blob.
    pub fn resolve_text(&self, text: &str, locale: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let text = self.identifiers.resolve_text(text);
        let text = self.record_urns.resolve_text(&text);
        let text = self.translations.resolve_text(&text, locale);
        self.labels.resolve_text(&text)
    }

    /// Rewrite the configured text and reference fields of one object in place.
    pub fn resolve_object(&self, object: &mut AppObject, locale: &str) -> ResolutionStats {
        let policy = self.policies.policy(&object.object_type);
        let mut stats = ResolutionStats {
            objects: 1,
            ..Default::default()
        };

        let mut resolve = |text: &str| self.resolve_text(text, locale);
        for path in &policy.code_fields {
            stats.text_fields_rewritten += path.apply(&mut object.attributes, &mut resolve);
        }

        if self.resolve_reference_fields {
            let mut name = |value: &str| self.identifiers.resolve_reference_value(value);
            for path in &policy.reference_fields {
                stats.reference_fields_named += path.apply(&mut object.attributes, &mut name);
            }
        }

        if stats.text_fields_rewritten + stats.reference_fields_named > 0 {
            debug!(
                "Resolved {} ({}): {} text fields, {} reference fields",
                object.name,
                object.object_type,
                stats.text_fields_rewritten,
                stats.reference_fields_named
            );
        }
        stats
    }

    /// Resolve all objects in parallel. Each object only touches its own fields.
    pub fn resolve_all(&self, objects: &mut [AppObject], locale: &str) -> ResolutionStats {
        let stats = objects
            .par_iter_mut()
            .map(|object| self.resolve_object(object, locale))
            .reduce(ResolutionStats::default, |a, b| a + b);
        info!(
            "Resolved references in {} objects ({} text fields, {} reference fields)",
            stats.objects, stats.text_fields_rewritten, stats.reference_fields_named
        );
        stats
    }
}
