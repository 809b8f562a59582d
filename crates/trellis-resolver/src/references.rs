//! Reference scanning over (resolved or raw) text blobs.
//!
//! Three families are recognized, in this order:
//! 1. named references: `rule!Name(`, `cons!Name`, `type!Name`, `recordType!Name`
//! 2. record URNs: `urn:appian:record-…:v1:<uuid>`
//! 3. identifiers: prefixed `_a-…` ids, then standalone UUIDs

use regex::Regex;
use trellis_core::identifiers::standalone_uuids;
use trellis_core::patterns::{
    CONSTANT_REF, PREFIXED_REFERENCE, RECORD_TYPE_REF, RULE_REF, TYPE_REF, URN_REFERENCE,
};
use trellis_core::{CatalogEntry, EdgeKind, ObjectCatalog, PolicyTable};

/// A reference that landed on a catalog object.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceHit<'a> {
    pub target: &'a CatalogEntry,
    pub kind: EdgeKind,
}

pub struct ReferenceScanner<'a> {
    catalog: &'a ObjectCatalog,
    policies: &'a PolicyTable,
}

impl<'a> ReferenceScanner<'a> {
    pub fn new(catalog: &'a ObjectCatalog, policies: &'a PolicyTable) -> Self {
        ReferenceScanner { catalog, policies }
    }

    /// All three families. Hits may repeat; callers deduplicate.
    pub fn references(&self, text: &str) -> Vec<ReferenceHit<'a>> {
        let mut hits = Vec::new();
        self.named(text, &mut hits);
        self.record_urns(text, &mut hits);
        self.identifiers(text, &mut hits);
        hits
    }

    /// Named references and identifiers only, used to seed bundle roots.
    pub fn root_references(&self, text: &str) -> Vec<ReferenceHit<'a>> {
        let mut hits = Vec::new();
        self.named(text, &mut hits);
        self.identifiers(text, &mut hits);
        hits
    }

    fn named(&self, text: &str, hits: &mut Vec<ReferenceHit<'a>>) {
        let families: [(&Regex, EdgeKind); 4] = [
            (&*RULE_REF, EdgeKind::Calls),
            (&*CONSTANT_REF, EdgeKind::UsesConstant),
            (&*TYPE_REF, EdgeKind::UsesCdt),
            (&*RECORD_TYPE_REF, EdgeKind::UsesRecordType),
        ];
        for (pattern, kind) in families {
            for caps in pattern.captures_iter(text) {
                if let Some(target) = self.catalog.find_by_name(&caps[1]) {
                    hits.push(ReferenceHit { target, kind });
                }
            }
        }
    }

    fn record_urns(&self, text: &str, hits: &mut Vec<ReferenceHit<'a>>) {
        for caps in URN_REFERENCE.captures_iter(text) {
            if let Some(target) = self.catalog.get(&caps[1]) {
                hits.push(ReferenceHit {
                    target,
                    kind: EdgeKind::UsesRecordType,
                });
            }
        }
    }

    fn identifiers(&self, text: &str, hits: &mut Vec<ReferenceHit<'a>>) {
        let prefixed = PREFIXED_REFERENCE
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str());
        for token in prefixed.chain(standalone_uuids(text)) {
            let found = self
                .catalog
                .get(token)
                .or_else(|| self.catalog.get_canonical(token));
            if let Some(target) = found {
                hits.push(ReferenceHit {
                    target,
                    kind: self.policies.edge_kind(&target.object_type),
                });
            }
        }
    }
}
