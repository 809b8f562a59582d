//! Record type URNs → `recordType!Name`, `recordType!Name.field`, ...
//!
//! Five passes run in order over the same text. A URN rewritten by one pass
//! no longer matches any URN grammar, so later passes only see leftovers.

use regex::{Captures, Regex};
use trellis_core::patterns::{
    URN_CHAIN, URN_CONSTRUCTOR, URN_ENCODED, URN_NAMED_FIELD, URN_STANDARD,
};
use trellis_core::SchemaCache;

const RECORD_TYPE_SIGIL: &str = "recordType!";

pub struct RecordUrnResolver<'a> {
    schema: &'a SchemaCache,
}

/// Resolved (type key, type name) for a URN's type segment.
struct TypeRef<'s> {
    key: String,
    name: &'s str,
}

impl<'a> RecordUrnResolver<'a> {
    pub fn new(schema: &'a SchemaCache) -> Self {
        RecordUrnResolver { schema }
    }

    pub fn resolve_text(&self, text: &str) -> String {
        if self.schema.is_empty() {
            return text.to_string();
        }
        let text = self.pass(&URN_CONSTRUCTOR, text, |caps| self.constructor(caps));
        let text = self.pass(&URN_STANDARD, &text, |caps| self.standard(caps));
        let text = self.pass(&URN_NAMED_FIELD, &text, |caps| self.named_field(caps));
        let text = self.pass(&URN_CHAIN, &text, |caps| self.chain(caps));
        self.pass(&URN_ENCODED, &text, |caps| self.encoded(caps))
    }

    fn pass<F>(&self, pattern: &Regex, text: &str, resolve: F) -> String
    where
        F: Fn(&Captures) -> Option<String>,
    {
        pattern
            .replace_all(text, |caps: &Captures| {
                resolve(caps).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    fn record_type(&self, raw: &str) -> Option<TypeRef<'a>> {
        let key = self.schema.normalize_type(raw);
        let name = self.schema.type_name(&key)?;
        Some(TypeRef { key, name })
    }

    // ── Passes ──────────────────────────────────────────────

    fn constructor(&self, caps: &Captures) -> Option<String> {
        let rt = self.record_type(&caps[1])?;
        Some(format!("{RECORD_TYPE_SIGIL}{}(", rt.name))
    }

    fn standard(&self, caps: &Captures) -> Option<String> {
        let rt = self.record_type(&caps[2])?;
        let seg1 = caps.get(3).map(|m| m.as_str());
        let seg2 = caps.get(4).map(|m| m.as_str());

        let path = match (caps[1].to_lowercase().as_str(), seg1, seg2) {
            ("record-type", _, _) => Vec::new(),
            ("record-field", Some(rel), Some(field)) => self.relationship_then_field(&rt, rel, field)?,
            ("record-field", Some(seg), None) => vec![self.field_or_relationship(&rt, seg)?],
            ("record-relationship", Some(rel), _) => {
                vec![self.schema.relationship(&rt.key, rel)?.name.as_str()]
            }
            _ => return None,
        };
        Some(self.render(&rt, &path))
    }

    fn named_field(&self, caps: &Captures) -> Option<String> {
        let rt = self.record_type(&caps[1])?;
        Some(self.render(&rt, &[&caps[2]]))
    }

    fn chain(&self, caps: &Captures) -> Option<String> {
        let rt = self.record_type(&caps[1])?;
        let segments: Vec<&str> = caps[2].split('/').filter(|s| !s.is_empty()).collect();
        let path = self.walk_chain(&rt, &segments)?;
        Some(self.render(&rt, &path))
    }

    fn encoded(&self, caps: &Captures) -> Option<String> {
        let rt = self.record_type(&caps[1])?;
        let decoded = caps[2].replace("%40", ".");
        Some(self.render(&rt, &[decoded.as_str()]))
    }

    // ── Segment lookups ─────────────────────────────────────

    fn field_or_relationship(&self, rt: &TypeRef<'a>, seg: &str) -> Option<&'a str> {
        self.schema
            .field(&rt.key, seg)
            .or_else(|| self.schema.relationship(&rt.key, seg).map(|r| r.name.as_str()))
    }

    /// Both lookups must succeed; a partial path is never rendered.
    fn relationship_then_field(&self, rt: &TypeRef<'a>, rel: &str, field: &str) -> Option<Vec<&'a str>> {
        let relationship = self.schema.relationship(&rt.key, rel)?;
        let target = self.schema.normalize_type(relationship.target_type.as_deref()?);
        let field = self.schema.field(&target, field)?;
        Some(vec![relationship.name.as_str(), field])
    }

    /// Relationships advance the current type; a field ends the chain.
    fn walk_chain(&self, rt: &TypeRef<'a>, segments: &[&str]) -> Option<Vec<&'a str>> {
        let mut names = Vec::with_capacity(segments.len());
        let mut current = rt.key.clone();
        for (i, seg) in segments.iter().enumerate() {
            if let Some(relationship) = self.schema.relationship(&current, seg) {
                names.push(relationship.name.as_str());
                if let Some(target) = relationship.target_type.as_deref() {
                    current = self.schema.normalize_type(target);
                }
            } else if let Some(field) = self.schema.field(&current, seg) {
                if i + 1 != segments.len() {
                    return None;
                }
                names.push(field);
            } else {
                return None;
            }
        }
        if names.is_empty() { None } else { Some(names) }
    }

    fn render(&self, rt: &TypeRef<'_>, path: &[&str]) -> String {
        let mut out = format!("{RECORD_TYPE_SIGIL}{}", rt.name);
        for name in path {
            out.push('.');
            out.push_str(name);
        }
        out
    }
}
