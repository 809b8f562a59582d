//! Compiled reference grammars shared by the resolvers and the extractor.
//!
//! The regex crate has no lookaround, so the "standalone UUID" grammar is
//! expressed as [`HEX_RUN`] plus a shape check (see
//! [`crate::identifiers::standalone_uuids`]).

use std::sync::LazyLock;

use regex::Regex;

/// Bare 36-character UUID body.
pub const UUID: &str = r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";

/// Record type id inside a URN: standard or suffixed.
const URN_ID: &str =
    r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}(?:-[\w-]+)?";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern should compile")
}

// ── Identifier shapes ───────────────────────────────────────

pub static PREFIXED_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"(?i)^_[ae]-({UUID})_[\w-]+$")));

pub static STANDARD_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"(?i)^{UUID}$")));

pub static SUFFIXED_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"(?i)^({UUID})-[\w-]+$")));

/// `_a-UUID_digits`, the part shared by copies exported under different applications.
pub static CANONICAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"(?i)^(_[ae]-{UUID}_\d+)")));

pub static HEX_RUN: LazyLock<Regex> = LazyLock::new(|| compile(r"[0-9a-fA-F-]+"));

// ── Quoted identifier tokens ────────────────────────────────

pub static PREFIXED_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)#"(_[ae]-[\w-]+)""#));

pub static BARE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)#"([0-9a-f-]{36})""#));

// ── Record type URNs ────────────────────────────────────────

pub static URN_CONSTRUCTOR: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"(?i)#"urn:appian:record-type:v1:({URN_ID})"\s*\("#
    ))
});

pub static URN_STANDARD: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"(?i)#"urn:appian:(record-type|record-field|record-relationship):v1:({URN_ID})(?:/({URN_ID}))?(?:/({URN_ID}))?""#
    ))
});

pub static URN_NAMED_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"(?i)#"urn:appian:record-field:v1:({URN_ID})/([a-zA-Z_]\w*)""#
    ))
});

pub static URN_CHAIN: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"(?i)#"urn:appian:record-field:v1:({URN_ID})((?:/{URN_ID}){{2,}})""#
    ))
});

pub static URN_ENCODED: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"(?i)#"urn:appian:record-field:v1:({URN_ID})/([a-zA-Z_]\w*%40[a-zA-Z_]\w*)""#
    ))
});

/// Unquoted record URN, used for dependency scanning.
pub static URN_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)urn:appian:record-(?:type|field|relationship):v1:([0-9a-f-]{36})")
});

// ── Localization ────────────────────────────────────────────

pub static TRANSLATION_URN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?i)#"urn:appian:translation-string:v1:([0-9a-f-]{36})""#)
});

pub static LABEL_CALL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"rule!\w+\(\s*(?:bundle\s*:\s*[^,]+,\s*)?bundleKey\s*:\s*"([^"]+)"\s*\)"#)
});

// ── Named references ────────────────────────────────────────

pub static RULE_REF: LazyLock<Regex> =
    LazyLock::new(|| compile(r"rule!([a-zA-Z_][a-zA-Z0-9_]*)\s*\("));

pub static CONSTANT_REF: LazyLock<Regex> =
    LazyLock::new(|| compile(r"cons!([a-zA-Z_][a-zA-Z0-9_]*)"));

pub static TYPE_REF: LazyLock<Regex> =
    LazyLock::new(|| compile(r"type!([a-zA-Z_][a-zA-Z0-9_]*)"));

pub static RECORD_TYPE_REF: LazyLock<Regex> =
    LazyLock::new(|| compile(r"recordType!([a-zA-Z_][a-zA-Z0-9_]*)"));

/// Prefixed identifier anywhere in text.
pub static PREFIXED_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"(?i)(_[ae]-{UUID}_[\w-]+)")));
