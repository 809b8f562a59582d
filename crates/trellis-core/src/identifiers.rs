//! Identifier surface forms and their canonicalization.
//!
//! Three encodings name the same object:
//! - prefixed: `_a-0000e6a4-3c85-8000-9ba5-011c48011c48_43398`
//! - standard: `0006eed1-0f7f-8000-0020-7f0000014e7a`
//! - suffixed: `82127412-76f3-43c7-9b98-c2201b1e158b-as_rm_pro`

use crate::patterns::{CANONICAL_PREFIX, HEX_RUN, PREFIXED_SHAPE, STANDARD_SHAPE, SUFFIXED_SHAPE};

pub const UUID_LEN: usize = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdForm {
    Prefixed,
    Standard,
    Suffixed,
}

/// Which encoding `value` uses, if any.
pub fn classify(value: &str) -> Option<IdForm> {
    if PREFIXED_SHAPE.is_match(value) {
        Some(IdForm::Prefixed)
    } else if STANDARD_SHAPE.is_match(value) {
        Some(IdForm::Standard)
    } else if SUFFIXED_SHAPE.is_match(value) {
        Some(IdForm::Suffixed)
    } else {
        None
    }
}

pub fn is_identifier(value: &str) -> bool {
    classify(value).is_some()
}

/// The 36-character UUID embedded in any of the three encodings.
pub fn base_id(value: &str) -> Option<&str> {
    match classify(value)? {
        IdForm::Prefixed => value.get(3..3 + UUID_LEN),
        IdForm::Standard => Some(value),
        IdForm::Suffixed => value.get(..UUID_LEN),
    }
}

/// Prefixed ids only: `_a-UUID_digits` with the application suffix dropped.
pub fn canonical_id(value: &str) -> Option<&str> {
    CANONICAL_PREFIX
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether two identifiers name the same object under base or canonical comparison.
pub fn same_object(a: &str, b: &str) -> bool {
    if a.eq_ignore_ascii_case(b) {
        return true;
    }
    if let (Some(x), Some(y)) = (base_id(a), base_id(b)) {
        if x.eq_ignore_ascii_case(y) {
            return true;
        }
    }
    matches!(
        (canonical_id(a), canonical_id(b)),
        (Some(x), Some(y)) if x.eq_ignore_ascii_case(y)
    )
}

/// Standard UUIDs that are not part of a longer hex/dash run.
pub fn standalone_uuids(text: &str) -> impl Iterator<Item = &str> + '_ {
    HEX_RUN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|run| run.len() == UUID_LEN && STANDARD_SHAPE.is_match(run))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "0000e6a4-3c85-8000-9ba5-011c48011c48";

    #[test]
    fn base_is_shared_by_all_encodings() {
        let prefixed = format!("_a-{BASE}_43398");
        let suffixed = format!("{BASE}-as_rm_pro");
        assert_eq!(base_id(&prefixed), Some(BASE));
        assert_eq!(base_id(BASE), Some(BASE));
        assert_eq!(base_id(&suffixed), Some(BASE));
        assert!(same_object(&prefixed, &suffixed));
    }

    #[test]
    fn non_identifiers_have_no_base() {
        assert_eq!(base_id("not-a-uuid"), None);
        assert_eq!(base_id(""), None);
        assert_eq!(base_id("_x-0000e6a4-3c85-8000-9ba5-011c48011c48_1"), None);
        assert!(!is_identifier("0000e6a4-3c85-8000-9ba5"));
    }

    #[test]
    fn canonical_drops_application_suffix() {
        let a = format!("_a-{BASE}_43398_app_one");
        let b = format!("_a-{BASE}_43398_app_two");
        assert_eq!(canonical_id(&a), Some(format!("_a-{BASE}_43398").as_str()));
        assert_eq!(canonical_id(&a), canonical_id(&b));
        assert_eq!(canonical_id(BASE), None);
        assert!(same_object(&a, &b));
    }

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(classify(&BASE.to_uppercase()), Some(IdForm::Standard));
        assert_eq!(classify(&format!("_E-{BASE}_7")), Some(IdForm::Prefixed));
    }

    #[test]
    fn standalone_uuids_respect_boundaries() {
        let text = format!("a {BASE} b _a-{BASE}_1 c {BASE}0 d");
        let found: Vec<&str> = standalone_uuids(&text).collect();
        assert_eq!(found, vec![BASE]);
    }
}
