//! Dotted attribute paths with `[]` list markers.
//!
//! `nodes[].gateway_conditions[].condition` iterates `nodes`, then each
//! node's `gateway_conditions`, and addresses every `condition` string.
//! A trailing `key[]` addresses the string items of a list.

use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    key: String,
    each: bool,
}

/// A path parsed once and walked over many attribute trees.
#[derive(Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl fmt::Debug for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldPath({})", self.raw)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FieldPath {
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .split('.')
            .filter(|part| !part.is_empty())
            .map(|part| match part.strip_suffix("[]") {
                Some(key) => Segment {
                    key: key.to_string(),
                    each: true,
                },
                None => Segment {
                    key: part.to_string(),
                    each: false,
                },
            })
            .collect();
        FieldPath {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Every string leaf the path reaches, in document order.
    pub fn collect<'a>(&self, root: &'a Value) -> Vec<&'a str> {
        let mut out = Vec::new();
        collect_at(root, &self.segments, &mut out);
        out
    }

    /// Rewrite every string leaf in place. Returns how many leaves changed.
    pub fn apply<F>(&self, root: &mut Value, f: &mut F) -> usize
    where
        F: FnMut(&str) -> String,
    {
        apply_at(root, &self.segments, f)
    }
}

fn collect_at<'a>(node: &'a Value, segments: &[Segment], out: &mut Vec<&'a str>) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };
    let Some(child) = node.get(segment.key.as_str()) else {
        return;
    };
    if segment.each {
        let Some(items) = child.as_array() else {
            return;
        };
        if rest.is_empty() {
            out.extend(items.iter().filter_map(Value::as_str));
        } else {
            for item in items {
                collect_at(item, rest, out);
            }
        }
    } else if rest.is_empty() {
        out.extend(child.as_str());
    } else {
        collect_at(child, rest, out);
    }
}

fn apply_at<F>(node: &mut Value, segments: &[Segment], f: &mut F) -> usize
where
    F: FnMut(&str) -> String,
{
    let Some((segment, rest)) = segments.split_first() else {
        return 0;
    };
    let Some(child) = node.get_mut(segment.key.as_str()) else {
        return 0;
    };
    if segment.each {
        let Some(items) = child.as_array_mut() else {
            return 0;
        };
        if rest.is_empty() {
            items.iter_mut().map(|item| rewrite_leaf(item, f)).sum()
        } else {
            items.iter_mut().map(|item| apply_at(item, rest, f)).sum()
        }
    } else if rest.is_empty() {
        rewrite_leaf(child, f)
    } else {
        apply_at(child, rest, f)
    }
}

fn rewrite_leaf<F>(leaf: &mut Value, f: &mut F) -> usize
where
    F: FnMut(&str) -> String,
{
    let Value::String(text) = leaf else {
        return 0;
    };
    let rewritten = f(text);
    if rewritten == *text {
        return 0;
    }
    *text = rewritten;
    1
}
