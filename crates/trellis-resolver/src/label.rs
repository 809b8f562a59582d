//! Label calls with a literal `bundleKey` → quoted label text

use regex::Captures;
use trellis_core::LabelTable;
use trellis_core::patterns::LABEL_CALL;

pub struct LabelResolver<'a> {
    labels: &'a LabelTable,
}

impl<'a> LabelResolver<'a> {
    pub fn new(labels: &'a LabelTable) -> Self {
        LabelResolver { labels }
    }

    pub fn resolve_text(&self, text: &str) -> String {
        if self.labels.is_empty() {
            return text.to_string();
        }
        LABEL_CALL
            .replace_all(text, |caps: &Captures| match self.labels.get(&caps[1]) {
                Some(value) => format!("\"{value}\""),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}
