//! Read-only caches derived once from the full object collection

use crate::catalog::ObjectCatalog;
use crate::localization::{LabelTable, TranslationCache};
use crate::model::AppObject;
use crate::schema::SchemaCache;

#[derive(Debug)]
pub struct Lookups {
    pub catalog: ObjectCatalog,
    pub schema: SchemaCache,
    pub translations: TranslationCache,
    pub labels: LabelTable,
}

impl Lookups {
    pub fn build(objects: &[AppObject], labels: LabelTable) -> Self {
        Lookups {
            catalog: ObjectCatalog::build(objects),
            schema: SchemaCache::build(objects),
            translations: TranslationCache::build(objects),
            labels,
        }
    }
}
