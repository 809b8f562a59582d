//! Reference resolution and dependency extraction

pub mod coordinator;
pub mod dependencies;
pub mod identifier;
pub mod label;
pub mod record_urn;
pub mod references;
pub mod translation;


pub use coordinator::{ReferenceResolver, ResolutionStats};
pub use dependencies::DependencyExtractor;
pub use identifier::IdentifierResolver;
pub use label::LabelResolver;
pub use record_urn::RecordUrnResolver;
pub use references::{ReferenceHit, ReferenceScanner};
pub use translation::{TranslationResolver, render_translation};
