//! Template set lookup.

mod local;

pub use local::{BUNDLED_TEMPLATES_DIR, LocalTemplateStore, candidate_roots};
