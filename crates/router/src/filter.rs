//! Catalog filter: drops items the session has already consumed.
//!
//! Pure: the same catalog and session always give the same partition, and
//! every input item lands on exactly one side, in its original order.

use ctxroute_core::{Catalog, SessionState};

/// The two sides of a filtered catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPartition {
    /// Items still worth offering to the model
    pub eligible: Catalog,
    /// Items already injected this session
    pub excluded: Catalog,
}

/// Split `catalog` into eligible and already-consumed items.
///
/// A doc is excluded iff its `path` is in `session.docs_read`; a skill iff
/// its `name` is in `session.skills_used`.
pub fn partition(catalog: &Catalog, session: &SessionState) -> CatalogPartition {
    let (excluded_docs, eligible_docs): (Vec<_>, Vec<_>) = catalog
        .docs
        .iter()
        .cloned()
        .partition(|doc| session.has_read(&doc.path));

    let (excluded_skills, eligible_skills): (Vec<_>, Vec<_>) = catalog
        .skills
        .iter()
        .cloned()
        .partition(|skill| session.has_used(&skill.name));

    CatalogPartition {
        eligible: Catalog::new(eligible_docs, eligible_skills),
        excluded: Catalog::new(excluded_docs, excluded_skills),
    }
}
