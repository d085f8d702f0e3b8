//! Contact enrichment and candidate discovery through the research provider.
//!
//! LLM output is untrusted: it goes through the repair chain in [`parse`],
//! lands in the lenient records of [`types`], and is cross-checked by
//! [`validate`] before any identity claim is stored.

pub mod discovery;
pub mod enrich;
pub mod lenient;
pub mod names;
pub mod parse;
pub mod prompt;
pub mod types;
pub mod validate;

pub use discovery::{discover_candidates, DiscoveryRequest, DiscoveryResponse};
pub use enrich::{enrich_contact, EnrichRequest, EnrichResponse};
pub use types::{Candidate, EnrichmentData};
