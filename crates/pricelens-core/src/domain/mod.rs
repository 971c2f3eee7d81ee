//! Domain model for pricelens.
//!
//! - `Source`: the closed set of supported marketplaces
//! - `CanonicalRecord`: one normalized listing
//! - `SearchRequest` / `SourceQuery`: raw and validated search input
//! - error taxonomy shared by every layer

pub mod error;
pub mod query;
pub mod record;
pub mod source;

pub use error::{ConfigurationError, PricelensError, Result, SourceError, SourceResult};
pub use query::{SearchRequest, SourceQuery};
pub use record::{CanonicalRecord, UNKNOWN_AVAILABILITY};
pub use source::Source;
