//! Client library for the TimeCamp time-tracking API.
//!
//! Requests are plain blocking HTTP calls built from path segments;
//! responses are normalized into generic [`Record`] values labelled by
//! resource kind and identifier. Listing endpoints return lazy [`Records`]
//! sequences that hit the network only when consumed.
//!
//! ```no_run
//! use timecamp::{EntriesParams, Timecamp};
//!
//! fn main() -> timecamp::Result<()> {
//!     let tc = Timecamp::builder("my-token").week_starts("sundays").build()?;
//!     for user in tc.users() {
//!         println!("{}", user?);
//!     }
//!     let params = EntriesParams {
//!         from: Some("2026-01-01".into()),
//!         ..EntriesParams::default()
//!     };
//!     for entry in tc.entries(&params) {
//!         println!("{:?}", entry?.get("duration"));
//!     }
//!     Ok(())
//! }
//! ```

pub use error::TimecampError;

pub mod api; // TimeCamp API client
pub mod error; // Error handling
pub mod utils; // Shared date and validation helpers

pub use api::client::{Records, Timecamp, TimecampBuilder};
pub use api::query::ItemType;
pub use api::record::Record;
pub use api::types::{EntriesParams, TasksParams};
pub use utils::date::DateArg;

pub type Result<T> = std::result::Result<T, TimecampError>;
