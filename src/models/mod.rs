pub mod details;
pub mod posting;

pub use details::JobDetails;
pub use posting::{EnrichedPosting, Merged, NOT_SPECIFIED, RawPosting};
