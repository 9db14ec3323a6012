use crate::models::JobDetails;

/// Keep a posting only if a summary came out of it.
///
/// The other fields are allowed to be missing; they get merged as absent or
/// as the sentinel later on.
pub fn accept(details: &JobDetails) -> bool {
    details
        .summary
        .as_deref()
        .is_some_and(|s| !s.trim().is_empty())
}
