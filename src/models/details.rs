use serde::Serialize;

/// Structured fields pulled out of a posting's free text.
///
/// Every field starts absent; absence is a normal result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobDetails {
    pub summary: Option<String>,
    pub essential_functions: Option<Vec<String>>,
    pub education: Option<String>,
    pub experience: Option<String>,
}

impl JobDetails {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.essential_functions.is_none()
            && self.education.is_none()
            && self.experience.is_none()
    }
}
