// Text-to-fields extraction: markup stripping, pattern matching, and the
// keep/drop decision for each posting.

pub mod fields;
pub mod gate;
pub mod normalize;

pub use fields::extract;
pub use gate::accept;
pub use normalize::{NormalizedText, normalize};
