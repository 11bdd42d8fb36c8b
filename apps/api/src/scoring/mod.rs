// Derived CV metrics. Both calculators are pure functions of a `CvDocument`
// and never fail: missing or empty fields simply contribute nothing.

pub mod ats;
pub mod completion;

pub use ats::{compute_ats_breakdown, compute_ats_score, AtsBreakdown, AtsRating};
pub use completion::{compute_completion, compute_completion_report, CompletionReport};
