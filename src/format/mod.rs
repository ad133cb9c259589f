pub mod diff;
pub mod normalize;

pub use diff::{diff_sections, DiffKind, FixValue, FormattingDifference, Severity, SeverityCounts};
