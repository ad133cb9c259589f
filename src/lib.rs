//! # draftdiff
//!
//! Compares a negotiated contract draft against the reference template it
//! started from, both as `.docx`, and reports structural changes and
//! formatting drift as JSON.
//!
//! The pipeline parses each document into a primitive stream, segments the
//! stream into numbered sections, aligns draft sections to template sections
//! by a greedy scored match, diffs formatting inside each matched pair, and
//! hands the results to a pluggable review collaborator.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use draftdiff::pipeline::{CompareOptions, ComparePipeline};
//! use draftdiff::progress::ConsoleProgress;
//! use draftdiff::review::OfflineReviewService;
//!
//! fn main() -> draftdiff::Result<()> {
//!     let pipeline = ComparePipeline::new(
//!         CompareOptions::default(),
//!         Box::new(OfflineReviewService),
//!         ConsoleProgress::quiet(),
//!     );
//!     let report = pipeline.compare_files(
//!         Path::new("template.docx"),
//!         Path::new("draft.docx"),
//!     )?;
//!     println!("{}", report.to_json(true)?);
//!     Ok(())
//! }
//! ```
//!
//! Bring your own reviewer by implementing [`review::ReviewService`]; the
//! bundled [`review::OfflineReviewService`] keeps everything runnable with
//! no credentials.

pub mod config;
pub mod docx;
pub mod error;
pub mod format;
pub mod ir;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod review;
pub mod section;
pub mod textutil;

// Re-export commonly used types
pub use error::{Error, Result};
pub use pipeline::{CompareOptions, ComparePipeline};
pub use report::{ComparisonReport, MatchStatus, SectionComparison};
pub use review::{OfflineReviewService, ReviewService};
pub use section::{AlignConfig, AlignProfile, Section, SegmenterConfig};
