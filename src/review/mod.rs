pub mod schema;
pub mod service;

pub use schema::{
    parse_document_review, parse_section_review, DocumentReview, ReviewIssue, ReviewSeverity,
    ReviewStatus, SectionReview,
};
pub use service::{
    DocumentReviewInput, OfflineReviewService, ReviewService, SectionReviewInput, ServiceError,
    DEFAULT_EXCERPT_LIMIT,
};
