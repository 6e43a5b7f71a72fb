//! Application constants and configuration

pub const APP_NAME: &str = "Resume Reviewer";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_REVIEW_URL: &str = "http://localhost:8080/upload-cv";
pub const HEALTH_PATH: &str = "/health";

/// Multipart field the review service reads the PDF from
pub const FILE_FIELD: &str = "file";
pub const PDF_MIME: &str = "application/pdf";
pub const PDF_EXTENSION: &str = "pdf";

/// Job recommendation count accepted by the review backend
pub const DEFAULT_RECOMMENDATION_LIMIT: u32 = 10;
pub const MAX_RECOMMENDATION_LIMIT: u32 = 50;

pub const DEFAULT_MOCK_DELAY_MS: u64 = 2000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const HEALTH_TIMEOUT_SECS: u64 = 5;

/// The only failure text ever shown to the user
pub const UPLOAD_ERROR_MESSAGE: &str = "Failed to review your resume. Please try again.";
