//! Input limits shared by validation and the services that enforce them.

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Maximum length of a profile username.
pub const MAX_USERNAME_LENGTH: u64 = 30;

/// Maximum length of a display name.
pub const MAX_FULL_NAME_LENGTH: u64 = 100;

/// Maximum length of a vision title.
pub const MAX_VISION_TITLE_LENGTH: u64 = 100;

/// Maximum length of a vision description.
pub const MAX_VISION_DESCRIPTION_LENGTH: u64 = 500;

/// Maximum length of a group name.
pub const MAX_GROUP_NAME_LENGTH: u64 = 60;

/// Exact length of a group invite code.
pub const INVITE_CODE_LENGTH: usize = 6;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Reference photos forwarded to a single generation request.
pub const MAX_REFERENCE_PHOTOS: usize = 4;

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Largest encoded image accepted for upload (5 MiB).
pub const MAX_IMAGE_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// JPEG quality used when re-encoding user uploads.
pub const JPEG_QUALITY: u8 = 80;

// ---------------------------------------------------------------------------
// API
// ---------------------------------------------------------------------------

/// Default HTTP request timeout for backend calls.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default timeout for generative API calls. Image prediction routinely
/// runs past the backend default.
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 120;
