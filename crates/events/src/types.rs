//! Event names published by the pipeline.

pub const VISION_CREATED: &str = "vision.created";
pub const VISION_STATUS_CHANGED: &str = "vision.status_changed";
pub const VISION_IMAGE_GENERATED: &str = "vision.image_generated";
pub const VISION_GENERATION_FAILED: &str = "vision.generation_failed";
pub const VISION_DELETED: &str = "vision.deleted";
pub const IMAGE_FAVORITE_TOGGLED: &str = "image.favorite_toggled";

pub const GROUP_CREATED: &str = "group.created";
pub const GROUP_JOINED: &str = "group.joined";
pub const GROUP_LEFT: &str = "group.left";
pub const GROUP_UPDATED: &str = "group.updated";

pub const AUTH_SIGNED_IN: &str = "auth.signed_in";
pub const AUTH_SIGNED_OUT: &str = "auth.signed_out";
pub const PROFILE_UPDATED: &str = "profile.updated";
pub const PHOTO_UPLOADED: &str = "photo.uploaded";
pub const PHOTO_DELETED: &str = "photo.deleted";
pub const PHOTO_PRIMARY_CHANGED: &str = "photo.primary_changed";

/// An operation failed. The payload's `message` is the text to show the user.
/// Each new error supersedes the previous one.
pub const APP_ERROR: &str = "app.error";

/// Entity kinds used as `source_entity_type`.
pub mod entity {
    pub const VISION: &str = "vision";
    pub const IMAGE: &str = "generated_image";
    pub const GROUP: &str = "group";
    pub const PROFILE: &str = "profile";
    pub const PHOTO: &str = "user_photo";
}
