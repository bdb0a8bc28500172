//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&BackendClient` as the first argument.

pub mod generated_image_repo;
pub mod group_member_repo;
pub mod group_repo;
pub mod profile_repo;
pub mod user_photo_repo;
pub mod vision_repo;

pub use generated_image_repo::GeneratedImageRepo;
pub use group_member_repo::GroupMemberRepo;
pub use group_repo::GroupRepo;
pub use profile_repo::ProfileRepo;
pub use user_photo_repo::UserPhotoRepo;
pub use vision_repo::VisionRepo;
