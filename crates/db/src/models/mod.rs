//! Row types and input DTOs, one module per table.

pub mod generated_image;
pub mod group;
pub mod group_member;
pub mod profile;
pub mod user_photo;
pub mod vision;
