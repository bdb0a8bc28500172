//! Account, group and profile operations around the vision lifecycle.

pub mod auth;
pub mod group;
pub mod photos;
pub mod profile;

pub use auth::AuthService;
pub use group::GroupService;
pub use profile::ProfileService;
