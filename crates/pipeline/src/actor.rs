use sharedvisions_core::types::DbId;

/// The signed-in user an operation runs for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    /// Name the member resolver uses for "the current user".
    pub display_name: String,
}

impl Actor {
    pub fn new(user_id: DbId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
        }
    }
}
