use serde::{Deserialize, Serialize};

crate::define_id_type!(
    /// User account row identifier.
    UserId
);

/// A logbook user. The password is kept as a bcrypt hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub hashed_password: String,
}

crate::impl_entity!(User, UserId, "user");
