use super::error::RepositoryResult;
use crate::models::{Stored, User};

/// Repository trait for user accounts.
pub trait AccountRepository: Send + Sync {
    /// Store a user. Usernames are unique; a taken name fails with
    /// `RepositoryError::ConstraintViolation`.
    fn store_user(&self, user: User) -> RepositoryResult<Stored<User>>;

    fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<Stored<User>>>;
}
