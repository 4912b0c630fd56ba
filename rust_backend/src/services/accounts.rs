//! User accounts.
//!
//! Passwords are stored as bcrypt hashes; the cost factor comes from
//! [`AccountSettings::bcrypt_cost`].

use log::{info, warn};

use crate::db::repo_config::AccountSettings;
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{Stored, User};

use super::error::{CredentialError, LogbookResult};

/// Hash `password` with bcrypt at the given cost.
pub fn hash_password(password: &str, cost: u32) -> LogbookResult<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check `password` against a value produced by [`hash_password`].
///
/// A stored value that is not a bcrypt hash never matches.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    match bcrypt::verify(password, hashed) {
        Ok(matches) => matches,
        Err(e) => {
            warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

/// Register a new user.
///
/// Credentials are checked before anything is written. A taken username is
/// reported by the storage layer as a constraint violation.
pub fn create_user<R: FullRepository + ?Sized>(
    repo: &R,
    settings: &AccountSettings,
    username: &str,
    password: &str,
) -> LogbookResult<Stored<User>> {
    info!("Service layer: creating user '{}'", username);

    if username.is_empty() || password.is_empty() {
        return Err(CredentialError::MissingCredentials.into());
    }
    if password.chars().count() < settings.min_password_length {
        return Err(CredentialError::PasswordTooShort {
            minimum: settings.min_password_length,
        }
        .into());
    }

    let user = User {
        username: username.to_string(),
        hashed_password: hash_password(password, settings.bcrypt_cost)?,
    };
    Ok(repo.store_user(user)?)
}

/// True when `username` exists and `password` matches it.
pub fn valid_login<R: FullRepository + ?Sized>(
    repo: &R,
    username: &str,
    password: &str,
) -> RepositoryResult<bool> {
    if username.is_empty() || password.is_empty() {
        return Ok(false);
    }
    let Some(user) = repo.find_user_by_username(username)? else {
        warn!("Login attempt for unknown user '{}'", username);
        return Ok(false);
    };
    Ok(verify_password(password, &user.hashed_password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::services::LogbookError;

    const TEST_COST: u32 = 4;

    fn settings() -> AccountSettings {
        AccountSettings {
            bcrypt_cost: TEST_COST,
            ..AccountSettings::default()
        }
    }

    #[test]
    fn test_hash_round_trip() {
        let hashed = hash_password("correct horse", TEST_COST).unwrap();
        assert!(hashed.starts_with("$2"));
        assert!(verify_password("correct horse", &hashed));
        assert!(!verify_password("wrong horse", &hashed));
        assert!(!verify_password("correct horse", "no-separator"));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(
            hash_password("same", TEST_COST).unwrap(),
            hash_password("same", TEST_COST).unwrap()
        );
    }

    #[test]
    fn test_stored_hash_uses_configured_cost() {
        let repo = LocalRepository::new();
        let user = create_user(&repo, &settings(), "daniel", "stargazer").unwrap();
        assert!(user.hashed_password.starts_with("$2b$04$"));
    }

    #[test]
    fn test_invalid_cost_is_reported() {
        let repo = LocalRepository::new();
        let settings = AccountSettings {
            bcrypt_cost: 99,
            ..AccountSettings::default()
        };
        let err = create_user(&repo, &settings, "daniel", "stargazer").unwrap_err();
        assert!(matches!(err, LogbookError::PasswordHash(_)));
        assert_eq!(repo.write_count(), 0);
    }

    #[test]
    fn test_create_user_and_login() {
        let repo = LocalRepository::new();
        let user = create_user(&repo, &settings(), "daniel", "stargazer").unwrap();
        assert_ne!(user.hashed_password, "stargazer");

        assert!(valid_login(&repo, "daniel", "stargazer").unwrap());
        assert!(!valid_login(&repo, "daniel", "stargaze").unwrap());
        assert!(!valid_login(&repo, "nobody", "stargazer").unwrap());
        assert!(!valid_login(&repo, "", "").unwrap());
    }

    #[test]
    fn test_missing_credentials() {
        let repo = LocalRepository::new();
        let err = create_user(&repo, &settings(), "", "stargazer").unwrap_err();
        assert!(matches!(
            err,
            LogbookError::Credential(CredentialError::MissingCredentials)
        ));
        let err = create_user(&repo, &settings(), "daniel", "").unwrap_err();
        assert!(matches!(
            err,
            LogbookError::Credential(CredentialError::MissingCredentials)
        ));
        assert_eq!(repo.write_count(), 0);
    }

    #[test]
    fn test_password_too_short() {
        let repo = LocalRepository::new();
        let err = create_user(&repo, &settings(), "daniel", "short").unwrap_err();
        assert!(matches!(
            err,
            LogbookError::Credential(CredentialError::PasswordTooShort { minimum: 8 })
        ));

        let lenient = AccountSettings {
            min_password_length: 4,
            ..settings()
        };
        assert!(create_user(&repo, &lenient, "daniel", "short").is_ok());
    }

    #[test]
    fn test_duplicate_username() {
        let repo = LocalRepository::new();
        create_user(&repo, &settings(), "daniel", "stargazer").unwrap();
        let err = create_user(&repo, &settings(), "daniel", "different1").unwrap_err();
        assert!(err.is_constraint_violation());
    }
}
