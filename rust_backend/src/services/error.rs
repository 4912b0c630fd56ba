//! Service-level errors.

use crate::db::repository::RepositoryError;

/// Result type for service operations
pub type LogbookResult<T> = Result<T, LogbookError>;

/// An equipment combination rule an observation request broke.
///
/// Rules are checked in declaration order and the first violation wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EquipmentRule {
    #[error("cannot combine telescope and binoculars")]
    TelescopeWithBinoculars,

    #[error("cannot use an eyepiece with binoculars")]
    EyepieceWithBinoculars,

    #[error("cannot use an optical filter with binoculars")]
    FilterWithBinoculars,

    #[error("telescope requires an eyepiece or camera")]
    TelescopeWithoutOptics,
}

impl EquipmentRule {
    /// Name of the request field the caller has to change.
    pub fn field(&self) -> &'static str {
        match self {
            Self::TelescopeWithBinoculars => "telescope",
            Self::EyepieceWithBinoculars => "eyepiece",
            Self::FilterWithBinoculars => "optic_filter",
            Self::TelescopeWithoutOptics => "eyepiece",
        }
    }
}

/// Account creation precondition failures, raised before any write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("missing username or password")]
    MissingCredentials,

    #[error("password must have at least {minimum} characters")]
    PasswordTooShort { minimum: usize },
}

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum LogbookError {
    /// The equipment selected for an observation is not physically sensible.
    #[error("Invalid equipment combination: {0}")]
    InvalidEquipmentCombination(#[from] EquipmentRule),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl LogbookError {
    /// The violated equipment rule, if this is a combination error.
    pub fn equipment_rule(&self) -> Option<EquipmentRule> {
        match self {
            Self::InvalidEquipmentCombination(rule) => Some(*rule),
            _ => None,
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Repository(e) if e.is_constraint_violation())
    }
}
