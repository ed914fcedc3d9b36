//! Bearer-token authentication against an external identity provider.
//!
//! The provider's only contract with this service: a token verifies to a
//! stable subject id, and the subject has a profile that may carry an email.

pub mod endpoints;
pub mod resolver;

use async_trait::async_trait;

use crate::error::BudgetError;

pub use endpoints::HttpIdentityProvider;
pub use resolver::resolve_user;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalProfile {
    pub email: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify `token` and return the provider's subject id for it.
    /// Every failure, including transport errors, is `BudgetError::Unauthorized`.
    async fn verify_token(&self, token: &str) -> Result<String, BudgetError>;

    /// Profile of a verified subject; `None` if the provider has no such user.
    async fn fetch_profile(&self, subject: &str) -> Result<Option<ExternalProfile>, BudgetError>;
}
