use tracing::debug;

use crate::db::models::User;
use crate::db::sqlite::BudgetStorage;
use crate::error::BudgetError;
use crate::identity::IdentityProvider;

/// Domain of the synthesized address for identities whose profile has no email.
pub const FALLBACK_EMAIL_DOMAIN: &str = "unknown.com";

pub fn fallback_email(external_id: &str) -> String {
    format!("{external_id}@{FALLBACK_EMAIL_DOMAIN}")
}

/// Map a bearer token to the local user, creating the user on first sight.
pub async fn resolve_user(
    provider: &dyn IdentityProvider,
    storage: &BudgetStorage,
    token: &str,
) -> Result<User, BudgetError> {
    let subject = provider.verify_token(token).await?;
    let profile = provider
        .fetch_profile(&subject)
        .await?
        .ok_or_else(|| BudgetError::Unauthorized("user does not exist".to_string()))?;

    let email = profile
        .email
        .unwrap_or_else(|| fallback_email(&subject));
    let user = storage.get_or_create_user(&subject, &email).await?;
    debug!(user_id = user.id, "resolved bearer token");
    Ok(user)
}
