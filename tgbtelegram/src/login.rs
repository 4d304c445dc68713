//! Phone-number login state machine

use crate::backend::{ProfileBackend, SignInOutcome};
use crate::credentials::CredentialProvider;
use crate::error::{Result, TelegramError};
use tracing::info;

/// Logs the backend in, unless its session is already authorized
///
/// Sign-up and terms-of-service branches are refused: the bridge only drives
/// an existing account.
pub async fn authorize<B, C>(backend: &B, credentials: &C) -> Result<()>
where
    B: ProfileBackend + ?Sized,
    C: CredentialProvider + ?Sized,
{
    if backend.is_authorized().await? {
        info!("Telegram session still valid, skipping login");
        return Ok(());
    }

    let phone = credentials.phone().await?;
    info!("Requesting Telegram login code");
    backend.request_code(&phone).await?;

    let code = credentials.code().await?;
    match backend.sign_in(code.trim()).await? {
        SignInOutcome::SignedIn => {}
        SignInOutcome::PasswordRequired => {
            info!("Telegram account has a two-factor password");
            let password = credentials.password().await?;
            backend.check_password(&password).await?;
        }
        SignInOutcome::SignUpRequired {
            terms_of_service: true,
        } => return Err(TelegramError::TermsOfServiceNotSupported),
        SignInOutcome::SignUpRequired { .. } => return Err(TelegramError::SignUpNotSupported),
    }

    backend.save_session().await?;
    info!("✅ Telegram login successful");
    Ok(())
}
