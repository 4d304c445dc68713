//! Abstraction of the messaging account the controller drives

use crate::error::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Result of submitting a verification code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInOutcome {
    SignedIn,
    /// The account has a two-factor password
    PasswordRequired,
    /// No account exists for this phone number
    SignUpRequired { terms_of_service: bool },
}

/// Remote operations needed by the login flow and the bio controller
///
/// [`crate::MtprotoBackend`] talks to Telegram; tests plug in fakes.
#[async_trait]
pub trait ProfileBackend: Send + Sync + 'static {
    /// Whether the stored session is already logged in
    async fn is_authorized(&self) -> Result<bool>;

    /// Asks Telegram to send a login code to `phone`
    async fn request_code(&self, phone: &str) -> Result<()>;

    /// Submits the login code received by the operator
    async fn sign_in(&self, code: &str) -> Result<SignInOutcome>;

    /// Submits the two-factor password after [`SignInOutcome::PasswordRequired`]
    async fn check_password(&self, password: &str) -> Result<()>;

    /// Persists the session so later runs skip the login
    async fn save_session(&self) -> Result<()>;

    /// Reads the "about" field of the logged-in account
    async fn fetch_about(&self) -> Result<String>;

    /// Replaces the "about" field of the logged-in account
    async fn update_about(&self, about: &str) -> Result<()>;

    /// Keeps the connection alive until `cancel` fires
    async fn run_connection(&self, cancel: CancellationToken) -> Result<()>;
}
