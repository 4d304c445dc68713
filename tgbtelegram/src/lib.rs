//! # tgbtelegram - Telegram profile bio controller
//!
//! Logs a Telegram user account in with its phone number, remembers the bio
//! found right after login, pushes new bios and restores the original one.
//!
//! ## Architecture
//!
//! - [`ProfileBackend`]: the remote operations (login steps, bio read/write,
//!   connection loop). [`MtprotoBackend`] implements it over `grammers`.
//! - [`CredentialProvider`]: where the phone, login code and two-factor
//!   password come from. [`TerminalCredentials`] asks on the terminal.
//! - [`login::authorize`]: the login state machine.
//! - [`BioController`]: what the bridge uses.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tgbtelegram::{BioController, MtprotoBackend, TerminalCredentials};
//!
//! #[tokio::main]
//! async fn main() -> tgbtelegram::Result<()> {
//!     let backend = MtprotoBackend::connect(12345, "api-hash", "telegram.session").await?;
//!     let controller = BioController::new(backend);
//!
//!     controller.authenticate(&TerminalCredentials::new("+33612345678")).await?;
//!     controller.update_bio("🎵 Song - Artist").await?;
//!     controller.restore_original_bio().await?;
//!     controller.close().await;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod controller;
pub mod credentials;
pub mod error;
pub mod login;
pub mod mtproto;

pub use backend::{ProfileBackend, SignInOutcome};
pub use controller::BioController;
pub use credentials::{CredentialProvider, TerminalCredentials};
pub use error::{Result, TelegramError};
pub use mtproto::MtprotoBackend;
