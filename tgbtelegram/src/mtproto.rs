//! [`ProfileBackend`] implementation over a real Telegram user session

use crate::backend::{ProfileBackend, SignInOutcome};
use crate::error::{Result, TelegramError};
use async_trait::async_trait;
use grammers_client::types::{LoginToken, PasswordToken};
use grammers_client::{Client, Config, InitParams, SignInError};
use grammers_session::Session;
use grammers_tl_types as tl;
use std::fs;
use std::path::{Path, PathBuf};
use tgbconfig::{BridgeConfig, ConfigStore};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Session file name, next to the configuration
pub const SESSION_FILE_NAME: &str = "telegram.session";

/// Telegram account reached through MTProto
pub struct MtprotoBackend {
    client: Client,
    session_path: PathBuf,
    login_token: Mutex<Option<LoginToken>>,
    password_token: Mutex<Option<PasswordToken>>,
}

impl MtprotoBackend {
    /// Opens (or creates) the session file and connects to Telegram
    pub async fn connect(
        api_id: i32,
        api_hash: &str,
        session_path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let session_path = session_path.into();
        let session = Session::load_file_or_create(&session_path).map_err(TelegramError::Session)?;

        info!("Connecting to Telegram...");
        let client = Client::connect(Config {
            session,
            api_id,
            api_hash: api_hash.to_string(),
            params: InitParams::default(),
        })
        .await
        .map_err(|e| TelegramError::Connect(e.to_string()))?;
        info!("Connected to Telegram");

        Ok(Self {
            client,
            session_path,
            login_token: Mutex::new(None),
            password_token: Mutex::new(None),
        })
    }

    /// Connects using the bridge configuration; the session lives in the config directory
    pub async fn from_config(config: &BridgeConfig, store: &ConfigStore) -> Result<Self> {
        let api_id = config
            .telegram_api_id()
            .map_err(|_| TelegramError::InvalidApiId(config.telegram_api_id.clone()))?;
        Self::connect(
            api_id,
            &config.telegram_api_hash,
            store.file_path(SESSION_FILE_NAME),
        )
        .await
    }
}

#[async_trait]
impl ProfileBackend for MtprotoBackend {
    async fn is_authorized(&self) -> Result<bool> {
        self.client
            .is_authorized()
            .await
            .map_err(|e| TelegramError::Invocation {
                operation: "updates.getState",
                message: e.to_string(),
            })
    }

    async fn request_code(&self, phone: &str) -> Result<()> {
        let token = self
            .client
            .request_login_code(phone)
            .await
            .map_err(|e| TelegramError::Auth(e.to_string()))?;
        *self.login_token.lock().await = Some(token);
        Ok(())
    }

    async fn sign_in(&self, code: &str) -> Result<SignInOutcome> {
        let token = self
            .login_token
            .lock()
            .await
            .take()
            .ok_or_else(|| TelegramError::Auth("no login code was requested".to_string()))?;

        match self.client.sign_in(&token, code).await {
            Ok(user) => {
                debug!("Signed in as user {}", user.id());
                Ok(SignInOutcome::SignedIn)
            }
            Err(SignInError::PasswordRequired(password_token)) => {
                *self.password_token.lock().await = Some(password_token);
                Ok(SignInOutcome::PasswordRequired)
            }
            Err(SignInError::SignUpRequired { terms_of_service }) => {
                Ok(SignInOutcome::SignUpRequired {
                    terms_of_service: terms_of_service.is_some(),
                })
            }
            Err(SignInError::InvalidCode) => {
                Err(TelegramError::Auth("invalid verification code".to_string()))
            }
            Err(e) => Err(TelegramError::Auth(e.to_string())),
        }
    }

    async fn check_password(&self, password: &str) -> Result<()> {
        let token = self
            .password_token
            .lock()
            .await
            .take()
            .ok_or_else(|| TelegramError::Auth("no password was requested".to_string()))?;

        self.client
            .check_password(token, password.trim())
            .await
            .map(|_| ())
            .map_err(|e| TelegramError::Auth(e.to_string()))
    }

    async fn save_session(&self) -> Result<()> {
        self.client
            .session()
            .save_to_file(&self.session_path)
            .map_err(TelegramError::Session)?;
        enforce_private_permissions(&self.session_path).map_err(TelegramError::Session)?;
        debug!("Telegram session saved to {}", self.session_path.display());
        Ok(())
    }

    async fn fetch_about(&self) -> Result<String> {
        let tl::enums::users::UserFull::Full(full) = self
            .client
            .invoke(&tl::functions::users::GetFullUser {
                id: tl::enums::InputUser::UserSelf,
            })
            .await
            .map_err(|e| TelegramError::Invocation {
                operation: "users.getFullUser",
                message: e.to_string(),
            })?;
        let tl::enums::UserFull::Full(user) = full.full_user;
        Ok(user.about.unwrap_or_default())
    }

    async fn update_about(&self, about: &str) -> Result<()> {
        self.client
            .invoke(&tl::functions::account::UpdateProfile {
                first_name: None,
                last_name: None,
                about: Some(about.to_string()),
            })
            .await
            .map_err(|e| TelegramError::Invocation {
                operation: "account.updateProfile",
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn run_connection(&self, cancel: CancellationToken) -> Result<()> {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                update = self.client.next_update() => {
                    if let Err(e) = update {
                        return Err(TelegramError::Invocation {
                            operation: "updates",
                            message: e.to_string(),
                        });
                    }
                }
            }
        }
    }
}

/// Session files hold the authorization key: owner-only access
#[cfg(unix)]
fn enforce_private_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn enforce_private_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
