//! Bio controller: login, original bio bookkeeping, updates and restoration

use crate::backend::ProfileBackend;
use crate::credentials::CredentialProvider;
use crate::error::{Result, TelegramError};
use crate::login;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Maximum wait for the connection task when closing
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Drives the bio of one Telegram account
///
/// The bio read right after login is kept as the original bio for the whole
/// run; later updates never replace it.
pub struct BioController<B: ProfileBackend> {
    backend: Arc<B>,
    original_bio: OnceLock<String>,
    connection: CancellationToken,
    connection_task: Mutex<Option<JoinHandle<()>>>,
}

impl<B: ProfileBackend> BioController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            original_bio: OnceLock::new(),
            connection: CancellationToken::new(),
            connection_task: Mutex::new(None),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Logs in, captures the original bio and starts the connection loop
    ///
    /// Returns only once the bio of the logged-in account has been read.
    pub async fn authenticate<C>(&self, credentials: &C) -> Result<()>
    where
        C: CredentialProvider + ?Sized,
    {
        info!("Starting Telegram authorization...");
        login::authorize(&*self.backend, credentials).await?;

        debug!("Fetching current Telegram profile");
        let about = self.backend.fetch_about().await?;
        if self.original_bio.set(about).is_err() {
            warn!("Original bio already captured, keeping the first one");
        }
        info!("Telegram authorization complete, current bio: {:?}", self.original_bio());

        self.spawn_connection();
        Ok(())
    }

    fn spawn_connection(&self) {
        let mut task = match self.connection_task.lock() {
            Ok(task) => task,
            Err(poisoned) => poisoned.into_inner(),
        };
        if task.is_some() {
            return;
        }

        let backend = self.backend.clone();
        let cancel = self.connection.clone();
        *task = Some(tokio::spawn(async move {
            match backend.run_connection(cancel).await {
                Ok(()) => debug!("Telegram connection loop stopped"),
                Err(e) => error!("Telegram connection loop failed: {}", e),
            }
        }));
    }

    /// Bio captured at login, empty before authentication
    pub fn original_bio(&self) -> &str {
        self.original_bio.get().map(String::as_str).unwrap_or("")
    }

    /// Writes a new bio, even if it equals the current one
    pub async fn update_bio(&self, text: &str) -> Result<()> {
        self.backend.update_about(text).await
    }

    /// Writes back the bio captured at login
    ///
    /// Fails without touching the profile if no bio was ever captured.
    pub async fn restore_original_bio(&self) -> Result<()> {
        let original = self
            .original_bio
            .get()
            .ok_or(TelegramError::NotAuthenticated)?;
        self.update_bio(original).await
    }

    /// Stops the connection loop and saves the session
    ///
    /// Waits a few seconds at most for the loop to finish.
    pub async fn close(&self) {
        self.connection.cancel();

        let handle = match self.connection_task.lock() {
            Ok(mut task) => task.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(mut handle) = handle {
            if tokio::time::timeout(CLOSE_TIMEOUT, &mut handle).await.is_err() {
                warn!("Telegram connection loop did not stop in time, aborting");
                handle.abort();
            }
        }

        if self.original_bio.get().is_some() {
            if let Err(e) = self.backend.save_session().await {
                warn!("Failed to save Telegram session: {}", e);
            }
        }
        info!("Telegram client closed");
    }
}
