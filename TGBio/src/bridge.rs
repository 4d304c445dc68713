//! Boucle de synchronisation Spotify → bio Telegram
//!
//! Cycle de vie : `Starting → Running → ShuttingDown → Stopped`.
//!
//! À l'arrêt, la boucle est annulée en premier et termine son tick en cours ;
//! la bio d'origine n'est restaurée qu'ensuite, dans un scope neuf avec son
//! propre délai. Une mise à jour en vol ne peut donc pas écraser la
//! restauration. Chaque appel distant d'un tick est borné par
//! [`CALL_TIMEOUT`], ce qui borne aussi l'attente du tick en cours à l'arrêt.

use crate::status::status_for;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tgbspotify::{CurrentTrack, SpotifyClient};
use tgbtelegram::{BioController, ProfileBackend};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Délai maximal accordé à la restauration de la bio
pub const RESTORE_TIMEOUT: Duration = Duration::from_secs(15);

/// Délai maximal d'un appel distant pendant un tick
pub const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// États du bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Starting,
    Running,
    ShuttingDown,
    Stopped,
}

/// Source de la piste en cours
#[async_trait]
pub trait NowPlaying: Send + Sync {
    async fn now_playing(&self) -> Result<Option<CurrentTrack>>;
}

/// Profil dont la bio est pilotée
#[async_trait]
pub trait BioTarget: Send + Sync {
    async fn set_bio(&self, text: &str) -> Result<()>;

    /// Réécrit la bio capturée à l'authentification
    async fn restore_bio(&self) -> Result<()>;

    /// Libère la connexion ; ne doit pas bloquer indéfiniment
    async fn close(&self);
}

#[async_trait]
impl NowPlaying for SpotifyClient {
    async fn now_playing(&self) -> Result<Option<CurrentTrack>> {
        Ok(self.get_current_track().await?)
    }
}

#[async_trait]
impl<B: ProfileBackend> BioTarget for BioController<B> {
    async fn set_bio(&self, text: &str) -> Result<()> {
        Ok(self.update_bio(text).await?)
    }

    async fn restore_bio(&self) -> Result<()> {
        Ok(self.restore_original_bio().await?)
    }

    async fn close(&self) {
        BioController::close(self).await
    }
}

/// Orchestrateur : interroge la source et pousse le statut dans la bio
pub struct Bridge<P, T> {
    provider: P,
    target: T,
    interval: Duration,
    call_timeout: Duration,
    state: watch::Sender<BridgeState>,
}

impl<P: NowPlaying, T: BioTarget> Bridge<P, T> {
    /// Crée le bridge ; les deux côtés doivent déjà être authentifiés
    pub fn new(provider: P, target: T, interval: Duration) -> Self {
        let (state, _) = watch::channel(BridgeState::Starting);
        Self {
            provider,
            target,
            interval,
            call_timeout: CALL_TIMEOUT,
            state,
        }
    }

    pub fn state(&self) -> BridgeState {
        *self.state.borrow()
    }

    /// Permet de suivre les transitions d'état
    pub fn subscribe(&self) -> watch::Receiver<BridgeState> {
        self.state.subscribe()
    }

    /// Remplace le délai des appels distants ([`CALL_TIMEOUT`] par défaut)
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    fn set_state(&self, state: BridgeState) {
        debug!("Bridge state: {:?}", state);
        self.state.send_replace(state);
    }

    /// Fait tourner la boucle jusqu'à `shutdown`, puis restaure et ferme
    ///
    /// Retourne toujours [`BridgeState::Stopped`], même si la restauration échoue.
    pub async fn run<S>(&self, shutdown: S) -> BridgeState
    where
        S: Future<Output = ()>,
    {
        let loop_token = CancellationToken::new();
        self.set_state(BridgeState::Running);
        info!("🔄 Bridge running, updating bio every {:?}", self.interval);

        let poll = self.poll_loop(loop_token.clone());
        tokio::pin!(poll);

        tokio::select! {
            _ = &mut poll => {
                warn!("Polling loop ended on its own");
                self.set_state(BridgeState::ShuttingDown);
            }
            _ = shutdown => {
                info!("Shutdown requested, finishing current update");
                self.set_state(BridgeState::ShuttingDown);
                loop_token.cancel();
                poll.await;
            }
        }

        self.restore().await;
        self.target.close().await;

        self.set_state(BridgeState::Stopped);
        info!("Bridge stopped");
        BridgeState::Stopped
    }

    async fn poll_loop(&self, cancel: CancellationToken) {
        while !cancel.is_cancelled() {
            self.tick().await;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// Un cycle : lecture de la piste, formatage, écriture de la bio
    ///
    /// Les erreurs sont journalisées et n'interrompent jamais la boucle.
    pub async fn tick(&self) {
        let result = tokio::time::timeout(self.call_timeout, self.provider.now_playing())
            .await
            .unwrap_or_else(|_| {
                Err(anyhow!(
                    "no answer from the music service within {:?}",
                    self.call_timeout
                ))
            });
        if let Err(e) = &result {
            warn!("Failed to get current track: {:#}", e);
        }

        let status = status_for(&result);
        match tokio::time::timeout(self.call_timeout, self.target.set_bio(&status)).await {
            Ok(Ok(())) => info!("Bio updated: {}", status),
            Ok(Err(e)) => error!("Failed to update bio: {:#}", e),
            Err(_) => error!("Bio update timed out after {:?}", self.call_timeout),
        }
    }

    async fn restore(&self) {
        info!("Restoring original bio...");
        match tokio::time::timeout(RESTORE_TIMEOUT, self.target.restore_bio()).await {
            Ok(Ok(())) => info!("✅ Original bio restored"),
            Ok(Err(e)) => error!("Failed to restore original bio: {:#}", e),
            Err(_) => error!("Restoring original bio timed out after {:?}", RESTORE_TIMEOUT),
        }
    }
}
