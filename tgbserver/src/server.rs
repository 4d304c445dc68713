//! # Module Server - API de haut niveau pour Axum
//!
//! Ce module fournit une abstraction simple pour créer un serveur HTTP local,
//! le démarrer en tâche de fond et l'arrêter proprement une fois son travail
//! terminé.
//!
//! ## Fonctionnalités
//!
//! - 🎯 **Handlers avec état** : `add_handler_with_state()`
//! - 🔌 **Port éphémère** : `start()` retourne l'adresse réellement liée (utile avec le port 0)
//! - ⚡ **Arrêt gracieux** : `stop()` laisse les requêtes en cours se terminer

use axum::Router;
use axum::handler::Handler;
use axum::routing::get;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Temps maximal accordé aux requêtes en cours lors de l'arrêt
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Erreurs du serveur HTTP
#[derive(Error, Debug)]
pub enum ServerError {
    /// Impossible d'écouter sur l'adresse demandée (port déjà utilisé, etc.)
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Info serveur
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub addr: SocketAddr,
    pub running: bool,
}

/// Serveur HTTP local
pub struct Server {
    name: String,
    addr: SocketAddr,
    router: Router,
    local_addr: Option<SocketAddr>,
    shutdown: CancellationToken,
    join_handle: Option<JoinHandle<()>>,
}

impl Server {
    /// Crée une nouvelle instance de serveur
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur (pour les logs)
    /// * `addr` - Adresse d'écoute (port 0 pour un port choisi par l'OS)
    pub fn new(name: impl Into<String>, addr: SocketAddr) -> Self {
        Self {
            name: name.into(),
            addr,
            router: Router::new(),
            local_addr: None,
            shutdown: CancellationToken::new(),
            join_handle: None,
        }
    }

    /// Ajoute un handler GET avec état
    pub fn add_handler_with_state<H, T, S>(&mut self, path: &str, handler: H, state: S)
    where
        H: Handler<T, S> + Clone + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        let route = Router::new().route(path, get(handler)).with_state(state);
        self.router = std::mem::take(&mut self.router).merge(route);
    }

    /// Démarre le serveur HTTP en tâche de fond
    ///
    /// Retourne l'adresse effectivement liée. Le serveur tourne jusqu'à
    /// l'appel de [`Server::stop`].
    pub async fn start(&mut self) -> Result<SocketAddr, ServerError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr,
                source,
            })?;
        let local_addr = listener.local_addr()?;
        info!("Server {} running at http://{}", self.name, local_addr);

        let router = self.router.clone();
        let shutdown = self.shutdown.clone().cancelled_owned();
        let name = self.name.clone();
        self.join_handle = Some(tokio::spawn(async move {
            let result = axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(shutdown)
                .await;
            match result {
                Ok(()) => info!("Server {} stopped", name),
                Err(e) => warn!("Server {} stopped with error: {}", name, e),
            }
        }));

        self.local_addr = Some(local_addr);
        Ok(local_addr)
    }

    /// Arrête le serveur et attend la fin des requêtes en cours
    ///
    /// Au-delà de quelques secondes, la tâche du serveur est interrompue.
    pub async fn stop(&mut self) {
        self.shutdown.cancel();
        if let Some(mut handle) = self.join_handle.take() {
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await.is_err() {
                warn!("Server {} did not stop in time, aborting", self.name);
                handle.abort();
            }
        }
    }

    /// Récupère les infos du serveur
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            name: self.name.clone(),
            addr: self.local_addr.unwrap_or(self.addr),
            running: self.join_handle.is_some(),
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;

    async fn echo(State(word): State<&'static str>) -> &'static str {
        word
    }

    #[tokio::test]
    async fn test_start_serve_stop() {
        let mut server = Server::new("test", ([127, 0, 0, 1], 0).into());
        server.add_handler_with_state("/word", echo, "bird");

        let addr = server.start().await.unwrap();
        assert_ne!(addr.port(), 0);
        assert!(server.info().running);

        let body = reqwest::get(format!("http://{}/word", addr))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "bird");

        server.stop().await;
        assert!(!server.info().running);
        assert!(reqwest::get(format!("http://{}/word", addr)).await.is_err());
    }

    #[tokio::test]
    async fn test_port_in_use_is_reported() {
        let mut first = Server::new("first", ([127, 0, 0, 1], 0).into());
        let addr = first.start().await.unwrap();

        let mut second = Server::new("second", addr);
        let err = second.start().await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { .. }));

        first.stop().await;
    }
}
