//! # tgbspotify - Client Spotify pour TGBio
//!
//! Cette crate fournit un client Rust minimal pour la Web API Spotify : juste
//! ce qu'il faut pour savoir ce que l'utilisateur écoute.
//!
//! ## Vue d'ensemble
//!
//! - Autorisation OAuth « authorization code » avec écouteur local de callback
//! - Cache du token sur disque (`spotify_token.json`, permissions privées)
//! - Rafraîchissement transparent de l'access token pendant le polling
//! - Lecture de la piste en cours (`/me/player/currently-playing`)
//!
//! ## Structure des modules
//!
//! ```text
//! tgbspotify/
//! ├── src/
//! │   ├── lib.rs              # Module principal (ce fichier)
//! │   ├── client.rs           # Client haut-niveau
//! │   ├── callback.rs         # Écouteur du callback OAuth
//! │   ├── token_store.rs      # Persistance du token
//! │   ├── models.rs           # Structures de données
//! │   ├── api/
//! │   │   ├── mod.rs          # Client HTTP bas-niveau
//! │   │   ├── auth.rs         # Autorisation et échange de tokens
//! │   │   ├── player.rs       # Lecture en cours
//! │   │   └── user.rs         # Utilisateur courant
//! │   └── error.rs            # Gestion des erreurs
//! ```
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use tgbspotify::{SpotifyApi, SpotifyClient, TokenStore};
//!
//! #[tokio::main]
//! async fn main() -> tgbspotify::Result<()> {
//!     let api = SpotifyApi::new("client-id", "client-secret")?;
//!     let client = SpotifyClient::new(api, TokenStore::new("spotify_token.json"));
//!
//!     client.authenticate().await?;
//!     match client.get_current_track().await? {
//!         Some(track) if track.is_playing => println!("{}", track.name),
//!         _ => println!("nothing playing"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Port de callback
//!
//! L'URL de redirection est fixe (`http://127.0.0.1:8080/callback`) et doit
//! être déclarée telle quelle dans l'application Spotify. Si le port 8080 est
//! occupé, l'autorisation échoue : il n'y a pas de port de repli.

pub mod api;
pub mod callback;
pub mod client;
pub mod error;
pub mod models;
pub mod token_store;

pub use api::{ApiOptions, SpotifyApi};
pub use callback::{CallbackOptions, PendingAuthorization};
pub use client::SpotifyClient;
pub use error::{Result, SpotifyError};
pub use models::{CurrentTrack, Token, User};
pub use token_store::TokenStore;
