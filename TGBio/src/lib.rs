//! # TGBio - Statut Spotify dans la bio Telegram
//!
//! Affiche la piste en cours de lecture sur Spotify dans la bio d'un compte
//! Telegram, puis remet la bio d'origine à l'arrêt.
//!
//! - [`status`] : texte affiché pour une piste
//! - [`bridge`] : boucle de polling et séquence d'arrêt
//! - [`signals`] : signaux d'arrêt du système

pub mod bridge;
pub mod signals;
pub mod status;

pub use bridge::{BioTarget, Bridge, BridgeState, NowPlaying};
pub use status::format_status;
