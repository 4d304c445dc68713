//! # tgbserver - Petit serveur HTTP local basé sur Axum
//!
//! Cette crate fournit l'écouteur HTTP éphémère utilisé pendant l'autorisation
//! OAuth, ainsi que l'initialisation du logging partagée par tout le bridge.
//!
//! ## Architecture
//!
//! - [`server`] : serveur Axum démarrable/arrêtable à la demande
//! - [`logs`] : installation du subscriber `tracing`
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use axum::extract::State;
//! use tgbserver::Server;
//!
//! async fn hello(State(name): State<String>) -> String {
//!     format!("hello {name}")
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tgbserver::ServerError> {
//!     let mut server = Server::new("demo", ([127, 0, 0, 1], 8080).into());
//!     server.add_handler_with_state("/hello", hello, "world".to_string());
//!     let addr = server.start().await?;
//!     println!("listening on {addr}");
//!     server.stop().await;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{LoggingOptions, init_logging};
pub use server::{Server, ServerError, ServerInfo};
