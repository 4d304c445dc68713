//! Initialisation du système de logging

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Options de configuration du logging
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Niveau appliqué quand `RUST_LOG` n'est pas défini
    pub default_level: String,
    /// Couleurs ANSI dans la sortie console
    pub with_ansi: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            with_ansi: true,
        }
    }
}

/// Installe le subscriber global `tracing`
///
/// Le filtre est lu depuis `RUST_LOG`; à défaut, `options.default_level` est
/// utilisé. Un second appel est sans effet (le premier subscriber reste actif).
///
/// # Exemple
///
/// ```rust,no_run
/// use tgbserver::logs::{init_logging, LoggingOptions};
///
/// init_logging(LoggingOptions::default());
/// ```
pub fn init_logging(options: LoggingOptions) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_level));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(options.with_ansi),
        )
        .try_init();

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_init_is_harmless() {
        init_logging(LoggingOptions::default());
        init_logging(LoggingOptions {
            default_level: "debug".into(),
            with_ansi: false,
        });
        tracing::info!("still logging");
    }
}
