use anyhow::Context;
use std::process::ExitCode;
use tgbconfig::ConfigStore;
use tgbio::Bridge;
use tgbio::signals::shutdown_signal;
use tgbserver::{LoggingOptions, init_logging};
use tgbspotify::SpotifyClient;
use tgbtelegram::{BioController, MtprotoBackend, TerminalCredentials};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging(LoggingOptions::default());

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    // ========== PHASE 1 : Configuration ==========
    info!("🚀 Starting TGBio...");
    let store = ConfigStore::open("").context("Failed to open config directory")?;
    let config = store.load().context("Failed to load config")?;

    // ========== PHASE 2 : Telegram ==========
    // La bio d'origine doit être capturée avant le premier tick
    info!("📱 Connecting to Telegram...");
    let backend = MtprotoBackend::from_config(&config, &store)
        .await
        .context("Failed to create Telegram client")?;
    let telegram = BioController::new(backend);

    let credentials = TerminalCredentials::new(config.telegram_phone.clone());
    if let Err(e) = telegram.authenticate(&credentials).await {
        telegram.close().await;
        return Err(e).context("Telegram authentication failed");
    }
    info!("✅ Telegram ready, original bio: {:?}", telegram.original_bio());

    // ========== PHASE 3 : Spotify ==========
    info!("🎵 Connecting to Spotify...");
    let spotify = match SpotifyClient::from_config(&config, &store) {
        Ok(client) => client,
        Err(e) => {
            telegram.close().await;
            return Err(e).context("Failed to create Spotify client");
        }
    };
    if let Err(e) = spotify.authenticate().await {
        // La bio n'a pas encore été modifiée : rien à restaurer
        telegram.close().await;
        return Err(e).context("Spotify authentication failed");
    }
    info!("✅ Spotify ready");

    // ========== PHASE 4 : Boucle ==========
    let bridge = Bridge::new(spotify, telegram, config.poll_interval());
    info!("✅ TGBio is running!");
    info!("Press Ctrl+C to stop...");
    bridge.run(shutdown_signal()).await;

    Ok(())
}
