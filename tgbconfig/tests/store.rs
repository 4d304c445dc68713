use std::io::Cursor;
use tgbconfig::{BridgeConfig, ConfigStore};

fn sample(proxy: Option<&str>, interval: u64) -> BridgeConfig {
    BridgeConfig {
        spotify_client_id: "client-id".into(),
        spotify_client_secret: "client-secret".into(),
        telegram_api_id: "123456".into(),
        telegram_api_hash: "0123456789abcdef".into(),
        telegram_phone: "+33612345678".into(),
        update_interval: interval,
        http_proxy: proxy.map(str::to_string),
    }
}

#[test]
fn saved_config_loads_back_identical() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = ConfigStore::open(dir.path().to_str().unwrap())?;

    for config in [
        sample(None, 45),
        sample(Some("http://127.0.0.1:3128"), 10),
        sample(Some("socks5://proxy.local:1080"), 1),
    ] {
        store.save(&config)?;
        assert_eq!(store.read()?, config);
    }

    Ok(())
}

#[test]
fn first_run_prompts_and_persists() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = ConfigStore::open(dir.path().to_str().unwrap())?;
    assert!(!store.exists());

    let mut input = Cursor::new("id\nsecret\n777\nhash\n+100\n\n");
    let mut output = Vec::new();
    let config = store.load_or_prompt(&mut input, &mut output)?;

    assert!(store.exists());
    assert_eq!(store.read()?, config);

    let text = std::fs::read_to_string(store.path())?;
    assert!(!text.contains("http_proxy"));

    // Second run reads the file without consuming any input
    let mut empty = Cursor::new("");
    let again = store.load_or_prompt(&mut empty, &mut output)?;
    assert_eq!(again, config);

    Ok(())
}

#[test]
fn malformed_config_is_fatal_and_does_not_prompt() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = ConfigStore::open(dir.path().to_str().unwrap())?;
    std::fs::write(store.path(), "spotify_client_id: [unterminated")?;

    let mut input = Cursor::new("id\nsecret\n777\nhash\n+100\n\n");
    let mut output = Vec::new();
    assert!(store.load_or_prompt(&mut input, &mut output).is_err());
    assert!(output.is_empty());

    Ok(())
}

#[test]
fn incomplete_config_is_fatal() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = ConfigStore::open(dir.path().to_str().unwrap())?;
    std::fs::write(store.path(), "spotify_client_id: only-this\n")?;

    assert!(store.read().is_err());
    Ok(())
}

#[test]
fn open_creates_missing_directory() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let nested = dir.path().join("a").join("b");
    let store = ConfigStore::open(nested.to_str().unwrap())?;

    assert!(nested.is_dir());
    assert_eq!(store.file_path("spotify_token.json"), nested.join("spotify_token.json"));
    Ok(())
}
