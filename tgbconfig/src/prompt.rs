//! First-run interactive prompting

use crate::{BridgeConfig, DEFAULT_UPDATE_INTERVAL};
use anyhow::{anyhow, Result};
use std::io::{BufRead, Write};

/// Asks the operator for every field of a [`BridgeConfig`]
///
/// Required fields are asked again until a non-empty answer is given. The
/// proxy may be left empty. The API id and the proxy URL are checked as they
/// are typed, so a bad answer only re-asks that field. The update interval is
/// not asked: the default applies and can be edited in the file afterwards.
pub fn prompt_config<R, W>(input: &mut R, output: &mut W) -> Result<BridgeConfig>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "Configuration file not found. Please enter the following values:")?;

    let spotify_client_id = prompt_required(input, output, "Spotify Client ID")?;
    let spotify_client_secret = prompt_required(input, output, "Spotify Client Secret")?;
    let telegram_api_id = prompt_checked(input, output, "Telegram API ID", |value| {
        if value.is_empty() {
            return Err("Value cannot be empty, please try again".to_string());
        }
        value
            .parse::<i32>()
            .map(|_| ())
            .map_err(|_| "The API ID must be a number, please try again".to_string())
    })?;
    let telegram_api_hash = prompt_required(input, output, "Telegram API Hash")?;
    let telegram_phone = prompt_required(
        input,
        output,
        "Telegram Phone Number (international format, e.g. +33612345678)",
    )?;

    let proxy = prompt_checked(input, output, "HTTP Proxy (leave empty if not needed)", |value| {
        if value.is_empty() {
            return Ok(());
        }
        url::Url::parse(value)
            .map(|_| ())
            .map_err(|e| format!("Invalid proxy URL ({}), please try again", e))
    })?;

    Ok(BridgeConfig {
        spotify_client_id,
        spotify_client_secret,
        telegram_api_id,
        telegram_api_hash,
        telegram_phone,
        update_interval: DEFAULT_UPDATE_INTERVAL,
        http_proxy: if proxy.is_empty() { None } else { Some(proxy) },
    })
}

fn prompt_required<R, W>(input: &mut R, output: &mut W, name: &str) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    prompt_checked(input, output, name, |value| {
        if value.is_empty() {
            Err("Value cannot be empty, please try again".to_string())
        } else {
            Ok(())
        }
    })
}

/// Asks until `check` accepts the answer; its message is shown otherwise
fn prompt_checked<R, W, F>(input: &mut R, output: &mut W, name: &str, check: F) -> Result<String>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> std::result::Result<(), String>,
{
    loop {
        let value = prompt_line(input, output, name)?;
        match check(&value) {
            Ok(()) => return Ok(value),
            Err(message) => writeln!(output, "{}", message)?,
        }
    }
}

fn prompt_line<R, W>(input: &mut R, output: &mut W, name: &str) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{}: ", name)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(anyhow!("input closed while reading {:?}", name));
    }
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_empty_answers_are_asked_again() {
        let mut input = Cursor::new("\n  \nid\nsecret\n42\nhash\n+100\n\n");
        let mut output = Vec::new();
        let config = prompt_config(&mut input, &mut output).unwrap();

        assert_eq!(config.spotify_client_id, "id");
        assert_eq!(config.telegram_api_id, "42");
        assert_eq!(config.http_proxy, None);
        assert_eq!(config.update_interval, DEFAULT_UPDATE_INTERVAL);

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Value cannot be empty").count(), 2);
    }

    #[test]
    fn test_proxy_is_kept_when_given() {
        let mut input = Cursor::new("id\nsecret\n42\nhash\n+100\nhttp://proxy:8080\n");
        let mut output = Vec::new();
        let config = prompt_config(&mut input, &mut output).unwrap();
        assert_eq!(config.http_proxy.as_deref(), Some("http://proxy:8080"));
    }

    #[test]
    fn test_bad_api_id_only_reasks_that_field() {
        let mut input = Cursor::new("id\nsecret\nabc\n\n42\nhash\n+100\n\n");
        let mut output = Vec::new();
        let config = prompt_config(&mut input, &mut output).unwrap();

        assert_eq!(config.spotify_client_id, "id");
        assert_eq!(config.spotify_client_secret, "secret");
        assert_eq!(config.telegram_api_id, "42");
        assert_eq!(config.telegram_api_hash, "hash");
        assert!(config.validate().is_ok());

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("must be a number").count(), 1);
        assert_eq!(text.matches("Value cannot be empty").count(), 1);
        assert_eq!(text.matches("Spotify Client ID:").count(), 1);
    }

    #[test]
    fn test_bad_proxy_is_asked_again() {
        let mut input = Cursor::new("id\nsecret\n42\nhash\n+100\nnot a url\nhttp://proxy:3128\n");
        let mut output = Vec::new();
        let config = prompt_config(&mut input, &mut output).unwrap();

        assert_eq!(config.http_proxy.as_deref(), Some("http://proxy:3128"));
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Invalid proxy URL").count(), 1);
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut input = Cursor::new("id\n");
        let mut output = Vec::new();
        assert!(prompt_config(&mut input, &mut output).is_err());
    }
}
