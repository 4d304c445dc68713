//! Source of the operator-supplied login secrets

use crate::error::{Result, TelegramError};
use async_trait::async_trait;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Supplies the phone number, login code and two-factor password
///
/// The login flow only calls these when it needs them, so an implementation
/// may block on the operator.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn phone(&self) -> Result<String>;

    /// Login code sent by Telegram to the operator's other devices
    async fn code(&self) -> Result<String>;

    /// Two-factor password; an empty answer is allowed
    async fn password(&self) -> Result<String>;
}

/// Asks the operator on the controlling terminal
#[derive(Debug, Clone)]
pub struct TerminalCredentials {
    phone: String,
}

impl TerminalCredentials {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for TerminalCredentials {
    async fn phone(&self) -> Result<String> {
        Ok(self.phone.clone())
    }

    async fn code(&self) -> Result<String> {
        tokio::task::spawn_blocking(|| {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            read_code(&mut input, &mut io::stdout())
        })
        .await
        .map_err(|e| TelegramError::Other(format!("code prompt task failed: {}", e)))?
    }

    async fn password(&self) -> Result<String> {
        let answer =
            tokio::task::spawn_blocking(|| rpassword::prompt_password("Telegram two-factor password: "))
                .await
                .map_err(|e| TelegramError::Other(format!("password prompt task failed: {}", e)))?;
        Ok(password_or_empty(answer))
    }
}

/// Without a terminal to ask on, the password is empty
fn password_or_empty(answer: io::Result<String>) -> String {
    answer.unwrap_or_else(|e| {
        warn!("Cannot read the two-factor password ({}), sending an empty one", e);
        String::new()
    })
}

/// Reads a non-empty login code, asking again on empty lines
pub fn read_code<R, W>(input: &mut R, output: &mut W) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "Enter the code sent by Telegram: ").map_err(TelegramError::Prompt)?;
        output.flush().map_err(TelegramError::Prompt)?;

        let mut line = String::new();
        let read = input.read_line(&mut line).map_err(TelegramError::Prompt)?;
        if read == 0 {
            return Err(TelegramError::Prompt(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before a code was entered",
            )));
        }

        let code = line.trim();
        if !code.is_empty() {
            return Ok(code.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_code_skips_blank_lines() {
        let mut input = Cursor::new("\n   \n 12345 \n");
        let mut output = Vec::new();
        assert_eq!(read_code(&mut input, &mut output).unwrap(), "12345");
        assert_eq!(
            String::from_utf8(output).unwrap().matches("Enter the code").count(),
            3
        );
    }

    #[test]
    fn test_read_code_eof() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(matches!(
            read_code(&mut input, &mut output),
            Err(TelegramError::Prompt(_))
        ));
    }

    #[test]
    fn test_missing_terminal_gives_empty_password() {
        let no_tty = io::Error::new(io::ErrorKind::NotFound, "No such device or address");
        assert_eq!(password_or_empty(Err(no_tty)), "");
        assert_eq!(password_or_empty(Ok("hunter2".to_string())), "hunter2");
    }

    #[tokio::test]
    async fn test_terminal_phone() {
        let creds = TerminalCredentials::new("+33600000000");
        assert_eq!(creds.phone().await.unwrap(), "+33600000000");
    }
}
