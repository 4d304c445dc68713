//! Persistance du token OAuth sur disque

use crate::error::Result;
use crate::models::Token;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Nom du fichier de token, à côté de la configuration
pub const TOKEN_FILE_NAME: &str = "spotify_token.json";

/// Fichier JSON contenant le dernier token obtenu
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Charge le token en cache
    ///
    /// Un fichier absent ou illisible donne `None` : l'autorisation complète
    /// sera alors relancée.
    pub fn load(&self) -> Option<Token> {
        let data = fs::read(&self.path).ok()?;
        match serde_json::from_slice::<Token>(&data) {
            Ok(token) => {
                info!("Loaded cached Spotify token from {}", self.path.display());
                Some(token)
            }
            Err(e) => {
                warn!("Ignoring unreadable token file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Écrit le token (permissions 0600 sous Unix)
    pub fn save(&self, token: &Token) -> Result<()> {
        let data = serde_json::to_vec(token)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        file.write_all(&data)?;
        enforce_private_permissions(&self.path)?;

        info!("Spotify token saved to {}", self.path.display());
        Ok(())
    }
}

/// `mode(0o600)` ne s'applique qu'à la création du fichier
#[cfg(unix)]
fn enforce_private_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn enforce_private_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn token() -> Token {
        Token {
            access_token: "access".into(),
            token_type: "Bearer".into(),
            refresh_token: "refresh".into(),
            expiry: Utc::now() + Duration::seconds(3600),
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join(TOKEN_FILE_NAME));

        assert!(store.load().is_none());
        let token = token();
        store.save(&token).unwrap();
        assert_eq!(store.load(), Some(token));
    }

    #[test]
    fn test_garbage_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join(TOKEN_FILE_NAME));
        std::fs::write(store.path(), b"not json").unwrap();
        assert!(store.load().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOKEN_FILE_NAME);
        std::fs::write(&path, b"{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        TokenStore::new(&path).save(&token()).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
