//! Texte de bio affiché pour une piste
//!
//! Les chaînes sont fixes : les tests et les utilisateurs s'y fient.

use tgbspotify::CurrentTrack;

/// Préfixe de tout statut de lecture
pub const STATUS_PREFIX: &str = "🎵";

/// Statut quand rien n'est en lecture
pub const NOTHING_PLAYING: &str = "Nothing is playing right now";

/// Statut quand la requête à Spotify a échoué
pub const QUERY_FAILED: &str = "Could not retrieve current track";

/// Longueur maximale d'une bio Telegram (en caractères)
pub const MAX_STATUS_CHARS: usize = 70;

/// Formate la piste courante
///
/// `None` ou une piste en pause donnent [`NOTHING_PLAYING`].
pub fn format_status(track: Option<&CurrentTrack>) -> String {
    match track {
        Some(track) if track.is_playing => {
            let status = match &track.artist {
                Some(artist) => format!("{} {} - {}", STATUS_PREFIX, track.name, artist),
                None => format!("{} {}", STATUS_PREFIX, track.name),
            };
            truncate(status)
        }
        _ => NOTHING_PLAYING.to_string(),
    }
}

/// Statut d'un tick de polling, succès ou échec
pub fn status_for<E>(result: &Result<Option<CurrentTrack>, E>) -> String {
    match result {
        Ok(track) => format_status(track.as_ref()),
        Err(_) => QUERY_FAILED.to_string(),
    }
}

fn truncate(status: String) -> String {
    if status.chars().count() <= MAX_STATUS_CHARS {
        return status;
    }
    let mut short: String = status.chars().take(MAX_STATUS_CHARS - 1).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(name: &str, artist: Option<&str>) -> CurrentTrack {
        CurrentTrack {
            is_playing: true,
            name: name.to_string(),
            artist: artist.map(str::to_string),
        }
    }

    #[test]
    fn test_track_and_artist() {
        let track = playing("Song A", Some("Artist B"));
        assert_eq!(format_status(Some(&track)), "🎵 Song A - Artist B");
    }

    #[test]
    fn test_track_without_artist() {
        let track = playing("Interlude", None);
        assert_eq!(format_status(Some(&track)), "🎵 Interlude");
    }

    #[test]
    fn test_nothing_playing() {
        assert_eq!(format_status(None), NOTHING_PLAYING);

        let mut paused = playing("Song A", Some("Artist B"));
        paused.is_playing = false;
        assert_eq!(format_status(Some(&paused)), NOTHING_PLAYING);
    }

    #[test]
    fn test_query_error() {
        let result: Result<Option<CurrentTrack>, &str> = Err("timeout");
        assert_eq!(status_for(&result), QUERY_FAILED);

        let result: Result<Option<CurrentTrack>, &str> = Ok(None);
        assert_eq!(status_for(&result), NOTHING_PLAYING);
    }

    #[test]
    fn test_long_status_is_truncated() {
        let name = "é".repeat(100);
        let status = format_status(Some(&playing(&name, Some("Artist"))));

        assert_eq!(status.chars().count(), MAX_STATUS_CHARS);
        assert!(status.starts_with("🎵 éé"));
        assert!(status.ends_with('…'));
    }

    #[test]
    fn test_status_at_limit_is_kept() {
        // "🎵 " compte pour 2 caractères
        let name = "x".repeat(MAX_STATUS_CHARS - 2);
        let status = format_status(Some(&playing(&name, None)));
        assert_eq!(status.chars().count(), MAX_STATUS_CHARS);
        assert!(!status.ends_with('…'));
    }
}
