//! API du lecteur : ce qui est en cours de lecture

use super::SpotifyApi;
use crate::error::Result;
use crate::models::{CurrentTrack, CurrentlyPlaying};

impl SpotifyApi {
    /// Interroge `/me/player/currently-playing`
    ///
    /// Retourne `None` si rien n'est en lecture (204) ou si l'élément est absent
    /// (publicité, session privée).
    pub async fn currently_playing(&self, access_token: &str) -> Result<Option<CurrentTrack>> {
        let response: Option<CurrentlyPlaying> =
            self.get(access_token, "/me/player/currently-playing").await?;
        Ok(response.and_then(CurrentTrack::from_response))
    }
}
