use chrono::{Duration as ChronoDuration, Utc};
use mockito::{Matcher, Server, ServerGuard};
use tgbspotify::{ApiOptions, SpotifyApi, SpotifyClient, SpotifyError, Token, TokenStore};

fn api_for(server: &ServerGuard) -> SpotifyApi {
    SpotifyApi::with_options(
        "client-id",
        "client-secret",
        ApiOptions {
            accounts_url: server.url(),
            api_url: format!("{}/v1", server.url()),
            ..ApiOptions::default()
        },
    )
    .unwrap()
}

fn client_with_token(
    server: &ServerGuard,
    dir: &tempfile::TempDir,
    expires_in: i64,
) -> (SpotifyClient, TokenStore) {
    let store = TokenStore::new(dir.path().join("spotify_token.json"));
    store
        .save(&Token {
            access_token: "access".into(),
            token_type: "Bearer".into(),
            refresh_token: "refresh".into(),
            expiry: Utc::now() + ChronoDuration::seconds(expires_in),
        })
        .unwrap();
    (SpotifyClient::new(api_for(server), store.clone()), store)
}

#[tokio::test]
async fn playing_track_is_reported() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/me/player/currently-playing")
        .match_header("authorization", "Bearer access")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"is_playing":true,"currently_playing_type":"track","item":{"name":"Song A","artists":[{"name":"Artist B"}]}}"#,
        )
        .expect(2)
        .create_async()
        .await;

    let dir = tempfile::tempdir()?;
    let (client, _) = client_with_token(&server, &dir, 3600);

    // No local caching: every call reaches the API
    for _ in 0..2 {
        let track = client.get_current_track().await?.expect("track");
        assert!(track.is_playing);
        assert_eq!(track.name, "Song A");
        assert_eq!(track.artist.as_deref(), Some("Artist B"));
    }
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn no_content_means_nothing_playing() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/me/player/currently-playing")
        .with_status(204)
        .create_async()
        .await;

    let dir = tempfile::tempdir()?;
    let (client, _) = client_with_token(&server, &dir, 3600);
    assert_eq!(client.get_current_track().await?, None);
    Ok(())
}

#[tokio::test]
async fn paused_track_is_not_playing() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/me/player/currently-playing")
        .with_status(200)
        .with_body(r#"{"is_playing":false,"item":{"name":"Song A","artists":[{"name":"Artist B"}]}}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir()?;
    let (client, _) = client_with_token(&server, &dir, 3600);
    let track = client.get_current_track().await?.expect("track");
    assert!(!track.is_playing);
    Ok(())
}

#[tokio::test]
async fn api_errors_are_surfaced() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/me/player/currently-playing")
        .with_status(401)
        .with_body(r#"{"error":{"status":401,"message":"The access token expired"}}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir()?;
    let (client, _) = client_with_token(&server, &dir, 3600);
    let err = client.get_current_track().await.unwrap_err();
    assert!(err.is_auth_error());
    Ok(())
}

#[tokio::test]
async fn unauthenticated_client_errors() -> anyhow::Result<()> {
    let server = Server::new_async().await;
    let dir = tempfile::tempdir()?;
    let client = SpotifyClient::new(
        api_for(&server),
        TokenStore::new(dir.path().join("spotify_token.json")),
    );
    assert!(matches!(
        client.get_current_track().await.unwrap_err(),
        SpotifyError::NotAuthenticated
    ));
    Ok(())
}

#[tokio::test]
async fn expired_token_is_refreshed_before_polling() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let refresh = server
        .mock("POST", "/api/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
            Matcher::UrlEncoded("refresh_token".into(), "refresh".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"access_token":"renewed","token_type":"Bearer","expires_in":3600}"#)
        .expect(1)
        .create_async()
        .await;
    let playing = server
        .mock("GET", "/v1/me/player/currently-playing")
        .match_header("authorization", "Bearer renewed")
        .with_status(204)
        .expect(2)
        .create_async()
        .await;

    let dir = tempfile::tempdir()?;
    let (client, store) = client_with_token(&server, &dir, -60);

    assert_eq!(client.get_current_track().await?, None);
    assert_eq!(client.get_current_track().await?, None);

    refresh.assert_async().await;
    playing.assert_async().await;

    let saved = store.load().expect("token");
    assert_eq!(saved.access_token, "renewed");
    assert_eq!(saved.refresh_token, "refresh");
    Ok(())
}
