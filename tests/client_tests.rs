//! Metadata clients against a throwaway local HTTP server.

use anisheet::clients::{AnimeApiClient, JikanClient};
use anisheet::config::MetadataConfig;
use anisheet::domain::ExternalId;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves one canned response per accepted connection.
async fn serve(responses: Vec<(&'static str, &'static str)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{addr}")
}

fn metadata_config(base: &str) -> MetadataConfig {
    MetadataConfig {
        primary_url: format!("{base}/anime/{{id}}"),
        cross_reference_url: format!("{base}/myanimelist/{{id}}"),
        request_timeout_seconds: 5,
    }
}

#[tokio::test]
async fn jikan_returns_raw_body() {
    let body = r#"{"data":{"mal_id":1535,"episodes":37}}"#;
    let base = serve(vec![("200 OK", body)]).await;
    let client = JikanClient::new(&metadata_config(&base)).unwrap();

    assert_eq!(client.anime_url(ExternalId::new(1535)), format!("{base}/anime/1535"));
    let raw = client.get_anime_raw(ExternalId::new(1535)).await.unwrap();
    assert_eq!(raw.as_deref(), Some(body));
}

#[tokio::test]
async fn not_found_is_none() {
    let base = serve(vec![("404 Not Found", "{}")]).await;
    let client = AnimeApiClient::new(&metadata_config(&base)).unwrap();

    let raw = client.get_mapping_raw(ExternalId::new(99_999_999)).await.unwrap();
    assert!(raw.is_none());
}

#[tokio::test]
async fn server_errors_are_reported() {
    let base = serve(vec![("500 Internal Server Error", "boom")]).await;
    let client = JikanClient::new(&metadata_config(&base)).unwrap();

    let err = client.get_anime_raw(ExternalId::new(1)).await.unwrap_err();
    assert!(err.to_string().contains("Jikan API error: 500"));
}
