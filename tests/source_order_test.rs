use std::sync::{Arc, Mutex};

use covergen::fetcher::resolve_cover;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// Accepts connections forever, records each request line under a source tag
// and answers 404 so every lookup degrades to "no cover here".
async fn record_requests(listener: TcpListener, tag: &'static str, log: Arc<Mutex<Vec<String>>>) {
    loop {
        let Ok((mut stream, _)) = listener.accept().await else {
            return;
        };
        let log = Arc::clone(&log);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 2048];
            let n = stream.read(&mut buf).await.unwrap_or(0);
            let head = String::from_utf8_lossy(&buf[..n]);
            let line = head.lines().next().unwrap_or("").to_string();
            log.lock().unwrap().push(format!("{tag} {line}"));
            let _ = stream
                .write_all(b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .await;
        });
    }
}

#[tokio::test]
async fn test_sources_are_tried_in_fallback_order() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let registry = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let search = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let registry_addr = registry.local_addr().unwrap();
    let search_addr = search.local_addr().unwrap();
    tokio::spawn(record_requests(registry, "openlibrary", Arc::clone(&log)));
    tokio::spawn(record_requests(search, "googlebooks", Arc::clone(&log)));

    unsafe {
        std::env::set_var("OPENLIBRARY_API_URL", format!("http://{registry_addr}"));
        std::env::set_var("OPENLIBRARY_COVERS_URL", format!("http://{registry_addr}"));
        std::env::set_var("GOOGLEBOOKS_API_URL", format!("http://{search_addr}"));
    }

    let dir = TempDir::new().unwrap();
    let resolved = resolve_cover(
        dir.path(),
        Some("9780743273565"),
        Some("The Great Gatsby"),
        Some("F. Scott Fitzgerald"),
    )
    .await;
    assert_eq!(resolved, None);

    // Every source came up empty, so all three lookups must have happened:
    // Open Library by identifier first, then the Google Books identifier
    // query, then the Google Books title/author query.
    let requests = log.lock().unwrap().clone();
    assert_eq!(requests.len(), 3, "requests seen: {requests:?}");
    assert!(
        requests[0].starts_with("openlibrary GET /isbn/9780743273565.json"),
        "first request was {}",
        requests[0]
    );
    assert!(
        requests[1].starts_with("googlebooks GET /volumes?q=isbn:9780743273565"),
        "second request was {}",
        requests[1]
    );
    assert!(
        requests[2].starts_with("googlebooks GET /volumes?q=intitle"),
        "third request was {}",
        requests[2]
    );
}
