use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use furqaan_search_core::gateway::{GatewayError, HttpSearchGateway, SearchGateway};
use url::Url;

/// Serves one canned HTTP response and returns the raw request it received.
fn serve_once(status_line: &str, body: &str) -> (Url, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0_u8; 1024];
        loop {
            let read = stream.read(&mut buf).unwrap();
            request.extend_from_slice(&buf[..read]);
            if read == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        stream.write_all(response.as_bytes()).unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });

    (Url::parse(&format!("http://{addr}")).unwrap(), handle)
}

fn gateway(base: Url) -> HttpSearchGateway {
    HttpSearchGateway::new(base, Duration::from_secs(5)).unwrap()
}

#[test]
fn decodes_search_payload_and_encodes_term() {
    let body = r#"{
        "results": {
            "blogs": [{"_id": "b1", "title": "History of the Caliphate", "content": "..."}],
            "videos": [{"_id": "v1", "title": "Seerah lecture", "thumbnail": "https://i.example/v1.jpg"}],
            "qna": [{"_id": "q1", "question": "Who compiled the hadith?"}]
        },
        "totalResults": 3
    }"#;
    let (base, server) = serve_once("200 OK", body);

    let payload = gateway(base).search("Islamic History").unwrap();
    let request = server.join().unwrap();

    assert!(request.starts_with("GET /search?q=Islamic%20History HTTP/1.1"));
    assert_eq!(payload.total_results, 3);
    assert_eq!(payload.results.blogs[0].id, "b1");
    assert_eq!(payload.results.videos[0].thumbnail.as_deref(), Some("https://i.example/v1.jpg"));
    assert!(payload.results.qna[0].answer.is_none());
}

#[test]
fn non_success_status_is_backend_error_with_body() {
    let (base, server) = serve_once("500 Internal Server Error", r#"{"message":"db down"}"#);

    let result = gateway(base).search("Hajj");
    server.join().unwrap();

    match result {
        Err(GatewayError::Backend { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body.as_deref(), Some(r#"{"message":"db down"}"#));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn empty_error_body_is_dropped() {
    let (base, server) = serve_once("404 Not Found", "");

    let result = gateway(base).search("Zakat");
    server.join().unwrap();

    match result {
        Err(GatewayError::Backend { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.is_none());
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn malformed_body_is_decode_error() {
    let (base, server) = serve_once("200 OK", "<html>maintenance</html>");

    let result = gateway(base).search("Fiqh");
    server.join().unwrap();

    assert!(matches!(result, Err(GatewayError::Decode(_))));
}

#[test]
fn refused_connection_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let result = gateway(base).search("Ramadan");

    assert!(matches!(result, Err(GatewayError::Network(_))));
}
