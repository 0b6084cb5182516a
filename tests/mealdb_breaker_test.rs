// ABOUTME: Integration tests for the TheMealDB cross-origin breaker latch
// ABOUTME: Covers the untripped-to-tripped transition from real transport and decode failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Leafy

use leafy_core::config::LeafyConfig;
use leafy_core::pacing::NoopPacer;
use leafy_core::providers::mealdb::MealDbClient;
use leafy_core::RecipeSource;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

fn client_for(base_url: String) -> MealDbClient {
    let config = LeafyConfig {
        mealdb_base_url: base_url,
        ..LeafyConfig::default()
    };
    MealDbClient::new(&config, Arc::new(NoopPacer))
}

/// Serve exactly one HTTP response on a local port, then stop listening.
fn serve_once(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf);
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn connection_failure_trips_breaker_and_later_calls_short_circuit() {
    // Nothing listens on port 1; the first call fails at the transport level.
    let client = client_for("http://127.0.0.1:1".to_owned());
    assert!(!client.breaker().is_tripped());

    let err = client.search("soup").await.unwrap_err();
    assert!(err.is_cross_origin());
    assert!(client.breaker().is_tripped());

    // The latch is one-way; subsequent calls fail without network activity.
    let err = client.get_by_id(52_772).await.unwrap_err();
    assert!(err.is_cross_origin());
    assert!(err.to_string().contains("breaker open"));
}

#[tokio::test]
async fn undecodable_body_trips_breaker() {
    // A 200 response whose body is not the expected envelope.
    let client = client_for(serve_once("not json!"));
    assert!(!client.breaker().is_tripped());

    let err = client.search("soup").await.unwrap_err();
    assert!(err.is_cross_origin());
    assert!(client.breaker().is_tripped());

    // The server is gone, but the latch answers before any I/O happens.
    let err = client.search("soup").await.unwrap_err();
    assert!(err.to_string().contains("breaker open"));
}
