//! Test fixtures: an in-process server on an ephemeral port.

#![allow(dead_code)]

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hiroba_server::{ServerArgs, ui::build_app};
use serde_json::Value;
use tempfile::TempDir;
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub const INDEX_HTML: &str = "<!doctype html><title>hiroba</title>";

pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
    pub data_file: PathBuf,
    _dir: TempDir,
}

impl TestServer {
    /// Start a server with a JSON data file and a static directory holding `index.html`.
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let static_dir = dir.path().join("public");
        std::fs::create_dir(&static_dir).expect("Failed to create static dir");
        std::fs::write(static_dir.join("index.html"), INDEX_HTML).expect("Failed to write index");
        let data_file = dir.path().join("room.json");

        let args = ServerArgs {
            host: "127.0.0.1".to_string(),
            port: 0,
            static_dir,
            data_file: Some(data_file.clone()),
            log_level: "debug".to_string(),
            name_seed: Some(1),
        };
        let app = build_app(&args).await.expect("Failed to build app");
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            addr,
            handle,
            data_file,
            _dir: dir,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub async fn connect(&self) -> TestClient {
        let (ws, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect");
        TestClient { ws }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl TestClient {
    pub async fn send_json(&mut self, value: Value) {
        self.ws
            .send(Message::text(value.to_string()))
            .await
            .expect("Failed to send");
    }

    /// Next JSON frame, failing the test after 5 seconds
    pub async fn next_frame(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(Duration::from_secs(5), self.ws.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Stream ended")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("Invalid JSON frame");
            }
        }
    }

    /// Skip frames until one of type `kind` arrives
    pub async fn next_of_type(&mut self, kind: &str) -> Value {
        loop {
            let frame = self.next_frame().await;
            if frame["type"] == kind {
                return frame;
            }
        }
    }

    /// Send the identity handshake and wait for the resolved identity
    pub async fn identify(&mut self, id: &str, name: &str) -> Value {
        self.send_json(serde_json::json!({"type": "identity", "id": id, "name": name}))
            .await;
        self.next_of_type("identity").await
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
