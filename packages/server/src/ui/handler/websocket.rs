//! WebSocket connection handlers.
//!
//! Each socket gets a writer task draining the session's outbound channel
//! and a reader task feeding parsed frames to the room. Whichever ends first
//! aborts the other, then the session is closed.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{infrastructure::dto::websocket::ClientFrame, ui::state::AppState};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Outbound frames are queued here until the writer task picks them up
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let room = state.room.clone();
    let session_id = room.accept(Box::new(tx)).await;

    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    let recv_room = room.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!(session_id = %session_id, "WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    if let Some(frame) = ClientFrame::parse(text.as_str()) {
                        recv_room.handle_frame(session_id, frame).await;
                    }
                }
                Message::Close(_) => {
                    tracing::debug!(session_id = %session_id, "Client requested close");
                    break;
                }
                // Ping/pong is handled by the WebSocket protocol
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    room.close(session_id).await;
}
