//! Channel-backed connection.
//!
//! Each WebSocket gets an unbounded channel drained by its writer task.
//! Once the writer task ends the receiver is dropped and sends fail.

use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{Connection, ConnectionClosed};

impl Connection for UnboundedSender<String> {
    fn send_text(&self, text: &str) -> Result<(), ConnectionClosed> {
        self.send(text.to_string()).map_err(|_| ConnectionClosed)
    }
}
