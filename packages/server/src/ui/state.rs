//! Shared application state.

use std::sync::Arc;

use crate::usecase::ChatRoom;

/// State handed to every handler
pub struct AppState {
    /// The singleton room actor
    pub room: Arc<ChatRoom>,
}
