//! Router construction and the server loop.

use std::{path::Path, sync::Arc};

use axum::{Router, routing::get};
use hiroba_shared::time::SystemClock;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::{
    handler::{health_check, room_snapshot, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};
use crate::{
    config::ServerArgs,
    domain::RoomPolicy,
    error::ServerError,
    infrastructure::repository::DurableRoomStateRepository,
    usecase::{ChatRoom, GLOBAL_ROOM_NAME, RoomContext},
};

/// Routes: the room socket, the JSON API, and static files for everything else
pub fn build_router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/room", get(room_snapshot))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the durable store, create the room and wire up the router.
pub async fn build_app(args: &ServerArgs) -> Result<Router, ServerError> {
    let store = args.open_store().await?;
    let repository = Arc::new(DurableRoomStateRepository::new(store));
    let context = RoomContext::new(
        repository,
        Arc::new(SystemClock),
        RoomPolicy::default(),
        args.name_rng(),
    );
    let state = Arc::new(AppState {
        room: Arc::new(ChatRoom::new(GLOBAL_ROOM_NAME, context)),
    });
    Ok(build_router(state, &args.static_dir))
}

/// Run the server until a shutdown signal arrives.
pub async fn run(args: ServerArgs) -> Result<(), ServerError> {
    let app = build_app(&args).await?;

    let addr = args.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Listening on {}", addr);
    tracing::info!("Serving static files from {}", args.static_dir.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}
