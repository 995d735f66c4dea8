//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から `ChatRoom` を通じて呼び出され、Domain 層を操作します。
//! すべてのユースケースは `RoomContext` の排他ロックを保持した状態で実行されます。

pub mod broadcast;
pub mod connect_session;
pub mod context;
pub mod disconnect_session;
pub mod error;
pub mod identify;
pub mod retract_message;
pub mod room;
pub mod send_message;
pub mod status;
pub mod typing;

#[cfg(test)]
pub(crate) mod test_support;

pub use broadcast::SessionRegistry;
pub use connect_session::ConnectSessionUseCase;
pub use context::{RoomContext, RoomState};
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{IdentifyError, RetractMessageError, SendMessageError, TypingError};
pub use identify::{IdentifyOutcome, IdentifyUseCase, IdentityRequest};
pub use retract_message::RetractMessageUseCase;
pub use room::{ChatRoom, GLOBAL_ROOM_NAME};
pub use send_message::SendMessageUseCase;
pub use status::{RoomStatus, RoomStatusUseCase};
pub use typing::TypingUseCase;
