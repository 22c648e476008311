//! Application services for the chat room.

mod room;

pub use room::{
    ChatRoomService, ChatServiceError, ChatServiceResult, HISTORY_DEFAULT_LIMIT,
    RECENT_DEFAULT_LIMIT,
};
