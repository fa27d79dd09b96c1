pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{ChatError, ChatPolicy, ConversationState, Phase, UtteranceKind};
pub use services::ranking::{rank, LocationMode, RankOptions};
pub use services::session::ChatService;
