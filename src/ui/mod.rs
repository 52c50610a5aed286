pub mod app;
pub mod chat_bubble;
pub mod images;

pub use app::VertexChatApp;
