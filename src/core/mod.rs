pub mod agent;
pub mod matcher;
pub mod router;

pub use agent::ChatAgent;
pub use matcher::MatchMode;
pub use router::{Reply, ReplySource, Router};
