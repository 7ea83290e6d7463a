//! Domain entities - Core business objects

pub mod user;
pub mod message;
pub mod command;
pub mod reply;
pub mod feed;

pub use user::User;
pub use message::{Message, MessageType, Content};
pub use command::{Command, CommandHandler, CommandRegistry};
pub use reply::{Reply, ParseMode};
pub use feed::{Block, BlocksFeed, FetchResult, NetworkInfo, NetworkInfoFeed, Rate};
