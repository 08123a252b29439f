mod health;
pub mod irc;
pub mod runtime;
mod startup;
pub mod traits;

pub use irc::IrcChannel;
pub use startup::{build_formatter, dispatch, doctor_channels, handle_message, start_channels};
pub use traits::{Channel, ChannelMessage};
