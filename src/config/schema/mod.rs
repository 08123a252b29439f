mod channels;
mod core;

pub use channels::{IrcConfig, is_valid_channel_name};
pub use core::Config;
