//! Runtime configuration types shared by the core and the bridge host.
//!
//! Loading and validating the TOML file is handled by the host crate; these
//! types are the validated result.

mod amount;
mod channel;
mod config_store;

pub use amount::AmountConfig;
pub use channel::ChannelPolicy;
pub use config_store::{ConfigStore, ConfigWatcher};
