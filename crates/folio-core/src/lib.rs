pub mod actions;
pub mod config;
pub mod files;
pub mod persistence;
pub mod preview;
pub mod reducer;
pub mod reveal;
pub mod state;
pub mod terminal;

pub use actions::*;
pub use config::Config;
pub use persistence::*;
pub use reducer::*;
pub use state::*;
