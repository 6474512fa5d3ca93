// Game layer: characters, levels and the per-tick session driver

pub mod characters;
pub mod level;
pub mod session;

pub use level::{LevelConfig, LevelError};
pub use session::GameSession;
