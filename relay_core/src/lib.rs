pub mod config;
pub mod gameplay;
pub mod input;
pub mod time;

pub use config::{ConfigError, GameConfig};
pub use gameplay::events::GameEvent;
pub use gameplay::session::Mode;
pub use gameplay::solo::SoloGame;
pub use gameplay::turn::{Match, Role, TurnPrompt};
