pub mod events;
pub mod judge;
pub mod note;
pub mod playback;
pub mod recorder;
pub mod score;
pub mod scroll;
pub mod session;
pub mod solo;
pub mod turn;
