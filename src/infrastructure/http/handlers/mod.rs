//! HTTP Handlers

mod ping;
mod playback;
mod selection;
mod websocket;

pub use ping::*;
pub use playback::*;
pub use selection::*;
pub use websocket::*;
