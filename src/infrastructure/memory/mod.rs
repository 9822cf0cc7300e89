//! Memory Layer - In-Memory State Management
//!
//! 进程级播放状态持有者

mod state_holder;

pub use state_holder::PlaybackStateHolder;
