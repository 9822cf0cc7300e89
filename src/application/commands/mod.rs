//! 应用层 - 命令（写操作）
//!
//! 播放控制命令，统一经由控制器邮箱处理

mod playback_commands;

pub use playback_commands::*;
