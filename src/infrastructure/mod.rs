//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现，以及播放运行时的装配

pub mod adapters;
pub mod events;
pub mod http;
pub mod memory;
pub mod mount;
pub mod runtime;
pub mod selection;
pub mod worker;

pub use events::{EventPublisher, PlaybackEvent};
pub use memory::PlaybackStateHolder;
pub use mount::GlobalControllerMount;
pub use runtime::{PlaybackRuntime, PlaybackRuntimeConfig};
pub use selection::{InMemorySelectionSource, SelectionWatcher};
pub use worker::PlaybackController;
