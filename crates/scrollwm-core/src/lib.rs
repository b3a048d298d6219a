pub mod action;
pub mod adapter;
pub mod command;
pub mod config;
pub mod error;
pub mod fake;
pub mod layout;
pub mod log;
pub mod manager;
pub mod model;
pub mod pid;
pub mod reactor;
pub mod rect;

pub use action::Action;
pub use adapter::{MonitorInfo, PlatformAdapter, WindowEvent};
pub use command::parse_line;
pub use config::Config;
pub use error::WmResult;
pub use manager::WindowManager;
pub use model::{Monitor, PlatformData, Window, WindowId, Workspace, WorkspaceId, World};
pub use reactor::EventSource;
pub use rect::Rect;
