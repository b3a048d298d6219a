//! The reference platform adapter (§4.F): Win32 window enumeration,
//! monitor queries, the `SetWinEventHook` event thread, cursor polling,
//! and the DWM cloaking-thumbnail display proxy.

/// The [`scrollwm_core::PlatformAdapter`] implementation wiring every
/// module in this crate together.
pub mod adapter;

/// `SetConsoleCtrlHandler`-based Ctrl+C handling.
pub mod ctrl_c;

/// Cursor position polling for cursor-follows-focus.
pub mod cursor;

/// Win32 window enumeration and the manageability filter.
pub mod enumerate;

/// Win32 event translation.
pub mod event;

/// Win32 event loop (`SetWinEventHook` + message pump).
pub mod event_loop;

/// Monitor enumeration via `EnumDisplayMonitors`.
pub mod monitor;

/// Display-proxy cloaking thumbnail.
pub mod thumbnail;

/// Thin `HWND` query helpers.
pub mod window;

pub use adapter::WindowsAdapter;
pub use enumerate::enumerate_windows;
