//! The platform adapter contract (§4.F) and the events it produces.

use crate::model::{WindowId, World};
use crate::Rect;
use crate::error::WmResult;

/// A message the adapter's event thread posts back into the core. Per
/// the design notes, the adapter→core direction is modeled as messages
/// rather than direct callbacks, since events originate on a distinct
/// OS thread: the event loop just pushes these onto a channel that the
/// [`crate::manager::WindowManager`]'s owning thread drains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    Created(WindowId),
    Destroyed(WindowId),
    Moved(WindowId),
    Minimized(WindowId),
    Restored(WindowId),
    ForegroundChanged(WindowId),
    TitleChanged(WindowId),
}

impl WindowEvent {
    pub fn window_id(&self) -> WindowId {
        match *self {
            Self::Created(id)
            | Self::Destroyed(id)
            | Self::Moved(id)
            | Self::Minimized(id)
            | Self::Restored(id)
            | Self::ForegroundChanged(id)
            | Self::TitleChanged(id) => id,
        }
    }
}

/// A snapshot of one monitor as reported by the adapter at startup.
#[derive(Debug, Clone, Copy)]
pub struct MonitorInfo {
    pub rect: Rect,
    pub work_rect: Rect,
}

/// Core → adapter operations (§4.F). `on_window_*` and friends are not
/// trait methods here — see [`WindowEvent`].
pub trait PlatformAdapter {
    /// Performs async startup (hook installation, thread spawn). Returns
    /// once the adapter is ready to answer `monitors()`.
    fn initialize(&mut self) -> WmResult<()>;

    /// A snapshot of every monitor, in adapter-reported order (the core
    /// sorts by `(left, top)` itself when building the `World`).
    fn monitors(&self) -> WmResult<Vec<MonitorInfo>>;

    /// Requests OS focus for `window`, restoring it first if minimized.
    fn focus_window(&mut self, window: WindowId) -> WmResult<()>;

    /// Re-applies layout for `window`'s workspace only.
    fn resize_window(&mut self, window: WindowId) -> WmResult<()>;

    /// Requests a graceful close; the adapter does not wait for it.
    fn close_window(&mut self, window: WindowId) -> WmResult<()>;

    /// Re-applies layout globally: hides every window on an inactive
    /// workspace, lays out each monitor's active workspace.
    fn refresh(&mut self, world: &mut World) -> WmResult<()>;

    /// Launches a detached process; does not mutate the model.
    fn open(&mut self, args: &[String]) -> WmResult<()>;

    /// The current OS cursor position, in screen coordinates. Polled by
    /// the main loop's ticker for cursor-follows-focus (§4.E, §4.H).
    fn cursor_position(&self) -> WmResult<(i32, i32)>;

    /// The window's current OS rectangle, in screen coordinates. Used by
    /// the reactor to place a newly created window's monitor and to keep
    /// a moved window's display proxy in sync.
    fn window_rect(&self, window: WindowId) -> WmResult<Rect>;

    /// Releases resources and detaches hooks. Called exactly once, at
    /// shutdown.
    fn stop(&mut self);

    // -- Display proxy (§4.1, §4.E) --------------------------------
    //
    // A cloaking thumbnail mirror for a hidden window. Default bodies are
    // no-ops: an adapter that doesn't implement interactive previews (or
    // the fake adapter used in tests) can ignore these entirely, since
    // the canonical hide-inactive-workspace path in `refresh()` never
    // calls them.

    /// Registers a display proxy for `window`.
    fn create_proxy(&mut self, _window: WindowId) -> WmResult<()> {
        Ok(())
    }

    /// Updates a proxy's crop and position to track `window`'s new
    /// on-screen rectangle, clamped within `monitor_rect`.
    fn update_proxy(&mut self, _window: WindowId, _rect: Rect, _monitor_rect: Rect) -> WmResult<()> {
        Ok(())
    }

    /// Shows or hides `window`'s proxy without affecting the model.
    fn set_proxy_visible(&mut self, _window: WindowId, _visible: bool) -> WmResult<()> {
        Ok(())
    }

    /// Re-orders `window`'s proxy just below the window in z-order.
    fn reorder_proxy(&mut self, _window: WindowId) -> WmResult<()> {
        Ok(())
    }

    /// Tears down `window`'s proxy, if any.
    fn destroy_proxy(&mut self, _window: WindowId) -> WmResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_event_exposes_its_window_id() {
        assert_eq!(WindowEvent::Created(42).window_id(), 42);
        assert_eq!(WindowEvent::Destroyed(7).window_id(), 7);
    }
}
