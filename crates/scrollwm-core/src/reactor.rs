//! Event reactor (§4.E): turns adapter-reported [`WindowEvent`]s into
//! `World` mutations, and drives cursor-follows-focus.
//!
//! Lives on [`WindowManager`] since every handler needs both the world
//! and the adapter (to query geometry, or to install/update a display
//! proxy). Grounded on `original_source/adapters/windows/adapter.py`'s
//! `on_window_created`/`on_window_destroyed`, whose monitor hit-test with
//! a fallback to monitor 0 this mirrors exactly.

use crate::adapter::{PlatformAdapter, WindowEvent};
use crate::manager::WindowManager;
use crate::model::{Window, WindowId};

impl<A: PlatformAdapter> WindowManager<A> {
    /// Applies one adapter event to the model (§4.E).
    pub fn handle_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Created(id) => self.on_window_created(id),
            WindowEvent::Destroyed(id) => self.on_window_destroyed(id),
            WindowEvent::Moved(id) => self.on_window_moved(id),
            WindowEvent::Minimized(id) => self.on_window_minimized(id),
            WindowEvent::Restored(id) => self.on_window_restored(id),
            WindowEvent::ForegroundChanged(id) => self.on_foreground_changed(id),
            WindowEvent::TitleChanged(_) => {}
        }
    }

    /// Drains every event currently queued on the adapter.
    pub fn drain_events(&mut self)
    where
        A: EventSource,
    {
        while let Some(event) = self.adapter.next_event() {
            self.handle_event(event);
        }
    }

    fn on_window_created(&mut self, id: WindowId) {
        if self.world.find_window(id).is_some() {
            return;
        }
        let monitor_index = match self.adapter.window_rect(id) {
            Ok(rect) => self.world.monitor_at_point(rect.left, rect.top).unwrap_or(0),
            Err(_) => 0,
        };
        let ws = self.world.workspace_mut(monitor_index);
        let window = Window::new(id, ws.id);
        ws.push(window);

        self.call("create_proxy", |a| a.create_proxy(id));
        self.world.ensure_valid_workspaces_everywhere();
        self.refresh();
    }

    fn on_window_destroyed(&mut self, id: WindowId) {
        let Some((mi, wi, _)) = self.world.find_window(id) else {
            return;
        };
        self.world.monitors[mi].workspaces[wi].remove(id);
        self.world.monitors[mi].workspaces[wi].relayout();

        self.call("destroy_proxy", |a| a.destroy_proxy(id));
        self.world.ensure_valid_workspaces_everywhere();
        self.refresh();
    }

    /// Updates the window's cached OS rectangle and, if it has a display
    /// proxy, the proxy's crop/position (§4.E, §4.1).
    fn on_window_moved(&mut self, id: WindowId) {
        let Some((mi, wi, _)) = self.world.find_window(id) else {
            return;
        };
        let Ok(rect) = self.adapter.window_rect(id) else {
            return;
        };
        let monitor_rect = self.world.monitors[mi].rect;

        let has_proxy = self.world.monitors[mi].workspaces[wi]
            .window(id)
            .and_then(|w| w.platform_data.proxy)
            .is_some();

        if let Some(w) = self.world.monitors[mi].workspaces[wi].window_mut(id) {
            w.platform_data.last_rect = Some(rect);
        }

        if has_proxy {
            self.call("update_proxy", |a| a.update_proxy(id, rect, monitor_rect));
        }
    }

    fn on_window_minimized(&mut self, id: WindowId) {
        if self.world.find_window(id).is_none() {
            return;
        }
        self.call("set_proxy_visible", |a| a.set_proxy_visible(id, false));
    }

    fn on_window_restored(&mut self, id: WindowId) {
        if self.world.find_window(id).is_none() {
            return;
        }
        self.call("set_proxy_visible", |a| a.set_proxy_visible(id, true));
    }

    fn on_foreground_changed(&mut self, id: WindowId) {
        if self.world.find_window(id).is_none() {
            return;
        }
        self.call("reorder_proxy", |a| a.reorder_proxy(id));
    }

    /// Polls the adapter's cursor position and switches the focused
    /// monitor when the cursor has crossed into a different monitor's
    /// rect, focusing its current workspace's focused window
    /// (cursor-follows-focus, §4.E, §4.H). Intended to be called by the
    /// main loop's ~50ms ticker.
    pub fn tick_cursor(&mut self) {
        let Ok((x, y)) = self.adapter.cursor_position() else {
            return;
        };
        let Some(hit) = self.world.monitor_at_point(x, y) else {
            return;
        };
        if hit == self.world.focused_monitor_index {
            return;
        }
        self.world.focused_monitor_index = hit;

        let focused = self.world.focused_workspace_mut().focused_window_id;
        if let Some(id) = focused {
            self.call("focus_window", |a| a.focus_window(id));
        }
    }
}

/// An adapter that can hand back queued [`WindowEvent`]s. Implemented by
/// [`crate::fake::FakeAdapter`] for tests; the reference Windows adapter
/// drains its own channel the same way.
pub trait EventSource {
    fn next_event(&mut self) -> Option<WindowEvent>;
}

impl EventSource for crate::fake::FakeAdapter {
    fn next_event(&mut self) -> Option<WindowEvent> {
        crate::fake::FakeAdapter::next_event(self)
    }
}
