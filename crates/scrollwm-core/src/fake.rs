//! A pure in-memory [`PlatformAdapter`], required by §4.F for tests.
//!
//! Mirrors `original_source/adapters/fake.py`: it never touches the OS.
//! Every call that would otherwise reach out to Win32 is instead
//! recorded, so tests can assert on what the manager asked for.

use std::collections::{HashMap, VecDeque};

use crate::adapter::{MonitorInfo, PlatformAdapter, WindowEvent};
use crate::error::WmResult;
use crate::layout::{compute_layout, Placement};
use crate::model::{WindowId, World};
use crate::Rect;

/// One call the manager made against the adapter, recorded in order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    FocusWindow(WindowId),
    ResizeWindow(WindowId),
    CloseWindow(WindowId),
    Refresh,
    Open(Vec<String>),
}

/// Pure in-memory adapter: a fixed monitor snapshot, a recording of
/// every call made to it, and a test-injected cursor position.
pub struct FakeAdapter {
    monitors: Vec<MonitorInfo>,
    pub calls: Vec<RecordedCall>,
    cursor: (i32, i32),
    /// Last placements computed by `refresh()`, per monitor index, for
    /// assertions without needing a real window surface.
    pub last_placements: Vec<Vec<(WindowId, Placement)>>,
    events: VecDeque<WindowEvent>,
    window_rects: HashMap<WindowId, Rect>,
}

impl FakeAdapter {
    /// A single 1000x1000 monitor with no reserved chrome.
    pub fn single_monitor() -> Self {
        Self::new(vec![MonitorInfo {
            rect: Rect::new(0, 0, 1000, 1000),
            work_rect: Rect::new(0, 0, 1000, 1000),
        }])
    }

    /// Two side-by-side 1000x1000 monitors, matching scenario 5 (§8).
    pub fn two_monitors() -> Self {
        Self::new(vec![
            MonitorInfo {
                rect: Rect::new(0, 0, 1000, 1000),
                work_rect: Rect::new(0, 0, 1000, 1000),
            },
            MonitorInfo {
                rect: Rect::new(1000, 0, 2000, 1000),
                work_rect: Rect::new(1000, 0, 2000, 1000),
            },
        ])
    }

    pub fn new(monitors: Vec<MonitorInfo>) -> Self {
        Self {
            monitors,
            calls: Vec::new(),
            cursor: (0, 0),
            last_placements: Vec::new(),
            events: VecDeque::new(),
            window_rects: HashMap::new(),
        }
    }

    /// Lets a test drive the cursor-follows-focus tick (§8 scenario 5).
    pub fn set_cursor_position(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
    }

    /// Lets a test control what `window_rect` reports for `window`,
    /// e.g. to place a newly created window on a specific monitor.
    pub fn set_window_rect(&mut self, window: WindowId, rect: Rect) {
        self.window_rects.insert(window, rect);
    }

    /// Queues an event for the reactor to consume on its next drain.
    pub fn push_event(&mut self, event: WindowEvent) {
        self.events.push_back(event);
    }

    pub fn next_event(&mut self) -> Option<WindowEvent> {
        self.events.pop_front()
    }
}

impl PlatformAdapter for FakeAdapter {
    fn initialize(&mut self) -> WmResult<()> {
        Ok(())
    }

    fn monitors(&self) -> WmResult<Vec<MonitorInfo>> {
        Ok(self.monitors.clone())
    }

    fn focus_window(&mut self, window: WindowId) -> WmResult<()> {
        self.calls.push(RecordedCall::FocusWindow(window));
        Ok(())
    }

    fn resize_window(&mut self, window: WindowId) -> WmResult<()> {
        self.calls.push(RecordedCall::ResizeWindow(window));
        Ok(())
    }

    fn close_window(&mut self, window: WindowId) -> WmResult<()> {
        self.calls.push(RecordedCall::CloseWindow(window));
        Ok(())
    }

    fn refresh(&mut self, world: &mut World) -> WmResult<()> {
        self.calls.push(RecordedCall::Refresh);
        self.last_placements.clear();
        for monitor in &mut world.monitors {
            let mut next_id = monitor.focused_workspace_id + 1;
            let workspace = monitor.current_workspace(&mut next_id);
            let placements = compute_layout(workspace, monitor.work_rect, monitor.rect, 0);
            self.last_placements.push(placements);
        }
        Ok(())
    }

    fn open(&mut self, args: &[String]) -> WmResult<()> {
        self.calls.push(RecordedCall::Open(args.to_vec()));
        Ok(())
    }

    fn cursor_position(&self) -> WmResult<(i32, i32)> {
        Ok(self.cursor)
    }

    fn window_rect(&self, window: WindowId) -> WmResult<Rect> {
        Ok(self
            .window_rects
            .get(&window)
            .copied()
            .unwrap_or(Rect::new(0, 0, 100, 100)))
    }

    fn stop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_monitor_snapshot_has_one_entry() {
        let adapter = FakeAdapter::single_monitor();
        assert_eq!(adapter.monitors().unwrap().len(), 1);
    }

    #[test]
    fn calls_are_recorded_in_order() {
        let mut adapter = FakeAdapter::single_monitor();
        adapter.focus_window(1).unwrap();
        adapter.resize_window(1).unwrap();
        adapter.close_window(1).unwrap();

        assert_eq!(
            adapter.calls,
            vec![
                RecordedCall::FocusWindow(1),
                RecordedCall::ResizeWindow(1),
                RecordedCall::CloseWindow(1),
            ]
        );
    }

    #[test]
    fn pushed_events_drain_in_fifo_order() {
        let mut adapter = FakeAdapter::single_monitor();
        adapter.push_event(WindowEvent::Created(1));
        adapter.push_event(WindowEvent::Created(2));

        assert_eq!(adapter.next_event(), Some(WindowEvent::Created(1)));
        assert_eq!(adapter.next_event(), Some(WindowEvent::Created(2)));
        assert_eq!(adapter.next_event(), None);
    }
}
