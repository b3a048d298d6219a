//! The monitor/workspace/window tree and the invariants it maintains.
//!
//! Windows and workspaces are owned directly by their parent (a
//! `Workspace` owns its `Vec<Window>`, a `Monitor` owns its
//! `Vec<Workspace>`). Back-references (window → workspace, workspace →
//! monitor) are plain ids/indices rather than pointers, per the arena
//! approach in the design notes: it avoids reference cycles entirely and
//! keeps everything `Send` without any unsafe aliasing.

use crate::Rect;

/// Stable per-process handle for a window, supplied by the platform
/// adapter (a Win32 `HWND` cast to `usize`, for the reference adapter).
pub type WindowId = usize;

/// Process-wide, monotonically increasing workspace id. Never reused.
pub type WorkspaceId = u64;

/// The set of default preset widths cycled by `toggle-preset-width`.
pub const PRESET_WIDTHS: [f64; 4] = [0.4, 0.5, 0.6, 1.0];

/// Opaque per-window data the adapter attaches: title cache, last known
/// OS rectangle, and an optional display-proxy handle. The core never
/// reads these fields; they exist so the adapter doesn't need a parallel
/// side-table keyed by `WindowId`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformData {
    pub title: String,
    pub last_rect: Option<Rect>,
    pub proxy: Option<usize>,
}

/// One managed top-level OS window.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub id: WindowId,
    pub workspace: WorkspaceId,
    /// Horizontal offset in screen-widths from the workspace origin.
    /// Derived; overwritten by `Workspace::relayout`.
    pub x: f64,
    /// Horizontal size in screen-widths. Always `>= 0.1`.
    pub width: f64,
    pub platform_data: PlatformData,
}

impl Window {
    pub fn new(id: WindowId, workspace: WorkspaceId) -> Self {
        Self {
            id,
            workspace,
            x: 0.0,
            width: 1.0,
            platform_data: PlatformData::default(),
        }
    }
}

/// A horizontally scrolling strip of windows on one monitor.
pub struct Workspace {
    pub id: WorkspaceId,
    pub monitor: Option<usize>,
    pub windows: Vec<Window>,
    pub focused_window_id: Option<WindowId>,
    pub scroll_offset: f64,
}

impl Workspace {
    pub fn new(id: WorkspaceId, monitor: Option<usize>) -> Self {
        Self {
            id,
            monitor,
            windows: Vec::new(),
            focused_window_id: None,
            scroll_offset: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.iter().any(|w| w.id == id)
    }

    pub fn index_of(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id == id)
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    pub fn focused_window(&self) -> Option<&Window> {
        self.focused_window_id.and_then(|id| self.window(id))
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused_window_id.and_then(|id| self.index_of(id))
    }

    /// Appends a window owned by this workspace, fixing up its back-ref.
    pub fn push(&mut self, mut window: Window) {
        window.workspace = self.id;
        self.windows.push(window);
        if self.focused_window_id.is_none() {
            self.focused_window_id = self.windows.first().map(|w| w.id);
        }
    }

    /// Inserts a window at `index` (clamped to the current length).
    pub fn insert(&mut self, index: usize, mut window: Window) {
        window.workspace = self.id;
        let pos = index.min(self.windows.len());
        self.windows.insert(pos, window);
        if self.focused_window_id.is_none() {
            self.focused_window_id = self.windows.first().map(|w| w.id);
        }
    }

    /// Removes and returns a window by id, repairing focus (invariant 5).
    pub fn remove(&mut self, id: WindowId) -> Option<Window> {
        let idx = self.index_of(id)?;
        let removed = self.windows.remove(idx);
        if self.focused_window_id == Some(id) {
            self.focused_window_id = self.windows.get(idx.min(self.windows.len().saturating_sub(1))).map(|w| w.id);
            if self.windows.is_empty() {
                self.focused_window_id = None;
            }
        }
        Some(removed)
    }

    /// Invariant 6: clamps `scroll_offset`, then — if a window is
    /// focused and content overflows a single screen-width — shifts the
    /// minimal amount needed to keep the focused window fully visible.
    pub fn reclamp_scroll(&mut self) {
        let total_width: f64 = self.windows.iter().map(|w| w.width).sum();

        if total_width <= 1.0 {
            self.scroll_offset = (total_width - 1.0) / 2.0;
            return;
        }

        let max_offset = total_width - 1.0;
        self.scroll_offset = self.scroll_offset.clamp(0.0, max_offset);

        if let Some(focused) = self.focused_window() {
            let lo = focused.x;
            let hi = focused.x + focused.width - 1.0;
            if self.scroll_offset > lo {
                self.scroll_offset = lo;
            } else if self.scroll_offset < hi {
                self.scroll_offset = hi;
            }
            self.scroll_offset = self.scroll_offset.clamp(0.0, max_offset);
        }
    }

    /// Assigns `window.x` as the prefix sum of widths, then reclamps
    /// the scroll offset.
    pub fn relayout(&mut self) {
        let mut x = 0.0;
        for w in &mut self.windows {
            w.x = x;
            x += w.width;
        }
        self.reclamp_scroll();
    }

    /// Moves focus by `delta` positions, clamped to the valid range.
    pub fn move_focus(&mut self, delta: i64) {
        if self.windows.is_empty() {
            return;
        }
        let current = self.focused_index().unwrap_or(0) as i64;
        let target = (current + delta).clamp(0, self.windows.len() as i64 - 1);
        self.focused_window_id = self.windows.get(target as usize).map(|w| w.id);
        self.relayout();
    }

    /// Sets focus to an absolute position. Negative values count from
    /// the end (`-1` is the last window).
    pub fn focus_position(&mut self, pos: i64) {
        if self.windows.is_empty() {
            return;
        }
        let len = self.windows.len() as i64;
        let idx = if pos < 0 { len + pos } else { pos }.clamp(0, len - 1);
        self.focused_window_id = self.windows.get(idx as usize).map(|w| w.id);
        self.relayout();
    }
}

/// One physical display.
pub struct Monitor {
    pub index: usize,
    pub rect: Rect,
    pub work_rect: Rect,
    pub workspaces: Vec<Workspace>,
    pub focused_workspace_id: WorkspaceId,
}

impl Monitor {
    /// Returns the focused workspace, repairing `focused_workspace_id`
    /// (invariant 4) if it no longer refers to a member.
    pub fn current_workspace(&mut self, next_id: &mut WorkspaceId) -> &mut Workspace {
        if !self.workspaces.iter().any(|w| w.id == self.focused_workspace_id) {
            if self.workspaces.is_empty() {
                let id = alloc_id(next_id);
                self.workspaces.push(Workspace::new(id, Some(self.index)));
            }
            self.focused_workspace_id = self.workspaces[0].id;
        }
        let idx = self
            .workspaces
            .iter()
            .position(|w| w.id == self.focused_workspace_id)
            .expect("just repaired above");
        &mut self.workspaces[idx]
    }

    pub fn current_workspace_index(&self) -> Option<usize> {
        self.workspaces
            .iter()
            .position(|w| w.id == self.focused_workspace_id)
    }

    pub fn workspace_index_of(&self, id: WorkspaceId) -> Option<usize> {
        self.workspaces.iter().position(|w| w.id == id)
    }

    /// Invariants 3 & 4: a monitor always has at least one workspace; if
    /// the top (or bottom) workspace has windows, an empty buffer
    /// workspace is prepended (appended). Idempotent.
    pub fn ensure_valid_workspaces(&mut self, next_id: &mut WorkspaceId) {
        if self.workspaces.is_empty() {
            let id = alloc_id(next_id);
            self.workspaces.push(Workspace::new(id, Some(self.index)));
        }

        if self.workspaces.first().is_some_and(|w| !w.is_empty()) {
            let id = alloc_id(next_id);
            self.workspaces.insert(0, Workspace::new(id, Some(self.index)));
        }

        if self.workspaces.last().is_some_and(|w| !w.is_empty()) {
            let id = alloc_id(next_id);
            self.workspaces.push(Workspace::new(id, Some(self.index)));
        }

        if !self.workspaces.iter().any(|w| w.id == self.focused_workspace_id) {
            self.focused_workspace_id = self.workspaces[0].id;
        }
    }
}

fn alloc_id(next_id: &mut WorkspaceId) -> WorkspaceId {
    let id = *next_id;
    *next_id += 1;
    id
}

/// The root of the model: every monitor, sorted left-to-right then
/// top-to-bottom at construction, plus which one currently has focus.
pub struct World {
    pub monitors: Vec<Monitor>,
    pub focused_monitor_index: usize,
    next_workspace_id: WorkspaceId,
    pub running: bool,
}

impl World {
    /// Builds a world from monitor rects, sorting by `(left, top)` and
    /// giving each monitor a single empty starting workspace.
    pub fn new(mut monitor_rects: Vec<(Rect, Rect)>) -> Self {
        monitor_rects.sort_by_key(|(rect, _)| (rect.left, rect.top));
        let mut next_workspace_id: WorkspaceId = 0;
        let monitors = monitor_rects
            .into_iter()
            .enumerate()
            .map(|(index, (rect, work_rect))| {
                let id = alloc_id(&mut next_workspace_id);
                Monitor {
                    index,
                    rect,
                    work_rect,
                    workspaces: vec![Workspace::new(id, Some(index))],
                    focused_workspace_id: id,
                }
            })
            .collect();
        Self {
            monitors,
            focused_monitor_index: 0,
            next_workspace_id,
            running: true,
        }
    }

    pub fn alloc_workspace_id(&mut self) -> WorkspaceId {
        alloc_id(&mut self.next_workspace_id)
    }

    /// Scans every monitor/workspace for a window by id.
    pub fn find_window(&self, id: WindowId) -> Option<(usize, usize, usize)> {
        for (mi, monitor) in self.monitors.iter().enumerate() {
            for (wi, workspace) in monitor.workspaces.iter().enumerate() {
                if let Some(xi) = workspace.index_of(id) {
                    return Some((mi, wi, xi));
                }
            }
        }
        None
    }

    /// Finds the monitor whose `rect` contains the given screen point.
    pub fn monitor_at_point(&self, x: i32, y: i32) -> Option<usize> {
        self.monitors.iter().position(|m| m.rect.contains(x, y))
    }

    pub fn focused_monitor(&mut self) -> &mut Monitor {
        &mut self.monitors[self.focused_monitor_index]
    }

    /// The current workspace of monitor `index`, repairing a dangling
    /// `focused_workspace_id` first (invariant 4).
    pub fn workspace_mut(&mut self, index: usize) -> &mut Workspace {
        let mut next = self.next_workspace_id;
        let _ = self.monitors[index].current_workspace(&mut next);
        self.next_workspace_id = next;
        let ws_id = self.monitors[index].focused_workspace_id;
        let ws_idx = self.monitors[index].workspace_index_of(ws_id).expect("just repaired");
        &mut self.monitors[index].workspaces[ws_idx]
    }

    /// The current workspace of the focused monitor.
    pub fn focused_workspace_mut(&mut self) -> &mut Workspace {
        self.workspace_mut(self.focused_monitor_index)
    }

    /// Runs `ensure_valid_workspaces` on every monitor (invariants 3, 4).
    pub fn ensure_valid_workspaces_everywhere(&mut self) {
        let mut next = self.next_workspace_id;
        for monitor in &mut self.monitors {
            monitor.ensure_valid_workspaces(&mut next);
        }
        self.next_workspace_id = next;
    }
}

/// Rounds to two decimal places, matching `round(width, 2)` from §4.D.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(l: i32, t: i32, r: i32, b: i32) -> Rect {
        Rect::new(l, t, r, b)
    }

    fn single_monitor_world() -> World {
        World::new(vec![(rect(0, 0, 1000, 1000), rect(0, 0, 1000, 980))])
    }

    #[test]
    fn new_world_sorts_monitors_left_to_right() {
        // Arrange
        let world = World::new(vec![
            (rect(1000, 0, 2000, 1000), rect(1000, 0, 2000, 1000)),
            (rect(0, 0, 1000, 1000), rect(0, 0, 1000, 1000)),
        ]);

        // Assert
        assert_eq!(world.monitors[0].rect.left, 0);
        assert_eq!(world.monitors[1].rect.left, 1000);
    }

    #[test]
    fn relayout_assigns_prefix_sum_of_widths() {
        // Arrange
        let mut ws = Workspace::new(0, Some(0));
        let mut a = Window::new(1, 0);
        a.width = 0.5;
        let mut b = Window::new(2, 0);
        b.width = 0.5;
        ws.push(a);
        ws.push(b);

        // Act
        ws.relayout();

        // Assert
        assert_eq!(ws.window(1).unwrap().x, 0.0);
        assert_eq!(ws.window(2).unwrap().x, 0.5);
    }

    #[test]
    fn relayout_twice_is_idempotent() {
        let mut ws = Workspace::new(0, Some(0));
        ws.push(Window::new(1, 0));
        ws.push(Window::new(2, 0));
        ws.focus_position(0);

        ws.relayout();
        let first: Vec<f64> = ws.windows.iter().map(|w| w.x).collect();
        ws.relayout();
        let second: Vec<f64> = ws.windows.iter().map(|w| w.x).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn scroll_centers_when_total_width_below_one() {
        // Scenario 6 from the spec: a single window width=0.5.
        let mut ws = Workspace::new(0, Some(0));
        let mut w = Window::new(1, 0);
        w.width = 0.5;
        ws.push(w);

        ws.relayout();

        assert_eq!(ws.scroll_offset, -0.25);
    }

    #[test]
    fn scroll_clamps_to_keep_focused_window_visible() {
        // Scenario 2 from the spec: A(0.5) B(0.6 after resize) C(0.5),
        // focus on B. total_width = 1.6, B spans [0.5, 1.1].
        let mut ws = Workspace::new(0, Some(0));
        let mut a = Window::new(1, 0);
        a.width = 0.5;
        let mut b = Window::new(2, 0);
        b.width = 0.6;
        let mut c = Window::new(3, 0);
        c.width = 0.5;
        ws.push(a);
        ws.push(b);
        ws.push(c);
        ws.focused_window_id = Some(2);

        ws.relayout();

        assert!((ws.scroll_offset - 0.1).abs() < 1e-9);
    }

    #[test]
    fn move_focus_clamps_at_boundaries() {
        let mut ws = Workspace::new(0, Some(0));
        ws.push(Window::new(1, 0));
        ws.push(Window::new(2, 0));
        ws.push(Window::new(3, 0));
        ws.focused_window_id = Some(1);

        // Two lefts beyond the start clamp at index 0.
        ws.move_focus(-1);
        ws.move_focus(-1);
        assert_eq!(ws.focused_window_id, Some(1));

        // Round trip: two rights then two lefts returns to the start.
        ws.move_focus(1);
        ws.move_focus(1);
        ws.move_focus(-1);
        ws.move_focus(-1);
        assert_eq!(ws.focused_window_id, Some(1));
    }

    #[test]
    fn focus_position_negative_counts_from_end() {
        let mut ws = Workspace::new(0, Some(0));
        ws.push(Window::new(1, 0));
        ws.push(Window::new(2, 0));
        ws.push(Window::new(3, 0));

        ws.focus_position(-1);
        assert_eq!(ws.focused_window_id, Some(3));

        ws.focus_position(0);
        assert_eq!(ws.focused_window_id, Some(1));
    }

    #[test]
    fn remove_repairs_focus() {
        let mut ws = Workspace::new(0, Some(0));
        ws.push(Window::new(1, 0));
        ws.push(Window::new(2, 0));
        ws.focused_window_id = Some(2);

        ws.remove(2);

        assert_eq!(ws.focused_window_id, Some(1));
    }

    #[test]
    fn remove_last_window_clears_focus() {
        let mut ws = Workspace::new(0, Some(0));
        ws.push(Window::new(1, 0));

        ws.remove(1);

        assert!(ws.focused_window_id.is_none());
        assert!(ws.is_empty());
    }

    #[test]
    fn ensure_valid_workspaces_buffers_top_and_bottom() {
        // Arrange: one workspace with a window.
        let mut world = single_monitor_world();
        world.monitors[0].workspaces[0].push(Window::new(1, world.monitors[0].workspaces[0].id));

        // Act
        world.ensure_valid_workspaces_everywhere();

        // Assert: buffer prepended and appended (scenario 3).
        let monitor = &world.monitors[0];
        assert_eq!(monitor.workspaces.len(), 3);
        assert!(monitor.workspaces[0].is_empty());
        assert!(!monitor.workspaces[1].is_empty());
        assert!(monitor.workspaces[2].is_empty());
    }

    #[test]
    fn ensure_valid_workspaces_is_idempotent() {
        let mut world = single_monitor_world();
        world.monitors[0].workspaces[0].push(Window::new(1, world.monitors[0].workspaces[0].id));

        world.ensure_valid_workspaces_everywhere();
        let first_len = world.monitors[0].workspaces.len();
        world.ensure_valid_workspaces_everywhere();
        let second_len = world.monitors[0].workspaces.len();

        assert_eq!(first_len, second_len);
    }

    #[test]
    fn ensure_valid_workspaces_permits_empty_interior() {
        // Two interior empty workspaces between populated ones is fine;
        // only the outer edges must be empty buffers.
        let mut world = single_monitor_world();
        {
            let monitor = &mut world.monitors[0];
            let id_a = monitor.workspaces[0].id;
            monitor.workspaces[0].push(Window::new(1, id_a));
            let next_id = monitor.workspaces.last().unwrap().id + 1;
            monitor.workspaces.push(Workspace::new(next_id, Some(0)));
            let id_b = next_id + 1;
            let mut ws = Workspace::new(id_b, Some(0));
            ws.push(Window::new(2, id_b));
            monitor.workspaces.push(ws);
        }

        world.ensure_valid_workspaces_everywhere();

        let monitor = &world.monitors[0];
        assert!(monitor.workspaces.first().unwrap().is_empty());
        assert!(monitor.workspaces.last().unwrap().is_empty());
    }

    #[test]
    fn current_workspace_repairs_dangling_focus() {
        let mut world = single_monitor_world();
        world.monitors[0].focused_workspace_id = 999;
        let mut next = world.alloc_workspace_id();

        let ws_id = world.monitors[0].current_workspace(&mut next).id;

        assert_eq!(world.monitors[0].focused_workspace_id, ws_id);
    }

    #[test]
    fn find_window_scans_all_monitors() {
        let mut world = World::new(vec![
            (rect(0, 0, 1000, 1000), rect(0, 0, 1000, 1000)),
            (rect(1000, 0, 2000, 1000), rect(1000, 0, 2000, 1000)),
        ]);
        let ws_id = world.monitors[1].workspaces[0].id;
        world.monitors[1].workspaces[0].push(Window::new(42, ws_id));

        assert_eq!(world.find_window(42), Some((1, 0, 0)));
        assert_eq!(world.find_window(7), None);
    }

    #[test]
    fn round2_matches_preset_width_precision() {
        assert_eq!(round2(0.1 + 0.5), 0.6);
        assert_eq!(round2(0.999), 1.0);
    }
}
