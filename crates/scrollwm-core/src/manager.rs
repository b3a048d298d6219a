//! Window manager core (§4.D): command semantics over the [`World`].
//!
//! Every public method here is a no-op when its precondition is unmet (no
//! focused window, index already at an edge) per §7 — commands never
//! surface errors to their caller. Adapter calls made while applying a
//! command are individually guarded; a failure is logged and the next
//! event is expected to reconcile (§7).

use crate::action::Action;
use crate::adapter::PlatformAdapter;
use crate::log_warn;
use crate::model::round2;
use crate::model::World;

/// Holds the [`World`] and drives it with an adapter (§4.D).
///
/// In the reference main loop (§5), a single exclusive lock on `World` is
/// held for every method call here, mutation plus any adapter calls made
/// while mutating.
pub struct WindowManager<A: PlatformAdapter> {
    pub world: World,
    pub adapter: A,
}

impl<A: PlatformAdapter> WindowManager<A> {
    pub fn new(world: World, adapter: A) -> Self {
        Self { world, adapter }
    }

    /// Dispatches one parsed command (§4.G verbs map 1:1 to these).
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::FocusHorizontal(delta) => self.focus_horizontal(delta),
            Action::FocusPosition(pos) => self.focus_position(pos),
            Action::WorkspaceFocus(delta) => self.workspace_focus(delta),
            Action::MonitorFocus(delta) => self.monitor_focus(delta),
            Action::Resize(delta) => self.resize(delta),
            Action::ToggleMaximize => self.toggle_maximize(),
            Action::TogglePresetWidth => self.toggle_preset_width(&crate::model::PRESET_WIDTHS),
            Action::MoveWindowHorizontal(delta) => self.move_window_horizontal(delta),
            Action::MoveWindowVertical(delta) => self.move_window_vertical(delta),
            Action::MoveWindowPosition(pos) => self.move_window_position(pos),
            Action::MoveWindowToMonitor(delta) => self.move_window_to_monitor(delta),
            Action::CloseWindow => self.close_window(),
            Action::Open(args) => self.open(&args),
            Action::Exit => self.exit(false),
            Action::Restart => self.exit(true),
        }
    }

    /// Runs one adapter call, logging (not propagating) a failure — §7:
    /// "Adapter call rejected ... logged; core continues; next event
    /// reconciles".
    pub(crate) fn call<F: FnOnce(&mut A) -> crate::WmResult<()>>(&mut self, what: &str, f: F) {
        if let Err(e) = f(&mut self.adapter) {
            log_warn!("adapter call {what} failed: {e}");
        }
    }

    /// Re-applies the current layout of the focused workspace on every
    /// monitor. Called internally after any mutation that can change an
    /// on-screen rectangle; exposed for callers that seed the model
    /// before the first command arrives (the initial window snapshot).
    pub fn refresh(&mut self) {
        let world = &mut self.world;
        if let Err(e) = self.adapter.refresh(world) {
            log_warn!("adapter refresh failed: {e}");
        }
    }

    fn focus_horizontal(&mut self, delta: i64) {
        let ws = self.world.focused_workspace_mut();
        let before = ws.focused_window_id;
        ws.move_focus(delta);
        let after = ws.focused_window_id;
        if after != before
            && let Some(id) = after
        {
            self.call("focus_window", |a| a.focus_window(id));
            self.refresh();
        }
    }

    fn focus_position(&mut self, pos: i64) {
        let ws = self.world.focused_workspace_mut();
        let before = ws.focused_window_id;
        ws.focus_position(pos);
        let after = ws.focused_window_id;
        if after != before
            && let Some(id) = after
        {
            self.call("focus_window", |a| a.focus_window(id));
            self.refresh();
        }
    }

    fn workspace_focus(&mut self, delta: i64) {
        let monitor_index = self.world.focused_monitor_index;
        let monitor = &mut self.world.monitors[monitor_index];
        let Some(current) = monitor.current_workspace_index() else {
            return;
        };
        let target = current as i64 + delta;
        if target < 0 || target as usize >= monitor.workspaces.len() {
            return;
        }
        let target = target as usize;
        let target_id = monitor.workspaces[target].id;
        if target_id == monitor.focused_workspace_id {
            return;
        }
        monitor.focused_workspace_id = target_id;
        let focused = monitor.workspaces[target].focused_window_id;

        if let Some(id) = focused {
            self.call("focus_window", |a| a.focus_window(id));
        }
        self.refresh();
    }

    fn monitor_focus(&mut self, delta: i64) {
        let target = self.world.focused_monitor_index as i64 + delta;
        if target < 0 || target as usize >= self.world.monitors.len() {
            return;
        }
        self.world.focused_monitor_index = target as usize;

        let focused = self.world.focused_workspace_mut().focused_window_id;
        if let Some(id) = focused {
            self.call("focus_window", |a| a.focus_window(id));
        }
    }

    fn resize(&mut self, delta: f64) {
        let ws = self.world.focused_workspace_mut();
        let Some(id) = ws.focused_window_id else {
            return;
        };
        if let Some(w) = ws.window_mut(id) {
            w.width = (w.width + delta).max(0.1);
        }
        ws.relayout();
        self.call("resize_window", |a| a.resize_window(id));
        self.refresh();
    }

    fn toggle_maximize(&mut self) {
        let ws = self.world.focused_workspace_mut();
        let Some(id) = ws.focused_window_id else {
            return;
        };
        if let Some(w) = ws.window_mut(id) {
            w.width = if w.width < 0.99 { 1.0 } else { 0.5 };
        }
        ws.relayout();
        self.call("resize_window", |a| a.resize_window(id));
        self.refresh();
    }

    /// Cycles through `presets`, matched by `round(width, 2)` equality.
    /// A width that doesn't match any preset restarts at the first one
    /// (§9 open question).
    fn toggle_preset_width(&mut self, presets: &[f64]) {
        let ws = self.world.focused_workspace_mut();
        let Some(id) = ws.focused_window_id else {
            return;
        };
        if let Some(w) = ws.window_mut(id) {
            let current = round2(w.width);
            let next_index = presets
                .iter()
                .position(|p| round2(*p) == current)
                .map_or(0, |i| (i + 1) % presets.len());
            w.width = presets[next_index];
        }
        ws.relayout();
        self.call("resize_window", |a| a.resize_window(id));
        self.refresh();
    }

    fn move_window_horizontal(&mut self, delta: i64) {
        let ws = self.world.focused_workspace_mut();
        let Some(id) = ws.focused_window_id else {
            return;
        };
        let Some(current) = ws.index_of(id) else {
            return;
        };
        let target = (current as i64 + delta).clamp(0, ws.windows.len() as i64 - 1) as usize;
        if target == current {
            return;
        }
        let window = ws.windows.remove(current);
        ws.windows.insert(target, window);
        ws.relayout();
        self.refresh();
    }

    fn move_window_position(&mut self, pos: i64) {
        let ws = self.world.focused_workspace_mut();
        let Some(id) = ws.focused_window_id else {
            return;
        };
        let Some(current) = ws.index_of(id) else {
            return;
        };
        let len = ws.windows.len() as i64;
        let target = (if pos < 0 { len + pos } else { pos }).clamp(0, len - 1) as usize;
        if target == current {
            return;
        }
        let window = ws.windows.remove(current);
        ws.windows.insert(target, window);
        ws.relayout();
        self.refresh();
    }

    /// Moves the focused window between workspaces on its own monitor
    /// (§4.D `move-window-vertical`). Buffer workspaces are created by
    /// `ensure_valid_workspaces` after the transfer, per invariant 3.
    fn move_window_vertical(&mut self, delta: i64) {
        let monitor_index = self.world.focused_monitor_index;
        let monitor = &mut self.world.monitors[monitor_index];
        let Some(current_ws_index) = monitor.current_workspace_index() else {
            return;
        };
        let target_ws_index = current_ws_index as i64 + delta;
        if target_ws_index < 0 || target_ws_index as usize >= monitor.workspaces.len() {
            return;
        }
        let target_ws_index = target_ws_index as usize;

        let Some(id) = monitor.workspaces[current_ws_index].focused_window_id else {
            return;
        };
        let Some(mut window) = monitor.workspaces[current_ws_index].remove(id) else {
            return;
        };
        monitor.workspaces[current_ws_index].relayout();

        let target_id = monitor.workspaces[target_ws_index].id;
        window.workspace = target_id;
        monitor.workspaces[target_ws_index].windows.push(window);
        monitor.workspaces[target_ws_index].focused_window_id = Some(id);
        monitor.workspaces[target_ws_index].relayout();
        monitor.focused_workspace_id = target_id;

        self.call("focus_window", |a| a.focus_window(id));
        self.world.ensure_valid_workspaces_everywhere();
        self.refresh();
    }

    /// Moves the focused window to the *current* workspace of a different
    /// monitor (§4.D `move-window-to-monitor`).
    fn move_window_to_monitor(&mut self, delta: i64) {
        let source_monitor_index = self.world.focused_monitor_index;
        let target_monitor_index = source_monitor_index as i64 + delta;
        if target_monitor_index < 0 || target_monitor_index as usize >= self.world.monitors.len() {
            return;
        }
        let target_monitor_index = target_monitor_index as usize;

        let Some(id) = self.world.focused_workspace_mut().focused_window_id else {
            return;
        };
        let source_ws = self.world.focused_workspace_mut();
        let Some(mut window) = source_ws.remove(id) else {
            return;
        };
        source_ws.relayout();

        let target_ws = self.world.workspace_mut(target_monitor_index);
        let target_ws_id = target_ws.id;
        window.workspace = target_ws_id;
        target_ws.windows.push(window);
        target_ws.focused_window_id = Some(id);
        target_ws.relayout();

        self.world.focused_monitor_index = target_monitor_index;
        self.call("focus_window", |a| a.focus_window(id));
        self.world.ensure_valid_workspaces_everywhere();
        self.refresh();
    }

    fn close_window(&mut self) {
        let Some(id) = self.world.focused_workspace_mut().focused_window_id else {
            return;
        };
        self.call("close_window", |a| a.close_window(id));
    }

    fn open(&mut self, args: &[String]) {
        self.call("open", |a| a.open(args));
    }

    /// `exit(restart=false)` just flips `running`; `exit(restart=true)`
    /// additionally re-spawns the current executable detached before the
    /// process exits (§4.D, §9: grounded on `original_source`'s
    /// `WindowManager.exit`, which re-launches via a detached subprocess).
    fn exit(&mut self, restart: bool) {
        self.world.running = false;
        if restart {
            let exe = std::env::current_exe();
            match exe {
                Ok(path) => {
                    self.call("open", |a| a.open(&[path.to_string_lossy().into_owned()]));
                }
                Err(e) => log_warn!("restart: could not resolve current executable: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeAdapter;
    use crate::model::{Window, World};

    fn manager_with_windows(ids: &[usize]) -> WindowManager<FakeAdapter> {
        let mut world = World::new(vec![(
            crate::Rect::new(0, 0, 1000, 1000),
            crate::Rect::new(0, 0, 1000, 1000),
        )]);
        let ws_id = world.monitors[0].workspaces[0].id;
        for &id in ids {
            world.monitors[0].workspaces[0].push(Window::new(id, ws_id));
        }
        world.monitors[0].workspaces[0].focused_window_id = ids.first().copied();
        world.ensure_valid_workspaces_everywhere();
        WindowManager::new(world, FakeAdapter::single_monitor())
    }

    /// Scenario 1 (§8): FakeAdapter, one monitor, one workspace with
    /// windows [1, 2, 3], focus initially on 1.
    #[test]
    fn scenario_1_horizontal_focus() {
        let mut mgr = manager_with_windows(&[1, 2, 3]);

        mgr.dispatch(Action::FocusHorizontal(1));
        assert_eq!(mgr.world.focused_workspace_mut().focused_window_id, Some(2));

        mgr.dispatch(Action::FocusHorizontal(1));
        assert_eq!(mgr.world.focused_workspace_mut().focused_window_id, Some(3));

        // Clamps at the rightmost window.
        mgr.dispatch(Action::FocusHorizontal(1));
        assert_eq!(mgr.world.focused_workspace_mut().focused_window_id, Some(3));
    }

    /// Scenario 2 (§8): A(0.5) B(0.5) C(0.5), focus B, resize_inc.
    #[test]
    fn scenario_2_resize_and_relayout() {
        let mut mgr = manager_with_windows(&[1, 2, 3]);
        {
            let ws = mgr.world.focused_workspace_mut();
            for id in [1, 2, 3] {
                ws.window_mut(id).unwrap().width = 0.5;
            }
            ws.focused_window_id = Some(2);
            ws.relayout();
        }

        mgr.dispatch(Action::Resize(0.1));

        let ws = mgr.world.focused_workspace_mut();
        assert!((ws.window(2).unwrap().width - 0.6).abs() < 1e-9);
        assert_eq!(ws.window(1).unwrap().x, 0.0);
        assert_eq!(ws.window(2).unwrap().x, 0.5);
        assert!((ws.window(3).unwrap().x - 1.1).abs() < 1e-9);
        assert!((ws.scroll_offset - 0.1).abs() < 1e-9);
    }

    /// Scenario 3 (§8): one workspace W0=[1]; `move_window_vertical(-1)`
    /// prepends a buffer workspace, moves the window into it, and
    /// `ensure_valid_workspaces` re-buffers around the result.
    #[test]
    fn scenario_3_buffer_workspaces() {
        // `manager_with_windows` already runs `ensure_valid_workspaces_everywhere`,
        // so the starting monitor is `[empty, {1}, empty]` per invariant 3 —
        // `move_window_vertical` only transfers into an existing workspace
        // (it never creates one on the fly), so this buffered start is the
        // only way `MoveWindowVertical(-1)` isn't an immediate no-op.
        let mut mgr = manager_with_windows(&[1]);

        mgr.dispatch(Action::MoveWindowVertical(-1));

        // The window lands in the top buffer, which is then non-empty, so
        // `ensure_valid_workspaces` prepends a fresh empty buffer above it:
        // [empty, {1}, empty, empty].
        let monitor = &mgr.world.monitors[0];
        assert_eq!(monitor.workspaces.len(), 4);
        assert!(monitor.workspaces[0].is_empty());
        assert!(monitor.workspaces[1].contains(1));
        assert!(monitor.workspaces[2].is_empty());
        assert!(monitor.workspaces[3].is_empty());
        assert_eq!(monitor.focused_workspace_id, monitor.workspaces[1].id);
    }

    /// Scenario 4 (§8): two monitors M0 (focused, ws0=[X]), M1 (ws0=[]).
    /// Moving X to M1 follows focus there.
    #[test]
    fn scenario_4_cross_monitor_move() {
        let mut world = World::new(vec![
            (crate::Rect::new(0, 0, 1000, 1000), crate::Rect::new(0, 0, 1000, 1000)),
            (crate::Rect::new(1000, 0, 2000, 1000), crate::Rect::new(1000, 0, 2000, 1000)),
        ]);
        let ws0 = world.monitors[0].workspaces[0].id;
        world.monitors[0].workspaces[0].push(Window::new(42, ws0));
        world.monitors[0].workspaces[0].focused_window_id = Some(42);
        world.ensure_valid_workspaces_everywhere();
        let mut mgr = WindowManager::new(world, FakeAdapter::two_monitors());

        mgr.dispatch(Action::MoveWindowToMonitor(1));

        assert_eq!(mgr.world.focused_monitor_index, 1);
        let (mi, wi, _) = mgr.world.find_window(42).unwrap();
        assert_eq!(mi, 1);
        assert_eq!(mgr.world.monitors[1].workspaces[wi].focused_window_id, Some(42));
    }

    #[test]
    fn move_window_to_monitor_at_edge_is_no_op() {
        let mut mgr = manager_with_windows(&[1]);

        mgr.dispatch(Action::MoveWindowToMonitor(1));

        assert_eq!(mgr.world.focused_monitor_index, 0);
        assert!(mgr.world.find_window(1).is_some());
    }

    #[test]
    fn toggle_maximize_applied_twice_restores_width() {
        let mut mgr = manager_with_windows(&[1]);

        mgr.dispatch(Action::ToggleMaximize);
        assert_eq!(mgr.world.focused_workspace_mut().window(1).unwrap().width, 1.0);

        mgr.dispatch(Action::ToggleMaximize);
        assert_eq!(mgr.world.focused_workspace_mut().window(1).unwrap().width, 0.5);
    }

    #[test]
    fn toggle_preset_width_cycles_and_restarts_on_mismatch() {
        let mut mgr = manager_with_windows(&[1]);
        mgr.world.focused_workspace_mut().window_mut(1).unwrap().width = 0.75;

        mgr.dispatch(Action::TogglePresetWidth);
        // 0.75 matches no preset, so it restarts at the first: 0.4.
        assert_eq!(mgr.world.focused_workspace_mut().window(1).unwrap().width, 0.4);

        mgr.dispatch(Action::TogglePresetWidth);
        assert_eq!(mgr.world.focused_workspace_mut().window(1).unwrap().width, 0.5);
    }

    #[test]
    fn move_left_then_right_restores_order() {
        let mut mgr = manager_with_windows(&[1, 2, 3]);
        mgr.world.focused_workspace_mut().focused_window_id = Some(2);

        mgr.dispatch(Action::MoveWindowHorizontal(-1));
        let order_after_left: Vec<usize> =
            mgr.world.focused_workspace_mut().windows.iter().map(|w| w.id).collect();
        assert_eq!(order_after_left, vec![2, 1, 3]);

        mgr.dispatch(Action::MoveWindowHorizontal(1));
        let order_after_right: Vec<usize> =
            mgr.world.focused_workspace_mut().windows.iter().map(|w| w.id).collect();
        assert_eq!(order_after_right, vec![1, 2, 3]);
    }

    #[test]
    fn close_window_forwards_to_adapter_without_mutating_model() {
        let mut mgr = manager_with_windows(&[1, 2]);

        mgr.dispatch(Action::CloseWindow);

        assert!(mgr.adapter.calls.contains(&crate::fake::RecordedCall::CloseWindow(1)));
        assert!(mgr.world.find_window(1).is_some());
    }

    #[test]
    fn focus_left_at_leftmost_window_is_a_no_op() {
        let mut mgr = manager_with_windows(&[1, 2, 3]);

        mgr.dispatch(Action::FocusHorizontal(-1));

        assert_eq!(mgr.world.focused_workspace_mut().focused_window_id, Some(1));
        assert!(mgr.adapter.calls.is_empty());
    }

    #[test]
    fn resize_below_point_one_clamps() {
        let mut mgr = manager_with_windows(&[1]);

        mgr.dispatch(Action::Resize(-5.0));

        assert_eq!(mgr.world.focused_workspace_mut().window(1).unwrap().width, 0.1);
    }

    #[test]
    fn exit_stops_the_loop() {
        let mut mgr = manager_with_windows(&[1]);
        mgr.dispatch(Action::Exit);
        assert!(!mgr.world.running);
    }
}
