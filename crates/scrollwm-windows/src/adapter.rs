//! The reference [`PlatformAdapter`] (§4.F): wires window enumeration,
//! monitor queries, the event thread, cursor polling, and the
//! cloaking-thumbnail display proxy into the single interface
//! [`crate::manager::WindowManager`] drives.

use std::collections::HashMap;
use std::process::Command;
use std::sync::mpsc::Receiver;

use scrollwm_core::adapter::MonitorInfo;
use scrollwm_core::layout::{compute_layout, Placement};
use scrollwm_core::reactor::EventSource;
use scrollwm_core::{PlatformAdapter, Rect, WindowEvent, WindowId, WmResult, World};

use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    PostMessageW, SetForegroundWindow, SetWindowPos, ShowWindow, SWP_NOACTIVATE, SWP_NOZORDER,
    SW_HIDE, SW_RESTORE, SW_SHOWNOACTIVATE, WM_CLOSE,
};

use crate::event_loop::{self, EventLoopHandle};
use crate::{monitor, thumbnail, window};

/// The reference Windows adapter. Holds the event thread handle (once
/// [`PlatformAdapter::initialize`] has run), every live display proxy
/// keyed by the window it mirrors, and the gap (from [`scrollwm_core::Config`])
/// applied by [`Self::refresh`].
pub struct WindowsAdapter {
    gap_px: i32,
    event_loop: Option<EventLoopHandle>,
    event_rx: Option<Receiver<WindowEvent>>,
    proxies: HashMap<WindowId, thumbnail::DisplayProxy>,
}

impl WindowsAdapter {
    pub fn new(gap_px: i32) -> Self {
        Self {
            gap_px,
            event_loop: None,
            event_rx: None,
            proxies: HashMap::new(),
        }
    }
}

impl PlatformAdapter for WindowsAdapter {
    fn initialize(&mut self) -> WmResult<()> {
        let (tx, rx) = std::sync::mpsc::channel();
        let handle = event_loop::start(tx)?;
        self.event_loop = Some(handle);
        self.event_rx = Some(rx);
        Ok(())
    }

    fn monitors(&self) -> WmResult<Vec<MonitorInfo>> {
        monitor::enumerate_monitors()
    }

    fn focus_window(&mut self, window: WindowId) -> WmResult<()> {
        let hwnd = window::hwnd_of(window);
        if window::is_minimized(hwnd) {
            // SAFETY: ShowWindow is a simple state-changing call on a
            // window handle the core already knows about.
            unsafe {
                let _ = ShowWindow(hwnd, SW_RESTORE);
            }
        }
        // SAFETY: SetForegroundWindow takes a plain HWND.
        unsafe {
            let _ = SetForegroundWindow(hwnd);
        }
        Ok(())
    }

    /// The reference adapter applies pixel geometry only from
    /// [`Self::refresh`], which the core calls after every mutation that
    /// can change a window's on-screen rectangle; this hook is reserved
    /// for adapters that want to react to a single resize without a
    /// full relayout.
    fn resize_window(&mut self, _window: WindowId) -> WmResult<()> {
        Ok(())
    }

    fn close_window(&mut self, window: WindowId) -> WmResult<()> {
        let hwnd = window::hwnd_of(window);
        // SAFETY: PostMessageW queues a message; it does not wait for
        // the target to process it.
        unsafe {
            PostMessageW(Some(hwnd), WM_CLOSE, WPARAM(0), LPARAM(0))?;
        }
        Ok(())
    }

    fn refresh(&mut self, world: &mut World) -> WmResult<()> {
        for monitor in &world.monitors {
            let focused_id = monitor.focused_workspace_id;
            for workspace in &monitor.workspaces {
                if workspace.id == focused_id {
                    let placements =
                        compute_layout(workspace, monitor.work_rect, monitor.rect, self.gap_px);
                    for (id, placement) in placements {
                        apply_placement(id, placement);
                    }
                } else {
                    for w in &workspace.windows {
                        hide(w.id);
                    }
                }
            }
        }
        Ok(())
    }

    fn open(&mut self, args: &[String]) -> WmResult<()> {
        let Some((program, rest)) = args.split_first() else {
            return Ok(());
        };
        Command::new(program).args(rest).spawn()?;
        Ok(())
    }

    fn cursor_position(&self) -> WmResult<(i32, i32)> {
        crate::cursor::position()
    }

    fn window_rect(&self, window: WindowId) -> WmResult<Rect> {
        window::rect(window::hwnd_of(window))
    }

    fn stop(&mut self) {
        if let Some(handle) = self.event_loop.take() {
            handle.stop();
        }
    }

    fn create_proxy(&mut self, window: WindowId) -> WmResult<()> {
        let hwnd = window::hwnd_of(window);
        let rect = window::rect(hwnd)?;
        let proxy = thumbnail::create(hwnd, rect)?;
        self.proxies.insert(window, proxy);
        Ok(())
    }

    fn update_proxy(&mut self, window: WindowId, rect: Rect, monitor_rect: Rect) -> WmResult<()> {
        if let Some(proxy) = self.proxies.get_mut(&window) {
            proxy.update(rect, monitor_rect);
        }
        Ok(())
    }

    fn set_proxy_visible(&mut self, window: WindowId, visible: bool) -> WmResult<()> {
        if let Some(proxy) = self.proxies.get_mut(&window) {
            proxy.set_visible(visible);
        }
        Ok(())
    }

    fn reorder_proxy(&mut self, window: WindowId) -> WmResult<()> {
        if let Some(proxy) = self.proxies.get_mut(&window) {
            proxy.reorder();
        }
        Ok(())
    }

    fn destroy_proxy(&mut self, window: WindowId) -> WmResult<()> {
        self.proxies.remove(&window);
        Ok(())
    }
}

impl EventSource for WindowsAdapter {
    fn next_event(&mut self) -> Option<WindowEvent> {
        self.event_rx.as_ref()?.try_recv().ok()
    }
}

fn apply_placement(id: WindowId, placement: Placement) {
    let hwnd = window::hwnd_of(id);
    match placement {
        Placement::Show(rect) => {
            // SAFETY: SetWindowPos/ShowWindow act on a handle the core
            // already tracks; failures (window gone) are not fatal, the
            // next destroyed event reconciles the model (§7).
            unsafe {
                let _ = SetWindowPos(
                    hwnd,
                    None,
                    rect.left,
                    rect.top,
                    rect.width(),
                    rect.height(),
                    SWP_NOZORDER | SWP_NOACTIVATE,
                );
                let _ = ShowWindow(hwnd, SW_SHOWNOACTIVATE);
            }
        }
        Placement::Hide => hide(id),
    }
}

fn hide(id: WindowId) {
    let hwnd = window::hwnd_of(id);
    // SAFETY: ShowWindow(SW_HIDE) on a handle the core tracks; per §9 the
    // canonical way to hide an inactive workspace's windows, preserving
    // restore state (unlike minimizing).
    unsafe {
        let _ = ShowWindow(hwnd, SW_HIDE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_adapter_starts_with_no_event_thread() {
        let adapter = WindowsAdapter::new(12);
        assert!(adapter.event_loop.is_none());
        assert!(adapter.proxies.is_empty());
    }
}
