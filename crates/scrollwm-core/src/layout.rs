//! Pure mapping from a focused workspace to per-window target rectangles.

use crate::model::{Workspace, WindowId};
use crate::Rect;

/// What the layout engine wants done with one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Show(Rect),
    Hide,
}

/// Computes placements for every window in `workspace`, per §4.C.
///
/// `work_rect` is the monitor's usable area (excluding taskbars etc.),
/// `monitor_rect` is its full physical rectangle, and `gap` is the gap
/// in pixels applied on every side and between windows implicitly (via
/// the fractional-width/scroll-offset camera model — there is no
/// separate inter-window gap term).
pub fn compute_layout(
    workspace: &Workspace,
    work_rect: Rect,
    monitor_rect: Rect,
    gap: i32,
) -> Vec<(WindowId, Placement)> {
    let avail = work_rect.inset(gap);

    if avail.width() <= 0 || avail.height() <= 0 {
        return workspace
            .windows
            .iter()
            .map(|w| (w.id, Placement::Hide))
            .collect();
    }

    let origin_x =
        work_rect.left + gap - (avail.width() as f64 * workspace.scroll_offset).floor() as i32;
    let origin_y = work_rect.top + gap;

    workspace
        .windows
        .iter()
        .map(|window| {
            let w_px = (avail.width() as f64 * window.width).floor() as i32;
            let dx_px = (avail.width() as f64 * window.x).floor() as i32;
            let target = Rect::new(
                origin_x + dx_px,
                origin_y,
                origin_x + dx_px + w_px,
                origin_y + avail.height(),
            );
            if target.intersects(&monitor_rect) {
                (window.id, Placement::Show(target))
            } else {
                (window.id, Placement::Hide)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Window;

    fn workspace_with(widths: &[f64]) -> Workspace {
        let mut ws = Workspace::new(0, Some(0));
        for (i, &w) in widths.iter().enumerate() {
            let mut win = Window::new(i as usize + 1, 0);
            win.width = w;
            ws.push(win);
        }
        ws.relayout();
        ws
    }

    #[test]
    fn single_window_fills_work_rect_minus_gap() {
        let ws = workspace_with(&[1.0]);
        let work_rect = Rect::new(0, 0, 1920, 1080);
        let monitor_rect = work_rect;

        let placements = compute_layout(&ws, work_rect, monitor_rect, 10);

        assert_eq!(
            placements[0].1,
            Placement::Show(Rect::new(10, 10, 1910, 1070))
        );
    }

    #[test]
    fn zero_available_area_hides_everything() {
        let ws = workspace_with(&[1.0, 1.0]);
        // Gap larger than half the work rect collapses available width.
        let work_rect = Rect::new(0, 0, 10, 10);
        let monitor_rect = work_rect;

        let placements = compute_layout(&ws, work_rect, monitor_rect, 20);

        assert!(placements.iter().all(|(_, p)| *p == Placement::Hide));
    }

    #[test]
    fn offscreen_window_is_hidden() {
        // A workspace scrolled far enough that a window's target rect
        // no longer intersects the monitor must be hidden, not shown
        // off-canvas.
        let mut ws = workspace_with(&[1.0, 1.0, 1.0]);
        ws.scroll_offset = 2.0; // third window now fills the viewport
        let work_rect = Rect::new(0, 0, 1000, 1000);
        let monitor_rect = work_rect;

        let placements = compute_layout(&ws, work_rect, monitor_rect, 0);

        assert_eq!(placements[0].1, Placement::Hide);
        assert_eq!(placements[1].1, Placement::Hide);
        assert!(matches!(placements[2].1, Placement::Show(_)));
    }

    #[test]
    fn gap_insets_every_edge() {
        let ws = workspace_with(&[0.5, 0.5]);
        let work_rect = Rect::new(0, 0, 1000, 1000);
        let monitor_rect = work_rect;

        let placements = compute_layout(&ws, work_rect, monitor_rect, 5);

        let Placement::Show(first) = placements[0].1 else {
            panic!("expected first window to be shown")
        };
        assert_eq!(first.left, 5);
        assert_eq!(first.top, 5);
        assert_eq!(first.bottom, 995);
    }
}
