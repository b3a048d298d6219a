//! Display-proxy cloaking thumbnail (SPEC supplement §4.1), grounded on
//! `original_source/adapters/windows/thumbnail/{cloak,thumbnail_window}.py`.
//!
//! A cloaked window stays interactive (not actually hidden) but invisible
//! via `WS_EX_LAYERED` + near-zero alpha, while a small DWM-registered
//! thumbnail mirrors its contents at the real on-screen position. This
//! module is self-contained and wired into the event reactor's hooks
//! (§4.E); the canonical hide-inactive-workspace path in `refresh()`
//! uses plain `ShowWindow` and never calls it (§9 open question: "choose
//! hide as canonical").

use std::mem;
use std::sync::Mutex;

use scrollwm_core::{Rect, WmResult};
use windows::Win32::Foundation::{COLORREF, HWND, RECT};
use windows::Win32::Graphics::Dwm::{
    DWM_THUMBNAIL_PROPERTIES, DWM_TNP_OPACITY, DWM_TNP_RECTDESTINATION, DWM_TNP_RECTSOURCE,
    DWM_TNP_VISIBLE, DwmRegisterThumbnail, DwmUnregisterThumbnail, DwmUpdateThumbnailProperties,
    HTHUMBNAIL,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GWL_EXSTYLE, GetWindowLongPtrW, LWA_ALPHA,
    RegisterClassW, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOREDRAW, SWP_NOSIZE, SWP_NOZORDER,
    SetLayeredWindowAttributes, SetWindowLongPtrW, SetWindowPos, ShowWindow, SW_HIDE, SW_SHOW,
    WNDCLASSW, WS_EX_LAYERED, WS_EX_TOOLWINDOW, WS_POPUP, WS_VISIBLE,
};
use windows::core::w;

/// A live cloaking thumbnail for one hidden source window.
pub struct DisplayProxy {
    source: HWND,
    host: HWND,
    thumbnail_id: HTHUMBNAIL,
}

// SAFETY: HWND/HTHUMBNAIL are plain handles; all access to a DisplayProxy
// goes through the single world lock (§5), so no two threads touch one
// concurrently.
unsafe impl Send for DisplayProxy {}

static CLASS_REGISTERED: Mutex<bool> = Mutex::new(false);

fn register_class_if_needed() {
    let mut registered = CLASS_REGISTERED.lock().unwrap();
    if *registered {
        return;
    }
    let wc = WNDCLASSW {
        lpfnWndProc: Some(DefWindowProcW),
        lpszClassName: w!("ScrollwmThumbnailClass"),
        ..Default::default()
    };
    // SAFETY: wc is a valid, fully-initialised WNDCLASSW.
    unsafe {
        RegisterClassW(&wc);
    }
    *registered = true;
}

/// Cloaks `source` (makes it invisible-but-interactive) and mirrors it
/// with a DWM thumbnail positioned at `rect`.
pub fn create(source: HWND, rect: Rect) -> WmResult<DisplayProxy> {
    register_class_if_needed();

    // SAFETY: CreateWindowExW with WS_POPUP and no parent creates a
    // standalone top-level window; we own `host` for this proxy's life.
    let host = unsafe {
        CreateWindowExW(
            WS_EX_TOOLWINDOW,
            w!("ScrollwmThumbnailClass"),
            w!("scrollwm thumbnail"),
            WS_POPUP | WS_VISIBLE,
            rect.left,
            rect.top,
            rect.width(),
            rect.height(),
            None,
            None,
            None,
            None,
        )?
    };

    let mut thumbnail_id = HTHUMBNAIL::default();
    // SAFETY: host and source are both valid window handles at this point.
    unsafe {
        DwmRegisterThumbnail(host, source, &mut thumbnail_id)?;
    }

    let props = DWM_THUMBNAIL_PROPERTIES {
        dwFlags: (DWM_TNP_RECTDESTINATION | DWM_TNP_RECTSOURCE | DWM_TNP_VISIBLE | DWM_TNP_OPACITY)
            .0 as u32,
        rcDestination: RECT {
            left: 0,
            top: 0,
            right: rect.width(),
            bottom: rect.height(),
        },
        rcSource: RECT {
            left: 0,
            top: 0,
            right: rect.width(),
            bottom: rect.height(),
        },
        opacity: 255,
        fVisible: true.into(),
        fSourceClientAreaOnly: false.into(),
    };
    // SAFETY: thumbnail_id was just returned by DwmRegisterThumbnail above.
    unsafe {
        let _ = DwmUpdateThumbnailProperties(thumbnail_id, &props);
    }

    cloak_source(source);
    fix_z_order(host, source);

    Ok(DisplayProxy {
        source,
        host,
        thumbnail_id,
    })
}

impl DisplayProxy {
    /// Updates the mirrored crop and on-screen position after the source
    /// window moves (§4.E `window-moved`).
    pub fn update(&mut self, rect: Rect, monitor_rect: Rect) {
        let clamped = rect.intersection(&monitor_rect).unwrap_or(rect);
        let local = Rect::new(
            clamped.left - rect.left,
            clamped.top - rect.top,
            clamped.right - rect.left,
            clamped.bottom - rect.top,
        );

        let props = DWM_THUMBNAIL_PROPERTIES {
            dwFlags: (DWM_TNP_RECTDESTINATION | DWM_TNP_RECTSOURCE).0 as u32,
            rcDestination: RECT {
                left: 0,
                top: 0,
                right: local.width(),
                bottom: local.height(),
            },
            rcSource: RECT {
                left: local.left,
                top: local.top,
                right: local.right,
                bottom: local.bottom,
            },
            ..Default::default()
        };
        // SAFETY: thumbnail_id is owned by this proxy and still registered.
        unsafe {
            let _ = DwmUpdateThumbnailProperties(self.thumbnail_id, &props);
        }

        let pos = clamp_point((clamped.left, clamped.top), monitor_rect);
        // SAFETY: host is a valid window we own.
        unsafe {
            let _ = SetWindowPos(
                self.host,
                None,
                pos.0,
                pos.1,
                local.width(),
                local.height(),
                SWP_NOZORDER | SWP_NOACTIVATE | SWP_NOREDRAW,
            );
        }
    }

    /// Shows or hides the thumbnail host without touching the model.
    pub fn set_visible(&mut self, visible: bool) {
        // SAFETY: host is a valid window we own.
        unsafe {
            let _ = ShowWindow(self.host, if visible { SW_SHOW } else { SW_HIDE });
        }
    }

    /// Re-orders the thumbnail just below the source in z-order.
    pub fn reorder(&mut self) {
        fix_z_order(self.host, self.source);
    }
}

impl Drop for DisplayProxy {
    fn drop(&mut self) {
        // SAFETY: thumbnail_id and host are owned exclusively by this proxy.
        unsafe {
            let _ = DwmUnregisterThumbnail(self.thumbnail_id);
        }
        uncloak_source(self.source);
        unsafe {
            let _ = DestroyWindow(self.host);
        }
    }
}

fn cloak_source(hwnd: HWND) {
    // SAFETY: GetWindowLongPtrW/SetWindowLongPtrW/SetLayeredWindowAttributes
    // operate on a window handle we've validated exists.
    unsafe {
        let ex_style = GetWindowLongPtrW(hwnd, GWL_EXSTYLE) as u32;
        SetWindowLongPtrW(
            hwnd,
            GWL_EXSTYLE,
            (ex_style | WS_EX_LAYERED.0) as isize,
        );
        let _ = SetLayeredWindowAttributes(hwnd, COLORREF(0), 1, LWA_ALPHA);
    }
}

fn uncloak_source(hwnd: HWND) {
    // SAFETY: same as `cloak_source`.
    unsafe {
        let _ = SetLayeredWindowAttributes(hwnd, COLORREF(0), 255, LWA_ALPHA);
        let ex_style = GetWindowLongPtrW(hwnd, GWL_EXSTYLE) as u32;
        SetWindowLongPtrW(
            hwnd,
            GWL_EXSTYLE,
            (ex_style & !WS_EX_LAYERED.0) as isize,
        );
    }
}

fn fix_z_order(host: HWND, insert_after: HWND) {
    let _ = insert_after;
    // SAFETY: host is a window we own.
    unsafe {
        let _ = SetWindowPos(
            host,
            Some(insert_after),
            0,
            0,
            0,
            0,
            SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE | SWP_NOREDRAW,
        );
    }
}

fn clamp_point(point: (i32, i32), bounds: Rect) -> (i32, i32) {
    (
        point.0.clamp(bounds.left, bounds.right),
        point.1.clamp(bounds.top, bounds.bottom),
    )
}

