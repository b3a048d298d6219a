//! Enumerates manageable top-level windows (§6, SPEC supplement §4.2).
//!
//! The filter criteria mirror `original_source`'s `is_manageable`: a
//! window only qualifies if it is a visible, owner-less, non-child,
//! non-tool, non-topmost top-level window belonging to a different
//! process, with a non-empty title and not one of a handful of blacklisted
//! shell windows.

use scrollwm_core::{WindowId, WmResult};
use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::System::Threading::GetCurrentProcessId;
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GWL_EXSTYLE, GWL_STYLE, GW_OWNER, GetClassNameW, GetParent, GetWindow,
    GetWindowLongW, GetWindowThreadProcessId, WS_CHILD, WS_EX_TOOLWINDOW, WS_EX_TOPMOST,
    WS_OVERLAPPEDWINDOW,
};
use windows::core::BOOL;

use crate::window;

/// Windows shell surfaces that are technically top-level but never meant
/// to be tiled, keyed by `(class_name, title)`.
const BLACKLISTED: &[(&str, &str)] = &[
    ("Progman", "Program Manager"),
    ("Shell_TrayWnd", "Taskbar"),
    ("Button", "Start"),
    ("DV2ControlHost", "SearchBox"),
];

/// Enumerates every currently manageable top-level window (§6).
pub fn enumerate_windows() -> WmResult<Vec<WindowId>> {
    let mut ids: Vec<WindowId> = Vec::new();

    // SAFETY: EnumWindows invokes our callback once per top-level window,
    // synchronously; the Vec pointer passed through LPARAM outlives it.
    unsafe {
        EnumWindows(
            Some(enum_window_callback),
            LPARAM(&mut ids as *mut _ as isize),
        )?;
    }

    Ok(ids)
}

unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the Vec<WindowId> pointer passed above.
    let ids = unsafe { &mut *(lparam.0 as *mut Vec<WindowId>) };

    if is_manageable(hwnd) {
        ids.push(window::id_of(hwnd));
    }

    BOOL(1)
}

/// The manageability predicate (SPEC supplement §4.2).
pub fn is_manageable(hwnd: HWND) -> bool {
    if !window::is_window(hwnd) || !window::is_visible(hwnd) {
        return false;
    }

    // SAFETY: GetWindow/GetParent/GetWindowLongW/GetWindowThreadProcessId
    // are simple queries on a window handle we already validated above.
    unsafe {
        if !GetWindow(hwnd, GW_OWNER).is_invalid() {
            return false;
        }
        if !GetParent(hwnd).is_invalid() {
            return false;
        }

        let style = GetWindowLongW(hwnd, GWL_STYLE) as u32;
        if style & WS_OVERLAPPEDWINDOW.0 == 0 {
            return false;
        }
        if style & WS_CHILD.0 != 0 {
            return false;
        }

        let ex_style = GetWindowLongW(hwnd, GWL_EXSTYLE) as u32;
        if ex_style & WS_EX_TOOLWINDOW.0 != 0 {
            return false;
        }
        if ex_style & WS_EX_TOPMOST.0 != 0 {
            return false;
        }

        let mut pid = 0u32;
        GetWindowThreadProcessId(hwnd, Some(&mut pid));
        if pid == GetCurrentProcessId() {
            return false;
        }
    }

    let title = window::title(hwnd);
    if title.trim().is_empty() {
        return false;
    }

    let class_name = class_name(hwnd);
    if BLACKLISTED.iter().any(|(c, t)| *c == class_name && *t == title) {
        return false;
    }

    true
}

fn class_name(hwnd: HWND) -> String {
    // SAFETY: GetClassNameW reads the window class into our buffer.
    unsafe {
        let mut buffer = [0u16; 256];
        let length = GetClassNameW(hwnd, &mut buffer);
        String::from_utf16_lossy(&buffer[..length as usize])
    }
}
