//! Thin HWND query helpers shared by the adapter, the enumerator, and the
//! event translator. `HWND` is an opaque handle; everything here reads
//! OS state without retaining it, since the model stores only the
//! `usize` id.

use scrollwm_core::{Rect, WmResult};
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::UI::WindowsAndMessaging::{
    GetWindowRect, GetWindowTextLengthW, GetWindowTextW, IsIconic, IsWindow, IsWindowVisible,
};

pub fn hwnd_of(id: scrollwm_core::WindowId) -> HWND {
    HWND(id as *mut _)
}

pub fn id_of(hwnd: HWND) -> scrollwm_core::WindowId {
    hwnd.0 as usize
}

pub fn title(hwnd: HWND) -> String {
    // SAFETY: GetWindowTextLengthW/GetWindowTextW read window text for a
    // valid HWND without modifying state.
    unsafe {
        let length = GetWindowTextLengthW(hwnd);
        if length == 0 {
            return String::new();
        }
        let mut buffer = vec![0u16; (length + 1) as usize];
        let copied = GetWindowTextW(hwnd, &mut buffer);
        String::from_utf16_lossy(&buffer[..copied as usize])
    }
}

pub fn rect(hwnd: HWND) -> WmResult<Rect> {
    let mut rc = RECT::default();
    // SAFETY: GetWindowRect writes the bounding rectangle into `rc`.
    unsafe {
        GetWindowRect(hwnd, &mut rc)?;
    }
    Ok(Rect::new(rc.left, rc.top, rc.right, rc.bottom))
}

pub fn is_window(hwnd: HWND) -> bool {
    // SAFETY: IsWindow is a simple query.
    unsafe { IsWindow(hwnd).as_bool() }
}

pub fn is_visible(hwnd: HWND) -> bool {
    // SAFETY: IsWindowVisible is a simple query.
    unsafe { IsWindowVisible(hwnd).as_bool() }
}

pub fn is_minimized(hwnd: HWND) -> bool {
    // SAFETY: IsIconic is a simple query.
    unsafe { IsIconic(hwnd).as_bool() }
}
