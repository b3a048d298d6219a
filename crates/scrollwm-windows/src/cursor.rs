//! Cursor position polling for cursor-follows-focus (SPEC supplement
//! §4.3), grounded on `original_source`'s `check_mouse_move`
//! (`win32api.GetCursorPos`).

use scrollwm_core::WmResult;
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

/// The current OS cursor position, in screen coordinates.
pub fn position() -> WmResult<(i32, i32)> {
    let mut point = POINT::default();
    // SAFETY: GetCursorPos writes into a valid POINT we own.
    unsafe {
        GetCursorPos(&mut point)?;
    }
    Ok((point.x, point.y))
}
