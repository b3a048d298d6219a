//! Monitor enumeration via `EnumDisplayMonitors`.

use std::mem;

use scrollwm_core::adapter::MonitorInfo;
use scrollwm_core::{Rect, WmResult};
use windows::Win32::Foundation::{LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO,
};
use windows::core::BOOL;

/// Snapshots every display attached to the system (§4.F `monitors()`).
pub fn enumerate_monitors() -> WmResult<Vec<MonitorInfo>> {
    let mut monitors: Vec<MonitorInfo> = Vec::new();

    // SAFETY: EnumDisplayMonitors calls our callback once per monitor,
    // passing the Vec's address through LPARAM; the callback casts it
    // back. The call is synchronous, so the Vec outlives it.
    unsafe {
        let _ = EnumDisplayMonitors(
            None,
            None,
            Some(enum_monitor_callback),
            LPARAM(&mut monitors as *mut _ as isize),
        );
    }

    Ok(monitors)
}

unsafe extern "system" fn enum_monitor_callback(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    // SAFETY: lparam is the Vec<MonitorInfo> pointer passed above.
    let monitors = unsafe { &mut *(lparam.0 as *mut Vec<MonitorInfo>) };

    if let Some(info) = monitor_info(hmonitor) {
        monitors.push(info);
    }

    BOOL(1)
}

fn monitor_info(hmonitor: HMONITOR) -> Option<MonitorInfo> {
    let mut info = MONITORINFO {
        cbSize: mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    // SAFETY: GetMonitorInfoW fills `info` for a valid monitor handle.
    let ok = unsafe { GetMonitorInfoW(hmonitor, &mut info) };
    if !ok.as_bool() {
        return None;
    }

    Some(MonitorInfo {
        rect: to_rect(info.rcMonitor),
        work_rect: to_rect(info.rcWork),
    })
}

fn to_rect(rc: RECT) -> Rect {
    Rect::new(rc.left, rc.top, rc.right, rc.bottom)
}
