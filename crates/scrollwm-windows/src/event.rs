//! Translates a raw `SetWinEventHook` event into a [`WindowEvent`].

use scrollwm_core::WindowEvent;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    EVENT_OBJECT_CREATE, EVENT_OBJECT_DESTROY, EVENT_OBJECT_HIDE, EVENT_OBJECT_LOCATIONCHANGE,
    EVENT_OBJECT_NAMECHANGE, EVENT_OBJECT_SHOW, EVENT_SYSTEM_FOREGROUND, EVENT_SYSTEM_MINIMIZEEND,
    EVENT_SYSTEM_MINIMIZESTART, EVENT_SYSTEM_MOVESIZEEND,
};

/// Object ID for the window itself, as opposed to a child element like a
/// scrollbar or menu item.
const OBJID_WINDOW: i32 = 0;

/// Lowest and highest raw event codes `win_event_proc` registers for.
pub const EVENT_MIN: u32 = EVENT_SYSTEM_FOREGROUND;
pub const EVENT_MAX: u32 = EVENT_OBJECT_NAMECHANGE;

/// Translates a raw Win32 event into a [`WindowEvent`]. Returns `None`
/// for child-object events or codes the reactor doesn't act on
/// (`EVENT_OBJECT_LOCATIONCHANGE` fires far more often than
/// `EVENT_SYSTEM_MOVESIZEEND` and isn't needed for tiling).
pub fn translate(event: u32, hwnd: HWND, id_object: i32) -> Option<WindowEvent> {
    if id_object != OBJID_WINDOW {
        return None;
    }

    let id = crate::window::id_of(hwnd);

    match event {
        e if e == EVENT_OBJECT_SHOW || e == EVENT_OBJECT_CREATE => Some(WindowEvent::Created(id)),
        e if e == EVENT_OBJECT_DESTROY || e == EVENT_OBJECT_HIDE => {
            Some(WindowEvent::Destroyed(id))
        }
        e if e == EVENT_SYSTEM_FOREGROUND => Some(WindowEvent::ForegroundChanged(id)),
        e if e == EVENT_SYSTEM_MOVESIZEEND => Some(WindowEvent::Moved(id)),
        e if e == EVENT_SYSTEM_MINIMIZESTART => Some(WindowEvent::Minimized(id)),
        e if e == EVENT_SYSTEM_MINIMIZEEND => Some(WindowEvent::Restored(id)),
        e if e == EVENT_OBJECT_NAMECHANGE => Some(WindowEvent::TitleChanged(id)),
        e if e == EVENT_OBJECT_LOCATIONCHANGE => None,
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_child_object_events() {
        assert_eq!(translate(EVENT_OBJECT_CREATE, HWND::default(), 5), None);
    }

    #[test]
    fn create_and_show_both_map_to_created() {
        assert!(matches!(
            translate(EVENT_OBJECT_CREATE, HWND::default(), OBJID_WINDOW),
            Some(WindowEvent::Created(_))
        ));
        assert!(matches!(
            translate(EVENT_OBJECT_SHOW, HWND::default(), OBJID_WINDOW),
            Some(WindowEvent::Created(_))
        ));
    }

    #[test]
    fn foreground_maps_to_foreground_changed_not_focused() {
        assert!(matches!(
            translate(EVENT_SYSTEM_FOREGROUND, HWND::default(), OBJID_WINDOW),
            Some(WindowEvent::ForegroundChanged(_))
        ));
    }
}
