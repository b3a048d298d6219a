//! The Win32 event thread: a `SetWinEventHook` registration plus a plain
//! message pump. No hotkeys, no display-change handling, no hover
//! timers — keyboard capture and monitor hot-plug are out of scope
//! (§1 Non-goals; monitor count is fixed at startup per §4.B).

use std::sync::mpsc::Sender;
use std::thread;

use scrollwm_core::{WindowEvent, WmResult};
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::UI::Accessibility::{HWINEVENTHOOK, SetWinEventHook, UnhookWinEvent};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, MSG, PostThreadMessageW, TranslateMessage, WINEVENT_OUTOFCONTEXT,
    WINEVENT_SKIPOWNPROCESS, WM_QUIT,
};
use windows::Win32::{Foundation::HWND, System::Threading::GetCurrentThreadId};

use crate::event;

thread_local! {
    static EVENT_SENDER: std::cell::RefCell<Option<Sender<WindowEvent>>> =
        const { std::cell::RefCell::new(None) };
}

/// Handle for stopping the event thread from the main loop.
pub struct EventLoopHandle {
    thread_id: u32,
    handle: thread::JoinHandle<()>,
}

impl EventLoopHandle {
    /// Posts `WM_QUIT` to the event thread's queue and joins it.
    pub fn stop(self) {
        unsafe {
            let _ = PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
        }
        let _ = self.handle.join();
    }
}

/// Spawns the event thread and blocks until the hook is installed.
pub fn start(event_tx: Sender<WindowEvent>) -> WmResult<EventLoopHandle> {
    let (ready_tx, ready_rx) = std::sync::mpsc::channel::<Result<u32, String>>();

    let handle = thread::spawn(move || {
        EVENT_SENDER.with(|cell| *cell.borrow_mut() = Some(event_tx));

        let thread_id = unsafe { GetCurrentThreadId() };

        // SAFETY: SetWinEventHook registers our callback for system-wide
        // window events; WINEVENT_OUTOFCONTEXT runs it in our process,
        // WINEVENT_SKIPOWNPROCESS filters out our own windows.
        let hook = unsafe {
            SetWinEventHook(
                event::EVENT_MIN,
                event::EVENT_MAX,
                None,
                Some(win_event_proc),
                0,
                0,
                WINEVENT_OUTOFCONTEXT | WINEVENT_SKIPOWNPROCESS,
            )
        };

        if hook.is_invalid() {
            let _ = ready_tx.send(Err("failed to set WinEvent hook".to_string()));
            return;
        }

        let _ = ready_tx.send(Ok(thread_id));

        run_message_pump();

        unsafe {
            let _ = UnhookWinEvent(hook);
        }
    });

    let thread_id = ready_rx
        .recv()
        .map_err(|_| -> Box<dyn std::error::Error + Send + Sync> {
            "event loop thread exited unexpectedly".into()
        })?
        .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { e.into() })?;

    Ok(EventLoopHandle { thread_id, handle })
}

/// Blocks, dispatching messages, until `WM_QUIT` is posted.
fn run_message_pump() {
    let mut msg = MSG::default();
    while unsafe { GetMessageW(&mut msg, None, 0, 0).as_bool() } {
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

/// The `SetWinEventHook` callback: translates and forwards to the
/// channel the owning thread drains.
unsafe extern "system" fn win_event_proc(
    _hook: HWINEVENTHOOK,
    event: u32,
    hwnd: HWND,
    id_object: i32,
    _id_child: i32,
    _event_thread: u32,
    _event_time: u32,
) {
    if let Some(window_event) = event::translate(event, hwnd, id_object) {
        EVENT_SENDER.with(|cell| {
            if let Some(sender) = cell.borrow().as_ref() {
                let _ = sender.send(window_event);
            }
        });
    }
}
