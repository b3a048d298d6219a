//! Entry point: wires the platform-agnostic core (`scrollwm_core`) to
//! the reference Windows adapter (`scrollwm_windows`) and runs the main
//! loop (§4.H).
//!
//! Every input source (command stream, cursor ticker, OS event thread,
//! Ctrl+C) is a thread that only ever sends messages onto one
//! `mpsc::channel`. The main thread is the sole consumer and the sole
//! owner of [`WindowManager`], so the world is never touched by two
//! threads at once — the reentrant lock called for elsewhere (§5) falls
//! out for free instead of needing an explicit `Mutex`.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;

use scrollwm_core::{log_error, log_info, log_warn};
use scrollwm_core::{parse_line, PlatformAdapter, WindowEvent, WindowManager, World};
use scrollwm_windows::WindowsAdapter;

/// A scrolling tiling window manager.
///
/// Takes no required arguments: running with no flags starts the
/// window manager directly and reads commands from stdin (§4.G, §6).
#[derive(Parser)]
#[command(name = "scrollwm", version, about = "A scrolling tiling window manager")]
struct Cli;

/// Every event that can move the main loop forward (§4.H).
enum Msg {
    /// One line from the command stream (§4.G).
    Line(String),
    /// The command stream reached end-of-stream; equivalent to `exit`.
    StdinClosed,
    /// The ~50ms world ticker fired: drain adapter events, then poll
    /// the cursor for cursor-follows-focus.
    Tick,
    /// Ctrl+C was pressed.
    CtrlC,
}

fn main() {
    let _cli = Cli::parse();

    let config = scrollwm_core::config::load();
    scrollwm_core::log::init(&config.log);
    if let Err(e) = scrollwm_core::pid::write_pid_file() {
        log_warn!("could not write PID file: {e}");
    }

    log_info!("scrollwm starting (PID: {})", std::process::id());
    run(&config);

    if let Err(e) = scrollwm_core::pid::remove_pid_file() {
        log_warn!("could not remove PID file: {e}");
    }
}

fn run(config: &scrollwm_core::Config) {
    let mut adapter = WindowsAdapter::new(config.layout.gap_px);

    // Fatal platform failure (§7): the event loop cannot be initialized.
    if let Err(e) = adapter.initialize() {
        log_error!("fatal: could not initialize the platform adapter: {e}");
        std::process::exit(1);
    }

    let monitor_infos = match adapter.monitors() {
        Ok(m) if !m.is_empty() => m,
        Ok(_) => {
            log_error!("fatal: the platform adapter reported no monitors");
            std::process::exit(1);
        }
        Err(e) => {
            log_error!("fatal: could not enumerate monitors: {e}");
            std::process::exit(1);
        }
    };

    let world = World::new(
        monitor_infos
            .into_iter()
            .map(|m| (m.rect, m.work_rect))
            .collect(),
    );
    let mut manager = WindowManager::new(world, adapter);

    // Populate the initial window snapshot (§3, "Window created when the
    // adapter reports a manageable top-level window").
    match scrollwm_windows::enumerate_windows() {
        Ok(ids) => {
            for id in ids {
                manager.handle_event(WindowEvent::Created(id));
            }
        }
        Err(e) => log_warn!("initial window enumeration failed: {e}"),
    }
    manager.refresh();

    let (tx, rx) = mpsc::channel::<Msg>();
    let running = Arc::new(AtomicBool::new(true));

    // The stdin reader and Ctrl+C bridge only ever unblock on their own
    // external event (a line, EOF, or a signal) — neither is guaranteed
    // to wake up once the world stops running, so they are left
    // detached rather than joined; the process exiting reclaims them.
    // Only the ticker is bounded (it re-checks `running` every 50ms) and
    // worth waiting for.
    spawn_stdin_reader(tx.clone());
    let ticker_thread = spawn_ticker(tx.clone(), Arc::clone(&running));
    spawn_ctrlc_bridge(tx.clone());

    for msg in rx.iter() {
        match msg {
            Msg::Line(line) => match parse_line(&line) {
                Some(action) => manager.dispatch(action),
                None if line.trim().is_empty() => {}
                None => log_warn!("unknown command: {line}"),
            },
            Msg::StdinClosed => manager.world.running = false,
            Msg::Tick => {
                manager.drain_events();
                manager.tick_cursor();
            }
            Msg::CtrlC => manager.world.running = false,
        }

        if !manager.world.running {
            break;
        }
    }

    running.store(false, Ordering::Relaxed);
    manager.adapter.stop();

    log_info!("scrollwm stopping");
    let _ = ticker_thread.join();
}

/// Reads the command stream (stdin) line by line (§4.G, §6). End of
/// stream sends [`Msg::StdinClosed`], equivalent to `exit` (§4.G).
///
/// Detached: a blocked read on a terminal that is never closed must not
/// keep the process alive after shutdown is requested some other way.
fn spawn_stdin_reader(tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Msg::Line(line)).is_err() {
                        return;
                    }
                }
                Err(_) => break,
            }
        }
        let _ = tx.send(Msg::StdinClosed);
    });
}

/// The ~50ms world ticker (§4.H): drives cursor-follows-focus polling
/// and event draining. Exits at its next wake after `running` is
/// cleared (§5 "Cancellation & timeouts").
fn spawn_ticker(tx: mpsc::Sender<Msg>, running: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(50));
            if !running.load(Ordering::Relaxed) {
                break;
            }
            if tx.send(Msg::Tick).is_err() {
                break;
            }
        }
    })
}

/// Bridges the Win32 Ctrl+C handler onto the unified message channel.
///
/// Detached for the same reason as the stdin reader: it only wakes on a
/// signal that may never come again once the world is already stopping.
fn spawn_ctrlc_bridge(tx: mpsc::Sender<Msg>) {
    let (ctrlc_tx, ctrlc_rx) = mpsc::channel();
    scrollwm_windows::ctrl_c::set_handler(ctrlc_tx);
    thread::spawn(move || {
        if ctrlc_rx.recv().is_ok() {
            let _ = tx.send(Msg::CtrlC);
        }
    });
}
