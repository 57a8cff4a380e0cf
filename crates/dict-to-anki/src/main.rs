//! Dict-to-Anki: system-wide vocabulary capture into Anki flashcards.

mod anki;
mod app;
mod capture;
mod clipboard;
mod config;
mod copy_key_guard;
mod deck_cache;
mod dictionary;
mod error;
mod listener;
mod monitor;
mod registrar;
mod single_instance;
#[cfg(test)]
mod tests;
mod tray_icon_state;
mod tray_manager;

pub(crate) use {
    anki::AnkiClient,
    app::{App, TickOutcome},
    capture::CaptureContext,
    copy_key_guard::CopyKeyGuard,
    deck_cache::DeckCache,
    dictionary::DictionaryClient,
    error::{AppError, Result as AppResult},
    listener::KeyListener,
    registrar::HotkeyRegistrar,
    single_instance::SingleInstance,
    tray_icon_state::TrayIconState,
    tray_manager::TrayManager,
};

use crate::config::Config;

use std::time::{Duration, Instant};

use tao::{
    event::{Event, StartCause},
    event_loop::{ControlFlow, EventLoop},
};
use tracing::{error, warn};

/// UI-thread poll cadence: the bus and the tray channels are drained this
/// often, so no handler waits longer than one interval.
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("dict_to_anki=debug")
        .init();

    let (start_minimized, direct_text) = parse_args();

    // Exactly one instance may own the settings file and the hotkey.
    let instance = match SingleInstance::acquire() {
        Ok(guard) => guard,
        Err(e) => {
            error!(error = %e, "Another instance is already running");
            let _ = notify_rust::Notification::new()
                .summary("Dict-to-Anki")
                .body("Dict-to-Anki is already running. Check your system tray.")
                .show();
            std::process::exit(1);
        }
    };

    let event_loop = EventLoop::new();

    // Moved into the Init arm of the loop closure exactly once.
    let mut boot = Some((instance, start_minimized, direct_text));
    let mut app: Option<App> = None;

    event_loop.run(move |event, _, control_flow| {
        match event {
            Event::NewEvents(StartCause::Init) => {
                let Some((instance, start_minimized, direct_text)) = boot.take() else {
                    return;
                };

                // A corrupt settings file falls back to defaults; startup
                // only fails on resources we cannot run without.
                let config = Config::load_or_default();

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                match App::bootstrap(config, instance, start_minimized, direct_text) {
                    Ok(a) => app = Some(a),
                    Err(e) => {
                        error!("Failed to start: {:?}", e);
                        std::process::exit(1);
                    }
                }

                *control_flow = ControlFlow::WaitUntil(Instant::now() + EVENT_POLL_INTERVAL);
            }
            Event::NewEvents(_) => {
                if let Some(app) = app.as_mut() {
                    match app.tick() {
                        TickOutcome::Exit => {
                            *control_flow = ControlFlow::ExitWithCode(0);
                        }
                        TickOutcome::Continue => {
                            *control_flow =
                                ControlFlow::WaitUntil(Instant::now() + EVENT_POLL_INTERVAL);
                        }
                    }
                }
            }
            _ => {}
        }
    });
}

/// Minimal CLI surface: a minimized-start flag (used by autostart entries)
/// and direct text that skips clipboard capture.
fn parse_args() -> (bool, Option<String>) {
    let mut start_minimized = false;
    let mut direct_text = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--minimized" => start_minimized = true,
            "--text" => direct_text = args.next(),
            other => warn!(argument = other, "Ignoring unknown argument"),
        }
    }

    (start_minimized, direct_text)
}
