//! Main application state and UI-thread dispatch.
//!
//! Owns everything the UI thread touches: the tray, the hotkey registrar,
//! the configuration, and the consumer half of the event bus. Background
//! work (availability monitor, capture tasks) runs on a tokio runtime and
//! reaches back only through queued events; handlers here run serially and
//! never block.

use crate::{
    AnkiClient, AppResult, CaptureContext, DeckCache, DictionaryClient, HotkeyRegistrar,
    KeyListener, SingleInstance, TrayIconState, TrayManager,
    capture::{run_capture, run_deck_choice},
    config::Config,
    monitor::AvailabilityMonitor,
    tray_manager::PendingCapture,
};

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use dict_to_anki_core::{EventReceiver, EventSender, HotkeyCombination, HotkeyRecorder, UiEvent};
use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use notify_rust::Notification;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};
use tray_icon::menu::MenuEvent;

/// Outcome of one UI poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep polling.
    Continue,
    /// Leave the event loop with exit code 0.
    Exit,
}

/// Main application state, owned by the UI thread.
pub struct App {
    config: Config,
    events_tx: EventSender,
    events_rx: EventReceiver,
    tray: TrayManager,
    registrar: HotkeyRegistrar,
    recorder: Arc<Mutex<HotkeyRecorder>>,
    listener: KeyListener,
    runtime: tokio::runtime::Runtime,
    shutdown_tx: watch::Sender<bool>,
    capture_ctx: CaptureContext,
    /// Current display deck list (live or cached).
    decks: Vec<String>,
    /// Capture awaiting a deck choice from the tray picker.
    pending: Option<PendingCapture>,
    /// Notes created this session.
    notes_created: usize,
    _instance: SingleInstance,
}

impl App {
    /// Wire every component together and start the background tasks.
    ///
    /// Must run on the main thread: the tray icon and the hotkey manager
    /// both need the thread that pumps OS messages.
    #[instrument(skip_all)]
    pub fn bootstrap(
        config: Config,
        instance: SingleInstance,
        start_minimized: bool,
        direct_text: Option<String>,
    ) -> AppResult<Self> {
        let (events_tx, events_rx) = dict_to_anki_core::channel();

        let tray = TrayManager::new()?;

        let mut registrar = HotkeyRegistrar::new()?;
        Self::bind_persisted_hotkey(&mut registrar, &config);

        let runtime = tokio::runtime::Runtime::new()?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let anki = AnkiClient::new(config.anki.url.clone());
        let dictionary = DictionaryClient::new(
            Duration::from_secs(config.dictionary.lookup_timeout_secs),
            config.dictionary.max_definitions,
        );
        let default_deck = Arc::new(Mutex::new(config.behaviour.default_deck.clone()));

        let capture_ctx = CaptureContext {
            events: events_tx.clone(),
            anki: anki.clone(),
            dictionary,
            default_deck,
        };

        // The UI shows the last-known-good deck list until the first
        // successful probe overwrites it.
        let cache = DeckCache::load();
        let decks = cache.decks().to_vec();

        let monitor = AvailabilityMonitor::new(anki, cache, events_tx.clone());
        runtime.spawn(monitor.run(shutdown_rx));

        // Forward hotkey activations into capture tasks. The receiver is a
        // crossbeam channel with blocking recv, so one dedicated blocking
        // task drains it for the process lifetime.
        let spawner = runtime.handle().clone();
        let ctx = capture_ctx.clone();
        runtime.spawn_blocking(move || {
            let receiver = GlobalHotKeyEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if matches!(event.state, HotKeyState::Pressed) {
                    debug!(hotkey_id = event.id, "Hotkey fired");
                    spawner.spawn(run_capture(ctx.clone(), None));
                }
            }
        });

        // CLI-supplied text skips the clipboard steps entirely.
        if let Some(text) = direct_text {
            runtime.spawn(run_capture(capture_ctx.clone(), Some(text)));
        }

        let mut app = Self {
            config,
            events_tx,
            events_rx,
            tray,
            registrar,
            recorder: Arc::new(Mutex::new(HotkeyRecorder::new())),
            listener: KeyListener::new(),
            runtime,
            shutdown_tx,
            capture_ctx,
            decks,
            pending: None,
            notes_created: 0,
            _instance: instance,
        };

        app.rebuild_menu();
        app.refresh_tooltip();

        if !start_minimized {
            let hotkey = app
                .registrar
                .combination()
                .map(|c| c.display_upper())
                .unwrap_or_else(|| "disabled".to_string());
            app.events_tx.emit(UiEvent::ShowTransientMessage(format!(
                "Dict-to-Anki running. Hotkey: {}",
                hotkey
            )));
        }

        info!("Dict-to-Anki started");

        Ok(app)
    }

    /// One UI poll tick: drain tray menu clicks, then drain the event bus.
    pub fn tick(&mut self) -> TickOutcome {
        while let Ok(event) = MenuEvent::receiver().try_recv() {
            self.handle_menu_event(event);
        }

        let events: Vec<UiEvent> = self.events_rx.drain().collect();
        for event in events {
            if self.handle_event(event) == TickOutcome::Exit {
                return TickOutcome::Exit;
            }
        }

        TickOutcome::Continue
    }

    /// Dispatch one queued event. Handlers are idempotent-safe against
    /// stale events -- a deck choice for a capture that no longer pends, or
    /// a deck-list update while nothing shows it, must be a no-op.
    fn handle_event(&mut self, event: UiEvent) -> TickOutcome {
        match event {
            UiEvent::ShowTransientMessage(text) => self.notify(&text),
            UiEvent::ShowDeckPicker { word, back } => {
                info!(word, "Capture awaiting deck choice");
                self.pending = Some(PendingCapture {
                    word: word.clone(),
                    back,
                });
                self.rebuild_menu();
                self.notify(&format!(
                    "Captured '{}'. Choose a deck from the tray menu.",
                    word
                ));
            }
            UiEvent::FinalizeHotkeyRecording => self.finalize_recording(),
            UiEvent::ShowMainWindow => self.show_status(),
            UiEvent::QuitApplication => {
                info!("Shutdown requested");
                let _ = self.shutdown_tx.send(true);
                return TickOutcome::Exit;
            }
            UiEvent::UpdateRecordingDisplay(text) => {
                self.tray.set_tooltip(&format!("Recording: {}", text));
            }
            UiEvent::RefreshHistoryView => {
                self.notes_created += 1;
                debug!(total = self.notes_created, "Capture history updated");
            }
            UiEvent::SetServiceStatus(connected) => {
                let state = if connected {
                    TrayIconState::Connected
                } else {
                    TrayIconState::Disconnected
                };
                if let Err(e) = self.tray.update_state(state) {
                    warn!(error = %e, "Failed to update tray icon");
                }
            }
            UiEvent::UpdateDeckList(decks) => {
                info!(count = decks.len(), "Deck list updated");
                self.decks = decks;
                self.rebuild_menu();
            }
        }

        TickOutcome::Continue
    }

    /// Handle one tray menu click.
    fn handle_menu_event(&mut self, event: MenuEvent) {
        let event_id = &event.id;

        if *event_id == *self.tray.record_item_id() {
            self.start_recording();
        } else if *event_id == *self.tray.reset_item_id() {
            self.reset_hotkey();
        } else if *event_id == *self.tray.status_item_id() {
            self.events_tx.emit(UiEvent::ShowMainWindow);
        } else if *event_id == *self.tray.quit_item_id() {
            self.events_tx.emit(UiEvent::QuitApplication);
        } else if let Some(choice) = self.tray.default_deck_choice(event_id).cloned() {
            self.set_default_deck(choice);
        } else if let Some(deck) = self.tray.pending_choice(event_id).map(str::to_string) {
            self.complete_pending(deck);
        }
    }

    /// Arm a recording session: suspend the active binding and route raw
    /// key events into the recorder.
    fn start_recording(&mut self) {
        let started = self
            .recorder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .start();
        if !started {
            return;
        }

        self.registrar.suspend();

        if let Err(e) = self
            .listener
            .subscribe(Arc::clone(&self.recorder), self.events_tx.clone())
        {
            error!(error = %e, "Could not start key listener, recording cancelled");
            self.recorder
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .cancel();
            if let Err(e) = self.registrar.resume() {
                warn!(error = %e, "Failed to re-register hotkey");
            }
            return;
        }

        self.tray.set_tooltip("Dict-to-Anki - Press your new hotkey...");
        info!("Hotkey recording armed");
    }

    /// Process the finalize event queued by the listener thread.
    fn finalize_recording(&mut self) {
        self.listener.unsubscribe();

        let combination = self
            .recorder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .finalize();

        match combination {
            Some(combination) => self.apply_combination(combination),
            None => {
                // Deficient session -- keep the previously persisted
                // combination, without mutating stored state.
                warn!("Recording finalized without a valid combination, keeping previous hotkey");
                if let Err(e) = self.registrar.resume() {
                    warn!(error = %e, "Failed to re-register previous hotkey");
                }
            }
        }

        self.refresh_tooltip();
    }

    fn apply_combination(&mut self, combination: HotkeyCombination) {
        self.config.hotkey.combination = combination.to_string();
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to persist hotkey");
        }

        match self.registrar.bind(&combination) {
            Ok(()) => {
                self.events_tx.emit(UiEvent::ShowTransientMessage(format!(
                    "Hotkey set to {}",
                    combination.display_upper()
                )));
            }
            Err(e) => {
                warn!(error = %e, "Recorded hotkey could not be bound");
                self.events_tx.emit(UiEvent::ShowTransientMessage(format!(
                    "Saved {}, but it cannot be bound on this system.",
                    combination.display_upper()
                )));
            }
        }
    }

    /// Clear the persisted combination and unregister any active binding.
    fn reset_hotkey(&mut self) {
        self.listener.unsubscribe();
        self.recorder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
        self.registrar.clear();

        self.config.hotkey.combination = String::new();
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to persist hotkey reset");
        }

        self.refresh_tooltip();
        self.events_tx.emit(UiEvent::ShowTransientMessage(
            "Hotkey disabled. Record a new one from the tray menu.".to_string(),
        ));
    }

    fn set_default_deck(&mut self, choice: Option<String>) {
        info!(deck = ?choice, "Default deck updated");

        self.config.behaviour.default_deck = choice.clone();
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to persist default deck");
        }

        *self
            .capture_ctx
            .default_deck
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = choice;

        self.rebuild_menu();
    }

    /// Finish a capture with the deck the user picked. Stale clicks (no
    /// pending capture) fall through as no-ops.
    fn complete_pending(&mut self, deck: String) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        info!(deck, word = %pending.word, "Deck chosen for pending capture");
        self.runtime.spawn(run_deck_choice(
            self.capture_ctx.clone(),
            deck,
            pending.word,
            pending.back,
        ));

        self.rebuild_menu();
    }

    fn show_status(&self) {
        let hotkey = self
            .registrar
            .combination()
            .map(|c| c.display_upper())
            .unwrap_or_else(|| "disabled".to_string());
        let backend = match self.tray.state() {
            TrayIconState::Unknown => "Checking Anki...",
            TrayIconState::Connected => "Anki connected",
            TrayIconState::Disconnected => "Anki not detected",
        };

        self.notify(&format!(
            "Hotkey: {} | {} | {} decks | {} cards this session",
            hotkey,
            backend,
            self.decks.len(),
            self.notes_created
        ));
    }

    /// Surface a transient message as a desktop notification.
    fn notify(&self, text: &str) {
        info!(message = text, "Transient message");

        if !self.config.behaviour.show_notifications {
            return;
        }

        if let Err(e) = Notification::new()
            .summary("Dict-to-Anki")
            .body(text)
            .show()
        {
            debug!(error = %e, "Desktop notification failed");
        }
    }

    fn rebuild_menu(&mut self) {
        let default_deck = self.config.behaviour.default_deck.clone();
        if let Err(e) =
            self.tray
                .rebuild_menu(&self.decks, default_deck.as_deref(), self.pending.as_ref())
        {
            warn!(error = %e, "Failed to rebuild tray menu");
        }
    }

    fn refresh_tooltip(&self) {
        match self.registrar.combination() {
            Some(combination) => self
                .tray
                .set_tooltip(&format!("Dict-to-Anki - {}", combination.display_upper())),
            None => self.tray.set_tooltip("Dict-to-Anki - hotkey disabled"),
        }
    }

    /// Bind the persisted combination; an invalid or unrepresentable value
    /// leaves the hotkey disabled rather than failing startup.
    fn bind_persisted_hotkey(registrar: &mut HotkeyRegistrar, config: &Config) {
        let Some(persisted) = config.hotkey.active_combination() else {
            info!("No hotkey configured");
            return;
        };

        match persisted.parse::<HotkeyCombination>() {
            Ok(combination) => {
                if let Err(e) = registrar.bind(&combination) {
                    warn!(error = %e, "Could not bind persisted hotkey, hotkey disabled");
                }
            }
            Err(e) => {
                warn!(error = %e, persisted, "Invalid persisted hotkey, hotkey disabled");
            }
        }
    }
}
