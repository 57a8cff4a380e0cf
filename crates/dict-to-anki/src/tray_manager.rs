//! System tray icon and menu.
//!
//! The tray is the application's whole visible surface: a status icon, the
//! recording/reset actions, the default-deck submenu, and -- while a capture
//! awaits a deck choice -- a picker submenu for it. The menu is rebuilt
//! wholesale whenever any of those inputs change; menu-item IDs from a
//! previous build are forgotten, so clicks on a stale menu fall through as
//! no-ops.

use crate::{AppError, AppResult, TrayIconState};

use std::{collections::HashMap, panic::Location};

use error_location::ErrorLocation;
use tracing::{info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem, Submenu};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

/// Label for the default-deck choice that re-enables the picker.
pub(crate) const ASK_EVERY_TIME: &str = "Ask every time";

/// A capture waiting on the user's deck choice.
#[derive(Debug, Clone)]
pub struct PendingCapture {
    /// The captured headword (card front).
    pub word: String,
    /// The formatted definition (card back).
    pub back: String,
}

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    state: TrayIconState,
    record_item_id: MenuId,
    reset_item_id: MenuId,
    status_item_id: MenuId,
    quit_item_id: MenuId,
    /// Default-deck submenu entries; `None` means "ask every time".
    deck_item_ids: HashMap<MenuId, Option<String>>,
    /// Pending-capture picker entries mapping to the chosen deck.
    pending_item_ids: HashMap<MenuId, String>,
}

impl TrayManager {
    /// Create the tray icon with an empty menu skeleton.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let icon = Self::load_icon(TrayIconState::Unknown)?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip("Dict-to-Anki - Starting")
            .with_icon(icon)
            .build()
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        let mut manager = Self {
            tray_icon,
            state: TrayIconState::Unknown,
            record_item_id: MenuId::new("record"),
            reset_item_id: MenuId::new("reset"),
            status_item_id: MenuId::new("status"),
            quit_item_id: MenuId::new("quit"),
            deck_item_ids: HashMap::new(),
            pending_item_ids: HashMap::new(),
        };
        manager.rebuild_menu(&[], None, None)?;

        Ok(manager)
    }

    /// Rebuild the whole menu from current state.
    ///
    /// `decks` is the current display list (live or cached), `default_deck`
    /// the configured capture target, and `pending` a capture awaiting a
    /// deck choice.
    #[track_caller]
    pub fn rebuild_menu(
        &mut self,
        decks: &[String],
        default_deck: Option<&str>,
        pending: Option<&PendingCapture>,
    ) -> AppResult<()> {
        let menu = Menu::new();
        self.deck_item_ids.clear();
        self.pending_item_ids.clear();

        if let Some(pending) = pending {
            let picker = Submenu::new(format!("Add '{}' to...", pending.word), true);
            for deck in decks {
                let item = MenuItem::new(deck, true, None);
                self.pending_item_ids.insert(item.id().clone(), deck.clone());
                Self::append(&picker, &item)?;
            }
            if decks.is_empty() {
                Self::append(&picker, &MenuItem::new("No decks available", false, None))?;
            }
            Self::append_to_menu(&menu, &picker)?;
            Self::append_to_menu(&menu, &PredefinedMenuItem::separator())?;
        }

        let record_item = MenuItem::new("Record hotkey...", true, None);
        self.record_item_id = record_item.id().clone();
        Self::append_to_menu(&menu, &record_item)?;

        let reset_item = MenuItem::new("Reset hotkey", true, None);
        self.reset_item_id = reset_item.id().clone();
        Self::append_to_menu(&menu, &reset_item)?;

        let deck_menu = Submenu::new(
            format!("Default deck: {}", default_deck.unwrap_or(ASK_EVERY_TIME)),
            true,
        );
        let ask_item = MenuItem::new(ASK_EVERY_TIME, true, None);
        self.deck_item_ids.insert(ask_item.id().clone(), None);
        Self::append(&deck_menu, &ask_item)?;
        for deck in decks {
            let item = MenuItem::new(deck, true, None);
            self.deck_item_ids
                .insert(item.id().clone(), Some(deck.clone()));
            Self::append(&deck_menu, &item)?;
        }
        Self::append_to_menu(&menu, &deck_menu)?;

        Self::append_to_menu(&menu, &PredefinedMenuItem::separator())?;

        let status_item = MenuItem::new("Status", true, None);
        self.status_item_id = status_item.id().clone();
        Self::append_to_menu(&menu, &status_item)?;

        let quit_item = MenuItem::new("Quit", true, None);
        self.quit_item_id = quit_item.id().clone();
        Self::append_to_menu(&menu, &quit_item)?;

        self.tray_icon.set_menu(Some(Box::new(menu)));

        Ok(())
    }

    /// Update the tray icon state with new icon and tooltip. No-op when the
    /// state is unchanged, so the 2-second status cadence does not repaint.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        if state == self.state {
            return Ok(());
        }
        self.state = state;

        let (icon, tooltip) = match state {
            TrayIconState::Unknown => (Self::load_icon(state)?, "Dict-to-Anki - Starting"),
            TrayIconState::Connected => (Self::load_icon(state)?, "Dict-to-Anki - Anki connected"),
            TrayIconState::Disconnected => {
                (Self::load_icon(state)?, "Dict-to-Anki - Anki not detected")
            }
        };

        self.tray_icon
            .set_icon(Some(icon))
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(tooltip))
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Replace the tooltip, e.g. with the recording-in-progress display.
    pub fn set_tooltip(&self, tooltip: &str) {
        let _ = self.tray_icon.set_tooltip(Some(tooltip));
    }

    /// The currently displayed icon state.
    pub fn state(&self) -> TrayIconState {
        self.state
    }

    /// The "Record hotkey..." menu item ID.
    pub fn record_item_id(&self) -> &MenuId {
        &self.record_item_id
    }

    /// The "Reset hotkey" menu item ID.
    pub fn reset_item_id(&self) -> &MenuId {
        &self.reset_item_id
    }

    /// The "Status" menu item ID.
    pub fn status_item_id(&self) -> &MenuId {
        &self.status_item_id
    }

    /// The "Quit" menu item ID.
    pub fn quit_item_id(&self) -> &MenuId {
        &self.quit_item_id
    }

    /// Resolve a default-deck submenu click. `Some(None)` is "ask every time".
    pub fn default_deck_choice(&self, id: &MenuId) -> Option<&Option<String>> {
        self.deck_item_ids.get(id)
    }

    /// Resolve a pending-capture picker click to the chosen deck.
    pub fn pending_choice(&self, id: &MenuId) -> Option<&str> {
        self.pending_item_ids.get(id).map(String::as_str)
    }

    fn append(submenu: &Submenu, item: &dyn tray_icon::menu::IsMenuItem) -> AppResult<()> {
        submenu.append(item).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to build tray submenu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn append_to_menu(menu: &Menu, item: &dyn tray_icon::menu::IsMenuItem) -> AppResult<()> {
        menu.append(item).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Load icon from compile-time embedded PNG bytes.
    ///
    /// Icons are embedded via include_bytes! so they work regardless of
    /// install location -- no hardcoded filesystem paths.
    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let png_bytes: &[u8] = match state {
            TrayIconState::Unknown => include_bytes!("../resources/icons/unknown.png"),
            TrayIconState::Connected => include_bytes!("../resources/icons/connected.png"),
            TrayIconState::Disconnected => include_bytes!("../resources/icons/disconnected.png"),
        };

        let img = image::load_from_memory(png_bytes).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to decode embedded icon: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let rgba = img.into_rgba8();
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
