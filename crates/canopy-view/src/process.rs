//! State shared by every view on the UI thread.

use std::cell::OnceCell;

use canopy_config::ViewConfig;
use canopy_platform::Platform;
use tracing::debug;

/// Built once at startup and handed to each view as `Rc<ProcessContext>`.
pub struct ProcessContext {
    platform: Platform,
    config: ViewConfig,
    ui_rtl: bool,
    rtl_keyboard_layout: OnceCell<bool>,
}

impl ProcessContext {
    pub fn new(platform: Platform, config: ViewConfig) -> Self {
        Self {
            platform,
            config,
            ui_rtl: false,
            rtl_keyboard_layout: OnceCell::new(),
        }
    }

    /// Lay the UI out right to left (mirrors resize corners and cursors).
    pub fn with_rtl_ui(mut self, rtl: bool) -> Self {
        self.ui_rtl = rtl;
        self
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn is_rtl_ui(&self) -> bool {
        self.ui_rtl
    }

    /// Whether a right-to-left keyboard layout is installed. Computed on
    /// first query and retained for the process lifetime; a failed query
    /// counts as "not installed".
    pub fn has_rtl_keyboard_layout(&self) -> bool {
        *self.rtl_keyboard_layout.get_or_init(|| {
            let installed = self
                .platform
                .keyboard
                .installed_layouts()
                .is_some_and(|layouts| layouts.iter().any(|l| l.is_rtl()));
            debug!(installed, "probed for right-to-left keyboard layouts");
            installed
        })
    }
}
