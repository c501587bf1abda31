//! Poster editing session with undo/redo.

use std::collections::VecDeque;

use tracing::debug;

use crate::composer::compose;
use crate::config::PosterConfig;
use crate::export::{ExportAdapter, ExportHandle, ExportedImage, spawn_export};
use crate::error::PosterError;
use crate::layout::RenderableLayout;
use crate::store::StoreProfile;

/// Upper bound on remembered undo steps.
pub const HISTORY_LIMIT: usize = 100;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types whose state can be replaced by, or exported as, a [`PosterConfig`].
pub trait Configurable {
    /// Replaces the current settings with `config`.
    fn apply_config(&mut self, config: &PosterConfig);

    /// Exports the current settings.
    fn export_config(&self) -> PosterConfig;
}

// ============================================================================
// PosterCustomizer
// ============================================================================

/// One poster editing session.
///
/// The customizer owns the store being promoted, the URL the QR code points
/// to, and the current [`PosterConfig`]. Every edit replaces the config with
/// a new value and records the previous one, so edits can be undone.
///
/// Layouts are never cached: [`layout`](Self::layout) recomposes from the
/// current config each time it is called.
///
/// # Example
///
/// ```
/// use emprendego_poster::{PosterCustomizer, PosterElement, PosterStyle, StoreProfile};
///
/// let store = StoreProfile::new("Café Luna", "cafe-luna");
/// let mut customizer = PosterCustomizer::new(store, "https://emprendego.shop/cafe-luna");
///
/// customizer.update(|c| c.with_style(PosterStyle::Poster));
/// customizer.update(|c| c.toggle(PosterElement::Url));
/// assert!(customizer.layout().body.call_to_action.visible);
///
/// customizer.undo();
/// assert!(customizer.layout().body.display_url.visible);
/// ```
#[derive(Debug, Clone)]
pub struct PosterCustomizer {
    store: StoreProfile,
    target_url: String,
    config: PosterConfig,
    undo: VecDeque<PosterConfig>,
    redo: Vec<PosterConfig>,
}

impl PosterCustomizer {
    /// Starts a session with the default config.
    pub fn new(store: StoreProfile, target_url: impl Into<String>) -> Self {
        Self::with_config(store, target_url, PosterConfig::default())
    }

    /// Starts a session from a previously exported config.
    pub fn with_config(store: StoreProfile, target_url: impl Into<String>, config: PosterConfig) -> Self {
        Self {
            store,
            target_url: target_url.into(),
            config,
            undo: VecDeque::new(),
            redo: Vec::new(),
        }
    }

    pub fn store(&self) -> &StoreProfile {
        &self.store
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn config(&self) -> &PosterConfig {
        &self.config
    }

    /// Replaces the config. Returns true if it changed.
    ///
    /// A change clears the redo stack.
    pub fn apply(&mut self, config: PosterConfig) -> bool {
        if config == self.config {
            return false;
        }

        let previous = std::mem::replace(&mut self.config, config);
        self.undo.push_back(previous);
        if self.undo.len() > HISTORY_LIMIT {
            self.undo.pop_front();
        }
        self.redo.clear();
        debug!(style = self.config.style.id(), "poster config updated");
        true
    }

    /// Applies a transition to the current config.
    pub fn update(&mut self, transition: impl FnOnce(&PosterConfig) -> PosterConfig) -> bool {
        let next = transition(&self.config);
        self.apply(next)
    }

    /// Like [`update`](Self::update), for transitions that validate input.
    pub fn try_update(
        &mut self,
        transition: impl FnOnce(&PosterConfig) -> Result<PosterConfig, PosterError>,
    ) -> Result<bool, PosterError> {
        let next = transition(&self.config)?;
        Ok(self.apply(next))
    }

    /// Restores the previous config. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.config, previous);
        self.redo.push(current);
        true
    }

    /// Re-applies the last undone config. Returns false if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.config, next);
        self.undo.push_back(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Returns to the default config as an undoable edit.
    pub fn reset(&mut self) -> bool {
        self.apply(PosterConfig::default())
    }

    /// Composes the layout for the current config.
    pub fn layout(&self) -> RenderableLayout {
        compose(&self.store, &self.target_url, &self.config)
    }

    /// Exports the current poster on the calling thread.
    pub fn export<A: ExportAdapter + ?Sized>(&self, adapter: &A) -> Result<ExportedImage, PosterError> {
        adapter.export(&self.layout())
    }

    /// Exports a snapshot of the current poster on a worker thread.
    ///
    /// Later edits to this customizer do not affect the running export.
    pub fn spawn_export<A>(&self, adapter: A) -> ExportHandle
    where
        A: ExportAdapter + Send + 'static,
    {
        spawn_export(adapter, self.layout())
    }
}

impl Configurable for PosterCustomizer {
    /// Applies `config` as a regular, undoable edit.
    fn apply_config(&mut self, config: &PosterConfig) {
        self.apply(*config);
    }

    fn export_config(&self) -> PosterConfig {
        self.config
    }
}

// ============================================================================
// Tests
// ============================================================================
