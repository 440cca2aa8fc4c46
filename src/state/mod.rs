// Session state management
//
// Wraps SessionState with thread-safe access using Arc<RwLock<T>> and emits
// change events so UI components can react without polling.

use crate::models::{AppSettings, CaptureRegion, SessionState, WindowMatchPriority, clamp_capture_rate};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// Change events emitted when the session is modified
#[derive(Clone, Debug, PartialEq)]
pub enum SessionChange {
    /// The search pattern changed
    PatternChanged { pattern: String },

    /// Exact-length matching was toggled
    ExactLengthChanged { enabled: bool },

    /// Drag-selection mode was switched on or off
    SelectionModeChanged { enabled: bool },

    /// Monitoring was started or stopped
    MonitoringChanged { active: bool },

    /// The configured capture region changed (selection, undo, redo or clear)
    CaptureRegionChanged { region: Option<CaptureRegion> },

    /// Capture rate changed
    CaptureRateChanged { fps: f64 },

    /// A different window is tracked, or the match priority changed
    TrackedWindowChanged {
        title: Option<String>,
        priority: WindowMatchPriority,
    },

    /// Session was reset to defaults
    SessionReset,
}

/// Thread-safe session state with event emission
///
/// - [`read()`](Self::read) / [`snapshot()`](Self::snapshot) for reading
/// - [`update()`](Self::update) for mutations; changes are detected and broadcast
/// - [`subscribe()`](Self::subscribe) to listen for [`SessionChange`] events
///
/// Selection mode and monitoring are mutually exclusive: turning one on turns
/// the other off. A [`DragSelector`](crate::services::DragSelector) follows
/// `selection_mode` through these events, so leaving selection mode cancels
/// its drag.
pub struct SessionManager {
    state: Arc<RwLock<SessionState>>,
    session_tx: broadcast::Sender<SessionChange>,
}

impl SessionManager {
    /// Create a SessionManager with default state and a 100-event buffer
    pub fn new() -> Self {
        Self::with_state(SessionState::default())
    }

    /// Create a SessionManager restored from persisted settings
    pub fn from_settings(settings: &AppSettings) -> Self {
        let state = SessionState::from_settings(settings);
        tracing::info!(
            "Session restored: pattern='{}', exact_length={}, region={:?}",
            state.pattern,
            state.exact_length,
            state.capture_region
        );
        Self::with_state(state)
    }

    fn with_state(state: SessionState) -> Self {
        let (session_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(state)),
            session_tx,
        }
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> SessionState {
        self.read_guard().clone()
    }

    /// Execute a function with read access to the state
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SessionState) -> R,
    {
        f(&self.read_guard())
    }

    /// Apply `update_fn`, detect what changed and broadcast it
    ///
    /// # Returns
    /// The events that were emitted
    pub fn update<F>(&self, update_fn: F) -> Vec<SessionChange>
    where
        F: FnOnce(&mut SessionState),
    {
        let mut state = self.write_guard();
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = detect_changes(&old_state, &state);
        for change in &changes {
            // Nobody listening is fine
            let _ = self.session_tx.send(change.clone());
        }

        changes
    }

    /// Subscribe to session change events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.session_tx.subscribe()
    }

    // Convenience methods for common session updates

    pub fn set_pattern(&self, pattern: impl Into<String>) -> Vec<SessionChange> {
        let pattern = pattern.into();
        self.update(|state| state.pattern = pattern)
    }

    pub fn toggle_exact_length(&self) -> Vec<SessionChange> {
        self.update(|state| state.exact_length = !state.exact_length)
    }

    /// Switch drag-selection mode; enabling it stops monitoring
    pub fn set_selection_mode(&self, enabled: bool) -> Vec<SessionChange> {
        self.update(|state| {
            state.selection_mode = enabled;
            if enabled {
                state.monitoring = false;
            }
        })
    }

    /// Start or stop monitoring; starting it leaves selection mode
    pub fn set_monitoring(&self, active: bool) -> Vec<SessionChange> {
        self.update(|state| {
            state.monitoring = active;
            if active {
                state.selection_mode = false;
            }
        })
    }

    pub fn set_capture_rate(&self, fps: f64) -> Vec<SessionChange> {
        self.update(|state| state.capture_rate = clamp_capture_rate(fps))
    }

    pub fn set_tracked_window(
        &self,
        title: Option<String>,
        priority: WindowMatchPriority,
    ) -> Vec<SessionChange> {
        self.update(|state| {
            state.tracked_window = title;
            state.match_priority = priority;
        })
    }

    /// Make `region` current and append it to the history
    ///
    /// Any redo entries beyond the current position are dropped.
    pub fn record_capture_region(&self, region: CaptureRegion) -> Vec<SessionChange> {
        self.update(|state| {
            let keep = state.history_index.map_or(0, |i| i + 1);
            state.selection_history.truncate(keep);
            state.selection_history.push(region);
            state.history_index = Some(state.selection_history.len() - 1);
            state.capture_region = Some(region);
        })
    }

    /// Step back to the previous region in the history
    pub fn undo_capture_region(&self) -> Vec<SessionChange> {
        self.update(|state| {
            if let Some(i) = state.history_index.filter(|i| *i > 0) {
                state.history_index = Some(i - 1);
                state.capture_region = state.selection_history.get(i - 1).copied();
            }
        })
    }

    /// Step forward again after an undo
    pub fn redo_capture_region(&self) -> Vec<SessionChange> {
        self.update(|state| {
            if state.can_redo() {
                let next = state.history_index.map_or(0, |i| i + 1);
                state.history_index = Some(next);
                state.capture_region = state.selection_history.get(next).copied();
            }
        })
    }

    /// Forget the current region; history is kept for undo
    pub fn clear_capture_region(&self) -> Vec<SessionChange> {
        self.update(|state| state.capture_region = None)
    }

    /// Reset to defaults
    pub fn reset(&self) -> Vec<SessionChange> {
        let mut changes = self.update(|state| *state = SessionState::default());

        let reset_event = SessionChange::SessionReset;
        let _ = self.session_tx.send(reset_event.clone());
        changes.push(reset_event);

        changes
    }

    /// Copy the persisted parts of the session into `settings`
    pub fn store_into(&self, settings: &mut AppSettings) {
        self.read(|state| state.store_into(settings));
    }
}

/// Compare two states and produce the events describing the difference
fn detect_changes(old: &SessionState, new: &SessionState) -> Vec<SessionChange> {
    let mut changes = Vec::new();

    if old.pattern != new.pattern {
        changes.push(SessionChange::PatternChanged {
            pattern: new.pattern.clone(),
        });
    }

    if old.exact_length != new.exact_length {
        changes.push(SessionChange::ExactLengthChanged {
            enabled: new.exact_length,
        });
    }

    if old.selection_mode != new.selection_mode {
        changes.push(SessionChange::SelectionModeChanged {
            enabled: new.selection_mode,
        });
    }

    if old.monitoring != new.monitoring {
        changes.push(SessionChange::MonitoringChanged {
            active: new.monitoring,
        });
    }

    if old.capture_region != new.capture_region {
        changes.push(SessionChange::CaptureRegionChanged {
            region: new.capture_region,
        });
    }

    if old.capture_rate != new.capture_rate {
        changes.push(SessionChange::CaptureRateChanged {
            fps: new.capture_rate,
        });
    }

    if old.tracked_window != new.tracked_window || old.match_priority != new.match_priority {
        changes.push(SessionChange::TrackedWindowChanged {
            title: new.tracked_window.clone(),
            priority: new.match_priority,
        });
    }

    changes
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

// Cloning shares the same state and channel
impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            session_tx: self.session_tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_manager() {
        let manager = SessionManager::new();
        let state = manager.snapshot();

        assert!(state.pattern.is_empty());
        assert!(!state.selection_mode);
        assert!(!state.monitoring);
        assert!(state.capture_region.is_none());
    }

    #[test]
    fn test_pattern_change_detected() {
        let manager = SessionManager::new();

        let changes = manager.set_pattern("dr_w");
        assert_eq!(
            changes,
            vec![SessionChange::PatternChanged {
                pattern: "dr_w".to_string()
            }]
        );

        // Same value again is not a change
        assert!(manager.set_pattern("dr_w").is_empty());
    }

    #[test]
    fn test_toggle_exact_length() {
        let manager = SessionManager::new();

        let changes = manager.toggle_exact_length();
        assert_eq!(changes, vec![SessionChange::ExactLengthChanged { enabled: true }]);
        assert!(manager.read(|s| s.exact_length));

        manager.toggle_exact_length();
        assert!(!manager.read(|s| s.exact_length));
    }

    #[test]
    fn test_selection_mode_stops_monitoring() {
        let manager = SessionManager::new();
        manager.set_monitoring(true);

        let changes = manager.set_selection_mode(true);
        assert!(changes.contains(&SessionChange::SelectionModeChanged { enabled: true }));
        assert!(changes.contains(&SessionChange::MonitoringChanged { active: false }));

        let state = manager.snapshot();
        assert!(state.selection_mode);
        assert!(!state.monitoring);
    }

    #[test]
    fn test_monitoring_leaves_selection_mode() {
        let manager = SessionManager::new();
        manager.set_selection_mode(true);
        manager.set_monitoring(true);

        let state = manager.snapshot();
        assert!(state.monitoring);
        assert!(!state.selection_mode);
    }

    #[test]
    fn test_capture_rate_clamped() {
        let manager = SessionManager::new();
        manager.set_capture_rate(60.0);
        assert_eq!(manager.read(|s| s.capture_rate), 5.0);
    }

    #[test]
    fn test_region_history_undo_redo() {
        let manager = SessionManager::new();
        let first = CaptureRegion::new(0, 0, 10, 10);
        let second = CaptureRegion::new(5, 5, 20, 20);

        manager.record_capture_region(first);
        manager.record_capture_region(second);
        assert_eq!(manager.read(|s| s.capture_region), Some(second));

        manager.undo_capture_region();
        assert_eq!(manager.read(|s| s.capture_region), Some(first));
        assert!(manager.read(|s| s.can_redo()));

        // Nothing before the first entry
        assert!(manager.undo_capture_region().is_empty());

        manager.redo_capture_region();
        assert_eq!(manager.read(|s| s.capture_region), Some(second));
    }

    #[test]
    fn test_recording_after_undo_drops_redo_entries() {
        let manager = SessionManager::new();
        let a = CaptureRegion::new(0, 0, 10, 10);
        let b = CaptureRegion::new(1, 1, 10, 10);
        let c = CaptureRegion::new(2, 2, 10, 10);

        manager.record_capture_region(a);
        manager.record_capture_region(b);
        manager.undo_capture_region();
        manager.record_capture_region(c);

        let state = manager.snapshot();
        assert_eq!(state.selection_history, vec![a, c]);
        assert!(!state.can_redo());
    }

    #[test]
    fn test_reset_emits_reset_event() {
        let manager = SessionManager::new();
        manager.set_pattern("c_t");

        let changes = manager.reset();
        assert_eq!(changes.last(), Some(&SessionChange::SessionReset));
        assert!(manager.read(|s| s.pattern.is_empty()));
    }

    #[test]
    fn test_store_into_settings() {
        let manager = SessionManager::new();
        manager.set_pattern("zeph");
        manager.toggle_exact_length();

        let mut settings = AppSettings::default();
        manager.store_into(&mut settings);
        assert_eq!(settings.last_search_pattern, "zeph");
        assert!(settings.exact_length_match);
    }
}
