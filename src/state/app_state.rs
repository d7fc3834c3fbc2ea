//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{RunSnapshot, ServerEvent, Settings};
use crate::{
    engine::{Countdown, Cue, IntervalSequence, Mode, SettleToken, TimerConfig},
    error::{AppError, AppResult},
    services::{CuePlayer, CueSettings},
    storage::LocalStore,
    workouts::{self, Interval, IntervalEditor, IntervalPatch, PhaseKind, SavedWorkout},
};

/// Buffered events per event-stream subscriber
pub const EVENT_CAPACITY: usize = 256;

/// Main application state: the countdown, the custom workout editor and storage
#[derive(Debug)]
pub struct AppState {
    /// The one countdown shared by both timers
    pub countdown: Arc<Mutex<Countdown>>,
    /// Interval list custom runs are started from
    pub editor: Arc<Mutex<IntervalEditor>>,
    pub storage: Arc<Mutex<LocalStore>>,
    pub cues: CuePlayer,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Latest run snapshot, watched by the countdown task
    pub run_update_tx: watch::Sender<RunSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _run_update_rx: watch::Receiver<RunSnapshot>,
    /// Fan-out to event-stream clients
    pub event_tx: broadcast::Sender<ServerEvent>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        storage: LocalStore,
        cues: CuePlayer,
        event_tx: broadcast::Sender<ServerEvent>,
    ) -> Self {
        let (run_update_tx, run_update_rx) = watch::channel(RunSnapshot::default());

        Self {
            countdown: Arc::new(Mutex::new(Countdown::new())),
            editor: Arc::new(Mutex::new(IntervalEditor::new())),
            storage: Arc::new(Mutex::new(storage)),
            cues,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            run_update_tx,
            _run_update_rx: run_update_rx,
            event_tx,
        }
    }

    /// Apply an operation to the countdown, play its cues, then publish.
    ///
    /// The countdown stays locked until the snapshot is published so watchers
    /// see snapshots in the order the operations happened, and every cue
    /// reaches the sinks before the snapshot that caused it.
    fn apply<R, F>(&self, action: &str, op: F) -> AppResult<(R, RunSnapshot)>
    where
        F: FnOnce(&mut Countdown) -> AppResult<(R, Vec<Cue>)>,
    {
        let mut countdown = lock(&self.countdown, "countdown")?;
        let (result, cues) = op(&mut countdown)?;
        let snapshot = RunSnapshot::of(&countdown);

        for cue in cues {
            self.cues.play(cue);
        }
        self.publish(&snapshot);
        drop(countdown);

        self.record_action(action);
        Ok((result, snapshot))
    }

    fn publish(&self, snapshot: &RunSnapshot) {
        self.run_update_tx.send_replace(snapshot.clone());
        // no subscribers is normal when no client is connected
        let _ = self.event_tx.send(ServerEvent::Run(snapshot.clone()));
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Start the fixed-round HIIT timer
    pub fn start_hiit(&self, config: TimerConfig) -> AppResult<RunSnapshot> {
        info!(
            "Starting HIIT: work={}s rest={}s rounds={}",
            config.work_seconds, config.rest_seconds, config.rounds
        );
        let (_, snapshot) = self.apply("start-hiit", |countdown| {
            let cues = countdown.start(Box::new(config))?;
            Ok(((), cues))
        })?;
        Ok(snapshot)
    }

    /// Start the custom workout from a snapshot of the editor's list
    pub fn start_custom(&self) -> AppResult<RunSnapshot> {
        let (_, snapshot) = self.apply("start-custom", |countdown| {
            let intervals = lock(&self.editor, "editor")?.intervals().to_vec();
            info!("Starting custom workout with {} intervals", intervals.len());
            let cues = countdown.start(Box::new(IntervalSequence::new(intervals)))?;
            Ok(((), cues))
        })?;
        Ok(snapshot)
    }

    pub fn pause(&self) -> AppResult<(bool, RunSnapshot)> {
        self.apply("pause", |countdown| Ok((countdown.pause(), Vec::new())))
    }

    pub fn resume(&self) -> AppResult<(bool, RunSnapshot)> {
        self.apply("resume", |countdown| match countdown.resume() {
            Some(cues) => Ok((true, cues)),
            None => Ok((false, Vec::new())),
        })
    }

    pub fn reset(&self) -> AppResult<RunSnapshot> {
        let (_, snapshot) = self.apply("reset", |countdown| {
            countdown.reset();
            Ok(((), Vec::new()))
        })?;
        Ok(snapshot)
    }

    /// One second elapsed on the ticker created for `epoch`
    pub fn tick(&self, epoch: u64) -> AppResult<RunSnapshot> {
        let mut countdown = lock(&self.countdown, "countdown")?;
        let cues = countdown.tick(epoch);
        let snapshot = RunSnapshot::of(&countdown);
        for cue in cues {
            self.cues.play(cue);
        }
        self.publish(&snapshot);
        Ok(snapshot)
    }

    /// The settle delay for `token` has elapsed
    pub fn settle(&self, token: SettleToken) -> AppResult<RunSnapshot> {
        let (_, snapshot) = self.apply("settle", |countdown| Ok(((), countdown.settle(token))))?;
        Ok(snapshot)
    }

    pub fn snapshot(&self) -> AppResult<RunSnapshot> {
        Ok(RunSnapshot::of(&*lock(&self.countdown, "countdown")?))
    }

    /// Stop any run so no timer outlives the process
    pub fn shutdown(&self) {
        if let Err(e) = self.reset() {
            warn!("Failed to reset countdown on shutdown: {}", e);
        }
    }

    // ---- custom workout editor ----

    pub fn intervals(&self) -> AppResult<Vec<Interval>> {
        Ok(lock(&self.editor, "editor")?.intervals().to_vec())
    }

    /// Run `op` on the editor, only while no workout is in progress
    fn edit<R, F>(&self, op: F) -> AppResult<R>
    where
        F: FnOnce(&mut IntervalEditor) -> AppResult<R>,
    {
        let countdown = lock(&self.countdown, "countdown")?;
        if countdown.mode() != Mode::Editing {
            return Err(AppError::NotEditing);
        }
        let mut editor = lock(&self.editor, "editor")?;
        let result = op(&mut editor);
        drop(editor);
        drop(countdown);
        self.record_action("edit");
        result
    }

    pub fn add_interval(&self, kind: PhaseKind) -> AppResult<Interval> {
        self.edit(|editor| Ok(editor.add(kind).clone()))
    }

    pub fn update_interval(&self, id: u32, patch: IntervalPatch) -> AppResult<Interval> {
        self.edit(|editor| editor.update(id, patch).cloned())
    }

    pub fn step_interval(&self, id: u32, delta: i32) -> AppResult<Interval> {
        self.edit(|editor| editor.step_duration(id, delta).cloned())
    }

    pub fn move_interval(&self, id: u32, target_id: u32) -> AppResult<Vec<Interval>> {
        self.edit(|editor| {
            editor.move_to(id, target_id)?;
            Ok(editor.intervals().to_vec())
        })
    }

    pub fn remove_interval(&self, id: u32) -> AppResult<Interval> {
        self.edit(|editor| editor.remove(id))
    }

    // ---- saved workouts ----

    pub fn list_workouts(&self) -> AppResult<Vec<SavedWorkout>> {
        Ok(workouts::store::list(&*lock(&self.storage, "storage")?))
    }

    /// Save the editor's current list under `name`
    pub fn save_workout(&self, name: &str) -> AppResult<SavedWorkout> {
        let intervals = self.intervals()?;
        let mut storage = lock(&self.storage, "storage")?;
        let saved = workouts::store::save(&mut storage, name, &intervals)?;
        drop(storage);
        self.record_action("save-workout");
        Ok(saved)
    }

    /// Copy a saved workout into the editor and return the run to editing
    pub fn load_workout(&self, id: &str) -> AppResult<(Vec<Interval>, RunSnapshot)> {
        let saved = workouts::store::find(&*lock(&self.storage, "storage")?, id)?;
        info!("Loading saved workout '{}'", saved.name);

        self.apply("load-workout", |countdown| {
            countdown.reset();
            let mut editor = lock(&self.editor, "editor")?;
            editor.replace(&saved.intervals);
            Ok((editor.intervals().to_vec(), Vec::new()))
        })
    }

    /// Delete a saved workout; returns whether anything was removed
    pub fn delete_workout(&self, id: &str) -> AppResult<bool> {
        let removed = workouts::store::delete(&mut *lock(&self.storage, "storage")?, id)?;
        if !removed {
            debug!("Delete requested for unknown workout {}", id);
        }
        self.record_action("delete-workout");
        Ok(removed)
    }

    // ---- preferences ----

    pub fn settings(&self) -> AppResult<Settings> {
        Ok(Settings::load(&mut *lock(&self.storage, "storage")?))
    }

    pub fn update_settings(&self, settings: Settings) -> AppResult<Settings> {
        settings.save(&mut *lock(&self.storage, "storage")?)?;
        info!("Settings updated: theme={:?} wake_lock={:?}", settings.theme, settings.wake_lock);
        self.record_action("settings");
        Ok(settings)
    }

    pub fn update_cue_settings(&self, settings: CueSettings) -> AppResult<CueSettings> {
        self.cues.update_settings(settings).map_err(AppError::Lock)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> AppResult<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|e| AppError::Lock(format!("Failed to lock {}: {}", what, e)))
}
