//! Pointer-event router.

use ct_core::{Channel, DeviceId, DeviceSeriesMap, SeriesSample, SeriesStore, TimestampMs};

use crate::config::EditConfig;
use crate::drag::DragSession;
use crate::history::{HistoryManager, HistorySnapshot};
use crate::outcome::BatchOutcome;
use crate::paste::commit_paste;
use crate::surface::{ChartSurface, Pointer, UpdateSink};
use crate::trajectory::TrajectorySession;

/// Which gesture a pointer-down starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Point,
    Pen,
}

/// Gesture in progress: `Idle`, then a session until it is committed or
/// discarded.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Drag(DragSession),
    Trajectory(TrajectorySession),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

/// Owns the active gesture and the undo history for one chart.
///
/// Series data stays with the host and is passed into each call that
/// needs it.
#[derive(Debug, Clone)]
pub struct Editor {
    config: EditConfig,
    channel: Channel,
    tool: Tool,
    gesture: Gesture,
    history: HistoryManager,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditConfig) -> Self {
        Self {
            history: HistoryManager::new(config.history_cap),
            config,
            channel: Channel::Temperature,
            tool: Tool::Point,
            gesture: Gesture::Idle,
        }
    }

    pub fn config(&self) -> &EditConfig {
        &self.config
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Snapshot the loaded state so the first edit can be undone.
    pub fn record_baseline(&mut self, series: &DeviceSeriesMap) {
        self.history.save_history(series);
    }

    /// Start a gesture with the current tool. Returns whether one started.
    pub fn pointer_down(
        &mut self,
        surface: &mut dyn ChartSurface,
        series: &DeviceSeriesMap,
        selection: &[DeviceId],
        at: Pointer,
    ) -> bool {
        self.cancel(surface);
        self.gesture = match self.tool {
            Tool::Point => DragSession::begin(surface, &self.config, self.channel, at)
                .map_or(Gesture::Idle, Gesture::Drag),
            Tool::Pen => TrajectorySession::begin(
                surface,
                series,
                selection,
                &self.config,
                self.channel,
                at,
            )
            .map_or(Gesture::Idle, Gesture::Trajectory),
        };
        !self.gesture.is_idle()
    }

    pub fn pointer_move(&mut self, surface: &mut dyn ChartSurface, at: Pointer) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Drag(session) => {
                session.update(surface, at);
            }
            Gesture::Trajectory(session) => session.extend(surface, at),
        }
    }

    /// Finish the gesture. A release outside the plot discards it.
    ///
    /// On commit a history snapshot of the updated state is pushed.
    pub fn pointer_up(
        &mut self,
        surface: &mut dyn ChartSurface,
        series: &mut DeviceSeriesMap,
        store: &dyn SeriesStore,
        sink: &mut dyn UpdateSink,
        at: Pointer,
    ) -> Option<BatchOutcome> {
        if !surface.contains(at) {
            tracing::debug!(x = at.x, y = at.y, "released outside plot");
            self.cancel(surface);
            return None;
        }

        let outcome = match std::mem::take(&mut self.gesture) {
            Gesture::Idle => None,
            Gesture::Drag(mut session) => {
                session.update(surface, at);
                session.commit(series, store, sink, &self.config)
            }
            Gesture::Trajectory(mut session) => {
                session.extend(surface, at);
                surface.clear_trajectory();
                session.commit(series, store, sink, &self.config)
            }
        };
        if outcome.is_some() {
            self.history.save_history(series);
        }
        outcome
    }

    /// Drop the active gesture without writing anything.
    pub fn cancel(&mut self, surface: &mut dyn ChartSurface) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Drag(session) => {
                surface.preview_value(
                    session.device_id(),
                    session.anchor_timestamp_ms(),
                    session.anchor_value(),
                );
            }
            Gesture::Trajectory(_) => surface.clear_trajectory(),
        }
    }

    /// Paste a copied block into `device_id` at `target_ts`.
    pub fn paste(
        &mut self,
        series: &mut DeviceSeriesMap,
        store: &dyn SeriesStore,
        sink: &mut dyn UpdateSink,
        device_id: &DeviceId,
        copied: &[SeriesSample],
        target_ts: TimestampMs,
    ) -> Option<BatchOutcome> {
        let outcome = commit_paste(series, store, sink, device_id, copied, target_ts, &self.config);
        if outcome.is_some() {
            self.history.save_history(series);
        }
        outcome
    }

    /// Undo the last edit. `restore` receives the state to reinstate; call
    /// [`Editor::finish_restore`] once the host has applied it.
    pub fn undo(&mut self, restore: impl FnOnce(&HistorySnapshot)) -> bool {
        self.history.undo(restore)
    }

    pub fn finish_restore(&mut self) {
        self.history.finish_restore();
    }
}
