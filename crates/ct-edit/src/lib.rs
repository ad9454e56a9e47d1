//! Direct-manipulation editing of device series.
//!
//! Gestures arrive from an external chart surface as pixel positions. The
//! surface supplies coordinate transforms and hit testing; this crate turns
//! gestures into explicit sessions ([`DragSession`], [`TrajectorySession`])
//! that only touch series data when they are committed. Commits write the
//! updated series back into the host's [`ct_core::DeviceSeriesMap`], persist
//! through a [`ct_core::SeriesStore`], and notify an [`UpdateSink`].
//!
//! [`HistoryManager`] keeps bounded full-state snapshots for undo, and
//! [`Editor`] ties sessions and history together behind pointer events.

pub mod config;
pub mod drag;
pub mod editor;
pub mod history;
pub mod outcome;
pub mod paste;
pub mod series;
pub mod surface;
pub mod trajectory;

pub use config::EditConfig;
pub use drag::{DragSession, value_delta};
pub use editor::{Editor, Gesture, Tool};
pub use history::{HistoryManager, HistorySnapshot};
pub use outcome::{BatchOutcome, DeviceCommit};
pub use paste::{LinearTrend, adjust_block, commit_paste, local_trend, paste_block};
pub use series::{merge_samples, sample_interval_ms, upsert_values, value_at_lookup};
pub use surface::{AxisExtent, ChartSurface, HitPoint, PathPoint, Pointer, UpdateSink};
pub use trajectory::{TrajectoryMode, TrajectorySession, TrajectoryTarget, interpolate_path, resample_path};
