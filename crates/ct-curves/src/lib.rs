//! Parametric curve families and multi-segment trend synthesis.
//!
//! # Architecture
//!
//! - [`family`]: closed enum of curve shapes plus a static registry mapping
//!   each shape to its evaluation function and default parameters
//! - [`params`]: user-facing optional parameters and their resolution
//!   against family defaults
//! - [`segment`]: time-bounded segments and the placement policy that keeps
//!   a channel's segments sorted and non-overlapping
//! - [`synth`]: sampling of segment lists into per-channel point sets
//!
//! Evaluation is pure. Families flagged as noisy draw from a deterministic
//! function of the sample index so repeated previews render identically.

pub mod error;
pub mod family;
pub mod noise;
pub mod params;
pub mod segment;
mod shapes;
pub mod synth;

pub use error::{CurveError, CurveResult};
pub use family::{CurveFamily, FamilySpec, SamplePoint, evaluate, evaluate_sample};
pub use params::{CurveParams, ParamDefaults, ResolvedParams};
pub use segment::{MIN_SEGMENT_MINUTES, Segment, SegmentTrack};
pub use synth::{ChannelSampleSet, SynthConfig, merge_channels, synthesize, synthesize_with};
