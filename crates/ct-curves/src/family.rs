//! Curve family registry.
//!
//! Every family is a closed enum variant mapped, through a static table, to
//! a pure evaluation function and its default parameter record. Adding a
//! family means adding a variant and a table row; the registry test checks
//! the two stay aligned.

use crate::error::CurveError;
use crate::params::{CurveParams, ParamDefaults, ResolvedParams};
use crate::shapes;
use ct_core::finite_or;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Duration assumed by [`evaluate`] when no segment context is available.
pub const DEFAULT_PREVIEW_DURATION_MINUTES: f64 = 60.0;

/// Named parametric curve shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurveFamily {
    Constant,
    Up,
    Down,
    Sine,
    Cosine,
    Exponential,
    ExponentialDecay,
    Logarithmic,
    Sigmoid,
    Parabola,
    Bell,
    Step,
    Sawtooth,
    Square,
    Precool,
    Preheat,
    Freeze,
    DeepFreeze,
    FullLoad,
    HalfLoad,
    SteadyState,
    SingleDoor,
    MultiDoor,
    HighTempStress,
    LowTempStress,
    CycleOnOffCool,
    CycleOnOffHeat,
    PowerLoss,
    DutyCycle,
    MultiZone,
}

/// Where and how a curve is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Segment-local progress in `[0, 1]`.
    pub progress: f64,
    /// Sample index within the segment; seeds noisy families.
    pub index: u64,
    /// Segment duration in minutes; scales the time constants.
    pub duration_minutes: f64,
}

impl SamplePoint {
    pub fn at(progress: f64) -> Self {
        Self {
            progress,
            index: 0,
            duration_minutes: DEFAULT_PREVIEW_DURATION_MINUTES,
        }
    }
}

/// Registry row for one family.
pub struct FamilySpec {
    pub family: CurveFamily,
    /// Serialized tag, e.g. `exponentialDecay`.
    pub tag: &'static str,
    pub label: &'static str,
    /// Draws seeded jitter from the sample index.
    pub noisy: bool,
    /// Raw shape is rescaled so progress 1 lands exactly on the end value.
    pub renormalized: bool,
    pub defaults: ParamDefaults,
    eval: fn(&ResolvedParams, &SamplePoint) -> f64,
}

impl fmt::Debug for FamilySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FamilySpec")
            .field("family", &self.family)
            .field("noisy", &self.noisy)
            .field("renormalized", &self.renormalized)
            .finish()
    }
}

const B: ParamDefaults = ParamDefaults::BASE;

const fn row(
    family: CurveFamily,
    tag: &'static str,
    label: &'static str,
    noisy: bool,
    renormalized: bool,
    defaults: ParamDefaults,
    eval: fn(&ResolvedParams, &SamplePoint) -> f64,
) -> FamilySpec {
    FamilySpec {
        family,
        tag,
        label,
        noisy,
        renormalized,
        defaults,
        eval,
    }
}

use CurveFamily as F;

/// Indexed by `CurveFamily as usize`.
static REGISTRY: [FamilySpec; 30] = [
    row(F::Constant, "constant", "Constant", false, false, B, shapes::constant),
    row(F::Up, "up", "Linear rise", false, false, B, shapes::linear),
    row(F::Down, "down", "Linear fall", false, false, B, shapes::linear),
    row(
        F::Sine,
        "sine",
        "Sine wave",
        false,
        false,
        ParamDefaults { amplitude: 2.0, ..B },
        shapes::sine,
    ),
    row(
        F::Cosine,
        "cosine",
        "Cosine wave",
        false,
        false,
        ParamDefaults { amplitude: 2.0, ..B },
        shapes::cosine,
    ),
    row(
        F::Exponential,
        "exponential",
        "Exponential growth",
        false,
        true,
        ParamDefaults { rate: 0.02, ..B },
        shapes::exponential,
    ),
    row(
        F::ExponentialDecay,
        "exponentialDecay",
        "Exponential decay",
        false,
        true,
        ParamDefaults { rate: 0.03, ..B },
        shapes::exponential_decay,
    ),
    row(
        F::Logarithmic,
        "logarithmic",
        "Logarithmic",
        false,
        true,
        ParamDefaults { rate: 0.1, ..B },
        shapes::logarithmic,
    ),
    row(
        F::Sigmoid,
        "sigmoid",
        "Logistic transition",
        false,
        false,
        ParamDefaults { rate: 10.0, ..B },
        shapes::sigmoid,
    ),
    row(
        F::Parabola,
        "parabola",
        "Parabolic peak",
        false,
        false,
        ParamDefaults { amplitude: 3.0, ..B },
        shapes::parabola,
    ),
    row(
        F::Bell,
        "bell",
        "Gaussian bell",
        false,
        false,
        ParamDefaults { amplitude: 3.0, ..B },
        shapes::bell,
    ),
    row(F::Step, "step", "Staircase", false, false, B, shapes::step),
    row(
        F::Sawtooth,
        "sawtooth",
        "Sawtooth",
        false,
        false,
        ParamDefaults { frequency: 3.0, ..B },
        shapes::sawtooth,
    ),
    row(
        F::Square,
        "square",
        "Square wave",
        false,
        false,
        ParamDefaults { frequency: 3.0, ..B },
        shapes::square,
    ),
    row(
        F::Precool,
        "precool",
        "Precool pull-down",
        false,
        true,
        ParamDefaults { response_tau: 20.0, ..B },
        shapes::first_order_approach,
    ),
    row(
        F::Preheat,
        "preheat",
        "Preheat ramp",
        false,
        true,
        ParamDefaults { response_tau: 25.0, ..B },
        shapes::first_order_approach,
    ),
    row(
        F::Freeze,
        "freeze",
        "Freeze pull-down",
        false,
        true,
        ParamDefaults { response_tau: 40.0, ..B },
        shapes::first_order_approach,
    ),
    row(
        F::DeepFreeze,
        "deepFreeze",
        "Deep-freeze pull-down",
        false,
        true,
        ParamDefaults { response_tau: 60.0, ..B },
        shapes::first_order_approach,
    ),
    row(
        F::FullLoad,
        "fullLoad",
        "Full-load cool-down",
        false,
        true,
        ParamDefaults { response_tau: 90.0, ..B },
        shapes::first_order_approach,
    ),
    row(
        F::HalfLoad,
        "halfLoad",
        "Half-load cool-down",
        false,
        true,
        ParamDefaults { response_tau: 45.0, ..B },
        shapes::first_order_approach,
    ),
    row(
        F::SteadyState,
        "steadyState",
        "Steady state with noise",
        true,
        false,
        ParamDefaults { noise: 0.3, ..B },
        shapes::steady_state,
    ),
    row(
        F::SingleDoor,
        "singleDoor",
        "Single door opening",
        false,
        false,
        ParamDefaults {
            open_start: 0.2,
            open_duration: 0.1,
            ..B
        },
        shapes::single_door,
    ),
    row(
        F::MultiDoor,
        "multiDoor",
        "Repeated door openings",
        false,
        false,
        ParamDefaults {
            open_start: 0.1,
            recovery_tau: 12.0,
            ..B
        },
        shapes::multi_door,
    ),
    row(
        F::HighTempStress,
        "highTempStress",
        "High ambient stress",
        false,
        false,
        ParamDefaults {
            env_temp: 40.0,
            recovery_tau: 20.0,
            ..B
        },
        shapes::stress,
    ),
    row(
        F::LowTempStress,
        "lowTempStress",
        "Low ambient stress",
        false,
        false,
        ParamDefaults {
            env_temp: -20.0,
            recovery_tau: 20.0,
            ..B
        },
        shapes::stress,
    ),
    row(
        F::CycleOnOffCool,
        "cycleOnOffCool",
        "On/off cooling cycles",
        true,
        false,
        ParamDefaults {
            frequency: 4.0,
            response_tau: 5.0,
            ..B
        },
        shapes::on_off_cycle,
    ),
    row(
        F::CycleOnOffHeat,
        "cycleOnOffHeat",
        "On/off heating cycles",
        true,
        false,
        ParamDefaults {
            frequency: 4.0,
            response_tau: 8.0,
            ..B
        },
        shapes::on_off_cycle,
    ),
    row(
        F::PowerLoss,
        "powerLoss",
        "Power-loss drift",
        false,
        false,
        ParamDefaults { rate: 0.01, ..B },
        shapes::power_loss,
    ),
    row(
        F::DutyCycle,
        "dutyCycle",
        "Compressor duty cycle",
        true,
        false,
        ParamDefaults {
            frequency: 6.0,
            duty_ratio: 0.6,
            noise: 0.15,
            ..B
        },
        shapes::duty_cycle,
    ),
    row(
        F::MultiZone,
        "multiZone",
        "Multi-zone coupling",
        true,
        false,
        ParamDefaults {
            frequency: 2.0,
            noise: 0.1,
            ..B
        },
        shapes::multi_zone,
    ),
];

impl CurveFamily {
    /// Registry row for this family.
    pub fn spec(self) -> &'static FamilySpec {
        &REGISTRY[self as usize]
    }

    /// All families in registry order.
    pub fn all() -> impl Iterator<Item = CurveFamily> {
        REGISTRY.iter().map(|spec| spec.family)
    }

    pub fn tag(self) -> &'static str {
        self.spec().tag
    }

    pub fn is_noisy(self) -> bool {
        self.spec().noisy
    }

    pub fn defaults(self) -> &'static ParamDefaults {
        &self.spec().defaults
    }
}

impl fmt::Display for CurveFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CurveFamily {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        REGISTRY
            .iter()
            .find(|spec| spec.tag.eq_ignore_ascii_case(needle))
            .map(|spec| spec.family)
            .ok_or_else(|| CurveError::UnknownFamily {
                name: needle.to_string(),
            })
    }
}

/// Evaluate a family at `progress` with preview context (index 0, 60 min).
pub fn evaluate(family: CurveFamily, progress: f64, params: &CurveParams) -> f64 {
    evaluate_sample(family, &SamplePoint::at(progress), params)
}

/// Evaluate a family at a fully specified sample.
///
/// Progress is clamped to `[0, 1]`; a non-finite result falls back to the
/// start value so a bad parameter never poisons a series with NaN.
pub fn evaluate_sample(family: CurveFamily, sample: &SamplePoint, params: &CurveParams) -> f64 {
    let spec = family.spec();
    let resolved = params.resolve(&spec.defaults);
    let progress = if sample.progress.is_nan() {
        0.0
    } else {
        sample.progress.clamp(0.0, 1.0)
    };
    let duration_minutes = if sample.duration_minutes.is_finite() && sample.duration_minutes > 0.0
    {
        sample.duration_minutes
    } else {
        DEFAULT_PREVIEW_DURATION_MINUTES
    };
    let sample = SamplePoint {
        progress,
        index: sample.index,
        duration_minutes,
    };
    finite_or((spec.eval)(&resolved, &sample), resolved.start_value)
}
