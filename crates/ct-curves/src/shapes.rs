//! Shape functions behind the family registry.
//!
//! Signature: `(resolved params, sample) -> value`. Progress has already
//! been clamped to `[0, 1]` and duration is positive.

use crate::family::SamplePoint;
use crate::noise::seeded_jitter;
use crate::params::ResolvedParams;
use ct_core::lerp;
use std::f64::consts::TAU;

/// Smallest time constant accepted, in minutes.
const MIN_TAU: f64 = 1e-3;

/// Share of the gap toward ambient covered by a stress excursion.
const STRESS_EXCURSION: f64 = 0.3;
/// Progress fraction spent on the stress excursion.
const STRESS_RISE_END: f64 = 0.1;
/// Share of each on/off cycle spent transitioning.
const CYCLE_TRANSITION: f64 = 0.3;

/// Linearly rescale a raw curve so it spans exactly `[s, e]`.
///
/// `final_value` is the raw curve at progress 1. When it coincides with the
/// start value the raw shape carries no information and the segment is
/// treated as a linear ramp.
fn renormalize(raw: f64, s: f64, final_value: f64, e: f64, progress: f64) -> f64 {
    let span = final_value - s;
    if !span.is_finite() || !raw.is_finite() || span.abs() < 1e-12 {
        return lerp(s, e, progress);
    }
    s + (raw - s) / span * (e - s)
}

fn tau(v: f64) -> f64 {
    if v.is_finite() { v.max(MIN_TAU) } else { MIN_TAU }
}

/// Number of whole repetitions, at least one.
fn cycles(frequency: f64) -> f64 {
    if frequency.is_finite() {
        frequency.round().max(1.0)
    } else {
        1.0
    }
}

/// Split progress into (cycle index, local phase in `[0, 1]`), with
/// progress 1 landing at the end of the last cycle rather than the start of
/// a new one.
fn cycle_phase(progress: f64, n: f64) -> (f64, f64) {
    let scaled = progress * n;
    let index = scaled.floor().min(n - 1.0);
    (index, scaled - index)
}

pub(crate) fn constant(p: &ResolvedParams, _: &SamplePoint) -> f64 {
    p.start_value
}

pub(crate) fn linear(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    lerp(p.start_value, p.end_value, x.progress)
}

pub(crate) fn sine(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let mid = (p.start_value + p.end_value) / 2.0;
    mid + p.amplitude * (TAU * p.frequency * x.progress + p.phase).sin()
}

pub(crate) fn cosine(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let mid = (p.start_value + p.end_value) / 2.0;
    mid + p.amplitude * (TAU * p.frequency * x.progress + p.phase).cos()
}

pub(crate) fn exponential(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let s = p.start_value;
    let d = x.duration_minutes;
    let raw = s * (p.rate * x.progress * d).exp();
    let final_value = s * (p.rate * d).exp();
    renormalize(raw, s, final_value, p.end_value, x.progress)
}

pub(crate) fn exponential_decay(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let s = p.start_value;
    let d = x.duration_minutes;
    let raw = s * (-p.rate * x.progress * d).exp();
    let final_value = s * (-p.rate * d).exp();
    renormalize(raw, s, final_value, p.end_value, x.progress)
}

pub(crate) fn logarithmic(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let s = p.start_value;
    let d = x.duration_minutes;
    let rate = p.rate.max(0.0);
    let raw = s + (1.0 + rate * x.progress * d).ln();
    let final_value = s + (1.0 + rate * d).ln();
    renormalize(raw, s, final_value, p.end_value, x.progress)
}

pub(crate) fn sigmoid(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let k = p.rate;
    if !(k.is_finite() && k > 0.0) {
        return linear(p, x);
    }
    let logistic = |t: f64| 1.0 / (1.0 + (-k * (t - 0.5)).exp());
    let lo = logistic(0.0);
    let hi = logistic(1.0);
    let t = (logistic(x.progress) - lo) / (hi - lo);
    lerp(p.start_value, p.end_value, t)
}

pub(crate) fn parabola(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    if x.progress <= 0.0 {
        return p.start_value;
    }
    if x.progress >= 1.0 {
        return p.end_value;
    }
    let c = p.peak_position.clamp(0.05, 0.95);
    let half = if x.progress <= c { c } else { 1.0 - c };
    let u = (x.progress - c) / half;
    lerp(p.start_value, p.end_value, x.progress) + p.amplitude * (1.0 - u * u)
}

pub(crate) fn bell(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let c = p.peak_position;
    let w = p.width.abs().max(1e-3);
    let bump = (-(x.progress - c).powi(2) / (2.0 * w * w)).exp();
    lerp(p.start_value, p.end_value, x.progress) + p.amplitude * bump
}

pub(crate) fn step(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let n = p.step_count.max(1) as f64;
    let (k, frac) = cycle_phase(x.progress, n);
    // each step ramps over its first fifth, then holds
    let ramp = (frac / 0.2).min(1.0);
    lerp(p.start_value, p.end_value, (k + ramp) / n)
}

pub(crate) fn sawtooth(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let (_, phase) = cycle_phase(x.progress, cycles(p.frequency));
    lerp(p.start_value, p.end_value, phase)
}

pub(crate) fn square(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let (_, phase) = cycle_phase(x.progress, cycles(p.frequency));
    if phase < p.duty_ratio.clamp(0.0, 1.0) {
        p.start_value
    } else {
        p.end_value
    }
}

/// First-order approach from start toward end with `response_tau`,
/// renormalized to finish exactly on the end value. Shared by the
/// pull-down/warm-up and load-dependent cool-down profiles.
pub(crate) fn first_order_approach(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let s = p.start_value;
    let e = p.end_value;
    let t = tau(p.response_tau);
    let d = x.duration_minutes;
    let raw = e + (s - e) * (-x.progress * d / t).exp();
    let final_value = e + (s - e) * (-d / t).exp();
    renormalize(raw, s, final_value, e, x.progress)
}

pub(crate) fn steady_state(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    lerp(p.start_value, p.end_value, x.progress) + seeded_jitter(x.index, p.noise)
}

/// Value relaxing from `from` toward `toward` after `minutes`.
fn relax(from: f64, toward: f64, minutes: f64, tau_minutes: f64) -> f64 {
    toward + (from - toward) * (-minutes.max(0.0) / tau(tau_minutes)).exp()
}

/// Door disturbance: fast rise toward ambient while open, recovery toward
/// the end value otherwise. `openings` are `(start, length)` in progress.
fn door_profile(p: &ResolvedParams, x: &SamplePoint, openings: &[(f64, f64)]) -> f64 {
    let d = x.duration_minutes;
    let mut level = p.start_value;
    let mut since = 0.0;
    for &(start, length) in openings {
        if x.progress <= start {
            break;
        }
        let at_open = relax(level, p.end_value, (start - since) * d, p.recovery_tau);
        let close = start + length;
        if x.progress <= close {
            return relax(at_open, p.env_temp, (x.progress - start) * d, p.response_tau);
        }
        level = relax(at_open, p.env_temp, length * d, p.response_tau);
        since = close;
    }
    relax(level, p.end_value, (x.progress - since) * d, p.recovery_tau)
}

pub(crate) fn single_door(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let start = p.open_start.clamp(0.0, 1.0);
    let length = p.open_duration.clamp(0.0, 1.0 - start);
    door_profile(p, x, &[(start, length)])
}

pub(crate) fn multi_door(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let length = p.open_duration.clamp(0.0, 1.0);
    let interval = p.open_interval.max(length);
    let openings: Vec<(f64, f64)> = (0..p.open_count)
        .map(|i| (p.open_start + i as f64 * interval, length))
        .filter(|&(start, _)| (0.0..1.0).contains(&start))
        .map(|(start, len)| (start, len.min(1.0 - start)))
        .collect();
    door_profile(p, x, &openings)
}

/// Fast partial excursion toward ambient, then recovery toward the target.
pub(crate) fn stress(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let s = p.start_value;
    let peak = s + STRESS_EXCURSION * (p.env_temp - s);
    if x.progress <= STRESS_RISE_END {
        let shape = (1.0 - (-5.0 * x.progress / STRESS_RISE_END).exp()) / (1.0 - (-5.0_f64).exp());
        return lerp(s, peak, shape);
    }
    relax(
        peak,
        p.target_temp,
        (x.progress - STRESS_RISE_END) * x.duration_minutes,
        p.recovery_tau,
    )
}

/// Repeated cycles: an exponential transition from start to end over the
/// first 30% of each cycle, then a noisy plateau at the end value.
pub(crate) fn on_off_cycle(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let n = cycles(p.frequency);
    let (_, phase) = cycle_phase(x.progress, n);
    if phase < CYCLE_TRANSITION {
        let transition_minutes = CYCLE_TRANSITION * x.duration_minutes / n;
        let k = transition_minutes / tau(p.response_tau);
        let u = phase / CYCLE_TRANSITION;
        let denom = 1.0 - (-k).exp();
        let shape = if denom.abs() < 1e-12 {
            u
        } else {
            (1.0 - (-k * u).exp()) / denom
        };
        lerp(p.start_value, p.end_value, shape)
    } else {
        p.end_value + seeded_jitter(x.index, p.noise)
    }
}

/// Unpowered drift from the start value toward ambient.
pub(crate) fn power_loss(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let rate = p.rate.max(0.0);
    p.env_temp + (p.start_value - p.env_temp) * (-rate * x.progress * x.duration_minutes).exp()
}

/// Compressor duty cycle between the two endpoint levels: falling while on,
/// rising while off.
pub(crate) fn duty_cycle(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let hi = p.start_value.max(p.end_value);
    let lo = p.start_value.min(p.end_value);
    let duty = p.duty_ratio.clamp(0.05, 0.95);
    let (_, phase) = cycle_phase(x.progress, cycles(p.frequency));
    let base = if phase < duty {
        hi - (hi - lo) * (phase / duty)
    } else {
        lo + (hi - lo) * ((phase - duty) / (1.0 - duty))
    };
    base + seeded_jitter(x.index, p.noise)
}

/// Probe zone coupled to its neighbours. Zones share the start-to-end trend
/// and oscillate out of phase; the probe sees its own zone blended with the
/// zone average by `coupling`.
pub(crate) fn multi_zone(p: &ResolvedParams, x: &SamplePoint) -> f64 {
    let base = lerp(p.start_value, p.end_value, x.progress);
    let zones = p.zone_count.max(1) as u64;
    let coupling = p.coupling.clamp(0.0, 1.0);
    let zone_value = |z: u64| {
        let offset = TAU * z as f64 / zones as f64;
        base + p.amplitude * (TAU * p.frequency * x.progress + offset).sin()
            + seeded_jitter(x.index * zones + z, p.noise)
    };
    let mean = (0..zones).map(&zone_value).sum::<f64>() / zones as f64;
    (1.0 - coupling) * zone_value(0) + coupling * mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{CurveParams, ParamDefaults};

    fn resolved(s: f64, e: f64) -> ResolvedParams {
        CurveParams::new(s, e).resolve(&ParamDefaults::BASE)
    }

    fn at(progress: f64) -> SamplePoint {
        SamplePoint {
            progress,
            index: 3,
            duration_minutes: 120.0,
        }
    }

    #[test]
    fn renormalize_hits_both_ends() {
        assert_eq!(renormalize(5.0, 5.0, 9.0, 1.0, 0.0), 5.0);
        assert!((renormalize(9.0, 5.0, 9.0, 1.0, 1.0) - 1.0).abs() < 1e-12);
        // degenerate span: linear
        assert!((renormalize(5.0, 5.0, 5.0, 1.0, 0.5) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn door_rises_toward_ambient_then_recovers() {
        let mut p = resolved(4.0, 4.0);
        p.env_temp = 25.0;
        p.open_start = 0.2;
        p.open_duration = 0.1;
        let before = single_door(&p, &at(0.1));
        let during = single_door(&p, &at(0.3));
        let after = single_door(&p, &at(1.0));
        assert!((before - 4.0).abs() < 1e-9);
        assert!(during > 10.0, "door peak {during}");
        assert!(after < during);
        assert!((after - 4.0).abs() < 1.0);
    }

    #[test]
    fn multi_door_has_several_peaks() {
        let mut p = resolved(4.0, 4.0);
        p.open_count = 3;
        p.open_start = 0.1;
        p.open_interval = 0.25;
        p.open_duration = 0.05;
        p.recovery_tau = 5.0;
        let peaks = [0.15, 0.40, 0.65].map(|t| multi_door(&p, &at(t)));
        let troughs = [0.35, 0.60].map(|t| multi_door(&p, &at(t)));
        for peak in peaks {
            assert!(peak > troughs[0] && peak > troughs[1]);
        }
    }

    #[test]
    fn stress_excursion_is_thirty_percent() {
        let mut p = resolved(4.0, 4.0);
        p.env_temp = 40.0;
        let peak = stress(&p, &at(STRESS_RISE_END));
        assert!((peak - (4.0 + 0.3 * 36.0)).abs() < 1e-9);
        assert!(stress(&p, &at(1.0)) < peak);
    }

    #[test]
    fn on_off_cycle_plateaus_at_end_value() {
        let mut p = resolved(8.0, 2.0);
        p.frequency = 4.0;
        p.noise = 0.0;
        // phase 0.5 of the first cycle is on the plateau
        assert!((on_off_cycle(&p, &at(0.125)) - 2.0).abs() < 1e-12);
        // each cycle restarts from the start value
        assert!((on_off_cycle(&p, &at(0.25)) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn power_loss_drifts_toward_ambient() {
        let mut p = resolved(-18.0, -18.0);
        p.env_temp = 25.0;
        p.rate = 0.01;
        let end = power_loss(&p, &at(1.0));
        assert!(end > -18.0 && end < 25.0);
    }

    #[test]
    fn duty_cycle_stays_between_levels() {
        let mut p = resolved(6.0, 2.0);
        p.noise = 0.0;
        p.frequency = 6.0;
        p.duty_ratio = 0.6;
        for i in 0..=100 {
            let v = duty_cycle(&p, &at(i as f64 / 100.0));
            assert!((2.0 - 1e-9..=6.0 + 1e-9).contains(&v));
        }
    }

    #[test]
    fn step_reaches_end_value() {
        let p = resolved(0.0, 8.0);
        assert!((step(&p, &at(1.0)) - 8.0).abs() < 1e-12);
        // holding on the first level
        assert!((step(&p, &at(0.2)) - 2.0).abs() < 1e-12);
    }
}
