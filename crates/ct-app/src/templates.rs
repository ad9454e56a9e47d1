//! Built-in trend profiles.

use ct_curves::{CurveFamily, CurveParams};

use crate::error::{AppError, AppResult};
use crate::profile::TrendProfile;

const TEMPLATES: [(&str, &str); 5] = [
    ("cold-room-qualification", "Pull-down, hold, one door opening, hold"),
    ("freezer-pulldown", "Deep-freeze pull-down from ambient"),
    ("power-outage", "Steady chilled storage, outage drift, recovery"),
    ("door-traffic", "Repeated door openings followed by compressor cycling"),
    ("stability-cycle", "On/off cooling cycles with humidity swing"),
];

pub fn template_names() -> Vec<&'static str> {
    TEMPLATES.iter().map(|(name, _)| *name).collect()
}

/// Build the named template.
pub fn template(name: &str) -> AppResult<TrendProfile> {
    let Some((name, description)) = TEMPLATES.iter().find(|(n, _)| *n == name) else {
        return Err(AppError::TemplateNotFound(name.to_string()));
    };
    let mut p = TrendProfile::new(*name);
    p.description = description.to_string();

    use CurveFamily::*;
    match *name {
        "cold-room-qualification" => {
            p.temperature.append(Precool, 60.0, CurveParams::new(25.0, 4.0));
            p.temperature.append(SteadyState, 120.0, CurveParams::new(4.0, 4.0));
            p.temperature.append(
                SingleDoor,
                30.0,
                CurveParams::new(4.0, 4.0).with_env_temp(25.0),
            );
            p.temperature.append(SteadyState, 60.0, CurveParams::new(4.0, 4.0));
            p.humidity.append(Constant, 60.0, CurveParams::new(65.0, 65.0));
            p.humidity.append(Sigmoid, 120.0, CurveParams::new(65.0, 50.0));
            p.humidity.append(SteadyState, 90.0, CurveParams::new(50.0, 50.0).with_noise(1.0));
        }
        "freezer-pulldown" => {
            p.temperature.append(DeepFreeze, 180.0, CurveParams::new(20.0, -25.0));
            p.temperature.append(SteadyState, 120.0, CurveParams::new(-25.0, -25.0));
            p.humidity.append(Down, 180.0, CurveParams::new(60.0, 40.0));
            p.humidity.append(Constant, 120.0, CurveParams::new(40.0, 40.0));
        }
        "power-outage" => {
            p.temperature.append(SteadyState, 60.0, CurveParams::new(4.0, 4.0));
            p.temperature.append(
                PowerLoss,
                120.0,
                CurveParams::new(4.0, 4.0).with_env_temp(25.0),
            );
            p.temperature.append(Precool, 90.0, CurveParams::new(12.0, 4.0));
            p.humidity.append(SteadyState, 270.0, CurveParams::new(55.0, 55.0).with_noise(1.5));
        }
        "door-traffic" => {
            p.temperature.append(
                MultiDoor,
                120.0,
                CurveParams::new(5.0, 5.0).with_env_temp(22.0),
            );
            p.temperature.append(CycleOnOffCool, 120.0, CurveParams::new(5.0, 3.0));
            p.humidity.append(
                MultiDoor,
                120.0,
                CurveParams::new(50.0, 50.0).with_env_temp(80.0),
            );
            p.humidity.append(Constant, 120.0, CurveParams::new(50.0, 50.0));
        }
        _ => {
            p.temperature.append(CycleOnOffCool, 180.0, CurveParams::new(2.0, 8.0));
            p.humidity.append(
                Sine,
                180.0,
                CurveParams::new(55.0, 55.0).with_amplitude(5.0).with_frequency(3.0),
            );
        }
    }
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::validate_profile;

    #[test]
    fn every_template_is_valid() {
        for name in template_names() {
            let p = template(name).unwrap();
            validate_profile(&p).unwrap_or_else(|e| panic!("{name}: {e}"));
            assert!(p.duration_minutes() > 0.0);
        }
    }

    #[test]
    fn unknown_template() {
        assert!(matches!(
            template("nope"),
            Err(AppError::TemplateNotFound(_))
        ));
    }
}
