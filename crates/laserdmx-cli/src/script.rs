//! `apply` scripts: a TOML list of `[[step]]` tables run in one session.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use laserdmx_core::EncodeError;
use laserdmx_core::modes::{Feature, Laser, ModeRequest};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    pub feature: String,
    #[serde(default)]
    pub laser: Laser,
    pub mode: Option<String>,
    pub value: Option<u16>,
    pub delay: Option<u16>,
    /// Pause after this step has been sent.
    pub pause_ms: Option<u64>,
}

impl Step {
    pub fn request(&self) -> Result<ModeRequest<'_>, EncodeError> {
        let feature: Feature = self.feature.parse()?;
        Ok(ModeRequest {
            feature,
            laser: self.laser,
            mode: self.mode.as_deref(),
            value: self.value,
            delay: self.delay,
        })
    }
}

pub fn load(path: &Path) -> Result<Script> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid script: {}", path.display()))
}

pub fn parse(text: &str) -> Result<Script> {
    Ok(toml::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steps_in_order() {
        let script = parse(
            r#"
[[step]]
feature = "lamp_mode"
mode = "dynamic_sound"

[[step]]
feature = "pattern_zoom"
laser = 2
mode = "zoom_in"
value = 145
pause_ms = 10
"#,
        )
        .unwrap();
        assert_eq!(script.steps.len(), 2);
        assert_eq!(script.steps[0].laser, Laser::One);
        let request = script.steps[1].request().unwrap();
        assert_eq!(request.feature, Feature::PatternZoom);
        assert_eq!(request.laser, Laser::Two);
        assert_eq!(request.value, Some(145));
        assert_eq!(script.steps[1].pause_ms, Some(10));
    }

    #[test]
    fn rejects_laser_three() {
        let err = parse("[[step]]\nfeature = \"strobe\"\nlaser = 3\n").unwrap_err();
        assert!(format!("{err:#}").contains("must be 1 or 2"));
    }

    #[test]
    fn unknown_feature_fails_at_request() {
        let script = parse("[[step]]\nfeature = \"fog\"\n").unwrap();
        assert!(script.steps[0].request().is_err());
    }
}
