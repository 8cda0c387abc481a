use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Caller hint about the jack's color.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JackColor {
    /// Size/saturation score, no hue bonus.
    #[default]
    Auto,
    Yellow,
    Orange,
    /// Pure geometry: the smallest circle is the jack.
    Any,
}

impl JackColor {
    pub const ALL: [JackColor; 4] = [
        JackColor::Auto,
        JackColor::Yellow,
        JackColor::Orange,
        JackColor::Any,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JackColor::Auto => "auto",
            JackColor::Yellow => "yellow",
            JackColor::Orange => "orange",
            JackColor::Any => "any",
        }
    }

    pub fn is_color_aware(&self) -> bool {
        !matches!(self, JackColor::Any)
    }
}

impl fmt::Display for JackColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown jack color '{0}' (expected auto, yellow, orange or any)")]
pub struct UnknownJackColor(pub String);

impl FromStr for JackColor {
    type Err = UnknownJackColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JackColor::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownJackColor(s.to_string()))
    }
}

/// Inclusive hue interval on the `[0, 180)` scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HueBand {
    pub min: f32,
    pub max: f32,
}

impl HueBand {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, hue: f32) -> bool {
        hue >= self.min && hue <= self.max
    }
}

/// Color-aware jack scoring settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Half side of the sampled square as a fraction of the radius
    /// (0.3 gives a square of ~60% of the diameter).
    pub sample_half_frac: f32,
    /// Score added when the sampled hue falls in the requested band.
    pub hue_bonus: f32,
    pub yellow_hue: HueBand,
    pub orange_hue: HueBand,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            sample_half_frac: 0.3,
            hue_bonus: 2.0,
            yellow_hue: HueBand::new(20.0, 35.0),
            orange_hue: HueBand::new(5.0, 25.0),
        }
    }
}

impl ClassifierParams {
    /// Hue band that earns the bonus in `mode`, if any.
    pub fn band_for(&self, mode: JackColor) -> Option<HueBand> {
        match mode {
            JackColor::Yellow => Some(self.yellow_hue),
            JackColor::Orange => Some(self.orange_hue),
            JackColor::Auto | JackColor::Any => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_modes_case_insensitively() {
        for mode in JackColor::ALL {
            assert_eq!(mode.as_str().parse::<JackColor>(), Ok(mode));
            assert_eq!(mode.as_str().to_uppercase().parse::<JackColor>(), Ok(mode));
        }
        assert!("purple".parse::<JackColor>().is_err());
    }

    #[test]
    fn only_any_ignores_color() {
        let aware: Vec<JackColor> = JackColor::ALL
            .into_iter()
            .filter(JackColor::is_color_aware)
            .collect();
        assert_eq!(aware, vec![JackColor::Auto, JackColor::Yellow, JackColor::Orange]);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&JackColor::Orange).expect("serialize");
        assert_eq!(json, "\"orange\"");
        let back: JackColor = serde_json::from_str("\"any\"").expect("deserialize");
        assert_eq!(back, JackColor::Any);
    }

    #[test]
    fn bands_are_inclusive_and_mode_specific() {
        let p = ClassifierParams::default();
        assert!(p.band_for(JackColor::Yellow).expect("band").contains(20.0));
        assert!(p.band_for(JackColor::Yellow).expect("band").contains(35.0));
        assert!(!p.band_for(JackColor::Orange).expect("band").contains(25.5));
        assert!(p.band_for(JackColor::Auto).is_none());
        assert!(p.band_for(JackColor::Any).is_none());
    }
}
