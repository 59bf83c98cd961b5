use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Preset caps offered next to the step buttons.
pub const LIMIT_PRESETS: [u32; 3] = [50, 100, 200];

/// Amount the step buttons add or remove.
pub const LIMIT_STEP: u32 = 50;

/// Cap used by `LimitMode::Fixed` when no explicit value is given.
pub const DEFAULT_FIXED_LIMIT: u32 = 100;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LimitError {
    #[error("{0} is not one of the limit presets")]
    UnknownPreset(u32),

    #[error("invalid limit mode: {0} (expected none, adjustable or fixed:<n>)")]
    InvalidMode(String),
}

/// Maximum number of questions drawn into a session. Zero means no cap.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct QuestionLimit(u32);

impl QuestionLimit {
    pub const UNLIMITED: Self = Self(0);

    #[must_use]
    pub const fn new(limit: u32) -> Self {
        Self(limit)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_unlimited(self) -> bool {
        self.0 == 0
    }

    /// Size of the working set drawn from `available` questions.
    #[must_use]
    pub fn apply(self, available: usize) -> usize {
        if self.is_unlimited() {
            return available;
        }
        usize::try_from(self.0).map_or(available, |cap| cap.min(available))
    }

    /// Shift the limit by `delta`, clamping at zero and at `u32::MAX`.
    #[must_use]
    pub fn adjusted(self, delta: i64) -> Self {
        let next = i64::from(self.0).saturating_add(delta);
        Self(u32::try_from(next.max(0)).unwrap_or(u32::MAX))
    }
}

impl fmt::Display for QuestionLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unlimited() {
            f.write_str("No Limit")
        } else {
            write!(f, "{} Questions", self.0)
        }
    }
}

/// How the limit for a session is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LimitMode {
    /// Every loaded question is used.
    None,
    /// A cap fixed by configuration; the user cannot change it.
    Fixed(QuestionLimit),
    /// The user picks presets or steps the limit up and down.
    #[default]
    Adjustable,
}

impl LimitMode {
    /// The limit actually applied at session start.
    #[must_use]
    pub fn effective(self, chosen: QuestionLimit) -> QuestionLimit {
        match self {
            LimitMode::None => QuestionLimit::UNLIMITED,
            LimitMode::Fixed(limit) => limit,
            LimitMode::Adjustable => chosen,
        }
    }

    #[must_use]
    pub fn is_adjustable(self) -> bool {
        matches!(self, LimitMode::Adjustable)
    }
}

impl fmt::Display for LimitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitMode::None => f.write_str("none"),
            LimitMode::Fixed(limit) => write!(f, "fixed:{}", limit.value()),
            LimitMode::Adjustable => f.write_str("adjustable"),
        }
    }
}

impl FromStr for LimitMode {
    type Err = LimitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase();
        match raw.as_str() {
            "none" => return Ok(LimitMode::None),
            "adjustable" => return Ok(LimitMode::Adjustable),
            "fixed" => return Ok(LimitMode::Fixed(QuestionLimit::new(DEFAULT_FIXED_LIMIT))),
            _ => {}
        }
        raw.strip_prefix("fixed:")
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .map(|n| LimitMode::Fixed(QuestionLimit::new(n)))
            .ok_or_else(|| LimitError::InvalidMode(s.to_string()))
    }
}

/// The user's limit choice together with the presets and step on offer.
///
/// At most one preset is active at a time: a preset is active exactly when it
/// equals the current limit, so choosing one preset clears any other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitSettings {
    limit: QuestionLimit,
    presets: Vec<QuestionLimit>,
    step: u32,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            limit: QuestionLimit::UNLIMITED,
            presets: LIMIT_PRESETS.iter().copied().map(QuestionLimit::new).collect(),
            step: LIMIT_STEP,
        }
    }
}

impl LimitSettings {
    #[must_use]
    pub fn with_limit(limit: QuestionLimit) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn limit(&self) -> QuestionLimit {
        self.limit
    }

    #[must_use]
    pub fn presets(&self) -> &[QuestionLimit] {
        &self.presets
    }

    #[must_use]
    pub fn step(&self) -> u32 {
        self.step
    }

    #[must_use]
    pub fn active_preset(&self) -> Option<QuestionLimit> {
        self.presets.iter().copied().find(|p| *p == self.limit)
    }

    /// # Errors
    ///
    /// Returns `LimitError::UnknownPreset` if `preset` is not offered.
    pub fn select_preset(&mut self, preset: QuestionLimit) -> Result<(), LimitError> {
        if !self.presets.contains(&preset) {
            return Err(LimitError::UnknownPreset(preset.value()));
        }
        self.limit = preset;
        Ok(())
    }

    /// Unchecking the active preset removes the cap.
    pub fn clear_preset(&mut self) {
        if self.active_preset().is_some() {
            self.limit = QuestionLimit::UNLIMITED;
        }
    }

    /// # Errors
    ///
    /// Returns `LimitError::UnknownPreset` if `preset` is not offered.
    pub fn toggle_preset(&mut self, preset: QuestionLimit) -> Result<(), LimitError> {
        if self.active_preset() == Some(preset) {
            self.clear_preset();
            Ok(())
        } else {
            self.select_preset(preset)
        }
    }

    pub fn step_up(&mut self) {
        self.limit = self.limit.adjusted(i64::from(self.step));
    }

    pub fn step_down(&mut self) {
        self.limit = self.limit.adjusted(-i64::from(self.step));
    }

    pub fn set_limit(&mut self, limit: QuestionLimit) {
        self.limit = limit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_caps_working_set() {
        assert_eq!(QuestionLimit::new(4).apply(5), 4);
        assert_eq!(QuestionLimit::new(10).apply(5), 5);
        assert_eq!(QuestionLimit::UNLIMITED.apply(5), 5);
        assert_eq!(QuestionLimit::new(3).apply(0), 0);
    }

    #[test]
    fn adjust_clamps_at_zero() {
        assert_eq!(QuestionLimit::new(30).adjusted(-50), QuestionLimit::UNLIMITED);
        assert_eq!(QuestionLimit::new(30).adjusted(50), QuestionLimit::new(80));
        assert_eq!(
            QuestionLimit::new(u32::MAX).adjusted(1),
            QuestionLimit::new(u32::MAX)
        );
    }

    #[test]
    fn limit_mode_parses_cli_values() {
        assert_eq!("none".parse(), Ok(LimitMode::None));
        assert_eq!("Adjustable".parse(), Ok(LimitMode::Adjustable));
        assert_eq!(
            "fixed".parse(),
            Ok(LimitMode::Fixed(QuestionLimit::new(DEFAULT_FIXED_LIMIT)))
        );
        assert_eq!(
            "fixed:25".parse(),
            Ok(LimitMode::Fixed(QuestionLimit::new(25)))
        );
        assert_eq!(
            "fixed:0".parse::<LimitMode>(),
            Err(LimitError::InvalidMode("fixed:0".into()))
        );
        assert!("fixed:-3".parse::<LimitMode>().is_err());
    }

    #[test]
    fn display_matches_limit_label() {
        assert_eq!(QuestionLimit::UNLIMITED.to_string(), "No Limit");
        assert_eq!(QuestionLimit::new(50).to_string(), "50 Questions");
    }

    #[test]
    fn presets_are_mutually_exclusive() {
        let mut settings = LimitSettings::default();
        settings.select_preset(QuestionLimit::new(50)).unwrap();
        assert_eq!(settings.active_preset(), Some(QuestionLimit::new(50)));

        settings.select_preset(QuestionLimit::new(200)).unwrap();
        assert_eq!(settings.active_preset(), Some(QuestionLimit::new(200)));
        assert_eq!(settings.limit(), QuestionLimit::new(200));

        settings.toggle_preset(QuestionLimit::new(200)).unwrap();
        assert_eq!(settings.limit(), QuestionLimit::UNLIMITED);
        assert_eq!(settings.active_preset(), None);

        assert_eq!(
            settings.select_preset(QuestionLimit::new(7)),
            Err(LimitError::UnknownPreset(7))
        );
    }

    #[test]
    fn stepping_can_land_on_a_preset() {
        let mut settings = LimitSettings::default();
        settings.step_down();
        assert_eq!(settings.limit(), QuestionLimit::UNLIMITED);
        settings.step_up();
        settings.step_up();
        assert_eq!(settings.active_preset(), Some(QuestionLimit::new(100)));
        settings.step_up();
        assert_eq!(settings.limit(), QuestionLimit::new(150));
        assert_eq!(settings.active_preset(), None);
    }

    #[test]
    fn limit_mode_parsing_and_effective_limit() {
        assert_eq!("none".parse::<LimitMode>().unwrap(), LimitMode::None);
        assert_eq!(
            "fixed".parse::<LimitMode>().unwrap(),
            LimitMode::Fixed(QuestionLimit::new(100))
        );
        assert_eq!(
            "Fixed:25".parse::<LimitMode>().unwrap(),
            LimitMode::Fixed(QuestionLimit::new(25))
        );
        assert!("fixed:x".parse::<LimitMode>().is_err());

        let chosen = QuestionLimit::new(50);
        assert_eq!(LimitMode::None.effective(chosen), QuestionLimit::UNLIMITED);
        assert_eq!(LimitMode::Adjustable.effective(chosen), chosen);
        assert_eq!(
            LimitMode::Fixed(QuestionLimit::new(100)).effective(chosen),
            QuestionLimit::new(100)
        );
    }
}
