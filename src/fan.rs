//! Fan modes and on/off state.
//!
//! The device reports a continuous level (`currentLevel`, 0..=255) but the
//! fan only has a handful of speeds. [`QuantizedModeMapper`] folds a level
//! onto the mode whose breakpoint is the greatest one not exceeding it.

use std::str::FromStr;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum FanMode {
    Low,
    Medium,
    High,
    On,
}

/// Breakpoints of the VZM35-SN, ascending.
pub const FAN_MODE_BREAKPOINTS: [(u8, FanMode); 4] = [
    (2, FanMode::Low),
    (85, FanMode::Medium),
    (254, FanMode::High),
    (255, FanMode::On),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModeError {
    #[error("unknown fan mode `{0}`")]
    UnknownMode(String),
    #[error("unknown fan state command `{0}`")]
    UnknownStateCommand(String),
    #[error("mode table is empty")]
    EmptyTable,
    #[error("mode table breakpoint {threshold} does not follow {previous}")]
    NotAscending { previous: u8, threshold: u8 },
}

/// Ascending breakpoint table mapping levels to modes and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedModeMapper {
    breakpoints: Vec<(u8, FanMode)>,
}

impl Default for QuantizedModeMapper {
    fn default() -> Self {
        Self {
            breakpoints: FAN_MODE_BREAKPOINTS.to_vec(),
        }
    }
}

impl QuantizedModeMapper {
    /// Builds a mapper from breakpoints that must be strictly ascending.
    pub fn new(breakpoints: Vec<(u8, FanMode)>) -> Result<Self, ModeError> {
        if breakpoints.is_empty() {
            return Err(ModeError::EmptyTable);
        }
        for pair in breakpoints.windows(2) {
            let (previous, threshold) = (pair[0].0, pair[1].0);
            if threshold <= previous {
                return Err(ModeError::NotAscending {
                    previous,
                    threshold,
                });
            }
        }

        Ok(Self { breakpoints })
    }

    /// Mode of the greatest breakpoint `<= level`; the lowest mode when the
    /// level is below every breakpoint.
    pub fn level_to_mode(&self, level: u32) -> FanMode {
        let lowest = self.breakpoints[0].1;

        self.breakpoints
            .iter()
            .take_while(|(threshold, _)| u32::from(*threshold) <= level)
            .last()
            .map_or(lowest, |(_, mode)| *mode)
    }

    pub fn mode_to_level(&self, label: &str) -> Result<u8, ModeError> {
        FanMode::from_str(label)
            .ok()
            .and_then(|mode| self.level_of(mode))
            .ok_or_else(|| ModeError::UnknownMode(label.to_owned()))
    }

    pub fn level_of(&self, mode: FanMode) -> Option<u8> {
        self.breakpoints
            .iter()
            .find(|(_, m)| *m == mode)
            .map(|(threshold, _)| *threshold)
    }

    pub fn breakpoints(&self) -> &[(u8, FanMode)] {
        &self.breakpoints
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum FanState {
    On,
    Off,
}

impl FanState {
    pub fn from_on_off(value: u32) -> Self {
        if value == 1 { Self::On } else { Self::Off }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }
}

/// On/off cluster commands a client may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FanStateCommand {
    On,
    Off,
    Toggle,
}

impl FanStateCommand {
    pub fn parse(value: &str) -> Result<Self, ModeError> {
        Self::from_str(value).map_err(|_| ModeError::UnknownStateCommand(value.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::{FanMode, FanState, FanStateCommand, ModeError, QuantizedModeMapper};

    #[test]
    fn quantizes_levels() {
        let mapper = QuantizedModeMapper::default();

        assert_eq!(mapper.level_to_mode(0), FanMode::Low);
        assert_eq!(mapper.level_to_mode(1), FanMode::Low);
        assert_eq!(mapper.level_to_mode(2), FanMode::Low);
        assert_eq!(mapper.level_to_mode(84), FanMode::Low);
        assert_eq!(mapper.level_to_mode(85), FanMode::Medium);
        assert_eq!(mapper.level_to_mode(253), FanMode::Medium);
        assert_eq!(mapper.level_to_mode(254), FanMode::High);
        assert_eq!(mapper.level_to_mode(255), FanMode::On);
        assert_eq!(mapper.level_to_mode(u32::MAX), FanMode::On);
    }

    #[test]
    fn maps_modes_back_to_levels() {
        let mapper = QuantizedModeMapper::default();

        assert_eq!(mapper.mode_to_level("medium"), Ok(85));
        assert_eq!(mapper.mode_to_level("on"), Ok(255));
        assert_eq!(
            mapper.mode_to_level("nonexistent"),
            Err(ModeError::UnknownMode("nonexistent".to_owned()))
        );
    }

    #[test]
    fn every_mode_round_trips() {
        let mapper = QuantizedModeMapper::default();
        for mode in FanMode::iter() {
            let level = mapper
                .mode_to_level(<&'static str>::from(mode))
                .expect("mode is in the table");
            assert_eq!(mapper.level_to_mode(level.into()), mode);
        }
    }

    #[test]
    fn rejects_unsorted_or_empty_tables() {
        assert_eq!(QuantizedModeMapper::new(Vec::new()), Err(ModeError::EmptyTable));
        assert_eq!(
            QuantizedModeMapper::new(vec![(85, FanMode::Medium), (2, FanMode::Low)]),
            Err(ModeError::NotAscending {
                previous: 85,
                threshold: 2,
            })
        );
        assert!(QuantizedModeMapper::new(vec![(2, FanMode::Low), (2, FanMode::High)]).is_err());
    }

    #[test]
    fn custom_table_without_a_mode() {
        let mapper = QuantizedModeMapper::new(vec![(10, FanMode::Low), (200, FanMode::High)])
            .expect("ascending");

        assert_eq!(mapper.level_to_mode(5), FanMode::Low);
        assert_eq!(mapper.level_to_mode(150), FanMode::Low);
        assert!(matches!(mapper.mode_to_level("medium"), Err(ModeError::UnknownMode(_))));
    }

    #[test]
    fn fan_state_commands() {
        assert_eq!(FanStateCommand::parse("TOGGLE"), Ok(FanStateCommand::Toggle));
        assert_eq!(FanStateCommand::parse("on"), Ok(FanStateCommand::On));
        assert!(FanStateCommand::parse("spin").is_err());
        assert_eq!(FanState::On.toggled(), FanState::Off);
        assert_eq!(FanState::from_on_off(1).to_string(), "ON");
        assert_eq!(FanState::from_on_off(0), FanState::Off);
    }
}
