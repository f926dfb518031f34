//! LED effect commands for the manufacturer cluster.
//!
//! Numeric fields are clamped into their device domain rather than rejected;
//! only an unknown effect label is an error.

use std::str::FromStr;

use num_enum::IntoPrimitive;
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

pub const MAX_COLOR: u8 = 255;
pub const MAX_LEVEL: u8 = 100;
pub const MAX_DURATION: u8 = 255;
pub const MAX_LED_INDEX: u8 = 7;

/// Effects played across the whole LED bar.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, Display, EnumIter, EnumString,
    IntoStaticStr, Serialize,
)]
#[repr(u8)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LedEffect {
    Off = 0,
    Solid = 1,
    FastBlink = 2,
    SlowBlink = 3,
    Pulse = 4,
    Chase = 5,
    OpenClose = 6,
    SmallToBig = 7,
    Aurora = 8,
    SlowFalling = 9,
    MediumFalling = 10,
    FastFalling = 11,
    SlowRising = 12,
    MediumRising = 13,
    FastRising = 14,
    MediumBlink = 15,
    SlowChase = 16,
    FastChase = 17,
    FastSiren = 18,
    SlowSiren = 19,
    ClearEffect = 255,
}

/// Effects a single LED can play.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, Display, EnumIter, EnumString,
    IntoStaticStr, Serialize,
)]
#[repr(u8)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IndividualLedEffect {
    Off = 0,
    Solid = 1,
    FastBlink = 2,
    SlowBlink = 3,
    Pulse = 4,
    Chase = 5,
    Falling = 6,
    Rising = 7,
    Aurora = 8,
    ClearEffect = 255,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown LED effect `{0}`")]
    UnknownEffect(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedEffectCommand {
    pub effect: LedEffect,
    pub color: u8,
    pub level: u8,
    pub duration: u8,
}

impl LedEffectCommand {
    /// Command payload: effect, color, level, duration (one byte each).
    pub fn payload(&self) -> Vec<u8> {
        vec![self.effect.into(), self.color, self.level, self.duration]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndividualLedEffectCommand {
    pub led: u8,
    pub effect: IndividualLedEffect,
    pub color: u8,
    pub level: u8,
    pub duration: u8,
}

impl IndividualLedEffectCommand {
    /// Command payload: led, effect, color, level, duration (one byte each).
    pub fn payload(&self) -> Vec<u8> {
        vec![
            self.led,
            self.effect.into(),
            self.color,
            self.level,
            self.duration,
        ]
    }
}

pub fn build_effect_command(
    effect: &str,
    color: i64,
    level: i64,
    duration: i64,
) -> Result<LedEffectCommand, CommandError> {
    Ok(LedEffectCommand {
        effect: parse_effect(effect)?,
        color: saturate(color, MAX_COLOR),
        level: saturate(level, MAX_LEVEL),
        duration: saturate(duration, MAX_DURATION),
    })
}

pub fn build_individual_effect_command(
    target: i64,
    effect: &str,
    color: i64,
    level: i64,
    duration: i64,
) -> Result<IndividualLedEffectCommand, CommandError> {
    Ok(IndividualLedEffectCommand {
        led: saturate(target, MAX_LED_INDEX),
        effect: parse_effect(effect)?,
        color: saturate(color, MAX_COLOR),
        level: saturate(level, MAX_LEVEL),
        duration: saturate(duration, MAX_DURATION),
    })
}

fn parse_effect<E: FromStr>(label: &str) -> Result<E, CommandError> {
    E::from_str(&normalize_effect_name(label))
        .map_err(|_| CommandError::UnknownEffect(label.to_owned()))
}

fn saturate(value: i64, max: u8) -> u8 {
    u8::try_from(value.clamp(0, i64::from(max))).unwrap_or(max)
}

/// Lowercases and joins words with `_`, so `"Fast Blink"`, `"fast-blink"`
/// and `"fast_blink"` name the same effect.
fn normalize_effect_name(name: &str) -> String {
    let mut out = String::new();
    let mut in_gap = true;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            in_gap = false;
        } else if !in_gap {
            out.push('_');
            in_gap = true;
        }
    }

    if out.ends_with('_') {
        out.pop();
    }

    out
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::{
        CommandError, IndividualLedEffect, LedEffect, build_effect_command,
        build_individual_effect_command, normalize_effect_name,
    };

    #[test]
    fn clamps_out_of_domain_fields() {
        let cmd = build_effect_command("solid", 300, -5, 999).expect("known effect");
        assert_eq!(cmd.color, 255);
        assert_eq!(cmd.level, 0);
        assert_eq!(cmd.duration, 255);
        assert_eq!(cmd.payload(), vec![1, 255, 0, 255]);
    }

    #[test]
    fn keeps_in_domain_fields() {
        let cmd = build_effect_command("chase", 170, 100, 60).expect("known effect");
        assert_eq!(cmd.effect, LedEffect::Chase);
        assert_eq!(cmd.payload(), vec![5, 170, 100, 60]);
    }

    #[test]
    fn individual_effect_clamps_target() {
        let cmd = build_individual_effect_command(12, "falling", 0, 50, 1).expect("known effect");
        assert_eq!(cmd.led, 7);
        assert_eq!(cmd.effect, IndividualLedEffect::Falling);

        let cmd = build_individual_effect_command(-3, "pulse", 0, 50, 1).expect("known effect");
        assert_eq!(cmd.led, 0);
        assert_eq!(cmd.payload(), vec![0, 4, 0, 50, 1]);
    }

    #[test]
    fn rejects_unknown_effects() {
        assert_eq!(
            build_effect_command("disco", 0, 0, 0),
            Err(CommandError::UnknownEffect("disco".to_owned()))
        );
        // Whole-bar only effects are not available per LED.
        assert!(matches!(
            build_individual_effect_command(1, "fast_siren", 0, 0, 0),
            Err(CommandError::UnknownEffect(_))
        ));
    }

    #[test]
    fn accepts_display_style_labels() {
        assert_eq!(
            build_effect_command("Fast Blink", 0, 0, 0).map(|c| c.effect),
            Ok(LedEffect::FastBlink)
        );
        assert_eq!(
            build_effect_command("Open/Close", 0, 0, 0).map(|c| c.effect),
            Ok(LedEffect::OpenClose)
        );
        assert_eq!(
            build_effect_command(" Clear Effect ", 0, 0, 0).map(|c| c.effect),
            Ok(LedEffect::ClearEffect)
        );
        assert_eq!(normalize_effect_name("Small to Big"), "small_to_big");
    }

    #[test]
    fn every_effect_label_resolves_to_its_code() {
        for effect in LedEffect::iter() {
            let cmd =
                build_effect_command(<&'static str>::from(effect), 0, 0, 0).expect("own label");
            assert_eq!(cmd.payload()[0], u8::from(effect));
        }
        for effect in IndividualLedEffect::iter() {
            let label = <&'static str>::from(effect);
            let cmd = build_individual_effect_command(0, label, 0, 0, 0).expect("own label");
            assert_eq!(cmd.effect, effect);
        }
    }
}
