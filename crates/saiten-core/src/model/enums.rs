use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr, IntoStaticStr};

/// The games this instance tracks scores for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Game {
    Iidx,
    Sdvx,
    Bms,
}

/// Game variant a score was played under. Which playtypes are valid for a
/// game is decided by the [`GameRegistry`](crate::games::GameRegistry).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
pub enum Playtype {
    #[serde(rename = "SP")]
    #[strum(serialize = "SP")]
    Single,
    #[serde(rename = "DP")]
    #[strum(serialize = "DP")]
    Double,
    #[serde(rename = "7K")]
    #[strum(serialize = "7K")]
    Seven,
    #[serde(rename = "14K")]
    #[strum(serialize = "14K")]
    Fourteen,
}

/// Clear-quality category for one play. Ordering is by quality, worst first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromRepr,
    IntoStaticStr,
    Display,
)]
#[repr(u8)]
pub enum Lamp {
    #[default]
    #[strum(serialize = "FAILED")]
    Failed = 0,
    #[strum(serialize = "ASSIST CLEAR")]
    AssistClear = 1,
    #[strum(serialize = "EASY CLEAR")]
    EasyClear = 2,
    #[strum(serialize = "CLEAR")]
    Clear = 3,
    #[strum(serialize = "HARD CLEAR")]
    HardClear = 4,
    #[strum(serialize = "EX HARD CLEAR")]
    ExHardClear = 5,
    #[strum(serialize = "FULL COMBO")]
    FullCombo = 6,
    #[strum(serialize = "PERFECT")]
    Perfect = 7,
}

impl Lamp {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }
}

/// Grade bucket for one play, derived from the score ratio.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromRepr,
    IntoStaticStr,
    Display,
)]
#[repr(u8)]
pub enum Grade {
    #[default]
    F = 0,
    E = 1,
    D = 2,
    C = 3,
    B = 4,
    A = 5,
    #[strum(serialize = "AA")]
    Aa = 6,
    #[strum(serialize = "AAA")]
    Aaa = 7,
}

impl Grade {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn from_percent(percent: f64) -> Self {
        if percent >= 8.0 / 9.0 * 100.0 {
            Self::Aaa
        } else if percent >= 7.0 / 9.0 * 100.0 {
            Self::Aa
        } else if percent >= 6.0 / 9.0 * 100.0 {
            Self::A
        } else if percent >= 5.0 / 9.0 * 100.0 {
            Self::B
        } else if percent >= 4.0 / 9.0 * 100.0 {
            Self::C
        } else if percent >= 3.0 / 9.0 * 100.0 {
            Self::D
        } else if percent >= 2.0 / 9.0 * 100.0 {
            Self::E
        } else {
            Self::F
        }
    }
}

/// A tracked metric on score data. Goal criteria and chart rankings pick
/// one of these; categorical metrics compare by bucket index.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Metric {
    Score,
    Percent,
    Lamp,
    Grade,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lamp_ordering() {
        assert!(Lamp::Perfect > Lamp::FullCombo);
        assert!(Lamp::FullCombo > Lamp::ExHardClear);
        assert!(Lamp::Failed < Lamp::Clear);
    }

    #[test]
    fn test_grade_from_percent() {
        assert_eq!(Grade::from_percent(100.0), Grade::Aaa);
        assert_eq!(Grade::from_percent(8.0 / 9.0 * 100.0), Grade::Aaa);
        assert_eq!(Grade::from_percent(80.0), Grade::Aa);
        assert_eq!(Grade::from_percent(50.0), Grade::C);
        assert_eq!(Grade::from_percent(5.0), Grade::F);
    }

    #[test]
    fn test_playtype_wire_names() {
        assert_eq!(serde_json::to_string(&Playtype::Single).unwrap(), "\"SP\"");
        assert_eq!(serde_json::to_string(&Playtype::Seven).unwrap(), "\"7K\"");
        assert_eq!(Playtype::Double.to_string(), "DP");
    }

    #[test]
    fn test_game_wire_names() {
        assert_eq!(serde_json::to_string(&Game::Iidx).unwrap(), "\"iidx\"");
        assert_eq!(Game::Bms.to_string(), "bms");
    }
}
