use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;

/// Cup value recorded for every final-cup attempt
pub const FINAL_CUP: i32 = 11;

/// Rack layout, front row first: 4-3-2-1
pub const CUP_LAYOUT: [&[i32]; 4] = [&[1, 2, 3, 4], &[5, 6, 7], &[8, 9], &[10]];

const RACK_CUPS: std::ops::RangeInclusive<i32> = 1..=10;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShotType {
    Throw,
    Bounce,
    LastCup,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShotError {
    #[error("A made shot must name the cup it hit")]
    CupRequired,

    #[error("Cup {0} is not on the rack (expected 1-10)")]
    CupOutOfRange(i32),
}

/// Database model for the shots table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotModel {
    pub id: String,
    pub player_id: String,
    pub game_id: String,
    pub made: bool,
    pub cup_hit: Option<i32>,
    #[serde(rename = "type")]
    pub shot_type: ShotType,
    pub timestamp: DateTime<Utc>,
}

/// A shot ready to be written; the store assigns the id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewShot {
    pub player_id: String,
    pub game_id: String,
    pub made: bool,
    pub cup_hit: Option<i32>,
    #[serde(rename = "type")]
    pub shot_type: ShotType,
    pub timestamp: DateTime<Utc>,
}

impl NewShot {
    pub fn into_model(self, id: String) -> ShotModel {
        ShotModel {
            id,
            player_id: self.player_id,
            game_id: self.game_id,
            made: self.made,
            cup_hit: self.cup_hit,
            shot_type: self.shot_type,
            timestamp: self.timestamp,
        }
    }
}

/// What the shot form submits: the kind of shot, whether it went in and,
/// for made rack shots, which cup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotDraft {
    #[serde(rename = "type")]
    pub shot_type: ShotType,
    pub made: bool,
    #[serde(default)]
    pub cup: Option<i32>,
}

impl ShotDraft {
    pub fn new(shot_type: ShotType, made: bool, cup: Option<i32>) -> Self {
        Self {
            shot_type,
            made,
            cup,
        }
    }

    /// Cup value to record for this draft.
    ///
    /// Final-cup attempts always record `FINAL_CUP`, made or not. Missed rack
    /// shots record nothing and any submitted cup is discarded.
    pub fn cup_hit(&self) -> Result<Option<i32>, ShotError> {
        match (self.shot_type, self.made) {
            (ShotType::LastCup, _) => Ok(Some(FINAL_CUP)),
            (_, false) => Ok(None),
            (_, true) => match self.cup {
                Some(cup) if RACK_CUPS.contains(&cup) => Ok(Some(cup)),
                Some(cup) => Err(ShotError::CupOutOfRange(cup)),
                None => Err(ShotError::CupRequired),
            },
        }
    }

    pub fn into_new_shot(
        self,
        player_id: &str,
        game_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<NewShot, ShotError> {
        let cup_hit = self.cup_hit()?;
        Ok(NewShot {
            player_id: player_id.to_string(),
            game_id: game_id.to_string(),
            made: self.made,
            cup_hit,
            shot_type: self.shot_type,
            timestamp,
        })
    }
}
