use std::collections::BTreeMap;

use crate::shot::{ShotModel, ShotType};

/// The fields the aggregations read from a shot
pub trait ShotRecord {
    fn made(&self) -> bool;
    fn shot_type(&self) -> ShotType;
    fn cup_hit(&self) -> Option<i32>;
}

impl ShotRecord for ShotModel {
    fn made(&self) -> bool {
        self.made
    }

    fn shot_type(&self) -> ShotType {
        self.shot_type
    }

    fn cup_hit(&self) -> Option<i32> {
        self.cup_hit
    }
}

impl<T: ShotRecord + ?Sized> ShotRecord for &T {
    fn made(&self) -> bool {
        (**self).made()
    }

    fn shot_type(&self) -> ShotType {
        (**self).shot_type()
    }

    fn cup_hit(&self) -> Option<i32> {
        (**self).cup_hit()
    }
}

/// `part` as a percentage (0-100) of `whole`; zero when `whole` is zero
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Percentage of shots that were made, regardless of type
pub fn shooting_pct<S: ShotRecord>(shots: &[S]) -> f64 {
    let made = shots.iter().filter(|s| s.made()).count();
    percentage(made, shots.len())
}

/// Percentage of all shots that were bounce shots
pub fn bounce_pct<S: ShotRecord>(shots: &[S]) -> f64 {
    let bounces = shots
        .iter()
        .filter(|s| s.shot_type() == ShotType::Bounce)
        .count();
    percentage(bounces, shots.len())
}

/// Number of shots per cup. Shots without a cup are skipped, so a cup with
/// no hits has no entry.
pub fn cup_hit_freq<S: ShotRecord>(shots: &[S]) -> BTreeMap<i32, u32> {
    let mut freq = BTreeMap::new();
    for cup in shots.iter().filter_map(|s| s.cup_hit()) {
        *freq.entry(cup).or_insert(0) += 1;
    }
    freq
}
