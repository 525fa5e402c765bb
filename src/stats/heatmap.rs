use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shot::CUP_LAYOUT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CupHeat {
    pub cup: i32,
    pub count: u32,
    /// count relative to the busiest cup, 0.0 to 1.0
    pub intensity: f64,
}

/// Cup-hit counts laid out on the rack, front row first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CupHeatMap {
    pub rows: Vec<Vec<CupHeat>>,
}

impl CupHeatMap {
    pub fn cup(&self, cup: i32) -> Option<&CupHeat> {
        self.rows.iter().flatten().find(|heat| heat.cup == cup)
    }
}

/// Scales every rack cup against the largest count in `freq` (at least 1).
/// The final-cup entry takes part in the scaling but has no rack position.
pub fn cup_heat_map(freq: &BTreeMap<i32, u32>) -> CupHeatMap {
    let max = freq.values().copied().max().unwrap_or(0).max(1);

    let rows: Vec<Vec<CupHeat>> = CUP_LAYOUT
        .iter()
        .map(|row| {
            row.iter()
                .map(|&cup| {
                    let count = freq.get(&cup).copied().unwrap_or(0);
                    CupHeat {
                        cup,
                        count,
                        intensity: (count as f64 / max as f64).clamp(0.0, 1.0),
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect();

    CupHeatMap { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frequency_gives_cold_rack() {
        let map = cup_heat_map(&BTreeMap::new());

        let sizes: Vec<usize> = map.rows.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 3, 2, 1]);
        assert!(map.rows.iter().flatten().all(|h| h.count == 0 && h.intensity == 0.0));
    }

    #[test]
    fn busiest_cup_is_fully_hot() {
        let freq = BTreeMap::from([(1, 4), (6, 2), (10, 1)]);
        let map = cup_heat_map(&freq);

        assert_eq!(map.cup(1).unwrap().intensity, 1.0);
        assert_eq!(map.cup(6).unwrap().intensity, 0.5);
        assert_eq!(map.cup(10).unwrap().intensity, 0.25);
        assert_eq!(map.cup(3).unwrap().count, 0);
        assert!(map.cup(11).is_none());
    }

    #[test]
    fn final_cup_counts_take_part_in_scaling() {
        let freq = BTreeMap::from([(2, 1), (11, 2)]);
        let map = cup_heat_map(&freq);

        assert_eq!(map.cup(2).unwrap().intensity, 0.5);
    }
}
