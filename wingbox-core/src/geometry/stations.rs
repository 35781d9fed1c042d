//! Spanwise station resolution
//!
//! The planform breakpoints, the airfoil stations and the structural
//! station lists are independent. [`StationInterpolator`] places every
//! tracked quantity on the merged, ordered set of stations.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{WingboxError, WingboxResult};
use crate::math::{bracket, lerp, same_station};

use super::planform::Planform;

/// Highest trailing-edge gap allowed for ribs and skin (fraction of chord)
pub const MAX_TE_GAP: f64 = 0.98;

/// How chord-relative fractions are carried between breakpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    /// Interpolate `fraction * taper` and divide by the local taper
    #[default]
    ChordScaled,
    /// Interpolate the raw fractions (biased when taper varies)
    Fractional,
}

/// Spar positions, rib counts and stringer counts of the wingbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralStations {
    /// Front spar chord fraction at each planform breakpoint
    pub front_spar: Vec<f64>,
    /// Rear spar chord fraction at each planform breakpoint
    pub rear_spar: Vec<f64>,
    /// Number of rib bays per section
    pub ribs: Vec<usize>,
    /// (top, bottom) stringer count per section
    pub stringers: Vec<[usize; 2]>,
    /// Chord fraction where the ribs stop short of the trailing edge
    pub rib_te_gap: f64,
    /// Chord fraction where the skin stops short of the trailing edge
    pub skin_te_gap: f64,
}

impl StructuralStations {
    pub fn validate_coherence(&self, planform: &Planform) -> WingboxResult<()> {
        let n = planform.n_sections();
        let checks = [
            ("front_spar", n + 1, self.front_spar.len()),
            ("rear_spar", n + 1, self.rear_spar.len()),
            ("ribs", n, self.ribs.len()),
            ("stringers", n, self.stringers.len()),
        ];
        for (quantity, expected, found) in checks {
            if expected != found {
                return Err(WingboxError::coherence(quantity, expected, found));
            }
        }
        Ok(())
    }

    pub fn validate_ranges(&self) -> WingboxResult<()> {
        for (field, values) in [("front_spar", &self.front_spar), ("rear_spar", &self.rear_spar)] {
            if let Some(i) = values.iter().position(|f| !(*f > 0.0 && *f < 1.0)) {
                return Err(WingboxError::out_of_range(
                    field,
                    format!("fraction {} at breakpoint {} is outside (0, 1)", values[i], i),
                ));
            }
        }
        for (i, (front, rear)) in self.front_spar.iter().zip(&self.rear_spar).enumerate() {
            if front >= rear {
                return Err(WingboxError::out_of_range(
                    "spars",
                    format!(
                        "front spar ({}) must lie ahead of rear spar ({}) at breakpoint {}",
                        front, rear, i
                    ),
                ));
            }
        }
        if let Some(i) = self.ribs.iter().position(|n| *n == 0) {
            return Err(WingboxError::out_of_range(
                "ribs",
                format!("section {} needs at least one rib bay", i),
            ));
        }

        let rearmost = self.rear_spar.iter().copied().fold(f64::MIN, f64::max);
        for (field, gap) in [("rib_te_gap", self.rib_te_gap), ("skin_te_gap", self.skin_te_gap)] {
            if gap < rearmost || gap > MAX_TE_GAP {
                return Err(WingboxError::out_of_range(
                    field,
                    format!("{} must lie between the rear spar ({}) and {}", gap, rearmost, MAX_TE_GAP),
                ));
            }
        }
        Ok(())
    }

    /// Absolute span position of every rib, root first, tip last
    pub fn rib_stations(&self, planform: &Planform) -> Vec<f64> {
        let mut stations = Vec::with_capacity(self.ribs.iter().sum::<usize>() + 1);
        for (i, &n) in self.ribs.iter().enumerate() {
            let start = planform.spans[i];
            let pitch = (planform.spans[i + 1] - start) / n as f64;
            stations.extend((0..n).map(|k| start + pitch * k as f64));
        }
        stations.push(planform.semispan());
        stations
    }
}

/// Chord-arc fractions dividing a surface between the spars into `n + 1` bays
pub fn stringer_divisions(n: usize) -> Vec<f64> {
    (1..=n).map(|k| k as f64 / (n + 1) as f64).collect()
}

/// Resolves quantities defined at the planform breakpoints onto any other
/// fractional span station.
#[derive(Debug, Clone)]
pub struct StationInterpolator {
    breakpoints: Vec<f64>,
    tapers: Vec<f64>,
    mode: InterpolationMode,
}

impl StationInterpolator {
    /// `breakpoints` are fractional spans (ascending, 0 to 1), `tapers` the
    /// local chord ratio at each of them.
    pub fn new(breakpoints: Vec<f64>, tapers: Vec<f64>) -> WingboxResult<Self> {
        if tapers.len() != breakpoints.len() {
            return Err(WingboxError::coherence("tapers", breakpoints.len(), tapers.len()));
        }
        if breakpoints.len() < 2 {
            return Err(WingboxError::out_of_range(
                "spans",
                "at least two breakpoints are needed to interpolate",
            ));
        }
        Ok(Self {
            breakpoints,
            tapers,
            mode: InterpolationMode::default(),
        })
    }

    pub fn from_planform(planform: &Planform) -> WingboxResult<Self> {
        Self::new(planform.fractional_spans(), planform.tapers.clone())
    }

    pub fn with_mode(mut self, mode: InterpolationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// Union of the breakpoints and `extra`, sorted, duplicates dropped.
    ///
    /// Every extra station must lie inside the breakpoint range.
    pub fn merged(&self, extra: &[f64]) -> WingboxResult<Vec<f64>> {
        let mut merged = self.breakpoints.clone();
        for &s in extra {
            self.check_range(s)?;
            if merged.iter().any(|&m| same_station(m, s)) {
                continue;
            }
            let at = merged.partition_point(|&m| m < s);
            merged.insert(at, s);
        }
        Ok(merged)
    }

    /// Local taper ratio at station `s`
    pub fn taper_at(&self, s: f64) -> WingboxResult<f64> {
        self.linear("tapers", &self.tapers, s)
    }

    /// Plain linear interpolation of a per-breakpoint quantity
    pub fn value_at(&self, quantity: &str, values: &[f64], s: f64) -> WingboxResult<f64> {
        self.linear(quantity, values, s)
    }

    /// Chord fraction at station `s` for a per-breakpoint fraction list,
    /// following the configured [`InterpolationMode`]
    pub fn fraction_at(&self, quantity: &str, fractions: &[f64], s: f64) -> WingboxResult<f64> {
        match self.mode {
            InterpolationMode::Fractional => self.linear(quantity, fractions, s),
            InterpolationMode::ChordScaled => {
                self.check_len(quantity, fractions)?;
                let absolute: Vec<f64> = fractions
                    .iter()
                    .zip(&self.tapers)
                    .map(|(f, t)| f * t)
                    .collect();
                let abs = self.linear(quantity, &absolute, s)?;
                Ok(abs / self.taper_at(s)?)
            }
        }
    }

    /// Chord fraction at every station of `merged(extra)`.
    ///
    /// Stations are visited in ascending order; breakpoints keep their given
    /// value, the others are interpolated between the bracketing breakpoints.
    pub fn resolve_fractions(
        &self,
        quantity: &str,
        fractions: &[f64],
        extra: &[f64],
    ) -> WingboxResult<Vec<(f64, f64)>> {
        self.check_len(quantity, fractions)?;
        let merged = self.merged(extra)?;
        merged
            .into_iter()
            .map(|s| {
                let value = match self.breakpoints.iter().position(|&b| same_station(b, s)) {
                    Some(i) => fractions[i],
                    None => {
                        let v = self.fraction_at(quantity, fractions, s)?;
                        debug!("{} at station {:.4}: {:.6} ({:?})", quantity, s, v, self.mode);
                        v
                    }
                };
                Ok((s, value))
            })
            .collect()
    }

    fn linear(&self, quantity: &str, values: &[f64], s: f64) -> WingboxResult<f64> {
        self.check_len(quantity, values)?;
        let i = self.check_range(s)?;
        let (s0, s1) = (self.breakpoints[i], self.breakpoints[i + 1]);
        let t = ((s - s0) / (s1 - s0)).clamp(0.0, 1.0);
        Ok(lerp(values[i], values[i + 1], t))
    }

    fn check_len(&self, quantity: &str, values: &[f64]) -> WingboxResult<()> {
        if values.len() != self.breakpoints.len() {
            return Err(WingboxError::coherence(quantity, self.breakpoints.len(), values.len()));
        }
        Ok(())
    }

    fn check_range(&self, s: f64) -> WingboxResult<usize> {
        bracket(&self.breakpoints, s).ok_or_else(|| {
            let last = self.breakpoints[self.breakpoints.len() - 1];
            WingboxError::out_of_range(
                "station",
                format!("{} is outside [{}, {}]", s, self.breakpoints[0], last),
            )
        })
    }
}
