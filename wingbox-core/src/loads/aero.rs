//! Aerodynamic strip forces from the panel-method solver

use serde::{Deserialize, Serialize};

use crate::error::{WingboxError, WingboxResult};
use crate::geometry::WingboxLayout;
use crate::math::Pt3;

/// One spanwise strip as reported by the aerodynamic solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StripRow {
    /// Span position of the strip leading edge in m
    pub yle: f64,
    /// Strip chord in m
    pub chord: f64,
    /// Strip area in m²
    pub area: f64,
    pub cl: f64,
    pub cd: f64,
    /// Pitching moment coefficient about the quarter chord
    pub cm: f64,
}

/// Forces of one strip placed on the load line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationLoad {
    pub point: Pt3,
    /// Lift in N, along +Z
    pub lift: f64,
    /// Drag in N, along +X
    pub drag: f64,
    /// Pitching moment in N·m, about +Y
    pub moment: f64,
}

impl StripRow {
    /// `(lift, drag, moment)` at dynamic pressure `q` (Pa)
    pub fn forces(&self, q: f64) -> (f64, f64, f64) {
        let qs = q * self.area;
        (qs * self.cl, qs * self.cd, qs * self.chord * self.cm)
    }
}

/// Starboard strips of a case (`yle >= 0`), in the solver's order
pub fn starboard(strips: &[StripRow]) -> Vec<StripRow> {
    strips.iter().copied().filter(|s| s.yle >= 0.0).collect()
}

/// Resolve the starboard strips of one case into located loads.
///
/// Each load sits on the front-spar load line at the strip's span position.
pub fn strip_loads(strips: &[StripRow], q: f64, layout: &WingboxLayout) -> WingboxResult<Vec<StationLoad>> {
    if !(q > 0.0) {
        return Err(WingboxError::out_of_range("dynamic_pressure", format!("must be positive, got {}", q)));
    }
    starboard(strips)
        .into_iter()
        .map(|strip| {
            let (lift, drag, moment) = strip.forces(q);
            Ok(StationLoad {
                point: layout.load_point_at(strip.yle)?,
                lift,
                drag,
                moment,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_strip_forces() {
        let strip = StripRow { yle: 1.0, chord: 2.0, area: 0.5, cl: 0.8, cd: 0.02, cm: -0.05 };
        let (l, d, m) = strip.forces(1000.0);
        assert_relative_eq!(l, 400.0, epsilon = 1e-9);
        assert_relative_eq!(d, 10.0, epsilon = 1e-9);
        assert_relative_eq!(m, -50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_only_starboard_strips_kept() {
        let mk = |yle| StripRow { yle, chord: 1.0, area: 1.0, cl: 0.5, cd: 0.01, cm: 0.0 };
        let kept = starboard(&[mk(-2.0), mk(-0.5), mk(0.5), mk(2.0)]);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|s| s.yle > 0.0));
    }
}
