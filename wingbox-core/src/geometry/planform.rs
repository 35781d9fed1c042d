//! Wing planform - span breakpoints and the per-section shape parameters

use serde::{Deserialize, Serialize};

use crate::error::{WingboxError, WingboxResult};
use crate::math::{bracket, lerp, Pt3, Vec3};

/// Sweep, dihedral and twist must stay inside this band (degrees)
pub const MAX_ANGLE_DEG: f64 = 85.0;

/// Semi-span planform made of straight tapered sections.
///
/// `spans`, `tapers` and `twists` hold one value per breakpoint (the first
/// breakpoint is the root at span 0). `sweeps` and `dihedrals` hold one value
/// per section. Tapers are relative to `root_chord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planform {
    /// Root chord in m
    pub root_chord: f64,
    /// Breakpoint span positions in m, measured from the root
    pub spans: Vec<f64>,
    /// Local chord / root chord at each breakpoint
    pub tapers: Vec<f64>,
    /// Leading-edge sweep per section in degrees
    pub sweeps: Vec<f64>,
    /// Dihedral per section in degrees
    pub dihedrals: Vec<f64>,
    /// Twist at each breakpoint in degrees (includes root incidence)
    pub twists: Vec<f64>,
}

/// Straight chord line of one spanwise station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChordLine {
    pub leading: Pt3,
    pub trailing: Pt3,
}

impl ChordLine {
    pub fn length(&self) -> f64 {
        (self.trailing - self.leading).norm()
    }

    /// Unit vector from leading to trailing edge
    pub fn direction(&self) -> Vec3 {
        (self.trailing - self.leading).normalize()
    }

    /// Unit vector normal to the chord, pointing to the upper surface
    pub fn normal(&self) -> Vec3 {
        let d = self.direction();
        Vec3::new(-d.z, 0.0, d.x).normalize()
    }

    /// Point on the chord at `fraction` of its length
    pub fn point_at(&self, fraction: f64) -> Pt3 {
        self.leading + (self.trailing - self.leading) * fraction
    }

    /// Point at chord `fraction` offset by `ordinate` (in chords) along the normal
    pub fn surface_point(&self, fraction: f64, ordinate: f64) -> Pt3 {
        self.point_at(fraction) + self.normal() * (ordinate * self.length())
    }
}

impl Planform {
    pub fn n_sections(&self) -> usize {
        self.spans.len().saturating_sub(1)
    }

    pub fn semispan(&self) -> f64 {
        self.spans.last().copied().unwrap_or(0.0)
    }

    /// Breakpoints as fractions of the semi-span
    pub fn fractional_spans(&self) -> Vec<f64> {
        let b = self.semispan();
        self.spans.iter().map(|s| s / b).collect()
    }

    /// Local chord at breakpoint `i` in m
    pub fn chord(&self, i: usize) -> f64 {
        self.root_chord * self.tapers[i]
    }

    /// Check that every per-breakpoint and per-section list matches the
    /// number of sections implied by `spans`
    pub fn validate_coherence(&self) -> WingboxResult<()> {
        if self.spans.len() < 2 {
            return Err(WingboxError::out_of_range(
                "spans",
                "at least a root and a tip breakpoint are required",
            ));
        }
        let n = self.n_sections();
        let checks = [
            ("tapers", n + 1, self.tapers.len()),
            ("sweeps", n, self.sweeps.len()),
            ("dihedrals", n, self.dihedrals.len()),
            ("twists", n + 1, self.twists.len()),
        ];
        for (quantity, expected, found) in checks {
            if expected != found {
                return Err(WingboxError::coherence(quantity, expected, found));
            }
        }
        Ok(())
    }

    /// Check values: positive chord and tapers, ascending spans starting at
    /// zero, angles inside [-85, 85] degrees
    pub fn validate_ranges(&self) -> WingboxResult<()> {
        if !(self.root_chord > 0.0 && self.root_chord.is_finite()) {
            return Err(WingboxError::out_of_range(
                "root_chord",
                format!("must be positive, got {}", self.root_chord),
            ));
        }
        if self.spans[0] != 0.0 {
            return Err(WingboxError::out_of_range(
                "spans",
                "the first breakpoint must be the root at span 0",
            ));
        }
        for i in 1..self.spans.len() {
            if !(self.spans[i] > self.spans[i - 1] && self.spans[i].is_finite()) {
                return Err(WingboxError::out_of_range(
                    "spans",
                    format!("breakpoints must be strictly ascending, check breakpoint {}", i),
                ));
            }
        }
        for (i, taper) in self.tapers.iter().enumerate() {
            if !(*taper > 0.0 && taper.is_finite()) {
                return Err(WingboxError::out_of_range(
                    "tapers",
                    format!("taper must be positive, check breakpoint {}", i),
                ));
            }
        }
        let angles = [
            ("sweeps", &self.sweeps),
            ("dihedrals", &self.dihedrals),
            ("twists", &self.twists),
        ];
        for (field, values) in angles {
            // NaN fails the bound as well
            if let Some(i) = values.iter().position(|a| !(a.abs() <= MAX_ANGLE_DEG)) {
                return Err(WingboxError::out_of_range(
                    field,
                    format!(
                        "{} deg at index {} is outside [-{MAX_ANGLE_DEG}, {MAX_ANGLE_DEG}]",
                        values[i], i
                    ),
                ));
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> WingboxResult<()> {
        self.validate_coherence()?;
        self.validate_ranges()
    }

    /// Reference area of the mirrored wing (both halves) in m²
    pub fn reference_area(&self) -> f64 {
        (0..self.n_sections())
            .map(|i| {
                let b = self.spans[i + 1] - self.spans[i];
                (self.chord(i) + self.chord(i + 1)) * b
            })
            .sum()
    }

    /// Mean aerodynamic chord in m
    pub fn mean_aerodynamic_chord(&self) -> f64 {
        let s = self.reference_area();
        let integral: f64 = (0..self.n_sections())
            .map(|i| {
                let b = self.spans[i + 1] - self.spans[i];
                let cr = self.chord(i);
                let taper = self.tapers[i + 1] / self.tapers[i];
                b / 3.0 * cr * cr * (taper * taper + taper + 1.0)
            })
            .sum();
        2.0 / s * integral
    }

    /// Chord line at every breakpoint, root first.
    ///
    /// Each section starts at an origin advanced by sweep and dihedral from
    /// the previous one; the chord is rotated about its quarter point by the
    /// local twist.
    pub fn chord_lines(&self) -> Vec<ChordLine> {
        let mut lines = Vec::with_capacity(self.spans.len());
        let mut origin = Pt3::origin();
        for j in 0..self.spans.len() {
            let c = self.chord(j);
            let theta = self.twists[j].to_radians();
            let leading = origin
                + Vec3::new(0.25 * c * (1.0 - theta.cos()), 0.0, 0.25 * c * theta.sin());
            let trailing = origin
                + Vec3::new(c - 0.75 * c * (1.0 - theta.cos()), 0.0, -0.75 * c * theta.sin());
            lines.push(ChordLine { leading, trailing });

            if j < self.n_sections() {
                let b = self.spans[j + 1] - self.spans[j];
                origin += Vec3::new(
                    b * self.sweeps[j].to_radians().tan(),
                    b,
                    b * self.dihedrals[j].to_radians().tan(),
                );
            }
        }
        lines
    }

    /// Chord line at an arbitrary span fraction, linear between breakpoints
    pub fn chord_line_at(&self, fraction: f64) -> WingboxResult<ChordLine> {
        let fracs = self.fractional_spans();
        let i = bracket(&fracs, fraction).ok_or_else(|| {
            WingboxError::out_of_range("station", format!("{} is outside [0, 1]", fraction))
        })?;
        let lines = self.chord_lines();
        let t = (fraction - fracs[i]) / (fracs[i + 1] - fracs[i]);
        let blend = |a: &Pt3, b: &Pt3| {
            Pt3::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t), lerp(a.z, b.z, t))
        };
        Ok(ChordLine {
            leading: blend(&lines[i].leading, &lines[i + 1].leading),
            trailing: blend(&lines[i].trailing, &lines[i + 1].trailing),
        })
    }
}
