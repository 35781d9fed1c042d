//! Airfoil identifiers, analytic NACA sections and CST shape coefficients

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{WingboxError, WingboxResult};
use crate::math::{binomial, cosine_spacing, linspace};

/// Bernstein order of the CST fit (order + 1 coefficients per surface)
pub const CST_ORDER: usize = 7;

/// Points per surface when a section is discretized
pub const SURFACE_SAMPLES: usize = 40;

/// Mean-line constants for the standard 5-digit series 210 to 250:
/// (position of maximum camber, k1) at a design lift coefficient of 0.3
const NACA5_MEAN_LINES: [(f64, f64); 5] = [
    (0.0580, 361.4),
    (0.1260, 51.64),
    (0.2025, 15.957),
    (0.2900, 6.643),
    (0.3910, 3.230),
];

/// How an airfoil is identified in the station set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum AirfoilId {
    Naca4(String),
    Naca5(String),
    /// Any non-numeric identifier, resolved through an [`AirfoilCatalog`]
    Named(String),
}

impl AirfoilId {
    /// Numeric codes of 4 or 5 digits (with or without a `NACA` prefix)
    /// are analytic sections, everything else is a catalog name.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let code = trimmed
            .strip_prefix("NACA")
            .or_else(|| trimmed.strip_prefix("naca"))
            .unwrap_or(trimmed)
            .trim();
        if code.chars().all(|c| c.is_ascii_digit()) {
            match code.len() {
                4 => return AirfoilId::Naca4(code.to_string()),
                5 => return AirfoilId::Naca5(code.to_string()),
                _ => {}
            }
        }
        AirfoilId::Named(trimmed.to_string())
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, AirfoilId::Named(_))
    }

    /// Resolve the identifier to a shape. Catalog names must be present.
    pub fn shape(&self, catalog: &AirfoilCatalog) -> WingboxResult<AirfoilShape> {
        match self {
            AirfoilId::Naca4(code) => Ok(AirfoilShape::Cst(naca4(code)?)),
            AirfoilId::Naca5(code) => Ok(AirfoilShape::Cst(naca5(code)?)),
            AirfoilId::Named(name) => catalog
                .get(name)
                .map(|curve| AirfoilShape::Catalog {
                    name: name.clone(),
                    curve: curve.clone(),
                })
                .ok_or_else(|| WingboxError::AirfoilNotFound(name.clone())),
        }
    }
}

impl From<String> for AirfoilId {
    fn from(raw: String) -> Self {
        AirfoilId::parse(&raw)
    }
}

impl From<AirfoilId> for String {
    fn from(id: AirfoilId) -> Self {
        match id {
            AirfoilId::Naca4(code) | AirfoilId::Naca5(code) | AirfoilId::Named(code) => code,
        }
    }
}

impl std::fmt::Display for AirfoilId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AirfoilId::Naca4(code) | AirfoilId::Naca5(code) => write!(f, "NACA {}", code),
            AirfoilId::Named(name) => f.write_str(name),
        }
    }
}

/// Discretized unit-chord section; both surfaces run leading to trailing edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirfoilCurve {
    pub upper: Vec<[f64; 2]>,
    pub lower: Vec<[f64; 2]>,
}

impl AirfoilCurve {
    /// Split a Selig-ordered point list (upper trailing edge, round the
    /// nose, lower trailing edge) at its leading edge.
    pub fn from_selig(points: &[[f64; 2]]) -> WingboxResult<Self> {
        if points.len() < 3 {
            return Err(WingboxError::InvalidInput(format!(
                "airfoil point list needs at least 3 points, got {}",
                points.len()
            )));
        }
        let le = points
            .iter()
            .enumerate()
            .min_by(|a, b| a.1[0].total_cmp(&b.1[0]))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let mut upper: Vec<[f64; 2]> = points[..=le].to_vec();
        upper.reverse();
        let lower = points[le..].to_vec();
        Ok(Self { upper, lower })
    }

    /// Closed outline: lower surface trailing edge to nose, then upper
    /// surface back to the trailing edge
    pub fn outline(&self) -> Vec<[f64; 2]> {
        let mut points: Vec<[f64; 2]> = self.lower.iter().rev().copied().collect();
        points.extend(self.upper.iter().skip(1).copied());
        points
    }

    /// Upper and lower ordinates at chord fraction `x`
    pub fn ordinates_at(&self, x: f64) -> (f64, f64) {
        (surface_at(&self.upper, x), surface_at(&self.lower, x))
    }
}

fn surface_at(surface: &[[f64; 2]], x: f64) -> f64 {
    let xs: Vec<f64> = surface.iter().map(|p| p[0]).collect();
    let idx = xs.partition_point(|&v| v <= x);
    if idx == 0 {
        return surface.first().map(|p| p[1]).unwrap_or(0.0);
    }
    if idx >= surface.len() {
        return surface.last().map(|p| p[1]).unwrap_or(0.0);
    }
    let (a, b) = (surface[idx - 1], surface[idx]);
    let span = b[0] - a[0];
    if span.abs() < f64::EPSILON {
        return a[1];
    }
    a[1] + (b[1] - a[1]) * (x - a[0]) / span
}

/// Kulfan class/shape coefficients of one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CstCoefficients {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    /// Trailing-edge thickness in chords (split evenly between surfaces)
    pub te_thickness: f64,
}

impl CstCoefficients {
    /// Least-squares fit of both surfaces
    pub fn fit(upper: &[[f64; 2]], lower: &[[f64; 2]], order: usize) -> WingboxResult<Self> {
        let te_thickness = match (upper.last(), lower.last()) {
            (Some(u), Some(l)) => (u[1] - l[1]).max(0.0),
            _ => 0.0,
        };
        Ok(Self {
            upper: fit_surface(upper, order, 0.5 * te_thickness)?,
            lower: fit_surface(lower, order, -0.5 * te_thickness)?,
            te_thickness,
        })
    }

    /// Coefficient-wise `self * (1 - w) + other * w`
    pub fn blend(&self, other: &CstCoefficients, w: f64) -> WingboxResult<Self> {
        if self.upper.len() != other.upper.len() || self.lower.len() != other.lower.len() {
            return Err(WingboxError::coherence(
                "cst_coefficients",
                self.upper.len(),
                other.upper.len(),
            ));
        }
        let mix = |a: &[f64], b: &[f64]| -> Vec<f64> {
            a.iter().zip(b).map(|(x, y)| x * (1.0 - w) + y * w).collect()
        };
        Ok(Self {
            upper: mix(&self.upper, &other.upper),
            lower: mix(&self.lower, &other.lower),
            te_thickness: self.te_thickness * (1.0 - w) + other.te_thickness * w,
        })
    }

    pub fn upper_at(&self, x: f64) -> f64 {
        cst_ordinate(&self.upper, x, 0.5 * self.te_thickness)
    }

    pub fn lower_at(&self, x: f64) -> f64 {
        cst_ordinate(&self.lower, x, -0.5 * self.te_thickness)
    }

    /// Evaluate both surfaces at `n` evenly spaced chord stations
    pub fn curve(&self, n: usize) -> AirfoilCurve {
        let xs = linspace(0.0, 1.0, n);
        AirfoilCurve {
            upper: xs.iter().map(|&x| [x, self.upper_at(x)]).collect(),
            lower: xs.iter().map(|&x| [x, self.lower_at(x)]).collect(),
        }
    }
}

fn class_function(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    x.sqrt() * (1.0 - x)
}

fn bernstein(order: usize, i: usize, x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    binomial(order, i) * x.powi(i as i32) * (1.0 - x).powi((order - i) as i32)
}

fn cst_ordinate(coefficients: &[f64], x: f64, te_half: f64) -> f64 {
    let order = coefficients.len().saturating_sub(1);
    let shape: f64 = coefficients
        .iter()
        .enumerate()
        .map(|(i, a)| a * bernstein(order, i, x))
        .sum();
    class_function(x) * shape + x.clamp(0.0, 1.0) * te_half
}

fn fit_surface(points: &[[f64; 2]], order: usize, te_half: f64) -> WingboxResult<Vec<f64>> {
    let n = order + 1;
    if points.len() < n {
        return Err(WingboxError::InvalidInput(format!(
            "{} points cannot determine {} shape coefficients",
            points.len(),
            n
        )));
    }
    let a = DMatrix::from_fn(points.len(), n, |row, col| {
        let x = points[row][0];
        class_function(x) * bernstein(order, col, x)
    });
    let b = DVector::from_iterator(
        points.len(),
        points.iter().map(|p| p[1] - p[0].clamp(0.0, 1.0) * te_half),
    );
    let solution = a
        .svd(true, true)
        .solve(&b, 1e-12)
        .map_err(|e| WingboxError::InvalidInput(format!("shape fit failed: {}", e)))?;
    Ok(solution.iter().copied().collect())
}

fn digit(code: &str, i: usize) -> f64 {
    code.chars()
        .nth(i)
        .and_then(|c| c.to_digit(10))
        .map(f64::from)
        .unwrap_or(0.0)
}

/// Half thickness of the symmetric NACA section, closed trailing edge
fn naca_thickness(t: f64, x: f64) -> f64 {
    5.0 * t * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x.powi(2) + 0.2843 * x.powi(3)
        - 0.1036 * x.powi(4))
}

/// Wrap a thickness distribution round a mean line and fit the result
fn naca_sections(t: f64, mean_line: impl Fn(f64) -> (f64, f64)) -> WingboxResult<CstCoefficients> {
    let xs = cosine_spacing(SURFACE_SAMPLES * 2);
    let mut upper = Vec::with_capacity(xs.len());
    let mut lower = Vec::with_capacity(xs.len());
    for x in xs {
        let yt = naca_thickness(t, x);
        let (yc, slope) = mean_line(x);
        let theta = slope.atan();
        upper.push([x - yt * theta.sin(), yc + yt * theta.cos()]);
        lower.push([x + yt * theta.sin(), yc - yt * theta.cos()]);
    }
    CstCoefficients::fit(&upper, &lower, CST_ORDER)
}

/// NACA 4-digit section `MPTT`
pub fn naca4(code: &str) -> WingboxResult<CstCoefficients> {
    let m = digit(code, 0) / 100.0;
    let p = digit(code, 1) / 10.0;
    let t = (digit(code, 2) * 10.0 + digit(code, 3)) / 100.0;
    if t <= 0.0 {
        return Err(WingboxError::out_of_range("airfoil", format!("NACA {} has zero thickness", code)));
    }
    if m > 0.0 && p == 0.0 {
        return Err(WingboxError::out_of_range(
            "airfoil",
            format!("NACA {}: cambered section needs a camber position digit", code),
        ));
    }
    naca_sections(t, |x| {
        if m == 0.0 {
            (0.0, 0.0)
        } else if x < p {
            (m / (p * p) * (2.0 * p * x - x * x), 2.0 * m / (p * p) * (p - x))
        } else {
            let q = (1.0 - p) * (1.0 - p);
            (m / q * ((1.0 - 2.0 * p) + 2.0 * p * x - x * x), 2.0 * m / q * (p - x))
        }
    })
}

/// NACA 5-digit section `LPSTT` with a standard (non-reflexed) mean line
pub fn naca5(code: &str) -> WingboxResult<CstCoefficients> {
    let design_cl = digit(code, 0) * 0.15;
    let position = digit(code, 1) as usize;
    let reflex = digit(code, 2);
    let t = (digit(code, 3) * 10.0 + digit(code, 4)) / 100.0;

    if reflex != 0.0 {
        return Err(WingboxError::out_of_range(
            "airfoil",
            format!("NACA {}: reflexed mean lines are not supported", code),
        ));
    }
    let (r, k1) = position
        .checked_sub(1)
        .and_then(|i| NACA5_MEAN_LINES.get(i))
        .copied()
        .ok_or_else(|| {
            WingboxError::out_of_range(
                "airfoil",
                format!("NACA {}: camber position digit must be 1 to 5", code),
            )
        })?;
    if t <= 0.0 {
        return Err(WingboxError::out_of_range("airfoil", format!("NACA {} has zero thickness", code)));
    }
    let scale = design_cl / 0.3;
    naca_sections(t, move |x| {
        if x < r {
            (
                scale * k1 / 6.0 * (x.powi(3) - 3.0 * r * x * x + r * r * (3.0 - r) * x),
                scale * k1 / 6.0 * (3.0 * x * x - 6.0 * r * x + r * r * (3.0 - r)),
            )
        } else {
            (scale * k1 * r.powi(3) / 6.0 * (1.0 - x), -scale * k1 * r.powi(3) / 6.0)
        }
    })
}

/// A resolved section: either analytic coefficients or a catalog curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AirfoilShape {
    Cst(CstCoefficients),
    Catalog { name: String, curve: AirfoilCurve },
}

impl AirfoilShape {
    pub fn curve(&self, n: usize) -> AirfoilCurve {
        match self {
            AirfoilShape::Cst(cst) => cst.curve(n),
            AirfoilShape::Catalog { curve, .. } => curve.clone(),
        }
    }

    /// Upper and lower ordinates at chord fraction `x`
    pub fn ordinates_at(&self, x: f64) -> (f64, f64) {
        match self {
            AirfoilShape::Cst(cst) => (cst.upper_at(x), cst.lower_at(x)),
            AirfoilShape::Catalog { curve, .. } => curve.ordinates_at(x),
        }
    }
}

/// Named sections supplied by the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AirfoilCatalog {
    entries: HashMap<String, AirfoilCurve>,
}

impl AirfoilCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, curve: AirfoilCurve) {
        self.entries.insert(name.to_string(), curve);
    }

    pub fn insert_selig(&mut self, name: &str, points: &[[f64; 2]]) -> WingboxResult<()> {
        self.insert(name, AirfoilCurve::from_selig(points)?);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&AirfoilCurve> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_identifiers() {
        assert_eq!(AirfoilId::parse("2412"), AirfoilId::Naca4("2412".into()));
        assert_eq!(AirfoilId::parse("NACA 23012"), AirfoilId::Naca5("23012".into()));
        assert_eq!(AirfoilId::parse("rae2822"), AirfoilId::Named("rae2822".into()));
        assert_eq!(AirfoilId::parse("241"), AirfoilId::Named("241".into()));
    }

    #[test]
    fn test_naca0012_is_symmetric() {
        let cst = naca4("0012").unwrap();
        assert_eq!(cst.upper.len(), CST_ORDER + 1);
        assert_relative_eq!(cst.upper_at(0.3), 0.0600, epsilon = 1e-3);
        assert_relative_eq!(cst.upper_at(0.3), -cst.lower_at(0.3), epsilon = 1e-9);
        assert_relative_eq!(cst.upper_at(1.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cambered_sections_lift_the_upper_surface() {
        let cst = naca4("2412").unwrap();
        assert!(cst.upper_at(0.4) > -cst.lower_at(0.4));

        let cst = naca5("23012").unwrap();
        assert!(cst.upper_at(0.2) > -cst.lower_at(0.2));
    }

    #[test]
    fn test_four_digit_codes_checked() {
        assert!(naca4("2012").is_err());
        assert!(naca4("0000").is_err());
        assert!(naca4("0412").is_ok());
    }

    #[test]
    fn test_reflexed_five_digit_rejected() {
        assert!(naca5("23112").is_err());
        assert!(naca5("26012").is_err());
    }

    #[test]
    fn test_blend_halfway() {
        let thin = naca4("0008").unwrap();
        let thick = naca4("0016").unwrap();
        let mid = thin.blend(&thick, 0.5).unwrap();
        let expected = 0.5 * (thin.upper_at(0.3) + thick.upper_at(0.3));
        assert_relative_eq!(mid.upper_at(0.3), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_catalog_lookup() {
        let mut catalog = AirfoilCatalog::new();
        catalog
            .insert_selig(
                "wedge",
                &[[1.0, 0.0], [0.5, 0.05], [0.0, 0.0], [0.5, -0.05], [1.0, 0.0]],
            )
            .unwrap();
        let shape = AirfoilId::parse("wedge").shape(&catalog).unwrap();
        let (up, low) = shape.ordinates_at(0.25);
        assert_relative_eq!(up, 0.025, epsilon = 1e-12);
        assert_relative_eq!(low, -0.025, epsilon = 1e-12);

        let err = AirfoilId::parse("missing").shape(&catalog).unwrap_err();
        assert!(matches!(err, WingboxError::AirfoilNotFound(ref n) if n == "missing"));
    }

    #[test]
    fn test_curve_outline_order() {
        let curve = naca4("0012").unwrap().curve(SURFACE_SAMPLES);
        assert_eq!(curve.upper.len(), SURFACE_SAMPLES);
        let outline = curve.outline();
        assert_eq!(outline.len(), 2 * SURFACE_SAMPLES - 1);
        assert_relative_eq!(outline[0][0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(outline[SURFACE_SAMPLES - 1][0], 0.0, epsilon = 1e-12);
    }
}
