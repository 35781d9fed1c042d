//! Cross-section properties for beam (bar) elements

use serde::{Deserialize, Serialize};

use crate::error::{WingboxError, WingboxResult};

/// How a beam cross-section is described
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrossSection {
    /// Solid rectangle, dimensions in mm
    Rect { width: f64, height: f64 },
    /// Explicit properties in SI units (m², m⁴)
    Moments { area: f64, i1: f64, i2: f64, j: f64 },
}

/// Section constants consumed by a beam element, SI units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    /// Area in m²
    pub area: f64,
    /// Inertia about the element's first bending axis in m⁴
    pub i1: f64,
    /// Inertia about the second bending axis in m⁴
    pub i2: f64,
    /// Torsion constant in m⁴
    pub j: f64,
}

impl CrossSection {
    /// Build from a `(values, mode)` pair where mode is `dims` (width and
    /// height) or `moms` (area, I1, I2, J).
    pub fn from_values(values: &[f64], mode: &str) -> WingboxResult<Self> {
        match (mode, values) {
            ("dims", &[width, height]) => Ok(CrossSection::Rect { width, height }),
            ("moms", &[area, i1, i2, j]) => Ok(CrossSection::Moments { area, i1, i2, j }),
            ("dims", _) => Err(WingboxError::coherence("section dims", 2, values.len())),
            ("moms", _) => Err(WingboxError::coherence("section moms", 4, values.len())),
            _ => Err(WingboxError::InvalidInput(format!(
                "section mode '{}' is not one of 'dims' or 'moms'",
                mode
            ))),
        }
    }

    pub fn validate(&self) -> WingboxResult<()> {
        let values = match *self {
            CrossSection::Rect { width, height } => vec![width, height],
            CrossSection::Moments { area, i1, i2, j } => vec![area, i1, i2, j],
        };
        if values.iter().any(|v| !(*v > 0.0)) {
            return Err(WingboxError::out_of_range(
                "section",
                format!("all section values must be positive: {:?}", values),
            ));
        }
        Ok(())
    }

    pub fn properties(&self) -> SectionProperties {
        match *self {
            CrossSection::Rect { width, height } => rectangle(width * 1e-3, height * 1e-3),
            CrossSection::Moments { area, i1, i2, j } => SectionProperties { area, i1, i2, j },
        }
    }
}

/// Raw `(values, mode)` section input as it arrives in a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSpec {
    pub values: Vec<f64>,
    pub mode: String,
}

impl SectionSpec {
    pub fn new(values: &[f64], mode: &str) -> Self {
        Self {
            values: values.to_vec(),
            mode: mode.to_string(),
        }
    }

    pub fn cross_section(&self) -> WingboxResult<CrossSection> {
        let section = CrossSection::from_values(&self.values, &self.mode)?;
        section.validate()?;
        Ok(section)
    }
}

/// Rectangle of sides `l` and `h` (m).
///
/// Torsion uses the series approximation with `a` the longer and `b` the
/// shorter half-side: `J = a b³ (16/3 - 3.36 b/a (1 - b⁴ / (12 a⁴)))`.
fn rectangle(l: f64, h: f64) -> SectionProperties {
    let (a, b) = if l >= h { (l / 2.0, h / 2.0) } else { (h / 2.0, l / 2.0) };
    let j = a * b.powi(3) * (16.0 / 3.0 - 3.36 * (b / a) * (1.0 - b.powi(4) / (12.0 * a.powi(4))));
    SectionProperties {
        area: l * h,
        i1: l.powi(3) * h / 12.0,
        i2: h.powi(3) * l / 12.0,
        j,
    }
}
