//! Intermediate airfoil sections between known stations

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::airfoil::{AirfoilCatalog, AirfoilId, AirfoilShape};
use crate::error::{WingboxError, WingboxResult};
use crate::math::{bracket, same_station};

/// Known airfoil at a fractional span station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirfoilStation {
    pub fraction: f64,
    pub airfoil: AirfoilId,
}

impl AirfoilStation {
    pub fn new(fraction: f64, airfoil: &str) -> Self {
        Self {
            fraction,
            airfoil: AirfoilId::parse(airfoil),
        }
    }
}

/// Check ordering, bounds and root/tip coverage of an airfoil station set
pub fn validate_airfoil_stations(
    stations: &[AirfoilStation],
    catalog: &AirfoilCatalog,
) -> WingboxResult<()> {
    for (i, station) in stations.iter().enumerate() {
        if !(0.0..=1.0).contains(&station.fraction) {
            return Err(WingboxError::out_of_range(
                "airfoil_stations",
                format!("station {} at {} is outside [0, 1]", i, station.fraction),
            ));
        }
        if i > 0 && station.fraction <= stations[i - 1].fraction {
            return Err(WingboxError::out_of_range(
                "airfoil_stations",
                format!("stations must be strictly increasing, check station {}", i),
            ));
        }
        // catalog lookup for names, code checks for NACA sections
        station.airfoil.shape(catalog)?;
    }
    let has = |s: f64| stations.iter().any(|st| same_station(st.fraction, s));
    if !has(0.0) {
        return Err(WingboxError::out_of_range("airfoil_stations", "no airfoil at the root (0)"));
    }
    if !has(1.0) {
        return Err(WingboxError::out_of_range("airfoil_stations", "no airfoil at the tip (1)"));
    }
    Ok(())
}

/// Blend two bracketing sections for a target strictly between them.
///
/// The inner section is weighted by `(s1 - s) / (s1 - s0)` and the outer one
/// by `(s - s0) / (s1 - s0)`. Catalog sections are never blended: the inner
/// catalog curve wins, otherwise the outer one.
pub fn blend_between(
    inner: (f64, &AirfoilShape),
    outer: (f64, &AirfoilShape),
    target: f64,
) -> WingboxResult<AirfoilShape> {
    let (s0, a) = inner;
    let (s1, b) = outer;
    if !(target > s0 && target < s1) {
        return Err(WingboxError::out_of_range(
            "station",
            format!("{} is not strictly between {} and {}", target, s0, s1),
        ));
    }
    match (a, b) {
        (AirfoilShape::Catalog { .. }, _) => Ok(a.clone()),
        (_, AirfoilShape::Catalog { .. }) => Ok(b.clone()),
        (AirfoilShape::Cst(ca), AirfoilShape::Cst(cb)) => {
            let w = (target - s0) / (s1 - s0);
            Ok(AirfoilShape::Cst(ca.blend(cb, w)?))
        }
    }
}

/// Resolves the airfoil section at any span station, memoising blends
#[derive(Debug, Clone)]
pub struct SectionBlender {
    fractions: Vec<f64>,
    shapes: Vec<AirfoilShape>,
    cache: HashMap<u64, AirfoilShape>,
}

impl SectionBlender {
    pub fn new(stations: &[AirfoilStation], catalog: &AirfoilCatalog) -> WingboxResult<Self> {
        validate_airfoil_stations(stations, catalog)?;
        let shapes = stations
            .iter()
            .map(|st| st.airfoil.shape(catalog))
            .collect::<WingboxResult<Vec<_>>>()?;
        Ok(Self {
            fractions: stations.iter().map(|st| st.fraction).collect(),
            shapes,
            cache: HashMap::new(),
        })
    }

    pub fn known_fractions(&self) -> &[f64] {
        &self.fractions
    }

    /// Section at fractional span `s`; known stations are returned as-is
    pub fn section_at(&mut self, s: f64) -> WingboxResult<AirfoilShape> {
        if let Some(i) = self.fractions.iter().position(|&f| same_station(f, s)) {
            return Ok(self.shapes[i].clone());
        }
        let key = s.to_bits();
        if let Some(shape) = self.cache.get(&key) {
            return Ok(shape.clone());
        }
        let i = bracket(&self.fractions, s).ok_or_else(|| {
            WingboxError::out_of_range("station", format!("{} is outside the airfoil stations", s))
        })?;
        let shape = blend_between(
            (self.fractions[i], &self.shapes[i]),
            (self.fractions[i + 1], &self.shapes[i + 1]),
            s,
        )?;
        debug!(
            "Blended section at {:.4} between {:.4} and {:.4}",
            s,
            self.fractions[i],
            self.fractions[i + 1]
        );
        self.cache.insert(key, shape.clone());
        Ok(shape)
    }

    /// Number of memoised blended sections
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stations() -> Vec<AirfoilStation> {
        vec![
            AirfoilStation::new(0.0, "0016"),
            AirfoilStation::new(0.5, "0012"),
            AirfoilStation::new(1.0, "0008"),
        ]
    }

    #[test]
    fn test_root_and_tip_required() {
        let catalog = AirfoilCatalog::new();
        let mut st = stations();
        st.pop();
        assert!(validate_airfoil_stations(&st, &catalog).is_err());

        let st = vec![AirfoilStation::new(0.2, "0012"), AirfoilStation::new(1.0, "0012")];
        assert!(validate_airfoil_stations(&st, &catalog).is_err());
    }

    #[test]
    fn test_unsupported_naca_codes_fail_validation() {
        let catalog = AirfoilCatalog::new();
        for code in ["23112", "26012", "0000", "2012"] {
            let mut st = stations();
            st[1] = AirfoilStation::new(0.5, code);
            assert!(
                matches!(
                    validate_airfoil_stations(&st, &catalog),
                    Err(WingboxError::OutOfRange { ref field, .. }) if field == "airfoil"
                ),
                "{} should be rejected",
                code
            );
        }
        let mut st = stations();
        st[1] = AirfoilStation::new(0.5, "missing");
        assert!(matches!(
            validate_airfoil_stations(&st, &catalog),
            Err(WingboxError::AirfoilNotFound(_))
        ));
    }

    #[test]
    fn test_blend_weights_by_distance() {
        let catalog = AirfoilCatalog::new();
        let mut blender = SectionBlender::new(&stations(), &catalog).unwrap();
        let shape = blender.section_at(0.75).unwrap();
        let (up, _) = shape.ordinates_at(0.3);

        let (a, _) = blender.section_at(0.5).unwrap().ordinates_at(0.3);
        let (b, _) = blender.section_at(1.0).unwrap().ordinates_at(0.3);
        assert_relative_eq!(up, 0.5 * (a + b), epsilon = 1e-12);
        assert_eq!(blender.cached(), 1);

        blender.section_at(0.75).unwrap();
        assert_eq!(blender.cached(), 1);
    }

    #[test]
    fn test_target_must_be_strictly_inside() {
        let a = AirfoilId::parse("0012").shape(&AirfoilCatalog::new()).unwrap();
        assert!(blend_between((0.0, &a), (0.5, &a), 0.5).is_err());
        assert!(blend_between((0.0, &a), (0.5, &a), 0.7).is_err());
        assert!(blend_between((0.0, &a), (0.5, &a), 0.2).is_ok());
    }

    #[test]
    fn test_catalog_sections_are_not_blended() {
        let mut catalog = AirfoilCatalog::new();
        catalog
            .insert_selig("flat", &[[1.0, 0.0], [0.0, 0.0], [1.0, -0.01]])
            .unwrap();
        let st = vec![AirfoilStation::new(0.0, "0012"), AirfoilStation::new(1.0, "flat")];
        let mut blender = SectionBlender::new(&st, &catalog).unwrap();
        match blender.section_at(0.4).unwrap() {
            AirfoilShape::Catalog { name, .. } => assert_eq!(name, "flat"),
            other => panic!("expected catalog curve, got {:?}", other),
        }
    }
}
