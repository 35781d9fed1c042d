//! Validated wingbox layout handed to the geometry and meshing collaborator

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::airfoil::{AirfoilCatalog, AirfoilCurve, AirfoilShape, SURFACE_SAMPLES};
use super::blender::{validate_airfoil_stations, AirfoilStation, SectionBlender};
use super::planform::{ChordLine, Planform};
use super::stations::{
    stringer_divisions, InterpolationMode, StationInterpolator, StructuralStations,
};
use crate::error::{WingboxError, WingboxResult};
use crate::math::{bracket, lerp, same_station, Pt3};

/// Complete geometric description of a wing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WingDefinition {
    pub planform: Planform,
    pub airfoils: Vec<AirfoilStation>,
    pub structure: StructuralStations,
    #[serde(default)]
    pub interpolation: InterpolationMode,
}

impl WingDefinition {
    /// List lengths are checked before any value so that a mismatched list is
    /// reported as such rather than as a range problem.
    pub fn validate(&self, catalog: &AirfoilCatalog) -> WingboxResult<()> {
        self.planform.validate_coherence()?;
        self.structure.validate_coherence(&self.planform)?;
        self.planform.validate_ranges()?;
        self.structure.validate_ranges()?;
        validate_airfoil_stations(&self.airfoils, catalog)
    }
}

/// One merged spanwise station of the layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutStation {
    /// Fraction of the semi-span
    pub fraction: f64,
    pub chord_line: ChordLine,
    pub front_spar: f64,
    pub rear_spar: f64,
    pub section: AirfoilShape,
    /// Unit-chord section points: [`SURFACE_SAMPLES`] per surface for analytic
    /// sections, catalog curves as given
    pub profile: AirfoilCurve,
    pub is_breakpoint: bool,
    pub is_airfoil_station: bool,
}

impl LayoutStation {
    /// Upper and lower skin points at a chord fraction of this station
    pub fn skin_points(&self, fraction: f64) -> (Pt3, Pt3) {
        let (upper, lower) = self.section.ordinates_at(fraction);
        (
            self.chord_line.surface_point(fraction, upper),
            self.chord_line.surface_point(fraction, lower),
        )
    }
}

/// Upper and lower skin ends of a spar at the root rib
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SparEndpoints {
    pub upper: Pt3,
    pub lower: Pt3,
}

/// Stringer chord-arc fractions of one section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringerDivisions {
    pub top: Vec<f64>,
    pub bottom: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WingboxLayout {
    pub stations: Vec<LayoutStation>,
    /// Absolute span of each rib
    pub rib_stations: Vec<f64>,
    pub stringers: Vec<StringerDivisions>,
    pub front_spar_root: SparEndpoints,
    pub rear_spar_root: SparEndpoints,
    /// Upper front-spar point at each breakpoint, root first
    pub load_line: Vec<Pt3>,
    pub reference_area: f64,
    pub mean_aerodynamic_chord: f64,
    pub rib_te_gap: f64,
    pub skin_te_gap: f64,
}

impl WingboxLayout {
    pub fn build(definition: &WingDefinition, catalog: &AirfoilCatalog) -> WingboxResult<Self> {
        definition.validate(catalog)?;
        let planform = &definition.planform;
        let structure = &definition.structure;

        let interpolator =
            StationInterpolator::from_planform(planform)?.with_mode(definition.interpolation);
        let airfoil_fractions: Vec<f64> = definition.airfoils.iter().map(|a| a.fraction).collect();
        let front = interpolator.resolve_fractions("front_spar", &structure.front_spar, &airfoil_fractions)?;
        let rear = interpolator.resolve_fractions("rear_spar", &structure.rear_spar, &airfoil_fractions)?;

        let mut blender = SectionBlender::new(&definition.airfoils, catalog)?;
        let mut stations = Vec::with_capacity(front.len());
        for ((fraction, front_spar), (_, rear_spar)) in front.into_iter().zip(rear) {
            if front_spar >= rear_spar {
                return Err(WingboxError::out_of_range(
                    "spars",
                    format!("spars cross at interpolated station {:.4}", fraction),
                ));
            }
            let section = blender.section_at(fraction)?;
            let station = LayoutStation {
                fraction,
                chord_line: planform.chord_line_at(fraction)?,
                front_spar,
                rear_spar,
                profile: section.curve(SURFACE_SAMPLES),
                section,
                is_breakpoint: interpolator
                    .breakpoints()
                    .iter()
                    .any(|&b| same_station(b, fraction)),
                is_airfoil_station: airfoil_fractions.iter().any(|&a| same_station(a, fraction)),
            };
            debug!(
                "Station {:.4}: spars {:.4}/{:.4}, chord {:.4}",
                fraction,
                front_spar,
                rear_spar,
                station.chord_line.length()
            );
            stations.push(station);
        }

        let root = &stations[0];
        let (fu, fl) = root.skin_points(root.front_spar);
        let (ru, rl) = root.skin_points(root.rear_spar);

        let load_line = stations
            .iter()
            .filter(|s| s.is_breakpoint)
            .map(|s| s.skin_points(s.front_spar).0)
            .collect();

        let stringers = structure
            .stringers
            .iter()
            .map(|[top, bottom]| StringerDivisions {
                top: stringer_divisions(*top),
                bottom: stringer_divisions(*bottom),
            })
            .collect();

        info!(
            "Layout built: {} stations, {} blended sections, {} ribs",
            stations.len(),
            blender.cached(),
            structure.ribs.iter().sum::<usize>() + 1
        );

        Ok(Self {
            stations,
            rib_stations: structure.rib_stations(planform),
            stringers,
            front_spar_root: SparEndpoints { upper: fu, lower: fl },
            rear_spar_root: SparEndpoints { upper: ru, lower: rl },
            load_line,
            reference_area: planform.reference_area(),
            mean_aerodynamic_chord: planform.mean_aerodynamic_chord(),
            rib_te_gap: structure.rib_te_gap,
            skin_te_gap: structure.skin_te_gap,
        })
    }

    /// Point on the front-spar load line at span `y`, linear between breakpoints
    pub fn load_point_at(&self, y: f64) -> WingboxResult<Pt3> {
        let ys: Vec<f64> = self.load_line.iter().map(|p| p.y).collect();
        let i = bracket(&ys, y).ok_or_else(|| {
            WingboxError::out_of_range("strip", format!("span {} is outside the load line", y))
        })?;
        let (a, b) = (self.load_line[i], self.load_line[i + 1]);
        let t = ((y - a.y) / (b.y - a.y)).clamp(0.0, 1.0);
        Ok(Pt3::new(lerp(a.x, b.x, t), y, lerp(a.z, b.z, t)))
    }
}
