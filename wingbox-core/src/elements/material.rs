//! Material identifiers and the reference property table

use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{MaterialField, WingboxError, WingboxResult};

/// Default table shipped with the crate
const EMBEDDED_TABLE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/materials.csv"));

/// Slack below the lower thickness band edge (table units)
const BAND_EPS: f64 = 1e-9;

const KSI_TO_PA: f64 = 6.894757e6;
const MPA_TO_PA: f64 = 1e6;
const SLUG_FT3_TO_KG_M3: f64 = 515.378818;
const MM_PER_INCH: f64 = 25.4;

/// Unit system of a table row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// Thickness in inches, stresses in ksi, density in slug/ft³
    Imperial,
    /// Thickness in mm, stresses in MPa, density in kg/m³
    Si,
}

impl UnitSystem {
    fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "imperial" | "us" => Some(UnitSystem::Imperial),
            "si" | "metric" => Some(UnitSystem::Si),
            _ => None,
        }
    }

    fn thickness_from_mm(self, mm: f64) -> f64 {
        match self {
            UnitSystem::Imperial => mm / MM_PER_INCH,
            UnitSystem::Si => mm,
        }
    }

    fn stress_to_pa(self) -> f64 {
        match self {
            UnitSystem::Imperial => KSI_TO_PA,
            UnitSystem::Si => MPA_TO_PA,
        }
    }

    fn density_to_si(self) -> f64 {
        match self {
            UnitSystem::Imperial => SLUG_FT3_TO_KG_M3,
            UnitSystem::Si => 1.0,
        }
    }
}

/// Which Young's modulus feeds the material cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModulusSelector {
    #[default]
    Tension,
    Compression,
}

/// Parsed `alloy-temper-thickness_mm-basis` identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialId {
    pub alloy: String,
    pub temper: String,
    pub thickness_mm: f64,
    pub basis: String,
}

impl MaterialId {
    /// Table key without the thickness: `alloy-temper-basis`
    pub fn key(&self) -> String {
        format!("{}-{}-{}", self.alloy, self.temper, self.basis)
    }
}

impl FromStr for MaterialId {
    type Err = WingboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split('-').collect();
        if fields.len() != 4 {
            return Err(WingboxError::InvalidInput(format!(
                "material '{}' must have 4 hyphen-joined fields (alloy-temper-thickness-basis), found {}",
                s,
                fields.len()
            )));
        }
        let thickness_mm = fields[2]
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite() && *t > 0.0)
            .ok_or_else(|| WingboxError::InvalidMaterial {
                id: s.to_string(),
                field: MaterialField::Thickness,
            })?;
        Ok(Self {
            alloy: fields[0].to_string(),
            temper: fields[1].to_string(),
            thickness_mm,
            basis: fields[3].to_string(),
        })
    }
}

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}-{}", self.alloy, self.temper, self.thickness_mm, self.basis)
    }
}

/// One row of the reference table, in the row's own units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRow {
    pub spec: String,
    pub name: String,
    pub temper: String,
    pub t_min: f64,
    pub t_max: f64,
    pub basis: String,
    pub e_tension: f64,
    pub e_compression: f64,
    pub shear_modulus: f64,
    pub poisson: f64,
    pub density: f64,
    pub ultimate_tension: f64,
    pub yield_tension: f64,
    pub yield_compression: f64,
    pub units: UnitSystem,
}

impl MaterialRow {
    /// Half-open `[t_min, t_max)` band test
    pub fn contains_thickness(&self, t: f64) -> bool {
        t >= self.t_min - BAND_EPS && t < self.t_max
    }
}

/// Resolved material constants in SI units (Pa, kg/m³, m)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub spec: String,
    /// Sheet thickness in m
    pub thickness: f64,
    pub e_tension: f64,
    pub e_compression: f64,
    pub g: f64,
    pub nu: f64,
    pub rho: f64,
    pub ultimate_tension: f64,
    pub yield_tension: f64,
    pub yield_compression: f64,
}

impl Material {
    pub fn modulus(&self, selector: ModulusSelector) -> f64 {
        match selector {
            ModulusSelector::Tension => self.e_tension,
            ModulusSelector::Compression => self.e_compression,
        }
    }
}

/// Resolves material identifiers against a read-only reference table
#[derive(Debug, Clone, Default)]
pub struct MaterialResolver {
    rows: Vec<MaterialRow>,
}

impl MaterialResolver {
    pub fn new(rows: Vec<MaterialRow>) -> Self {
        Self { rows }
    }

    /// Table shipped with the crate (aluminium sheet and titanium plate)
    pub fn embedded() -> WingboxResult<Self> {
        Self::from_csv_str(EMBEDDED_TABLE)
    }

    pub fn load(path: impl AsRef<Path>) -> WingboxResult<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_csv_str(&text)
    }

    /// Parse a header + rows table. Columns are located by header name.
    pub fn from_csv_str(text: &str) -> WingboxResult<Self> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header_line = lines
            .next()
            .ok_or_else(|| WingboxError::InvalidInput("material table is empty".into()))?;
        let headers: Vec<&str> = header_line.split(',').map(str::trim).collect();
        let col_index = |name: &str| -> WingboxResult<usize> {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    WingboxError::InvalidInput(format!("material table is missing column '{}'", name))
                })
        };

        let spec_idx = col_index("Spec")?;
        let name_idx = col_index("Name")?;
        let temper_idx = col_index("Temper")?;
        let tmin_idx = col_index("tmin")?;
        let tmax_idx = col_index("tmax")?;
        let basis_idx = col_index("Basis")?;
        let et_idx = col_index("Et")?;
        let ec_idx = col_index("Ec")?;
        let g_idx = col_index("G")?;
        let nu_idx = col_index("nu")?;
        let rho_idx = col_index("rho")?;
        let ftu_idx = col_index("u_sigma_t")?;
        let fty_idx = col_index("y_sigma_t")?;
        let fcy_idx = col_index("y_sigma_c")?;
        let units_idx = col_index("units")?;

        let mut rows = Vec::new();
        for (line_no, line) in lines.enumerate() {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let row_no = line_no + 2;
            let text_at = |idx: usize| -> WingboxResult<String> {
                fields.get(idx).map(|s| s.to_string()).ok_or_else(|| {
                    WingboxError::InvalidInput(format!("material table row {} is too short", row_no))
                })
            };
            let num_at = |idx: usize| -> WingboxResult<f64> {
                let raw = text_at(idx)?;
                raw.parse::<f64>().map_err(|_| {
                    WingboxError::InvalidInput(format!(
                        "material table row {}: '{}' in column '{}' is not a number",
                        row_no, raw, headers[idx]
                    ))
                })
            };
            let units_raw = text_at(units_idx)?;
            let units = UnitSystem::parse(&units_raw).ok_or_else(|| {
                WingboxError::InvalidInput(format!(
                    "material table row {}: unknown unit system '{}'",
                    row_no, units_raw
                ))
            })?;

            rows.push(MaterialRow {
                spec: text_at(spec_idx)?,
                name: text_at(name_idx)?,
                temper: text_at(temper_idx)?,
                t_min: num_at(tmin_idx)?,
                t_max: num_at(tmax_idx)?,
                basis: text_at(basis_idx)?,
                e_tension: num_at(et_idx)?,
                e_compression: num_at(ec_idx)?,
                shear_modulus: num_at(g_idx)?,
                poisson: num_at(nu_idx)?,
                density: num_at(rho_idx)?,
                ultimate_tension: num_at(ftu_idx)?,
                yield_tension: num_at(fty_idx)?,
                yield_compression: num_at(fcy_idx)?,
                units,
            });
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[MaterialRow] {
        &self.rows
    }

    /// Resolve `alloy-temper-thickness_mm-basis` to SI constants.
    ///
    /// The error names the first of name, temper, basis or thickness that
    /// no row satisfies.
    pub fn resolve(&self, identifier: &str) -> WingboxResult<Material> {
        let id: MaterialId = identifier.parse()?;
        let invalid = |field| WingboxError::InvalidMaterial {
            id: identifier.to_string(),
            field,
        };

        let by_name: Vec<&MaterialRow> = self.rows.iter().filter(|r| r.name == id.alloy).collect();
        if by_name.is_empty() {
            return Err(invalid(MaterialField::Name));
        }
        let by_temper: Vec<&MaterialRow> =
            by_name.into_iter().filter(|r| r.temper == id.temper).collect();
        if by_temper.is_empty() {
            return Err(invalid(MaterialField::Temper));
        }
        let by_basis: Vec<&MaterialRow> =
            by_temper.into_iter().filter(|r| r.basis == id.basis).collect();
        if by_basis.is_empty() {
            return Err(invalid(MaterialField::Basis));
        }
        let row = by_basis
            .into_iter()
            .find(|r| r.contains_thickness(r.units.thickness_from_mm(id.thickness_mm)))
            .ok_or_else(|| invalid(MaterialField::Thickness))?;

        let stress = row.units.stress_to_pa();
        let material = Material {
            id: identifier.to_string(),
            spec: row.spec.clone(),
            thickness: id.thickness_mm * 1e-3,
            e_tension: row.e_tension * stress,
            e_compression: row.e_compression * stress,
            g: row.shear_modulus * stress,
            nu: row.poisson,
            rho: row.density * row.units.density_to_si(),
            ultimate_tension: row.ultimate_tension * stress,
            yield_tension: row.yield_tension * stress,
            yield_compression: row.yield_compression * stress,
        };
        debug!(
            "Resolved material {} ({}): E = {:.4e} Pa, rho = {:.1} kg/m3",
            id.key(),
            row.spec,
            material.e_tension,
            material.rho
        );
        Ok(material)
    }
}
