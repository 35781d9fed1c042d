//! Load cases

use serde::{Deserialize, Serialize};

use crate::error::{WingboxError, WingboxResult};

/// What the aerodynamic solver holds fixed for a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseMode {
    /// Fixed angle of attack (degrees)
    #[serde(rename = "alpha")]
    FixedAlpha,
    /// Fixed lift coefficient; the solver trims alpha to reach it
    #[serde(rename = "CL")]
    FixedCl,
}

impl CaseMode {
    pub fn parse(variable: &str) -> Option<Self> {
        match variable.trim() {
            "alpha" => Some(CaseMode::FixedAlpha),
            "CL" => Some(CaseMode::FixedCl),
            _ => None,
        }
    }

    pub fn variable(&self) -> &'static str {
        match self {
            CaseMode::FixedAlpha => "alpha",
            CaseMode::FixedCl => "CL",
        }
    }
}

/// One independent flight case; ids start at 1 and become subcase ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    pub id: usize,
    pub name: String,
    pub mode: CaseMode,
    pub value: f64,
}

impl LoadCase {
    pub fn new(id: usize, name: &str, mode: CaseMode, value: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            mode,
            value,
        }
    }

    pub fn fixed_alpha(id: usize, name: &str, alpha_deg: f64) -> Self {
        Self::new(id, name, CaseMode::FixedAlpha, alpha_deg)
    }

    pub fn fixed_cl(id: usize, name: &str, cl: f64) -> Self {
        Self::new(id, name, CaseMode::FixedCl, cl)
    }
}

/// Load cases as three parallel lists: names, variables and values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadCaseSettings {
    pub names: Vec<String>,
    pub variables: Vec<String>,
    pub values: Vec<f64>,
}

impl LoadCaseSettings {
    pub fn validate_coherence(&self) -> WingboxResult<()> {
        let n = self.names.len();
        if n == 0 {
            return Err(WingboxError::InvalidInput("at least one load case is required".into()));
        }
        for found in [self.variables.len(), self.values.len()] {
            if found != n {
                return Err(WingboxError::coherence("load_cases", n, found));
            }
        }
        Ok(())
    }

    /// Build the numbered cases
    pub fn cases(&self) -> WingboxResult<Vec<LoadCase>> {
        self.validate_coherence()?;
        let mut cases = Vec::with_capacity(self.names.len());
        for (i, ((name, variable), value)) in self
            .names
            .iter()
            .zip(&self.variables)
            .zip(&self.values)
            .enumerate()
        {
            if name.trim().is_empty() {
                return Err(WingboxError::InvalidInput(format!("load case {} has no name", i + 1)));
            }
            if self.names[..i].contains(name) {
                return Err(WingboxError::InvalidInput(format!(
                    "load case name '{}' is used twice",
                    name
                )));
            }
            let mode = CaseMode::parse(variable).ok_or_else(|| {
                WingboxError::out_of_range(
                    "load_cases",
                    format!("case '{}': variable '{}' must be 'alpha' or 'CL'", name, variable),
                )
            })?;
            if !value.is_finite() {
                return Err(WingboxError::out_of_range(
                    "load_cases",
                    format!("case '{}': value must be finite", name),
                ));
            }
            cases.push(LoadCase::new(i + 1, name, mode, *value));
        }
        Ok(cases)
    }
}
