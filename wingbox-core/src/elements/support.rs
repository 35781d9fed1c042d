//! Boundary conditions at named attachment points

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{WingboxError, WingboxResult};

/// Where the wingbox is attached to the fuselage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentCategory {
    /// Every vertex of the root rib outline
    RootRib,
    /// Upper and lower root ends of the front spar
    FrontSpar,
    /// Upper and lower root ends of the rear spar
    RearSpar,
}

impl AttachmentCategory {
    pub const ALL: [AttachmentCategory; 3] = [
        AttachmentCategory::RootRib,
        AttachmentCategory::FrontSpar,
        AttachmentCategory::RearSpar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AttachmentCategory::RootRib => "root_rib",
            AttachmentCategory::FrontSpar => "front_spar",
            AttachmentCategory::RearSpar => "rear_spar",
        }
    }
}

/// Restrained degrees of freedom, digits 1 (TX) to 6 (RZ).
///
/// Written as a strictly ascending digit string such as `123` or `123456`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DofSet {
    digits: Vec<u8>,
}

impl DofSet {
    /// All six degrees of freedom
    pub fn fixed() -> Self {
        Self { digits: vec![1, 2, 3, 4, 5, 6] }
    }

    /// Translations only
    pub fn pinned() -> Self {
        Self { digits: vec![1, 2, 3] }
    }

    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    pub fn num_restrained(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }
}

impl FromStr for DofSet {
    type Err = WingboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |why: &str| {
            WingboxError::out_of_range("dofs", format!("'{}' {}", s, why))
        };
        let mut digits: Vec<u8> = Vec::with_capacity(6);
        for c in s.trim().chars() {
            let d = c
                .to_digit(10)
                .filter(|d| (1..=6).contains(d))
                .ok_or_else(|| invalid("may only contain the digits 1 to 6"))? as u8;
            if let Some(&last) = digits.last() {
                if d <= last {
                    return Err(invalid("must be strictly ascending without repeats"));
                }
            }
            digits.push(d);
        }
        if digits.is_empty() {
            return Err(invalid("restrains no degree of freedom"));
        }
        Ok(Self { digits })
    }
}

impl TryFrom<String> for DofSet {
    type Error = WingboxError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DofSet> for String {
    fn from(set: DofSet) -> Self {
        set.to_string()
    }
}

impl fmt::Display for DofSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.digits {
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

/// A category with its restrained degrees of freedom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryCondition {
    pub category: AttachmentCategory,
    pub dofs: DofSet,
}

impl BoundaryCondition {
    pub fn new(category: AttachmentCategory, dofs: &str) -> WingboxResult<Self> {
        Ok(Self {
            category,
            dofs: dofs.parse()?,
        })
    }
}

/// At most one entry per category, at least one entry overall
pub fn validate_boundary_conditions(conditions: &[BoundaryCondition]) -> WingboxResult<()> {
    if conditions.is_empty() {
        return Err(WingboxError::InvalidInput(
            "at least one boundary condition is required".into(),
        ));
    }
    if conditions.len() > AttachmentCategory::ALL.len() {
        return Err(WingboxError::coherence(
            "boundary_conditions",
            AttachmentCategory::ALL.len(),
            conditions.len(),
        ));
    }
    for (i, bc) in conditions.iter().enumerate() {
        if conditions[..i].iter().any(|other| other.category == bc.category) {
            return Err(WingboxError::InvalidInput(format!(
                "boundary condition '{}' is given more than once",
                bc.category.name()
            )));
        }
    }
    Ok(())
}
