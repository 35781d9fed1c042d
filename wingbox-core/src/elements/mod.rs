//! Structural element data: materials, sections, nodes and supports

mod material;
mod node;
mod section;
mod support;

pub use material::{Material, MaterialId, MaterialResolver, MaterialRow, ModulusSelector, UnitSystem};
pub use node::MeshNode;
pub use section::{CrossSection, SectionProperties, SectionSpec};
pub use support::{validate_boundary_conditions, AttachmentCategory, BoundaryCondition, DofSet};
