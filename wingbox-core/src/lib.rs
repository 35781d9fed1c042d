//! Wingbox Core - structural layout and load transfer for parametric wings
//!
//! Derives the load-bearing layout of a wingbox (spars, ribs, stringers,
//! skin) from planform parameters and assembles a solver-ready structural
//! model:
//! - Spanwise station interpolation across independent breakpoint lists
//! - Airfoil sections with CST shape coefficients and blending
//! - Material and cross-section property resolution
//! - Aerodynamic strip loads mapped onto mesh nodes per load case
//! - Model assembly with one subcase per load case
//!
//! ## Example
//! ```rust
//! use wingbox_core::prelude::*;
//!
//! let resolver = MaterialResolver::embedded().unwrap();
//! let skin = resolver.resolve("Al2024-T3-1.27-A").unwrap();
//! assert!(skin.e_tension > 70e9);
//!
//! let stringer = CrossSection::from_values(&[10.0, 20.0], "dims").unwrap();
//! assert!((stringer.properties().area - 2e-4).abs() < 1e-12);
//!
//! let interpolator =
//!     StationInterpolator::new(vec![0.0, 0.5, 1.0], vec![1.0, 0.5, 0.25]).unwrap();
//! let front = interpolator.fraction_at("front_spar", &[0.25, 0.25, 0.25], 0.3).unwrap();
//! assert!((front - 0.25).abs() < 1e-12);
//! ```

pub mod elements;
pub mod error;
pub mod geometry;
pub mod loads;
pub mod math;
pub mod mesh;
pub mod model;
pub mod pipeline;

// Re-export common types
pub mod prelude {
    pub use crate::elements::{
        AttachmentCategory, BoundaryCondition, CrossSection, DofSet, Material, MaterialResolver,
        MeshNode, ModulusSelector, SectionProperties, SectionSpec,
    };
    pub use crate::error::{MaterialField, WingboxError, WingboxResult};
    pub use crate::geometry::{
        AirfoilCatalog, AirfoilId, AirfoilShape, AirfoilStation, InterpolationMode, Planform,
        SectionBlender, StationInterpolator, StructuralStations, WingDefinition, WingboxLayout,
    };
    pub use crate::loads::{
        CaseMode, FlightCondition, LoadCase, LoadCaseSettings, LoadMapper, MappedLoad,
        NodeLocator, SearchRadius, StationLoad, StripRow,
    };
    pub use crate::mesh::{BeamRegion, MeshBeam, MeshFace, MeshTopology, ShellRegion};
    pub use crate::model::{
        AttachmentPoints, BeamMaterials, BeamSections, Element, ModelAssembler, ModelSummary,
        ShellMaterials, StructuralModel, StructuralSpec,
    };
    pub use crate::pipeline::{Pipeline, PipelineInput, PipelineOutput};
}
