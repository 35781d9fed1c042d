//! Planform, station and airfoil geometry

pub mod airfoil;
pub mod blender;
pub mod layout;
pub mod planform;
pub mod stations;

pub use airfoil::{AirfoilCatalog, AirfoilCurve, AirfoilId, AirfoilShape, CstCoefficients};
pub use blender::{AirfoilStation, SectionBlender};
pub use layout::{LayoutStation, SparEndpoints, WingDefinition, WingboxLayout};
pub use planform::{ChordLine, Planform};
pub use stations::{InterpolationMode, StationInterpolator, StructuralStations};
