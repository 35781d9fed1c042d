//! Flight condition, load cases and aerodynamic load transfer

mod aero;
mod flight;
mod load_case;
mod mapper;

pub use aero::{starboard, strip_loads, StationLoad, StripRow};
pub use flight::{Atmosphere, FlightCondition};
pub use load_case::{CaseMode, LoadCase, LoadCaseSettings};
pub use mapper::{LoadMapper, MappedLoad, NodeLocator, SearchRadius};
