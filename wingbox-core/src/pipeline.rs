//! End-to-end pipeline: layout, property resolution, load mapping, assembly

use log::info;
use serde::{Deserialize, Serialize};

use crate::elements::MaterialResolver;
use crate::error::{WingboxError, WingboxResult};
use crate::geometry::{AirfoilCatalog, WingDefinition, WingboxLayout};
use crate::loads::{
    strip_loads, FlightCondition, LoadCase, LoadCaseSettings, LoadMapper, MappedLoad,
    SearchRadius, StripRow,
};
use crate::mesh::MeshTopology;
use crate::model::{AttachmentPoints, ModelAssembler, StructuralModel, StructuralSpec};

/// Everything needed to produce a structural model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineInput {
    pub wing: WingDefinition,
    #[serde(default)]
    pub airfoil_catalog: AirfoilCatalog,
    pub structure: StructuralSpec,
    pub flight: FlightCondition,
    pub load_cases: LoadCaseSettings,
    pub mesh: MeshTopology,
    /// Strip forces of each load case, in load-case order
    pub aero_results: Vec<Vec<StripRow>>,
    #[serde(default)]
    pub search_radius: SearchRadius,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub layout: WingboxLayout,
    pub cases: Vec<LoadCase>,
    pub mapped_loads: Vec<Vec<MappedLoad>>,
    pub model: StructuralModel,
}

pub struct Pipeline<'a> {
    resolver: &'a MaterialResolver,
}

impl<'a> Pipeline<'a> {
    pub fn new(resolver: &'a MaterialResolver) -> Self {
        Self { resolver }
    }

    /// Check every input before any geometry work. List-length problems are
    /// reported first, then value ranges, then table lookups.
    pub fn validate(&self, input: &PipelineInput) -> WingboxResult<Vec<LoadCase>> {
        input.wing.planform.validate_coherence()?;
        input.wing.structure.validate_coherence(&input.wing.planform)?;
        input.load_cases.validate_coherence()?;
        if input.aero_results.len() != input.load_cases.names.len() {
            return Err(WingboxError::coherence(
                "aero_results",
                input.load_cases.names.len(),
                input.aero_results.len(),
            ));
        }

        input.wing.validate(&input.airfoil_catalog)?;
        input.flight.validate()?;
        input.search_radius.validate()?;
        let cases = input.load_cases.cases()?;
        input.structure.validate(self.resolver)?;
        input.mesh.validate()?;
        Ok(cases)
    }

    pub fn run(&self, input: &PipelineInput) -> WingboxResult<PipelineOutput> {
        let cases = self.validate(input)?;

        let layout = WingboxLayout::build(&input.wing, &input.airfoil_catalog)?;

        let q = input.flight.dynamic_pressure();
        info!(
            "Flight condition: q = {:.1} Pa, M = {:.3}",
            q,
            input.flight.mach()
        );
        let mapper = LoadMapper::new(&input.mesh.nodes, input.search_radius);
        let mapped_loads = cases
            .iter()
            .zip(&input.aero_results)
            .map(|(case, strips)| {
                let loads = strip_loads(strips, q, &layout)?;
                let mapped = mapper.map_case(case, &loads)?;
                info!("Case {} '{}': {} loads mapped", case.id, case.name, mapped.len());
                Ok(mapped)
            })
            .collect::<WingboxResult<Vec<_>>>()?;

        let model = ModelAssembler::new(self.resolver)
            .with_search_radius(input.search_radius)
            .assemble(
                &input.structure,
                &input.mesh,
                &AttachmentPoints::from_layout(&layout),
                &cases,
                &mapped_loads,
            )?;

        Ok(PipelineOutput {
            layout,
            cases,
            mapped_loads,
            model,
        })
    }
}
