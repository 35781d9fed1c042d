use serde::{Deserialize, Serialize};
use wingbox_core::model::ModelSummary;
use wingbox_core::pipeline::PipelineInput;

/// Request body of the validate, assemble and analyze endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub input: PipelineInput,
    /// Title written into the deck
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub load_cases: usize,
    pub message: String,
}

/// Bulk data produced without running the solver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembleResponse {
    pub job_id: String,
    pub summary: ModelSummary,
    pub bulk_data: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub job_id: String,
    pub status: AnalysisStatus,
    pub summary: ModelSummary,
    pub results: Option<AnalysisResults>,
    pub error_message: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub subcases: Vec<SubcaseResults>,
    /// Largest translation magnitude over all subcases
    pub max_displacement: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubcaseResults {
    pub id: usize,
    pub label: String,
    pub displacements: Vec<NodeDisplacement>,
    /// Summed single-point constraint forces: FX, FY, FZ, MX, MY, MZ
    pub reaction_totals: Option<[f64; 6]>,
    pub max_displacement: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    pub node_id: usize,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl NodeDisplacement {
    pub fn magnitude(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy + self.dz * self.dz).sqrt()
    }
}
