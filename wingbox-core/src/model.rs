//! Assembly of the solver-ready structural model

use std::collections::HashSet;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::elements::{
    validate_boundary_conditions, AttachmentCategory, BoundaryCondition, Material,
    MaterialResolver, ModulusSelector, SectionProperties, SectionSpec,
};
use crate::error::{WingboxError, WingboxResult};
use crate::geometry::{SparEndpoints, WingboxLayout};
use crate::loads::{LoadCase, MappedLoad, NodeLocator, SearchRadius};
use crate::math::{Pt3, Vec3};
use crate::mesh::{BeamRegion, MeshTopology, ShellRegion};

/// Material identifiers of the shell regions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellMaterials {
    pub skin: String,
    pub spar_web: String,
    pub ribs: String,
}

impl ShellMaterials {
    pub fn get(&self, region: ShellRegion) -> &str {
        match region {
            ShellRegion::Skin => &self.skin,
            ShellRegion::SparWeb => &self.spar_web,
            ShellRegion::Rib => &self.ribs,
        }
    }
}

/// Material identifiers of the beam regions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamMaterials {
    pub stringers: String,
    pub spar_caps: String,
    pub rib_caps: String,
}

impl BeamMaterials {
    pub fn get(&self, region: BeamRegion) -> &str {
        match region {
            BeamRegion::Stringer => &self.stringers,
            BeamRegion::SparCap => &self.spar_caps,
            BeamRegion::RibCap => &self.rib_caps,
        }
    }
}

/// Cross-sections of the beam regions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamSections {
    pub stringer: SectionSpec,
    pub spar_cap: SectionSpec,
    pub rib_cap: SectionSpec,
}

impl BeamSections {
    pub fn get(&self, region: BeamRegion) -> &SectionSpec {
        match region {
            BeamRegion::Stringer => &self.stringer,
            BeamRegion::SparCap => &self.spar_cap,
            BeamRegion::RibCap => &self.rib_cap,
        }
    }
}

/// Materials, sections and supports of the wingbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralSpec {
    pub shell_materials: ShellMaterials,
    pub beam_materials: BeamMaterials,
    pub sections: BeamSections,
    pub boundary_conditions: Vec<BoundaryCondition>,
    #[serde(default)]
    pub modulus: ModulusSelector,
}

impl StructuralSpec {
    /// Resolve every material and section, check the supports
    pub fn validate(&self, resolver: &MaterialResolver) -> WingboxResult<()> {
        for region in ShellRegion::ALL {
            resolver.resolve(self.shell_materials.get(region))?;
        }
        for region in BeamRegion::ALL {
            resolver.resolve(self.beam_materials.get(region))?;
            self.sections.get(region).cross_section()?;
        }
        validate_boundary_conditions(&self.boundary_conditions)
    }
}

/// Root ends of both spars and the root span, used by the boundary
/// categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttachmentPoints {
    pub front_spar: SparEndpoints,
    pub rear_spar: SparEndpoints,
    /// Span coordinate of the root rib plane
    pub root_span: f64,
}

impl AttachmentPoints {
    pub fn from_layout(layout: &WingboxLayout) -> Self {
        Self {
            front_spar: layout.front_spar_root,
            rear_spar: layout.rear_spar_root,
            root_span: layout.rib_stations.first().copied().unwrap_or(0.0),
        }
    }
}

/// Isotropic material card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCard {
    pub id: usize,
    /// Identifier the card was resolved from
    pub source: String,
    pub e: f64,
    pub g: f64,
    pub nu: f64,
    pub rho: f64,
}

impl MaterialCard {
    fn from_material(id: usize, material: &Material, modulus: ModulusSelector) -> Self {
        Self {
            id,
            source: material.id.clone(),
            e: material.modulus(modulus),
            g: material.g,
            nu: material.nu,
            rho: material.rho,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellProperty {
    pub id: usize,
    pub material: usize,
    pub region: ShellRegion,
    /// Thickness in m
    pub thickness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamProperty {
    pub id: usize,
    pub material: usize,
    pub region: BeamRegion,
    pub section: SectionProperties,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Tria3 { id: usize, property: usize, nodes: [usize; 3] },
    Quad4 { id: usize, property: usize, nodes: [usize; 4] },
    Bar { id: usize, property: usize, nodes: [usize; 2], orientation: [f64; 3] },
}

impl Element {
    pub fn id(&self) -> usize {
        match self {
            Element::Tria3 { id, .. } | Element::Quad4 { id, .. } | Element::Bar { id, .. } => *id,
        }
    }
}

/// Single degree of freedom of a single node restrained in one set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restraint {
    pub set: usize,
    pub node: usize,
    pub dof: u8,
}

/// Concentrated force or moment in one load set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodalLoad {
    pub set: usize,
    pub node: usize,
    pub magnitude: f64,
    pub direction: [f64; 3],
}

/// One solver subcase, one per load case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcase {
    pub id: usize,
    pub label: String,
    pub restraint_set: usize,
    pub load_set: usize,
}

/// Entry counts of an assembled model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub materials: usize,
    pub properties: usize,
    pub grids: usize,
    pub elements: usize,
    pub restraints: usize,
    pub forces: usize,
    pub moments: usize,
    pub subcases: usize,
    pub restraint_sets: usize,
    pub load_sets: usize,
}

/// Case-independent entries plus per-case restraints and loads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralModel {
    pub title: String,
    pub materials: Vec<MaterialCard>,
    pub shell_properties: Vec<ShellProperty>,
    pub beam_properties: Vec<BeamProperty>,
    pub grids: Vec<GridPoint>,
    pub elements: Vec<Element>,
    pub restraints: Vec<Restraint>,
    pub forces: Vec<NodalLoad>,
    pub moments: Vec<NodalLoad>,
    pub subcases: Vec<Subcase>,
}

impl StructuralModel {
    pub fn restraint_sets(&self) -> usize {
        self.restraints.iter().map(|r| r.set).collect::<HashSet<_>>().len()
    }

    pub fn load_sets(&self) -> usize {
        self.forces
            .iter()
            .chain(&self.moments)
            .map(|l| l.set)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Forces and moments of one load set
    pub fn loads_in_set(&self, set: usize) -> impl Iterator<Item = &NodalLoad> {
        self.forces
            .iter()
            .chain(&self.moments)
            .filter(move |l| l.set == set)
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            materials: self.materials.len(),
            properties: self.shell_properties.len() + self.beam_properties.len(),
            grids: self.grids.len(),
            elements: self.elements.len(),
            restraints: self.restraints.len(),
            forces: self.forces.len(),
            moments: self.moments.len(),
            subcases: self.subcases.len(),
            restraint_sets: self.restraint_sets(),
            load_sets: self.load_sets(),
        }
    }
}

/// Lift acts along +Z, drag along +X, the pitching moment about +Y
const LIFT_AXIS: [f64; 3] = [0.0, 0.0, 1.0];
const DRAG_AXIS: [f64; 3] = [1.0, 0.0, 0.0];
const PITCH_AXIS: [f64; 3] = [0.0, 1.0, 0.0];

/// Combines resolved properties, mesh, supports and mapped loads
#[derive(Debug, Clone)]
pub struct ModelAssembler<'a> {
    resolver: &'a MaterialResolver,
    radius: SearchRadius,
    title: String,
}

impl<'a> ModelAssembler<'a> {
    pub fn new(resolver: &'a MaterialResolver) -> Self {
        Self {
            resolver,
            radius: SearchRadius::default(),
            title: "Wingbox static analysis".to_string(),
        }
    }

    pub fn with_search_radius(mut self, radius: SearchRadius) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Build the model. `mapped[k]` holds the loads of `cases[k]`.
    pub fn assemble(
        &self,
        spec: &StructuralSpec,
        mesh: &MeshTopology,
        attachments: &AttachmentPoints,
        cases: &[LoadCase],
        mapped: &[Vec<MappedLoad>],
    ) -> WingboxResult<StructuralModel> {
        mesh.validate()?;
        validate_boundary_conditions(&spec.boundary_conditions)?;
        if mapped.len() != cases.len() {
            return Err(WingboxError::coherence("mapped_loads", cases.len(), mapped.len()));
        }
        check_case_ids(cases)?;

        let mut model = StructuralModel {
            title: self.title.clone(),
            ..Default::default()
        };

        // shell regions take ids 1..=3, beam regions the ids after them
        for (k, region) in ShellRegion::ALL.into_iter().enumerate() {
            let id = k + 1;
            let material = self.resolver.resolve(spec.shell_materials.get(region))?;
            model.materials.push(MaterialCard::from_material(id, &material, spec.modulus));
            model.shell_properties.push(ShellProperty {
                id,
                material: id,
                region,
                thickness: material.thickness,
            });
        }
        for (k, region) in BeamRegion::ALL.into_iter().enumerate() {
            let id = ShellRegion::ALL.len() + k + 1;
            let material = self.resolver.resolve(spec.beam_materials.get(region))?;
            let section = spec.sections.get(region).cross_section()?;
            model.materials.push(MaterialCard::from_material(id, &material, spec.modulus));
            model.beam_properties.push(BeamProperty {
                id,
                material: id,
                region,
                section: section.properties(),
            });
        }

        model.grids = mesh
            .nodes
            .iter()
            .map(|n| GridPoint { id: n.id, x: n.x, y: n.y, z: n.z })
            .collect();

        model.elements = Self::elements(mesh)?;

        let restrained = self.restrained_nodes(spec, mesh, attachments)?;
        for case in cases {
            let mut seen = HashSet::new();
            for (node, dofs) in &restrained {
                for &dof in dofs {
                    if seen.insert((*node, dof)) {
                        model.restraints.push(Restraint { set: case.id, node: *node, dof });
                    }
                }
            }
        }

        for (case, loads) in cases.iter().zip(mapped) {
            for load in loads {
                if load.case != case.id {
                    return Err(WingboxError::InvalidInput(format!(
                        "load mapped for case {} was given with case {}",
                        load.case, case.id
                    )));
                }
                model.forces.push(NodalLoad { set: case.id, node: load.node, magnitude: load.lift, direction: LIFT_AXIS });
                model.forces.push(NodalLoad { set: case.id, node: load.node, magnitude: load.drag, direction: DRAG_AXIS });
                model.moments.push(NodalLoad { set: case.id, node: load.node, magnitude: load.moment, direction: PITCH_AXIS });
            }
            model.subcases.push(Subcase {
                id: case.id,
                label: case.name.clone(),
                restraint_set: case.id,
                load_set: case.id,
            });
        }

        info!(
            "Model assembled: {} grids, {} elements, {} restraints, {} subcases",
            model.grids.len(),
            model.elements.len(),
            model.restraints.len(),
            model.subcases.len()
        );
        Ok(model)
    }

    fn elements(mesh: &MeshTopology) -> WingboxResult<Vec<Element>> {
        let mut elements = Vec::with_capacity(mesh.faces.len() + mesh.beams.len());
        let shell_pid = |region: ShellRegion| {
            ShellRegion::ALL.iter().position(|r| *r == region).unwrap_or(0) + 1
        };
        for face in &mesh.faces {
            let id = elements.len() + 1;
            let property = shell_pid(face.region);
            let element = match face.nodes.as_slice() {
                &[a, b, c] => Element::Tria3 { id, property, nodes: [a, b, c] },
                &[a, b, c, d] => Element::Quad4 { id, property, nodes: [a, b, c, d] },
                other => {
                    return Err(WingboxError::InvalidInput(format!(
                        "face with {} nodes cannot become a planar element",
                        other.len()
                    )))
                }
            };
            elements.push(element);
        }
        for beam in &mesh.beams {
            let id = elements.len() + 1;
            let property = ShellRegion::ALL.len()
                + BeamRegion::ALL.iter().position(|r| *r == beam.region).unwrap_or(0)
                + 1;
            let (a, b) = match (mesh.node(beam.nodes[0]), mesh.node(beam.nodes[1])) {
                (Some(a), Some(b)) => (a.point(), b.point()),
                _ => {
                    return Err(WingboxError::InvalidInput(format!(
                        "beam {} references an unknown node",
                        id
                    )))
                }
            };
            elements.push(Element::Bar {
                id,
                property,
                nodes: beam.nodes,
                orientation: bar_orientation(&a, &b),
            });
        }
        Ok(elements)
    }

    /// Node ids and restrained digits of every boundary condition, in the
    /// order the conditions are given
    fn restrained_nodes(
        &self,
        spec: &StructuralSpec,
        mesh: &MeshTopology,
        attachments: &AttachmentPoints,
    ) -> WingboxResult<Vec<(usize, Vec<u8>)>> {
        let locator = NodeLocator::new(&mesh.nodes);
        let snap = |p: &Pt3, category: AttachmentCategory| -> WingboxResult<usize> {
            locator
                .locate(p, &self.radius, 0)
                .map(|(node, _)| node.id)
                .map_err(|_| {
                    WingboxError::InvalidInput(format!(
                        "no mesh node near the {} attachment point ({:.4}, {:.4}, {:.4})",
                        category.name(),
                        p.x,
                        p.y,
                        p.z
                    ))
                })
        };

        let mut restrained = Vec::new();
        for bc in &spec.boundary_conditions {
            let nodes: Vec<usize> = match bc.category {
                AttachmentCategory::RootRib => {
                    let points = mesh.root_rib_points();
                    if points.is_empty() {
                        let ids: Vec<usize> = mesh
                            .root_nodes(attachments.root_span)
                            .iter()
                            .map(|n| n.id)
                            .collect();
                        if ids.is_empty() {
                            return Err(WingboxError::InvalidInput(format!(
                                "no mesh node on the root rib plane y = {:.4}",
                                attachments.root_span
                            )));
                        }
                        ids
                    } else {
                        let mut ids = Vec::with_capacity(points.len());
                        for p in &points {
                            let id = snap(p, bc.category)?;
                            if !ids.contains(&id) {
                                ids.push(id);
                            }
                        }
                        ids
                    }
                }
                AttachmentCategory::FrontSpar => {
                    let ends = attachments.front_spar;
                    vec![snap(&ends.upper, bc.category)?, snap(&ends.lower, bc.category)?]
                }
                AttachmentCategory::RearSpar => {
                    let ends = attachments.rear_spar;
                    vec![snap(&ends.upper, bc.category)?, snap(&ends.lower, bc.category)?]
                }
            };
            debug!("{} restrains {:?} on {} nodes", bc.category.name(), bc.dofs.to_string(), nodes.len());
            restrained.extend(nodes.into_iter().map(|n| (n, bc.dofs.digits().to_vec())));
        }
        Ok(restrained)
    }
}

/// Case ids name the restraint set, load set and subcase of each case, so
/// they must be non-zero and distinct
fn check_case_ids(cases: &[LoadCase]) -> WingboxResult<()> {
    let mut seen = HashSet::with_capacity(cases.len());
    for case in cases {
        if case.id == 0 {
            return Err(WingboxError::InvalidInput(format!(
                "load case '{}' has id 0; ids start at 1",
                case.name
            )));
        }
        if !seen.insert(case.id) {
            return Err(WingboxError::InvalidInput(format!(
                "load case id {} is used by more than one case",
                case.id
            )));
        }
    }
    Ok(())
}

/// Orientation vector for a bar from `a` to `b`: global Z unless the bar is
/// nearly vertical, then global X
fn bar_orientation(a: &Pt3, b: &Pt3) -> [f64; 3] {
    let axis: Vec3 = b - a;
    let len = axis.norm();
    if len > 0.0 && (axis.z / len).abs() > 0.9 {
        [1.0, 0.0, 0.0]
    } else {
        [0.0, 0.0, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::elements::{BoundaryCondition, MeshNode};
    use crate::mesh::tests::strip_mesh;

    fn spec() -> StructuralSpec {
        StructuralSpec {
            shell_materials: ShellMaterials {
                skin: "Al2024-T3-1.27-A".into(),
                spar_web: "Al7075-T6-2.0-A".into(),
                ribs: "Al2024-T3-1.6-A".into(),
            },
            beam_materials: BeamMaterials {
                stringers: "Al7075-T6-2.0-A".into(),
                spar_caps: "Al7075-T6-4.0-A".into(),
                rib_caps: "Al2024-T3-2.0-A".into(),
            },
            sections: BeamSections {
                stringer: SectionSpec::new(&[10.0, 20.0], "dims"),
                spar_cap: SectionSpec::new(&[2e-4, 1e-9, 2e-9, 5e-10], "moms"),
                rib_cap: SectionSpec::new(&[8.0, 8.0], "dims"),
            },
            boundary_conditions: vec![
                BoundaryCondition::new(AttachmentCategory::RootRib, "123456").unwrap(),
                BoundaryCondition::new(AttachmentCategory::FrontSpar, "123").unwrap(),
            ],
            modulus: ModulusSelector::Tension,
        }
    }

    fn attachments() -> AttachmentPoints {
        AttachmentPoints {
            front_spar: SparEndpoints { upper: Pt3::new(0.0, 0.0, 0.0), lower: Pt3::new(1.0, 0.0, 0.0) },
            rear_spar: SparEndpoints { upper: Pt3::new(0.0, 1.0, 0.0), lower: Pt3::new(1.0, 1.0, 0.0) },
            root_span: 0.0,
        }
    }

    fn loads(case: usize) -> Vec<MappedLoad> {
        vec![MappedLoad { case, node: 7, lift: 1000.0, drag: 20.0, moment: -50.0 }]
    }

    #[test]
    fn test_property_ids_and_elements() {
        let resolver = MaterialResolver::embedded().unwrap();
        let cases = vec![LoadCase::fixed_alpha(1, "cruise", 2.0)];
        let model = ModelAssembler::new(&resolver)
            .assemble(&spec(), &strip_mesh(), &attachments(), &cases, &[loads(1)])
            .unwrap();

        assert_eq!(model.materials.len(), 6);
        assert_relative_eq!(model.shell_properties[0].thickness, 1.27e-3);
        assert_eq!(model.beam_properties[0].id, 4);
        assert!(matches!(model.elements[0], Element::Quad4 { property: 1, .. }));
        assert!(matches!(model.elements[1], Element::Quad4 { property: 2, .. }));
        assert!(matches!(model.elements[2], Element::Tria3 { property: 3, .. }));
        match &model.elements[3] {
            Element::Bar { id, property, orientation, .. } => {
                assert_eq!((*id, *property), (4, 5));
                assert_eq!(*orientation, LIFT_AXIS);
            }
            other => panic!("expected a bar, got {:?}", other),
        }
    }

    #[test]
    fn test_restraints_per_node_per_digit() {
        let resolver = MaterialResolver::embedded().unwrap();
        let cases = vec![LoadCase::fixed_alpha(1, "cruise", 2.0)];
        let model = ModelAssembler::new(&resolver)
            .assemble(&spec(), &strip_mesh(), &attachments(), &cases, &[loads(1)])
            .unwrap();
        // root nodes 1 and 2 with six digits; the front spar ends are the
        // same nodes and add nothing new
        assert_eq!(model.restraints.len(), 12);
        assert!(model.restraints.iter().all(|r| r.set == 1));
    }

    #[test]
    fn test_one_restraint_set_per_case() {
        let resolver = MaterialResolver::embedded().unwrap();
        let cases = vec![
            LoadCase::fixed_alpha(1, "a", 2.0),
            LoadCase::fixed_alpha(2, "b", 2.0),
            LoadCase::fixed_cl(3, "c", 0.5),
        ];
        let mapped = vec![loads(1), loads(2), loads(3)];
        let model = ModelAssembler::new(&resolver)
            .assemble(&spec(), &strip_mesh(), &attachments(), &cases, &mapped)
            .unwrap();
        let summary = model.summary();
        assert_eq!(summary.restraint_sets, 3);
        assert_eq!(summary.load_sets, 3);
        assert_eq!(summary.subcases, 3);
        for case in &cases {
            assert_eq!(model.loads_in_set(case.id).count(), 3);
        }
    }

    #[test]
    fn test_unreachable_spar_end_is_reported() {
        let resolver = MaterialResolver::embedded().unwrap();
        let mut far = attachments();
        far.front_spar.upper = Pt3::new(40.0, 0.0, 0.0);
        let mut mesh = strip_mesh();
        mesh.nodes.push(MeshNode::new(9, 2.0, 3.0, 0.0));
        let cases = vec![LoadCase::fixed_alpha(1, "cruise", 2.0)];
        let err = ModelAssembler::new(&resolver)
            .assemble(&spec(), &mesh, &far, &cases, &[loads(1)])
            .unwrap_err();
        assert!(err.to_string().contains("front_spar"));
    }

    #[test]
    fn test_case_ids_must_be_distinct_and_non_zero() {
        let resolver = MaterialResolver::embedded().unwrap();
        let assemble = |cases: &[LoadCase], mapped: &[Vec<MappedLoad>]| {
            ModelAssembler::new(&resolver).assemble(&spec(), &strip_mesh(), &attachments(), cases, mapped)
        };

        let shared = vec![LoadCase::fixed_alpha(1, "a", 2.0), LoadCase::fixed_alpha(1, "b", 4.0)];
        match assemble(&shared, &[loads(1), loads(1)]) {
            Err(WingboxError::InvalidInput(msg)) => assert!(msg.contains("id 1")),
            other => panic!("expected shared id to be rejected, got {:?}", other),
        }

        let zero = vec![LoadCase::fixed_alpha(0, "a", 2.0)];
        assert!(matches!(assemble(&zero, &[loads(0)]), Err(WingboxError::InvalidInput(_))));

        let distinct = vec![LoadCase::fixed_alpha(1, "a", 2.0), LoadCase::fixed_alpha(2, "b", 4.0)];
        let model = assemble(&distinct, &[loads(1), loads(2)]).unwrap();
        assert_eq!(model.summary().restraint_sets, 2);
    }

    #[test]
    fn test_root_rib_uses_layout_root_plane() {
        let resolver = MaterialResolver::embedded().unwrap();
        let cases = vec![LoadCase::fixed_alpha(1, "cruise", 2.0)];

        // mesh trimmed to start at y = 1: nothing lies on the root plane
        let mut mesh = strip_mesh();
        mesh.nodes.retain(|n| n.y > 0.5);
        mesh.faces.retain(|f| !f.nodes.contains(&1) && !f.nodes.contains(&2));
        mesh.beams.clear();
        let mut spec = spec();
        spec.boundary_conditions.truncate(1);
        let err = ModelAssembler::new(&resolver)
            .assemble(&spec, &mesh, &attachments(), &cases, &[loads(1)])
            .unwrap_err();
        assert!(err.to_string().contains("root rib"));

        let mut shifted = attachments();
        shifted.root_span = 1.0;
        let model = ModelAssembler::new(&resolver)
            .assemble(&spec, &mesh, &shifted, &cases, &[loads(1)])
            .unwrap();
        let nodes: HashSet<usize> = model.restraints.iter().map(|r| r.node).collect();
        assert_eq!(nodes, HashSet::from([3, 4]));
    }

    #[test]
    fn test_mapped_list_must_match_cases() {
        let resolver = MaterialResolver::embedded().unwrap();
        let cases = vec![LoadCase::fixed_alpha(1, "a", 2.0), LoadCase::fixed_alpha(2, "b", 4.0)];
        let err = ModelAssembler::new(&resolver)
            .assemble(&spec(), &strip_mesh(), &attachments(), &cases, &[loads(1)])
            .unwrap_err();
        assert!(matches!(err, WingboxError::Coherence { .. }));
    }
}
