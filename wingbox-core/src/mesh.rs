//! Mesh topology supplied by the meshing collaborator

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::elements::MeshNode;
use crate::error::{WingboxError, WingboxResult};
use crate::geometry::WingboxLayout;
use crate::math::{bracket, Pt3};

/// Nodes closer than this to the root plane belong to the root rib
pub const ROOT_TOLERANCE: f64 = 1e-6;

/// Shell property region of a face
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellRegion {
    #[default]
    Skin,
    SparWeb,
    Rib,
}

impl ShellRegion {
    pub const ALL: [ShellRegion; 3] = [ShellRegion::Skin, ShellRegion::SparWeb, ShellRegion::Rib];
}

/// Beam property region of a line element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeamRegion {
    Stringer,
    SparCap,
    RibCap,
}

impl BeamRegion {
    pub const ALL: [BeamRegion; 3] = [BeamRegion::Stringer, BeamRegion::SparCap, BeamRegion::RibCap];
}

/// Planar face, three or four node ids in winding order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshFace {
    pub nodes: Vec<usize>,
    #[serde(default)]
    pub region: ShellRegion,
}

/// Two-node line element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshBeam {
    pub nodes: [usize; 2],
    pub region: BeamRegion,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshTopology {
    pub nodes: Vec<MeshNode>,
    pub faces: Vec<MeshFace>,
    #[serde(default)]
    pub beams: Vec<MeshBeam>,
    /// Boundary-representation vertices of the root rib, when the geometry
    /// collaborator provides them
    #[serde(default)]
    pub root_rib_vertices: Vec<Pt3>,
}

impl MeshTopology {
    pub fn validate(&self) -> WingboxResult<()> {
        if self.nodes.is_empty() {
            return Err(WingboxError::InvalidInput("mesh has no nodes".into()));
        }
        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if node.id == 0 || !ids.insert(node.id) {
                return Err(WingboxError::InvalidInput(format!(
                    "mesh node id {} is zero or repeated",
                    node.id
                )));
            }
        }
        for (i, face) in self.faces.iter().enumerate() {
            if !(3..=4).contains(&face.nodes.len()) {
                return Err(WingboxError::InvalidInput(format!(
                    "face {} has {} nodes, expected 3 or 4",
                    i,
                    face.nodes.len()
                )));
            }
            if let Some(missing) = face.nodes.iter().find(|id| !ids.contains(*id)) {
                return Err(WingboxError::InvalidInput(format!(
                    "face {} references unknown node {}",
                    i, missing
                )));
            }
        }
        for (i, beam) in self.beams.iter().enumerate() {
            if let Some(missing) = beam.nodes.iter().find(|id| !ids.contains(*id)) {
                return Err(WingboxError::InvalidInput(format!(
                    "beam {} references unknown node {}",
                    i, missing
                )));
            }
            if beam.nodes[0] == beam.nodes[1] {
                return Err(WingboxError::InvalidInput(format!("beam {} has coincident ends", i)));
            }
        }
        Ok(())
    }

    pub fn node(&self, id: usize) -> Option<&MeshNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes lying on the root plane `y = root_span`, coincident duplicates
    /// dropped
    pub fn root_nodes(&self, root_span: f64) -> Vec<&MeshNode> {
        let mut found: Vec<&MeshNode> = Vec::new();
        for node in self.nodes.iter().filter(|n| (n.y - root_span).abs() <= ROOT_TOLERANCE) {
            let duplicate = found
                .iter()
                .any(|f| f.distance_to(&node.point()) <= ROOT_TOLERANCE);
            if !duplicate {
                found.push(node);
            }
        }
        found
    }

    /// Root-rib vertices without the two trailing-edge skin vertices, which
    /// the skin edge duplicates
    pub fn root_rib_points(&self) -> Vec<Pt3> {
        let mut points = self.root_rib_vertices.clone();
        if points.len() <= 2 {
            return points;
        }
        for _ in 0..2 {
            let aft = points
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.x.total_cmp(&b.1.x))
                .map(|(i, _)| i);
            if let Some(i) = aft {
                points.remove(i);
            }
        }
        points
    }

    /// Coarse quad mesh of the spar box with a node ring at every rib.
    ///
    /// Each ring holds the upper front, upper rear, lower rear and lower
    /// front spar corners. Skins and webs span neighbouring rings, every
    /// ring carries a rib face, caps run along the spars and round the ribs.
    pub fn spar_box(layout: &WingboxLayout) -> WingboxResult<Self> {
        let semispan = layout.rib_stations.last().copied().unwrap_or(0.0);
        if !(semispan > 0.0) || layout.stations.len() < 2 {
            return Err(WingboxError::InvalidInput("layout has no span to mesh".into()));
        }
        let fractions: Vec<f64> = layout.stations.iter().map(|s| s.fraction).collect();
        let corners: Vec<[Pt3; 4]> = layout
            .stations
            .iter()
            .map(|s| {
                let (fu, fl) = s.skin_points(s.front_spar);
                let (ru, rl) = s.skin_points(s.rear_spar);
                [fu, ru, rl, fl]
            })
            .collect();

        let mut mesh = MeshTopology::default();
        for (k, y) in layout.rib_stations.iter().enumerate() {
            let s = y / semispan;
            let i = bracket(&fractions, s).ok_or_else(|| {
                WingboxError::out_of_range("rib_stations", format!("rib at {} is outside the wing", y))
            })?;
            let t = ((s - fractions[i]) / (fractions[i + 1] - fractions[i])).clamp(0.0, 1.0);
            for c in 0..4 {
                let (a, b) = (corners[i][c], corners[i + 1][c]);
                let p = a + (b - a) * t;
                mesh.nodes.push(MeshNode::new(4 * k + c + 1, p.x, p.y, p.z));
            }
        }

        let rings = layout.rib_stations.len();
        let id = |ring: usize, corner: usize| 4 * ring + corner + 1;
        for k in 0..rings {
            mesh.faces.push(MeshFace {
                nodes: vec![id(k, 0), id(k, 1), id(k, 2), id(k, 3)],
                region: ShellRegion::Rib,
            });
            mesh.beams.push(MeshBeam { nodes: [id(k, 0), id(k, 1)], region: BeamRegion::RibCap });
            mesh.beams.push(MeshBeam { nodes: [id(k, 3), id(k, 2)], region: BeamRegion::RibCap });
            if k + 1 == rings {
                continue;
            }
            let skins = [((0, 1), ShellRegion::Skin), ((3, 2), ShellRegion::Skin)];
            let webs = [((0, 3), ShellRegion::SparWeb), ((1, 2), ShellRegion::SparWeb)];
            for ((a, b), region) in skins.into_iter().chain(webs) {
                mesh.faces.push(MeshFace {
                    nodes: vec![id(k, a), id(k, b), id(k + 1, b), id(k + 1, a)],
                    region,
                });
            }
            for c in 0..4 {
                mesh.beams.push(MeshBeam { nodes: [id(k, c), id(k + 1, c)], region: BeamRegion::SparCap });
            }
        }
        Ok(mesh)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two quads and a triangle on a flat strip; root at y = 0
    pub(crate) fn strip_mesh() -> MeshTopology {
        MeshTopology {
            nodes: vec![
                MeshNode::new(1, 0.0, 0.0, 0.0),
                MeshNode::new(2, 1.0, 0.0, 0.0),
                MeshNode::new(3, 0.0, 1.0, 0.0),
                MeshNode::new(4, 1.0, 1.0, 0.0),
                MeshNode::new(5, 0.0, 2.0, 0.0),
                MeshNode::new(6, 1.0, 2.0, 0.0),
                MeshNode::new(7, 0.5, 3.0, 0.0),
            ],
            faces: vec![
                MeshFace { nodes: vec![1, 2, 4, 3], region: ShellRegion::Skin },
                MeshFace { nodes: vec![3, 4, 6, 5], region: ShellRegion::SparWeb },
                MeshFace { nodes: vec![5, 6, 7], region: ShellRegion::Rib },
            ],
            beams: vec![MeshBeam { nodes: [1, 3], region: BeamRegion::SparCap }],
            root_rib_vertices: Vec::new(),
        }
    }

    #[test]
    fn test_valid_mesh() {
        assert!(strip_mesh().validate().is_ok());
    }

    #[test]
    fn test_bad_faces_rejected() {
        let mut mesh = strip_mesh();
        mesh.faces[0].nodes = vec![1, 2];
        assert!(mesh.validate().is_err());

        let mut mesh = strip_mesh();
        mesh.faces[2].nodes[2] = 99;
        assert!(mesh.validate().is_err());

        let mut mesh = strip_mesh();
        mesh.nodes[3].id = 1;
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_root_nodes() {
        let mut mesh = strip_mesh();
        mesh.nodes.push(MeshNode::new(8, 0.0, 0.0, 0.0));
        let ids: Vec<usize> = mesh.root_nodes(0.0).iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2]);

        // a mesh that stops short of the root has no root nodes
        let ids: Vec<usize> = mesh.root_nodes(-0.5).iter().map(|n| n.id).collect();
        assert!(ids.is_empty());
        let ids: Vec<usize> = mesh.root_nodes(1.0).iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn test_spar_box_mesh() {
        use crate::geometry::layout::tests::rectangular_wing;
        use crate::geometry::AirfoilCatalog;

        let layout = WingboxLayout::build(&rectangular_wing(), &AirfoilCatalog::new()).unwrap();
        let mesh = MeshTopology::spar_box(&layout).unwrap();
        let rings = layout.rib_stations.len();
        assert_eq!(mesh.nodes.len(), 4 * rings);
        assert_eq!(mesh.faces.len(), rings + 4 * (rings - 1));
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.root_nodes(layout.front_spar_root.upper.y).len(), 4);
        assert!(mesh.nodes[0].distance_to(&layout.front_spar_root.upper) < 1e-12);
    }

    #[test]
    fn test_root_rib_points_drop_aft_pair() {
        let mut mesh = strip_mesh();
        mesh.root_rib_vertices = vec![
            Pt3::new(0.2, 0.0, 0.05),
            Pt3::new(0.9, 0.0, 0.01),
            Pt3::new(0.2, 0.0, -0.05),
            Pt3::new(0.9, 0.0, -0.01),
            Pt3::new(0.6, 0.0, 0.04),
        ];
        let points = mesh.root_rib_points();
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.x < 0.9));
    }
}
