//! Transfer of located aerodynamic loads onto structural mesh nodes

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::aero::StationLoad;
use super::load_case::LoadCase;
use crate::elements::MeshNode;
use crate::error::{WingboxError, WingboxResult};
use crate::math::Pt3;

/// Expanding search radius: starts at `initial`, multiplied by `growth`
/// until a node is inside or `max` is exceeded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchRadius {
    pub initial: f64,
    pub growth: f64,
    pub max: f64,
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self {
            initial: 1e-7,
            growth: 10.0,
            max: 1.0,
        }
    }
}

impl SearchRadius {
    pub fn validate(&self) -> WingboxResult<()> {
        if !(self.initial > 0.0 && self.growth > 1.0 && self.max >= self.initial) {
            return Err(WingboxError::out_of_range(
                "search_radius",
                format!(
                    "need initial > 0, growth > 1 and max >= initial, got {:?}",
                    self
                ),
            ));
        }
        Ok(())
    }
}

/// Nearest-node lookup over a fixed node set
#[derive(Debug, Clone)]
pub struct NodeLocator<'a> {
    nodes: &'a [MeshNode],
}

impl<'a> NodeLocator<'a> {
    pub fn new(nodes: &'a [MeshNode]) -> Self {
        Self { nodes }
    }

    /// Index and distance of the closest node. Ties keep the first index.
    pub fn nearest(&self, p: &Pt3) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, node) in self.nodes.iter().enumerate() {
            let d = node.distance_to(p);
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((i, d)),
            }
        }
        best
    }

    /// Closest node within the expanding radius.
    ///
    /// Returns the node and the radius that captured it; fails with the
    /// point's coordinates once the radius passes its cap.
    pub fn locate(&self, p: &Pt3, radius: &SearchRadius, case: usize) -> WingboxResult<(&'a MeshNode, f64)> {
        let failure = || WingboxError::Mapping {
            case,
            point: [p.x, p.y, p.z],
            radius: radius.max,
        };
        let (index, distance) = self.nearest(p).ok_or_else(failure)?;

        let mut r = radius.initial;
        while distance > r {
            if r >= radius.max {
                return Err(failure());
            }
            let next = (r * radius.growth).min(radius.max);
            warn!(
                "Case {}: no node within {:.1e} of ({:.4}, {:.4}, {:.4}), widening to {:.1e}",
                case, r, p.x, p.y, p.z, next
            );
            r = next;
        }
        Ok((&self.nodes[index], r))
    }
}

/// A station load attached to a structural node for one case
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MappedLoad {
    pub case: usize,
    pub node: usize,
    pub lift: f64,
    pub drag: f64,
    pub moment: f64,
}

/// Maps each case's station loads to the nearest mesh node
#[derive(Debug, Clone)]
pub struct LoadMapper<'a> {
    locator: NodeLocator<'a>,
    radius: SearchRadius,
}

impl<'a> LoadMapper<'a> {
    pub fn new(nodes: &'a [MeshNode], radius: SearchRadius) -> Self {
        Self {
            locator: NodeLocator::new(nodes),
            radius,
        }
    }

    /// Mapped loads of one case, one per station load, in input order
    pub fn map_case(&self, case: &LoadCase, loads: &[StationLoad]) -> WingboxResult<Vec<MappedLoad>> {
        self.radius.validate()?;
        loads
            .iter()
            .map(|load| {
                let (node, r) = self.locator.locate(&load.point, &self.radius, case.id)?;
                debug!(
                    "Case {}: load at y = {:.4} -> node {} (radius {:.1e})",
                    case.id, load.point.y, node.id, r
                );
                Ok(MappedLoad {
                    case: case.id,
                    node: node.id,
                    lift: load.lift,
                    drag: load.drag,
                    moment: load.moment,
                })
            })
            .collect()
    }
}
