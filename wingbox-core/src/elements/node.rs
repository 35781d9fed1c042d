//! Mesh node - a numbered point of the structural mesh

use serde::{Deserialize, Serialize};

use crate::math::Pt3;

/// A node supplied by the meshing collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshNode {
    /// Grid id written to the model (1-based, unique)
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl MeshNode {
    pub fn new(id: usize, x: f64, y: f64, z: f64) -> Self {
        Self { id, x, y, z }
    }

    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn point(&self) -> Pt3 {
        Pt3::new(self.x, self.y, self.z)
    }

    /// Euclidean distance to a point
    pub fn distance_to(&self, p: &Pt3) -> f64 {
        let dx = p.x - self.x;
        let dy = p.y - self.y;
        let dz = p.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}
