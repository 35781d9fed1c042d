use std::collections::HashSet;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use wingbox_core::model::{Element, NodalLoad, StructuralModel};

/// Longest title or label the case-control section accepts
const MAX_LABEL: usize = 64;

/// Writes a linear-static free-field bulk-data deck from an assembled model.
///
/// Subcase `k` references restraint set `k` and load set `k`; materials,
/// properties, grids and elements are shared by every subcase.
pub struct BulkDataGenerator;

impl BulkDataGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Real field that always carries a decimal point and an exponent
    fn real(value: f64) -> String {
        format!("{:.6E}", value)
    }

    fn label(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control())
            .take(MAX_LABEL)
            .collect::<String>()
            .trim()
            .to_string()
    }

    fn check(model: &StructuralModel) -> Result<(), GeneratorError> {
        if model.grids.is_empty() {
            return Err(GeneratorError::GenerationError("Model has no grids".to_string()));
        }
        if model.subcases.is_empty() {
            return Err(GeneratorError::GenerationError("Model has no subcases".to_string()));
        }
        let properties: HashSet<usize> = model
            .shell_properties
            .iter()
            .map(|p| p.id)
            .chain(model.beam_properties.iter().map(|p| p.id))
            .collect();
        for element in &model.elements {
            let property = match element {
                Element::Tria3 { property, .. }
                | Element::Quad4 { property, .. }
                | Element::Bar { property, .. } => *property,
            };
            if !properties.contains(&property) {
                return Err(GeneratorError::GenerationError(format!(
                    "Element {} references missing property {}",
                    element.id(),
                    property
                )));
            }
        }
        Ok(())
    }

    pub fn generate(&self, model: &StructuralModel) -> Result<String, GeneratorError> {
        Self::check(model)?;
        let mut deck = String::new();

        // 1. Executive and case control
        let title = Self::label(&model.title);
        writeln!(deck, "$ {}", title)?;
        writeln!(deck, "SOL 101")?;
        writeln!(deck, "CEND")?;
        writeln!(deck, "TITLE = {}", title)?;
        writeln!(deck, "ECHO = NONE")?;
        writeln!(deck, "DISPLACEMENT(PUNCH) = ALL")?;
        writeln!(deck, "SPCFORCES(PRINT) = ALL")?;
        writeln!(deck, "OLOAD(PRINT) = ALL")?;
        for subcase in &model.subcases {
            writeln!(deck, "SUBCASE {}", subcase.id)?;
            writeln!(deck, "  LABEL = {}", Self::label(&subcase.label))?;
            writeln!(deck, "  SPC = {}", subcase.restraint_set)?;
            writeln!(deck, "  LOAD = {}", subcase.load_set)?;
        }

        // 2. Bulk data
        writeln!(deck, "BEGIN BULK")?;
        writeln!(deck, "PARAM,POST,-1")?;
        writeln!(deck, "PARAM,AUTOSPC,YES")?;
        writeln!(deck, "PARAM,GRDPNT,0")?;

        writeln!(deck, "$ Materials")?;
        for mat in &model.materials {
            writeln!(deck, "$ {}", mat.source)?;
            writeln!(
                deck,
                "MAT1,{},{},{},{},{}",
                mat.id,
                Self::real(mat.e),
                Self::real(mat.g),
                Self::real(mat.nu),
                Self::real(mat.rho)
            )?;
        }

        writeln!(deck, "$ Properties")?;
        for prop in &model.shell_properties {
            // membrane, bending and transverse shear share one material
            writeln!(
                deck,
                "PSHELL,{},{},{},{},,{}",
                prop.id,
                prop.material,
                Self::real(prop.thickness),
                prop.material,
                prop.material
            )?;
        }
        for prop in &model.beam_properties {
            let s = &prop.section;
            writeln!(
                deck,
                "PBAR,{},{},{},{},{},{}",
                prop.id,
                prop.material,
                Self::real(s.area),
                Self::real(s.i1),
                Self::real(s.i2),
                Self::real(s.j)
            )?;
        }

        writeln!(deck, "$ Grids")?;
        for grid in &model.grids {
            writeln!(
                deck,
                "GRID,{},,{},{},{}",
                grid.id,
                Self::real(grid.x),
                Self::real(grid.y),
                Self::real(grid.z)
            )?;
        }

        writeln!(deck, "$ Elements")?;
        for element in &model.elements {
            match element {
                Element::Tria3 { id, property, nodes } => {
                    writeln!(deck, "CTRIA3,{},{},{},{},{}", id, property, nodes[0], nodes[1], nodes[2])?
                }
                Element::Quad4 { id, property, nodes } => writeln!(
                    deck,
                    "CQUAD4,{},{},{},{},{},{}",
                    id, property, nodes[0], nodes[1], nodes[2], nodes[3]
                )?,
                Element::Bar { id, property, nodes, orientation } => writeln!(
                    deck,
                    "CBAR,{},{},{},{},{},{},{}",
                    id,
                    property,
                    nodes[0],
                    nodes[1],
                    Self::real(orientation[0]),
                    Self::real(orientation[1]),
                    Self::real(orientation[2])
                )?,
            }
        }

        writeln!(deck, "$ Restraints")?;
        for (set, node, components) in Self::grouped_restraints(model) {
            writeln!(deck, "SPC1,{},{},{}", set, components, node)?;
        }

        writeln!(deck, "$ Loads")?;
        for load in &model.forces {
            Self::write_load(&mut deck, "FORCE", load)?;
        }
        for load in &model.moments {
            Self::write_load(&mut deck, "MOMENT", load)?;
        }

        writeln!(deck, "ENDDATA")?;

        tracing::debug!(
            "Generated deck: {} grids, {} elements, {} subcases, {} bytes",
            model.grids.len(),
            model.elements.len(),
            model.subcases.len(),
            deck.len()
        );
        Ok(deck)
    }

    fn write_load(deck: &mut String, card: &str, load: &NodalLoad) -> Result<(), GeneratorError> {
        writeln!(
            deck,
            "{},{},{},0,{},{},{},{}",
            card,
            load.set,
            load.node,
            Self::real(load.magnitude),
            Self::real(load.direction[0]),
            Self::real(load.direction[1]),
            Self::real(load.direction[2])
        )?;
        Ok(())
    }

    /// One `(set, node, components)` entry per restrained node of a set,
    /// components in ascending order, nodes in first-seen order
    fn grouped_restraints(model: &StructuralModel) -> Vec<(usize, usize, String)> {
        let mut grouped: Vec<(usize, usize, Vec<u8>)> = Vec::new();
        for r in &model.restraints {
            match grouped.iter_mut().find(|(set, node, _)| *set == r.set && *node == r.node) {
                Some((_, _, dofs)) => {
                    if !dofs.contains(&r.dof) {
                        dofs.push(r.dof);
                    }
                }
                None => grouped.push((r.set, r.node, vec![r.dof])),
            }
        }
        grouped
            .into_iter()
            .map(|(set, node, mut dofs)| {
                dofs.sort_unstable();
                let components = dofs.iter().map(|d| d.to_string()).collect();
                (set, node, components)
            })
            .collect()
    }
}

/// Write `content` to `path` through a temporary file in the same
/// directory, so a reader never sees a partial deck
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| GeneratorError::IoError(e.error))?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Generation error: {0}")]
    GenerationError(String),
    #[error("Formatting error: {0}")]
    FormatError(#[from] std::fmt::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use wingbox_core::elements::SectionProperties;
    use wingbox_core::mesh::{BeamRegion, ShellRegion};
    use wingbox_core::model::{
        BeamProperty, GridPoint, MaterialCard, Restraint, ShellProperty, Subcase,
    };

    fn model() -> StructuralModel {
        let grid = |id, y| GridPoint { id, x: 0.0, y, z: 0.0 };
        let load = |set, magnitude, direction| NodalLoad { set, node: 3, magnitude, direction };
        StructuralModel {
            title: "Two-case strip".to_string(),
            materials: vec![MaterialCard {
                id: 1,
                source: "Al2024-T3-1.27-A".to_string(),
                e: 72.4e9,
                g: 27.6e9,
                nu: 0.33,
                rho: 2768.0,
            }],
            shell_properties: vec![ShellProperty {
                id: 1,
                material: 1,
                region: ShellRegion::Skin,
                thickness: 1.27e-3,
            }],
            beam_properties: vec![BeamProperty {
                id: 4,
                material: 1,
                region: BeamRegion::SparCap,
                section: SectionProperties { area: 2e-4, i1: 1e-9, i2: 2e-9, j: 5e-10 },
            }],
            grids: vec![grid(1, 0.0), grid(2, 0.0), grid(3, 1.0), grid(4, 1.0)],
            elements: vec![
                Element::Quad4 { id: 1, property: 1, nodes: [1, 2, 4, 3] },
                Element::Bar { id: 2, property: 4, nodes: [1, 3], orientation: [0.0, 0.0, 1.0] },
            ],
            restraints: [1, 2]
                .into_iter()
                .flat_map(|set| {
                    [(1, 1), (1, 2), (1, 3), (2, 3)]
                        .into_iter()
                        .map(move |(node, dof)| Restraint { set, node, dof })
                })
                .collect(),
            forces: vec![load(1, 500.0, [0.0, 0.0, 1.0]), load(2, 500.0, [0.0, 0.0, 1.0])],
            moments: vec![load(1, -20.0, [0.0, 1.0, 0.0])],
            subcases: vec![
                Subcase { id: 1, label: "cruise".into(), restraint_set: 1, load_set: 1 },
                Subcase { id: 2, label: "cruise again".into(), restraint_set: 2, load_set: 2 },
            ],
        }
    }

    #[test]
    fn test_case_control_per_subcase() {
        let deck = BulkDataGenerator::new().generate(&model()).unwrap();
        assert!(deck.contains("SOL 101"));
        assert!(deck.contains("SUBCASE 1\n  LABEL = cruise\n  SPC = 1\n  LOAD = 1\n"));
        assert!(deck.contains("SUBCASE 2\n  LABEL = cruise again\n  SPC = 2\n  LOAD = 2\n"));
        let begin = deck.find("BEGIN BULK").unwrap();
        assert!(deck.find("SUBCASE 2").unwrap() < begin);
        assert!(deck.trim_end().ends_with("ENDDATA"));
    }

    #[test]
    fn test_cards() {
        let deck = BulkDataGenerator::new().generate(&model()).unwrap();
        assert!(deck.contains("MAT1,1,7.240000E10,2.760000E10,3.300000E-1,2.768000E3\n"));
        assert!(deck.contains("PSHELL,1,1,1.270000E-3,1,,1\n"));
        assert!(deck.contains("PBAR,4,1,2.000000E-4,"));
        assert!(deck.contains("GRID,3,,0.000000E0,1.000000E0,0.000000E0\n"));
        assert!(deck.contains("CQUAD4,1,1,1,2,4,3\n"));
        assert!(deck.contains("CBAR,2,4,1,3,0.000000E0,0.000000E0,1.000000E0\n"));
        assert!(deck.contains("FORCE,2,3,0,5.000000E2,0.000000E0,0.000000E0,1.000000E0\n"));
        assert!(deck.contains("MOMENT,1,3,0,-2.000000E1,"));
    }

    #[test]
    fn test_restraints_grouped_per_set_and_node() {
        let deck = BulkDataGenerator::new().generate(&model()).unwrap();
        let spc: Vec<&str> = deck.lines().filter(|l| l.starts_with("SPC1")).collect();
        assert_eq!(spc, vec!["SPC1,1,123,1", "SPC1,1,3,2", "SPC1,2,123,1", "SPC1,2,3,2"]);
    }

    #[test]
    fn test_missing_property_rejected() {
        let mut model = model();
        model.elements.push(Element::Tria3 { id: 3, property: 9, nodes: [1, 2, 3] });
        let err = BulkDataGenerator::new().generate(&model).unwrap_err();
        assert!(err.to_string().contains("property 9"));
    }

    #[test]
    fn test_atomic_write_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wingbox.bdf");
        std::fs::write(&path, "old").unwrap();
        write_atomic(&path, "SOL 101\nENDDATA\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "SOL 101\nENDDATA\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
