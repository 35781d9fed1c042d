//! Wingbox Example - tapered two-panel wing, three load cases

use anyhow::Context;
use wingbox_core::prelude::*;

fn wing() -> WingDefinition {
    WingDefinition {
        planform: Planform {
            root_chord: 2.4,
            spans: vec![0.0, 4.0, 10.0],
            tapers: vec![1.0, 0.75, 0.4],
            sweeps: vec![5.0, 12.0],
            dihedrals: vec![1.5, 3.0],
            twists: vec![0.0, -1.0, -3.0],
        },
        airfoils: vec![
            AirfoilStation::new(0.0, "2415"),
            AirfoilStation::new(0.4, "23012"),
            AirfoilStation::new(1.0, "0010"),
        ],
        structure: StructuralStations {
            front_spar: vec![0.2, 0.22, 0.25],
            rear_spar: vec![0.65, 0.62, 0.6],
            ribs: vec![4, 6],
            stringers: vec![[4, 3], [3, 2]],
            rib_te_gap: 0.8,
            skin_te_gap: 0.9,
        },
        interpolation: InterpolationMode::ChordScaled,
    }
}

fn structure() -> anyhow::Result<StructuralSpec> {
    Ok(StructuralSpec {
        shell_materials: ShellMaterials {
            skin: "Al2024-T3-1.6-A".into(),
            spar_web: "Al7075-T6-2.5-A".into(),
            ribs: "Al2024-T3-1.27-A".into(),
        },
        beam_materials: BeamMaterials {
            stringers: "Al7075-T6-2.0-A".into(),
            spar_caps: "Al7075-T6-4.0-A".into(),
            rib_caps: "Al2024-T3-2.0-A".into(),
        },
        sections: BeamSections {
            stringer: SectionSpec::new(&[12.0, 20.0], "dims"),
            spar_cap: SectionSpec::new(&[30.0, 40.0], "dims"),
            rib_cap: SectionSpec::new(&[8.0, 8.0], "dims"),
        },
        boundary_conditions: vec![
            BoundaryCondition::new(AttachmentCategory::RootRib, "123456")?,
            BoundaryCondition::new(AttachmentCategory::FrontSpar, "123")?,
            BoundaryCondition::new(AttachmentCategory::RearSpar, "123")?,
        ],
        modulus: ModulusSelector::Tension,
    })
}

/// Elliptic lift distribution over both halves of the wing
fn strips(cl_root: f64, semispan: f64) -> Vec<StripRow> {
    let n = 10;
    let width = semispan / n as f64;
    (0..2 * n)
        .map(|k| {
            let yle = -semispan + width * (k as f64 + 0.5);
            let eta = (yle / semispan).abs();
            StripRow {
                yle,
                chord: 2.4 * (1.0 - 0.6 * eta),
                area: width * 2.4 * (1.0 - 0.6 * eta),
                cl: cl_root * (1.0 - eta * eta).sqrt(),
                cd: 0.008 + 0.01 * cl_root * cl_root,
                cm: -0.04,
            }
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Wingbox Example: Tapered Wing ===\n");

    let resolver = MaterialResolver::embedded().context("loading material table")?;
    let wing = wing();
    let catalog = AirfoilCatalog::new();
    let layout = WingboxLayout::build(&wing, &catalog)?;
    let mesh = MeshTopology::spar_box(&layout)?;

    println!("Layout:");
    println!("  Stations: {}", layout.stations.len());
    println!("  Ribs: {}", layout.rib_stations.len());
    println!("  Reference area: {:.3} m²", layout.reference_area);
    println!("  MAC: {:.3} m", layout.mean_aerodynamic_chord);
    println!("  Mesh: {} nodes, {} faces, {} beams\n", mesh.nodes.len(), mesh.faces.len(), mesh.beams.len());

    let semispan = wing.planform.semispan();
    let input = PipelineInput {
        wing,
        airfoil_catalog: catalog,
        structure: structure()?,
        flight: FlightCondition::new(60_000.0, 120.0, 10_000.0),
        load_cases: LoadCaseSettings {
            names: vec!["cruise".into(), "pull-up".into(), "push-over".into()],
            variables: vec!["CL".into(), "alpha".into(), "alpha".into()],
            values: vec![0.45, 8.0, -2.0],
        },
        mesh,
        aero_results: vec![strips(0.45, semispan), strips(0.95, semispan), strips(-0.15, semispan)],
        search_radius: SearchRadius::default(),
    };

    let output = Pipeline::new(&resolver).run(&input)?;

    println!("Flight:");
    println!("  q = {:.1} Pa, M = {:.3}", input.flight.dynamic_pressure(), input.flight.mach());
    println!("  Trim CL: {:.3}\n", input.flight.trim_lift_coefficient(2.0 * output.layout.reference_area));

    for (case, loads) in output.cases.iter().zip(&output.mapped_loads) {
        let lift: f64 = loads.iter().map(|l| l.lift).sum();
        let drag: f64 = loads.iter().map(|l| l.drag).sum();
        println!(
            "  Case {} '{}' ({} = {}): {} loads, L = {:.2} kN, D = {:.2} kN",
            case.id,
            case.name,
            case.mode.variable(),
            case.value,
            loads.len(),
            lift / 1000.0,
            drag / 1000.0
        );
    }

    let summary = output.model.summary();
    println!("\nModel:");
    println!("  Materials: {}", summary.materials);
    println!("  Properties: {}", summary.properties);
    println!("  Grids: {}", summary.grids);
    println!("  Elements: {}", summary.elements);
    println!("  Restraints: {} in {} sets", summary.restraints, summary.restraint_sets);
    println!("  Forces: {}, moments: {} in {} sets", summary.forces, summary.moments, summary.load_sets);
    println!("  Subcases: {}", summary.subcases);

    println!("\n=== Assembly Complete ===");
    Ok(())
}
