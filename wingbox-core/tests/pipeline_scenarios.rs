use approx::assert_relative_eq;
use std::io::Write;
use wingbox_core::math::Pt3;
use wingbox_core::model::NodalLoad;
use wingbox_core::prelude::*;

fn wing() -> WingDefinition {
    WingDefinition {
        planform: Planform {
            root_chord: 2.0,
            spans: vec![0.0, 5.0, 10.0],
            tapers: vec![1.0, 0.8, 0.5],
            sweeps: vec![0.0, 10.0],
            dihedrals: vec![0.0, 2.0],
            twists: vec![0.0, 0.0, -2.0],
        },
        airfoils: vec![
            AirfoilStation::new(0.0, "0012"),
            AirfoilStation::new(0.3, "2412"),
            AirfoilStation::new(1.0, "0010"),
        ],
        structure: StructuralStations {
            front_spar: vec![0.2, 0.2, 0.25],
            rear_spar: vec![0.65, 0.6, 0.6],
            ribs: vec![5, 5],
            stringers: vec![[3, 2], [2, 2]],
            rib_te_gap: 0.8,
            skin_te_gap: 0.9,
        },
        interpolation: InterpolationMode::ChordScaled,
    }
}

fn structure() -> StructuralSpec {
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
            BoundaryCondition::new(AttachmentCategory::RearSpar, "3").unwrap(),
        ],
        modulus: ModulusSelector::Tension,
    }
}

fn strips(cl: f64) -> Vec<StripRow> {
    [-7.5, -2.5, 1.25, 3.75, 6.25, 8.75]
        .into_iter()
        .map(|yle| StripRow { yle, chord: 1.5, area: 3.75, cl, cd: 0.012, cm: -0.05 })
        .collect()
}

fn pipeline_input(aero_results: Vec<Vec<StripRow>>) -> PipelineInput {
    let wing = wing();
    let layout = WingboxLayout::build(&wing, &AirfoilCatalog::new()).unwrap();
    let mesh = MeshTopology::spar_box(&layout).unwrap();
    PipelineInput {
        wing,
        airfoil_catalog: AirfoilCatalog::new(),
        structure: structure(),
        flight: FlightCondition::new(5000.0, 70.0, 5000.0),
        load_cases: LoadCaseSettings {
            names: vec!["cruise".into(), "cruise repeat".into(), "gust".into()],
            variables: vec!["alpha".into(), "alpha".into(), "CL".into()],
            values: vec![2.0, 2.0, 0.9],
        },
        mesh,
        aero_results,
        search_radius: SearchRadius::default(),
    }
}

#[test]
fn interpolation_is_chord_scaled() {
    let planform = Planform {
        root_chord: 4.0,
        spans: vec![0.0, 10.0, 20.0],
        tapers: vec![1.0, 0.5, 0.25],
        sweeps: vec![0.0, 0.0],
        dihedrals: vec![0.0, 0.0],
        twists: vec![0.0, 0.0, 0.0],
    };
    let interpolator = StationInterpolator::from_planform(&planform).unwrap();
    let s = 6.0 / planform.semispan();
    assert_relative_eq!(s, 0.3);

    let uniform = interpolator.fraction_at("front_spar", &[0.25, 0.25, 0.25], s).unwrap();
    assert_relative_eq!(uniform, 0.25, epsilon = 1e-12);

    // absolute position 0.4 * 0.2 * 1.0 + 0.6 * 0.3 * 0.5 = 0.17 over a local taper of 0.7
    let tapered = interpolator.fraction_at("front_spar", &[0.2, 0.3, 0.25], s).unwrap();
    assert_relative_eq!(tapered, 0.17 / 0.7, epsilon = 1e-12);

    let naive = interpolator
        .clone()
        .with_mode(InterpolationMode::Fractional)
        .fraction_at("front_spar", &[0.2, 0.3, 0.25], s)
        .unwrap();
    assert_relative_eq!(naive, 0.26, epsilon = 1e-12);
    assert!((tapered - naive).abs() > 1e-3);
}

#[test]
fn material_resolution_from_fixture_table() {
    let mut fixture = tempfile::NamedTempFile::new().unwrap();
    writeln!(fixture, "Spec,Name,Temper,tmin,tmax,Basis,Et,Ec,G,nu,rho,u_sigma_t,y_sigma_t,y_sigma_c,units").unwrap();
    writeln!(fixture, "FX-1,Al2024,T3,1.0,1.5,A,72000,73000,27500,0.33,2780,440,325,270,si").unwrap();
    writeln!(fixture, "FX-2,Al2024,T3,1.0,1.5,B,73000,74000,28000,0.33,2780,450,330,275,si").unwrap();
    fixture.flush().unwrap();

    let resolver = MaterialResolver::load(fixture.path()).unwrap();
    let mat = resolver.resolve("Al2024-T3-1.27-A").unwrap();
    assert_eq!(mat.spec, "FX-1");
    assert_relative_eq!(mat.thickness, 1.27e-3);
    assert_relative_eq!(mat.e_tension, 72e9);
    assert_relative_eq!(mat.e_compression, 73e9);
    assert_relative_eq!(mat.g, 27.5e9);
    assert_relative_eq!(mat.nu, 0.33);
    assert_relative_eq!(mat.rho, 2780.0);

    let err = resolver.resolve("Al2024-T3-1.5-A").unwrap_err();
    assert!(matches!(
        err,
        WingboxError::InvalidMaterial { field: MaterialField::Thickness, .. }
    ));
}

#[test]
fn section_dims_and_moms() {
    let rect = CrossSection::from_values(&[10.0, 20.0], "dims").unwrap();
    let props = rect.properties();
    let (w, h) = (10e-3_f64, 20e-3_f64);
    assert_relative_eq!(props.area, 200e-6, epsilon = 1e-15);
    assert_relative_eq!(props.i1, w.powi(3) * h / 12.0, epsilon = 1e-18);
    assert_relative_eq!(props.i2, h.powi(3) * w / 12.0, epsilon = 1e-18);
    assert!(props.j > 0.0 && props.j < props.i1 + props.i2);

    let values = [3.1e-4, 1.2e-8, 4.5e-8, 2.2e-9];
    let moms = CrossSection::from_values(&values, "moms").unwrap().properties();
    assert_eq!([moms.area, moms.i1, moms.i2, moms.j], values);

    assert!(CrossSection::from_values(&[1.0, 2.0, 3.0], "dims").is_err());
    assert!(CrossSection::from_values(&[1.0, 2.0], "moms").is_err());
    assert!(CrossSection::from_values(&[1.0, 2.0], "polar").is_err());
}

#[test]
fn nearest_node_tie_break_is_first_encountered() {
    let left = MeshNode::new(1, -0.5, 2.0, 0.0);
    let right = MeshNode::new(2, 0.5, 2.0, 0.0);
    let far = MeshNode::new(3, 0.0, 9.0, 0.0);
    let point = Pt3::new(0.0, 2.0, 0.0);
    let radius = SearchRadius::default();

    let forward = vec![left, right, far];
    let reversed = vec![far, right, left];

    let (first, _) = NodeLocator::new(&forward).locate(&point, &radius, 1).unwrap();
    let (second, _) = NodeLocator::new(&reversed).locate(&point, &radius, 1).unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);

    // the rule picks the earliest of the tied nodes in either ordering
    let (i, d) = NodeLocator::new(&forward).nearest(&point).unwrap();
    let (j, e) = NodeLocator::new(&reversed).nearest(&point).unwrap();
    assert_eq!((i, j), (0, 1));
    assert_relative_eq!(d, e);
}

#[test]
fn mapping_fails_beyond_radius_cap() {
    let nodes = vec![MeshNode::new(1, 0.0, 0.0, 0.0)];
    let mapper = LoadMapper::new(&nodes, SearchRadius::default());
    let case = LoadCase::fixed_alpha(4, "far", 1.0);
    let load = StationLoad {
        point: Pt3::new(0.0, 5.0, 0.0),
        lift: 1.0,
        drag: 0.0,
        moment: 0.0,
    };
    match mapper.map_case(&case, &[load]) {
        Err(WingboxError::Mapping { case, point, .. }) => {
            assert_eq!(case, 4);
            assert_relative_eq!(point[1], 5.0);
        }
        other => panic!("expected a mapping failure, got {:?}", other),
    }
}

#[test]
fn rib_count_coherence_checked_before_geometry() {
    let mut input = pipeline_input(vec![strips(0.5), strips(0.5), strips(0.9)]);
    input.wing.planform = Planform {
        root_chord: 5.0,
        spans: vec![0.0, 8.0, 13.0, 20.0],
        tapers: vec![1.0, 0.6, 0.35, 0.2],
        sweeps: vec![30.0, 40.0, 50.0],
        dihedrals: vec![3.0, 5.0, 10.0],
        twists: vec![2.0, 0.0, -1.0, -3.0],
    };
    input.wing.structure.front_spar = vec![0.2, 0.2, 0.2, 0.2];
    input.wing.structure.rear_spar = vec![0.6, 0.6, 0.6, 0.6];
    input.wing.structure.stringers = vec![[2, 2]; 3];
    input.wing.structure.ribs = vec![4, 4];
    // later checks would fail too; the list mismatch must win
    input.wing.airfoils[1] = AirfoilStation::new(0.3, "missing-section");
    input.mesh = MeshTopology::default();

    let resolver = MaterialResolver::embedded().unwrap();
    match Pipeline::new(&resolver).run(&input) {
        Err(WingboxError::Coherence { quantity, expected, found }) => {
            assert_eq!(quantity, "ribs");
            assert_eq!(expected, 3);
            assert_eq!(found, 2);
        }
        other => panic!("expected a coherence error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn load_case_lists_must_match() {
    let mut input = pipeline_input(vec![strips(0.5), strips(0.5), strips(0.9)]);
    input.load_cases.values.pop();
    let resolver = MaterialResolver::embedded().unwrap();
    let err = Pipeline::new(&resolver).validate(&input).unwrap_err();
    assert!(matches!(err, WingboxError::Coherence { .. }));
    assert!(err.to_string().contains("load_cases"));
}

#[test]
fn reflexed_airfoil_code_fails_validation() {
    let mut input = pipeline_input(vec![strips(0.5), strips(0.5), strips(0.9)]);
    input.wing.airfoils[1] = AirfoilStation::new(0.3, "23112");
    let resolver = MaterialResolver::embedded().unwrap();
    match Pipeline::new(&resolver).validate(&input) {
        Err(WingboxError::OutOfRange { field, message }) => {
            assert_eq!(field, "airfoil");
            assert!(message.contains("23112"));
        }
        other => panic!("expected an airfoil range error, got {:?}", other),
    }
}

#[test]
fn each_case_gets_its_own_subcase() {
    let input = pipeline_input(vec![strips(0.5), strips(0.5), strips(0.9)]);
    let resolver = MaterialResolver::embedded().unwrap();
    let output = Pipeline::new(&resolver).run(&input).unwrap();
    let model = &output.model;

    assert_eq!(output.cases.len(), 3);
    assert_eq!(model.subcases.len(), 3);
    assert_eq!(model.restraint_sets(), 3);
    assert_eq!(model.load_sets(), 3);
    for (subcase, case) in model.subcases.iter().zip(&output.cases) {
        assert_eq!(subcase.restraint_set, case.id);
        assert_eq!(subcase.load_set, case.id);
        assert_eq!(subcase.label, case.name);
    }

    // four starboard strips, each a lift, a drag and a moment entry
    let set = |id: usize| model.loads_in_set(id).cloned().collect::<Vec<_>>();
    let (first, second, third) = (set(1), set(2), set(3));
    assert_eq!(first.len(), 12);
    assert_eq!(second.len(), 12);
    assert_eq!(third.len(), 12);
    assert!(first.iter().all(|l| l.set == 1));
    assert!(second.iter().all(|l| l.set == 2));
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.node, b.node);
        assert_relative_eq!(a.magnitude, b.magnitude);
    }
    let lift = |loads: &[NodalLoad]| -> f64 {
        loads.iter().filter(|l| l.direction[2] == 1.0).map(|l| l.magnitude).sum()
    };
    assert!(lift(&third) > lift(&first));

    let per_set = model.restraints.len() / 3;
    assert!(per_set > 0);
    for id in 1..=3 {
        assert_eq!(model.restraints.iter().filter(|r| r.set == id).count(), per_set);
    }
}

#[test]
fn pipeline_input_round_trips_through_json() {
    let input = pipeline_input(vec![strips(0.5), strips(0.5), strips(0.9)]);
    let json = serde_json::to_string(&input).unwrap();
    let back: PipelineInput = serde_json::from_str(&json).unwrap();
    assert_eq!(back.load_cases.names, input.load_cases.names);
    assert_eq!(back.mesh.nodes.len(), input.mesh.nodes.len());
    assert_eq!(back.wing.airfoils[1].airfoil, AirfoilId::parse("2412"));
}
