use fc_scenario::schema::*;
use fc_scenario::{render_input, render_to_path};

fn reactor(country: &str, name: &str, ty: &str, mwe: f64, op: &str, start: u32) -> ReactorDef {
    ReactorDef {
        country: country.to_string(),
        name: name.to_string(),
        reactor_type: ty.to_string(),
        capacity_mwe: mwe,
        operator: op.to_string(),
        first_criticality: Some(start),
        shutdown: None,
    }
}

fn scenario() -> Scenario {
    Scenario {
        version: 1,
        name: "render".to_string(),
        simulation: SimulationParameters {
            duration: 240,
            start_month: 1,
            start_year: 1970,
            decay: DecayMode::Never,
        },
        reactors: vec![
            reactor("France", "Fessenheim-1 (FR)", "PWR", 880.0, "EDF", 19770301),
            reactor("France", "Fessenheim-2", "PWR", 880.0, "EDF", 19770301),
            reactor("France", "Phenix", "FBR", 40.0, "CEA", 19730801),
            reactor("United Kingdom", "Heysham", "AGR", 575.0, "EDF Energy & Co", 19830101),
        ],
        infrastructure: InfrastructureDef::default(),
        recipes: RecipesDef::default(),
        options: RenderOptions::default(),
    }
}

fn render(s: &Scenario) -> (String, fc_scenario::RenderSummary) {
    let mut buf = Vec::new();
    let summary = render_input(s, &mut buf).unwrap();
    (String::from_utf8(buf).unwrap(), summary)
}

#[test]
fn control_block_carries_parameters() {
    let (xml, _) = render(&scenario());
    assert!(xml.starts_with("<simulation>\n  <control>\n"));
    assert!(xml.contains("<duration>240</duration>"));
    assert!(xml.contains("<startmonth>1</startmonth>"));
    assert!(xml.contains("<startyear>1970</startyear>"));
    assert!(xml.contains("<decay>never</decay>"));
    assert!(xml.trim_end().ends_with("</simulation>"));
}

#[test]
fn summary_counts_prototypes_and_regions() {
    let (_, summary) = render(&scenario());
    // Fessenheim-1 and -2 are distinct prototypes; Phenix is filtered.
    assert_eq!(summary.prototypes, 3);
    assert_eq!(summary.filtered, 1);
    // support + France + United Kingdom
    assert_eq!(summary.regions, 3);
    assert_eq!(summary.institutions, 3);
    assert_eq!(summary.fallback_types, vec!["AGR".to_string()]);
}

#[test]
fn reactor_names_are_refined_and_escaped() {
    let (xml, _) = render(&scenario());
    assert!(xml.contains("<name>Fessenheim-1</name>"));
    assert!(!xml.contains("(FR)"));
    assert!(!xml.contains("Phenix"));
    assert!(xml.contains("<name>EDF Energy &amp; Co</name>"));
}

#[test]
fn deployment_lists_build_times() {
    let (xml, _) = render(&scenario());
    // 1970-01 -> 1977-03
    assert!(xml.contains("<build_times>\n            <val>86</val>"));
    assert!(xml.contains("<DeployInst>"));
    assert!(xml.contains("<lifetimes>"));
}

#[test]
fn support_region_holds_infrastructure() {
    let (xml, _) = render(&scenario());
    assert!(xml.contains("<name>support</name>"));
    assert!(xml.contains("<name>support_inst</name>"));
    assert!(xml.contains("<prototype>mine</prototype>"));
    assert!(xml.contains("<prototype>enrichment</prototype>"));
    assert!(xml.contains("<prototype>repository</prototype>"));
}

#[test]
fn recipes_are_rendered_by_id() {
    let (xml, _) = render(&scenario());
    assert!(xml.contains("<name>natl_u_recipe</name>"));
    assert!(xml.contains("<name>fresh_uox</name>"));
    assert!(xml.contains("<name>spent_uox</name>"));
    assert!(xml.contains("<id>922350000</id>"));
    assert!(xml.contains("<comp>0.711</comp>"));
}

#[test]
fn unknown_type_uses_default_assembly_mass() {
    let (xml, _) = render(&scenario());
    assert!(xml.contains("<assem_size>523.400</assem_size>"));
    assert!(xml.contains("<assem_size>446.000</assem_size>"));
}

#[test]
fn render_to_path_overwrites_existing_file() {
    let dir = std::env::temp_dir().join(format!("fc_scenario_render_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("input.xml");
    std::fs::write(&path, "stale contents that are longer than nothing").unwrap();

    render_to_path(&scenario(), &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("<simulation>"));
    assert!(!text.contains("stale"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn reprocessing_is_off_by_default() {
    let (xml, _) = render(&scenario());
    assert!(!xml.contains("Separations"));
    assert!(!xml.contains("<prototype>reprocessing</prototype>"));
}

#[test]
fn reprocessing_adds_separations_facility() {
    let mut s = scenario();
    s.infrastructure.reprocessing = true;
    let (xml, _) = render(&s);
    assert!(xml.contains("<name>Separations</name>"));
    assert!(xml.contains("<name>reprocessing</name>"));
    assert!(xml.contains("<feed_commods>\n        <val>spent_uox</val>"));
    assert!(xml.contains("<comp>Pu</comp>"));
    assert!(xml.contains("<prototype>reprocessing</prototype>\n          <number>1</number>"));
    assert!(xml.contains("<val>separated_pu</val>"));
}

#[test]
fn retired_reactors_are_not_deployed() {
    let mut s = scenario();
    s.simulation.start_year = 2000;
    s.reactors[0].shutdown = Some(19950101);
    let (xml, summary) = render(&s);
    assert_eq!(summary.retired, 1);
    assert!(!xml.contains("<name>Fessenheim-1</name>"));
    assert!(xml.contains("<name>Fessenheim-2</name>"));
}
