//! Simulator XML input rendering.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use fc_core::Nuclide;

use crate::ScenarioResult;
use crate::fleet::{FleetPlan, Prototype, RegionPlan, plan_fleet};
use crate::schema::Scenario;

pub const MINE: &str = "mine";
pub const ENRICHMENT: &str = "enrichment";
pub const REPOSITORY: &str = "repository";
pub const REPROCESSING: &str = "reprocessing";

const NATURAL_U: &str = "natl_u";
const FRESH_UOX: &str = "fresh_uox";
const SPENT_UOX: &str = "spent_uox";
const TAILS: &str = "tails";
const SEPARATED_PU: &str = "separated_pu";
const REPROCESS_WASTE: &str = "reprocess_waste";
const NATURAL_U_RECIPE: &str = "natl_u_recipe";

const TAILS_ASSAY: f64 = 0.003;
const PU_SEPARATION_EFFICIENCY: f64 = 0.99;
const UNLIMITED: &str = "1e100";

/// Counts reported after rendering, for logging and CLI output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub prototypes: usize,
    pub regions: usize,
    pub institutions: usize,
    pub filtered: usize,
    pub retired: usize,
    pub fallback_types: Vec<String>,
}

/// Render `scenario` into a create-or-truncate file at `path`.
pub fn render_to_path(scenario: &Scenario, path: &Path) -> ScenarioResult<RenderSummary> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    let summary = render_input(scenario, &mut out)?;
    out.flush()?;
    tracing::info!(
        path = %path.display(),
        prototypes = summary.prototypes,
        regions = summary.regions,
        "wrote simulator input"
    );
    Ok(summary)
}

pub fn render_input<W: Write>(scenario: &Scenario, out: &mut W) -> ScenarioResult<RenderSummary> {
    let plan = plan_fleet(scenario)?;
    let fresh = recipe_or_default(&scenario.recipes.fresh, DEFAULT_FRESH)?;
    let spent = recipe_or_default(&scenario.recipes.spent, DEFAULT_SPENT)?;

    let mut xml = XmlWriter::new(out);
    xml.open("simulation")?;
    write_control(&mut xml, scenario)?;
    let reprocessing = scenario.infrastructure.reprocessing;
    write_archetypes(&mut xml, reprocessing)?;
    write_support_facilities(&mut xml, reprocessing)?;
    for prototype in &plan.prototypes {
        write_reactor(&mut xml, prototype, scenario)?;
    }
    write_support_region(&mut xml, scenario)?;
    for region in &plan.regions {
        write_region(&mut xml, region)?;
    }
    write_recipe(&mut xml, NATURAL_U_RECIPE, &natural_uranium())?;
    write_recipe(&mut xml, FRESH_UOX, &fresh)?;
    write_recipe(&mut xml, SPENT_UOX, &spent)?;
    xml.close("simulation")?;

    Ok(summarize(&plan))
}

fn summarize(plan: &FleetPlan) -> RenderSummary {
    RenderSummary {
        prototypes: plan.prototypes.len(),
        // support region included
        regions: plan.regions.len() + 1,
        institutions: plan.regions.iter().map(|r| r.institutions.len()).sum::<usize>() + 1,
        filtered: plan.filtered,
        retired: plan.retired,
        fallback_types: plan.fallback_types.iter().cloned().collect(),
    }
}

fn write_control<W: Write>(xml: &mut XmlWriter<W>, scenario: &Scenario) -> io::Result<()> {
    let sim = &scenario.simulation;
    xml.open("control")?;
    xml.leaf("duration", sim.duration)?;
    xml.leaf("startmonth", sim.start_month)?;
    xml.leaf("startyear", sim.start_year)?;
    xml.leaf("decay", sim.decay.as_str())?;
    xml.close("control")
}

fn write_archetypes<W: Write>(xml: &mut XmlWriter<W>, reprocessing: bool) -> io::Result<()> {
    let mut specs = vec![
        ("cycamore", "Source"),
        ("cycamore", "Enrichment"),
        ("cycamore", "Reactor"),
        ("cycamore", "Sink"),
        ("agents", "NullRegion"),
        ("agents", "NullInst"),
        ("cycamore", "DeployInst"),
    ];
    if reprocessing {
        specs.push(("cycamore", "Separations"));
    }

    xml.open("archetypes")?;
    for (lib, name) in specs {
        xml.open("spec")?;
        xml.leaf("lib", lib)?;
        xml.leaf("name", name)?;
        xml.close("spec")?;
    }
    xml.close("archetypes")
}

fn write_support_facilities<W: Write>(xml: &mut XmlWriter<W>, reprocessing: bool) -> io::Result<()> {
    xml.open("facility")?;
    xml.leaf("name", MINE)?;
    xml.open("config")?;
    xml.open("Source")?;
    xml.leaf("outcommod", NATURAL_U)?;
    xml.leaf("outrecipe", NATURAL_U_RECIPE)?;
    xml.leaf("throughput", UNLIMITED)?;
    xml.close("Source")?;
    xml.close("config")?;
    xml.close("facility")?;

    xml.open("facility")?;
    xml.leaf("name", ENRICHMENT)?;
    xml.open("config")?;
    xml.open("Enrichment")?;
    xml.leaf("feed_commod", NATURAL_U)?;
    xml.leaf("feed_recipe", NATURAL_U_RECIPE)?;
    xml.leaf("product_commod", FRESH_UOX)?;
    xml.leaf("tails_commod", TAILS)?;
    xml.leaf("tails_assay", TAILS_ASSAY)?;
    xml.leaf("max_feed_inventory", UNLIMITED)?;
    xml.close("Enrichment")?;
    xml.close("config")?;
    xml.close("facility")?;

    xml.open("facility")?;
    xml.leaf("name", REPOSITORY)?;
    xml.open("config")?;
    xml.open("Sink")?;
    if reprocessing {
        xml.list("in_commods", [SPENT_UOX, TAILS, SEPARATED_PU, REPROCESS_WASTE])?;
    } else {
        xml.list("in_commods", [SPENT_UOX, TAILS])?;
    }
    xml.leaf("max_inv_size", UNLIMITED)?;
    xml.close("Sink")?;
    xml.close("config")?;
    xml.close("facility")?;

    if reprocessing {
        write_separations(xml)?;
    }
    Ok(())
}

/// Plutonium out of spent fuel; everything else leaves as waste.
fn write_separations<W: Write>(xml: &mut XmlWriter<W>) -> io::Result<()> {
    xml.open("facility")?;
    xml.leaf("name", REPROCESSING)?;
    xml.open("config")?;
    xml.open("Separations")?;
    xml.list("feed_commods", [SPENT_UOX])?;
    xml.leaf("feedbuf_size", UNLIMITED)?;
    xml.leaf("throughput", UNLIMITED)?;
    xml.leaf("leftover_commod", REPROCESS_WASTE)?;
    xml.open("streams")?;
    xml.open("item")?;
    xml.leaf("commod", SEPARATED_PU)?;
    xml.open("info")?;
    xml.leaf("buf_size", UNLIMITED)?;
    xml.open("efficiencies")?;
    xml.open("item")?;
    xml.leaf("comp", "Pu")?;
    xml.leaf("eff", PU_SEPARATION_EFFICIENCY)?;
    xml.close("item")?;
    xml.close("efficiencies")?;
    xml.close("info")?;
    xml.close("item")?;
    xml.close("streams")?;
    xml.close("Separations")?;
    xml.close("config")?;
    xml.close("facility")
}

fn write_reactor<W: Write>(
    xml: &mut XmlWriter<W>,
    prototype: &Prototype,
    scenario: &Scenario,
) -> io::Result<()> {
    let spec = &prototype.spec;
    let capacity = prototype.capacity_mwe;
    xml.open("facility")?;
    xml.leaf("name", &prototype.name)?;
    xml.open("config")?;
    xml.open("Reactor")?;
    xml.list("fuel_inrecipes", [FRESH_UOX])?;
    xml.list("fuel_outrecipes", [SPENT_UOX])?;
    xml.list("fuel_incommods", [FRESH_UOX])?;
    xml.list("fuel_outcommods", [SPENT_UOX])?;
    xml.leaf("cycle_time", scenario.options.cycle_time_months)?;
    xml.leaf("refuel_time", scenario.options.refuel_time_months)?;
    xml.leaf("assem_size", format!("{:.3}", spec.kg_per_assembly))?;
    xml.leaf("n_assem_core", spec.core_assemblies(capacity))?;
    xml.leaf("n_assem_batch", spec.batch_assemblies(capacity))?;
    xml.leaf("power_cap", capacity)?;
    xml.close("Reactor")?;
    xml.close("config")?;
    xml.close("facility")
}

fn write_support_region<W: Write>(xml: &mut XmlWriter<W>, scenario: &Scenario) -> io::Result<()> {
    let infra = &scenario.infrastructure;
    xml.open("region")?;
    xml.leaf("name", &infra.region)?;
    xml.open("config")?;
    xml.empty("NullRegion")?;
    xml.close("config")?;
    xml.open("institution")?;
    xml.leaf("name", format!("{}_inst", infra.region))?;
    xml.open("initialfacilitylist")?;
    for (prototype, number) in [
        (MINE, infra.mines),
        (ENRICHMENT, infra.enrichment),
        (REPOSITORY, infra.repositories),
        (REPROCESSING, u32::from(infra.reprocessing)),
    ] {
        if number == 0 {
            continue;
        }
        xml.open("entry")?;
        xml.leaf("prototype", prototype)?;
        xml.leaf("number", number)?;
        xml.close("entry")?;
    }
    xml.close("initialfacilitylist")?;
    xml.open("config")?;
    xml.empty("NullInst")?;
    xml.close("config")?;
    xml.close("institution")?;
    xml.close("region")
}

fn write_region<W: Write>(xml: &mut XmlWriter<W>, region: &RegionPlan) -> io::Result<()> {
    xml.open("region")?;
    xml.leaf("name", &region.country)?;
    xml.open("config")?;
    xml.empty("NullRegion")?;
    xml.close("config")?;
    for inst in &region.institutions {
        xml.open("institution")?;
        xml.leaf("name", &inst.name)?;
        xml.open("config")?;
        xml.open("DeployInst")?;
        xml.list("prototypes", inst.entries.iter().map(|e| &e.prototype))?;
        xml.list("build_times", inst.entries.iter().map(|e| e.build_time))?;
        xml.list("n_build", inst.entries.iter().map(|e| e.n_build))?;
        xml.list("lifetimes", inst.entries.iter().map(|e| e.lifetime))?;
        xml.close("DeployInst")?;
        xml.close("config")?;
        xml.close("institution")?;
    }
    xml.close("region")
}

fn write_recipe<W: Write>(
    xml: &mut XmlWriter<W>,
    name: &str,
    composition: &[(Nuclide, f64)],
) -> io::Result<()> {
    xml.open("recipe")?;
    xml.leaf("name", name)?;
    xml.leaf("basis", "mass")?;
    for (nuclide, comp) in composition {
        xml.open("nuclide")?;
        xml.leaf("id", nuclide.raw())?;
        xml.leaf("comp", comp)?;
        xml.close("nuclide")?;
    }
    xml.close("recipe")
}

// U-235 at natural abundance, in weight percent.
fn natural_uranium() -> [(Nuclide, f64); 2] {
    [
        (Nuclide::from_raw(922350000), 0.711),
        (Nuclide::from_raw(922380000), 99.289),
    ]
}

const DEFAULT_FRESH: &[(&str, f64)] = &[("U235", 0.04), ("U238", 0.96)];

const DEFAULT_SPENT: &[(&str, f64)] = &[
    ("U235", 0.0072),
    ("U236", 0.0053),
    ("U238", 0.9243),
    ("Pu239", 0.0059),
    ("Pu240", 0.0024),
    ("Pu241", 0.0015),
    ("Cs137", 0.0015),
    ("Sr90", 0.0007),
];

fn recipe_or_default(
    recipe: &BTreeMap<String, f64>,
    fallback: &[(&str, f64)],
) -> ScenarioResult<Vec<(Nuclide, f64)>> {
    let entries: Vec<(&str, f64)> = if recipe.is_empty() {
        fallback.to_vec()
    } else {
        recipe.iter().map(|(k, v)| (k.as_str(), *v)).collect()
    };
    entries
        .into_iter()
        .map(|(key, frac)| Ok((Nuclide::parse(key)?, frac)))
        .collect()
}

/// Minimal indenting element writer; text content is escaped.
struct XmlWriter<'a, W: Write> {
    out: &'a mut W,
    depth: usize,
}

impl<'a, W: Write> XmlWriter<'a, W> {
    fn new(out: &'a mut W) -> Self {
        Self { out, depth: 0 }
    }

    fn indent(&mut self) -> io::Result<()> {
        write!(self.out, "{:width$}", "", width = self.depth * 2)
    }

    fn open(&mut self, tag: &str) -> io::Result<()> {
        self.indent()?;
        writeln!(self.out, "<{tag}>")?;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self, tag: &str) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.indent()?;
        writeln!(self.out, "</{tag}>")
    }

    fn empty(&mut self, tag: &str) -> io::Result<()> {
        self.indent()?;
        writeln!(self.out, "<{tag}/>")
    }

    fn leaf(&mut self, tag: &str, value: impl Display) -> io::Result<()> {
        self.indent()?;
        writeln!(self.out, "<{tag}>{}</{tag}>", escape(&value.to_string()))
    }

    /// `<tag><val>..</val>...</tag>`
    fn list<I>(&mut self, tag: &str, values: I) -> io::Result<()>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.open(tag)?;
        for value in values {
            self.leaf("val", value)?;
        }
        self.close(tag)
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
