use clap::{Args, Parser, Subcommand, ValueEnum};
use fc_app::{
    AppError, AppResult, ExportFormat, FluxRequest, SeriesTable, SimulatorRun, metrics,
    render_scenario, run_simulator, write_table_to,
};
use fc_core::MassUnit;
use fc_results::{AgentLookup, FluxDirection, ResultStore};
use fc_series::AggregationMode;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fc-cli")]
#[command(about = "Fuel-cycle CLI - simulator input rendering and result post-processing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scenario YAML file into a simulator XML input
    Render {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Reactor list (CSV) appended to the scenario's reactors
        #[arg(long)]
        reactors: Option<PathBuf>,
        /// Output XML path
        #[arg(short, long, default_value = "input.xml")]
        output: PathBuf,
    },
    /// Run the simulator on an input file
    Simulate {
        /// Simulator XML input
        input: PathBuf,
        /// Output database path (simulator default when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Simulator executable
        #[arg(long, default_value = fc_app::simulator::DEFAULT_PROGRAM)]
        binary: String,
    },
    /// Show simulation start date and duration
    Info {
        /// Result database
        db: PathBuf,
    },
    /// List agents, optionally filtered by prototype or archetype
    Agents {
        /// Result database
        db: PathBuf,
        #[arg(long, conflicts_with = "archetype")]
        prototype: Option<String>,
        #[arg(long)]
        archetype: Option<String>,
    },
    /// Per-nuclide material flux into or out of a facility
    Flux {
        /// Result database
        db: PathBuf,
        /// Prototype name (or archetype with --archetype)
        facility: String,
        #[arg(long, value_enum, default_value_t = Direction::Incoming)]
        direction: Direction,
        /// Match `facility` against the archetype instead of the prototype
        #[arg(long)]
        archetype: bool,
        #[arg(long, value_enum, default_value_t = Unit::Kg)]
        unit: Unit,
        #[arg(long)]
        cumulative: bool,
        /// Sum across nuclides
        #[arg(long)]
        total: bool,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Natural uranium fed to enrichment [t]
    Feed(SeriesArgs),
    /// Fuel received by reactors [t]
    Fuel(SeriesArgs),
    /// Separative work per enrichment facility
    Swu(SeriesArgs),
    /// Electric power per reactor [MWe]
    Power(SeriesArgs),
    /// Uranium utilization (cumulative fuel / cumulative natural uranium)
    Utilization {
        /// Result database
        db: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SeriesArgs {
    /// Result database
    db: PathBuf,
    /// Running total along the time axis
    #[arg(long)]
    cumulative: bool,
    /// Sum across nuclides / facilities
    #[arg(long)]
    total: bool,
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,
    /// Output file (optional, defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl SeriesArgs {
    fn mode(&self) -> AggregationMode {
        AggregationMode {
            cumulative: self.cumulative,
            total: self.total,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Incoming,
    Outgoing,
}

#[derive(Clone, Copy, ValueEnum)]
enum Unit {
    Kg,
    #[value(alias = "tonne")]
    T,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => ExportFormat::Csv,
            Format::Json => ExportFormat::Json,
        }
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            scenario_path,
            reactors,
            output,
        } => cmd_render(&scenario_path, reactors.as_deref(), &output),
        Commands::Simulate {
            input,
            output,
            binary,
        } => cmd_simulate(input, output, binary),
        Commands::Info { db } => cmd_info(&db),
        Commands::Agents {
            db,
            prototype,
            archetype,
        } => {
            let lookup = match (prototype, archetype) {
                (Some(name), _) => Some(AgentLookup::Prototype(name)),
                (None, Some(spec)) => Some(AgentLookup::Archetype(spec)),
                (None, None) => None,
            };
            cmd_agents(&db, lookup.as_ref())
        }
        Commands::Flux {
            db,
            facility,
            direction,
            archetype,
            unit,
            cumulative,
            total,
            format,
            output,
        } => {
            let request = FluxRequest {
                lookup: if archetype {
                    AgentLookup::Archetype(facility)
                } else {
                    AgentLookup::Prototype(facility)
                },
                direction: match direction {
                    Direction::Incoming => FluxDirection::Incoming,
                    Direction::Outgoing => FluxDirection::Outgoing,
                },
                mode: AggregationMode { cumulative, total },
                unit: match unit {
                    Unit::Kg => MassUnit::Kilogram,
                    Unit::T => MassUnit::Tonne,
                },
            };
            let store = ResultStore::open(&db)?;
            let table = fc_app::flux_table(&store, &request)?;
            export(&table, format, output.as_deref())
        }
        Commands::Feed(args) => {
            reject_total(&args, "feed")?;
            let store = ResultStore::open(&args.db)?;
            export(&metrics::natural_u_feed(&store, args.cumulative)?, args.format, args.output.as_deref())
        }
        Commands::Fuel(args) => {
            reject_total(&args, "fuel")?;
            let store = ResultStore::open(&args.db)?;
            export(&metrics::fuel_received(&store, args.cumulative)?, args.format, args.output.as_deref())
        }
        Commands::Swu(args) => {
            let store = ResultStore::open(&args.db)?;
            export(&metrics::swu_by_enrichment(&store, args.mode())?, args.format, args.output.as_deref())
        }
        Commands::Power(args) => {
            let store = ResultStore::open(&args.db)?;
            export(&metrics::power_by_reactor(&store, args.mode())?, args.format, args.output.as_deref())
        }
        Commands::Utilization { db, format, output } => {
            cmd_utilization(&db, format, output.as_deref())
        }
    }
}

fn cmd_render(scenario_path: &Path, reactors: Option<&Path>, output: &Path) -> AppResult<()> {
    println!("Rendering scenario: {}", scenario_path.display());
    if let Some(path) = reactors {
        println!("  Reactor list: {}", path.display());
    }
    let summary = render_scenario(scenario_path, reactors, output)?;
    println!("✓ Wrote {}", output.display());
    println!("  Prototypes: {}", summary.prototypes);
    println!("  Regions: {}", summary.regions);
    println!("  Institutions: {}", summary.institutions);
    if summary.filtered > 0 {
        println!("  Test reactors skipped: {}", summary.filtered);
    }
    if summary.retired > 0 {
        println!("  Retired before start: {}", summary.retired);
    }
    if !summary.fallback_types.is_empty() {
        println!(
            "  Default specification used for: {}",
            summary.fallback_types.join(", ")
        );
    }
    Ok(())
}

fn cmd_simulate(input: PathBuf, output: Option<PathBuf>, binary: String) -> AppResult<()> {
    let mut run = SimulatorRun::new(input).with_program(binary);
    if let Some(output) = output {
        run = run.with_output(output);
    }
    let stdout = run_simulator(&run)?;
    print!("{stdout}");
    println!("✓ Simulation completed");
    Ok(())
}

fn cmd_info(db: &Path) -> AppResult<()> {
    let store = ResultStore::open(db)?;
    let info = store.simulation_info()?;
    println!("Simulation: {}", db.display());
    println!(
        "  Start: {}-{:02}",
        info.initial_year, info.initial_month
    );
    println!("  Duration: {} months", info.duration);
    if let Some(end) = info.duration.checked_sub(1).and_then(|t| info.date_of(t)) {
        println!("  Last timestep: {}", end.format("%Y-%m"));
    }
    Ok(())
}

fn cmd_agents(db: &Path, lookup: Option<&AgentLookup>) -> AppResult<()> {
    let store = ResultStore::open(db)?;
    let agents = store.agent_entries(lookup)?;
    if agents.is_empty() {
        println!("No matching agents");
        return Ok(());
    }
    println!("{:>8}  {:<10}  {:<28}  {:<20}  {:>6}", "id", "kind", "spec", "prototype", "enter");
    for agent in agents {
        println!(
            "{:>8}  {:<10}  {:<28}  {:<20}  {:>6}",
            agent.agent_id, agent.kind, agent.spec, agent.prototype, agent.enter_time
        );
    }
    Ok(())
}

fn cmd_utilization(db: &Path, format: Format, output: Option<&Path>) -> AppResult<()> {
    let store = ResultStore::open(db)?;
    let info = store.simulation_info()?;
    let util = metrics::uranium_utilization(&store)?;
    let average = util.average;
    export(&util.into_table(info), format, output)?;
    // stdout may be carrying the table itself
    eprintln!("Average uranium utilization: {average:.6}");
    Ok(())
}

fn reject_total(args: &SeriesArgs, what: &str) -> AppResult<()> {
    if args.total {
        return Err(AppError::InvalidInput(format!(
            "{what} is a single series; --total does not apply"
        )));
    }
    Ok(())
}

fn export(table: &SeriesTable, format: Format, output: Option<&Path>) -> AppResult<()> {
    write_table_to(table, format.into(), output)?;
    if let Some(path) = output {
        println!(
            "✓ Exported {} series x {} timesteps to {}",
            table.columns.len(),
            table.info.duration,
            path.display()
        );
    }
    Ok(())
}
