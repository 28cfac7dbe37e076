//! `vrlink` CLI: run a scenario through the buffering pipeline and export
//! the trajectory document, or inspect a previously exported one.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use frame_models::{AxesConverter, ReferenceFrame};
use sim::{EventPublisher, Scenario, ScenarioKind};
use std::path::PathBuf;
use viz_core::body::BodyModel;
use viz_core::{
    EventContext, ExportOutcome, InterfaceConfig, PublishDisposition, TrajectoryDocument,
    VizInterface,
};

#[derive(Parser)]
#[command(name = "vrlink", about = "Trajectory buffering & export pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a named scenario and export its trajectory document.
    Run {
        #[arg(value_enum)]
        scenario: ScenarioKind,
        /// Random seed for absence injection
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Keep every n-th eligible event
        #[arg(long, default_value_t = 1)]
        stride: u32,
        /// Max samples per body before thinning
        #[arg(long, default_value_t = 20_000)]
        capacity: usize,
        /// Output document path (defaults to <scenario>.json)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Target reference frame for exported states
        #[arg(long, default_value = "EarthMJ2000Eq")]
        frame: String,
        /// Probability of dropping a mover's fields per event
        #[arg(long)]
        p_absent: Option<f64>,
        /// Omit the quaternion block
        #[arg(long)]
        no_attitude: bool,
        /// Omit per-body colors
        #[arg(long)]
        no_colors: bool,
    },
    /// Reload an exported document and print per-orbit sample counts.
    Inspect {
        /// Path to an exported trajectory document
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            seed,
            stride,
            capacity,
            output,
            frame,
            p_absent,
            no_attitude,
            no_colors,
        } => run_scenario(
            scenario, seed, stride, capacity, output, frame, p_absent, no_attitude, no_colors,
        ),
        Commands::Inspect { input } => inspect(&input),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_scenario(
    kind: ScenarioKind,
    seed: u64,
    stride: u32,
    capacity: usize,
    output: Option<PathBuf>,
    frame: String,
    p_absent: Option<f64>,
    no_attitude: bool,
    no_colors: bool,
) -> Result<()> {
    let scenario = Scenario::build(&kind);

    let config = InterfaceConfig {
        target_frame: frame,
        export_attitude: !no_attitude,
        export_colors: !no_colors,
        sample_stride: stride,
        capacity,
        destination_path: output
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default(),
        ..Default::default()
    };

    let bodies: Vec<Box<dyn BodyModel>> = scenario
        .bodies
        .iter()
        .cloned()
        .map(|b| Box::new(b) as Box<dyn BodyModel>)
        .collect();

    // The scenario name stands in for the host script name, so an
    // unconfigured destination derives <scenario>.json.
    let mut iface = VizInterface::with_host(
        config,
        bodies,
        Box::new(AxesConverter),
        ReferenceFrame::equatorial(),
        Some(&scenario.name),
        false,
    )?;

    let mut publisher = EventPublisher::new(
        scenario.movers(),
        seed,
        p_absent.unwrap_or(scenario.p_absent),
    );

    println!(
        "Running scenario '{}' (seed={}, {:.0}s @ {:.0}s steps)...",
        scenario.name, seed, scenario.duration_s, scenario.step_s
    );

    let ctx = EventContext::running();
    let mut buffered = 0usize;
    let mut skipped = 0usize;
    let mut epoch = 0.0;
    while epoch <= scenario.duration_s {
        let event = publisher.publish_at(epoch);
        match iface.publish(&event, &ctx)? {
            PublishDisposition::Buffered => buffered += 1,
            PublishDisposition::Skipped(_) => skipped += 1,
            PublishDisposition::Exported(_) => {}
        }
        epoch += scenario.step_s;
    }

    let retained = iface.store().len();
    let outcome = iface.finish()?;
    println!(
        "Done: {} events buffered, {} skipped, {} samples retained",
        buffered, skipped, retained
    );
    match outcome {
        ExportOutcome::Exported => {
            println!("Document written to {}", iface.destination().display())
        }
        ExportOutcome::AlreadyExported => println!("Document was already written"),
        ExportOutcome::NoData => println!("No data was written"),
    }
    if iface.absent_data() {
        println!("Note: some events were missing mover data (see warnings)");
    }

    Ok(())
}

fn inspect(input: &PathBuf) -> Result<()> {
    let json = std::fs::read_to_string(input)
        .with_context(|| format!("cannot read {}", input.display()))?;
    let doc: TrajectoryDocument = serde_json::from_str(&json)
        .with_context(|| format!("{} is not a trajectory document", input.display()))?;

    println!(
        "{}: {} orbits, {} coordinates in {}",
        input.display(),
        doc.orbits.len(),
        doc.info.coordinates,
        doc.info.units
    );
    for orbit in &doc.orbits {
        println!(
            "  {:<12} display={:<11} radius={:<9.2} eph={} att={} time={}",
            orbit.name,
            orbit.display,
            orbit.radius,
            orbit.eph.len(),
            orbit.att.as_ref().map_or(0, |a| a.len()),
            orbit.time.len(),
        );
    }

    Ok(())
}
