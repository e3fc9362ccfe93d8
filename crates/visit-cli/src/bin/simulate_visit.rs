//! CLI tool to run the visit task against a simulated vehicle.
//!
//! Configures and activates the mission controller, lets the simulated
//! vehicle fly the dispatched plan and reports how the activation ended.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use visit_cli::{parse_lat_lon, SimulatedVehicle};
use visit_core::{PlanSettings, Position};
use visit_task::loops::control_loop::run_control_loop;
use visit_task::{ChannelDispatcher, MissionController, TaskEvent};

/// Simulate one activation of the visit task
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Vehicle start position as LAT,LON in degrees
    #[arg(long, default_value = "41.1840,-8.7080", allow_hyphen_values = true)]
    from: String,

    /// Points to visit as a flat LAT,LON,LAT,LON,... list in degrees
    #[arg(
        long,
        default_value = "41.1850,-8.7060,41.1870,-8.7020,41.1830,-8.7000",
        allow_hyphen_values = true
    )]
    points: String,

    /// Distance between simulated position reports in meters
    #[arg(long, default_value_t = 25.0)]
    step_m: f64,

    /// Local system id
    #[arg(long, default_value_t = 1)]
    system_id: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("visit_task=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let (lat, lon) = parse_lat_lon(&args.from).context("invalid --from")?;
    let points = visit_core::parse_points(&args.points).context("invalid --points")?;

    let (event_tx, event_rx) = mpsc::channel(256);
    let (dispatcher, mut requests) = ChannelDispatcher::channel(4);
    let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let control = tokio::spawn(run_control_loop(
        MissionController::new(PlanSettings::default(), args.system_id),
        event_rx,
        dispatcher,
        Duration::from_millis(100),
        shutdown_rx,
    ));

    let mut vehicle = SimulatedVehicle::new(Position::from_degrees(lat, lon), args.step_m);

    event_tx.send(TaskEvent::Configure { points }).await?;
    for event in vehicle.ready_events() {
        event_tx.send(event).await?;
    }
    event_tx.send(TaskEvent::Activate).await?;

    let request = match tokio::time::timeout(Duration::from_secs(5), requests.recv()).await {
        Ok(Some(request)) => request,
        _ => bail!("no plan was dispatched (check the points configuration)"),
    };
    println!(
        "Plan {} (request {}) with {} maneuver(s)",
        request.plan_id,
        request.request_id,
        request.plan.maneuvers.len()
    );

    let events = vehicle.execute(&request.plan);
    tracing::info!("Simulated vehicle produced {} event(s)", events.len());
    for event in events {
        event_tx.send(event).await?;
    }
    drop(event_tx);

    let controller = control.await?;
    let state = controller.state();
    println!(
        "Finished in phase {:?}, last outcome {:?}, progress {:.0}%",
        controller.phase(),
        state.last_outcome,
        state.progress
    );

    Ok(())
}
