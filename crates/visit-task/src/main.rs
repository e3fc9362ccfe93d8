//! Visit Task - plans and dispatches the optimal waypoint visit
//!
//! Events arrive as JSON lines on stdin, plan requests leave as JSON lines
//! on stdout. Logs go to stderr.

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use visit_core::parse_points;
use visit_task::bridge::{spawn_event_reader, write_requests};
use visit_task::loops::control_loop::run_control_loop;
use visit_task::{ChannelDispatcher, MissionController, TaskConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("visit_task=debug".parse()?),
        )
        .init();

    tracing::info!("Starting visit task...");

    let config = TaskConfig::from_env();
    let mut controller = MissionController::new(config.plan_settings(), config.system_id);
    match parse_points(&config.points) {
        Ok(points) => {
            if let Err(err) = controller.configure(&points) {
                tracing::warn!("{}", err);
            }
        }
        Err(err) => tracing::warn!("Points to visit not usable, task disabled: {}", err),
    }

    let (event_tx, event_rx) = mpsc::channel(config.queue_capacity);
    let (dispatcher, request_rx) = ChannelDispatcher::channel(config.queue_capacity);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    // Never joined: a pending stdin read would keep the process alive
    let _reader = spawn_event_reader(std::io::BufReader::new(std::io::stdin()), event_tx)?;
    let writer = tokio::spawn(write_requests(request_rx, tokio::io::stdout()));
    let mut control = tokio::spawn(run_control_loop(
        controller,
        event_rx,
        dispatcher,
        config.poll_interval(),
        shutdown_rx,
    ));

    // Loop exits once shutdown fires or stdin closes and the queue drains
    let controller = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupt received");
            let _ = shutdown_tx.send(());
            control.await?
        }
        result = &mut control => result?,
    };
    tracing::info!("Final phase: {:?}", controller.phase());

    // Dispatcher dropped with the loop, so the writer drains and ends
    let written = writer.await??;
    tracing::info!("Wrote {} plan request(s)", written);

    Ok(())
}
