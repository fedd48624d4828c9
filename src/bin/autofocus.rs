//! autofocus CLI: drive the autofocus controller against a simulated camera.

use autofocus_rs::camera::sim::{SimConfig, SimulatedCamera};
use autofocus_rs::config::Config;
use autofocus_rs::telemetry::{TelemetryConfig, init_telemetry};
use autofocus_rs::{AutoFocusController, FocusMode};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "autofocus", about = "Continuous autofocus scheduling")]
struct Cli {
    /// TOML config file (defaults to environment variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a focus session against a simulated camera
    Run {
        /// Camera focus mode
        #[arg(long, default_value = "auto")]
        mode: FocusMode,
        /// How long to run the session
        #[arg(long, default_value_t = 10)]
        duration_secs: u64,
        /// Simulated time from focus request to result
        #[arg(long, default_value_t = 300)]
        latency_ms: u64,
        /// Reject every Nth focus request with a camera error. The first
        /// rejection ends the focus chain until the controller is restarted
        #[arg(long)]
        fail_every: Option<u32>,
        /// Report every Nth focus pass as unfocused
        #[arg(long)]
        miss_every: Option<u32>,
        /// Pause (stop, then start) the controller after this many seconds
        #[arg(long)]
        pause_after_secs: Option<u64>,
        /// Length of the pause
        #[arg(long, default_value_t = 3)]
        pause_secs: u64,
    },
    /// List focus modes and whether each triggers autofocus
    Modes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Modes => {
            cmd_modes();
            Ok(())
        }
        Command::Run {
            mode,
            duration_secs,
            latency_ms,
            fail_every,
            miss_every,
            pause_after_secs,
            pause_secs,
        } => {
            let config = match cli.config {
                Some(path) => Config::from_file(&path)?,
                None => Config::from_env()?,
            };
            let sim = SimConfig {
                mode,
                latency: Duration::from_millis(latency_ms),
                fail_every,
                miss_every,
            };
            let pause = pause_after_secs
                .map(|after| (Duration::from_secs(after), Duration::from_secs(pause_secs)));
            cmd_run(config, sim, Duration::from_secs(duration_secs), pause).await
        }
    }
}

fn cmd_modes() {
    println!("{:<20}  AUTOFOCUS", "MODE");
    println!("{}", "-".repeat(31));
    for mode in FocusMode::ALL {
        let calls = if mode.calls_autofocus() { "yes" } else { "no" };
        println!("{:<20}  {}", mode.to_string(), calls);
    }
}

async fn cmd_run(
    config: Config,
    sim: SimConfig,
    duration: Duration,
    pause: Option<(Duration, Duration)>,
) -> anyhow::Result<()> {
    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "autofocus".to_string(),
        log_level: config.log_level.clone(),
    })?;

    let camera = Arc::new(SimulatedCamera::new(sim)?);
    let controller = AutoFocusController::new(camera.clone(), config.autofocus())?;
    if !controller.supports_autofocus() {
        info!("focus mode does not call autofocus, controller is inert");
    }

    let session = async {
        if let Some((after, length)) = pause {
            tokio::time::sleep(after).await;
            info!("pausing autofocus");
            controller.stop();
            tokio::time::sleep(length).await;
            info!("resuming autofocus");
            controller.start();
        }
        std::future::pending::<()>().await;
    };

    tokio::select! {
        _ = tokio::time::sleep(duration) => {}
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
        _ = session => {}
    }
    controller.stop();

    let stats = camera.stats();
    println!("Requests:   {}", stats.requests);
    println!("Rejected:   {}", stats.rejected);
    println!("Focused:    {}", stats.focused);
    println!("Missed:     {}", stats.missed);
    println!("Cancels:    {}", stats.cancels);
    Ok(())
}
