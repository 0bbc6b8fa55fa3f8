//! WiFU UI runtime
//!
//! Drives the display from the shared state store: a render tick redraws when
//! the state changed, producer tasks update status values, and the console
//! navigates between pages.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wifu_ui::config::AppConfig;
use wifu_ui::plugins::{Event, ExamplePlugin, PluginRegistry};
use wifu_ui::state::{keys, State, Value};
use wifu_ui::ui::layout;
use wifu_ui::{cli, faces::FaceTable};

/// WiFU UI - display runtime backed by the observable state store
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Run without the interactive console (stop with Ctrl-C)
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    info!("Starting WiFU UI...");
    info!("Configuration file: {}", args.config);

    let config = AppConfig::load(&args.config).await?;
    info!("Configuration loaded successfully");

    let faces = Arc::new(config.face_table());
    let state = Arc::new(layout::build_state(&config));
    info!("State initialized with {} element(s)", state.len());

    run_app(config, state, faces, args.headless).await?;

    info!("WiFU UI shutdown complete");
    Ok(())
}

async fn run_app(
    config: AppConfig,
    state: Arc<State>,
    faces: Arc<FaceTable>,
    headless: bool,
) -> Result<()> {
    // Listeners run under the store lock: log only, never touch the store
    state.add_listener(keys::FACE.name(), |prev, new| {
        debug!("Face {} → {}", prev, new);
    });
    state.add_listener(keys::CURRENT_PAGE.name(), |prev, new| {
        info!("Page {} → {}", prev, new);
    });

    let mut plugins = PluginRegistry::new();
    if config.plugin_enabled("example") {
        plugins.register(ExamplePlugin::new());
    }
    plugins.dispatch(Event::Loaded, &state);

    let mut view = layout::build_view(&config, state.clone(), faces.clone());
    let tick = Duration::from_secs_f64(1.0 / config.ui.fps);

    // Render loop: redraw only when something changed
    let renderer = tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            if let Some(frame) = view.render() {
                println!("{}\n", frame);
            }
        }
    });

    let producers = vec![
        tokio::spawn(uptime_task(state.clone())),
        tokio::spawn(idle_face_task(state.clone())),
    ];

    plugins.dispatch(Event::Ready, &state);
    info!("Ready ({} plugin(s) loaded)", plugins.len());

    if headless {
        shutdown_signal().await;
    } else {
        let console = tokio::task::spawn_blocking({
            let state = state.clone();
            let faces = faces.clone();
            move || cli::run_repl(state, faces)
        });

        tokio::select! {
            result = console => {
                match result {
                    Ok(Ok(())) => info!("Console closed"),
                    Ok(Err(e)) => warn!("Console failed: {}", e),
                    Err(e) => warn!("Console task panicked: {}", e),
                }
            }
            _ = shutdown_signal() => {}
        }
    }

    info!("Shutting down...");
    plugins.dispatch(Event::Disconnected, &state);
    renderer.abort();
    for producer in producers {
        producer.abort();
    }

    Ok(())
}

/// Publish the formatted uptime once per second
async fn uptime_task(state: Arc<State>) {
    let started = Instant::now();
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    loop {
        interval.tick().await;
        state.set_as(&keys::UPTIME, format_uptime(started.elapsed()));
    }
}

/// Look around while idle, alternating the look faces
async fn idle_face_task(state: Arc<State>) {
    const LOOK: [&str; 2] = ["LOOK_L", "LOOK_R"];
    let mut interval = tokio::time::interval(Duration::from_secs(5));
    let mut step = 0usize;
    loop {
        interval.tick().await;
        // Only animate the idle faces, leave deliberate ones alone. The check
        // and the write share one lock, so a face set meanwhile is never undone.
        let looked = state.update(keys::FACE.name(), |current| {
            let face = current.as_text()?;
            (face == "AWAKE" || LOOK.contains(&face))
                .then(|| Value::from(LOOK[step % LOOK.len()]))
        });
        if looked {
            step += 1;
        }
    }
}

fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_uptime(Duration::from_secs(3725)), "01:02:05");
    }

    #[tokio::test]
    async fn test_idle_face_task_skips_deliberate_faces() {
        let state = Arc::new(State::with_elements([("face", "COOL")]));
        let task = tokio::spawn(idle_face_task(state.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        task.abort();

        assert_eq!(state.get_as(&keys::FACE).as_deref(), Some("COOL"));
    }

    #[tokio::test]
    async fn test_idle_face_task_animates_awake() {
        let state = Arc::new(State::with_elements([("face", "AWAKE")]));
        let task = tokio::spawn(idle_face_task(state.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        task.abort();

        assert_eq!(state.get_as(&keys::FACE).as_deref(), Some("LOOK_L"));
    }

    #[tokio::test]
    async fn test_idle_face_task_alternates_look_faces() {
        let state = Arc::new(State::with_elements([("face", "LOOK_R")]));
        let task = tokio::spawn(idle_face_task(state.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        task.abort();

        assert_eq!(state.get_as(&keys::FACE).as_deref(), Some("LOOK_L"));
    }
}
