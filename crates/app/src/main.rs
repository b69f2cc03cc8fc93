use std::f32::consts::PI;

use airglow_core::{
    format_clock, AppConfig, DashboardView, LikeStore, ManualScheduler, SpectrumSource,
    StationClient, Transport, Visualizer,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn main() -> airglow_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::default();

    match cli.command {
        Commands::Demo { frames } => run_demo(&config, frames),
        Commands::Status => run_status(&config),
        Commands::Like { id } => run_like(&config, &id),
        Commands::Likes => run_likes(&config),
    }
}

/// Drives the full visualization pipeline against a synthetic tone so the
/// loop's behaviour can be observed without a live audio device.
fn run_demo(config: &AppConfig, frames: u32) -> airglow_core::Result<()> {
    tracing::info!(frames, "starting visualization demo");

    let mut transport = Transport::new(&config.station.stream_url);
    transport.ensure_analyser(config.viz.fft_size)?;
    transport.play();

    let mut scheduler = ManualScheduler::new();
    let mut viz = Visualizer::new(config.viz.clone());
    viz.set_playing(
        transport.is_playing(),
        transport.analyser().map(|node| node as &dyn SpectrumSource),
        &mut scheduler,
    );

    let fft_size = config.viz.fft_size;
    for frame in 0..frames {
        transport.push_samples(&tone_block(fft_size, frame))?;

        if let Some(handle) = scheduler.fire() {
            viz.on_frame(
                handle,
                transport
                    .analyser_mut()
                    .map(|node| node as &mut dyn SpectrumSource),
                &mut scheduler,
            );
        }

        if frame % 15 == 0 {
            let peak = viz.bars().iter().cloned().fold(0.0f32, f32::max);
            let glow = viz.glow();
            tracing::info!(frame, peak, r = glow.r, g = glow.g, b = glow.b, "tick");
        }
    }

    transport.pause();
    viz.set_playing(false, None, &mut scheduler);
    while let Some(handle) = scheduler.fire() {
        viz.on_frame(handle, None, &mut scheduler);
    }

    tracing::info!(state = ?viz.state(), "demo finished");
    Ok(())
}

/// One-shot fetch of the station status, printed as the dashboard view.
fn run_status(config: &AppConfig) -> airglow_core::Result<()> {
    let client = StationClient::new(config.station.clone());
    let response = client.fetch_now_playing()?;
    let view = DashboardView::from_response(&response, config.station.history_count);

    println!(
        "Now playing: {} — {} [{} / {}]",
        view.current.artist,
        view.current.title,
        format_clock(view.elapsed),
        format_clock(view.duration),
    );
    println!("Listeners: {}", view.listeners);

    if let Some(next) = &view.next {
        println!("Up next: {} — {}", next.artist, next.title);
    }
    if !view.history.is_empty() {
        println!("Previously played:");
        for track in &view.history {
            println!("  {} — {}", track.artist, track.title);
        }
    }

    Ok(())
}

fn run_like(config: &AppConfig, id: &str) -> airglow_core::Result<()> {
    let mut store = LikeStore::load(&config.likes.path, config.likes.ttl_millis);
    store.like(id)?;
    println!("Liked {id}");
    Ok(())
}

fn run_likes(config: &AppConfig) -> airglow_core::Result<()> {
    let store = LikeStore::load(&config.likes.path, config.likes.ttl_millis);
    if store.is_empty() {
        println!("No likes in the last 24 hours.");
    } else {
        for id in store.liked_ids() {
            println!("{id}");
        }
    }
    Ok(())
}

/// One analysis window of a 440 Hz tone at 48 kHz, phase-continuous
/// across frames.
fn tone_block(len: usize, frame: u32) -> Vec<f32> {
    let offset = frame as usize * len;
    (0..len)
        .map(|i| (2.0 * PI * 440.0 * (offset + i) as f32 / 48_000.0).sin() * 0.8)
        .collect()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Radio companion with an audio-reactive glow", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the visualization pipeline against a synthetic tone.
    Demo {
        /// Number of animation frames to drive.
        #[arg(short, long, default_value_t = 120)]
        frames: u32,
    },
    /// Fetch and print the station's now-playing status once.
    Status,
    /// Like a track by its station id.
    Like {
        /// Track identifier as reported by the station API.
        id: String,
    },
    /// List unexpired likes.
    Likes,
}
