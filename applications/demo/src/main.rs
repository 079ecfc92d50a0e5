/// Theater Demo - headless shared playback session
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use theater_demo::{DemoConfig, Simulation, Viewer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "theater-demo")]
#[command(about = "Simulate a shared playback session with several viewers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted session and print every viewer's panel
    Run {
        /// Configuration file path
        #[arg(short, long, env = "THEATER_CONFIG")]
        config: Option<PathBuf>,

        /// Override the number of ticks played after each step
        #[arg(short, long)]
        ticks: Option<u32>,
    },
    /// Print the effective configuration as JSON
    Config {
        /// Configuration file path
        #[arg(short, long, env = "THEATER_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "theater_demo=info,theater_backend=info,theater_control=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, ticks } => {
            let mut config = DemoConfig::load(config.as_deref())?;
            if let Some(ticks) = ticks {
                config.session.ticks = ticks;
            }
            run(config)?;
        }
        Commands::Config { config } => {
            let config = DemoConfig::load(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn run(config: DemoConfig) -> anyhow::Result<()> {
    let ticks = config.session.ticks;
    let url = config.session.url.clone();
    let mut sim = Simulation::new(config)?;

    let Some(master) = sim.master() else {
        anyhow::bail!("master has no control panel");
    };
    let master_name = master.participant.display_name.clone();

    tracing::info!("Master starts the media");
    master.handler.on_url_input(&url);
    master.handler.on_lock_button_press();
    sim.run(ticks);

    if let Some(guest) = sim.viewers.get(1) {
        tracing::info!(guest = %guest.participant.display_name, "Guest tries to change the URL while locked");
        guest.handler.on_url_input("https://media.example.com/other.mp4");
        guest.handler.on_seek_slider_begin_drag();
        guest.handler.on_seek_slider_changed(10.0, 100.0);
        sim.run(ticks);
    }

    if let Some(master) = sim.master() {
        tracing::info!("Master switches to the stream player");
        master.handler.on_video_player_mode_button_pressed();
        sim.run(ticks);
    }

    print_panels(&sim.viewers);

    tracing::info!(master = %master_name, "Master leaves the session");
    sim.leave(&master_name)?;
    sim.run(1);

    println!();
    print_panels(&sim.viewers);
    Ok(())
}

fn print_panels(viewers: &[Viewer]) {
    for viewer in viewers {
        let state = viewer.state();
        println!(
            "{:<10} status={:<12} elapsed={}/{} owner={} master={} locked={} prompt={:?} scale=({:.2}, {:.2})",
            viewer.participant.display_name,
            state.status_text,
            state.elapsed_text,
            state.total_text,
            state.owner_name,
            state.master_name,
            state.locked_icon,
            state.url_placeholder,
            state.screen_fitter_scale.x,
            state.screen_fitter_scale.y,
        );
    }
}
