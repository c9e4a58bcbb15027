use clap::Parser;
use client::app::{now_ms, App, ClientConfig};
use log::{error, info};
use macroquad::prelude::*;
use shared::{SURFACE_HEIGHT, SURFACE_WIDTH};

const WINDOW_SCALE: f32 = 8.0;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebSocket endpoint of the game server
    #[arg(short = 'e', long, env = "ROGUE_WS_LOCATION", default_value = shared::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Root the image assets are served from
    #[arg(short = 'o', long, env = "ROGUE_ASSET_ORIGIN", default_value = ".")]
    origin: String,

    /// Character to play
    #[arg(short = 's', long, default_value = shared::WARRIOR)]
    sprite: String,

    /// Name shown to other players
    #[arg(short = 'u', long)]
    username: Option<String>,

    /// Minimum milliseconds between movement commands
    #[arg(short = 'c', long, default_value_t = client::input::DEFAULT_COOLDOWN_MS)]
    cooldown_ms: u64,
}

impl From<Args> for ClientConfig {
    fn from(args: Args) -> Self {
        ClientConfig {
            endpoint: args.endpoint,
            origin: args.origin,
            sprite: args.sprite,
            username: args.username,
            cooldown_ms: args.cooldown_ms,
        }
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Rogue".to_string(),
        window_width: (SURFACE_WIDTH * WINDOW_SCALE) as i32,
        window_height: (SURFACE_HEIGHT * WINDOW_SCALE) as i32,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Server: {}", args.endpoint);
    info!("Controls: arrow keys to move, Enter to (re)connect, Escape to quit");

    let mut app = match App::new(args.into()) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start network runtime: {}", e);
            return;
        }
    };

    // Failure is shown in the HUD; Enter retries.
    let _ = app.connect(now_ms());

    while app.frame().await {
        next_frame().await;
    }

    app.shutdown();
}
