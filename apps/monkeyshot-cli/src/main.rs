use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use monkeyshot_common::EntityKind;
use monkeyshot_game::{Game, GameConfig};
use monkeyshot_input::{FIRE, FORWARD, InputState, LEFT, RIGHT};
use monkeyshot_render::{HeadlessScene, describe};
use tracing_subscriber::EnvFilter;

/// Simulated display refresh rate.
const REFRESH_HZ: f64 = 60.0;

#[derive(Parser)]
#[command(name = "monkeyshot-cli", about = "Run monkeyshot sessions headless")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Play a scripted session and report the outcome
    Play {
        /// Number of display frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Level seed; overrides the config file
        #[arg(short, long)]
        seed: Option<u64>,
        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Hold the fire button the whole time
        #[arg(long)]
        fire: bool,
        /// Hold forward the whole time
        #[arg(long)]
        forward: bool,
        /// Hold a turn button the whole time
        #[arg(long, value_enum)]
        turn: Option<Turn>,
        /// Print every visual at the end
        #[arg(long)]
        dump: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Turn {
    Left,
    Right,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("monkeyshot-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", monkeyshot_common::crate_info());
            println!("kernel: {}", monkeyshot_kernel::crate_info());
            println!("input: {}", monkeyshot_input::crate_info());
            println!("render: {}", monkeyshot_render::crate_info());
            println!("game: {}", monkeyshot_game::crate_info());
        }
        Commands::Play {
            frames,
            seed,
            config,
            fire,
            forward,
            turn,
            dump,
        } => {
            let mut config = match config {
                Some(path) => GameConfig::from_yaml_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => GameConfig::default(),
            };
            if let Some(seed) = seed {
                config.seed = seed;
            }
            println!("Playing {frames} frames: seed={}", config.seed);

            let mut input = InputState::with_default_bindings();
            let held = [
                (fire, FIRE),
                (forward, FORWARD),
                (matches!(turn, Some(Turn::Left)), LEFT),
                (matches!(turn, Some(Turn::Right)), RIGHT),
            ];
            for (on, name) in held {
                if on {
                    input.press(name)?;
                }
            }

            let mut game = Game::new(HeadlessScene::default(), config)?;
            let frame_ms = 1000.0 / REFRESH_HZ;
            game.run(0.0);
            for i in 1..=frames {
                if !game.frame(i as f64 * frame_ms, &input) {
                    break;
                }
            }
            game.stop();

            let counters = game.counters();
            tracing::info!(
                score = *counters.score.get(),
                time_ms = *counters.time.get(),
                level = *counters.level.get(),
                monkeys = game.monkeys().len(),
                "session finished"
            );
            println!(
                "Score: {}, time: {:.0} ms, level: {}",
                counters.score.get(),
                counters.time.get(),
                counters.level.get()
            );
            println!(
                "Monkeys: {}, bullets: {}, sparks: {}, buildings: {}",
                game.monkeys().len(),
                game.bullets().len(),
                game.sparks().len(),
                game.buildings().len()
            );
            if let Some(player) = game.player() {
                let p = player.position();
                println!(
                    "Player: pos=({:.2}, {:.2}, {:.2}) yaw={:.2}",
                    p.x,
                    p.y,
                    p.z,
                    player.yaw()
                );
            }
            println!(
                "Scene: frames={}, live sparks={}",
                game.scene().frames_rendered(),
                game.scene().count_of(EntityKind::Spark)
            );
            if dump {
                print!("{}", describe(game.scene()));
            }
            game.destroy();
        }
    }

    Ok(())
}
