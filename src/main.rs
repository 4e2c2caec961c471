//! Lane Dodger headless driver
//!
//! Runs one session with a scripted pointer weaving across the road and
//! prints the final frame as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result, anyhow};
    use clap::Parser;
    use lane_dodger::consts::SIM_DT_MS;
    use lane_dodger::sim::RunPhase;
    use lane_dodger::{ControlMode, Game, QualityPreset, Settings, Tuning};

    /// Pointer sweep period of the weave script (ms)
    const WEAVE_PERIOD_MS: f64 = 2400.0;

    #[derive(Parser, Debug)]
    #[command(name = "lane-dodger")]
    #[command(about = "Run a headless lane-dodging session and print the final frame")]
    struct Cli {
        /// Gameplay RNG seed
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Simulated seconds before stopping (a crash stops earlier)
        #[arg(long, default_value_t = 30.0)]
        seconds: f64,
        #[arg(long, default_value_t = 400.0)]
        width: f32,
        #[arg(long, default_value_t = 700.0)]
        height: f32,
        /// JSON file overriding balance values
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// JSON settings file
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Override the control mode (follow, half-screen)
        #[arg(long)]
        control_mode: Option<String>,
        /// Override the quality preset (low, medium, high)
        #[arg(long)]
        quality: Option<String>,
    }

    fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Tuning::from_json(&json).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        let tuning = load_tuning(cli.tuning.as_ref())?;
        let mut settings = cli.settings.as_deref().map(Settings::load).unwrap_or_default();
        if let Some(mode) = cli.control_mode.as_deref() {
            settings.control_mode =
                ControlMode::from_str(mode).ok_or_else(|| anyhow!("unknown control mode '{mode}'"))?;
        }
        if let Some(quality) = cli.quality.as_deref() {
            settings.quality =
                QualityPreset::from_str(quality).ok_or_else(|| anyhow!("unknown quality preset '{quality}'"))?;
        }
        let mode = settings.control_mode;

        log::info!(
            "Session starting (seed {}, {}x{}, {} controls, {} quality)",
            cli.seed,
            cli.width,
            cli.height,
            mode.as_str(),
            settings.quality.as_str()
        );
        let mut game = Game::new(cli.seed, cli.width, cli.height, tuning, settings);
        game.start();

        let center = cli.width / 2.0;
        let reach = game.state.track.road_width * 0.4;
        game.pointer_down(0, center, 0.0);

        let mut now = 0.0;
        game.frame(now);
        while now < cli.seconds * 1000.0 && game.phase() == RunPhase::Running {
            now += SIM_DT_MS as f64;
            let sweep = (now / WEAVE_PERIOD_MS * std::f64::consts::TAU).sin() as f32;
            let x = center + sweep * reach;
            match mode {
                ControlMode::Follow => game.pointer_move(0, x, 0.0),
                ControlMode::HalfScreen => {
                    game.pointer_up(0);
                    game.pointer_down(0, x, 0.0);
                }
            }
            game.frame(now);
        }

        log::info!(
            "Session over after {:.1}s: score {} ({:?})",
            game.state.elapsed_ms / 1000.0,
            game.score(),
            game.phase()
        );
        let json = game.view().to_json().context("serializing final frame")?;
        println!("{}", json);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `lane_dodger::Game` directly
}
