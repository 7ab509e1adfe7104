//! Barrage headless runner
//!
//! Plays one autopiloted game at a fixed 16ms frame rate and writes the
//! signed score submission to stdout as a JSON line.
//!
//! Usage: `barrage [settings.json]`

use std::path::PathBuf;

use barrage::consts::BASE_FRAME_MS;
use barrage::scheduler::FrameOutcome;
use barrage::submission::JsonLinesSink;
use barrage::{Result, ScoreTier, Session, Settings};

/// Ten minutes of frames
const MAX_FRAMES: u32 = 37_500;

fn main() {
    env_logger::init();
    log::info!("Barrage (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("barrage.json"));
    let mut settings = Settings::load(&path)?;
    settings.autopilot = true;

    let mut session = Session::new(settings, JsonLinesSink::new(std::io::stdout()))?;
    session.start(None)?;

    let mut now = 0.0;
    let mut frames = 0;
    while frames < MAX_FRAMES && session.frame(now) == FrameOutcome::Continue {
        now += BASE_FRAME_MS;
        frames += 1;
    }

    let state = session.snapshot();
    if frames == MAX_FRAMES {
        log::info!("Frame cap reached, autopilot survived");
    }
    log::info!(
        "Final score {} ({}) after {:.1}s, bosses cleared {}, shots {}, kills {}, power-ups {}",
        state.score,
        ScoreTier::for_score(state.score).as_str(),
        session.play_duration_ms() as f64 / 1000.0,
        state.boss_clear_count,
        state.stats.shots_fired,
        state.stats.enemies_destroyed,
        state.stats.powerups_collected
    );
    Ok(())
}
