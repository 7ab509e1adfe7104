//! Session lifecycle
//!
//! A [`Session`] owns one game at a time and moves it through
//! `Start -> Playing -> GameOver -> Ranking -> Start`. Only `Playing`
//! advances the simulation. The finished game is signed and handed to the
//! score sink exactly once.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::{BarrageError, Result};
use crate::input::{InputEvent, InputHandler};
use crate::play_limit::{PlayLimit, PlayLimitSource, check_gate};
use crate::rankings::{RankingEntry, Rankings, ScoreTier};
use crate::scheduler::{FrameOutcome, FrameScheduler};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, tick};
use crate::submission::{GameplayData, ScoreData, ScoreSink, ScoreSubmission, sign};

/// Externally visible lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Title screen
    Start,
    Playing,
    GameOver,
    /// Leaderboard screen
    Ranking,
}

pub struct Session<S: ScoreSink> {
    settings: Settings,
    lifecycle: Lifecycle,
    state: GameState,
    rng: Pcg32,
    seed: u64,
    input: InputHandler,
    scheduler: FrameScheduler,
    sink: S,
    rankings: Rankings,
    /// One-time override granted by the payment collaborator
    play_permission: bool,
    plays_started: u32,
    /// Guards the single submission per game
    submitted: bool,
    first_frame: Option<f64>,
    last_frame: f64,
    last_events: Vec<GameEvent>,
    last_submission: Option<ScoreSubmission>,
}

impl<S: ScoreSink> Session<S> {
    /// Create a session on the start screen. Loads the leaderboard file if
    /// one is configured.
    pub fn new(settings: Settings, sink: S) -> Result<Self> {
        let rankings = match &settings.rankings_file {
            Some(path) => Rankings::load(path)?,
            None => Rankings::new(),
        };
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(&mut rng);

        Ok(Self {
            settings,
            lifecycle: Lifecycle::Start,
            state,
            rng,
            seed,
            input: InputHandler::new(),
            scheduler: FrameScheduler::new(),
            sink,
            rankings,
            play_permission: false,
            plays_started: 0,
            submitted: false,
            first_frame: None,
            last_frame: 0.0,
            last_events: Vec::new(),
            last_submission: None,
        })
    }

    /// Begin a new game if the play limit allows it.
    ///
    /// `limit` is the latest play-limit response; `None` is unrestricted.
    /// Any play permission is consumed.
    pub fn start(&mut self, limit: Option<&PlayLimit>) -> Result<()> {
        if self.lifecycle == Lifecycle::Playing {
            return Err(BarrageError::InvalidTransition(
                "start while already playing".to_string(),
            ));
        }
        if let Err(e) = check_gate(limit, self.play_permission) {
            if let Some(limit) = limit {
                log::info!(
                    "{}, resets in {}h",
                    e,
                    limit.hours_until_reset(utc_hour(unix_millis()))
                );
            }
            return Err(e);
        }
        if let Some(limit) = limit {
            log::info!(
                "Play {} of {} today",
                limit.current_count.saturating_add(1),
                limit.daily_limit
            );
        }
        self.play_permission = false;

        self.seed = self.settings.seed.unwrap_or_else(|| rand::rng().random());
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.state = GameState::new(&mut self.rng);
        self.input.reset();
        self.submitted = false;
        self.first_frame = None;
        self.last_frame = 0.0;
        self.last_events.clear();
        self.plays_started += 1;

        self.scheduler.arm();
        self.lifecycle = Lifecycle::Playing;
        log::info!(
            "Session started (seed {}, play {})",
            self.seed,
            self.plays_started
        );
        Ok(())
    }

    /// Query the play-limit collaborator, then start. A failed query is
    /// logged and treated as no limit.
    pub fn start_with(&mut self, source: &mut impl PlayLimitSource) -> Result<()> {
        let limit = match source.play_limit(self.settings.player.id) {
            Ok(limit) => Some(limit),
            Err(e) => {
                log::warn!("Play limit lookup failed: {}", e);
                None
            }
        };
        self.start(limit.as_ref())
    }

    /// Hook for the payment collaborator
    pub fn grant_play_permission(&mut self) {
        log::info!("Play permission granted");
        self.play_permission = true;
    }

    /// One scheduled frame at host time `now` (ms)
    pub fn frame(&mut self, now: f64) -> FrameOutcome {
        if self.lifecycle != Lifecycle::Playing {
            self.scheduler.cancel();
            return FrameOutcome::Stop;
        }
        let Some(clock) = self.scheduler.advance(now) else {
            return FrameOutcome::Stop;
        };
        self.first_frame.get_or_insert(now);
        self.last_frame = now;

        let input = self.input.take_tick_input(self.settings.autopilot);
        let outcome = tick(&mut self.state, &input, clock, &mut self.rng);
        self.last_events = outcome.events;

        if outcome.collisions.player_destroyed {
            self.game_over();
            return FrameOutcome::Stop;
        }
        FrameOutcome::Continue
    }

    fn game_over(&mut self) {
        self.lifecycle = Lifecycle::GameOver;
        self.scheduler.cancel();
        let score = self.state.score;
        log::info!(
            "Game over: score {} ({}), bosses cleared {}",
            score,
            ScoreTier::for_score(score).as_str(),
            self.state.boss_clear_count
        );

        let rank = self.rankings.add(RankingEntry {
            score,
            display_name: self.settings.player.display_name.clone(),
            boss_clears: self.state.boss_clear_count,
            timestamp: unix_millis(),
        });
        if let Some(rank) = rank {
            log::info!("New ranking #{}", rank);
            if let Some(path) = &self.settings.rankings_file {
                if let Err(e) = self.rankings.save(path) {
                    log::warn!("Failed to save rankings: {}", e);
                }
            }
        }

        self.submit_once();
    }

    fn submit_once(&mut self) {
        if self.submitted {
            return;
        }
        self.submitted = true;

        if !self.settings.should_submit() {
            log::info!("Score submission skipped");
            return;
        }
        let Some(key) = self.settings.signing_key.as_deref() else {
            log::warn!("Score submission skipped: {}", BarrageError::MissingSigningKey);
            return;
        };

        let player = &self.settings.player;
        let data = ScoreData {
            score: self.state.score,
            fid: player.id,
            user_name: player.user_name.clone(),
            display_name: player.display_name.clone(),
            pfp_url: player.avatar_url.clone(),
            gameplay_data: GameplayData {
                shots_fired: self.state.stats.shots_fired,
                enemies_destroyed: self.state.stats.enemies_destroyed,
                powerups_collected: self.state.stats.powerups_collected,
                play_duration: self.play_duration_ms(),
                timestamp: unix_millis(),
            },
        };

        let submission = match sign(data, key.as_bytes()) {
            Ok(submission) => submission,
            Err(e) => {
                log::warn!("Failed to sign score: {}", e);
                return;
            }
        };
        match self.sink.submit(&submission) {
            Ok(()) => log::info!("Score {} submitted", submission.data.score),
            Err(e) => log::warn!("Score submission failed: {}", e),
        }
        self.last_submission = Some(submission);
    }

    /// Milliseconds between the first and latest frame of this game
    pub fn play_duration_ms(&self) -> u64 {
        self.first_frame
            .map(|first| (self.last_frame - first).max(0.0) as u64)
            .unwrap_or(0)
    }

    /// Show the leaderboard (from the start or game-over screen)
    pub fn show_rankings(&mut self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Start | Lifecycle::GameOver | Lifecycle::Ranking => {
                self.lifecycle = Lifecycle::Ranking;
                Ok(())
            }
            Lifecycle::Playing => Err(BarrageError::InvalidTransition(
                "rankings while playing".to_string(),
            )),
        }
    }

    pub fn back_to_start(&mut self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Playing => Err(BarrageError::InvalidTransition(
                "back to start while playing".to_string(),
            )),
            _ => {
                self.lifecycle = Lifecycle::Start;
                Ok(())
            }
        }
    }

    // === Input (ignored unless playing) ===

    pub fn set_player_target(&mut self, x: f32) {
        if self.lifecycle == Lifecycle::Playing {
            self.input.set_player_target(x);
        }
    }

    pub fn set_firing_intent(&mut self, firing: bool) {
        if self.lifecycle == Lifecycle::Playing {
            self.input.set_firing_intent(firing);
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        if self.lifecycle == Lifecycle::Playing {
            self.input.handle(event, self.state.player_x);
        }
    }

    // === Read-only views ===

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Rendering snapshot
    pub fn snapshot(&self) -> &GameState {
        &self.state
    }

    /// Events from the most recent tick
    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    pub fn last_submission(&self) -> Option<&ScoreSubmission> {
        self.last_submission.as_ref()
    }

    pub fn rankings(&self) -> &Rankings {
        &self.rankings
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn plays_started(&self) -> u32 {
        self.plays_started
    }

    pub fn has_play_permission(&self) -> bool {
        self.play_permission
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Hour of day (UTC) for a unix timestamp in ms
fn utc_hour(unix_ms: u64) -> u8 {
    (unix_ms / 3_600_000 % 24) as u8
}
