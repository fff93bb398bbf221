//! Game state and core simulation types
//!
//! Everything one level of play needs lives here: the attached grid, shots in
//! flight, the loaded bubble, counters, and the seeded RNG.

use std::collections::HashSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bubble::{Bubble, BubbleState, Element, Special};
use super::enemy::{Enemy, EnemyKind};
use super::geometry::overlaps;
use crate::consts::TOP_BAND;
use crate::direction_from_degrees;
use crate::level::LevelConfig;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Grid cleared
    Won,
    /// Out of shots, or the grid reached the danger line
    Lost,
}

/// Why bubbles left the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearCause {
    Match,
    Dynamite,
    Mine,
    EnemyStrike,
    /// Lost their path to the top row
    Disconnect,
    /// No top-row bubbles were left, so everything went
    GridWipe,
}

/// Things that happened during a tick, for rendering and audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { id: u32, aim_degrees: f32 },
    ShotMissed { id: u32 },
    /// No overlap-free slot existed near the contact point
    ShotDiscarded { id: u32 },
    BubblePlaced { id: u32, pos: Vec2 },
    GoldenHit { id: u32, bonus: u64 },
    Detonated { special: Special, pos: Vec2 },
    EnemyStruck { kind: EnemyKind, pos: Vec2 },
    Cleared { cause: ClearCause, count: usize, points: u64 },
    Won,
    Lost,
}

/// Final result handed to persistence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub level: u32,
    pub score: u64,
    pub won: bool,
    pub shots_remaining: u32,
}

/// Read-only view of the state for rendering
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub score: u64,
    pub shots_remaining: u32,
    pub aim_degrees: f32,
    pub grid: &'a [Bubble],
    pub shots: &'a [Bubble],
    pub loaded: Option<&'a Bubble>,
    pub falling: &'a [Bubble],
    pub enemies: &'a [Enemy],
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub level: LevelConfig,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Never decreases
    pub score: u64,
    pub shots_remaining: u32,
    /// Current aim, degrees (90 = straight up)
    pub aim_degrees: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Attached bubbles (sorted by id for determinism)
    pub grid: Vec<Bubble>,
    /// Shots in flight (sorted by id)
    pub shots: Vec<Bubble>,
    /// Next bubble to fire
    pub loaded: Option<Bubble>,
    /// Pruned bubbles dropping off screen (not gameplay-affecting)
    pub falling: Vec<Bubble>,
    /// Flying enemies crossing the arena (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Events raised since the start of the current tick
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a level with a populated grid and a loaded bubble
    pub fn new(level: LevelConfig, tuning: Tuning, seed: u64) -> Self {
        let mut state = Self::with_rng(level, tuning, Pcg32::seed_from_u64(seed));
        state.seed = seed;
        state
    }

    /// Same as `new`, with an externally seeded generator
    pub fn with_rng(level: LevelConfig, tuning: Tuning, rng: Pcg32) -> Self {
        let mut state = Self::empty_with_rng(level, tuning, rng);
        state.populate_grid();
        log::info!(
            "{} ({}): {} bubbles, {} shots",
            state.level.name,
            state.level.shape.as_str(),
            state.grid.len(),
            state.shots_remaining
        );
        state
    }

    /// A level with an empty grid, for spawners that lay out bubbles themselves
    pub fn empty(level: LevelConfig, tuning: Tuning, seed: u64) -> Self {
        let mut state = Self::empty_with_rng(level, tuning, Pcg32::seed_from_u64(seed));
        state.seed = seed;
        state
    }

    fn empty_with_rng(level: LevelConfig, tuning: Tuning, rng: Pcg32) -> Self {
        let level = level.normalized();
        let mut state = Self {
            seed: 0,
            rng,
            shots_remaining: level.max_shots,
            level,
            tuning,
            phase: GamePhase::Playing,
            score: 0,
            aim_degrees: 90.0,
            time_ticks: 0,
            grid: Vec::new(),
            shots: Vec::new(),
            loaded: None,
            falling: Vec::new(),
            enemies: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };
        state.load_next_bubble();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fill the starting grid from the level's rows, columns and shape
    fn populate_grid(&mut self) {
        let level = self.level.clone();
        for row in 0..level.rows {
            for col in 0..level.columns {
                if !level.shape.should_place(row, col, level.rows, level.columns) {
                    continue;
                }
                let pos = level.geometry.cell_center(row as i32, col as i32);
                let element = Element::random(&mut self.rng);
                let special = level.special_odds.roll(&mut self.rng);
                self.insert_attached(pos, element, special);
            }
        }
    }

    /// Put a bubble straight into the grid
    ///
    /// Returns `None` (and inserts nothing) if it would overlap an attached bubble.
    pub fn insert_attached(&mut self, pos: Vec2, element: Element, special: Special) -> Option<u32> {
        let radius = self.level.geometry.radius;
        if self.overlaps_grid(pos, radius) {
            return None;
        }
        let id = self.next_entity_id();
        let mut bubble = Bubble::new(id, pos, radius, element).with_special(special);
        bubble.attach_at(pos);
        self.attach(bubble);
        Some(id)
    }

    /// Add an attached bubble, keeping the grid sorted by id
    pub(crate) fn attach(&mut self, bubble: Bubble) {
        debug_assert_eq!(bubble.state, BubbleState::Attached);
        let index = self.grid.partition_point(|b| b.id < bubble.id);
        self.grid.insert(index, bubble);
    }

    /// Whether a circle at `pos` would overlap any attached bubble
    pub fn overlaps_grid(&self, pos: Vec2, radius: f32) -> bool {
        self.grid
            .iter()
            .any(|b| overlaps(pos, radius, b.pos, b.radius))
    }

    pub fn bubble(&self, id: u32) -> Option<&Bubble> {
        self.grid.iter().find(|b| b.id == id)
    }

    /// Remove every listed bubble from the grid in one pass
    pub fn take_bubbles(&mut self, ids: &[u32]) -> Vec<Bubble> {
        if ids.is_empty() {
            return Vec::new();
        }
        let ids: HashSet<u32> = ids.iter().copied().collect();
        let (removed, kept) = std::mem::take(&mut self.grid)
            .into_iter()
            .partition(|b| ids.contains(&b.id));
        self.grid = kept;
        removed
    }

    /// Load a fresh random bubble into the shooter
    pub fn load_next_bubble(&mut self) {
        let id = self.next_entity_id();
        let element = Element::random(&mut self.rng);
        let special = self.level.special_odds.roll(&mut self.rng);
        let bubble = Bubble::new(id, self.tuning.shooter, self.level.geometry.radius, element)
            .with_special(special);
        self.loaded = Some(bubble);
    }

    /// Launch the loaded bubble along the current aim
    ///
    /// Charges one shot. Returns false when nothing could be fired.
    pub fn fire_shot(&mut self) -> bool {
        if self.phase != GamePhase::Playing || self.shots_remaining == 0 {
            return false;
        }
        let Some(mut shot) = self.loaded.take() else {
            return false;
        };

        let aim = self.tuning.clamp_aim(self.aim_degrees);
        shot.pos = self.tuning.shooter;
        shot.launch(direction_from_degrees(aim), self.tuning.shot_speed);
        self.events.push(GameEvent::ShotFired {
            id: shot.id,
            aim_degrees: aim,
        });
        self.shots.push(shot);
        self.shots_remaining -= 1;

        if self.shots_remaining > 0 {
            self.load_next_bubble();
        }
        true
    }

    /// Spawn a flying enemy (the spawn schedule is up to the host)
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2, vel: Vec2) -> u32 {
        let id = self.next_entity_id();
        let enemy = Enemy::new(id, kind, pos, vel, self.tuning.enemy_radius);
        self.enemies.push(enemy);
        id
    }

    /// Credit a clearing event: `count × shots_remaining`
    pub fn award(&mut self, count: usize) -> u64 {
        let points = count as u64 * self.shots_remaining as u64;
        self.score += points;
        points
    }

    /// Credit a fixed bonus
    pub fn award_bonus(&mut self, bonus: u64) {
        self.score += bonus;
    }

    /// Line below which a bubble no longer counts as part of the top row
    pub fn top_band_y(&self) -> f32 {
        self.level.geometry.start_y - TOP_BAND * self.level.geometry.spacing
    }

    /// Centre distance under which two attached bubbles are neighbors
    pub fn neighbor_distance(&self) -> f32 {
        self.level
            .geometry
            .neighbor_distance(self.tuning.neighbor_tolerance)
    }

    /// Hand pruned bubbles over to the falling debris
    pub fn drop_bubbles(&mut self, removed: Vec<Bubble>) {
        for mut bubble in removed {
            bubble.start_falling();
            self.falling.push(bubble);
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Won | GamePhase::Lost)
    }

    /// Win as soon as the grid is empty
    pub fn check_win(&mut self) {
        if self.grid.is_empty() && !self.is_over() {
            log::info!("{} cleared with score {}", self.level.name, self.score);
            self.phase = GamePhase::Won;
            self.events.push(GameEvent::Won);
        }
    }

    /// Lose when the grid reaches the danger line, or when nothing is left to fire
    pub fn check_loss(&mut self) {
        if self.is_over() || self.grid.is_empty() {
            return;
        }
        let danger = self.tuning.danger_line_y;
        let breached = self.grid.iter().any(|b| b.pos.y - b.radius < danger);
        let exhausted = self.shots_remaining == 0 && self.shots.is_empty() && self.loaded.is_none();
        if breached || exhausted {
            log::info!(
                "{} lost ({}), score {}",
                self.level.name,
                if breached { "danger line" } else { "out of shots" },
                self.score
            );
            self.phase = GamePhase::Lost;
            self.events.push(GameEvent::Lost);
        }
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            score: self.score,
            shots_remaining: self.shots_remaining,
            aim_degrees: self.aim_degrees,
            grid: &self.grid,
            shots: &self.shots,
            loaded: self.loaded.as_ref(),
            falling: &self.falling,
            enemies: &self.enemies,
        }
    }

    /// Final result once the game is over
    pub fn outcome(&self) -> Option<Outcome> {
        self.is_over().then(|| Outcome {
            level: self.level.number,
            score: self.score,
            won: self.phase == GamePhase::Won,
            shots_remaining: self.shots_remaining,
        })
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.grid.sort_by_key(|b| b.id);
        self.shots.sort_by_key(|b| b.id);
        self.enemies.sort_by_key(|e| e.id);
    }
}
