//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod bubble;
pub mod collision;
pub mod connectivity;
pub mod enemy;
pub mod explosion;
pub mod geometry;
pub mod matching;
pub mod placement;
pub mod state;
pub mod tick;

pub use bubble::{Bubble, BubbleState, Element, Special};
pub use collision::{CollisionResult, WallOutcome, bubble_wall_collision, find_contact};
pub use connectivity::{find_floating, find_supported, finish_clear, prune_disconnected};
pub use enemy::{Enemy, EnemyKind, StrikeShape};
pub use explosion::{Blast, detonate, detonate_all, golden_hit, strike_enemy};
pub use geometry::{GridGeometry, are_neighbors, distance, hex_neighbor_offsets, snap_to_grid_cell};
pub use matching::{find_connected_matches, resolve_match};
pub use placement::{attach_shot, resolve_placement};
pub use state::{ClearCause, GameEvent, GamePhase, GameState, Outcome, Snapshot};
pub use tick::{TickInput, tick};
