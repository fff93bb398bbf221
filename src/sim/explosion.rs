//! Special bubble effects
//!
//! Dynamite clears a circle, a mine clears its row, and a downed enemy does
//! one or the other depending on its kind. Dynamite caught in any blast is
//! queued and goes off on its own once the blast that caught it has been
//! scored and pruned, so no bubble is ever counted twice.

use std::collections::VecDeque;

use glam::Vec2;

use super::bubble::Special;
use super::connectivity::finish_clear;
use super::enemy::{Enemy, StrikeShape};
use super::geometry::distance;
use super::state::{ClearCause, GameEvent, GameState};
use crate::consts::MINE_BAND;

/// Area swept by one blast
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Blast {
    Circle { center: Vec2, radius: f32 },
    Band { y: f32, half_height: f32 },
}

impl Blast {
    /// Dynamite blast at `center`, sized by the level
    pub fn dynamite(state: &GameState, center: Vec2) -> Self {
        Blast::Circle {
            center,
            radius: state.level.dynamite_blast_radius(),
        }
    }

    /// Mine blast along the row at height `y`
    pub fn mine(state: &GameState, y: f32) -> Self {
        Blast::Band {
            y,
            half_height: MINE_BAND * state.level.geometry.spacing,
        }
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        match *self {
            Blast::Circle { center, radius } => distance(center, pos) <= radius,
            Blast::Band { y, half_height } => (pos.y - y).abs() <= half_height,
        }
    }
}

/// Set off a single dynamite or mine at `pos`
pub fn detonate(state: &mut GameState, special: Special, pos: Vec2) -> usize {
    detonate_all(state, &[(special, pos)])
}

/// Set off payloads one after another, including everything they chain into
///
/// Returns the number of bubbles the blasts themselves cleared (pruned
/// bubbles are scored separately).
pub fn detonate_all(state: &mut GameState, payloads: &[(Special, Vec2)]) -> usize {
    let queue: VecDeque<(Special, Vec2)> = payloads
        .iter()
        .copied()
        .filter(|(special, _)| special.detonates())
        .collect();
    run_chain(state, queue)
}

/// Resolve a shot that hit a flying enemy
pub fn strike_enemy(state: &mut GameState, enemy: &Enemy) -> usize {
    log::debug!("{:?} #{} shot down at {:?}", enemy.kind, enemy.id, enemy.pos);
    state.events.push(GameEvent::EnemyStruck {
        kind: enemy.kind,
        pos: enemy.pos,
    });

    let blast = match enemy.kind.strike_shape() {
        StrikeShape::Radius => Blast::dynamite(state, enemy.pos),
        StrikeShape::Row => Blast::mine(state, enemy.pos.y),
    };
    let chained = clear_blast(state, blast, ClearCause::EnemyStrike);
    let cleared = chained.cleared;
    cleared + run_chain(state, chained.dynamite.into())
}

/// Pay the golden bonus if the struck bubble is golden
///
/// Paid on contact, whether or not the shot then finds a place to attach.
pub fn golden_hit(state: &mut GameState, struck_id: u32) -> bool {
    let golden = state
        .bubble(struck_id)
        .is_some_and(|b| b.special == Special::Golden);
    if golden {
        let bonus = state.tuning.golden_bonus;
        state.award_bonus(bonus);
        state.events.push(GameEvent::GoldenHit { id: struck_id, bonus });
    }
    golden
}

fn run_chain(state: &mut GameState, mut queue: VecDeque<(Special, Vec2)>) -> usize {
    let mut cleared = 0;
    while let Some((special, pos)) = queue.pop_front() {
        let (blast, cause) = match special {
            Special::Dynamite => (Blast::dynamite(state, pos), ClearCause::Dynamite),
            Special::Mine => (Blast::mine(state, pos.y), ClearCause::Mine),
            Special::None | Special::Golden => continue,
        };
        state.events.push(GameEvent::Detonated { special, pos });

        let result = clear_blast(state, blast, cause);
        cleared += result.cleared;
        queue.extend(result.dynamite);
    }
    cleared
}

struct BlastResult {
    cleared: usize,
    /// Dynamite caught in the blast, still to go off
    dynamite: Vec<(Special, Vec2)>,
}

fn clear_blast(state: &mut GameState, blast: Blast, cause: ClearCause) -> BlastResult {
    let victims: Vec<u32> = state
        .grid
        .iter()
        .filter(|b| blast.contains(b.pos))
        .map(|b| b.id)
        .collect();
    let removed = state.take_bubbles(&victims);

    let dynamite = removed
        .iter()
        .filter(|b| b.special == Special::Dynamite)
        .map(|b| (b.special, b.pos))
        .collect();

    if !removed.is_empty() {
        log::debug!("{:?} blast cleared {} bubbles", cause, removed.len());
    }
    finish_clear(state, cause, &removed);

    BlastResult {
        cleared: removed.len(),
        dynamite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelConfig, SpecialOdds};
    use crate::sim::bubble::Element;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::matching::resolve_match;
    use crate::tuning::Tuning;

    fn empty_state(level: u32) -> GameState {
        let level = LevelConfig {
            special_odds: SpecialOdds::NONE,
            ..LevelConfig::for_level(level)
        };
        GameState::empty(level, Tuning::default(), 21)
    }

    fn put(state: &mut GameState, row: i32, col: i32, element: Element, special: Special) -> u32 {
        let pos = state.level.geometry.cell_center(row, col);
        state
            .insert_attached(pos, element, special)
            .unwrap_or_else(|| panic!("cell ({row},{col}) occupied"))
    }

    fn cleared_total(state: &GameState) -> usize {
        state
            .events
            .iter()
            .map(|e| match e {
                GameEvent::Cleared { count, .. } => *count,
                _ => 0,
            })
            .sum()
    }

    #[test]
    fn test_blast_shapes() {
        let circle = Blast::Circle {
            center: Vec2::ZERO,
            radius: 10.0,
        };
        assert!(circle.contains(Vec2::new(10.0, 0.0)));
        assert!(!circle.contains(Vec2::new(7.5, 7.5)));

        let band = Blast::Band {
            y: 100.0,
            half_height: 18.0,
        };
        assert!(band.contains(Vec2::new(-500.0, 115.0)));
        assert!(!band.contains(Vec2::new(0.0, 120.0)));
    }

    #[test]
    fn test_dynamite_chain_counts_each_bubble_once() {
        // Level 9: blast radius of three diameters (120px)
        let mut state = empty_state(9);
        use Element::*;
        let row = [Fire, Fire, Fire, Water, Earth, Air, Water, Earth, Air, Water];
        let mut ids = Vec::new();
        for (col, element) in row.into_iter().enumerate() {
            let special = match col {
                2 | 4 => Special::Dynamite,
                _ => Special::None,
            };
            ids.push(put(&mut state, 0, col as i32, element, special));
        }

        let popped = resolve_match(&mut state, ids[0]);
        assert_eq!(popped, 3);

        // First dynamite takes columns 3-4, the second (caught in it) takes 5-6
        let remaining: Vec<u32> = state.grid.iter().map(|b| b.id).collect();
        assert_eq!(remaining, ids[7..].to_vec());
        assert_eq!(cleared_total(&state), 7);
        assert_eq!(state.score, 7 * state.shots_remaining as u64);

        let detonations = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Detonated { special: Special::Dynamite, .. }))
            .count();
        assert_eq!(detonations, 2);
    }

    #[test]
    fn test_mine_clears_row_then_chains_dynamite() {
        let mut state = empty_state(9);
        for col in 0..8 {
            put(&mut state, 0, col, Element::Water, Special::None);
        }
        let seed = put(&mut state, 2, 0, Element::Fire, Special::None);
        put(&mut state, 1, 0, Element::Fire, Special::Mine);
        put(&mut state, 1, 1, Element::Fire, Special::None);
        for col in 2..8 {
            let special = if col == 6 { Special::Dynamite } else { Special::None };
            let element = if col % 2 == 0 { Element::Earth } else { Element::Air };
            put(&mut state, 1, col, element, special);
        }
        let dynamite_pos = state.level.geometry.cell_center(1, 6);

        resolve_match(&mut state, seed);

        let row_one_y = state.level.geometry.cell_center(1, 0).y;
        assert!(state.grid.iter().all(|b| (b.pos.y - row_one_y).abs() > 1.0));
        assert!(state
            .grid
            .iter()
            .all(|b| distance(b.pos, dynamite_pos) > state.level.dynamite_blast_radius()));

        let order: Vec<Special> = state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Detonated { special, .. } => Some(*special),
                _ => None,
            })
            .collect();
        assert_eq!(order, vec![Special::Mine, Special::Dynamite]);
        // Match 3, mine 6, dynamite takes top-row columns 4-7
        assert_eq!(state.grid.len(), 4);
        assert_eq!(cleared_total(&state), 13);
    }

    #[test]
    fn test_mine_set_off_directly() {
        let mut state = empty_state(1);
        for col in 0..5 {
            put(&mut state, 0, col, Element::Water, Special::None);
            put(&mut state, 1, col, Element::Fire, Special::None);
        }
        let pos = state.level.geometry.cell_center(1, 7);

        assert_eq!(detonate(&mut state, Special::Mine, pos), 5);
        assert_eq!(state.grid.len(), 5);
        assert_eq!(state.events[0], GameEvent::Detonated { special: Special::Mine, pos });
        // Golden bubbles never detonate
        assert_eq!(detonate(&mut state, Special::Golden, pos), 0);
        assert_eq!(state.grid.len(), 5);
    }

    #[test]
    fn test_airplane_strike_is_radial() {
        let mut state = empty_state(9);
        for col in 0..10 {
            put(&mut state, 0, col, Element::ALL[col as usize % 4], Special::None);
        }
        let enemy = Enemy::new(99, EnemyKind::Airplane, state.level.geometry.cell_center(0, 0), Vec2::ZERO, 28.0);
        let cleared = strike_enemy(&mut state, &enemy);
        // 0, 45, 90 px away are inside 120px; 135 is not
        assert_eq!(cleared, 3);
        assert_eq!(state.grid.len(), 7);
    }

    #[test]
    fn test_helicopter_strike_clears_row() {
        let mut state = empty_state(9);
        for col in 0..6 {
            put(&mut state, 0, col, Element::Water, Special::None);
            put(&mut state, 1, col, Element::Air, Special::None);
        }
        let mut pos = state.level.geometry.cell_center(1, 9);
        pos.x = 500.0;
        let enemy = Enemy::new(99, EnemyKind::Helicopter, pos, Vec2::ZERO, 28.0);
        assert_eq!(strike_enemy(&mut state, &enemy), 6);
        assert_eq!(state.grid.len(), 6);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::Cleared { cause: ClearCause::EnemyStrike, count: 6, .. }
        )));
    }

    #[test]
    fn test_golden_hit_pays_bonus() {
        let mut state = empty_state(1);
        let gold = put(&mut state, 0, 0, Element::Fire, Special::Golden);
        let plain = put(&mut state, 0, 1, Element::Fire, Special::None);
        assert!(golden_hit(&mut state, gold));
        assert!(!golden_hit(&mut state, plain));
        assert_eq!(state.score, state.tuning.golden_bonus);
    }
}
