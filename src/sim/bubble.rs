//! Bubble entity and per-tick motion

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bubble color; three or more touching bubbles of one element pop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Water, Element::Earth, Element::Air];

    /// Uniformly random element
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Where a bubble is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BubbleState {
    /// Loaded in the shooter or in flight
    Free,
    /// At rest in the grid
    Attached,
    /// Pruned from the grid, dropping out of the arena (visual only)
    Falling,
}

/// Extra effect carried by a bubble on top of its element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Special {
    #[default]
    None,
    /// Clears a circle around itself when popped
    Dynamite,
    /// Clears its whole row when popped
    Mine,
    /// Pays a bonus when struck directly by a shot
    Golden,
}

impl Special {
    /// Dynamite and mines detonate when their bubble is matched
    pub fn detonates(&self) -> bool {
        matches!(self, Special::Dynamite | Special::Mine)
    }
}

/// A single bubble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub element: Element,
    pub state: BubbleState,
    pub special: Special,
    /// Reserved for bubbles that take several hits
    #[serde(default)]
    pub hit_count: u8,
}

impl Bubble {
    pub fn new(id: u32, pos: Vec2, radius: f32, element: Element) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            element,
            state: BubbleState::Free,
            special: Special::None,
            hit_count: 0,
        }
    }

    pub fn with_special(mut self, special: Special) -> Self {
        self.special = special;
        self
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.state == BubbleState::Attached
    }

    /// Send a loaded bubble off along `direction` at `speed`
    pub fn launch(&mut self, direction: Vec2, speed: f32) {
        if self.state == BubbleState::Free {
            self.vel = direction.normalize_or_zero() * speed;
        }
    }

    /// Come to rest at `pos` as part of the grid
    pub fn attach_at(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.state = BubbleState::Attached;
    }

    /// Leave the grid and start dropping
    pub fn start_falling(&mut self) {
        self.state = BubbleState::Falling;
        self.vel = Vec2::ZERO;
    }

    /// Integrate one timestep
    ///
    /// Falling bubbles use semi-implicit Euler (velocity first, then position);
    /// free bubbles fly in a straight line; attached bubbles never move.
    pub fn update(&mut self, dt: f32, gravity: f32) {
        match self.state {
            BubbleState::Falling => {
                self.vel.y -= gravity * dt;
                self.pos += self.vel * dt;
            }
            BubbleState::Free => {
                self.pos += self.vel * dt;
            }
            BubbleState::Attached => {}
        }
    }
}
