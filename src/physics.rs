//! Discrete-time motion of the agent's bounding box: gravity, jump impulses and one-sided
//! platform contacts.

use crate::{constants::*, geometry::Aabb};
use serde::{Deserialize, Serialize};

/// World and motion parameters shared by every run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    pub screen_width: f64,
    pub screen_height: f64,
    pub gravity: f64,
    pub jump_impulse: f64,
    pub max_fall_speed: f64,
    pub move_speed: f64,
    pub max_action_frames: usize,
    pub agent_width: f64,
    pub agent_height: f64,
    pub agent_screen_x: f64,
    pub fall_margin: f64,
    pub stagnation_limit: usize,
    pub progress_threshold: f64,
    pub landing_epsilon: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            screen_width: HOPPER_SCREEN_WIDTH,
            screen_height: HOPPER_SCREEN_HEIGHT,
            gravity: HOPPER_GRAVITY,
            jump_impulse: HOPPER_JUMP_IMPULSE,
            max_fall_speed: HOPPER_MAX_FALL_SPEED,
            move_speed: HOPPER_MOVE_SPEED,
            max_action_frames: HOPPER_MAX_ACTION_FRAMES,
            agent_width: HOPPER_AGENT_WIDTH,
            agent_height: HOPPER_AGENT_HEIGHT,
            agent_screen_x: HOPPER_AGENT_SCREEN_X,
            fall_margin: HOPPER_FALL_MARGIN,
            stagnation_limit: HOPPER_STAGNATION_LIMIT,
            progress_threshold: HOPPER_PROGRESS_THRESHOLD,
            landing_epsilon: HOPPER_LANDING_EPSILON,
        }
    }
}

impl Physics {
    /// Whether a box has dropped far enough below the screen to count as lost
    #[inline]
    pub fn fell_off(&self, aabb: &Aabb) -> bool {
        aabb.top() > self.screen_height + self.fall_margin
    }
}

/// The outcome of testing a [Body] against one platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    None,
    /// came down onto the platform's top edge
    Landed,
    /// rose into the platform's bottom edge
    HeadBump,
}

/// The agent's bounding box with its vertical motion state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub aabb: Aabb,
    pub vel_y: f64,
    pub on_ground: bool,
}

impl Body {
    pub fn new(aabb: Aabb) -> Self {
        Self {
            aabb,
            vel_y: 0.,
            on_ground: false,
        }
    }

    /// Launch upward. Has no effect while airborne.
    pub fn jump(&mut self, impulse: f64) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vel_y = -impulse;
        self.on_ground = false;
        true
    }

    /// Accelerate downward, cap the fall speed and integrate the vertical position
    pub fn apply_gravity(&mut self, physics: &Physics) {
        self.vel_y = (self.vel_y + physics.gravity).min(physics.max_fall_speed);
        self.aabb.y += self.vel_y;
    }

    /// Resolve a vertical contact with `platform`, which must already be in the body's frame.
    ///
    /// A landing registers only while moving down, when the bottom edge is at or below the
    /// platform top now and was at or above it (within `epsilon`) one frame ago. Head bumps
    /// mirror this against the platform's bottom edge while moving up. Neither can catch a body
    /// that is already deep inside a platform.
    pub fn resolve(&mut self, platform: &Aabb, epsilon: f64) -> Contact {
        if !self.aabb.overlaps_x(platform) {
            return Contact::None;
        }

        let bottom = self.aabb.bottom();
        let previous_bottom = bottom - self.vel_y;
        if self.vel_y >= 0.
            && bottom >= platform.top()
            && previous_bottom <= platform.top() + epsilon
            && self.aabb.top() < platform.bottom()
        {
            self.aabb.set_bottom(platform.top());
            self.vel_y = 0.;
            self.on_ground = true;
            return Contact::Landed;
        }

        let top = self.aabb.top();
        let previous_top = top - self.vel_y;
        if self.vel_y < 0.
            && top <= platform.bottom()
            && previous_top >= platform.bottom() - epsilon
            && bottom > platform.top()
        {
            self.aabb.set_top(platform.bottom());
            self.vel_y = 0.;
            return Contact::HeadBump;
        }

        Contact::None
    }
}
