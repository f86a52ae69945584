/*
MIT License

Copyright (c) 2026 Vincent Hiribarren

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Vertical jump of a single object over a flat floor. The motion is a plain
//! explicit Euler integration of gravity, with a clamp at the rest height and
//! a damped velocity reflection on each floor contact, so a jump decays into
//! shorter and shorter bounces until the object rests again.

use log::debug;

pub struct JumpParams {
    pub gravity: f32,
    pub impulse: f32,
    pub rest_height: f32,
    pub restitution: f32,
}

impl Default for JumpParams {
    fn default() -> Self {
        Self {
            gravity: -9.8 * 0.6,
            impulse: 4.2,
            rest_height: 0.85,
            restitution: 0.4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpState {
    pub position: f32,
    pub velocity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpPhase {
    Grounded,
    Airborne,
}

pub struct JumpController {
    params: JumpParams,
    state: JumpState,
}

impl Default for JumpController {
    fn default() -> Self {
        Self::new(JumpParams::default())
    }
}

impl JumpController {
    // Tolerance over the rest height below which the object counts as
    // grounded, so float noise cannot lock the jump out.
    const GROUNDED_EPSILON: f32 = 1e-6;

    #[must_use]
    pub fn new(params: JumpParams) -> Self {
        let state = JumpState {
            position: params.rest_height,
            velocity: 0.0,
        };
        Self { params, state }
    }

    #[must_use]
    pub fn state(&self) -> JumpState {
        self.state
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.state.position
    }

    /// The phase is derived from the position on every call, never stored, so
    /// it cannot drift out of sync with the motion.
    #[must_use]
    pub fn phase(&self) -> JumpPhase {
        if self.state.position <= self.params.rest_height + Self::GROUNDED_EPSILON {
            JumpPhase::Grounded
        } else {
            JumpPhase::Airborne
        }
    }

    /// Starts a jump if the object is grounded. Triggers while airborne are
    /// rejected, there is no double jump.
    pub fn trigger_jump(&mut self) -> bool {
        if self.phase() != JumpPhase::Grounded {
            return false;
        }
        self.state.velocity = self.params.impulse;
        debug!("Jump triggered");
        true
    }

    /// Advances the motion by `dt` seconds. Zero, negative and non-finite
    /// deltas leave the state untouched.
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.state.velocity += self.params.gravity * dt;
        self.state.position += self.state.velocity * dt;
        if self.state.position <= self.params.rest_height {
            self.state.position = self.params.rest_height;
            self.state.velocity = -self.state.velocity * self.params.restitution;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const REST: f32 = 0.85;

    #[test]
    fn starts_grounded_at_rest_height() {
        let jump = JumpController::default();
        assert_eq!(jump.phase(), JumpPhase::Grounded);
        assert_relative_eq!(jump.height(), REST);
        assert_relative_eq!(jump.state().velocity, 0.0);
    }

    #[test]
    fn trigger_from_the_ground_sets_the_impulse() {
        let mut jump = JumpController::default();
        assert!(jump.trigger_jump());
        assert_relative_eq!(jump.state().velocity, 4.2);
        jump.tick(1.0 / 60.0);
        assert_eq!(jump.phase(), JumpPhase::Airborne);
    }

    #[test]
    fn airborne_trigger_is_rejected() {
        let mut jump = JumpController::default();
        assert!(jump.trigger_jump());
        jump.tick(0.1);
        let velocity_before = jump.state().velocity;
        assert!(!jump.trigger_jump());
        assert_relative_eq!(jump.state().velocity, velocity_before);
    }

    #[test]
    fn degenerate_deltas_leave_the_state_untouched() {
        let mut jump = JumpController::default();
        jump.trigger_jump();
        jump.tick(0.1);
        let snapshot = jump.state();
        jump.tick(0.0);
        jump.tick(-0.25);
        jump.tick(f32::NAN);
        jump.tick(f32::INFINITY);
        assert_eq!(jump.state(), snapshot);
    }

    #[test]
    fn bounces_decay_and_never_sink_below_rest() {
        let mut jump = JumpController::default();
        jump.trigger_jump();
        let mut positions = Vec::new();
        for _ in 0..50 {
            jump.tick(0.1);
            positions.push(jump.height());
        }
        for position in &positions {
            assert!(*position >= REST);
        }
        let first_contact = positions
            .iter()
            .position(|position| (position - REST).abs() < 1e-6)
            .unwrap();
        let first_peak = positions[..first_contact]
            .iter()
            .fold(f32::MIN, |acc, p| acc.max(*p));
        let second_contact = first_contact
            + 1
            + positions[first_contact + 1..]
                .iter()
                .position(|position| (position - REST).abs() < 1e-6)
                .unwrap();
        let second_peak = positions[first_contact + 1..second_contact]
            .iter()
            .fold(f32::MIN, |acc, p| acc.max(*p));
        assert!(first_peak > 2.0 && first_peak < 2.4, "first peak {first_peak}");
        assert!(second_peak < first_peak);
        assert!(second_peak > REST);
    }

    #[test]
    fn comes_to_rest_after_enough_time() {
        let mut jump = JumpController::default();
        jump.trigger_jump();
        for _ in 0..1000 {
            jump.tick(0.016);
        }
        assert_eq!(jump.phase(), JumpPhase::Grounded);
        assert_relative_eq!(jump.height(), REST);
        assert!(jump.state().velocity.abs() < 0.2);
    }

    #[test]
    fn trigger_works_again_after_landing() {
        let mut jump = JumpController::default();
        assert!(jump.trigger_jump());
        jump.tick(0.05);
        assert_eq!(jump.phase(), JumpPhase::Airborne);
        let mut steps = 0;
        while jump.phase() == JumpPhase::Airborne {
            jump.tick(0.05);
            steps += 1;
            assert!(steps < 100, "never landed");
        }
        assert!(jump.trigger_jump());
    }
}
