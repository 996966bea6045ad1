//! Arm torque controller
//!
//! Turns two stick vectors into one torque per arm. Pure computation over a
//! sampled `ControlFrame`: nothing here touches the physics world, so the
//! simulation can run it for many actors in parallel and apply the results
//! afterwards.
//!
//! Angles live in two frames. Body angles come from the physics world
//! (counter-clockwise, y up). Stick headings are `atan2(y, x)` with the
//! stick's y pointing down, so an arm's heading is its negated body angle.

use serde::Serialize;

use crate::core::math::{angle_diff, wrap_angle, Vec2};
use crate::domain::config::{ArmTuning, SlothConfig};

use super::limb::Side;

/// Logistic torque law, bounded by `law_offset` on both sides.
#[inline]
pub fn torque_law(tuning: &ArmTuning, delta_theta: f32, omega: f32) -> f32 {
    let x = omega as f64 + delta_theta as f64 * tuning.law_error_gain as f64;
    (tuning.law_amplitude as f64 / (1.0 + x.exp()) - tuning.law_offset as f64) as f32
}

/// Torque de-rating once either arm spins faster than the cutoff.
#[inline]
pub fn anti_gimp_scale(tuning: &ArmTuning, max_omega: f32) -> f32 {
    if max_omega > tuning.gimp_cutoff {
        (-(max_omega - tuning.gimp_cutoff) / tuning.gimp_falloff).exp()
    } else {
        1.0
    }
}

/// Stick heading of an arm whose body angle is `angle`.
#[inline]
pub fn arm_heading(angle: f32) -> f32 {
    wrap_angle(-angle)
}

/// In one-arm mode the single stick drives the free arm while `active` (the
/// hand the grab button controls) holds on, and `active` itself otherwise.
pub fn one_arm_driven(active: Side, left_held: bool, right_held: bool) -> Side {
    let to_right = match active {
        Side::Left => left_held,
        Side::Right => !right_held,
    };
    if to_right {
        Side::Right
    } else {
        Side::Left
    }
}

/// Route the left stick onto the driven arm and silence the other one. The
/// right stick is ignored in one-arm mode.
pub fn remap_one_arm(left_stick: Vec2, driven: Side) -> (Vec2, Vec2) {
    match driven {
        Side::Right => (Vec2::ZERO, left_stick),
        Side::Left => (left_stick, Vec2::ZERO),
    }
}

/// Arm state sampled from the world at the start of a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ArmSample {
    pub angle: f32,
    pub angular_velocity: f32,
    pub grabbing: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ControlFrame {
    pub left_stick: Vec2,
    pub right_stick: Vec2,
    pub left: ArmSample,
    pub right: ArmSample,
    pub pinned: bool,
    /// Set in one-arm mode: the hand the grab button currently controls.
    pub one_arm_active: Option<Side>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmCommand {
    /// Final torque after anti-gimp.
    pub torque: f32,
    /// False when a passive grabbing arm must not be driven.
    pub apply: bool,
    pub heading: f32,
    /// `(τ sin θ, τ cos θ)` before anti-gimp, for debug drawing.
    pub debug_force: Vec2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TorqueOutput {
    pub left: ArmCommand,
    pub right: ArmCommand,
    pub gimp_scale: f32,
    /// Arm following the stick in one-arm mode.
    pub driven: Option<Side>,
}

/// Per-arm terms shared by the active and cross-coupling paths.
struct ArmTerms {
    heading: f32,
    next_heading: f32,
    /// Gained angular velocity fed to the law and the anti-gimp cutoff.
    omega: f32,
    angular_velocity: f32,
    length: f32,
    delta: f32,
    target_change: f32,
    total_rotation: f32,
    inverse_target: f32,
    grabbing: bool,
}

impl ArmTerms {
    fn sample(tuning: &ArmTuning, stick: Vec2, arm: ArmSample, previous_target: f32) -> (Self, f32) {
        let target = stick.angle();
        let heading = arm_heading(arm.angle);
        let next_heading = wrap_angle(-arm.angle - arm.angular_velocity * tuning.heading_lookahead);
        let terms = ArmTerms {
            heading,
            next_heading,
            omega: arm.angular_velocity * tuning.omega_gain,
            angular_velocity: arm.angular_velocity,
            length: stick.length(),
            delta: angle_diff(target, heading),
            target_change: angle_diff(target, previous_target),
            total_rotation: angle_diff(target, next_heading),
            inverse_target: (-stick).angle(),
            grabbing: arm.grabbing,
        };
        (terms, target)
    }
}

pub struct ArmTorqueController {
    tuning: ArmTuning,
    torque_scale: f32,
    omega_normalizer: f32,
    grabbing_hand_has_torque: bool,
    /// Hand mass at full reach plus the arm's own inertia.
    swing_inertia: f32,
    previous_target: [f32; 2],
    power: f32,
}

impl ArmTorqueController {
    pub fn new(config: &SlothConfig, swing_inertia: f32) -> Self {
        Self {
            tuning: config.tuning.clone(),
            torque_scale: config.torque,
            omega_normalizer: config.omega_normalizer,
            grabbing_hand_has_torque: config.grabbing_hand_has_torque,
            swing_inertia,
            previous_target: [0.0; 2],
            power: 0.0,
        }
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn tuning(&self) -> &ArmTuning {
        &self.tuning
    }

    pub fn compute(&mut self, frame: &ControlFrame) -> TorqueOutput {
        let (left_stick, right_stick, driven) = match frame.one_arm_active {
            Some(active) => {
                let driven = one_arm_driven(active, frame.left.grabbing, frame.right.grabbing);
                let (l, r) = remap_one_arm(frame.left_stick, driven);
                (l, r, Some(driven))
            }
            None => (frame.left_stick, frame.right_stick, None),
        };

        let (l, l_target) = ArmTerms::sample(&self.tuning, left_stick, frame.left, self.previous_target[0]);
        let (r, r_target) = ArmTerms::sample(&self.tuning, right_stick, frame.right, self.previous_target[1]);
        self.previous_target = [l_target, r_target];

        let (l_torque, l_debug) = self.arm_torque(&l, &r, frame.pinned);
        let (r_torque, r_debug) = self.arm_torque(&r, &l, frame.pinned);

        let max_omega = l.omega.abs().max(r.omega.abs());
        let gimp_scale = anti_gimp_scale(&self.tuning, max_omega);
        let l_torque = l_torque * gimp_scale;
        let r_torque = r_torque * gimp_scale;

        self.smooth_power((l_torque * l_torque + r_torque * r_torque).sqrt());

        TorqueOutput {
            left: ArmCommand {
                torque: l_torque,
                apply: self.grabbing_hand_has_torque || !l.grabbing,
                heading: l.heading,
                debug_force: l_debug,
            },
            right: ArmCommand {
                torque: r_torque,
                apply: self.grabbing_hand_has_torque || !r.grabbing,
                heading: r.heading,
                debug_force: r_debug,
            },
            gimp_scale,
            driven,
        }
    }

    /// Exponential smoothing toward `torque_power / power_normalizer`.
    pub fn smooth_power(&mut self, torque_power: f32) -> f32 {
        let t = &self.tuning;
        self.power += (torque_power / t.power_normalizer - self.power) * t.power_smoothing;
        self.power = self.power.clamp(0.0, 1.0);
        self.power
    }

    /// Torque on `this` arm before anti-gimp, plus its debug vector.
    fn arm_torque(&self, this: &ArmTerms, other: &ArmTerms, pinned: bool) -> (f32, Vec2) {
        let t = &self.tuning;
        let settled = |terms: &ArmTerms| terms.target_change.abs() < t.settle_threshold;
        let momentum = self.swing_inertia * this.angular_velocity * -1.0 * t.step_hz;

        // Catch: cancel momentum that would carry the arm past its target.
        let mut impulse = 0.0;
        if settled(this) {
            if this.total_rotation * this.delta < 0.0 && this.length > t.extension_threshold {
                impulse = momentum / 2.0;
            }
            if this.grabbing {
                impulse *= t.grab_stabilization;
            }
        }

        // The other stick pulls a grabbing arm toward its opposite direction.
        let mut counter = 0.0;
        let mut counter_impulse = 0.0;
        if this.grabbing && other.length > t.extension_threshold {
            let cross_delta = angle_diff(other.inverse_target, this.heading);
            let cross_next = angle_diff(other.inverse_target, this.next_heading);
            counter = t.counter_factor
                * torque_law(t, cross_delta, this.omega / self.omega_normalizer)
                * ((1.0 - this.length) * 0.5 + 0.5);
            if cross_delta * cross_next < 0.0 && settled(other) {
                counter_impulse = momentum * t.counter_catch_gain * (1.0 - this.length);
            }
        }

        let mut force = torque_law(t, this.delta, this.omega / self.omega_normalizer);
        if impulse > 0.0 && !pinned {
            force *= t.catch_force_scale;
        }
        if pinned {
            impulse = 0.0;
            counter_impulse = 0.0;
        }

        let scale = self.torque_scale;
        let torque = scale * (force * this.length + scale * counter * other.length) + impulse + counter_impulse;
        let debug = Vec2::new(torque * this.heading.sin(), torque * this.heading.cos());
        (torque, debug)
    }
}
