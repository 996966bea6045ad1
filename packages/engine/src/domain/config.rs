//! Sloth tunables
//!
//! Loaded once from the game's `config.json` blob and handed to each actor as
//! an immutable value. Only the `flow*` keys are read; any other keys in the
//! blob are ignored. Every field is optional and falls back to the shipped
//! defaults.

use serde::{Deserialize, Serialize};

/// How the two sticks map onto the two arms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ControlMode {
    /// Each stick drives its own arm.
    TwoArm,
    /// The left stick drives whichever arm is not anchoring the body.
    OneArm,
}

impl TryFrom<u8> for ControlMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ControlMode::TwoArm),
            1 => Ok(ControlMode::OneArm),
            other => Err(format!("unknown control mode {}", other)),
        }
    }
}

impl From<ControlMode> for u8 {
    fn from(mode: ControlMode) -> u8 {
        match mode {
            ControlMode::TwoArm => 0,
            ControlMode::OneArm => 1,
        }
    }
}

/// How a held grab button becomes a grab intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MovementMode {
    /// Held means grab.
    GrabNormal,
    /// Held means let go.
    GrabReverse,
    /// Each press flips the hand between grabbing and open.
    GrabToggle,
}

impl TryFrom<u8> for MovementMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MovementMode::GrabNormal),
            1 => Ok(MovementMode::GrabReverse),
            2 => Ok(MovementMode::GrabToggle),
            other => Err(format!("unknown movement mode {}", other)),
        }
    }
}

impl From<MovementMode> for u8 {
    fn from(mode: MovementMode) -> u8 {
        match mode {
            MovementMode::GrabNormal => 0,
            MovementMode::GrabReverse => 1,
            MovementMode::GrabToggle => 2,
        }
    }
}

/// Body part dimensions in world units (before `object_scale`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LimbLayout {
    pub body_width: f32,
    pub body_height: f32,
    pub arm_width: f32,
    pub arm_height: f32,
    /// Gap between the torso edge and the arm's center span.
    pub shoulder_gap: f32,
    pub shoulder_x: f32,
    pub shoulder_y: f32,
    pub hand_width: f32,
    pub hand_height: f32,
    /// How far the wrist sits in from the end of the arm.
    pub hand_inset: f32,
    pub hand_density: f32,
    /// Shrinks collision boxes relative to the layout above.
    pub object_scale: f32,
    pub torso_mass: f32,
    pub torso_linear_damping: f32,
    pub limb_friction: f32,
    /// Max motor torque on every chain joint. Acts as joint friction only.
    pub joint_friction_torque: f32,
    /// Hands closer than this share one grab anchor.
    pub shared_anchor_radius: f32,
}

impl LimbLayout {
    /// Shoulder-to-wrist span used for both the arm placement and the
    /// catch-impulse lever arm.
    pub fn arm_reach(&self) -> f32 {
        self.arm_width / 2.0 + self.shoulder_gap
    }

    /// Wrist anchor on the arm, measured from the arm's center.
    pub fn wrist_offset(&self) -> f32 {
        self.arm_width / 2.0 - self.hand_width * 2.0 - self.hand_inset
    }

    /// Full span from hand to hand with both arms stretched out.
    pub fn armspan(&self) -> f32 {
        self.arm_reach() * 2.0 - 0.05
    }
}

impl Default for LimbLayout {
    fn default() -> Self {
        Self {
            body_width: 1.8 * (489.0 / 835.0),
            body_height: 1.4,
            arm_width: 1.75,
            arm_height: 0.5,
            shoulder_gap: 0.375,
            shoulder_x: 0.0,
            shoulder_y: 0.10,
            hand_width: 0.1,
            hand_height: 0.1,
            hand_inset: 0.3,
            hand_density: 10.0,
            object_scale: 1.0 / 1.5,
            torso_mass: 0.590_313_8,
            torso_linear_damping: 0.08,
            limb_friction: 0.4,
            joint_friction_torque: 1.0,
            shared_anchor_radius: 0.3,
        }
    }
}

/// Arm controller gains. The defaults are the tuned gameplay values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArmTuning {
    /// Logistic torque law: `amplitude / (1 + exp(w + gain * err)) - offset`.
    pub law_amplitude: f32,
    pub law_offset: f32,
    pub law_error_gain: f32,
    /// Body angular velocity is multiplied by this before entering the law.
    pub omega_gain: f32,
    pub counter_factor: f32,
    /// Stick deflection above which an arm counts as extended.
    pub extension_threshold: f32,
    /// Target direction change per tick below which the stick counts as still.
    pub settle_threshold: f32,
    /// Catch impulses on a grabbing arm are multiplied by this.
    pub grab_stabilization: f32,
    pub counter_catch_gain: f32,
    /// Active torque is scaled by this on ticks where a catch impulse fires.
    pub catch_force_scale: f32,
    /// Seconds of angular velocity used to predict the next heading.
    pub heading_lookahead: f32,
    pub gimp_cutoff: f32,
    pub gimp_falloff: f32,
    pub power_normalizer: f32,
    pub power_smoothing: f32,
    /// Fixed simulation rate the catch impulses are sized for.
    pub step_hz: f32,
}

impl Default for ArmTuning {
    fn default() -> Self {
        Self {
            law_amplitude: 10.0,
            law_offset: 5.0,
            law_error_gain: 4.0,
            omega_gain: 2.0,
            counter_factor: 0.3,
            extension_threshold: 0.4,
            settle_threshold: 0.05,
            grab_stabilization: 6.0,
            counter_catch_gain: 3.0,
            catch_force_scale: 0.3,
            heading_lookahead: 1.0 / 20.0,
            gimp_cutoff: 21.0,
            gimp_falloff: 4.5,
            power_normalizer: 22.0,
            power_smoothing: 0.10,
            step_hz: 60.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlothConfig {
    #[serde(rename = "flowTorque")]
    pub torque: f32,
    #[serde(rename = "flowGravityScale")]
    pub gravity_scale: f32,
    #[serde(rename = "flowCanMoveGrabbingHand")]
    pub grabbing_hand_has_torque: bool,
    #[serde(rename = "flowOmegaNormalizer")]
    pub omega_normalizer: f32,
    #[serde(rename = "flowArmDensity")]
    pub arm_density: f32,
    #[serde(rename = "flowMovementMode")]
    pub movement_mode: MovementMode,
    #[serde(rename = "flowControlMode")]
    pub control_mode: ControlMode,
    pub layout: LimbLayout,
    pub tuning: ArmTuning,
}

impl Default for SlothConfig {
    fn default() -> Self {
        Self {
            torque: 3.0,
            gravity_scale: 1.0,
            grabbing_hand_has_torque: true,
            omega_normalizer: 20.0,
            arm_density: 1.0,
            movement_mode: MovementMode::GrabNormal,
            control_mode: ControlMode::TwoArm,
            layout: LimbLayout::default(),
            tuning: ArmTuning::default(),
        }
    }
}

impl SlothConfig {
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: SlothConfig = serde_json::from_str(json).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("flowOmegaNormalizer", self.omega_normalizer),
            ("flowArmDensity", self.arm_density),
            ("layout.bodyWidth", self.layout.body_width),
            ("layout.bodyHeight", self.layout.body_height),
            ("layout.armWidth", self.layout.arm_width),
            ("layout.armHeight", self.layout.arm_height),
            ("layout.handWidth", self.layout.hand_width),
            ("layout.handHeight", self.layout.hand_height),
            ("layout.handDensity", self.layout.hand_density),
            ("layout.objectScale", self.layout.object_scale),
            ("layout.torsoMass", self.layout.torso_mass),
            ("tuning.gimpFalloff", self.tuning.gimp_falloff),
            ("tuning.powerNormalizer", self.tuning.power_normalizer),
            ("tuning.stepHz", self.tuning.step_hz),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{} must be a positive number, got {}", key, value));
            }
        }

        if !self.torque.is_finite() || !self.gravity_scale.is_finite() {
            return Err("flowTorque and flowGravityScale must be finite".to_string());
        }

        let smoothing = self.tuning.power_smoothing;
        if !(smoothing > 0.0 && smoothing <= 1.0) {
            return Err(format!("tuning.powerSmoothing must be in (0, 1], got {}", smoothing));
        }

        Ok(())
    }

    /// Fixed tick length the controller assumes.
    pub fn dt(&self) -> f32 {
        1.0 / self.tuning.step_hz
    }
}
