//! Collision categories
//!
//! Membership/filter bits for every collider in the world. Sloth parts only
//! ever collide with the environment, never with each other.

pub type CategoryBits = u32;

pub const CAT_NONE: CategoryBits = 0;
pub const CAT_SLOTH: CategoryBits = 1 << 0;
pub const CAT_BODY: CategoryBits = 1 << 1;
pub const CAT_ARM: CategoryBits = 1 << 2;
pub const CAT_HAND: CategoryBits = 1 << 3;
pub const CAT_VINE: CategoryBits = 1 << 4;
pub const CAT_WALL: CategoryBits = 1 << 5;
pub const CAT_WIN: CategoryBits = 1 << 6;
pub const CAT_LOSE: CategoryBits = 1 << 7;
pub const CAT_ALL: CategoryBits = u32::MAX;

/// Torso: walls and the level triggers.
pub const TORSO_MEMBERSHIP: CategoryBits = CAT_SLOTH | CAT_BODY;
pub const TORSO_FILTER: CategoryBits = CAT_WALL | CAT_LOSE | CAT_WIN;

/// Arm and hand solids only touch triggers.
pub const LIMB_MEMBERSHIP: CategoryBits = CAT_SLOTH | CAT_ARM;
pub const LIMB_FILTER: CategoryBits = CAT_LOSE | CAT_WIN;

/// Hand grab sensors see anything a hand can hold on to.
pub const HAND_SENSOR_MEMBERSHIP: CategoryBits = CAT_SLOTH | CAT_HAND;
pub const HAND_SENSOR_FILTER: CategoryBits = CAT_VINE | CAT_WALL | CAT_WIN;

#[inline]
pub fn interacts(membership_a: CategoryBits, filter_a: CategoryBits, membership_b: CategoryBits, filter_b: CategoryBits) -> bool {
    (membership_a & filter_b) != 0 && (membership_b & filter_a) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limbs_never_touch_torso_or_each_other() {
        assert!(!interacts(TORSO_MEMBERSHIP, TORSO_FILTER, LIMB_MEMBERSHIP, LIMB_FILTER));
        assert!(!interacts(LIMB_MEMBERSHIP, LIMB_FILTER, LIMB_MEMBERSHIP, LIMB_FILTER));
        assert!(!interacts(HAND_SENSOR_MEMBERSHIP, HAND_SENSOR_FILTER, TORSO_MEMBERSHIP, TORSO_FILTER));
    }

    #[test]
    fn hand_sensor_sees_vines_and_walls() {
        assert!(interacts(HAND_SENSOR_MEMBERSHIP, HAND_SENSOR_FILTER, CAT_VINE, CAT_ALL));
        assert!(interacts(HAND_SENSOR_MEMBERSHIP, HAND_SENSOR_FILTER, CAT_WALL, CAT_ALL));
        assert!(!interacts(HAND_SENSOR_MEMBERSHIP, HAND_SENSOR_FILTER, CAT_LOSE, CAT_ALL));
    }
}
