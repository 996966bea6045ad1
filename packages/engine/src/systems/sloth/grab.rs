//! Grab controller
//!
//! Per-hand grip state. A grip is a revolute joint from the hand's center to
//! the target body, anchored wherever the hand was at the moment of grabbing.
//! The target is never owned: the controller only flips its grabbed flag and
//! drops the grip if the target disappears underneath it.

use crate::core::math::Vec2;
use crate::systems::physics::{BodyRef, JointRef, PhysicsWorld, RevoluteDesc};

use super::limb::{LimbChain, Side};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Grip {
    joint: Option<JointRef>,
    target: Option<BodyRef>,
}

pub struct GrabController {
    grips: [Grip; 2],
    most_recently_grabbed: Option<Side>,
    most_recent_target: Option<BodyRef>,
    /// One-arm mode: the hand the grab button drives.
    active: Side,
    did_safe_grab: bool,
    waiting_for_safe_release: bool,
    grabbed_event: bool,
    released_event: bool,
    shared_anchor_radius: f32,
}

impl GrabController {
    pub fn new(shared_anchor_radius: f32) -> Self {
        Self {
            grips: [Grip::default(); 2],
            most_recently_grabbed: None,
            most_recent_target: None,
            active: Side::Right,
            did_safe_grab: false,
            waiting_for_safe_release: false,
            grabbed_event: false,
            released_event: false,
            shared_anchor_radius,
        }
    }

    /// Attach `side`'s hand to `target`. No-op while that hand already holds,
    /// without a live target, or during the tick of a safe grab.
    pub fn grab(&mut self, world: &mut PhysicsWorld, chain: &LimbChain, target: Option<BodyRef>, side: Side) -> bool {
        if self.did_safe_grab {
            return false;
        }
        self.grabbed_event = false;
        self.most_recently_grabbed = Some(side);

        let Some(target) = target else {
            return false;
        };
        if self.grips[side.index()].joint.is_some() || !world.contains(target) || chain.has_body(target) {
            return false;
        }

        let Some(mut anchor) = world.position(chain.hand(side)) else {
            return false;
        };
        // Two hands on the same spot share one anchor so they don't fight.
        if self.grips[side.other().index()].joint.is_some() {
            if let Some(other) = world.position(chain.hand(side.other())) {
                if other.distance(anchor) < self.shared_anchor_radius {
                    anchor = other;
                }
            }
        }
        let Some(local) = world.local_point(target, anchor) else {
            return false;
        };
        let Some(joint) = world.create_revolute(&RevoluteDesc::new(chain.hand(side), Vec2::ZERO, target, local)) else {
            return false;
        };

        self.grips[side.index()] = Grip {
            joint: Some(joint),
            target: Some(target),
        };
        self.most_recent_target = Some(target);
        world.set_grabbed(target, true);
        self.grabbed_event = true;
        true
    }

    /// Let go with `side`. No-op without a grip or during a safe grab.
    pub fn release(&mut self, world: &mut PhysicsWorld, side: Side) -> bool {
        if self.did_safe_grab {
            return false;
        }
        let released = self.drop_grip(world, side);
        if self.most_recently_grabbed == Some(side) {
            self.most_recently_grabbed = None;
        }
        released
    }

    fn drop_grip(&mut self, world: &mut PhysicsWorld, side: Side) -> bool {
        let grip = std::mem::take(&mut self.grips[side.index()]);
        let Some(joint) = grip.joint else {
            return false;
        };
        world.remove_joint(joint);
        if let Some(target) = grip.target {
            world.set_grabbed(target, false);
        }
        self.active = side.other();
        self.released_event = true;
        true
    }

    /// One-arm hand swap. On the press of the button, with one hand holding
    /// on and a grabbable candidate under the other, the grip moves across in
    /// one call. Nothing is let go unless the new grip can be made. After a
    /// swap nothing else happens until the button comes back up.
    pub fn set_safe_grab(
        &mut self,
        world: &mut PhysicsWorld,
        chain: &LimbChain,
        held: bool,
        just_pressed: bool,
        left_candidate: Option<BodyRef>,
        right_candidate: Option<BodyRef>,
    ) -> bool {
        self.grabbed_event = false;
        self.released_event = false;
        self.did_safe_grab = false;
        if self.waiting_for_safe_release && held {
            return false;
        }
        self.waiting_for_safe_release = false;
        if !just_pressed {
            return false;
        }

        let (from, candidate) = match (self.is_held(Side::Left), self.is_held(Side::Right)) {
            (true, false) => (Side::Left, right_candidate),
            (false, true) => (Side::Right, left_candidate),
            _ => return false,
        };
        let to = from.other();
        let Some(candidate) = candidate.filter(|&c| self.can_hold(world, chain, c)) else {
            return false;
        };
        if world.position(chain.hand(to)).is_none() {
            return false;
        }

        let previous = (self.grips[from.index()].target, self.active);
        self.drop_grip(world, from);
        if !self.grab(world, chain, Some(candidate), to) {
            // Joint creation refused: put the old grip back.
            self.grab(world, chain, previous.0, from);
            self.active = previous.1;
            return false;
        }
        self.did_safe_grab = true;
        self.released_event = true;
        self.waiting_for_safe_release = true;
        true
    }

    fn can_hold(&self, world: &PhysicsWorld, chain: &LimbChain, target: BodyRef) -> bool {
        world.contains(target) && world.grabbable_kind(target).is_some() && !chain.has_body(target)
    }

    /// Forget grips whose joint or target no longer exists in the world.
    pub fn prune(&mut self, world: &mut PhysicsWorld) {
        for side in Side::BOTH {
            let grip = self.grips[side.index()];
            let Some(joint) = grip.joint else {
                continue;
            };
            let target_alive = grip.target.map_or(false, |t| world.contains(t));
            if !target_alive || !world.contains_joint(joint) {
                self.drop_grip(world, side);
            }
        }
    }

    /// Drop every grip regardless of the safe-grab latch.
    pub fn release_all(&mut self, world: &mut PhysicsWorld) {
        self.did_safe_grab = false;
        self.waiting_for_safe_release = false;
        for side in Side::BOTH {
            self.drop_grip(world, side);
        }
    }

    pub fn clear_events(&mut self) {
        self.grabbed_event = false;
        self.released_event = false;
    }

    #[inline]
    pub fn is_held(&self, side: Side) -> bool {
        self.grips[side.index()].joint.is_some()
    }

    pub fn is_grabbing(&self) -> bool {
        self.is_held(Side::Left) || self.is_held(Side::Right)
    }

    pub fn target(&self, side: Side) -> Option<BodyRef> {
        self.grips[side.index()].target
    }

    pub fn active_hand(&self) -> Side {
        self.active
    }

    pub fn did_safe_grab(&self) -> bool {
        self.did_safe_grab
    }

    pub fn waiting_for_safe_release(&self) -> bool {
        self.waiting_for_safe_release
    }

    pub fn grabbed_event(&self) -> bool {
        self.grabbed_event
    }

    pub fn released_event(&self) -> bool {
        self.released_event
    }

    pub fn most_recently_grabbed(&self) -> Option<Side> {
        self.most_recently_grabbed
    }

    pub fn most_recent_target(&self) -> Option<BodyRef> {
        self.most_recent_target
    }

    /// With both hands holding, `left_wins(left_pos, right_pos)` picks. With
    /// one, that hand's target answers every query.
    fn pick(&self, world: &PhysicsWorld, left_wins: impl Fn(Vec2, Vec2) -> bool) -> Option<BodyRef> {
        let live = |side: Side| self.target(side).filter(|&t| world.contains(t));
        match (live(Side::Left), live(Side::Right)) {
            (Some(l), Some(r)) => {
                let (lp, rp) = (world.position(l)?, world.position(r)?);
                Some(if left_wins(lp, rp) { l } else { r })
            }
            (l, r) => l.or(r),
        }
    }

    pub fn leftmost_target(&self, world: &PhysicsWorld) -> Option<BodyRef> {
        self.pick(world, |l, r| l.x < r.x)
    }

    pub fn rightmost_target(&self, world: &PhysicsWorld) -> Option<BodyRef> {
        self.pick(world, |l, r| l.x >= r.x)
    }

    pub fn top_target(&self, world: &PhysicsWorld) -> Option<BodyRef> {
        self.pick(world, |l, r| l.y > r.y)
    }

    pub fn bottom_target(&self, world: &PhysicsWorld) -> Option<BodyRef> {
        self.pick(world, |l, r| l.y <= r.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::SlothConfig;
    use crate::domain::filter::{CAT_ALL, CAT_VINE};
    use crate::systems::physics::{BodyDesc, Scenery, SceneryKind};

    struct Rig {
        world: PhysicsWorld,
        chain: LimbChain,
        grabs: GrabController,
    }

    fn rig() -> Rig {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let chain = LimbChain::build(&mut world, &SlothConfig::default(), Vec2::ZERO).unwrap();
        Rig {
            world,
            chain,
            grabs: GrabController::new(0.3),
        }
    }

    fn branch(world: &mut PhysicsWorld, at: Vec2) -> BodyRef {
        let body = world.create_body(&BodyDesc::fixed(0.5, 0.05).with_position(at).with_groups(CAT_VINE, CAT_ALL));
        world.register_grabbable(body, Box::new(Scenery::new(SceneryKind::Branch)));
        body
    }

    #[test]
    fn second_grab_is_a_no_op() {
        let mut r = rig();
        let a = branch(&mut r.world, Vec2::new(-1.0, 0.1));
        let b = branch(&mut r.world, Vec2::new(-1.0, 2.0));
        let joints = r.world.joint_count();

        assert!(r.grabs.grab(&mut r.world, &r.chain, Some(a), Side::Left));
        assert!(!r.grabs.grab(&mut r.world, &r.chain, Some(b), Side::Left));
        assert_eq!(r.world.joint_count(), joints + 1);
        assert_eq!(r.grabs.target(Side::Left), Some(a));
        assert!(r.world.is_grabbed(a));
        assert!(!r.world.is_grabbed(b));
    }

    #[test]
    fn grab_without_target_still_marks_hand() {
        let mut r = rig();
        assert!(!r.grabs.grab(&mut r.world, &r.chain, None, Side::Right));
        assert_eq!(r.grabs.most_recently_grabbed(), Some(Side::Right));
        assert!(!r.grabs.is_grabbing());
    }

    #[test]
    fn release_twice_is_harmless() {
        let mut r = rig();
        let a = branch(&mut r.world, Vec2::new(1.0, 0.1));
        r.grabs.grab(&mut r.world, &r.chain, Some(a), Side::Right);
        assert!(r.grabs.release(&mut r.world, Side::Right));
        assert!(r.grabs.released_event());
        assert!(!r.grabs.release(&mut r.world, Side::Right));
        assert!(!r.grabs.is_held(Side::Right));
        assert!(!r.world.is_grabbed(a));
        assert_eq!(r.world.joint_count(), 4);
    }

    #[test]
    fn safe_grab_swaps_hands_in_one_call() {
        let mut r = rig();
        let a = branch(&mut r.world, Vec2::new(-1.0, 0.1));
        let b = branch(&mut r.world, Vec2::new(1.0, 0.1));
        r.grabs.grab(&mut r.world, &r.chain, Some(a), Side::Left);

        assert!(r.grabs.set_safe_grab(&mut r.world, &r.chain, true, true, None, Some(b)));
        // Never both free in between: right holds as left lets go.
        assert!(r.grabs.is_held(Side::Right));
        assert!(!r.grabs.is_held(Side::Left));
        assert!(!r.world.is_grabbed(a));
        assert!(r.world.is_grabbed(b));
        assert!(r.grabs.released_event());
        assert_eq!(r.grabs.active_hand(), Side::Right);

        // The rest of the tick is locked out.
        assert!(!r.grabs.release(&mut r.world, Side::Right));
        assert!(!r.grabs.grab(&mut r.world, &r.chain, Some(a), Side::Left));

        // Holding the button keeps waiting; letting go re-arms.
        assert!(!r.grabs.set_safe_grab(&mut r.world, &r.chain, true, false, Some(a), None));
        assert!(r.grabs.waiting_for_safe_release());
        assert!(!r.grabs.set_safe_grab(&mut r.world, &r.chain, false, false, Some(a), None));
        assert!(!r.grabs.waiting_for_safe_release());
        assert!(r.grabs.set_safe_grab(&mut r.world, &r.chain, true, true, Some(a), None));
        assert!(r.grabs.is_held(Side::Left));
    }

    #[test]
    fn safe_grab_waits_for_a_fresh_press() {
        let mut r = rig();
        let a = branch(&mut r.world, Vec2::new(-1.0, 0.1));
        let b = branch(&mut r.world, Vec2::new(1.0, 0.1));
        r.grabs.grab(&mut r.world, &r.chain, Some(a), Side::Left);

        assert!(!r.grabs.set_safe_grab(&mut r.world, &r.chain, true, false, None, Some(b)));
        assert!(r.grabs.is_held(Side::Left));
        assert!(!r.grabs.is_held(Side::Right));
        assert!(!r.world.is_grabbed(b));
    }

    #[test]
    fn safe_grab_needs_a_candidate() {
        let mut r = rig();
        let a = branch(&mut r.world, Vec2::new(-1.0, 0.1));
        r.grabs.grab(&mut r.world, &r.chain, Some(a), Side::Left);
        assert!(!r.grabs.set_safe_grab(&mut r.world, &r.chain, true, true, None, None));
        assert!(r.grabs.is_held(Side::Left));
    }

    #[test]
    fn failed_safe_grab_keeps_the_old_grip() {
        let mut r = rig();
        let a = branch(&mut r.world, Vec2::new(-1.0, 0.1));
        let b = branch(&mut r.world, Vec2::new(1.0, 0.1));
        let c = branch(&mut r.world, Vec2::new(0.0, 3.0));
        r.grabs.grab(&mut r.world, &r.chain, Some(a), Side::Left);
        r.grabs.grab(&mut r.world, &r.chain, Some(b), Side::Right);

        // Both hands busy: nowhere to swap to.
        assert!(!r.grabs.set_safe_grab(&mut r.world, &r.chain, true, true, Some(c), Some(c)));
        assert!(r.grabs.is_held(Side::Left) && r.grabs.is_held(Side::Right));
        assert!(r.world.is_grabbed(a) && r.world.is_grabbed(b));

        // Own limb or unregistered bodies are not candidates.
        r.grabs.release(&mut r.world, Side::Right);
        let own = r.chain.arm(Side::Right);
        assert!(!r.grabs.set_safe_grab(&mut r.world, &r.chain, true, true, None, Some(own)));
        let plain = r.world.create_body(&BodyDesc::fixed(0.5, 0.05).with_position(Vec2::new(1.0, 0.1)));
        assert!(!r.grabs.set_safe_grab(&mut r.world, &r.chain, true, true, None, Some(plain)));
        assert!(r.grabs.is_held(Side::Left));
        assert_eq!(r.grabs.target(Side::Left), Some(a));
        assert!(r.world.is_grabbed(a));
    }

    #[test]
    fn removed_target_is_pruned() {
        let mut r = rig();
        let a = branch(&mut r.world, Vec2::new(1.0, 0.1));
        r.grabs.grab(&mut r.world, &r.chain, Some(a), Side::Right);
        r.world.remove_body(a);
        r.grabs.prune(&mut r.world);
        assert!(!r.grabs.is_grabbing());
        assert!(r.grabs.leftmost_target(&r.world).is_none());
    }

    #[test]
    fn target_queries() {
        let mut r = rig();
        assert!(r.grabs.top_target(&r.world).is_none());

        let low_left = branch(&mut r.world, Vec2::new(-1.0, 0.1));
        let high_right = branch(&mut r.world, Vec2::new(1.0, 0.2));
        r.grabs.grab(&mut r.world, &r.chain, Some(low_left), Side::Left);
        for query in [
            GrabController::leftmost_target,
            GrabController::rightmost_target,
            GrabController::top_target,
            GrabController::bottom_target,
        ] {
            assert_eq!(query(&r.grabs, &r.world), Some(low_left));
        }

        r.grabs.grab(&mut r.world, &r.chain, Some(high_right), Side::Right);
        assert_eq!(r.grabs.leftmost_target(&r.world), Some(low_left));
        assert_eq!(r.grabs.rightmost_target(&r.world), Some(high_right));
        assert_eq!(r.grabs.top_target(&r.world), Some(high_right));
        assert_eq!(r.grabs.bottom_target(&r.world), Some(low_left));
    }
}
