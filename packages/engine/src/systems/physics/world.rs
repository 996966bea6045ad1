use std::collections::HashMap;

use rapier2d::prelude::*;

use crate::core::math::Vec2;
use crate::domain::filter::CategoryBits;

use super::bodies::{BodyDesc, BodyKind, BodyRef, JointRef, RevoluteDesc, SensorDesc, SensorRef};
use super::grabbable::{Grabbable, SceneryKind};

#[inline]
fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

#[inline]
fn to_point(v: Vec2) -> Point<Real> {
    point![v.x, v.y]
}

#[inline]
fn from_vector(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[inline]
fn groups(membership: CategoryBits, filter: CategoryBits) -> InteractionGroups {
    InteractionGroups::new(Group::from_bits_truncate(membership), Group::from_bits_truncate(filter))
}

/// Rigid-body world backed by rapier2d.
///
/// Owns every body and joint. Actors hold `BodyRef`/`JointRef` handles and go
/// through this type for all reads and writes, so a handle to a body that was
/// removed elsewhere just reads as absent.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    grabbables: HashMap<BodyRef, Box<dyn Grabbable>>,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: to_vector(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            grabbables: HashMap::new(),
        }
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = to_vector(gravity);
    }

    pub fn gravity(&self) -> Vec2 {
        from_vector(&self.gravity)
    }

    // === BODIES ===

    pub fn create_body(&mut self, desc: &BodyDesc) -> BodyRef {
        let builder = match desc.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
        };
        let mut builder = builder
            .translation(to_vector(desc.position))
            .rotation(desc.angle)
            .gravity_scale(desc.gravity_scale)
            .linear_damping(desc.linear_damping)
            .ccd_enabled(desc.ccd)
            .can_sleep(false);
        if desc.fixed_rotation {
            builder = builder.locked_axes(LockedAxes::ROTATION_LOCKED);
        }
        let handle = self.bodies.insert(builder.build());

        let collider = ColliderBuilder::cuboid(desc.half_extents.x, desc.half_extents.y)
            .density(desc.density)
            .friction(desc.friction)
            .collision_groups(groups(desc.membership, desc.filter))
            .build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);

        BodyRef(handle)
    }

    /// Removes a body with its colliders and every joint attached to it.
    pub fn remove_body(&mut self, body: BodyRef) -> bool {
        self.grabbables.remove(&body);
        self.bodies
            .remove(
                body.0,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    pub fn contains(&self, body: BodyRef) -> bool {
        self.bodies.contains(body.0)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn attach_sensor(&mut self, body: BodyRef, desc: &SensorDesc) -> Option<SensorRef> {
        if !self.bodies.contains(body.0) {
            return None;
        }
        let sensor = ColliderBuilder::cuboid(desc.half_extents.x, desc.half_extents.y)
            .sensor(true)
            .density(0.0)
            .collision_groups(groups(desc.membership, desc.filter))
            .build();
        Some(SensorRef(self.colliders.insert_with_parent(sensor, body.0, &mut self.bodies)))
    }

    /// Set the groups of every solid collider on `body`. Sensors keep theirs.
    pub fn set_collision_groups(&mut self, body: BodyRef, membership: CategoryBits, filter: CategoryBits) {
        let Some(rb) = self.bodies.get(body.0) else {
            return;
        };
        let handles: Vec<ColliderHandle> = rb.colliders().to_vec();
        for handle in handles {
            if let Some(collider) = self.colliders.get_mut(handle) {
                if !collider.is_sensor() {
                    collider.set_collision_groups(groups(membership, filter));
                }
            }
        }
    }

    pub fn set_rotation_locked(&mut self, body: BodyRef, locked: bool) {
        if let Some(rb) = self.bodies.get_mut(body.0) {
            rb.lock_rotations(locked, true);
        }
    }

    // === FORCES ===

    /// Torque for the next step only.
    pub fn apply_torque(&mut self, body: BodyRef, torque: f32) {
        if let Some(rb) = self.bodies.get_mut(body.0) {
            rb.add_torque(torque, true);
        }
    }

    /// Force at the center of mass for the next step only.
    pub fn apply_force(&mut self, body: BodyRef, force: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.0) {
            rb.add_force(to_vector(force), true);
        }
    }

    // === QUERIES ===

    pub fn position(&self, body: BodyRef) -> Option<Vec2> {
        self.bodies.get(body.0).map(|rb| from_vector(rb.translation()))
    }

    pub fn angle(&self, body: BodyRef) -> Option<f32> {
        self.bodies.get(body.0).map(|rb| rb.rotation().angle())
    }

    pub fn linear_velocity(&self, body: BodyRef) -> Option<Vec2> {
        self.bodies.get(body.0).map(|rb| from_vector(rb.linvel()))
    }

    pub fn angular_velocity(&self, body: BodyRef) -> Option<f32> {
        self.bodies.get(body.0).map(|rb| rb.angvel())
    }

    pub fn set_angular_velocity(&mut self, body: BodyRef, omega: f32) {
        if let Some(rb) = self.bodies.get_mut(body.0) {
            rb.set_angvel(omega, true);
        }
    }

    pub fn mass(&self, body: BodyRef) -> Option<f32> {
        self.bodies.get(body.0).map(|rb| rb.mass())
    }

    /// Principal moment of inertia about the center of mass.
    pub fn inertia(&self, body: BodyRef) -> Option<f32> {
        self.bodies
            .get(body.0)
            .map(|rb| rb.mass_properties().local_mprops.principal_inertia())
    }

    /// World point expressed in `body`'s local frame.
    pub fn local_point(&self, body: BodyRef, world_point: Vec2) -> Option<Vec2> {
        let rb = self.bodies.get(body.0)?;
        let local = rb.position().inverse_transform_point(&to_point(world_point));
        Some(Vec2::new(local.x, local.y))
    }

    /// World position of a point given in `body`'s local frame.
    pub fn world_point(&self, body: BodyRef, local_point: Vec2) -> Option<Vec2> {
        let rb = self.bodies.get(body.0)?;
        let world = rb.position() * to_point(local_point);
        Some(Vec2::new(world.x, world.y))
    }

    // === JOINTS ===

    pub fn create_revolute(&mut self, desc: &RevoluteDesc) -> Option<JointRef> {
        if !self.bodies.contains(desc.body_a.0) || !self.bodies.contains(desc.body_b.0) {
            return None;
        }
        let mut builder = RevoluteJointBuilder::new()
            .local_anchor1(to_point(desc.anchor_a))
            .local_anchor2(to_point(desc.anchor_b))
            .contacts_enabled(desc.contacts);
        if let Some(motor) = desc.motor {
            builder = builder
                .motor_velocity(motor.target_speed, 1.0)
                .motor_max_force(motor.max_torque);
        }
        let handle = self
            .impulse_joints
            .insert(desc.body_a.0, desc.body_b.0, builder.build(), true);
        Some(JointRef(handle))
    }

    pub fn remove_joint(&mut self, joint: JointRef) -> bool {
        self.impulse_joints.remove(joint.0, true).is_some()
    }

    pub fn contains_joint(&self, joint: JointRef) -> bool {
        self.impulse_joints.get(joint.0).is_some()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    // === GRABBABLES ===

    pub fn register_grabbable(&mut self, body: BodyRef, entity: Box<dyn Grabbable>) -> bool {
        if !self.bodies.contains(body.0) {
            return false;
        }
        self.grabbables.insert(body, entity);
        true
    }

    /// Toggle the grabbed flag. Dead or unregistered bodies are ignored.
    pub fn set_grabbed(&mut self, body: BodyRef, grabbed: bool) -> bool {
        if !self.bodies.contains(body.0) {
            return false;
        }
        match self.grabbables.get_mut(&body) {
            Some(entity) => {
                entity.set_grabbed(grabbed);
                true
            }
            None => false,
        }
    }

    pub fn is_grabbed(&self, body: BodyRef) -> bool {
        self.grabbables.get(&body).map_or(false, |e| e.is_grabbed())
    }

    pub fn grabbable_kind(&self, body: BodyRef) -> Option<SceneryKind> {
        self.grabbables.get(&body).map(|e| e.kind())
    }

    /// Nearest grabbable body overlapping `sensor`, as of the last step.
    pub fn grab_candidate(&self, sensor: SensorRef) -> Option<BodyRef> {
        let origin = self.colliders.get(sensor.0)?.position().translation.vector;
        let mut best: Option<(BodyRef, f32)> = None;

        for (a, b, intersecting) in self.narrow_phase.intersection_pairs_with(sensor.0) {
            if !intersecting {
                continue;
            }
            let other = if a == sensor.0 { b } else { a };
            let Some(parent) = self.colliders.get(other).and_then(|c| c.parent()) else {
                continue;
            };
            let body = BodyRef(parent);
            if !self.grabbables.contains_key(&body) {
                continue;
            }
            let Some(rb) = self.bodies.get(parent) else {
                continue;
            };
            let dist = (rb.translation() - origin).norm_squared();
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((body, dist));
            }
        }

        best.map(|(body, _)| body)
    }

    // === STEP ===

    /// Advance by `dt`. Forces and torques added before the call are consumed.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        for (_, rb) in self.bodies.iter_mut() {
            rb.reset_forces(false);
            rb.reset_torques(false);
        }
    }
}
