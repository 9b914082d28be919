//! Explicit-Euler rigid bodies that drive module animation.
//!
//! Each [`Rigidbody::tick`] drains the queued forces into the velocity,
//! applies linear friction, and moves the body by its velocity. One tick is
//! one time step; the step length is folded into the force magnitudes.

use std::rc::Rc;

use crate::math::quat::Quaternion;
use crate::math::vec3::Vec3;
use crate::math::vec4::Point;
use crate::scene::module::Module;

/// Standard gravity, in units per tick squared.
pub const GRAVITY: f32 = 9.81;

/// Frame a force direction is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForceFrame {
    #[default]
    World,
    /// Rotated by the body's orientation before it is applied.
    Body,
}

/// A single-use push on a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Force {
    pub direction: Vec3,
    pub magnitude: f32,
    pub frame: ForceFrame,
}

impl Force {
    pub fn new(direction: Vec3, magnitude: f32) -> Self {
        Self {
            direction,
            magnitude,
            frame: ForceFrame::World,
        }
    }

    pub fn in_body_frame(direction: Vec3, magnitude: f32) -> Self {
        Self {
            direction,
            magnitude,
            frame: ForceFrame::Body,
        }
    }

    /// The weight of a body of `mass`, pointing down the y axis.
    pub fn gravity(mass: f32) -> Self {
        Self::new(-Vec3::Y, GRAVITY * mass)
    }

    /// Velocity change imparted on a body of `mass` with `orientation`.
    pub fn acceleration(&self, mass: f32, orientation: &Quaternion) -> Vec3 {
        let direction = match self.frame {
            ForceFrame::World => self.direction,
            ForceFrame::Body => orientation.rotate(self.direction),
        };
        direction.normalize() * (self.magnitude / mass)
    }
}

#[derive(Debug, Clone)]
pub struct Rigidbody {
    mass: f32,
    /// Fraction of the velocity lost each tick.
    friction: f32,
    position: Point,
    velocity: Vec3,
    orientation: Quaternion,
    module: Option<Rc<Module>>,
    forces: Vec<Force>,
}

impl Default for Rigidbody {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Rigidbody {
    /// A body at rest at the origin with no friction or geometry.
    pub fn new(mass: f32) -> Self {
        Self {
            mass,
            friction: 0.0,
            position: Point::point(0.0, 0.0, 0.0),
            velocity: Vec3::ZERO,
            orientation: Quaternion::IDENTITY,
            module: None,
            forces: Vec::new(),
        }
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.friction = friction;
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn set_orientation(&mut self, orientation: Quaternion) {
        self.orientation = orientation;
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    /// Geometry drawn at the body's pose by [`Rigidbody::render`].
    pub fn set_module(&mut self, module: Rc<Module>) {
        self.module = Some(module);
    }

    pub fn module(&self) -> Option<&Rc<Module>> {
        self.module.as_ref()
    }

    /// Queues a force for the next tick.
    pub fn add_force(&mut self, force: Force) {
        self.forces.push(force);
    }

    pub fn pending_forces(&self) -> &[Force] {
        &self.forces
    }

    /// Advances the body by one step.
    pub fn tick(&mut self) {
        let mut velocity = self.velocity;
        if self.mass > 0.0 {
            for force in self.forces.drain(..) {
                velocity = velocity + force.acceleration(self.mass, &self.orientation);
            }
        } else if !self.forces.is_empty() {
            log::warn!(
                "ignoring {} forces on a body with mass {}",
                self.forces.len(),
                self.mass
            );
            self.forces.clear();
        }

        self.velocity = velocity - velocity * self.friction;
        self.position = Point::point(
            self.position.x + self.velocity.x,
            self.position.y + self.velocity.y,
            self.position.z + self.velocity.z,
        );
    }

    /// Appends the body's module to `parent`, rotated by the orientation and
    /// then moved to the position. Bodies without a module add nothing.
    pub fn render(&self, parent: &mut Module) {
        let Some(body) = &self.module else {
            log::debug!("rigid body has no module to render");
            return;
        };
        let p = self.position.homogenize();
        let mut placed = Module::new();
        placed
            .matrix(self.orientation.to_matrix())
            .translate(p.x, p.y, p.z)
            .module(body.clone());
        parent.module(Rc::new(placed));
    }
}
