//! Light sources and the reflection model used by the lit shading modes.

use crate::colors::{self, Color};
use crate::math::vec3::Vec3;
use crate::math::vec4::Point;

/// A single light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Lights every surface evenly regardless of orientation.
    Ambient { color: Color },
    /// Parallel rays, like a distant sun.
    Directional {
        color: Color,
        /// The normalized direction the light is pointing (not where it comes from).
        direction: Vec3,
    },
    /// Rays spreading out from a position in world space.
    Point { color: Color, position: Point },
}

impl Light {
    pub fn ambient(color: Color) -> Self {
        Light::Ambient { color }
    }

    /// The direction is normalized automatically.
    pub fn directional(color: Color, direction: Vec3) -> Self {
        Light::Directional {
            color,
            direction: direction.normalize(),
        }
    }

    pub fn point(color: Color, position: Point) -> Self {
        Light::Point { color, position }
    }

    pub fn color(&self) -> Color {
        match *self {
            Light::Ambient { color }
            | Light::Directional { color, .. }
            | Light::Point { color, .. } => color,
        }
    }

    /// Unit vector from `surface` toward the light. Ambient lights have none.
    pub fn incidence(&self, surface: Vec3) -> Option<Vec3> {
        match *self {
            Light::Ambient { .. } => None,
            Light::Directional { direction, .. } => Some(-direction),
            Light::Point { position, .. } => {
                Some((position.homogenize().to_vec3() - surface).normalize())
            }
        }
    }

    /// Lambertian intensity in `[0, 1]` for a surface at `surface` facing
    /// `normal`. Ambient lights are always 1.
    pub fn intensity(&self, normal: Vec3, surface: Vec3) -> f32 {
        match self.incidence(surface) {
            Some(l) => l.dot(normal.normalize()).max(0.0),
            None => 1.0,
        }
    }
}

/// Reflective properties of the surface being lit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse color.
    pub body: Color,
    /// Specular color.
    pub surface: Color,
    /// Specular exponent; larger is shinier.
    pub coeff: f32,
}

/// The set of lights a scene is drawn under.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lighting {
    lights: Vec<Light>,
}

impl Lighting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, light: Light) -> &mut Self {
        self.lights.push(light);
        self
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    /// Color reflected toward `viewer` from a world-space point.
    ///
    /// Each ambient light adds `body * light`. A directional or point light
    /// adds a diffuse term `body * light * (N.L)` and a specular term
    /// `surface * light * (N.H)^coeff`, where `H` is halfway between the light
    /// and view directions. Lights behind the surface contribute nothing. A
    /// two-sided surface turns its normal toward the viewer first. Channels
    /// are clamped to `[0, 1]`.
    pub fn shade(
        &self,
        normal: Vec3,
        surface: Point,
        viewer: Point,
        material: &Material,
        one_sided: bool,
    ) -> Color {
        let p = surface.homogenize().to_vec3();
        let v = (viewer.homogenize().to_vec3() - p).normalize();
        let mut n = normal.normalize();
        if !one_sided && n.dot(v) < 0.0 {
            n = -n;
        }

        let mut total = colors::BLACK;
        for light in &self.lights {
            let color = light.color();
            let Some(l) = light.incidence(p) else {
                total = total + material.body * color;
                continue;
            };
            let sigma = n.dot(l);
            if sigma <= 0.0 {
                continue;
            }
            let h = (l + v).normalize();
            let beta = n.dot(h).max(0.0);
            let diffuse = material.body * color * sigma;
            let specular = material.surface * color * beta.powf(material.coeff);
            total = total + diffuse + specular;
        }
        total.clamp()
    }
}
