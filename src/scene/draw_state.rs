//! Mutable drawing state carried through a scene traversal.

use crate::colors::{self, Color};
use crate::config::RenderConfig;
use crate::light::Material;
use crate::math::vec4::Point;

/// How polygons are shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadeMode {
    /// Outlines only.
    Frame,
    /// Filled according to the [`FillMode`].
    #[default]
    Constant,
    /// Per-vertex colors interpolated across the polygon. Polygons without
    /// vertex colors fall back to `Constant`.
    Vertex,
    /// One lit color per polygon, from its mean vertex and normal.
    Flat,
    /// Lit at every vertex, then interpolated across the polygon.
    Gouraud,
}

/// How `Constant`-shaded polygons are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    #[default]
    Solid,
    /// Blend from `color` to `body_color` left to right.
    HorizontalGradient,
    /// Blend from `color` to `body_color` top to bottom.
    VerticalGradient,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub color: Color,
    pub body_color: Color,
    pub surface_color: Color,
    pub surface_coeff: f32,
    pub shade: ShadeMode,
    pub fill: FillMode,
    /// Master switch for depth testing; when off, every element draws in
    /// traversal order.
    pub z_buffer: bool,
    /// World-space eye position, used to cull one-sided polygons and to
    /// aim specular highlights.
    pub viewer: Point,
    pub flatness_threshold: f32,
    pub curve_divisions: u32,
    pub surface_divisions: u32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl DrawState {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            color: colors::WHITE,
            body_color: colors::WHITE,
            surface_color: colors::WHITE,
            surface_coeff: 10.0,
            shade: ShadeMode::default(),
            fill: FillMode::default(),
            z_buffer: true,
            viewer: Point::point(0.0, 0.0, 0.0),
            flatness_threshold: config.flatness_threshold,
            curve_divisions: config.curve_divisions,
            surface_divisions: config.surface_divisions,
        }
    }

    /// The surface properties the lit shading modes reflect light with.
    pub fn material(&self) -> Material {
        Material {
            body: self.body_color,
            surface: self.surface_color,
            coeff: self.surface_coeff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_flows_into_subdivision_settings() {
        let config = RenderConfig {
            flatness_threshold: 2.5,
            curve_divisions: 64,
            ..RenderConfig::default()
        };
        let ds = DrawState::from_config(&config);
        assert_eq!(ds.flatness_threshold, 2.5);
        assert_eq!(ds.curve_divisions, 64);
        assert_eq!(ds.surface_divisions, 16);
        assert_eq!(ds.shade, ShadeMode::Constant);
        assert_eq!(ds.fill, FillMode::Solid);
    }

    #[test]
    fn material_reads_lighting_colors() {
        let ds = DrawState {
            body_color: colors::RED,
            surface_color: colors::BLUE,
            surface_coeff: 32.0,
            ..DrawState::default()
        };
        let m = ds.material();
        assert_eq!(m.body, colors::RED);
        assert_eq!(m.surface, colors::BLUE);
        assert_eq!(m.coeff, 32.0);
    }
}
