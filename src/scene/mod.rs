//! The stylized head scene: a box head wearing binoculars, described as
//! analytic SDF primitives in head-local space. The whole hierarchy
//! rotates together, so rotation is applied to the sample point by the
//! renderer rather than stored per primitive.

use glam::{Vec2, Vec3};

pub mod renderer;

pub use renderer::{head_rotation, pointer_ndc, render_head, HeadPose};

/// One solid in head-local space with a flat base color.
#[derive(Debug, Clone, Copy)]
pub enum HeadPrimitive {
    Box3 {
        center: Vec3,
        /// Full extents
        size: Vec3,
        color: [f32; 3],
    },
    /// Capped cylinder with its axis along X (a binocular lens tube).
    CylinderX {
        center: Vec3,
        radius: f32,
        half_len: f32,
        color: [f32; 3],
    },
}

impl HeadPrimitive {
    pub fn distance(&self, p: Vec3) -> f32 {
        match *self {
            HeadPrimitive::Box3 { center, size, .. } => sd_box(p, center, size * 0.5),
            HeadPrimitive::CylinderX {
                center,
                radius,
                half_len,
                ..
            } => sd_cylinder_x(p, center, radius, half_len),
        }
    }

    pub fn color(&self) -> [f32; 3] {
        match *self {
            HeadPrimitive::Box3 { color, .. } => color,
            HeadPrimitive::CylinderX { color, .. } => color,
        }
    }
}

/// Signed distance to an axis-aligned box given half extents.
pub fn sd_box(p: Vec3, center: Vec3, half: Vec3) -> f32 {
    let q = (p - center).abs() - half;
    q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
}

/// Signed distance to a capped cylinder whose axis runs along X.
pub fn sd_cylinder_x(p: Vec3, center: Vec3, radius: f32, half_len: f32) -> f32 {
    let q = p - center;
    let d = Vec2::new(Vec2::new(q.y, q.z).length() - radius, q.x.abs() - half_len);
    d.x.max(d.y).min(0.0) + d.max(Vec2::ZERO).length()
}

pub struct HeadScene {
    pub primitives: Vec<HeadPrimitive>,
}

impl HeadScene {
    /// Distance to the nearest surface of the union.
    pub fn distance(&self, p: Vec3) -> f32 {
        self.primitives
            .iter()
            .map(|prim| prim.distance(p))
            .fold(f32::MAX, f32::min)
    }

    /// Base color of the closest primitive at `p`.
    pub fn closest_color(&self, p: Vec3) -> [f32; 3] {
        let mut min_d = f32::MAX;
        let mut col = [0.0f32; 3];
        for prim in &self.primitives {
            let d = prim.distance(p);
            if d < min_d {
                min_d = d;
                col = prim.color();
            }
        }
        col
    }
}

const SKIN: [f32; 3] = [1.0, 0.8, 0.6];
const BINOCULAR: [f32; 3] = [0.2, 0.2, 0.2];

/// Build the head: a 1.5-unit skin-tone cube, two dark lens tubes at
/// (±0.4, 0.2, 0.8) and a connecting bar between them.
pub fn head_scene() -> HeadScene {
    HeadScene {
        primitives: vec![
            HeadPrimitive::Box3 {
                center: Vec3::ZERO,
                size: Vec3::splat(1.5),
                color: SKIN,
            },
            HeadPrimitive::CylinderX {
                center: Vec3::new(-0.4, 0.2, 0.8),
                radius: 0.2,
                half_len: 0.5,
                color: BINOCULAR,
            },
            HeadPrimitive::CylinderX {
                center: Vec3::new(0.4, 0.2, 0.8),
                radius: 0.2,
                half_len: 0.5,
                color: BINOCULAR,
            },
            HeadPrimitive::Box3 {
                center: Vec3::new(0.0, 0.2, 0.8),
                size: Vec3::new(1.0, 0.1, 0.1),
                color: BINOCULAR,
            },
        ],
    }
}
