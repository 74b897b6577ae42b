//! CPU sphere-tracing renderer for the head scene.
//!
//! Renders into an RGBA buffer every frame (rayon-parallel rows) with a
//! transparent background, ready for an egui texture. The head tracks the
//! pointer: pixel coordinates map to normalized device coordinates in
//! [-1, 1], which drive bounded yaw/pitch rotation.

use eframe::egui;
use glam::Vec3;
use rayon::prelude::*;

use super::HeadScene;

const MAX_STEPS: usize = 80;
const HIT_EPS: f32 = 0.001;
const MAX_MARCH_DIST: f32 = 20.0;
const FOV_DEG: f32 = 75.0;

/// Bounded head orientation, radians on two axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeadPose {
    pub yaw: f32,
    pub pitch: f32,
}

/// Map a pointer position to normalized device coordinates relative to
/// `rect`: x rightward, y upward, both clamped to [-1, 1].
pub fn pointer_ndc(pos: egui::Pos2, rect: egui::Rect) -> (f32, f32) {
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return (0.0, 0.0);
    }
    let x = (pos.x - rect.left()) / rect.width() * 2.0 - 1.0;
    let y = -((pos.y - rect.top()) / rect.height() * 2.0 - 1.0);
    (x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0))
}

/// Rotation toward the pointer: a quarter half-turn at full deflection.
pub fn head_rotation(ndc_x: f32, ndc_y: f32) -> HeadPose {
    HeadPose {
        yaw: ndc_x * std::f32::consts::PI * 0.25,
        pitch: ndc_y * std::f32::consts::PI * 0.25,
    }
}

// ── Camera ──

struct Camera {
    origin: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    fov_factor: f32,
}

impl Camera {
    fn look_at(eye: Vec3, target: Vec3, fov_deg: f32) -> Self {
        let forward = (target - eye).normalize();
        let world_up = Vec3::Y;
        let right = forward.cross(world_up).normalize();
        let up = right.cross(forward);
        let fov_factor = (fov_deg.to_radians() * 0.5).tan();
        Self {
            origin: eye,
            forward,
            right,
            up,
            fov_factor,
        }
    }

    fn ray(&self, u: f32, v: f32, aspect: f32) -> Vec3 {
        (self.forward
            + self.right * (u * self.fov_factor * aspect)
            + self.up * (v * self.fov_factor))
            .normalize()
    }
}

// ── Rotation ──

fn rotate_x(p: Vec3, a: f32) -> Vec3 {
    let (s, c) = a.sin_cos();
    Vec3::new(p.x, p.y * c - p.z * s, p.y * s + p.z * c)
}

fn rotate_y(p: Vec3, a: f32) -> Vec3 {
    let (s, c) = a.sin_cos();
    Vec3::new(p.x * c + p.z * s, p.y, -p.x * s + p.z * c)
}

/// World point into head-local space: the inverse of yaw-then-pitch.
fn to_head_space(p: Vec3, pose: HeadPose) -> Vec3 {
    rotate_x(rotate_y(p, -pose.yaw), -pose.pitch)
}

fn field(scene: &HeadScene, pose: HeadPose, p: Vec3) -> f32 {
    scene.distance(to_head_space(p, pose))
}

/// Central-difference surface normal of the rotated field.
fn normal(scene: &HeadScene, pose: HeadPose, p: Vec3) -> Vec3 {
    let e = 0.001;
    let dx = field(scene, pose, p + Vec3::new(e, 0.0, 0.0))
        - field(scene, pose, p - Vec3::new(e, 0.0, 0.0));
    let dy = field(scene, pose, p + Vec3::new(0.0, e, 0.0))
        - field(scene, pose, p - Vec3::new(0.0, e, 0.0));
    let dz = field(scene, pose, p + Vec3::new(0.0, 0.0, e))
        - field(scene, pose, p - Vec3::new(0.0, 0.0, e));
    Vec3::new(dx, dy, dz).normalize_or_zero()
}

// ── Public rendering API ──

/// Render the head at `pose` into a `width * height * 4` RGBA buffer.
///
/// Camera sits at (0, 1, 5) looking at the origin; one point light at
/// (10, 10, 10) with Lambert shading plus ambient. Missed pixels are fully
/// transparent.
pub fn render_head(scene: &HeadScene, width: usize, height: usize, pose: HeadPose) -> Vec<u8> {
    let camera = Camera::look_at(Vec3::new(0.0, 1.0, 5.0), Vec3::ZERO, FOV_DEG);
    let light_pos = Vec3::new(10.0, 10.0, 10.0);
    let ambient = 0.18;
    let aspect = width as f32 / height as f32;

    let mut pixels = vec![0u8; width * height * 4];
    let row_size = width * 4;

    pixels
        .par_chunks_exact_mut(row_size)
        .enumerate()
        .for_each(|(py, row_buf)| {
            let v = -((py as f32 + 0.5) / height as f32 * 2.0 - 1.0);

            for px in 0..width {
                let u = (px as f32 + 0.5) / width as f32 * 2.0 - 1.0;
                let ray_dir = camera.ray(u, v, aspect);

                let mut t = 0.0f32;
                let mut hit = false;
                for _ in 0..MAX_STEPS {
                    let p = camera.origin + ray_dir * t;
                    let d = field(scene, pose, p);
                    if d < HIT_EPS {
                        hit = true;
                        break;
                    }
                    t += d;
                    if t > MAX_MARCH_DIST {
                        break;
                    }
                }

                let idx = px * 4;
                if hit {
                    let hit_pos = camera.origin + ray_dir * t;
                    let base = scene.closest_color(to_head_space(hit_pos, pose));
                    let mat = Vec3::new(base[0], base[1], base[2]);

                    let n = normal(scene, pose, hit_pos);
                    let l = (light_pos - hit_pos).normalize();
                    let diff = n.dot(l).max(0.0);
                    let col = mat * (ambient + diff * 0.95);

                    row_buf[idx] = (col.x.clamp(0.0, 1.0) * 255.0) as u8;
                    row_buf[idx + 1] = (col.y.clamp(0.0, 1.0) * 255.0) as u8;
                    row_buf[idx + 2] = (col.z.clamp(0.0, 1.0) * 255.0) as u8;
                    row_buf[idx + 3] = 255;
                } else {
                    // Transparent background, matching the page's alpha canvas
                    row_buf[idx] = 0;
                    row_buf[idx + 1] = 0;
                    row_buf[idx + 2] = 0;
                    row_buf[idx + 3] = 0;
                }
            }
        });

    pixels
}
