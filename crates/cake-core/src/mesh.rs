//! CPU-side tessellation of [`Shape`]s into indexed triangle lists.
//!
//! Winding is counter-clockwise seen from outside, matching the renderer's
//! back-face culling.

use crate::scene::Shape;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn push(&mut self, p: Vec3, n: Vec3) -> u32 {
        self.vertices.push(MeshVertex {
            position: p.to_array(),
            normal: n.to_array(),
        });
        (self.vertices.len() - 1) as u32
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl Shape {
    pub fn tessellate(&self) -> MeshData {
        match *self {
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => frustum(radius_top, radius_bottom, height, segments),
            Shape::Cone {
                radius,
                height,
                segments,
            } => frustum(0.0, radius, height, segments),
            Shape::Sphere { radius, segments } => sphere(radius, segments, (segments / 2).max(3)),
            Shape::Octahedron { radius } => octahedron(radius),
            Shape::Disc { radius, segments } => {
                let mut m = MeshData::default();
                cap(&mut m, radius, 0.0, segments, true);
                m
            }
        }
    }
}

/// Truncated cone along Y, from `-height/2` to `+height/2`. A zero top radius
/// gives a cone and no top cap.
fn frustum(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let half = height * 0.5;
    let mut m = MeshData::default();
    // side normal tilts outward by the slope of the wall
    let slope = (radius_bottom - radius_top) / height.max(1e-6);
    for i in 0..=segments {
        let a = i as f32 / segments as f32 * TAU;
        let (s, c) = a.sin_cos();
        let n = Vec3::new(c, slope, s).normalize();
        m.push(Vec3::new(c * radius_top, half, s * radius_top), n);
        m.push(Vec3::new(c * radius_bottom, -half, s * radius_bottom), n);
    }
    for i in 0..segments {
        let t0 = i * 2;
        let b0 = t0 + 1;
        let t1 = t0 + 2;
        let b1 = t0 + 3;
        m.indices.extend_from_slice(&[t0, t1, b0, b0, t1, b1]);
    }
    if radius_top > 0.0 {
        cap(&mut m, radius_top, half, segments, true);
    }
    if radius_bottom > 0.0 {
        cap(&mut m, radius_bottom, -half, segments, false);
    }
    m
}

fn cap(m: &mut MeshData, radius: f32, y: f32, segments: u32, up: bool) {
    let segments = segments.max(3);
    let n = if up { Vec3::Y } else { Vec3::NEG_Y };
    let centre = m.push(Vec3::new(0.0, y, 0.0), n);
    let first = centre + 1;
    for i in 0..=segments {
        let a = i as f32 / segments as f32 * TAU;
        m.push(Vec3::new(a.cos() * radius, y, a.sin() * radius), n);
    }
    for i in 0..segments {
        let a = first + i;
        let b = first + i + 1;
        if up {
            m.indices.extend_from_slice(&[centre, b, a]);
        } else {
            m.indices.extend_from_slice(&[centre, a, b]);
        }
    }
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut m = MeshData::default();
    for y in 0..=hs {
        let v = y as f32 / hs as f32;
        let theta = v * PI;
        for x in 0..=ws {
            let u = x as f32 / ws as f32;
            let phi = u * TAU;
            let n = Vec3::new(phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
            m.push(n * radius, n);
        }
    }
    let row = ws + 1;
    for y in 0..hs {
        for x in 0..ws {
            let a = y * row + x;
            let b = a + row;
            let c = b + 1;
            let d = a + 1;
            if y != 0 {
                m.indices.extend_from_slice(&[a, d, b]);
            }
            if y != hs - 1 {
                m.indices.extend_from_slice(&[d, c, b]);
            }
        }
    }
    m
}

fn octahedron(radius: f32) -> MeshData {
    let axes = [
        Vec3::X,
        Vec3::Z,
        Vec3::NEG_X,
        Vec3::NEG_Z,
    ];
    let mut m = MeshData::default();
    for pole in [Vec3::Y, Vec3::NEG_Y] {
        for i in 0..4 {
            let a = axes[i];
            let b = axes[(i + 1) % 4];
            // keep outward winding for both hemispheres
            let (p0, p1) = if pole.y > 0.0 { (b, a) } else { (a, b) };
            let n = (p0 + p1 + pole).normalize();
            let i0 = m.push(pole * radius, n);
            let i1 = m.push(p0 * radius, n);
            let i2 = m.push(p1 * radius, n);
            m.indices.extend_from_slice(&[i0, i1, i2]);
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cone_has_no_top_cap() {
        let cone = Shape::Cone {
            radius: 0.15,
            height: 0.5,
            segments: 8,
        }
        .tessellate();
        let cyl = Shape::Cylinder {
            radius_top: 0.15,
            radius_bottom: 0.15,
            height: 0.5,
            segments: 8,
        }
        .tessellate();
        assert_eq!(cyl.triangle_count() - cone.triangle_count(), 8);
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let m = Shape::Sphere {
            radius: 0.2,
            segments: 12,
        }
        .tessellate();
        for v in &m.vertices {
            assert!((Vec3::from(v.position).length() - 0.2).abs() < 1e-5);
        }
        assert!(m.indices.iter().all(|&i| (i as usize) < m.vertices.len()));
    }

    #[test]
    fn octahedron_has_eight_faces() {
        assert_eq!(Shape::Octahedron { radius: 0.03 }.tessellate().triangle_count(), 8);
    }
}
