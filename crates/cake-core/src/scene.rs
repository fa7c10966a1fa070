//! Render graph shared by the builder, the synchronizer, the animation driver
//! and the GPU front-ends.
//!
//! Nodes live in a generational arena. A `NodeId` is only a lookup key, so a
//! handle held across a teardown simply stops resolving instead of dangling.

use glam::{Mat4, Quat, Vec3};

/// Generational handle into a [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Which assembly a node belongs to; teardown removes by tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssemblyTag {
    /// Ground and scene lights, built once at mount.
    Environment,
    Cake,
    Candle,
    Smoke,
}

/// Primitive mesh description. Every shape is centred on its local origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        segments: u32,
    },
    Sphere {
        radius: f32,
        segments: u32,
    },
    Octahedron {
        radius: f32,
    },
    /// Flat disc facing +Y.
    Disc {
        radius: f32,
        segments: u32,
    },
}

/// Hashable identity of a shape, used to share GPU meshes between nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShapeKey(u8, [u32; 4]);

impl Shape {
    pub fn key(&self) -> ShapeKey {
        match *self {
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => ShapeKey(
                0,
                [
                    radius_top.to_bits(),
                    radius_bottom.to_bits(),
                    height.to_bits(),
                    segments,
                ],
            ),
            Shape::Cone {
                radius,
                height,
                segments,
            } => ShapeKey(1, [radius.to_bits(), height.to_bits(), segments, 0]),
            Shape::Sphere { radius, segments } => ShapeKey(2, [radius.to_bits(), segments, 0, 0]),
            Shape::Octahedron { radius } => ShapeKey(3, [radius.to_bits(), 0, 0, 0]),
            Shape::Disc { radius, segments } => ShapeKey(4, [radius.to_bits(), segments, 0, 0]),
        }
    }
}

/// Surface description. Colors are linear RGB.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub opacity: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: f32,
    /// Flat color with no lighting (flames, glow, smoke).
    pub unlit: bool,
}

impl Material {
    pub fn standard(color: Vec3, roughness: f32, metalness: f32) -> Self {
        Self {
            color,
            opacity: 1.0,
            roughness,
            metalness,
            emissive: 0.0,
            unlit: false,
        }
    }

    pub fn basic(color: Vec3, opacity: f32) -> Self {
        Self {
            color,
            opacity,
            roughness: 1.0,
            metalness: 0.0,
            emissive: 0.0,
            unlit: true,
        }
    }

    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    Ambient {
        color: Vec3,
        intensity: f32,
    },
    Directional {
        color: Vec3,
        intensity: f32,
        /// Direction the light travels in.
        direction: Vec3,
    },
    Point {
        color: Vec3,
        intensity: f32,
        range: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    Mesh { shape: Shape, material: Material },
    Light(Light),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub visible: bool,
    pub tag: AssemblyTag,
}

impl Node {
    pub fn mesh(tag: AssemblyTag, shape: Shape, material: Material, position: Vec3) -> Self {
        Self {
            kind: NodeKind::Mesh { shape, material },
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            visible: true,
            tag,
        }
    }

    pub fn light(tag: AssemblyTag, light: Light, position: Vec3) -> Self {
        Self {
            kind: NodeKind::Light(light),
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            visible: true,
            tag,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            NodeKind::Mesh { material, .. } => Some(material),
            NodeKind::Light(_) => None,
        }
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        match &mut self.kind {
            NodeKind::Mesh { material, .. } => Some(material),
            NodeKind::Light(_) => None,
        }
    }

    /// Current intensity if this node is a light.
    pub fn light_intensity(&self) -> Option<f32> {
        match self.kind {
            NodeKind::Light(
                Light::Ambient { intensity, .. }
                | Light::Directional { intensity, .. }
                | Light::Point { intensity, .. },
            ) => Some(intensity),
            NodeKind::Mesh { .. } => None,
        }
    }

    pub fn set_light_intensity(&mut self, value: f32) {
        if let NodeKind::Light(
            Light::Ambient { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. },
        ) = &mut self.kind
        {
            *intensity = value;
        }
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena of scene nodes.
#[derive(Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    /// Detach a node. Returns it if the handle was still live.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.node.as_ref().map(|n| {
                (
                    NodeId {
                        index: i as u32,
                        generation: s.generation,
                    },
                    n,
                )
            })
        })
    }

    pub fn count_tagged(&self, tag: AssemblyTag) -> usize {
        self.iter().filter(|(_, n)| n.tag == tag).count()
    }

    /// Remove every node carrying `tag`; returns how many were removed.
    pub fn remove_tagged(&mut self, tag: AssemblyTag) -> usize {
        let ids: Vec<NodeId> = self
            .iter()
            .filter(|(_, n)| n.tag == tag)
            .map(|(id, _)| id)
            .collect();
        ids.into_iter().filter(|id| self.remove(*id).is_some()).count()
    }

    pub fn clear(&mut self) {
        let ids: Vec<NodeId> = self.iter().map(|(id, _)| id).collect();
        for id in ids {
            self.remove(id);
        }
    }

    /// Visible point lights with non-zero intensity as `(position, color, intensity, range)`.
    pub fn active_point_lights(&self) -> impl Iterator<Item = (Vec3, Vec3, f32, f32)> + '_ {
        self.iter().filter_map(|(_, n)| match n.kind {
            NodeKind::Light(Light::Point {
                color,
                intensity,
                range,
            }) if n.visible && intensity > 0.0 => Some((n.position, color, intensity, range)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(tag: AssemblyTag) -> Node {
        Node::mesh(
            tag,
            Shape::Sphere {
                radius: 1.0,
                segments: 8,
            },
            Material::basic(Vec3::ONE, 1.0),
            Vec3::ZERO,
        )
    }

    #[test]
    fn stale_handles_do_not_resolve_after_reuse() {
        let mut g = SceneGraph::new();
        let a = g.insert(ball(AssemblyTag::Cake));
        assert!(g.remove(a).is_some());
        let b = g.insert(ball(AssemblyTag::Candle));
        assert!(g.get(a).is_none());
        assert_eq!(g.get(b).map(|n| n.tag), Some(AssemblyTag::Candle));
        assert!(g.remove(a).is_none());
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn remove_tagged_leaves_other_assemblies() {
        let mut g = SceneGraph::new();
        g.insert(ball(AssemblyTag::Environment));
        g.insert(ball(AssemblyTag::Cake));
        g.insert(ball(AssemblyTag::Cake));
        assert_eq!(g.remove_tagged(AssemblyTag::Cake), 2);
        assert_eq!(g.len(), 1);
        assert_eq!(g.count_tagged(AssemblyTag::Environment), 1);
    }
}
