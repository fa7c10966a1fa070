use crate::constants::*;
use crate::scene::{AssemblyTag, Material, Node, NodeId, SceneGraph, Shape};
use crate::theme::srgb_hex_to_linear;
use glam::Vec3;

/// One rising puff. `opacity` mirrors the node material and is the removal key.
#[derive(Clone, Copy, Debug)]
pub struct SmokePuff {
    pub node: NodeId,
    pub opacity: f32,
}

/// Live smoke puffs spawned when candles go out.
#[derive(Debug)]
pub struct SmokeField {
    puffs: Vec<SmokePuff>,
    segments: u32,
}

impl SmokeField {
    pub fn new(segments: u32) -> Self {
        Self {
            puffs: Vec::new(),
            segments,
        }
    }

    pub fn spawn(&mut self, scene: &mut SceneGraph, at: Vec3) -> NodeId {
        let node = scene.insert(Node::mesh(
            AssemblyTag::Smoke,
            Shape::Sphere {
                radius: SMOKE_RADIUS,
                segments: self.segments,
            },
            Material::basic(srgb_hex_to_linear(SMOKE_COLOR), SMOKE_START_OPACITY),
            at,
        ));
        self.puffs.push(SmokePuff {
            node,
            opacity: SMOKE_START_OPACITY,
        });
        node
    }

    /// Rise, grow and fade every puff once, then drop the ones that faded out.
    /// Returns how many were removed.
    pub fn step(&mut self, scene: &mut SceneGraph) -> usize {
        let before = self.puffs.len();
        self.puffs.retain_mut(|puff| {
            puff.opacity *= SMOKE_FADE_PER_TICK;
            if puff.opacity < SMOKE_MIN_OPACITY {
                scene.remove(puff.node);
                return false;
            }
            let Some(node) = scene.get_mut(puff.node) else {
                return false;
            };
            node.position.y += SMOKE_RISE_PER_TICK;
            node.scale *= SMOKE_GROWTH_PER_TICK;
            if let Some(m) = node.material_mut() {
                m.opacity = puff.opacity;
            }
            true
        });
        before - self.puffs.len()
    }

    /// Remove every puff from the scene.
    pub fn clear(&mut self, scene: &mut SceneGraph) {
        for puff in self.puffs.drain(..) {
            scene.remove(puff.node);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.puffs.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.puffs.is_empty()
    }
    pub fn puffs(&self) -> &[SmokePuff] {
        &self.puffs
    }
}

impl Default for SmokeField {
    fn default() -> Self {
        Self::new(8)
    }
}
