//! Scene construction: the static environment, the three-tier cake and one
//! candle assembly per placement.
//!
//! Everything the builder creates is tagged with its [`AssemblyTag`] and
//! tracked by handle, so [`teardown`] can remove exactly one generation of
//! cake and candles while the environment and any smoke stay put.

use crate::constants::*;
use crate::layout::compute_placements;
use crate::quality::RenderQualityProfile;
use crate::scene::{AssemblyTag, Light, Material, Node, NodeId, SceneGraph, Shape};
use crate::theme::{srgb_hex_to_linear, Theme};
use glam::{EulerRot, Quat, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use smallvec::SmallVec;
use std::f32::consts::{PI, TAU};

/// Candle-bearing top surface of the cake.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CakeSurface {
    top_y: f32,
    radius: f32,
}

impl CakeSurface {
    /// Height of the candle-bearing top.
    #[inline]
    pub fn top_y(&self) -> f32 {
        self.top_y
    }
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }
    #[inline]
    pub fn is_built(&self) -> bool {
        self.radius > 0.0
    }
}

/// Handles to every node of one built cake.
#[derive(Debug)]
pub struct CakeAssembly {
    nodes: Vec<NodeId>,
    surface: CakeSurface,
}

/// Empty assembly; its surface cannot carry candles.
impl Default for CakeAssembly {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            surface: CakeSurface {
                top_y: 0.0,
                radius: 0.0,
            },
        }
    }
}

impl CakeAssembly {
    #[inline]
    pub fn surface(&self) -> CakeSurface {
        self.surface
    }
    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Scene handles for one candle.
#[derive(Clone, Debug)]
pub struct CandleHandle {
    pub stick: NodeId,
    pub band: NodeId,
    pub wick: NodeId,
    pub flame: NodeId,
    pub inner_flame: NodeId,
    pub glow: NodeId,
    pub light: NodeId,
}

impl CandleHandle {
    /// Nodes shown while the candle burns.
    #[inline]
    pub fn flame_group(&self) -> [NodeId; 3] {
        [self.flame, self.inner_flame, self.glow]
    }

    pub fn nodes(&self) -> SmallVec<[NodeId; 7]> {
        SmallVec::from_buf([
            self.stick,
            self.band,
            self.wick,
            self.flame,
            self.inner_flame,
            self.glow,
            self.light,
        ])
    }
}

/// Index-ordered candle handles. Index `i` always refers to candle `i` of the
/// lit state.
#[derive(Debug, Default)]
pub struct CandleArena {
    candles: Vec<CandleHandle>,
}

impl CandleArena {
    #[inline]
    pub fn len(&self) -> usize {
        self.candles.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
    #[inline]
    pub fn get(&self, index: usize) -> Option<&CandleHandle> {
        self.candles.get(index)
    }
    pub fn iter(&self) -> std::slice::Iter<'_, CandleHandle> {
        self.candles.iter()
    }
    pub fn flames(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.candles.iter().map(|c| c.flame)
    }
}

/// Ground, shadow disc and scene lights. Built once at mount.
pub fn build_environment(scene: &mut SceneGraph, profile: &RenderQualityProfile) -> Vec<NodeId> {
    let tag = AssemblyTag::Environment;
    let white = Vec3::ONE;
    let mut nodes = Vec::with_capacity(6);
    nodes.push(scene.insert(Node::mesh(
        tag,
        Shape::Disc {
            radius: GROUND_RADIUS,
            segments: profile.segment_count,
        },
        Material::standard(srgb_hex_to_linear(GROUND_COLOR), 0.8, 0.2),
        Vec3::new(0.0, GROUND_Y, 0.0),
    )));
    if profile.shadows_enabled {
        // soft contact shadow instead of a shadow map
        nodes.push(scene.insert(Node::mesh(
            tag,
            Shape::Disc {
                radius: BOTTOM_TIER_RADIUS * 1.35,
                segments: profile.segment_count,
            },
            Material::basic(Vec3::splat(0.05), 0.22),
            Vec3::new(0.0, GROUND_Y + 0.01, 0.0),
        )));
    }
    nodes.push(scene.insert(Node::light(
        tag,
        Light::Ambient {
            color: white,
            intensity: 0.7,
        },
        Vec3::ZERO,
    )));
    nodes.push(scene.insert(directional(white, 1.2, Vec3::new(5.0, 10.0, 5.0))));
    if profile.secondary_lights {
        nodes.push(scene.insert(directional(
            srgb_hex_to_linear(0xFFD5AA),
            0.5,
            Vec3::new(-5.0, 5.0, -5.0),
        )));
        nodes.push(scene.insert(directional(white, 0.4, Vec3::new(0.0, 5.0, -8.0))));
    }
    nodes
}

fn directional(color: Vec3, intensity: f32, from: Vec3) -> Node {
    Node::light(
        AssemblyTag::Environment,
        Light::Directional {
            color,
            intensity,
            direction: -from.normalize(),
        },
        from,
    )
}

fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Shape {
    Shape::Cylinder {
        radius_top,
        radius_bottom,
        height,
        segments,
    }
}

/// Build the three tiers and their decorations. Returns the assembly with the
/// candle-bearing surface.
pub fn build_cake(
    scene: &mut SceneGraph,
    theme: &Theme,
    profile: &RenderQualityProfile,
) -> CakeAssembly {
    let seg = profile.segment_count;
    let cake = Material::standard(theme.cake_linear(), 0.3, 0.1);
    let accent = theme.accent_linear();
    let frosting = Material::standard(srgb_hex_to_linear(FROSTING_COLOR), 0.2, 0.4);
    let mut nodes = Vec::new();
    let mut add = |scene: &mut SceneGraph, node: Node| nodes.push(scene.insert(node));
    let mesh = |shape, material, position| Node::mesh(AssemblyTag::Cake, shape, material, position);

    // Bottom tier
    let bottom_top = BOTTOM_TIER_HEIGHT;
    add(
        scene,
        mesh(
            cylinder(
                BOTTOM_TIER_RADIUS,
                BOTTOM_TIER_RADIUS + TIER_FLARE[0],
                BOTTOM_TIER_HEIGHT,
                seg,
            ),
            cake,
            Vec3::new(0.0, BOTTOM_TIER_HEIGHT / 2.0, 0.0),
        ),
    );
    let bottom_frosting_r = BOTTOM_TIER_RADIUS + FROSTING_OVERHANG;
    add(
        scene,
        mesh(
            cylinder(bottom_frosting_r, bottom_frosting_r, TIER_GAP, seg),
            frosting,
            Vec3::new(0.0, bottom_top + TIER_GAP / 2.0, 0.0),
        ),
    );
    let pearl = Material::standard(srgb_hex_to_linear(PEARL_COLOR), 0.1, 0.8).with_emissive(0.1);
    let pearls = profile.decorations(PEARL_COUNT);
    for i in 0..pearls {
        let a = i as f32 / pearls as f32 * TAU;
        add(
            scene,
            mesh(
                Shape::Sphere {
                    radius: PEARL_RADIUS,
                    segments: profile.small_segments(16),
                },
                pearl,
                Vec3::new(
                    a.cos() * bottom_frosting_r,
                    bottom_top + TIER_GAP / 2.0,
                    a.sin() * bottom_frosting_r,
                ),
            ),
        );
    }

    // Middle tier
    let middle_y = bottom_top + TIER_GAP;
    let middle_top = middle_y + MIDDLE_TIER_HEIGHT;
    add(
        scene,
        mesh(
            cylinder(
                MIDDLE_TIER_RADIUS,
                MIDDLE_TIER_RADIUS + TIER_FLARE[1],
                MIDDLE_TIER_HEIGHT,
                seg,
            ),
            cake,
            Vec3::new(0.0, middle_y + MIDDLE_TIER_HEIGHT / 2.0, 0.0),
        ),
    );
    let middle_frosting_r = MIDDLE_TIER_RADIUS + FROSTING_OVERHANG;
    add(
        scene,
        mesh(
            cylinder(middle_frosting_r, middle_frosting_r, TIER_GAP, seg),
            frosting,
            Vec3::new(0.0, middle_top + TIER_GAP / 2.0, 0.0),
        ),
    );
    let ribbon_r = MIDDLE_TIER_RADIUS + RIBBON_OFFSET;
    add(
        scene,
        mesh(
            cylinder(ribbon_r, ribbon_r, RIBBON_HEIGHT, seg),
            Material::standard(accent, 0.4, 0.6),
            Vec3::new(0.0, middle_y + MIDDLE_TIER_HEIGHT / 2.0, 0.0),
        ),
    );
    let rose = Material::standard(accent, 0.3, 0.4);
    let roses = profile.decorations(ROSE_COUNT);
    let rose_y = middle_top + TIER_GAP / 2.0;
    for i in 0..roses {
        let a = i as f32 / roses as f32 * TAU;
        let centre = Vec3::new(a.cos() * ribbon_r, rose_y, a.sin() * ribbon_r);
        add(
            scene,
            mesh(
                Shape::Sphere {
                    radius: ROSE_RADIUS,
                    segments: profile.small_segments(16),
                },
                rose,
                centre,
            ),
        );
        for p in 0..ROSE_PETALS {
            let pa = p as f32 / ROSE_PETALS as f32 * TAU;
            let petal = mesh(
                Shape::Sphere {
                    radius: PETAL_RADIUS,
                    segments: profile.small_segments(8),
                },
                rose,
                centre + Vec3::new(pa.cos() * PETAL_OFFSET, 0.0, pa.sin() * PETAL_OFFSET),
            )
            .with_scale(Vec3::new(1.0, 0.5, 1.0));
            add(scene, petal);
        }
    }

    // Top tier
    let top_y = middle_top + TIER_GAP;
    let top_top = top_y + TOP_TIER_HEIGHT;
    add(
        scene,
        mesh(
            cylinder(
                TOP_TIER_RADIUS,
                TOP_TIER_RADIUS + TIER_FLARE[2],
                TOP_TIER_HEIGHT,
                seg,
            ),
            cake,
            Vec3::new(0.0, top_y + TOP_TIER_HEIGHT / 2.0, 0.0),
        ),
    );
    let top_frosting_r = TOP_TIER_RADIUS + FROSTING_OVERHANG;
    add(
        scene,
        mesh(
            cylinder(top_frosting_r, top_frosting_r, TOP_FROSTING_HEIGHT, seg),
            frosting,
            Vec3::new(0.0, top_top + TOP_FROSTING_HEIGHT / 2.0, 0.0),
        ),
    );
    let surface_y = top_top + TOP_FROSTING_HEIGHT;
    let swirl = Material::standard(srgb_hex_to_linear(SWIRL_COLOR), 0.2, 0.5);
    let swirl_groups = profile.decorations(SWIRL_GROUPS);
    for i in 0..swirl_groups {
        let a = i as f32 / swirl_groups as f32 * TAU;
        for j in 0..SWIRL_STEPS {
            let jf = j as f32;
            let sa = a + jf * 0.3;
            let r = TOP_TIER_RADIUS * 0.6 - jf * 0.1;
            add(
                scene,
                mesh(
                    Shape::Sphere {
                        radius: 0.06 - jf * 0.008,
                        segments: profile.small_segments(12),
                    },
                    swirl,
                    Vec3::new(sa.cos() * r, surface_y + jf * 0.05, sa.sin() * r),
                ),
            );
        }
    }
    let sparkle = Material::standard(accent, 0.1, 0.9).with_emissive(0.3);
    let mut rng = StdRng::seed_from_u64(SPARKLE_SEED);
    for _ in 0..profile.decorations(SPARKLE_COUNT) {
        let a = rng.gen_range(0.0..TAU);
        let r = rng.gen_range(0.0..TOP_TIER_RADIUS * 0.9);
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            rng.gen_range(0.0..PI),
            rng.gen_range(0.0..PI),
            rng.gen_range(0.0..PI),
        );
        add(
            scene,
            mesh(
                Shape::Octahedron {
                    radius: SPARKLE_RADIUS,
                },
                sparkle,
                Vec3::new(a.cos() * r, surface_y + 0.01, a.sin() * r),
            )
            .with_rotation(rotation),
        );
    }

    log::debug!("[builder] cake built with {} nodes", nodes.len());
    CakeAssembly {
        nodes,
        surface: CakeSurface {
            top_y: surface_y,
            radius: TOP_TIER_RADIUS,
        },
    }
}

/// Build `count` lit candles on `surface`. Panics when `count` is zero or the
/// surface does not belong to a built cake.
pub fn build_candles(
    scene: &mut SceneGraph,
    count: usize,
    surface: CakeSurface,
    profile: &RenderQualityProfile,
) -> CandleArena {
    assert!(surface.is_built(), "candles need the surface of a built cake");
    let placements = compute_placements(count, surface.radius);
    let tag = AssemblyTag::Candle;
    let y = surface.top_y;
    let band = Material::standard(srgb_hex_to_linear(BAND_COLOR), 0.2, 0.9);
    let wick = Material::standard(srgb_hex_to_linear(WICK_COLOR), 0.9, 0.0);
    let flame = Material::basic(srgb_hex_to_linear(FLAME_COLOR), 0.95);
    let inner = Material::basic(srgb_hex_to_linear(INNER_FLAME_COLOR), 0.9);
    let glow = Material::basic(srgb_hex_to_linear(GLOW_COLOR), 0.3);
    let light_color = srgb_hex_to_linear(FLAME_COLOR);
    let stick_segments = profile.small_segments(CANDLE_SEGMENTS);
    let flame_segments = profile.small_segments(FLAME_SEGMENTS);

    let candles = placements
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let at = |dy: f32| Vec3::new(p.x, y + dy, p.z);
            let stick_color = srgb_hex_to_linear(CANDLE_COLORS[i % CANDLE_COLORS.len()]);
            CandleHandle {
                stick: scene.insert(Node::mesh(
                    tag,
                    cylinder(CANDLE_RADIUS, CANDLE_RADIUS, CANDLE_HEIGHT, stick_segments),
                    Material::standard(stick_color, 0.3, 0.4),
                    at(CANDLE_HEIGHT / 2.0),
                )),
                band: scene.insert(Node::mesh(
                    tag,
                    cylinder(BAND_RADIUS, BAND_RADIUS, BAND_HEIGHT, stick_segments),
                    band,
                    at(BAND_OFFSET_Y),
                )),
                wick: scene.insert(
                    Node::mesh(
                        tag,
                        cylinder(WICK_RADIUS, WICK_RADIUS, WICK_HEIGHT, flame_segments),
                        wick,
                        at(WICK_OFFSET_Y),
                    )
                    .hidden(),
                ),
                flame: scene.insert(Node::mesh(
                    tag,
                    Shape::Cone {
                        radius: FLAME_RADIUS,
                        height: FLAME_HEIGHT,
                        segments: flame_segments,
                    },
                    flame,
                    at(FLAME_OFFSET_Y),
                )),
                inner_flame: scene.insert(Node::mesh(
                    tag,
                    Shape::Cone {
                        radius: INNER_FLAME_RADIUS,
                        height: INNER_FLAME_HEIGHT,
                        segments: flame_segments,
                    },
                    inner,
                    at(INNER_FLAME_OFFSET_Y),
                )),
                glow: scene.insert(Node::mesh(
                    tag,
                    Shape::Sphere {
                        radius: GLOW_RADIUS,
                        segments: profile.small_segments(16),
                    },
                    glow,
                    at(INNER_FLAME_OFFSET_Y),
                )),
                light: scene.insert(Node::light(
                    tag,
                    Light::Point {
                        color: light_color,
                        intensity: CANDLE_LIGHT_INTENSITY,
                        range: CANDLE_LIGHT_RANGE,
                    },
                    at(FLAME_OFFSET_Y),
                )),
            }
        })
        .collect();
    CandleArena { candles }
}

/// Remove one generation of cake and candles. Safe on empty collections.
/// Returns the number of scene nodes removed.
pub fn teardown(scene: &mut SceneGraph, cake: &mut CakeAssembly, candles: &mut CandleArena) -> usize {
    let mut removed = 0;
    for id in cake.nodes.drain(..) {
        removed += scene.remove(id).is_some() as usize;
    }
    for candle in candles.candles.drain(..) {
        for id in candle.nodes() {
            removed += scene.remove(id).is_some() as usize;
        }
    }
    // nothing tagged Cake/Candle may survive a teardown
    removed += scene.remove_tagged(AssemblyTag::Cake);
    removed += scene.remove_tagged(AssemblyTag::Candle);
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{theme, ThemeId};

    #[test]
    fn built_surface_sits_on_the_top_tier() {
        let mut scene = SceneGraph::new();
        let cake = build_cake(&mut scene, theme(ThemeId::Elegant), &RenderQualityProfile::full());
        let built = cake.surface();
        let expected_y = BOTTOM_TIER_HEIGHT
            + TIER_GAP
            + MIDDLE_TIER_HEIGHT
            + TIER_GAP
            + TOP_TIER_HEIGHT
            + TOP_FROSTING_HEIGHT;
        assert!(built.is_built());
        assert!((built.top_y() - expected_y).abs() < 1e-5);
        assert_eq!(built.radius(), TOP_TIER_RADIUS);
    }

    #[test]
    #[should_panic(expected = "built cake")]
    fn candles_refuse_an_unbuilt_surface() {
        let mut scene = SceneGraph::new();
        let empty = CakeAssembly::default();
        build_candles(&mut scene, 3, empty.surface(), &RenderQualityProfile::full());
    }

    #[test]
    fn wick_follows_the_profile_flame_segments() {
        use crate::scene::NodeKind;
        let segments = |scene: &SceneGraph, id: NodeId| match scene.get(id).map(|n| &n.kind) {
            Some(NodeKind::Mesh {
                shape: Shape::Cylinder { segments, .. } | Shape::Cone { segments, .. },
                ..
            }) => *segments,
            other => panic!("unexpected node {other:?}"),
        };
        let coarse = RenderQualityProfile {
            segment_count: 8,
            ..RenderQualityProfile::constrained()
        };
        let mut scene = SceneGraph::new();
        let cake = build_cake(&mut scene, theme(ThemeId::Classic), &coarse);
        let candles = build_candles(&mut scene, 2, cake.surface(), &coarse);
        let expected = coarse.small_segments(FLAME_SEGMENTS);
        assert!(expected < FLAME_SEGMENTS);
        for candle in candles.iter() {
            assert_eq!(segments(&scene, candle.wick), expected);
            assert_eq!(segments(&scene, candle.flame), expected);
        }
    }

    #[test]
    fn constrained_profile_builds_fewer_decorations() {
        let mut full = SceneGraph::new();
        let mut lean = SceneGraph::new();
        let t = theme(ThemeId::Luxury);
        let a = build_cake(&mut full, t, &RenderQualityProfile::full());
        let b = build_cake(&mut lean, t, &RenderQualityProfile::constrained());
        assert!(b.nodes().len() < a.nodes().len());
    }
}
