pub mod animation;
pub mod blow;
pub mod builder;
pub mod camera;
pub mod constants;
pub mod error;
pub mod layout;
pub mod lifecycle;
pub mod lit;
pub mod mesh;
pub mod quality;
pub mod scene;
pub mod session;
pub mod share;
pub mod smoke;
pub mod sync;
pub mod theme;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use animation::{AnimationDriver, FrameInput, FramePresenter};
pub use builder::{CakeAssembly, CakeSurface, CandleArena, CandleHandle};
pub use camera::{Camera, OrbitCamera};
pub use error::{CakeError, Result};
pub use layout::{compute_placements, Placement};
pub use lifecycle::{CakeView, SceneInputs, ViewState};
pub use lit::LitState;
pub use quality::RenderQualityProfile;
pub use scene::{AssemblyTag, Light, Material, Node, NodeId, NodeKind, SceneGraph, Shape};
pub use session::{BlowSession, SessionEvent};
pub use share::ShareConfig;
pub use theme::{Theme, ThemeId};
