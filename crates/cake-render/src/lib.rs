pub mod gpu;
pub mod helpers;
pub mod scene;

pub use gpu::GpuState;
pub use scene::SceneRenderer;
