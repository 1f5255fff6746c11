pub mod cues;
pub mod particles;
pub mod renderer;

pub use cues::Cues;
pub use particles::ParticleSystem;
pub use renderer::Renderer;
