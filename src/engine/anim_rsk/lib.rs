mod skeleton;
pub use skeleton::*;

mod sampler;
pub use sampler::*;

mod clip;
pub use clip::*;

mod animator;
pub use animator::*;
