mod control;
mod voices;

pub use control::bench_control;
pub use voices::bench_voices;
