mod envelope;
mod filter;
mod morph;
mod oscillator;

pub use envelope::bench_envelope;
pub use filter::bench_filter;
pub use morph::bench_morph;
pub use oscillator::bench_oscillator;
