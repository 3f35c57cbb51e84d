// Purpose: voices, allocation, modulation and the per-sample mixdown.
// The allocator runs in the control context, the engine in the audio context;
// they only talk through `message`, `params` and `feed`.

pub mod allocator;
pub mod click;
pub mod engine;
pub mod feed;
pub mod message;
pub mod modulation;
pub mod params;
pub mod voice;
