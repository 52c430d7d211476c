//! Wave displacement: parameters, the per-frame kernel, and the cycle sequencer.

pub mod kernel;
/// Wave settings and their per-canvas scaling.
pub mod params;
/// Sampling one animation cycle.
pub mod sequence;
