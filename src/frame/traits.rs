use rand::RngCore;

use crate::error::Result;
use crate::frame::types::Canvas;

/// One compositing pass of a frame
///
/// The compositor runs its layers in order over a shared [`Canvas`]. A
/// layer that returns an error is skipped: the canvas keeps whatever was
/// painted before it and composition carries on.
pub trait Layer: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Paint onto the canvas
    ///
    /// # Arguments
    ///
    /// * `canvas` - The working image and text mask, modified in place
    /// * `rng` - Source of randomness for scattered elements
    fn apply(&self, canvas: &mut Canvas, rng: &mut dyn RngCore) -> Result<()>;
}

/// Clamp a float channel value into a `u8`
pub(crate) fn channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
