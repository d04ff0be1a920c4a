//! Composition pipeline: apply the configured effect to every
//! selection in a set against a copy of the source buffer.

use crate::buffer::PixelBuffer;
use crate::filter::{self, EffectConfig};
use crate::selection::SelectionSet;

/// Duplicate `source` and redact every selection in set order. Later
/// selections read whatever earlier ones wrote where they overlap;
/// that ordering dependency is accepted and documented, and the source
/// itself is never mutated.
pub fn compose(
    source: &PixelBuffer,
    selections: &SelectionSet,
    config: &EffectConfig,
) -> PixelBuffer {
    let mut output = source.clone();
    for selection in selections.iter() {
        filter::apply(&mut output, selection.bounding_region(), config);
    }
    output
}
