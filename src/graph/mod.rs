//! Nodes that render blocks: the voice trait and the shared effect buses.
//!
//! Everything below the master bus lives here. Voices implement `GraphNode`
//! and are summed by the voice manager; the summed signal then runs through
//! the `EffectsChain`, which owns the master gain and the reverb and echo
//! wet paths.

/// Master gain, dry path and parallel wet taps.
pub mod chain;
/// Feedback delay with smoothed gains and crossfaded delay changes.
pub mod echo;
/// Core traits shared by all graph nodes.
pub mod node;
/// Convolution reverb with kernel hot-swap.
pub mod reverb;

pub use chain::EffectsChain;
pub use node::{GraphNode, RenderCtx};
