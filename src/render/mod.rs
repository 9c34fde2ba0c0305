//! Rasterization of display states.

/// CPU court rasterizer and the [`court::Renderer`] contract.
pub mod court;
