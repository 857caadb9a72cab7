use thiserror::Error;

/// Errors that can occur while building a force-directed layout
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// The graph has no node, so no ideal distance can be derived
    #[error("cannot lay out an empty graph")]
    EmptyGraph,

    /// The canvas is not finite or too small to hold anything inside its borders
    #[error("invalid canvas {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },

    /// Cooling must shrink the temperature on every step
    #[error("cooling factor {0} is outside (0, 1)")]
    InvalidCoolingFactor(f32),

    /// A distance or temperature tunable is zero, negative, subnormal or not finite
    #[error("{name} must be a positive normal number, got {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
