//! Domain types for ChanLab

pub mod candle;
pub mod direction;
pub mod fractal;
pub mod standard;
pub mod stroke;

pub use candle::Candle;
pub use direction::Direction;
pub use fractal::{Fractal, FractalKind};
pub use standard::StandardCandle;
pub use stroke::Stroke;
