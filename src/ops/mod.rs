pub mod adjust;
pub mod paint;
pub mod quantize;
