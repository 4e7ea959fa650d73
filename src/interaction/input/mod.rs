pub mod pointer;

pub use pointer::{sample_primary_pointer, PointerInputPlugin, PointerSample, PrimaryTouch};
