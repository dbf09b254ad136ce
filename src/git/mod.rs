pub mod client;
pub mod control;

pub use client::{GitControlClient, DEFAULT_TIMEOUT};
pub use control::GitControl;
