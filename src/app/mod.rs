// Application layer - Use case interactors

pub mod clip_interactor;
pub mod container;

// Re-export interactors
pub use clip_interactor::{ClipInteractor, ClipRequest, ClipResponse};
pub use container::{AppContainer, DefaultAppContainer};
