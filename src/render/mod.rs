//! Terminal presentation of a game snapshot

pub mod renderer;
pub mod viewport;

pub use renderer::Renderer;
pub use viewport::Viewport;
