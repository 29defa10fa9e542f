// Adapters layer: concrete implementations for external systems.

pub mod chrome;

pub use chrome::ChromeRenderer;
