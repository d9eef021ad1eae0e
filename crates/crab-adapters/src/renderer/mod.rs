//! Template rendering adapters.

mod tera_renderer;
mod unbound;

pub use tera_renderer::TeraRenderer;
