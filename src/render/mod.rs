//! Rasterization and render-target management.

mod framebuffer;
mod rasterizer;
mod renderer;

pub use framebuffer::FrameBuffer;
pub use rasterizer::{
    EdgeFunctionRasterizer, Rasterizer, RasterizerDispatcher, RasterizerType, ScanlineRasterizer,
    Surface, Triangle,
};
pub use renderer::Renderer;
