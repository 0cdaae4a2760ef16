//! The seam between the frame loop and the GPU

use super::shader::ShaderProgram;
use super::shapes::Mesh;
use super::transforms::Transforms;
use crate::error::RenderError;

/// What `GameFrame` needs from a graphics device.
///
/// A backend owns the installed program and every buffer it allocates.
/// `render` receives the whole frame at once: each mesh gets fresh position
/// and color buffers, the transforms go into the uniform block, and the
/// meshes are drawn in order.
pub trait RenderBackend {
    /// Build pipeline state for a linked program. Called once at construction.
    fn install_program(&mut self, program: &ShaderProgram) -> Result<(), RenderError>;

    /// Viewport follows the window
    fn resize(&mut self, width: u32, height: u32);

    /// Upload and draw one frame
    fn render(&mut self, transforms: &Transforms, meshes: &[Mesh]) -> Result<(), RenderError>;

    /// Drop the program and any buffers still held
    fn release(&mut self);
}
