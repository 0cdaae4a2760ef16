//! Headless backend that records what each frame would submit
//!
//! Used by the native demo and by tests; it performs the same byte-level
//! uploads as the GPU backend without a device.

use super::backend::RenderBackend;
use super::shader::{ShaderProgram, UniformBlock};
use super::shapes::{Drawable, Mesh, Topology};
use super::transforms::Transforms;
use crate::error::RenderError;

/// One draw call as the backend saw it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub drawable: Drawable,
    pub topology: Topology,
    pub vertex_count: u32,
    pub position_bytes: usize,
    pub color_bytes: usize,
}

/// Everything submitted for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub transforms: Transforms,
    pub uniform_bytes: Vec<u8>,
    pub draws: Vec<RecordedDraw>,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    uniforms: Option<UniformBlock>,
    viewport: (u32, u32),
    frames: Vec<RecordedFrame>,
    /// Keep at most this many frames (oldest dropped first)
    history: Option<usize>,
    buffers_uploaded: u64,
    installs: u32,
    releases: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only keep the most recent `frames` frames
    pub fn with_history(frames: usize) -> Self {
        Self {
            history: Some(frames),
            ..Self::default()
        }
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Vertex buffers created so far (two per drawable per frame)
    pub fn buffers_uploaded(&self) -> u64 {
        self.buffers_uploaded
    }

    pub fn has_program(&self) -> bool {
        self.uniforms.is_some()
    }

    pub fn installs(&self) -> u32 {
        self.installs
    }

    pub fn releases(&self) -> u32 {
        self.releases
    }
}

impl RenderBackend for RecordingBackend {
    fn install_program(&mut self, program: &ShaderProgram) -> Result<(), RenderError> {
        if self.uniforms.is_some() {
            return Err(RenderError::Program(
                "a shader program is already installed".to_string(),
            ));
        }
        self.uniforms = Some(program.uniforms);
        self.installs += 1;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn render(&mut self, transforms: &Transforms, meshes: &[Mesh]) -> Result<(), RenderError> {
        let uniforms = self.uniforms.as_ref().ok_or(RenderError::NoProgram)?;

        let draws = meshes
            .iter()
            .filter(|mesh| mesh.vertex_count() > 0)
            .map(|mesh| RecordedDraw {
                drawable: mesh.drawable,
                topology: mesh.topology,
                vertex_count: mesh.vertex_count(),
                position_bytes: bytemuck::cast_slice::<_, u8>(&mesh.positions).len(),
                color_bytes: bytemuck::cast_slice::<_, u8>(&mesh.colors).len(),
            })
            .collect::<Vec<_>>();

        self.buffers_uploaded += 2 * draws.len() as u64;
        self.frames.push(RecordedFrame {
            transforms: *transforms,
            uniform_bytes: transforms.to_uniform_bytes(uniforms),
            draws,
        });
        if let Some(limit) = self.history {
            let excess = self.frames.len().saturating_sub(limit);
            self.frames.drain(..excess);
        }
        Ok(())
    }

    fn release(&mut self) {
        if self.uniforms.take().is_some() {
            self.releases += 1;
        }
    }
}
