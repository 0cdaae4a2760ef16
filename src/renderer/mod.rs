//! Rendering: shader program checks, per-frame geometry, and backends
//!
//! `WgpuBackend` draws through WebGPU; `RecordingBackend` keeps the same
//! uploads in memory for headless runs.

pub mod backend;
pub mod pipeline;
pub mod recording;
pub mod shader;
pub mod shapes;
pub mod transforms;
pub mod vertex;

pub use backend::RenderBackend;
pub use pipeline::WgpuBackend;
pub use recording::{RecordedDraw, RecordedFrame, RecordingBackend};
pub use shader::{AttributeLocations, ShaderProgram, UniformBlock};
pub use shapes::{Drawable, Mesh, Topology, scene};
pub use transforms::Transforms;
