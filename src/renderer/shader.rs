//! Shader program: compile, link, and resolve locations
//!
//! Both stages are parsed and validated with naga so compile diagnostics are
//! available synchronously on every platform. "Linking" checks the two
//! modules against each other and against what the backend feeds them:
//! - a `@vertex` entry point in the vertex module, a `@fragment` one in the
//!   fragment module
//! - every fragment input location is produced by a vertex output of the
//!   same type
//! - vertex inputs `position` and `color` exist as `vec3<f32>` or `vec4<f32>`
//! - a uniform block at group 0 holds `model`, `view` and `projection` as
//!   `mat4x4<f32>`

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, Binding, Handle, Module, Type, TypeInner};

use crate::config::ShaderSources;
use crate::error::{ShaderError, ShaderStage};

/// Resolved vertex attribute locations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLocations {
    pub position: u32,
    pub color: u32,
}

/// Resolved uniform block binding and matrix offsets (bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformBlock {
    pub group: u32,
    pub binding: u32,
    /// Total block size including padding
    pub size: u32,
    pub model_offset: u32,
    pub view_offset: u32,
    pub projection_offset: u32,
}

/// A linked vertex + fragment program
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    pub vertex_source: String,
    pub fragment_source: String,
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub attributes: AttributeLocations,
    pub uniforms: UniformBlock,
}

/// A stage input or output bound to a location
#[derive(Debug, Clone)]
struct Varying {
    location: u32,
    name: Option<String>,
    inner: TypeInner,
}

impl ShaderProgram {
    /// Compile both stages, link them, and resolve attribute/uniform locations
    pub fn compile(sources: &ShaderSources) -> Result<Self, ShaderError> {
        let vertex = compile_stage(&sources.vertex, ShaderStage::Vertex)?;
        let fragment = compile_stage(&sources.fragment, ShaderStage::Fragment)?;

        let vs_entry = vertex
            .entry_points
            .iter()
            .find(|ep| ep.stage == naga::ShaderStage::Vertex)
            .ok_or_else(|| ShaderError::link("vertex module has no @vertex entry point"))?;
        let fs_entry = fragment
            .entry_points
            .iter()
            .find(|ep| ep.stage == naga::ShaderStage::Fragment)
            .ok_or_else(|| ShaderError::link("fragment module has no @fragment entry point"))?;

        // Stage interface
        let mut vs_outputs = Vec::new();
        if let Some(result) = &vs_entry.function.result {
            collect_varyings(&vertex, result.ty, result.binding.as_ref(), None, &mut vs_outputs);
        }
        let mut fs_inputs = Vec::new();
        for arg in &fs_entry.function.arguments {
            collect_varyings(
                &fragment,
                arg.ty,
                arg.binding.as_ref(),
                arg.name.as_deref(),
                &mut fs_inputs,
            );
        }
        for input in &fs_inputs {
            let output = vs_outputs
                .iter()
                .find(|o| o.location == input.location)
                .ok_or_else(|| {
                    ShaderError::link(format!(
                        "fragment input at location {} has no matching vertex output",
                        input.location
                    ))
                })?;
            if output.inner != input.inner {
                return Err(ShaderError::link(format!(
                    "type mismatch at location {}: vertex writes {:?}, fragment reads {:?}",
                    input.location, output.inner, input.inner
                )));
            }
        }

        // Attributes
        let mut vs_inputs = Vec::new();
        for arg in &vs_entry.function.arguments {
            collect_varyings(
                &vertex,
                arg.ty,
                arg.binding.as_ref(),
                arg.name.as_deref(),
                &mut vs_inputs,
            );
        }
        let attributes = AttributeLocations {
            position: attribute_location(&vs_inputs, "position")?,
            color: attribute_location(&vs_inputs, "color")?,
        };

        let uniforms = resolve_uniform_block(&vertex)?;

        log::info!(
            "Shader program linked: attributes {:?}, uniforms {:?}",
            attributes,
            uniforms
        );

        Ok(Self {
            vertex_source: sources.vertex.clone(),
            fragment_source: sources.fragment.clone(),
            vertex_entry: vs_entry.name.clone(),
            fragment_entry: fs_entry.name.clone(),
            attributes,
            uniforms,
        })
    }
}

/// Parse and validate one stage
fn compile_stage(source: &str, stage: ShaderStage) -> Result<Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        stage,
        log: e.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| ShaderError::Compile {
            stage,
            log: e.emit_to_string(source),
        })?;

    Ok(module)
}

/// Flatten an argument/result into its location-bound parts.
/// Builtins are skipped; unbound structs are walked member by member.
fn collect_varyings(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    name: Option<&str>,
    out: &mut Vec<Varying>,
) {
    let inner = &module.types[ty].inner;
    match binding {
        Some(Binding::Location { location, .. }) => out.push(Varying {
            location: *location,
            name: name.map(str::to_string),
            inner: inner.clone(),
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = inner {
                for member in members {
                    collect_varyings(
                        module,
                        member.ty,
                        member.binding.as_ref(),
                        member.name.as_deref(),
                        out,
                    );
                }
            }
        }
    }
}

fn attribute_location(inputs: &[Varying], name: &str) -> Result<u32, ShaderError> {
    let input = inputs
        .iter()
        .find(|v| v.name.as_deref() == Some(name))
        .ok_or_else(|| ShaderError::link(format!("attribute `{name}` not found")))?;

    // Buffers are Float32x3; a vec4 input gets its fourth component from fetch
    let accepted = [naga::VectorSize::Tri, naga::VectorSize::Quad].map(|size| TypeInner::Vector {
        size,
        scalar: naga::Scalar::F32,
    });
    if !accepted.contains(&input.inner) {
        return Err(ShaderError::link(format!(
            "attribute `{name}` must be vec3<f32> or vec4<f32>, found {:?}",
            input.inner
        )));
    }
    Ok(input.location)
}

fn resolve_uniform_block(module: &Module) -> Result<UniformBlock, ShaderError> {
    for (_, var) in module.global_variables.iter() {
        if var.space != AddressSpace::Uniform {
            continue;
        }
        let TypeInner::Struct { members, span } = &module.types[var.ty].inner else {
            continue;
        };

        let offset_of = |name: &str| -> Result<Option<u32>, ShaderError> {
            let Some(member) = members.iter().find(|m| m.name.as_deref() == Some(name)) else {
                return Ok(None);
            };
            let mat4_f32 = TypeInner::Matrix {
                columns: naga::VectorSize::Quad,
                rows: naga::VectorSize::Quad,
                scalar: naga::Scalar::F32,
            };
            if module.types[member.ty].inner != mat4_f32 {
                return Err(ShaderError::link(format!(
                    "uniform `{name}` must be mat4x4<f32>"
                )));
            }
            Ok(Some(member.offset))
        };

        let (Some(model), Some(view), Some(projection)) =
            (offset_of("model")?, offset_of("view")?, offset_of("projection")?)
        else {
            continue;
        };

        let binding = var.binding.as_ref().ok_or_else(|| {
            ShaderError::link("transform uniform block has no @group/@binding")
        })?;
        if binding.group != 0 {
            return Err(ShaderError::link(format!(
                "transform uniform block must be in group 0, found group {}",
                binding.group
            )));
        }

        return Ok(UniformBlock {
            group: binding.group,
            binding: binding.binding,
            size: *span,
            model_offset: model,
            view_offset: view,
            projection_offset: projection,
        });
    }

    Err(ShaderError::link(
        "no uniform block with `model`, `view` and `projection` members",
    ))
}
