// Copyright 2025 the glbind authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The graphics-context seam.
//!
//! [`GlContext`] is the only boundary through which this crate touches GPU
//! state. It mirrors the classic GL program/uniform surface one method per
//! capability; a backend wraps its real context (or a recording fake, in
//! tests) and nothing above this trait knows the difference.
//!
//! All operations are synchronous and complete on the caller's thread,
//! matching the single-threaded contract of the underlying APIs.

use crate::api::{ProgramHandle, ShaderHandle, UniformLocation, UniformValue};
use crate::api::ContextId;
use std::fmt::Debug;

/// Which pipeline stage a shader object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Per-vertex stage.
    Vertex,
    /// Per-fragment stage.
    Fragment,
}

impl ShaderStage {
    /// Stable index of the stage (vertex 0, fragment 1), used to pick the
    /// per-stage shader map inside the cache.
    pub fn index(self) -> usize {
        match self {
            ShaderStage::Vertex => 0,
            ShaderStage::Fragment => 1,
        }
    }
}

/// Component type of buffer-backed vertex attribute data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    /// 8-bit signed integer.
    Byte,
    /// 8-bit unsigned integer.
    UnsignedByte,
    /// 16-bit signed integer.
    Short,
    /// 16-bit unsigned integer.
    UnsignedShort,
    /// 32-bit signed integer.
    Int,
    /// 32-bit unsigned integer.
    UnsignedInt,
    /// 32-bit float (the default for `pointer()`).
    #[default]
    Float,
}

/// How a vertex attribute reads from the currently bound buffer.
///
/// `Default` gives the conventional tightly-packed float layout:
/// float components, unnormalized, stride 0, offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerOptions {
    /// Component type stored in the buffer.
    pub data_type: DataType,
    /// Whether integer components are normalized to [0, 1] / [-1, 1].
    pub normalized: bool,
    /// Byte stride between consecutive vertices (0 = tightly packed).
    pub stride: i32,
    /// Byte offset of the first component.
    pub offset: usize,
}

/// Capability set consumed from a graphics context.
///
/// Methods map one-to-one onto the documented synchronous GL calls; status
/// queries are folded into the compile/link methods' return values, and
/// info logs are fetched separately so failure diagnostics can be surfaced
/// verbatim.
pub trait GlContext: Debug {
    /// Identity token for this context. Contexts with equal ids share one
    /// shader/program cache entry.
    fn context_id(&self) -> ContextId;

    // --- shader objects ---

    /// Creates an empty shader object for `stage`.
    fn create_shader(&self, stage: ShaderStage) -> ShaderHandle;
    /// Replaces the shader's source text.
    fn shader_source(&self, shader: ShaderHandle, source: &str);
    /// Compiles the shader; returns the compile status.
    fn compile_shader(&self, shader: ShaderHandle) -> bool;
    /// The compiler's diagnostic log for the shader.
    fn shader_info_log(&self, shader: ShaderHandle) -> String;

    // --- program objects ---

    /// Creates an empty program object.
    fn create_program(&self) -> ProgramHandle;
    /// Attaches a compiled shader to the program.
    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle);
    /// Requests a specific attribute location; takes effect at link time.
    fn bind_attrib_location(&self, program: ProgramHandle, location: u32, name: &str);
    /// Links the program; returns the link status.
    fn link_program(&self, program: ProgramHandle) -> bool;
    /// The linker's diagnostic log for the program.
    fn program_info_log(&self, program: ProgramHandle) -> String;
    /// Makes the program current.
    fn use_program(&self, program: ProgramHandle);

    // --- reflection queries ---

    /// The location of a uniform leaf, or `None` if the compiler stripped it.
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;
    /// The location of an attribute, or `None` if it is inactive.
    fn attrib_location(&self, program: ProgramHandle, name: &str) -> Option<u32>;

    // --- uniform traffic ---

    /// Reads the current value of a uniform.
    fn get_uniform(&self, program: ProgramHandle, location: UniformLocation) -> UniformValue;
    /// Uploads an integer scalar (`uniform1i`).
    fn uniform1i(&self, location: UniformLocation, value: i32);
    /// Uploads a float scalar (`uniform1f`).
    fn uniform1f(&self, location: UniformLocation, value: f32);
    /// Uploads an integer vector; the slice length (2..=4) selects the call.
    fn uniform_iv(&self, location: UniformLocation, values: &[i32]);
    /// Uploads a float vector; the slice length (2..=4) selects the call.
    fn uniform_fv(&self, location: UniformLocation, values: &[f32]);
    /// Uploads a `dim` x `dim` matrix (`uniformMatrix{dim}fv`).
    fn uniform_matrix_fv(
        &self,
        location: UniformLocation,
        dim: u8,
        transpose: bool,
        values: &[f32],
    );

    // --- vertex attributes ---

    /// Points the attribute slot at the bound buffer.
    fn vertex_attrib_pointer(
        &self,
        location: u32,
        components: u8,
        data_type: DataType,
        normalized: bool,
        stride: i32,
        offset: usize,
    );
    /// Enables buffer-backed fetch for the slot.
    fn enable_vertex_attrib_array(&self, location: u32);
    /// Disables buffer-backed fetch for the slot.
    fn disable_vertex_attrib_array(&self, location: u32);
    /// Uploads a constant attribute value (`vertexAttrib{1..4}fv`), used
    /// when no buffer feeds the slot.
    fn vertex_attrib_fv(&self, location: u32, values: &[f32]);
}
