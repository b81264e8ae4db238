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

//! Shared fakes for unit tests.

use crate::api::{ContextId, ProgramHandle, ShaderHandle, UniformLocation, UniformValue};
use crate::traits::{DataType, GlContext, ShaderStage};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// Mints context ids that never collide across parallel tests sharing the
/// process-wide cache registry.
pub(crate) fn fresh_context_id() -> ContextId {
    static NEXT: AtomicU64 = AtomicU64::new(0x1000);
    ContextId(NEXT.fetch_add(1, Ordering::Relaxed))
}

/// One recorded GPU-state call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    UseProgram(ProgramHandle),
    Uniform1i(UniformLocation, i32),
    Uniform1f(UniformLocation, f32),
    UniformIv(UniformLocation, Vec<i32>),
    UniformFv(UniformLocation, Vec<f32>),
    UniformMatrixFv(UniformLocation, u8, Vec<f32>),
    VertexAttribPointer {
        location: u32,
        components: u8,
        data_type: DataType,
        normalized: bool,
        stride: i32,
        offset: usize,
    },
    EnableVertexAttrib(u32),
    DisableVertexAttrib(u32),
    VertexAttribFv(u32, Vec<f32>),
}

/// A context fake that compiles/links everything successfully, mints stable
/// uniform locations per (program, name), stores uploaded uniform values for
/// readback, and records state-changing calls for assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingGl {
    id: Cell<u64>,
    next_handle: Cell<usize>,
    /// Uniform names the "compiler" stripped; their location query yields
    /// `None`.
    pub stripped: RefCell<HashSet<String>>,
    pub calls: RefCell<Vec<Call>>,
    locations: RefCell<HashMap<(ProgramHandle, String), UniformLocation>>,
    values: RefCell<HashMap<UniformLocation, UniformValue>>,
}

impl RecordingGl {
    pub fn new() -> Self {
        let gl = Self::default();
        gl.id.set(fresh_context_id().0);
        gl.next_handle.set(1);
        gl
    }

    fn next(&self) -> usize {
        let n = self.next_handle.get();
        self.next_handle.set(n + 1);
        n
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    /// Marks a uniform as optimized away by the compiler.
    pub fn strip(&self, name: &str) {
        self.stripped.borrow_mut().insert(name.to_string());
    }

    /// The location previously minted for (program, name), if any.
    pub fn location_of(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        self.locations
            .borrow()
            .get(&(program, name.to_string()))
            .copied()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }
}

impl GlContext for RecordingGl {
    fn context_id(&self) -> ContextId {
        ContextId(self.id.get())
    }
    fn create_shader(&self, _stage: ShaderStage) -> ShaderHandle {
        ShaderHandle(self.next())
    }
    fn shader_source(&self, _shader: ShaderHandle, _source: &str) {}
    fn compile_shader(&self, _shader: ShaderHandle) -> bool {
        true
    }
    fn shader_info_log(&self, _shader: ShaderHandle) -> String {
        String::new()
    }
    fn create_program(&self) -> ProgramHandle {
        ProgramHandle(self.next())
    }
    fn attach_shader(&self, _program: ProgramHandle, _shader: ShaderHandle) {}
    fn bind_attrib_location(&self, _program: ProgramHandle, _location: u32, _name: &str) {}
    fn link_program(&self, _program: ProgramHandle) -> bool {
        true
    }
    fn program_info_log(&self, _program: ProgramHandle) -> String {
        String::new()
    }
    fn use_program(&self, program: ProgramHandle) {
        self.record(Call::UseProgram(program));
    }
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        if self.stripped.borrow().contains(name) {
            return None;
        }
        let mut locations = self.locations.borrow_mut();
        if let Some(&loc) = locations.get(&(program, name.to_string())) {
            return Some(loc);
        }
        let loc = UniformLocation(self.next());
        locations.insert((program, name.to_string()), loc);
        Some(loc)
    }
    fn attrib_location(&self, _program: ProgramHandle, _name: &str) -> Option<u32> {
        None
    }
    fn get_uniform(&self, _program: ProgramHandle, location: UniformLocation) -> UniformValue {
        self.values
            .borrow()
            .get(&location)
            .cloned()
            .unwrap_or(UniformValue::Int(0))
    }
    fn uniform1i(&self, location: UniformLocation, value: i32) {
        self.values
            .borrow_mut()
            .insert(location, UniformValue::Int(value));
        self.record(Call::Uniform1i(location, value));
    }
    fn uniform1f(&self, location: UniformLocation, value: f32) {
        self.values
            .borrow_mut()
            .insert(location, UniformValue::Float(value));
        self.record(Call::Uniform1f(location, value));
    }
    fn uniform_iv(&self, location: UniformLocation, values: &[i32]) {
        self.values
            .borrow_mut()
            .insert(location, UniformValue::IntVec(values.to_vec()));
        self.record(Call::UniformIv(location, values.to_vec()));
    }
    fn uniform_fv(&self, location: UniformLocation, values: &[f32]) {
        self.values
            .borrow_mut()
            .insert(location, UniformValue::FloatVec(values.to_vec()));
        self.record(Call::UniformFv(location, values.to_vec()));
    }
    fn uniform_matrix_fv(
        &self,
        location: UniformLocation,
        dim: u8,
        _transpose: bool,
        values: &[f32],
    ) {
        self.values
            .borrow_mut()
            .insert(location, UniformValue::Matrix(values.to_vec()));
        self.record(Call::UniformMatrixFv(location, dim, values.to_vec()));
    }
    fn vertex_attrib_pointer(
        &self,
        location: u32,
        components: u8,
        data_type: DataType,
        normalized: bool,
        stride: i32,
        offset: usize,
    ) {
        self.record(Call::VertexAttribPointer {
            location,
            components,
            data_type,
            normalized,
            stride,
            offset,
        });
    }
    fn enable_vertex_attrib_array(&self, location: u32) {
        self.record(Call::EnableVertexAttrib(location));
    }
    fn disable_vertex_attrib_array(&self, location: u32) {
        self.record(Call::DisableVertexAttrib(location));
    }
    fn vertex_attrib_fv(&self, location: u32, values: &[f32]) {
        self.record(Call::VertexAttribFv(location, values.to_vec()));
    }
}
