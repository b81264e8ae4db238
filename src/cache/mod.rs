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

//! Process-wide shader and program cache.
//!
//! Compilation and linking are the expensive operations this crate exists
//! to amortize, so both are memoized per context: shaders by (stage, exact
//! source text) and programs by (vertex source, fragment source, ordered
//! attribute name/location pairs). Attribute bindings happen before linking
//! and change the linked binary's layout, which is why they are part of the
//! program key — identical sources with different bindings never share a
//! program.
//!
//! Entries are never evicted on their own; a cache entry lives exactly as
//! long as its context, released explicitly via [`release`] when the
//! context is torn down. Lookup-or-create runs under one mutex guard, so
//! the check-then-insert is atomic even if callers ever move off a single
//! thread.

use crate::api::{ContextId, ProgramHandle, ShaderHandle};
use crate::error::ShaderError;
use crate::traits::{GlContext, ShaderStage};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Program cache key: exact sources plus the ordered attribute bindings
/// applied before linking.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProgramKey {
    vertex: String,
    fragment: String,
    bindings: Vec<(String, u32)>,
}

/// Compiled objects owned by one context's cache entry.
#[derive(Debug, Default)]
struct ContextCache {
    /// Source text to compiled shader, indexed by [`ShaderStage::index`].
    shaders: [HashMap<String, ShaderHandle>; 2],
    programs: HashMap<ProgramKey, ProgramHandle>,
}

impl ContextCache {
    fn shader(
        &mut self,
        ctx: &dyn GlContext,
        stage: ShaderStage,
        source: &str,
    ) -> Result<ShaderHandle, ShaderError> {
        let shaders = &mut self.shaders[stage.index()];
        if let Some(&handle) = shaders.get(source) {
            log::trace!("shader cache hit ({stage:?}, {} bytes)", source.len());
            return Ok(handle);
        }
        let handle = ctx.create_shader(stage);
        ctx.shader_source(handle, source);
        if !ctx.compile_shader(handle) {
            let log = ctx.shader_info_log(handle);
            log::error!("Error compiling {stage:?} shader: {log}");
            return Err(ShaderError::CompileFailed { stage, log });
        }
        log::debug!("compiled {stage:?} shader ({} bytes)", source.len());
        shaders.insert(source.to_string(), handle);
        Ok(handle)
    }

    fn program(
        &mut self,
        ctx: &dyn GlContext,
        vertex_source: &str,
        fragment_source: &str,
        bindings: &[(String, u32)],
    ) -> Result<ProgramHandle, ShaderError> {
        let key = ProgramKey {
            vertex: vertex_source.to_string(),
            fragment: fragment_source.to_string(),
            bindings: bindings.to_vec(),
        };
        if let Some(&program) = self.programs.get(&key) {
            log::trace!("program cache hit ({} attributes)", bindings.len());
            return Ok(program);
        }

        let vertex = self.shader(ctx, ShaderStage::Vertex, vertex_source)?;
        let fragment = self.shader(ctx, ShaderStage::Fragment, fragment_source)?;

        let program = ctx.create_program();
        ctx.attach_shader(program, vertex);
        ctx.attach_shader(program, fragment);
        for (name, location) in bindings {
            ctx.bind_attrib_location(program, *location, name);
        }
        if !ctx.link_program(program) {
            let log = ctx.program_info_log(program);
            log::error!("Error linking program: {log}");
            return Err(ShaderError::LinkFailed { log });
        }
        log::debug!("linked program ({} attributes)", bindings.len());
        self.programs.insert(key, program);
        Ok(program)
    }
}

fn registry() -> MutexGuard<'static, HashMap<ContextId, ContextCache>> {
    static REGISTRY: OnceLock<Mutex<HashMap<ContextId, ContextCache>>> = OnceLock::new();
    match REGISTRY.get_or_init(|| Mutex::new(HashMap::new())).lock() {
        Ok(guard) => guard,
        // A panic while holding the guard leaves the map structurally
        // intact; keep serving the surviving contexts.
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Returns the memoized compiled shader for (context, stage, exact source),
/// compiling on first request.
///
/// # Errors
///
/// [`ShaderError::CompileFailed`] with the driver's diagnostic log; nothing
/// is cached for a failed compile.
pub fn shader(
    ctx: &dyn GlContext,
    stage: ShaderStage,
    source: &str,
) -> Result<ShaderHandle, ShaderError> {
    registry()
        .entry(ctx.context_id())
        .or_default()
        .shader(ctx, stage, source)
}

/// Returns the memoized linked program for (context, sources, ordered
/// attribute bindings), compiling and linking on first request.
///
/// # Errors
///
/// [`ShaderError::CompileFailed`] or [`ShaderError::LinkFailed`] with the
/// driver's diagnostic log; nothing is cached for a failed link.
pub fn program(
    ctx: &dyn GlContext,
    vertex_source: &str,
    fragment_source: &str,
    bindings: &[(String, u32)],
) -> Result<ProgramHandle, ShaderError> {
    registry()
        .entry(ctx.context_id())
        .or_default()
        .program(ctx, vertex_source, fragment_source, bindings)
}

/// Drops every cached shader and program association for a context.
///
/// Call when the context itself is being destroyed; the handles inside the
/// entry are owned by that context and die with it.
pub fn release(context: ContextId) {
    if registry().remove(&context).is_some() {
        log::debug!("released shader cache for {context:?}");
    }
}
