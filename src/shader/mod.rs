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

//! The shader facade.
//!
//! [`Shader`] ties everything together: it resolves declared metadata,
//! obtains a cached linked program, and generates the uniform/attribute
//! accessors bound to that program's locations. Creation and every
//! reconfiguration relink eagerly, so accessors can never observe a
//! location from a superseded program.
//!
//! The context is passed into each call rather than stored; the facade
//! keeps only the context's identity token and asserts (in debug builds)
//! that callers stay on the context it was created against.

pub mod attributes;
mod uniforms;

pub use attributes::{Attribute, AttributeBinding};

use crate::api::{
    AttributeDescriptor, ContextId, ProgramHandle, ShaderDescriptor, UniformDescriptor,
    UniformLocation, UniformValue,
};
use crate::cache;
use crate::error::{AccessError, ReflectError, ShaderError};
use crate::reflect::{self, TypeTree};
use crate::traits::GlContext;
use std::collections::HashMap;
use uniforms::UniformNode;

/// Everything derived from one successful link. Computed fully before any
/// of it is committed, so a failed relink leaves the facade untouched.
#[derive(Debug)]
struct Linked {
    program: ProgramHandle,
    types: TypeTree,
    uniforms: UniformNode,
    attributes: Vec<AttributeBinding>,
}

/// A linked shader program with generated uniform/attribute accessors.
///
/// Created via [`Shader::create`]; reconfigured via
/// [`update_exports`](Shader::update_exports) /
/// [`update_sources`](Shader::update_sources); retired via
/// [`dispose`](Shader::dispose), which consumes the facade (there is no
/// usable disposed state). The underlying program and compiled shaders stay
/// in the process-wide cache for reuse by other facades on the same
/// context.
#[derive(Debug)]
pub struct Shader {
    context: ContextId,
    vertex_source: String,
    fragment_source: String,
    uniform_descriptors: Vec<UniformDescriptor>,
    attribute_descriptors: Vec<AttributeDescriptor>,
    linked: Linked,
}

impl Shader {
    /// Compiles (or reuses), links (or reuses), and reflects a program.
    ///
    /// # Errors
    ///
    /// Any [`ShaderError`]: invalid/conflicting descriptors, compile
    /// failure, or link failure. No partially constructed facade is
    /// returned.
    pub fn create(ctx: &dyn GlContext, desc: &ShaderDescriptor<'_>) -> Result<Self, ShaderError> {
        let linked = link(
            ctx,
            &desc.vertex_source,
            &desc.fragment_source,
            &desc.uniforms,
            &desc.attributes,
            desc.attribute_locations.as_deref(),
        )?;
        Ok(Self {
            context: ctx.context_id(),
            vertex_source: desc.vertex_source.clone().into_owned(),
            fragment_source: desc.fragment_source.clone().into_owned(),
            uniform_descriptors: desc.uniforms.to_vec(),
            attribute_descriptors: desc.attributes.to_vec(),
            linked,
        })
    }

    /// The linked program handle currently backing the accessors.
    pub fn program(&self) -> ProgramHandle {
        self.linked.program
    }

    /// Identity of the context this facade was created against.
    pub fn context_id(&self) -> ContextId {
        self.context
    }

    /// The resolved uniform type tree for the current configuration.
    pub fn types(&self) -> &TypeTree {
        &self.linked.types
    }

    /// The declared uniform descriptors, as last submitted.
    pub fn uniform_descriptors(&self) -> &[UniformDescriptor] {
        &self.uniform_descriptors
    }

    /// The declared attribute descriptors, as last submitted.
    pub fn attribute_descriptors(&self) -> &[AttributeDescriptor] {
        &self.attribute_descriptors
    }

    /// Makes this shader's program current. Idempotent; never triggers a
    /// compile or link.
    pub fn bind(&self, ctx: &dyn GlContext) {
        self.check_context(ctx);
        log::trace!("binding program {:?}", self.linked.program);
        ctx.use_program(self.linked.program);
    }

    /// Reads the uniform (or whole struct/array subtree) at `path`.
    ///
    /// Stripped uniforms read back their detached store, never an error.
    ///
    /// # Errors
    ///
    /// [`AccessError::UnknownPath`] if `path` names nothing declared.
    pub fn uniform(&self, ctx: &dyn GlContext, path: &str) -> Result<UniformValue, AccessError> {
        self.check_context(ctx);
        let node = self.find_node(path)?;
        Ok(node.get(ctx, self.linked.program))
    }

    /// Writes the uniform (or whole struct/array subtree) at `path`. The
    /// upload calls used are fixed by the declared types; compound values
    /// are decomposed leaf by leaf in declaration order.
    ///
    /// # Errors
    ///
    /// [`AccessError::UnknownPath`] for undeclared paths,
    /// [`AccessError::TypeMismatch`] if the value cannot be decomposed into
    /// the declared structure.
    pub fn set_uniform(
        &mut self,
        ctx: &dyn GlContext,
        path: &str,
        value: impl Into<UniformValue>,
    ) -> Result<(), AccessError> {
        self.check_context(ctx);
        let segments = reflect::parse_path(path).map_err(|_| AccessError::UnknownPath {
            path: path.to_string(),
        })?;
        let node = self
            .linked
            .uniforms
            .find_mut(&segments)
            .ok_or_else(|| AccessError::UnknownPath {
                path: path.to_string(),
            })?;
        node.set(ctx, path, &value.into())
    }

    /// All attribute bindings for the current link, in declaration order.
    pub fn attributes(&self) -> &[AttributeBinding] {
        &self.linked.attributes
    }

    /// The accessor for one attribute, if declared.
    pub fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        self.linked
            .attributes
            .iter()
            .find(|binding| binding.name == name)
            .map(|binding| Attribute { binding })
    }

    /// Moves an attribute to a new location and relinks so the program
    /// reflects the new binding before its next use. Every other
    /// attribute keeps its current location.
    ///
    /// # Errors
    ///
    /// Unknown attribute names are a descriptor error; compile/link
    /// failures pass through. On error the previous link stays active.
    pub fn set_attribute_location(
        &mut self,
        ctx: &dyn GlContext,
        name: &str,
        location: u32,
    ) -> Result<(), ShaderError> {
        self.check_context(ctx);
        let index = self
            .linked
            .attributes
            .iter()
            .position(|binding| binding.name == name)
            .ok_or_else(|| {
                ShaderError::Reflect(ReflectError::MalformedDescriptor {
                    name: name.to_string(),
                    reason: "not a declared attribute".to_string(),
                })
            })?;

        let mut locations: Vec<u32> = self
            .linked
            .attributes
            .iter()
            .map(|binding| binding.location)
            .collect();
        locations[index] = location;

        self.linked = link(
            ctx,
            &self.vertex_source,
            &self.fragment_source,
            &self.uniform_descriptors,
            &self.attribute_descriptors,
            Some(&locations),
        )?;
        Ok(())
    }

    /// Replaces the declared uniform/attribute sets, relinks, and
    /// regenerates every accessor and the `types` snapshot. Previously
    /// obtained attribute views are invalidated by the borrow rules;
    /// previously valid paths resolve against the new program only.
    ///
    /// # Errors
    ///
    /// As for [`create`](Shader::create). On error the previous
    /// configuration stays fully active.
    pub fn update_exports(
        &mut self,
        ctx: &dyn GlContext,
        uniforms: &[UniformDescriptor],
        attributes: &[AttributeDescriptor],
    ) -> Result<(), ShaderError> {
        self.check_context(ctx);
        self.linked = link(
            ctx,
            &self.vertex_source,
            &self.fragment_source,
            uniforms,
            attributes,
            None,
        )?;
        self.uniform_descriptors = uniforms.to_vec();
        self.attribute_descriptors = attributes.to_vec();
        Ok(())
    }

    /// Swaps the source pair, relinks, and regenerates the accessors
    /// against the new program.
    ///
    /// # Errors
    ///
    /// As for [`create`](Shader::create). On error the previous sources
    /// stay fully active.
    pub fn update_sources(
        &mut self,
        ctx: &dyn GlContext,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<(), ShaderError> {
        self.check_context(ctx);
        self.linked = link(
            ctx,
            vertex_source,
            fragment_source,
            &self.uniform_descriptors,
            &self.attribute_descriptors,
            None,
        )?;
        self.vertex_source = vertex_source.to_string();
        self.fragment_source = fragment_source.to_string();
        Ok(())
    }

    /// Retires the facade. Deliberately leaves the compiled shaders and
    /// linked program in the shared cache: compilation is expensive, the
    /// objects die with their context, and other facades may be using the
    /// same entries.
    pub fn dispose(self) {
        log::trace!(
            "disposed shader facade on {:?}; cached program retained",
            self.context
        );
    }

    fn find_node(&self, path: &str) -> Result<&UniformNode, AccessError> {
        let segments = reflect::parse_path(path).map_err(|_| AccessError::UnknownPath {
            path: path.to_string(),
        })?;
        self.linked
            .uniforms
            .find(&segments)
            .ok_or_else(|| AccessError::UnknownPath {
                path: path.to_string(),
            })
    }

    fn check_context(&self, ctx: &dyn GlContext) {
        debug_assert_eq!(
            ctx.context_id(),
            self.context,
            "shader used with a context other than the one it was created against"
        );
    }
}

/// Resolves metadata, obtains the cached program, and generates accessors.
fn link(
    ctx: &dyn GlContext,
    vertex_source: &str,
    fragment_source: &str,
    uniform_descriptors: &[UniformDescriptor],
    attribute_descriptors: &[AttributeDescriptor],
    explicit_locations: Option<&[u32]>,
) -> Result<Linked, ShaderError> {
    let attribute_types = attributes::resolve(attribute_descriptors)?;
    let locations = attributes::assign_locations(attribute_descriptors, explicit_locations);
    // Caller-declared order, preserved verbatim in the cache key.
    let bindings: Vec<(String, u32)> = attribute_types
        .iter()
        .zip(&locations)
        .map(|((name, _), &location)| (name.clone(), location))
        .collect();

    let types = reflect::resolve(uniform_descriptors)?;
    let program = cache::program(ctx, vertex_source, fragment_source, &bindings)?;

    let explicit_uniforms: HashMap<&str, UniformLocation> = uniform_descriptors
        .iter()
        .filter_map(|desc| {
            desc.location
                .map(|location| (desc.name.as_str(), UniformLocation(location)))
        })
        .collect();
    let uniforms = UniformNode::build(&types, &mut |path| {
        explicit_uniforms
            .get(path)
            .copied()
            .or_else(|| ctx.uniform_location(program, path))
    });

    let attributes = attribute_types
        .into_iter()
        .zip(locations)
        .map(|((name, ty), location)| AttributeBinding { name, ty, location })
        .collect();

    Ok(Linked {
        program,
        types,
        uniforms,
        attributes,
    })
}
