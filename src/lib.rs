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

//! # glbind
//!
//! A reflection-and-caching facade over a GLSL shader API.
//!
//! Callers declare shader sources plus typed uniform/attribute metadata in
//! a [`ShaderDescriptor`]; [`Shader::create`] compiles and links through a
//! process-wide per-context cache (identical sources and attribute
//! bindings share GPU objects) and generates path-addressed accessors for
//! every declared uniform and attribute. The GL backend is abstracted
//! behind the [`GlContext`] trait so the whole crate tests against fakes.

#![warn(missing_docs)]

pub mod api;
pub mod cache;
pub mod error;
pub mod reflect;
pub mod shader;
pub mod traits;

#[cfg(test)]
mod test_util;

pub use api::{
    AttributeDescriptor, ContextId, GlslType, ProgramHandle, ShaderDescriptor, ShaderHandle,
    UniformDescriptor, UniformKind, UniformLocation, UniformValue,
};
pub use error::{AccessError, ReflectError, ShaderError};
pub use shader::{Attribute, AttributeBinding, Shader};
pub use traits::{DataType, GlContext, PointerOptions, ShaderStage};
