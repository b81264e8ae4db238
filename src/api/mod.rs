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

//! Backend-agnostic data model.
//!
//! - **[`handle`]**: opaque context/shader/program/location tokens.
//! - **[`descriptor`]**: caller-facing shader/uniform/attribute metadata.
//! - **[`types`]**: the GLSL type vocabulary and upload dispatch table.
//! - **[`value`]**: values crossing the uniform get/set boundary.

pub mod descriptor;
pub mod handle;
pub mod types;
pub mod value;

pub use descriptor::{AttributeDescriptor, ShaderDescriptor, UniformDescriptor};
pub use handle::{ContextId, ProgramHandle, ShaderHandle, UniformLocation};
pub use types::{GlslType, UniformKind};
pub use value::UniformValue;
