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

//! Descriptors a caller submits when creating or reconfiguring a shader.
//!
//! Uniform/attribute descriptors are plain serializable metadata — type
//! names stay strings here and are only parsed against the vocabulary in
//! [`api::types`](crate::api::types) during resolution, so descriptor lists
//! can be loaded verbatim from JSON sidecar files shipped next to shader
//! sources.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Declares one uniform of a program.
///
/// `name` is a full leaf path, with `.` for struct fields and `[n]` for
/// array indices (e.g. `"lights[0].color"`). `ty` must be one of the fixed
/// GLSL vocabulary strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformDescriptor {
    /// Dotted/bracketed leaf path.
    pub name: String,
    /// GLSL type string (`"bool"`, `"vec3"`, `"mat4"`, ...).
    #[serde(rename = "type")]
    pub ty: String,
    /// Explicit uniform location, bypassing the location query for this
    /// leaf. Rarely needed; locations are normally resolved at link time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<usize>,
}

/// Declares one vertex attribute of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Attribute name as written in the vertex shader.
    pub name: String,
    /// GLSL type string (`"float"`, `"vec2"`..`"vec4"`, `"int"`, `"bool"`).
    #[serde(rename = "type")]
    pub ty: String,
    /// Explicit location to bind before linking. Unclaimed attributes are
    /// assigned the first free slots in name order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<u32>,
}

/// Everything needed to create (or fully reconfigure) a [`Shader`].
///
/// [`Shader`]: crate::shader::Shader
#[derive(Debug, Clone)]
pub struct ShaderDescriptor<'a> {
    /// Vertex shader source text. Cached compilation is keyed by the exact
    /// text, so byte-identical sources share one compiled object.
    pub vertex_source: Cow<'a, str>,
    /// Fragment shader source text.
    pub fragment_source: Cow<'a, str>,
    /// Declared uniforms.
    pub uniforms: Cow<'a, [UniformDescriptor]>,
    /// Declared attributes. Their names and final locations are part of the
    /// program cache key.
    pub attributes: Cow<'a, [AttributeDescriptor]>,
    /// Optional full location list parallel to `attributes`, overriding any
    /// per-descriptor locations and the automatic assignment.
    pub attribute_locations: Option<Cow<'a, [u32]>>,
}

impl UniformDescriptor {
    /// Convenience constructor for the common no-explicit-location case.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            location: None,
        }
    }
}

impl AttributeDescriptor {
    /// Convenience constructor for the common no-explicit-location case.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            location: None,
        }
    }
}
