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

//! Defines the hierarchy of error types for the shader facade.
//!
//! Construction-time failures (bad descriptors, compile/link errors) are
//! fatal and surface synchronously from `create`/`update_exports`; no
//! partially linked shader object is ever returned. A uniform the compiler
//! optimized away is deliberately *not* an error — it resolves into a
//! detached accessor instead.

use crate::api::GlslType;
use crate::traits::ShaderStage;
use std::fmt;

/// An error raised while resolving declared uniform/attribute metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectError {
    /// The declared type string is not in the supported vocabulary (or a
    /// vec/mat dimension falls outside 2..=4).
    InvalidUniformType {
        /// Name of the offending uniform or attribute.
        name: String,
        /// The type string as declared.
        ty: String,
    },
    /// Two descriptors produced conflicting structure at the same path, or
    /// a name could not be parsed into path segments.
    MalformedDescriptor {
        /// Name of the offending descriptor.
        name: String,
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for ReflectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReflectError::InvalidUniformType { name, ty } => {
                write!(f, "Invalid uniform type '{ty}' for '{name}'")
            }
            ReflectError::MalformedDescriptor { name, reason } => {
                write!(f, "Malformed descriptor '{name}': {reason}")
            }
        }
    }
}

impl std::error::Error for ReflectError {}

/// An error raised while compiling, linking, or reconfiguring a shader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// The context reported a compile failure; `log` carries the driver's
    /// diagnostic text verbatim.
    CompileFailed {
        /// Stage of the shader that failed.
        stage: ShaderStage,
        /// Compiler info log.
        log: String,
    },
    /// The context reported a link failure; `log` carries the linker's
    /// diagnostic text verbatim.
    LinkFailed {
        /// Linker info log.
        log: String,
    },
    /// Declared metadata could not be resolved.
    Reflect(ReflectError),
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompileFailed { stage, log } => {
                let stage = match stage {
                    ShaderStage::Vertex => "vertex",
                    ShaderStage::Fragment => "fragment",
                };
                write!(f, "Error compiling {stage} shader: {log}")
            }
            ShaderError::LinkFailed { log } => {
                write!(f, "Error linking program: {log}")
            }
            ShaderError::Reflect(err) => write!(f, "Reflection failed: {err}"),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShaderError::Reflect(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ReflectError> for ShaderError {
    fn from(err: ReflectError) -> Self {
        ShaderError::Reflect(err)
    }
}

/// An error raised by the path-addressed uniform get/set API.
///
/// Get/set on a valid leaf cannot fail at runtime: the upload call is fixed
/// by the declared type at construction. These errors only flag misuse of
/// the traversal itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The path does not name any declared uniform node.
    UnknownPath {
        /// The path as supplied.
        path: String,
    },
    /// The supplied value cannot be decomposed into the declared type at
    /// this path (wrong variant, wrong dimension, or missing fields).
    TypeMismatch {
        /// Path of the node that rejected the value.
        path: String,
        /// The declared type at that node, if it is a leaf.
        expected: Option<GlslType>,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::UnknownPath { path } => {
                write!(f, "No uniform declared at '{path}'")
            }
            AccessError::TypeMismatch {
                path,
                expected: Some(ty),
            } => {
                write!(f, "Value at '{path}' does not match declared type {ty}")
            }
            AccessError::TypeMismatch {
                path,
                expected: None,
            } => {
                write!(f, "Value at '{path}' does not match declared structure")
            }
        }
    }
}

impl std::error::Error for AccessError {}
