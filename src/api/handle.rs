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

//! Opaque handles minted by a [`GlContext`](crate::traits::GlContext) backend.
//!
//! The facade never inspects these values; they are tokens passed back into
//! the context that produced them. Backends are free to use indices into
//! their own tables, driver object names, or anything else that fits in the
//! wrapped integer.

/// Identity token for a graphics context, used to key the process-wide
/// shader/program cache.
///
/// Two context objects with the same `ContextId` share one cache entry, so
/// backends must hand out distinct ids for distinct underlying contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub u64);

/// An opaque handle to a compiled shader object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderHandle(pub usize);

/// An opaque handle to a linked program object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramHandle(pub usize);

/// An opaque handle to a uniform's slot within a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniformLocation(pub usize);
