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

//! Generated vertex-attribute accessors.
//!
//! Every declared attribute is bound to an explicit location before the
//! program links (explicitly claimed slots are honored; the rest get the
//! first free slots in name order), so unlike uniforms an attribute
//! accessor always has a live location. Relocation goes through the facade
//! because it forces a relink.

use crate::api::{AttributeDescriptor, GlslType};
use crate::error::ReflectError;
use crate::traits::{GlContext, PointerOptions};

/// A resolved attribute: declared type plus the location it was bound to
/// for the current link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBinding {
    pub(crate) name: String,
    pub(crate) ty: GlslType,
    pub(crate) location: u32,
}

impl AttributeBinding {
    /// Attribute name as declared in the vertex shader.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    pub fn ty(&self) -> GlslType {
        self.ty
    }

    /// Location bound before the current link.
    pub fn location(&self) -> u32 {
        self.location
    }
}

/// Borrowed operations on one attribute's vertex-array slot.
#[derive(Debug, Clone, Copy)]
pub struct Attribute<'a> {
    pub(crate) binding: &'a AttributeBinding,
}

impl Attribute<'_> {
    /// The attribute's current location.
    pub fn location(&self) -> u32 {
        self.binding.location
    }

    /// Declared type.
    pub fn ty(&self) -> GlslType {
        self.binding.ty
    }

    /// Points this attribute at the currently bound buffer. The component
    /// count comes from the declared type; everything else from `options`
    /// (tightly packed unnormalized floats by default).
    pub fn pointer(&self, ctx: &dyn GlContext, options: PointerOptions) {
        ctx.vertex_attrib_pointer(
            self.binding.location,
            self.binding.ty.components(),
            options.data_type,
            options.normalized,
            options.stride,
            options.offset,
        );
    }

    /// Enables buffer-backed fetch for this attribute's slot.
    pub fn enable(&self, ctx: &dyn GlContext) {
        ctx.enable_vertex_attrib_array(self.binding.location);
    }

    /// Disables buffer-backed fetch for this attribute's slot.
    pub fn disable(&self, ctx: &dyn GlContext) {
        ctx.disable_vertex_attrib_array(self.binding.location);
    }

    /// Uploads a constant value used when no buffer feeds the slot. The
    /// component count must match the declared type.
    pub fn set_constant(&self, ctx: &dyn GlContext, values: &[f32]) {
        debug_assert_eq!(
            values.len(),
            self.binding.ty.components() as usize,
            "attribute '{}' constant size mismatch: declared {}, got {}",
            self.binding.name,
            self.binding.ty.components(),
            values.len()
        );
        ctx.vertex_attrib_fv(self.binding.location, values);
    }
}

/// Parses attribute descriptors against the attribute-compatible subset of
/// the vocabulary: `bool`, `int`, `float`, and `vecN`.
pub(crate) fn resolve(
    descriptors: &[AttributeDescriptor],
) -> Result<Vec<(String, GlslType)>, ReflectError> {
    descriptors
        .iter()
        .map(|desc| {
            let ty = GlslType::parse(&desc.ty).filter(|ty| {
                matches!(
                    ty,
                    GlslType::Bool | GlslType::Int | GlslType::Float | GlslType::Vec(_)
                )
            });
            match ty {
                Some(ty) => Ok((desc.name.clone(), ty)),
                None => Err(ReflectError::InvalidUniformType {
                    name: desc.name.clone(),
                    ty: desc.ty.clone(),
                }),
            }
        })
        .collect()
}

/// Assigns a location to every attribute.
///
/// An explicit full list wins outright. Otherwise, per-descriptor claims
/// are honored and the remaining attributes are sorted by name and given
/// ascending first-unused slots — deterministic and collision-free across
/// relinks for the same descriptor set.
pub(crate) fn assign_locations(
    descriptors: &[AttributeDescriptor],
    explicit: Option<&[u32]>,
) -> Vec<u32> {
    if let Some(list) = explicit {
        debug_assert_eq!(
            list.len(),
            descriptors.len(),
            "explicit attribute location list must cover every attribute"
        );
        return list.to_vec();
    }

    let mut assigned: Vec<Option<u32>> = descriptors.iter().map(|d| d.location).collect();
    let claimed: std::collections::HashSet<u32> = assigned.iter().flatten().copied().collect();

    let mut unclaimed: Vec<usize> = (0..descriptors.len())
        .filter(|&i| assigned[i].is_none())
        .collect();
    unclaimed.sort_by(|&a, &b| descriptors[a].name.cmp(&descriptors[b].name));

    let mut next = 0u32;
    for i in unclaimed {
        while claimed.contains(&next) {
            next += 1;
        }
        assigned[i] = Some(next);
        next += 1;
    }
    assigned
        .into_iter()
        .map(|location| location.expect("every attribute was assigned above"))
        .collect()
}
