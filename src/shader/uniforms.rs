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

//! Generated uniform accessors.
//!
//! The accessor tree mirrors the resolved [`TypeTree`]: every leaf stores
//! the upload family picked at resolve time plus either a GPU location or,
//! when the compiler stripped the uniform, a detached slot holding the
//! type's default. Reads and writes on detached slots touch only that
//! stored value — callers poking optimized-away uniforms must not fail.
//!
//! Setting an internal node decomposes a `Struct`/`Array` value and applies
//! every leaf setter underneath, in tree build order.

use crate::api::{GlslType, ProgramHandle, UniformKind, UniformLocation, UniformValue};
use crate::error::AccessError;
use crate::reflect::{Segment, TypeTree};
use crate::traits::GlContext;

/// Where a leaf's value lives.
#[derive(Debug)]
enum Slot {
    /// Backed by a program location; traffic goes through the context.
    Located(UniformLocation),
    /// Stripped by the compiler; reads and writes use this stored value.
    Detached(UniformValue),
}

/// One generated leaf accessor.
#[derive(Debug)]
pub(crate) struct UniformBinding {
    path: String,
    ty: GlslType,
    kind: UniformKind,
    slot: Slot,
}

/// The generated accessor tree for a linked program's uniforms.
#[derive(Debug)]
pub(crate) enum UniformNode {
    /// A single typed accessor.
    Leaf(UniformBinding),
    /// Named children, in build order.
    Struct(Vec<(String, UniformNode)>),
    /// Indexed children, in build order (indices may be sparse).
    Array(Vec<(usize, UniformNode)>),
}

impl UniformBinding {
    fn mismatch(&self) -> AccessError {
        AccessError::TypeMismatch {
            path: self.path.clone(),
            expected: Some(self.ty),
        }
    }

    fn get(&self, ctx: &dyn GlContext, program: ProgramHandle) -> UniformValue {
        match &self.slot {
            Slot::Located(location) => ctx.get_uniform(program, *location),
            Slot::Detached(value) => value.clone(),
        }
    }

    /// Validates against the declared kind, then issues exactly that kind's
    /// upload call (or updates the detached store).
    fn set(&mut self, ctx: &dyn GlContext, value: &UniformValue) -> Result<(), AccessError> {
        let location = match self.slot {
            Slot::Located(location) => Some(location),
            Slot::Detached(_) => None,
        };
        match self.kind {
            UniformKind::ScalarInt => {
                let v = value.as_int().ok_or_else(|| self.mismatch())?;
                if let Some(location) = location {
                    ctx.uniform1i(location, v);
                }
            }
            UniformKind::ScalarFloat => {
                let v = value.as_float().ok_or_else(|| self.mismatch())?;
                if let Some(location) = location {
                    ctx.uniform1f(location, v);
                }
            }
            UniformKind::VecInt(dim) => {
                let v = value.as_int_vec(dim).ok_or_else(|| self.mismatch())?;
                if let Some(location) = location {
                    ctx.uniform_iv(location, &v);
                }
            }
            UniformKind::VecFloat(dim) => {
                let v = value.as_float_vec(dim).ok_or_else(|| self.mismatch())?;
                if let Some(location) = location {
                    ctx.uniform_fv(location, &v);
                }
            }
            UniformKind::Matrix(dim) => {
                let v = value.as_matrix(dim).ok_or_else(|| self.mismatch())?;
                if let Some(location) = location {
                    ctx.uniform_matrix_fv(location, dim, false, &v);
                }
            }
        }
        if let Slot::Detached(store) = &mut self.slot {
            *store = value.clone();
        }
        Ok(())
    }
}

impl UniformNode {
    /// Builds the accessor tree for a freshly linked program. `locate`
    /// resolves a leaf path to its location, or `None` if the compiler
    /// stripped it.
    pub fn build(
        tree: &TypeTree,
        locate: &mut dyn FnMut(&str) -> Option<UniformLocation>,
    ) -> UniformNode {
        match tree {
            TypeTree::Leaf { path, ty } => {
                let slot = match locate(path) {
                    Some(location) => Slot::Located(location),
                    None => {
                        log::debug!("uniform '{path}' has no location, using detached default");
                        Slot::Detached(ty.default_value())
                    }
                };
                UniformNode::Leaf(UniformBinding {
                    path: path.clone(),
                    ty: *ty,
                    kind: ty.kind(),
                    slot,
                })
            }
            TypeTree::Struct(children) => UniformNode::Struct(
                children
                    .iter()
                    .map(|(name, child)| (name.clone(), UniformNode::build(child, locate)))
                    .collect(),
            ),
            TypeTree::Array(children) => UniformNode::Array(
                children
                    .iter()
                    .map(|(index, child)| (*index, UniformNode::build(child, locate)))
                    .collect(),
            ),
        }
    }

    /// Finds the node addressed by pre-parsed path segments.
    pub fn find(&self, segments: &[Segment]) -> Option<&UniformNode> {
        let Some((segment, rest)) = segments.split_first() else {
            return Some(self);
        };
        let child = match (self, segment) {
            (UniformNode::Struct(children), Segment::Field(name)) => {
                children.iter().find(|(n, _)| n == name).map(|(_, c)| c)
            }
            (UniformNode::Array(children), Segment::Index(index)) => {
                children.iter().find(|(i, _)| i == index).map(|(_, c)| c)
            }
            _ => None,
        }?;
        child.find(rest)
    }

    /// Mutable variant of [`find`](Self::find).
    pub fn find_mut(&mut self, segments: &[Segment]) -> Option<&mut UniformNode> {
        let Some((segment, rest)) = segments.split_first() else {
            return Some(self);
        };
        let child = match (self, segment) {
            (UniformNode::Struct(children), Segment::Field(name)) => children
                .iter_mut()
                .find(|(n, _)| n == name)
                .map(|(_, c)| c),
            (UniformNode::Array(children), Segment::Index(index)) => children
                .iter_mut()
                .find(|(i, _)| i == index)
                .map(|(_, c)| c),
            _ => None,
        }?;
        child.find_mut(rest)
    }

    /// Reads this node: leaves query the context (or their detached store),
    /// internal nodes compose a `Struct`/`Array` value from their children.
    pub fn get(&self, ctx: &dyn GlContext, program: ProgramHandle) -> UniformValue {
        match self {
            UniformNode::Leaf(binding) => binding.get(ctx, program),
            UniformNode::Struct(children) => UniformValue::Struct(
                children
                    .iter()
                    .map(|(name, child)| (name.clone(), child.get(ctx, program)))
                    .collect(),
            ),
            UniformNode::Array(children) => UniformValue::Array(
                children.iter().map(|(_, child)| child.get(ctx, program)).collect(),
            ),
        }
    }

    /// Writes this node. Internal nodes require a `Struct`/`Array` value
    /// supplying every declared child; extra entries in the value are
    /// ignored. `path` is the node's own path, used only for diagnostics.
    pub fn set(
        &mut self,
        ctx: &dyn GlContext,
        path: &str,
        value: &UniformValue,
    ) -> Result<(), AccessError> {
        match self {
            UniformNode::Leaf(binding) => binding.set(ctx, value),
            UniformNode::Struct(children) => {
                for (name, child) in children {
                    let child_path = if path.is_empty() {
                        name.clone()
                    } else {
                        format!("{path}.{name}")
                    };
                    let field = value.field(name).ok_or_else(|| AccessError::TypeMismatch {
                        path: child_path.clone(),
                        expected: None,
                    })?;
                    child.set(ctx, &child_path, field)?;
                }
                Ok(())
            }
            UniformNode::Array(children) => {
                for (index, child) in children {
                    let child_path = format!("{path}[{index}]");
                    let element =
                        value
                            .element(*index)
                            .ok_or_else(|| AccessError::TypeMismatch {
                                path: child_path.clone(),
                                expected: None,
                            })?;
                    child.set(ctx, &child_path, element)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::UniformDescriptor;
    use crate::reflect;
    use crate::test_util::{Call, RecordingGl};

    fn build_tree(gl: &RecordingGl, descriptors: &[UniformDescriptor]) -> (ProgramHandle, UniformNode) {
        let program = gl.create_program();
        let tree = reflect::resolve(descriptors).unwrap();
        let node = UniformNode::build(&tree, &mut |path| gl.uniform_location(program, path));
        (program, node)
    }

    fn leaf_path(path: &str) -> Vec<Segment> {
        reflect::parse_path(path).unwrap()
    }

    #[test]
    fn setters_dispatch_on_the_declared_type_only() {
        let gl = RecordingGl::new();
        let (program, mut root) = build_tree(
            &gl,
            &[
                UniformDescriptor::new("flag", "bool"),
                UniformDescriptor::new("scale", "float"),
                UniformDescriptor::new("tint", "vec3"),
                UniformDescriptor::new("mask", "ivec2"),
                UniformDescriptor::new("model", "mat4"),
            ],
        );

        root.find_mut(&leaf_path("flag"))
            .unwrap()
            .set(&gl, "flag", &UniformValue::Bool(true))
            .unwrap();
        root.find_mut(&leaf_path("scale"))
            .unwrap()
            .set(&gl, "scale", &UniformValue::Int(2))
            .unwrap();
        root.find_mut(&leaf_path("tint"))
            .unwrap()
            .set(&gl, "tint", &UniformValue::FloatVec(vec![1.0, 0.5, 0.0]))
            .unwrap();
        root.find_mut(&leaf_path("mask"))
            .unwrap()
            .set(&gl, "mask", &UniformValue::BoolVec(vec![true, false]))
            .unwrap();
        root.find_mut(&leaf_path("model"))
            .unwrap()
            .set(&gl, "model", &UniformValue::Matrix(vec![0.0; 16]))
            .unwrap();

        let flag = gl.location_of(program, "flag").unwrap();
        let scale = gl.location_of(program, "scale").unwrap();
        let tint = gl.location_of(program, "tint").unwrap();
        let mask = gl.location_of(program, "mask").unwrap();
        let model = gl.location_of(program, "model").unwrap();
        assert_eq!(
            gl.take_calls(),
            vec![
                Call::Uniform1i(flag, 1),
                Call::Uniform1f(scale, 2.0),
                Call::UniformFv(tint, vec![1.0, 0.5, 0.0]),
                Call::UniformIv(mask, vec![1, 0]),
                Call::UniformMatrixFv(model, 4, vec![0.0; 16]),
            ]
        );
    }

    #[test]
    fn wrong_shape_is_rejected_before_any_upload() {
        let gl = RecordingGl::new();
        let (_, mut root) = build_tree(&gl, &[UniformDescriptor::new("tint", "vec3")]);

        let err = root
            .find_mut(&leaf_path("tint"))
            .unwrap()
            .set(&gl, "tint", &UniformValue::FloatVec(vec![1.0, 2.0]))
            .unwrap_err();
        assert_eq!(
            err,
            AccessError::TypeMismatch {
                path: "tint".into(),
                expected: Some(GlslType::Vec(3)),
            }
        );
        assert!(gl.take_calls().is_empty());
    }

    #[test]
    fn stripped_uniform_reads_back_its_default_then_stored_writes() {
        let gl = RecordingGl::new();
        gl.strip("ghost");
        let (program, mut root) = build_tree(&gl, &[UniformDescriptor::new("ghost", "vec3")]);

        let leaf = root.find(&leaf_path("ghost")).unwrap();
        assert_eq!(
            leaf.get(&gl, program),
            UniformValue::FloatVec(vec![0.0, 0.0, 0.0])
        );

        root.find_mut(&leaf_path("ghost"))
            .unwrap()
            .set(&gl, "ghost", &UniformValue::FloatVec(vec![9.0, 9.0, 9.0]))
            .unwrap();
        assert!(gl.take_calls().is_empty(), "detached writes stay off the GPU");
        assert_eq!(
            root.find(&leaf_path("ghost")).unwrap().get(&gl, program),
            UniformValue::FloatVec(vec![9.0, 9.0, 9.0])
        );
    }

    #[test]
    fn compound_set_walks_leaves_in_build_order() {
        let gl = RecordingGl::new();
        let (program, mut root) = build_tree(
            &gl,
            &[
                UniformDescriptor::new("light.color", "vec3"),
                UniformDescriptor::new("light.intensity", "float"),
            ],
        );

        root.find_mut(&leaf_path("light"))
            .unwrap()
            .set(
                &gl,
                "light",
                &UniformValue::Struct(vec![
                    // Field order in the value does not matter; tree order wins.
                    ("intensity".into(), UniformValue::Float(0.5)),
                    ("color".into(), UniformValue::FloatVec(vec![1.0, 1.0, 1.0])),
                ]),
            )
            .unwrap();

        let color = gl.location_of(program, "light.color").unwrap();
        let intensity = gl.location_of(program, "light.intensity").unwrap();
        assert_eq!(
            gl.take_calls(),
            vec![
                Call::UniformFv(color, vec![1.0, 1.0, 1.0]),
                Call::Uniform1f(intensity, 0.5),
            ]
        );
    }

    #[test]
    fn compound_set_requires_every_declared_child() {
        let gl = RecordingGl::new();
        let (_, mut root) = build_tree(
            &gl,
            &[
                UniformDescriptor::new("light.color", "vec3"),
                UniformDescriptor::new("light.intensity", "float"),
            ],
        );

        let err = root
            .find_mut(&leaf_path("light"))
            .unwrap()
            .set(
                &gl,
                "light",
                &UniformValue::Struct(vec![(
                    "color".into(),
                    UniformValue::FloatVec(vec![1.0, 1.0, 1.0]),
                )]),
            )
            .unwrap_err();
        assert_eq!(
            err,
            AccessError::TypeMismatch {
                path: "light.intensity".into(),
                expected: None,
            }
        );
    }

    #[test]
    fn array_set_matches_elements_by_declared_index() {
        let gl = RecordingGl::new();
        let (program, mut root) = build_tree(
            &gl,
            &[
                UniformDescriptor::new("weights[0]", "float"),
                UniformDescriptor::new("weights[1]", "float"),
            ],
        );

        root.find_mut(&leaf_path("weights"))
            .unwrap()
            .set(
                &gl,
                "weights",
                &UniformValue::Array(vec![UniformValue::Float(0.25), UniformValue::Float(0.75)]),
            )
            .unwrap();

        let w0 = gl.location_of(program, "weights[0]").unwrap();
        let w1 = gl.location_of(program, "weights[1]").unwrap();
        assert_eq!(
            gl.take_calls(),
            vec![Call::Uniform1f(w0, 0.25), Call::Uniform1f(w1, 0.75)]
        );
    }

    #[test]
    fn compound_get_composes_nested_values() {
        let gl = RecordingGl::new();
        let (program, mut root) = build_tree(
            &gl,
            &[
                UniformDescriptor::new("light.color", "vec3"),
                UniformDescriptor::new("light.intensity", "float"),
            ],
        );

        root.find_mut(&leaf_path("light.color"))
            .unwrap()
            .set(&gl, "light.color", &UniformValue::FloatVec(vec![1.0, 0.0, 0.0]))
            .unwrap();

        let value = root.find(&leaf_path("light")).unwrap().get(&gl, program);
        assert_eq!(
            value.field("color"),
            Some(&UniformValue::FloatVec(vec![1.0, 0.0, 0.0]))
        );
        assert!(value.field("intensity").is_some());
    }
}
