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

//! Uniform metadata resolution.
//!
//! Declared uniform names are dotted/bracketed leaf paths
//! (`"lights[0].color"`). [`resolve`] parses every descriptor and merges
//! them into one explicit [`TypeTree`] whose internal nodes are structs and
//! arrays and whose leaves carry the parsed GLSL type. The tree is built
//! once; accessor generation and whole-subtree assignment are plain
//! traversals over it, in insertion order.

use crate::api::{GlslType, UniformDescriptor};
use crate::error::ReflectError;
use std::fmt;

/// One step of a uniform path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A struct field (`.name`).
    Field(String),
    /// An array index (`[n]`).
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => write!(f, ".{name}"),
            Segment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// The canonical structure of a program's declared uniforms.
///
/// Children keep the order in which descriptors first contributed them;
/// that order drives accessor generation and compound assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeTree {
    /// A single scalar/vector/matrix uniform.
    Leaf {
        /// Full dotted/bracketed path, as passed to the location query.
        path: String,
        /// Parsed declared type.
        ty: GlslType,
    },
    /// A struct node with named children.
    Struct(Vec<(String, TypeTree)>),
    /// An array node with indexed children (indices may be sparse).
    Array(Vec<(usize, TypeTree)>),
}

impl TypeTree {
    /// Visits every leaf in build order.
    pub fn for_each_leaf<'a>(&'a self, f: &mut impl FnMut(&'a str, GlslType)) {
        match self {
            TypeTree::Leaf { path, ty } => f(path, *ty),
            TypeTree::Struct(children) => {
                for (_, child) in children {
                    child.for_each_leaf(f);
                }
            }
            TypeTree::Array(children) => {
                for (_, child) in children {
                    child.for_each_leaf(f);
                }
            }
        }
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        let mut n = 0;
        self.for_each_leaf(&mut |_, _| n += 1);
        n
    }
}

/// Splits a declared uniform name into path segments.
///
/// The first segment must be a field; brackets must hold a bare decimal
/// index. Anything else fails with
/// [`ReflectError::MalformedDescriptor`].
pub fn parse_path(name: &str) -> Result<Vec<Segment>, ReflectError> {
    let malformed = |reason: &str| ReflectError::MalformedDescriptor {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let mut segments = Vec::new();
    let bytes = name.as_bytes();

    let ident_end = |from: usize| {
        let mut j = from;
        while j < bytes.len() && bytes[j] != b'.' && bytes[j] != b'[' {
            j += 1;
        }
        j
    };

    // Leading identifier.
    let mut i = ident_end(0);
    if i == 0 {
        return Err(malformed("empty path segment"));
    }
    segments.push(Segment::Field(name[..i].to_string()));

    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                let end = ident_end(i + 1);
                if end == i + 1 {
                    return Err(malformed("empty path segment"));
                }
                segments.push(Segment::Field(name[i + 1..end].to_string()));
                i = end;
            }
            b'[' => {
                let close = match name[i..].find(']') {
                    Some(off) => i + off,
                    None => return Err(malformed("unterminated '['")),
                };
                let index: usize = name[i + 1..close]
                    .parse()
                    .map_err(|_| malformed("array index is not a decimal integer"))?;
                segments.push(Segment::Index(index));
                i = close + 1;
            }
            _ => return Err(malformed("expected '.' or '[' after ']'")),
        }
    }
    Ok(segments)
}

/// Resolves a descriptor list into a canonical [`TypeTree`].
///
/// Fails with [`ReflectError::InvalidUniformType`] for type strings outside
/// the vocabulary and [`ReflectError::MalformedDescriptor`] for unparsable
/// names or structurally conflicting declarations. Exact duplicate
/// declarations are tolerated; conflicting ones are not.
pub fn resolve(descriptors: &[UniformDescriptor]) -> Result<TypeTree, ReflectError> {
    let mut root = TypeTree::Struct(Vec::new());
    for desc in descriptors {
        let ty = GlslType::parse(&desc.ty).ok_or_else(|| ReflectError::InvalidUniformType {
            name: desc.name.clone(),
            ty: desc.ty.clone(),
        })?;
        let segments = parse_path(&desc.name)?;
        insert(&mut root, &segments, &desc.name, ty)?;
    }
    Ok(root)
}

/// Inserts one leaf under `node`, creating branch nodes along the way.
/// `node` is always a branch matching the kind of `segments[0]`.
fn insert(
    node: &mut TypeTree,
    segments: &[Segment],
    name: &str,
    ty: GlslType,
) -> Result<(), ReflectError> {
    let conflict = |reason: &str| ReflectError::MalformedDescriptor {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let (segment, rest) = segments
        .split_first()
        .expect("insert is never called with an empty path");

    let slot = match (node, segment) {
        (TypeTree::Struct(children), Segment::Field(field)) => {
            if !children.iter().any(|(n, _)| n == field) {
                children.push((field.clone(), empty_node_for(rest, name, ty)));
            }
            let (_, child) = children
                .iter_mut()
                .find(|(n, _)| n == field)
                .expect("just inserted");
            child
        }
        (TypeTree::Array(children), Segment::Index(index)) => {
            if !children.iter().any(|(i, _)| i == index) {
                children.push((*index, empty_node_for(rest, name, ty)));
            }
            let (_, child) = children
                .iter_mut()
                .find(|(i, _)| i == index)
                .expect("just inserted");
            child
        }
        _ => {
            return Err(conflict(
                "path mixes array and struct access at the same node",
            ))
        }
    };

    if rest.is_empty() {
        return match slot {
            TypeTree::Leaf { ty: existing, .. } if *existing == ty => Ok(()),
            TypeTree::Leaf { .. } => Err(conflict("conflicting types declared for the same leaf")),
            _ => Err(conflict("leaf declared where a struct/array already exists")),
        };
    }
    match slot {
        TypeTree::Leaf { .. } => Err(conflict("struct/array access into a declared leaf")),
        branch => insert(branch, rest, name, ty),
    }
}

/// The node a fresh child should start as: a leaf if the path ends here,
/// otherwise an empty branch matching the next segment's kind.
fn empty_node_for(rest: &[Segment], name: &str, ty: GlslType) -> TypeTree {
    match rest.first() {
        None => TypeTree::Leaf {
            path: name.to_string(),
            ty,
        },
        Some(Segment::Field(_)) => TypeTree::Struct(Vec::new()),
        Some(Segment::Index(_)) => TypeTree::Array(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(name: &str, ty: &str) -> UniformDescriptor {
        UniformDescriptor::new(name, ty)
    }

    #[test]
    fn parses_flat_and_nested_paths() {
        assert_eq!(
            parse_path("model").unwrap(),
            vec![Segment::Field("model".into())]
        );
        assert_eq!(
            parse_path("lights[2].color").unwrap(),
            vec![
                Segment::Field("lights".into()),
                Segment::Index(2),
                Segment::Field("color".into()),
            ]
        );
        assert_eq!(
            parse_path("grid[1][3]").unwrap(),
            vec![
                Segment::Field("grid".into()),
                Segment::Index(1),
                Segment::Index(3),
            ]
        );
    }

    #[test]
    fn rejects_malformed_paths() {
        for bad in ["", ".x", "a..b", "a[", "a[b]", "a[1]x", "a[]"] {
            let err = parse_path(bad).unwrap_err();
            assert!(
                matches!(err, ReflectError::MalformedDescriptor { .. }),
                "{bad:?} should be malformed, got {err:?}"
            );
        }
    }

    #[test]
    fn resolves_flat_descriptors_in_order() {
        let tree = resolve(&[u("model", "mat4"), u("tint", "vec3")]).unwrap();
        let TypeTree::Struct(children) = &tree else {
            panic!("root must be a struct");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].0, "model");
        assert_eq!(children[1].0, "tint");
        assert_eq!(
            children[0].1,
            TypeTree::Leaf {
                path: "model".into(),
                ty: GlslType::Mat(4)
            }
        );
    }

    #[test]
    fn merges_struct_array_paths() {
        let tree = resolve(&[
            u("lights[0].color", "vec3"),
            u("lights[0].intensity", "float"),
            u("lights[1].color", "vec3"),
        ])
        .unwrap();
        assert_eq!(tree.leaf_count(), 3);

        let mut seen = Vec::new();
        tree.for_each_leaf(&mut |path, ty| seen.push((path.to_string(), ty)));
        assert_eq!(
            seen,
            vec![
                ("lights[0].color".to_string(), GlslType::Vec(3)),
                ("lights[0].intensity".to_string(), GlslType::Float),
                ("lights[1].color".to_string(), GlslType::Vec(3)),
            ]
        );
    }

    #[test]
    fn duplicate_identical_declarations_are_tolerated() {
        let tree = resolve(&[u("tint", "vec3"), u("tint", "vec3")]).unwrap();
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn conflicting_leaf_types_are_malformed() {
        let err = resolve(&[u("tint", "vec3"), u("tint", "vec4")]).unwrap_err();
        assert!(matches!(err, ReflectError::MalformedDescriptor { .. }));
    }

    #[test]
    fn leaf_versus_branch_conflicts_are_malformed() {
        let err = resolve(&[u("light", "vec3"), u("light.color", "vec3")]).unwrap_err();
        assert!(matches!(err, ReflectError::MalformedDescriptor { .. }));

        let err = resolve(&[u("light.color", "vec3"), u("light", "vec3")]).unwrap_err();
        assert!(matches!(err, ReflectError::MalformedDescriptor { .. }));

        let err = resolve(&[u("light.color", "vec3"), u("light[0]", "vec3")]).unwrap_err();
        assert!(matches!(err, ReflectError::MalformedDescriptor { .. }));
    }

    #[test]
    fn invalid_type_string_names_the_uniform() {
        let err = resolve(&[u("weights", "vec7")]).unwrap_err();
        assert_eq!(
            err,
            ReflectError::InvalidUniformType {
                name: "weights".into(),
                ty: "vec7".into()
            }
        );
    }
}
