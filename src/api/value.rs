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

//! Values crossing the uniform get/set boundary.
//!
//! Leaf variants correspond to the upload families in
//! [`UniformKind`](crate::api::types::UniformKind); the `Struct`/`Array`
//! variants exist so a whole struct or array uniform can be assigned (or
//! read back) in one call, decomposed leaf by leaf by the accessor tree.

/// A uniform value, possibly compound.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    /// A single boolean, uploaded as 0 or 1.
    Bool(bool),
    /// A single integer (also used for sampler texture units).
    Int(i32),
    /// A single float.
    Float(f32),
    /// A boolean vector (`bvecN`), uploaded as integers.
    BoolVec(Vec<bool>),
    /// An integer vector (`ivecN`).
    IntVec(Vec<i32>),
    /// A float vector (`vecN`).
    FloatVec(Vec<f32>),
    /// A square column-major matrix (`matN`), N*N floats.
    Matrix(Vec<f32>),
    /// A struct value: named fields matched against the accessor tree.
    Struct(Vec<(String, UniformValue)>),
    /// An array value: elements matched by index against the accessor tree.
    Array(Vec<UniformValue>),
}

impl UniformValue {
    /// Coerces to an integer scalar. Booleans become 0/1.
    pub fn as_int(&self) -> Option<i32> {
        match *self {
            UniformValue::Int(v) => Some(v),
            UniformValue::Bool(v) => Some(v as i32),
            _ => None,
        }
    }

    /// Coerces to a float scalar. Integers widen.
    pub fn as_float(&self) -> Option<f32> {
        match *self {
            UniformValue::Float(v) => Some(v),
            UniformValue::Int(v) => Some(v as f32),
            _ => None,
        }
    }

    /// Coerces to an integer vector of exactly `dim` components.
    /// Boolean vectors become 0/1.
    pub fn as_int_vec(&self, dim: u8) -> Option<Vec<i32>> {
        let out = match self {
            UniformValue::IntVec(v) => v.clone(),
            UniformValue::BoolVec(v) => v.iter().map(|&b| b as i32).collect(),
            _ => return None,
        };
        (out.len() == dim as usize).then_some(out)
    }

    /// Coerces to a float vector of exactly `dim` components.
    /// Integer vectors widen.
    pub fn as_float_vec(&self, dim: u8) -> Option<Vec<f32>> {
        let out = match self {
            UniformValue::FloatVec(v) => v.clone(),
            UniformValue::IntVec(v) => v.iter().map(|&i| i as f32).collect(),
            _ => return None,
        };
        (out.len() == dim as usize).then_some(out)
    }

    /// Coerces to a `dim` x `dim` matrix (`dim * dim` floats). A flat float
    /// vector of the right length is accepted too.
    pub fn as_matrix(&self, dim: u8) -> Option<Vec<f32>> {
        let out = match self {
            UniformValue::Matrix(v) | UniformValue::FloatVec(v) => v.clone(),
            _ => return None,
        };
        (out.len() == dim as usize * dim as usize).then_some(out)
    }

    /// Looks up a field of a `Struct` value.
    pub fn field(&self, name: &str) -> Option<&UniformValue> {
        match self {
            UniformValue::Struct(fields) => {
                fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Looks up an element of an `Array` value.
    pub fn element(&self, index: usize) -> Option<&UniformValue> {
        match self {
            UniformValue::Array(items) => items.get(index),
            _ => None,
        }
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::Bool(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec<i32>> for UniformValue {
    fn from(v: Vec<i32>) -> Self {
        UniformValue::IntVec(v)
    }
}

impl From<Vec<f32>> for UniformValue {
    fn from(v: Vec<f32>) -> Self {
        UniformValue::FloatVec(v)
    }
}

impl<const N: usize> From<[f32; N]> for UniformValue {
    fn from(v: [f32; N]) -> Self {
        UniformValue::FloatVec(v.to_vec())
    }
}
