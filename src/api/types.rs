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

//! The fixed GLSL type vocabulary and its mapping onto upload families.
//!
//! Descriptors declare types as strings (`"vec3"`, `"mat4"`, ...). Parsing
//! happens once, at resolve time; after that every leaf carries a
//! [`UniformKind`] and the GPU call used for it is fully determined. No
//! runtime inspection of the supplied value ever changes which call is made.

use crate::api::value::UniformValue;
use std::fmt;

/// A parsed GLSL uniform/attribute type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlslType {
    /// `bool`, uploaded as an integer scalar.
    Bool,
    /// `int`.
    Int,
    /// `float`.
    Float,
    /// `sampler2D`, a texture unit index (integer scalar).
    Sampler2D,
    /// `samplerCube`, a texture unit index (integer scalar).
    SamplerCube,
    /// `bvecN` for N in 2..=4, uploaded as an integer vector.
    BVec(u8),
    /// `ivecN` for N in 2..=4.
    IVec(u8),
    /// `vecN` for N in 2..=4.
    Vec(u8),
    /// `matN` for N in 2..=4 (square, column-major, N*N floats).
    Mat(u8),
}

/// The finite set of upload families a resolved leaf can dispatch to.
///
/// Selected once at resolve time from the declared [`GlslType`] and stored
/// alongside the leaf; see the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKind {
    /// `uniform1i` family (bool, int, samplers).
    ScalarInt,
    /// `uniform1f`.
    ScalarFloat,
    /// `uniform{2,3,4}iv` (bvec/ivec).
    VecInt(u8),
    /// `uniform{2,3,4}fv`.
    VecFloat(u8),
    /// `uniformMatrix{2,3,4}fv`, always untransposed.
    Matrix(u8),
}

impl GlslType {
    /// Parses one entry of the type vocabulary. Returns `None` for anything
    /// outside it, including vec/mat dimensions outside 2..=4.
    pub fn parse(ty: &str) -> Option<Self> {
        match ty {
            "bool" => return Some(GlslType::Bool),
            "int" => return Some(GlslType::Int),
            "float" => return Some(GlslType::Float),
            "sampler2D" => return Some(GlslType::Sampler2D),
            "samplerCube" => return Some(GlslType::SamplerCube),
            _ => {}
        }
        let (ctor, dim): (fn(u8) -> GlslType, &str) = if let Some(d) = ty.strip_prefix("bvec") {
            (GlslType::BVec, d)
        } else if let Some(d) = ty.strip_prefix("ivec") {
            (GlslType::IVec, d)
        } else if let Some(d) = ty.strip_prefix("vec") {
            (GlslType::Vec, d)
        } else if let Some(d) = ty.strip_prefix("mat") {
            (GlslType::Mat, d)
        } else {
            return None;
        };
        match dim {
            "2" => Some(ctor(2)),
            "3" => Some(ctor(3)),
            "4" => Some(ctor(4)),
            _ => None,
        }
    }

    /// The upload family this type dispatches to.
    pub fn kind(&self) -> UniformKind {
        match *self {
            GlslType::Bool | GlslType::Int | GlslType::Sampler2D | GlslType::SamplerCube => {
                UniformKind::ScalarInt
            }
            GlslType::Float => UniformKind::ScalarFloat,
            GlslType::BVec(n) | GlslType::IVec(n) => UniformKind::VecInt(n),
            GlslType::Vec(n) => UniformKind::VecFloat(n),
            GlslType::Mat(n) => UniformKind::Matrix(n),
        }
    }

    /// The value backing a leaf whose location the compiler stripped:
    /// `false` for booleans, zero fill everywhere else.
    pub fn default_value(&self) -> UniformValue {
        match *self {
            GlslType::Bool => UniformValue::Bool(false),
            GlslType::Int | GlslType::Sampler2D | GlslType::SamplerCube => UniformValue::Int(0),
            GlslType::Float => UniformValue::Float(0.0),
            GlslType::BVec(n) => UniformValue::BoolVec(vec![false; n as usize]),
            GlslType::IVec(n) => UniformValue::IntVec(vec![0; n as usize]),
            GlslType::Vec(n) => UniformValue::FloatVec(vec![0.0; n as usize]),
            GlslType::Mat(n) => UniformValue::Matrix(vec![0.0; n as usize * n as usize]),
        }
    }

    /// Component count as seen by vertex-attribute calls (1 for scalars,
    /// N for vectors). Matrices occupy N consecutive attribute slots in GL
    /// but are not valid attribute declarations for this facade.
    pub fn components(&self) -> u8 {
        match *self {
            GlslType::BVec(n) | GlslType::IVec(n) | GlslType::Vec(n) | GlslType::Mat(n) => n,
            _ => 1,
        }
    }
}

impl fmt::Display for GlslType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            GlslType::Bool => write!(f, "bool"),
            GlslType::Int => write!(f, "int"),
            GlslType::Float => write!(f, "float"),
            GlslType::Sampler2D => write!(f, "sampler2D"),
            GlslType::SamplerCube => write!(f, "samplerCube"),
            GlslType::BVec(n) => write!(f, "bvec{n}"),
            GlslType::IVec(n) => write!(f, "ivec{n}"),
            GlslType::Vec(n) => write!(f, "vec{n}"),
            GlslType::Mat(n) => write!(f, "mat{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_vocabulary() {
        let table = [
            ("bool", GlslType::Bool),
            ("int", GlslType::Int),
            ("float", GlslType::Float),
            ("sampler2D", GlslType::Sampler2D),
            ("samplerCube", GlslType::SamplerCube),
            ("bvec2", GlslType::BVec(2)),
            ("bvec3", GlslType::BVec(3)),
            ("bvec4", GlslType::BVec(4)),
            ("ivec2", GlslType::IVec(2)),
            ("ivec3", GlslType::IVec(3)),
            ("ivec4", GlslType::IVec(4)),
            ("vec2", GlslType::Vec(2)),
            ("vec3", GlslType::Vec(3)),
            ("vec4", GlslType::Vec(4)),
            ("mat2", GlslType::Mat(2)),
            ("mat3", GlslType::Mat(3)),
            ("mat4", GlslType::Mat(4)),
        ];
        for (text, expected) in table {
            assert_eq!(GlslType::parse(text), Some(expected), "parsing {text}");
        }
    }

    #[test]
    fn rejects_unknown_and_out_of_range_types() {
        for bad in [
            "double", "vec1", "vec5", "mat1", "mat5", "bvec5", "ivec1", "vec", "mat", "vec3x",
            "sampler3D", "", "Vec3",
        ] {
            assert_eq!(GlslType::parse(bad), None, "should reject {bad:?}");
        }
    }

    #[test]
    fn kinds_follow_the_upload_table() {
        assert_eq!(GlslType::Bool.kind(), UniformKind::ScalarInt);
        assert_eq!(GlslType::Sampler2D.kind(), UniformKind::ScalarInt);
        assert_eq!(GlslType::SamplerCube.kind(), UniformKind::ScalarInt);
        assert_eq!(GlslType::Int.kind(), UniformKind::ScalarInt);
        assert_eq!(GlslType::Float.kind(), UniformKind::ScalarFloat);
        assert_eq!(GlslType::BVec(3).kind(), UniformKind::VecInt(3));
        assert_eq!(GlslType::IVec(2).kind(), UniformKind::VecInt(2));
        assert_eq!(GlslType::Vec(4).kind(), UniformKind::VecFloat(4));
        assert_eq!(GlslType::Mat(3).kind(), UniformKind::Matrix(3));
    }

    #[test]
    fn defaults_are_zero_filled() {
        assert_eq!(GlslType::Bool.default_value(), UniformValue::Bool(false));
        assert_eq!(GlslType::Int.default_value(), UniformValue::Int(0));
        assert_eq!(GlslType::Float.default_value(), UniformValue::Float(0.0));
        assert_eq!(
            GlslType::BVec(3).default_value(),
            UniformValue::BoolVec(vec![false; 3])
        );
        assert_eq!(
            GlslType::Vec(2).default_value(),
            UniformValue::FloatVec(vec![0.0; 2])
        );
        assert_eq!(
            GlslType::Mat(4).default_value(),
            UniformValue::Matrix(vec![0.0; 16])
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for text in ["bool", "float", "ivec3", "vec2", "mat4", "samplerCube"] {
            let ty = GlslType::parse(text).unwrap();
            assert_eq!(ty.to_string(), text);
        }
    }
}
