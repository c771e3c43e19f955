use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A comparable primitive type carried by a scalar member or used as a map key.
///
/// Scalar types are written the way they appear in Rust source (`u32`,
/// `String`, ...). Any other path is accepted as [`ScalarType::Named`], a
/// user-defined type that is assumed to be comparable by value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScalarType {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    /// A user-defined comparable type, by path.
    Named(std::string::String),
}

impl ScalarType {
    /// The Rust spelling of this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "String",
            Self::Named(path) => path,
        }
    }

    /// Classify a type as spelled in Rust source, e.g. by `stringify!`.
    ///
    /// Uses the same rule as [`FromStr`]: whitespace is normalized, known
    /// primitives map to their variant and every other spelling (paths,
    /// generic types, tuples, arrays) is kept as [`ScalarType::Named`]. An
    /// empty spelling becomes an empty `Named`, which validation rejects.
    pub fn from_rust_type(spelling: &str) -> Self {
        spelling
            .parse()
            .unwrap_or_else(|_| Self::Named(normalize(spelling)))
    }

    /// Returns `true` if values of this type can key a map.
    ///
    /// Floating point types have no total equality and are rejected as keys.
    pub fn is_hashable(&self) -> bool {
        !matches!(self, Self::F32 | Self::F64)
    }

    /// Returns `true` for the built-in primitive types.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Self::Named(_))
    }
}

impl FromStr for ScalarType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spelling = normalize(s);
        let ty = match spelling.as_str() {
            "bool" => Self::Bool,
            "char" => Self::Char,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "isize" => Self::Isize,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "usize" => Self::Usize,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "String" | "std::string::String" => Self::String,
            "" => return Err(SchemaError::InvalidScalarType(s.to_string())),
            _ => Self::Named(spelling),
        };
        Ok(ty)
    }
}

/// Collapse whitespace in a type spelling.
///
/// A single space is kept only between two word characters (`dyn Fn`,
/// `&'a str`), so `std :: string :: String` and `std::string::String` agree.
fn normalize(spelling: &str) -> std::string::String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_' || c == '\'';
    let mut out = std::string::String::with_capacity(spelling.len());
    for token in spelling.split_whitespace() {
        let joins_words = out.chars().next_back().is_some_and(is_word)
            && token.chars().next().is_some_and(is_word);
        if joins_words {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

impl TryFrom<std::string::String> for ScalarType {
    type Error = SchemaError;

    fn try_from(value: std::string::String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScalarType> for std::string::String {
    fn from(ty: ScalarType) -> Self {
        ty.as_str().to_string()
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_primitives() {
        assert_eq!("u32".parse::<ScalarType>().unwrap(), ScalarType::U32);
        assert_eq!("String".parse::<ScalarType>().unwrap(), ScalarType::String);
        assert_eq!(
            "std::string::String".parse::<ScalarType>().unwrap(),
            ScalarType::String
        );
        assert_eq!("f64".parse::<ScalarType>().unwrap(), ScalarType::F64);
    }

    #[test]
    fn parses_named_paths() {
        let ty: ScalarType = "crate::ids::UserId".parse().unwrap();
        assert_eq!(ty, ScalarType::Named("crate::ids::UserId".into()));
        assert!(!ty.is_primitive());
        assert!(ty.is_hashable());
    }

    #[test]
    fn rejects_empty_spellings() {
        assert!("".parse::<ScalarType>().is_err());
        assert!("  \t ".parse::<ScalarType>().is_err());
    }

    #[test]
    fn generic_spellings_are_named() {
        assert_eq!(
            "Vec < u8 >".parse::<ScalarType>().unwrap(),
            ScalarType::Named("Vec<u8>".into())
        );
        assert_eq!(
            "[u8 ; 4]".parse::<ScalarType>().unwrap(),
            ScalarType::Named("[u8;4]".into())
        );
        assert_eq!(
            "Box < dyn  Fn ( u8 ) >".parse::<ScalarType>().unwrap(),
            ScalarType::Named("Box<dyn Fn(u8)>".into())
        );
    }

    #[test]
    fn rust_spelling_and_parse_agree() {
        for spelling in ["u32", "Vec<u8>", "Option < u8 >", "(u8, String)", "&'static str"] {
            let parsed: ScalarType = spelling.parse().unwrap();
            assert_eq!(ScalarType::from_rust_type(spelling), parsed);
            assert_eq!(parsed.to_string().parse::<ScalarType>().unwrap(), parsed);
        }
    }

    #[test]
    fn rust_spellings() {
        assert_eq!(
            ScalarType::from_rust_type("std :: string :: String"),
            ScalarType::String
        );
        assert_eq!(ScalarType::from_rust_type("u8"), ScalarType::U8);
        assert_eq!(
            ScalarType::from_rust_type("Option < u8 >"),
            ScalarType::Named("Option<u8>".into())
        );
    }

    #[test]
    fn floats_are_not_hashable() {
        assert!(!ScalarType::F32.is_hashable());
        assert!(!ScalarType::F64.is_hashable());
        assert!(ScalarType::I64.is_hashable());
    }

    #[test]
    fn display_matches_rust_spelling() {
        assert_eq!(ScalarType::Usize.to_string(), "usize");
        assert_eq!(ScalarType::Named("Color".into()).to_string(), "Color");
    }

    #[test]
    fn serde_as_string() {
        let json = serde_json::to_string(&ScalarType::I16).unwrap();
        assert_eq!(json, "\"i16\"");
        let parsed: ScalarType = serde_json::from_str("\"bool\"").unwrap();
        assert_eq!(parsed, ScalarType::Bool);
        assert!(serde_json::from_str::<ScalarType>("\"\"").is_err());
        let named: ScalarType = serde_json::from_str("\"Vec<u8>\"").unwrap();
        assert_eq!(named, ScalarType::Named("Vec<u8>".into()));
    }
}
