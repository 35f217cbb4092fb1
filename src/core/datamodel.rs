use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::errors::ApiDiffError;

/// Change kind reported by the comparison engine for a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DiffType {
    Deleted,
    Modified,
    New,
}

impl FromStr for DiffType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Deleted" => Ok(DiffType::Deleted),
            "Modified" => Ok(DiffType::Modified),
            "New" => Ok(DiffType::New),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiffType::Deleted => "Deleted",
            DiffType::Modified => "Modified",
            DiffType::New => "New",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssemblyDiff {
    pub name: Option<String>,
    pub diff_type: Option<DiffType>,
    pub module: ModuleDiff,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ModuleDiff {
    pub name: Option<String>,
    pub types: Vec<TypeDiff>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TypeDiff {
    pub name: String,
    /// Attribute text as found in the document. Validated when rendered.
    pub diff_type: String,
    /// Methods, then properties, then fields.
    pub members: Vec<MemberDiff>,
    pub nested_types: Vec<TypeDiff>,
}

impl TypeDiff {
    pub fn new(name: &str, diff_type: &str) -> Self {
        TypeDiff {
            name: name.to_string(),
            diff_type: diff_type.to_string(),
            members: Vec::new(),
            nested_types: Vec::new(),
        }
    }

    pub fn parsed_diff_type(&self) -> Result<DiffType, ApiDiffError> {
        self.diff_type
            .parse()
            .map_err(|value| ApiDiffError::UnknownDiffType {
                type_name: self.name.clone(),
                value,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum MemberKind {
    Method,
    Property,
    Field,
}

impl MemberKind {
    /// Member groups in the order they are listed under a type.
    pub const ORDER: [MemberKind; 3] = [MemberKind::Method, MemberKind::Property, MemberKind::Field];

    pub fn element_name(&self) -> &'static str {
        match self {
            MemberKind::Method => "Method",
            MemberKind::Property => "Property",
            MemberKind::Field => "Field",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MemberDiff {
    pub kind: MemberKind,
    pub name: Option<String>,
    pub diff_type: Option<DiffType>,
    /// Text of the first `DiffItem` below the member, if any.
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_type_is_case_sensitive() {
        assert_eq!("Modified".parse::<DiffType>(), Ok(DiffType::Modified));
        assert!("modified".parse::<DiffType>().is_err());
        assert!("".parse::<DiffType>().is_err());
    }

    #[test]
    fn test_unknown_type_diff_type() {
        let ty = TypeDiff::new("Game.Player", "Renamed");
        match ty.parsed_diff_type() {
            Err(ApiDiffError::UnknownDiffType { type_name, value }) => {
                assert_eq!(type_name, "Game.Player");
                assert_eq!(value, "Renamed");
            }
            other => panic!("Expected UnknownDiffType, got {:?}", other),
        }
    }
}
