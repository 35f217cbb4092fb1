use crate::core::datamodel::{AssemblyDiff, MemberDiff, MemberKind, ModuleDiff, TypeDiff};
use crate::core::errors::ApiDiffError;
use crate::core::xml::{XmlElement, parse_document};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::warn;

pub fn load_diff_file(path: &Path) -> Result<AssemblyDiff> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read diff document {:?}", path))?;
    let diff = load_diff(&content).with_context(|| format!("Invalid diff document {:?}", path))?;
    Ok(diff)
}

pub fn load_diff(xml: &str) -> Result<AssemblyDiff, ApiDiffError> {
    let root = parse_document(xml)?;
    if root.name != "Assembly" {
        return Err(ApiDiffError::MissingElement {
            parent: "document".to_string(),
            element: "Assembly".to_string(),
        });
    }

    // Only the first module is reported; the engine emits one per assembly.
    let module_element = root.child("Module").ok_or_else(|| ApiDiffError::MissingElement {
        parent: "Assembly".to_string(),
        element: "Module".to_string(),
    })?;

    let module = ModuleDiff {
        name: module_element.attribute("Name").map(str::to_string),
        types: load_types(module_element)?,
    };

    Ok(AssemblyDiff {
        name: root.attribute("Name").map(str::to_string),
        diff_type: root.attribute("DiffType").and_then(|v| v.parse().ok()),
        module,
    })
}

fn load_types(parent: &XmlElement) -> Result<Vec<TypeDiff>, ApiDiffError> {
    parent.children_named("Type").map(load_type).collect()
}

fn load_type(element: &XmlElement) -> Result<TypeDiff, ApiDiffError> {
    let name = element
        .attribute("Name")
        .ok_or_else(|| missing_attribute("Type", "Name"))?;
    let diff_type = element
        .attribute("DiffType")
        .ok_or_else(|| missing_attribute("Type", "DiffType"))?;

    let mut ty = TypeDiff::new(name, diff_type);

    for kind in MemberKind::ORDER {
        for member in element.children_named(kind.element_name()) {
            ty.members.push(load_member(kind, member));
        }
    }

    ty.nested_types = load_types(element)?;
    Ok(ty)
}

fn load_member(kind: MemberKind, element: &XmlElement) -> MemberDiff {
    let name = element.attribute("Name").map(str::to_string);
    let raw = element.attribute("DiffType");
    let diff_type = raw.and_then(|v| v.parse().ok());

    if let (Some(value), None) = (raw, diff_type) {
        warn!(member = ?name, value, "Unrecognized member diff type");
    }

    MemberDiff {
        kind,
        name,
        diff_type,
        detail: element.first_descendant("DiffItem").map(XmlElement::text_content),
    }
}

fn missing_attribute(element: &str, attribute: &str) -> ApiDiffError {
    ApiDiffError::MissingAttribute {
        element: element.to_string(),
        attribute: attribute.to_string(),
    }
}
