use crate::core::config::ExportOptions;
use crate::core::datamodel::{AssemblyDiff, DiffType, MemberDiff, TypeDiff};
use crate::core::errors::ApiDiffError;
use regex::Regex;
use std::borrow::Cow;
use std::io::Write;
use std::sync::LazyLock;
use tracing::debug;

static CHANGED_FROM_TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"changed from (.*?) to (.*).").expect("static regex")
});

/// Position of a type in the tree: heading depth and the bullet prefix
/// inherited from enclosing types.
#[derive(Debug, Clone)]
struct Inherit {
    depth: usize,
    pre: String,
}

impl Inherit {
    fn root() -> Self {
        Inherit { depth: 0, pre: String::new() }
    }

    fn heading(&self) -> String {
        format!("{}{}", self.pre, "#".repeat(self.depth + 2))
    }
}

/// Bold the simple name of a namespace-qualified top level type, or the
/// whole name otherwise. Names with whitespace before the last dot are
/// left as they are.
pub fn format_type_name(name: &str, depth: usize) -> String {
    if depth == 0 && name.contains('.') {
        return match name.rsplit_once('.') {
            Some((ns, simple))
                if !ns.is_empty() && !simple.is_empty() && !ns.chars().any(char::is_whitespace) =>
            {
                format!("{}.**{}**", ns, simple)
            }
            _ => name.to_string(),
        };
    }
    format!("**{}**", name)
}

/// Quote both sides of every "changed from X to Y." phrase.
pub fn rewrite_diff_item(text: &str) -> Cow<'_, str> {
    CHANGED_FROM_TO.replace_all(text, "changed from `${1}` to `${2}`.")
}

pub struct MarkdownRenderer<'a> {
    options: &'a ExportOptions,
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(options: &'a ExportOptions) -> Self {
        MarkdownRenderer { options }
    }

    /// Writes the whole report. `title` is the assembly name shown in the header.
    pub fn render<W: Write>(&self, diff: &AssemblyDiff, title: &str, out: &mut W) -> Result<(), ApiDiffError> {
        writeln!(out, "## API Changes: `{}`", title)?;
        writeln!(out)?;

        for ty in &diff.module.types {
            self.write_type(out, ty, &Inherit::root())?;
        }
        Ok(())
    }

    fn write_type<W: Write>(&self, out: &mut W, ty: &TypeDiff, inherit: &Inherit) -> Result<(), ApiDiffError> {
        if self.options.is_excluded(&ty.name) {
            debug!(type_name = %ty.name, "Skipping excluded type");
            return Ok(());
        }

        let type_name = format_type_name(&ty.name, inherit.depth);
        let palette = &self.options.palette;

        match ty.parsed_diff_type()? {
            DiffType::Deleted => writeln!(
                out,
                "{} *<font color={}>[D]</font>* <font color={}>{}</font> is deleted",
                inherit.heading(),
                palette.marker,
                palette.deleted,
                type_name
            )?,
            DiffType::Modified => self.write_members(out, &type_name, ty, inherit)?,
            DiffType::New => writeln!(
                out,
                "{} *<font color={}>[A]</font>* <font color={}>{}</font> is new",
                inherit.heading(),
                palette.marker,
                palette.added,
                type_name
            )?,
        }

        if inherit.depth == 0 {
            writeln!(out, "---")?;
        }
        Ok(())
    }

    fn write_members<W: Write>(
        &self,
        out: &mut W,
        type_name: &str,
        ty: &TypeDiff,
        inherit: &Inherit,
    ) -> Result<(), ApiDiffError> {
        let palette = &self.options.palette;
        writeln!(
            out,
            "{} *<font color={}>[M]</font>* <font color={}>{}</font>",
            inherit.heading(),
            palette.marker,
            palette.modified,
            type_name
        )?;

        let pre = format!("{}- ", inherit.pre);

        for member in &ty.members {
            write_member(out, &pre, member)?;
        }

        let nested = Inherit { depth: inherit.depth + 1, pre };
        for nested_type in &ty.nested_types {
            self.write_type(out, nested_type, &nested)?;
        }
        Ok(())
    }
}

fn write_member<W: Write>(out: &mut W, pre: &str, member: &MemberDiff) -> Result<(), ApiDiffError> {
    let (Some(name), Some(diff_type)) = (member.name.as_deref(), member.diff_type) else {
        return Ok(());
    };
    if name.is_empty() {
        return Ok(());
    }

    let kind = member.kind;
    match (diff_type, member.detail.as_deref()) {
        (DiffType::Deleted, _) => writeln!(out, "{}[{}] `{}` is deleted", pre, kind, name)?,
        (DiffType::Modified, Some(detail)) => {
            writeln!(out, "{}[{}] `{}`", pre, kind, name)?;
            writeln!(out, "{}", rewrite_diff_item(detail))?;
        }
        // A modification the engine could not describe reads as an addition.
        (DiffType::Modified, None) | (DiffType::New, _) => {
            writeln!(out, "{}[{}] `{}` is added", pre, kind, name)?
        }
    }
    Ok(())
}
