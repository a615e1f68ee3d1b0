//! Response rendering
//!
//! Prints a payload object one field per line, one tab of indentation per
//! nesting level, translating known numeric codes into labels.
//!
//! ```text
//! 	i_curr_eq: 3 - Boost
//! 	ai_eq_list: array
//! 		0 : Standard
//! 		1 : Bass
//! ```

use std::io::Write;

use serde_json::{Map, Number, Value};

use super::tables::{FieldRole, KindLabels, LabelAssociations, LookupTable};
use crate::error::Result;
use crate::protocol::MessageKind;

/// Renders validated payloads of one message kind
pub struct ResponseRenderer {
    labels: KindLabels,
}

impl ResponseRenderer {
    /// Renderer for `kind`, resolving its label tables once
    pub fn new(kind: MessageKind, associations: &LabelAssociations) -> Self {
        Self {
            labels: associations.for_kind(kind),
        }
    }

    /// Renderer that never substitutes labels
    pub fn plain() -> Self {
        Self {
            labels: KindLabels::default(),
        }
    }

    /// Write every field of `data`, starting one level deep
    pub fn render<W: Write>(&self, data: &Map<String, Value>, out: &mut W) -> Result<()> {
        self.render_object(data, 1, out)
    }

    /// Render into a `String`
    pub fn render_to_string(&self, data: &Map<String, Value>) -> Result<String> {
        let mut out = Vec::new();
        self.render(data, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    fn render_object<W: Write>(
        &self,
        object: &Map<String, Value>,
        depth: usize,
        out: &mut W,
    ) -> Result<()> {
        let indent = indent(depth);

        for (name, value) in object {
            match value {
                Value::Number(n) => {
                    let table = self.labels.table(name, FieldRole::Selector);
                    match label(table, n) {
                        Some(label) => writeln!(out, "{}{}: {} - {}", indent, name, n, label)?,
                        None => writeln!(out, "{}{}: {}", indent, name, n)?,
                    }
                }
                Value::Object(inner) => {
                    writeln!(out, "{}{}: object", indent, name)?;
                    self.render_object(inner, depth + 1, out)?;
                }
                Value::Array(items) => {
                    writeln!(out, "{}{}: array", indent, name)?;
                    let table = self.labels.table(name, FieldRole::List);
                    self.render_array(items, table, depth + 1, out)?;
                }
                scalar => writeln!(out, "{}{}: {}", indent, name, scalar_text(scalar))?,
            }
        }

        Ok(())
    }

    fn render_array<W: Write>(
        &self,
        items: &[Value],
        table: Option<LookupTable>,
        depth: usize,
        out: &mut W,
    ) -> Result<()> {
        let indent = indent(depth);

        for item in items {
            match item {
                Value::Number(n) => {
                    let text = n.to_string();
                    match label(table, n) {
                        Some(label) => writeln!(out, "{}{:<2}: {}", indent, text, label)?,
                        None => writeln!(out, "{}{}", indent, text)?,
                    }
                }
                Value::Object(inner) => {
                    writeln!(out, "{}object", indent)?;
                    self.render_object(inner, depth + 1, out)?;
                }
                Value::Array(nested) => {
                    writeln!(out, "{}array", indent)?;
                    self.render_array(nested, None, depth + 1, out)?;
                }
                scalar => writeln!(out, "{}{}", indent, scalar_text(scalar))?,
            }
        }

        Ok(())
    }
}

fn indent(depth: usize) -> String {
    "\t".repeat(depth)
}

/// Label for a numeric code, only when it is a valid index
fn label(table: Option<LookupTable>, n: &Number) -> Option<&'static str> {
    table.and_then(|t| n.as_u64().and_then(|i| t.get(i)))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
