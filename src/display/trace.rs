use crate::compute::{ElementHost, ElementInstance, Ledger};
use crate::store::schema::{Access, PropertySchema};
use crate::store::types::PropId;
use std::collections::HashMap;
use std::fmt::Write;

/// Renders the input tree of one property with current values.
///
/// Each line is tagged with its depth (`[L2]`); a property reached a second
/// time is printed as a reference to the level it was first expanded at.
pub fn format_trace<H: ElementHost>(instance: &ElementInstance<H>, name: &str) -> String {
    let schema = instance.schema().properties();
    let mut tracer = Tracer {
        schema,
        ledger: instance.ledger(),
        visited_at_level: HashMap::new(),
        output: String::new(),
    };

    match schema.id_of(name) {
        Some(target) => {
            let _ = writeln!(tracer.output, "DEPENDENCY TRACE for property '{}.{}':", schema.class_name(), name);
            let _ = writeln!(tracer.output, "--------------------------------------------------");
            tracer.trace_node(target, 1, "");
        }
        None => {
            let _ = writeln!(tracer.output, "Error: Unknown property '{}'", name);
        }
    }
    tracer.output
}

struct Tracer<'a> {
    schema: &'a PropertySchema,
    ledger: &'a Ledger,
    visited_at_level: HashMap<PropId, usize>,
    output: String,
}

impl Tracer<'_> {
    fn trace_node(&mut self, id: PropId, level: usize, prefix: &str) {
        let schema = self.schema;
        let descriptor = schema.descriptor(id);
        if let Some(&first_seen) = self.visited_at_level.get(&id) {
            let _ = writeln!(self.output, "{}{} -> (Ref to L{})", prefix, descriptor.name, first_seen);
            return;
        }
        self.visited_at_level.insert(id, level);

        let line_header = format!("[L{}] {}[{}]", level, descriptor.name, self.ledger.value(id));
        let inputs = schema.graph().inputs(id);

        if descriptor.is_computed() {
            let names: Vec<&str> = inputs.iter().map(|&i| schema.descriptor(i).name.as_str()).collect();
            let _ = writeln!(self.output, "{}{} = compute({})", prefix, line_header, names.join(", "));
            self.recurse_children(prefix, inputs, level);
            return;
        }

        let source = match descriptor.access() {
            Access::ReadOnly => "ReadOnly",
            Access::Internal => "Internal",
            _ => "Input",
        };
        match (&descriptor.attribute, descriptor.reflect) {
            (Some(attribute), true) => {
                let _ = writeln!(self.output, "{}{} -> {} <=> @{}", prefix, line_header, source, attribute);
            }
            (Some(attribute), false) => {
                let _ = writeln!(self.output, "{}{} -> {} <- @{}", prefix, line_header, source, attribute);
            }
            (None, _) => {
                let _ = writeln!(self.output, "{}{} -> {}", prefix, line_header, source);
            }
        }
    }

    fn recurse_children(&mut self, prefix: &str, children: &[PropId], level: usize) {
        let stem = build_child_stem(prefix);
        for (i, &child) in children.iter().enumerate() {
            let connector = if i == children.len() - 1 { "`--" } else { "|--" };
            let full_prefix = format!("{}{}", stem, connector);
            self.trace_node(child, level + 1, &full_prefix);
        }
    }
}

fn build_child_stem(current_prefix: &str) -> String {
    current_prefix.replace("`--", "   ").replace("|--", "|  ")
}
