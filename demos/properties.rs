//! Defines a small element with two reflected properties and drives it
//! through an in-memory host.
//!
//! Run with `RUST_LOG=debug` to see definition and shadowing diagnostics.

use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;
use x_element_core::{
    format_trace, property, Component, Declaration, ElementHost, ElementRegistry, TypeTag, Value,
};

struct DemoPropertiesElement;

impl Component for DemoPropertiesElement {
    const NAME: &'static str = "DemoPropertiesElement";

    fn properties() -> Declaration {
        Declaration::new()
            .with("reflected", property().ty(TypeTag::String).reflect(true))
            .with("booleanValue", property().ty(TypeTag::Boolean).reflect(true).initial(true))
            .with(
                "summary",
                property().input(&["reflected", "booleanValue"]).compute(|args| {
                    let text = args[0].as_str().unwrap_or("(empty)");
                    let weight = if args[1].is_truthy() { "bold" } else { "normal" };
                    Ok(Value::from(format!("{} in {}", text, weight)))
                }),
            )
    }
}

#[derive(Default)]
struct MemoryHost {
    attributes: BTreeMap<String, String>,
}

impl ElementHost for MemoryHost {
    fn get_attribute(&self, name: &str) -> Option<String> { self.attributes.get(name).cloned() }

    fn set_attribute(&mut self, name: &str, value: &str) {
        println!("  setAttribute({:?}, {:?})", name, value);
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, name: &str) {
        if self.attributes.remove(name).is_some() {
            println!("  removeAttribute({:?})", name);
        }
    }

    fn request_render(&mut self) {
        println!("  render {:?}", self.attributes);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut registry = ElementRegistry::new();
    println!("create <demo-element-properties>");
    let mut element = registry.create::<DemoPropertiesElement, _>(MemoryHost::default())?;

    println!("set reflected = \"cyan\"");
    element.set("reflected", "cyan")?;

    println!("set booleanValue = false");
    element.set("booleanValue", false)?;

    println!("attribute boolean-value added by markup");
    element.attribute_changed("boolean-value", None, Some(""))?;

    for (name, value) in element.values() {
        println!("{} = {}", name, value);
    }
    println!();
    print!("{}", format_trace(&element, "summary"));
    Ok(())
}
