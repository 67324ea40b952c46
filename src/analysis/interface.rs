//! Describes the surface a component inherits before it declares anything.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterfaceError {
    #[error("Invalid inherited interface description: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Names and attributes already meaningful on a component's prototype chain.
///
/// Supplied by the host platform. [`InheritedInterface::standard`] describes
/// the framework base class on top of a standard HTML element; hosts with a
/// different element model load their own description with
/// [`InheritedInterface::from_json`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InheritedInterface {
    /// Name of the framework base class, used in diagnostics.
    pub base: String,
    /// The base class's own prototype. Shadowing these is fatal.
    pub reserved: HashSet<String>,
    /// Properties of the native prototype chain.
    pub properties: HashSet<String>,
    /// Attributes the native element already gives meaning to.
    pub attributes: HashSet<String>,
    /// Attribute to property relations that are not a plain case/hyphen match
    /// (`class` reflects through `className`).
    pub aliases: HashMap<String, String>,
    /// Attributes present on a freshly created base element.
    pub default_attributes: HashSet<String>,

    // Folded property name -> property name. Not serialized, rebuilt on load.
    #[serde(skip)]
    related_index: HashMap<String, String>,
}

const XELEMENT_PROTOTYPE: &[&str] = &[
    "internal",
    "render",
    "listen",
    "unlisten",
    "connectedCallback",
    "disconnectedCallback",
    "attributeChangedCallback",
    "adoptedCallback",
];

const ELEMENT_PROPERTIES: &[&str] = &[
    // HTMLElement
    "title", "lang", "translate", "dir", "hidden", "inert", "accessKey", "accessKeyLabel",
    "draggable", "spellcheck", "autocapitalize", "innerText", "outerText", "popover",
    "offsetParent", "offsetTop", "offsetLeft", "offsetWidth", "offsetHeight", "style",
    "tabIndex", "autofocus", "nonce", "dataset", "contentEditable", "enterKeyHint",
    "isContentEditable", "inputMode", "click", "focus", "blur", "attachInternals",
    // Element
    "namespaceURI", "prefix", "localName", "tagName", "id", "className", "classList", "slot",
    "attributes", "shadowRoot", "part", "scrollTop", "scrollLeft", "scrollWidth",
    "scrollHeight", "clientTop", "clientLeft", "clientWidth", "clientHeight", "innerHTML",
    "outerHTML", "children", "firstElementChild", "lastElementChild", "childElementCount",
    "previousElementSibling", "nextElementSibling", "getAttribute", "setAttribute",
    "removeAttribute", "hasAttribute", "toggleAttribute", "attachShadow", "closest",
    "matches", "querySelector", "querySelectorAll", "append", "prepend", "remove",
    "replaceWith", "before", "after",
    // ARIA reflection
    "ariaAtomic", "ariaAutoComplete", "ariaBusy", "ariaChecked", "ariaColCount",
    "ariaColIndex", "ariaColSpan", "ariaCurrent", "ariaDescription", "ariaDisabled",
    "ariaExpanded", "ariaHasPopup", "ariaHidden", "ariaKeyShortcuts", "ariaLabel",
    "ariaLevel", "ariaLive", "ariaModal", "ariaMultiLine", "ariaMultiSelectable",
    "ariaOrientation", "ariaPlaceholder", "ariaPosInSet", "ariaPressed", "ariaReadOnly",
    "ariaRequired", "ariaRoleDescription", "ariaRowCount", "ariaRowIndex", "ariaRowSpan",
    "ariaSelected", "ariaSetSize", "ariaSort", "ariaValueMax", "ariaValueMin",
    "ariaValueNow", "ariaValueText",
    // Node / EventTarget
    "nodeType", "nodeName", "baseURI", "isConnected", "ownerDocument", "parentNode",
    "parentElement", "childNodes", "firstChild", "lastChild", "previousSibling",
    "nextSibling", "nodeValue", "textContent", "cloneNode", "contains", "addEventListener",
    "removeEventListener", "dispatchEvent",
];

const GLOBAL_ATTRIBUTES: &[&str] = &[
    "accesskey", "autocapitalize", "autofocus", "class", "contenteditable", "dir", "draggable",
    "enterkeyhint", "hidden", "id", "inert", "inputmode", "is", "itemid", "itemprop", "itemref",
    "itemscope", "itemtype", "lang", "nonce", "part", "popover", "role", "slot", "spellcheck",
    "style", "tabindex", "title", "translate",
];

const ATTRIBUTE_ALIASES: &[(&str, &str)] = &[("class", "className"), ("for", "htmlFor")];

fn fold(name: &str) -> String {
    name.chars().filter(|c| *c != '-').flat_map(char::to_lowercase).collect()
}

fn to_set(names: &[&str]) -> HashSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

impl InheritedInterface {
    /// An empty interface for the given base class name.
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into(), ..Self::default() }
    }

    /// The framework base class on top of a standard HTML element.
    pub fn standard() -> Self {
        let mut interface = Self {
            base: "XElement".to_string(),
            reserved: to_set(XELEMENT_PROTOTYPE),
            properties: to_set(ELEMENT_PROPERTIES),
            attributes: to_set(GLOBAL_ATTRIBUTES),
            aliases: ATTRIBUTE_ALIASES.iter().map(|(a, p)| (a.to_string(), p.to_string())).collect(),
            default_attributes: HashSet::new(),
            related_index: HashMap::new(),
        };
        interface.rebuild_related_index();
        interface
    }

    pub fn from_json(json: &str) -> Result<Self, InterfaceError> {
        let mut interface: Self = serde_json::from_str(json)?;
        if interface.base.is_empty() {
            interface.base = "XElement".to_string();
        }
        interface.rebuild_related_index();
        Ok(interface)
    }

    /// Rebuilds the case/hyphen-insensitive property lookup after `properties` changed.
    pub fn rebuild_related_index(&mut self) {
        self.related_index = self.properties.iter().map(|p| (fold(p), p.clone())).collect();
    }

    pub fn with_reserved(mut self, name: &str) -> Self {
        self.reserved.insert(name.to_string());
        self
    }

    pub fn with_property(mut self, name: &str) -> Self {
        self.properties.insert(name.to_string());
        self.related_index.insert(fold(name), name.to_string());
        self
    }

    pub fn with_attribute(mut self, name: &str) -> Self {
        self.attributes.insert(name.to_string());
        self
    }

    pub fn with_alias(mut self, attribute: &str, property: &str) -> Self {
        self.aliases.insert(attribute.to_string(), property.to_string());
        self
    }

    pub fn with_default_attribute(mut self, name: &str) -> Self {
        self.default_attributes.insert(name.to_string());
        self
    }

    pub fn is_reserved(&self, name: &str) -> bool { self.reserved.contains(name) }

    pub fn has_property(&self, name: &str) -> bool { self.properties.contains(name) }

    pub fn has_attribute(&self, attribute: &str) -> bool { self.attributes.contains(attribute) }

    pub fn is_default_attribute(&self, attribute: &str) -> bool {
        self.default_attributes.contains(attribute)
    }

    /// The inherited property an attribute corresponds to, matching through
    /// aliases first, then ignoring case and hyphens.
    pub fn related_property(&self, attribute: &str) -> Option<&str> {
        if let Some(property) = self.aliases.get(attribute) {
            return Some(property);
        }
        self.related_index.get(&fold(attribute)).map(String::as_str)
    }
}
