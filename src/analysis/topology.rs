//! The computed-property dependency graph.
//!
//! Layout follows a dense columnar scheme: input lists are stored CSR-style
//! (`inputs_flat` + `input_ranges`) and dependents as per-node linked lists,
//! all keyed by `PropId`. Nothing here points back into the descriptors.

use crate::store::schema::PropertyDescriptor;
use crate::store::types::PropId;
use crate::validation::error::SchemaError;
use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

const NO_EDGE: u32 = u32::MAX;

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    // Inputs (CSR)
    inputs_flat: Vec<PropId>,
    input_ranges: Vec<(u32, u32)>, // (start, count)

    // Dependents (adjacency linked lists, for downstream traversal)
    first_dependent: Vec<u32>,
    dependent_targets: Vec<PropId>,
    next_dependent: Vec<u32>,

    order: Vec<PropId>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    None,
    Visiting, // Used for cycle detection
    Visited,
}

impl DependencyGraph {
    /// Resolves every `input` name, rejects cycles and caches the evaluation order.
    pub fn build(descriptors: &[PropertyDescriptor]) -> Result<Self, SchemaError> {
        let ids: HashMap<&str, PropId> = descriptors.iter().map(|d| (d.name.as_str(), d.id)).collect();

        let mut resolved: Vec<SmallVec<[PropId; 4]>> = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let mut inputs = SmallVec::new();
            for (index, name) in descriptor.input.iter().enumerate() {
                let Some(&id) = ids.get(name.as_str()) else {
                    return Err(SchemaError::UndeclaredInput {
                        path: format!("{}.input[{}]", descriptor.path, index),
                        item: name.clone(),
                    });
                };
                inputs.push(id);
            }
            resolved.push(inputs);
        }

        let mut graph = Self::from_inputs(&resolved);
        if let Some(root) = graph.find_cyclic_root() {
            return Err(SchemaError::CyclicInput { path: descriptors[root.index()].path.clone() });
        }
        graph.order = graph.sort();
        Ok(graph)
    }

    fn from_inputs(resolved: &[SmallVec<[PropId; 4]>]) -> Self {
        let count = resolved.len();
        let mut graph = Self {
            first_dependent: vec![NO_EDGE; count],
            input_ranges: Vec::with_capacity(count),
            ..Self::default()
        };

        for (index, inputs) in resolved.iter().enumerate() {
            let id = PropId::new(index);

            // 1. Inputs (CSR append)
            let start = graph.inputs_flat.len() as u32;
            graph.inputs_flat.extend_from_slice(inputs);
            graph.input_ranges.push((start, inputs.len() as u32));

            // 2. Dependents (linked list prepend on each input)
            for &input in inputs {
                let head = graph.first_dependent[input.index()];
                let new_edge = graph.dependent_targets.len() as u32;
                graph.dependent_targets.push(id);
                graph.next_dependent.push(head);
                graph.first_dependent[input.index()] = new_edge;
            }
        }
        graph
    }

    pub fn len(&self) -> usize { self.input_ranges.len() }

    pub fn is_empty(&self) -> bool { self.input_ranges.is_empty() }

    #[inline(always)]
    pub fn inputs(&self, id: PropId) -> &[PropId] {
        let (start, count) = self.input_ranges[id.index()];
        &self.inputs_flat[start as usize..(start + count) as usize]
    }

    /// Direct dependents of `id`, most recently declared edge first.
    pub fn dependents(&self, id: PropId) -> Dependents<'_> {
        Dependents { graph: self, edge: self.first_dependent[id.index()] }
    }

    /// The cached evaluation order: every property after all of its inputs.
    pub fn order(&self) -> &[PropId] { &self.order }

    /// Three-color depth-first search over roots in declaration order, with an
    /// explicit stack. Returns the root whose traversal revisits a node that is
    /// still being visited.
    ///
    /// Colors persist across roots: a root is only reached once every earlier
    /// root finished without meeting a cycle, so finished nodes cannot lead to one.
    fn find_cyclic_root(&self) -> Option<PropId> {
        let count = self.len();
        let mut state = vec![VisitState::None; count];
        let mut stack: Vec<(PropId, usize)> = Vec::new();

        for root in (0..count).map(PropId::new) {
            if state[root.index()] != VisitState::None {
                continue;
            }
            state[root.index()] = VisitState::Visiting;
            stack.push((root, 0));

            while let Some(top) = stack.last_mut() {
                let (node, cursor) = *top;
                let inputs = self.inputs(node);
                if cursor < inputs.len() {
                    top.1 += 1;
                    let next = inputs[cursor];
                    match state[next.index()] {
                        VisitState::Visiting => return Some(root),
                        VisitState::Visited => {}
                        VisitState::None => {
                            state[next.index()] = VisitState::Visiting;
                            stack.push((next, 0));
                        }
                    }
                } else {
                    state[node.index()] = VisitState::Visited;
                    stack.pop();
                }
            }
        }
        None
    }

    /// Kahn's algorithm with an ordered ready set, so independent properties
    /// keep their declaration order. Assumes the graph is acyclic.
    fn sort(&self) -> Vec<PropId> {
        let count = self.len();
        let mut pending: Vec<u32> = self.input_ranges.iter().map(|&(_, n)| n).collect();
        let mut ready: BTreeSet<PropId> =
            (0..count).map(PropId::new).filter(|id| pending[id.index()] == 0).collect();
        let mut order = Vec::with_capacity(count);

        while let Some(node) = ready.pop_first() {
            order.push(node);
            for dependent in self.dependents(node) {
                let slot = &mut pending[dependent.index()];
                *slot -= 1;
                if *slot == 0 {
                    ready.insert(dependent);
                }
            }
        }
        order
    }

    /// All properties reachable downstream from `start_nodes`, the start nodes included.
    /// Used for incremental invalidation.
    pub fn downstream_from(&self, start_nodes: &[PropId]) -> HashSet<PropId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from(start_nodes.to_vec());

        while let Some(node) = queue.pop_front() {
            if visited.insert(node) {
                queue.extend(self.dependents(node));
            }
        }
        visited
    }
}

/// Iterator over the dependents linked list of one property.
pub struct Dependents<'a> {
    graph: &'a DependencyGraph,
    edge: u32,
}

impl Iterator for Dependents<'_> {
    type Item = PropId;

    fn next(&mut self) -> Option<PropId> {
        if self.edge == NO_EDGE {
            return None;
        }
        let target = self.graph.dependent_targets[self.edge as usize];
        self.edge = self.graph.next_dependent[self.edge as usize];
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::declaration::{property, Declaration};
    use crate::store::schema::PropertySchema;
    use crate::store::types::Value;

    fn computed(inputs: &[&str]) -> crate::store::declaration::PropertyBuilder {
        property().input(inputs).compute(|_| Ok(Value::Undefined))
    }

    fn build(declaration: Declaration) -> Result<PropertySchema, SchemaError> {
        PropertySchema::build("TestElement", &declaration)
    }

    fn names(schema: &PropertySchema) -> Vec<&str> {
        schema.order().iter().map(|&id| schema.descriptor(id).name.as_str()).collect()
    }

    #[test]
    fn test_sort_diamond_dependency() {
        // Shape: a -> b, a -> c, b + c -> d, declared consumer-first.
        let schema = build(
            Declaration::new()
                .with("d", computed(&["b", "c"]))
                .with("b", computed(&["a"]))
                .with("c", computed(&["a"]))
                .with("a", property()),
        )
        .unwrap();

        let order = schema.order();
        let pos = |name: &str| {
            let id = schema.id_of(name).unwrap();
            order.iter().position(|&x| x == id).unwrap()
        };
        assert!(pos("a") < pos("b"));
        assert!(pos("a") < pos("c"));
        assert!(pos("b") < pos("d"));
        assert!(pos("c") < pos("d"));
        assert_eq!(order.len(), 4);
    }

    #[test]
    fn test_ties_follow_declaration_order() {
        let schema = build(
            Declaration::new()
                .with("total", computed(&["price", "tax"]))
                .with("price", property())
                .with("label", property())
                .with("tax", property()),
        )
        .unwrap();
        assert_eq!(names(&schema), vec!["price", "label", "tax", "total"]);
    }

    #[test]
    fn test_cycle_simple() {
        let err = build(Declaration::new().with("simpleCycle", computed(&["simpleCycle"]))).unwrap_err();
        assert_eq!(err.to_string(), "TestElement.properties.simpleCycle.input is cyclic.");
    }

    #[test]
    fn test_cycle_reports_first_declared_root() {
        let err = build(
            Declaration::new()
                .with("a", computed(&["c"]))
                .with("b", computed(&["a"]))
                .with("c", computed(&["b"])),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "TestElement.properties.a.input is cyclic.");
    }

    #[test]
    fn test_cycle_found_past_acyclic_prefix() {
        let err = build(
            Declaration::new()
                .with("plain", property())
                .with("fine", computed(&["plain"]))
                .with("ping", computed(&["pong"]))
                .with("pong", computed(&["ping", "fine"])),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "TestElement.properties.ping.input is cyclic.");
    }

    #[test]
    fn test_cycle_reported_at_first_root_that_reaches_it() {
        // `entry` is not on the cycle itself, but its traversal is the first to hit it.
        let err = build(
            Declaration::new()
                .with("entry", computed(&["left"]))
                .with("left", computed(&["right"]))
                .with("right", computed(&["left"])),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "TestElement.properties.entry.input is cyclic.");
    }

    #[test]
    fn test_undeclared_input() {
        let err = build(
            Declaration::new()
                .with("foo", property())
                .with("badInput", computed(&["foo", "bar"])),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "TestElement.properties.badInput.input[1] has an unexpected item (\"bar\" has not been declared)."
        );
    }

    #[test]
    fn test_downstream_is_transitive() {
        let schema = build(
            Declaration::new()
                .with("first", property())
                .with("last", property())
                .with("full", computed(&["first", "last"]))
                .with("greeting", computed(&["full"]))
                .with("initials", computed(&["last"])),
        )
        .unwrap();
        let id = |name: &str| schema.id_of(name).unwrap();

        let downstream = schema.graph().downstream_from(&[id("first")]);
        let expected: HashSet<PropId> = [id("first"), id("full"), id("greeting")].into_iter().collect();
        assert_eq!(downstream, expected);
        assert_eq!(schema.graph().inputs(id("full")), &[id("first"), id("last")]);
    }

    #[test]
    fn test_duplicate_inputs_keep_order_valid() {
        let schema = build(
            Declaration::new()
                .with("twice", computed(&["base", "base"]))
                .with("base", property()),
        )
        .unwrap();
        assert_eq!(names(&schema), vec!["base", "twice"]);
    }
}
