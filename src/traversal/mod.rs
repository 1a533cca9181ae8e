//! The backward graph walker.
//!
//! Given a starting node and a logical parameter, the resolver applies the
//! registry rules recursively upstream until a concrete value is found (or a
//! list of values accumulated). Every failure mode of the untrusted graph —
//! unknown node types, dangling links, cycles, muted branches, incompatible
//! port types — degrades to "parameter absent on this path" and is logged,
//! never raised.

mod terminal;

pub use terminal::select_terminal;

use crate::graph::{GraphNode, InputValue, Link, WorkflowGraph};
use crate::params::{LogicalParam, ParamValue};
use crate::registry::{NodeDefinition, ParamRule, Registry, Role, RoutingRule};
use ahash::AHashSet;
use tracing::{debug, warn};

/// Hard bound on pass-through chain depth. Reroute chains beyond this are
/// treated as dead ends instead of exhausting the call stack.
const MAX_DEPTH: usize = 512;

/// Per-call traversal state: the target parameter, its expected port type,
/// the visited-link cycle guard, and the multi-value accumulator. Scoped to
/// one `resolve` call and never shared.
pub struct TraversalState {
    pub param: LogicalParam,
    pub depth: usize,
    visited: AHashSet<Link>,
    found: Vec<String>,
}

impl TraversalState {
    fn new(param: LogicalParam) -> Self {
        Self {
            param,
            depth: 0,
            visited: AHashSet::new(),
            found: Vec::new(),
        }
    }

    /// Marks a link visited; `false` means it was already seen and this
    /// branch must dead-end.
    fn visit(&mut self, link: &Link) -> bool {
        self.visited.insert(link.clone())
    }

    /// Appends to the multi-value accumulator, keeping it duplicate-free.
    pub fn push_found(&mut self, value: String) {
        if !self.found.contains(&value) {
            self.found.push(value);
        }
    }
}

/// Resolves logical parameters against one immutable graph. Holds no mutable
/// state of its own; independent graphs resolve in parallel trivially.
pub struct Resolver<'g> {
    graph: &'g WorkflowGraph,
    registry: &'g Registry,
}

impl<'g> Resolver<'g> {
    pub fn new(graph: &'g WorkflowGraph, registry: &'g Registry) -> Self {
        Self { graph, registry }
    }

    /// Resolves one parameter starting from `start`, or `None` when no path
    /// yields a value.
    pub fn resolve(&self, start: &str, param: LogicalParam) -> Option<ParamValue> {
        let mut state = TraversalState::new(param);
        let single = self.resolve_at(start, &mut state);

        if param.is_multi_valued() {
            if state.found.is_empty() {
                return None;
            }
            // Values were appended nearest-terminal first; report them in
            // upstream-to-downstream (application) order.
            let mut values = state.found;
            values.reverse();
            Some(ParamValue::List(values))
        } else {
            single
        }
    }

    /// One independent resolve per requested parameter.
    pub fn resolve_all(
        &self,
        start: &str,
        params: &[LogicalParam],
    ) -> Vec<(LogicalParam, Option<ParamValue>)> {
        params
            .iter()
            .map(|&param| (param, self.resolve(start, param)))
            .collect()
    }

    pub(crate) fn definition(&self, node: &GraphNode) -> Option<&'static NodeDefinition> {
        self.registry.get(&node.class_type)
    }

    fn resolve_at(&self, node_id: &str, state: &mut TraversalState) -> Option<ParamValue> {
        state.depth += 1;
        let result = self.resolve_inner(node_id, state);
        state.depth -= 1;
        result
    }

    fn resolve_inner(&self, node_id: &str, state: &mut TraversalState) -> Option<ParamValue> {
        if state.depth > MAX_DEPTH {
            warn!(
                node = node_id,
                param = %state.param,
                depth = state.depth,
                "traversal depth bound hit, treating as dead end"
            );
            return None;
        }

        // A link to a missing node is a dead end, not an error.
        let node = match self.graph.get(node_id) {
            Some(node) => node,
            None => {
                debug!(node = node_id, param = %state.param, "link references missing node");
                return None;
            }
        };

        if !node.mode.is_active() {
            debug!(node = node_id, param = %state.param, "node muted or bypassed");
            return None;
        }

        let def = match self.definition(node) {
            Some(def) => def,
            None => {
                warn!(
                    node = node_id,
                    class = %node.class_type,
                    param = %state.param,
                    depth = state.depth,
                    "unregistered node type"
                );
                return None;
            }
        };

        let mut rule_handled = false;
        if let Some(rule) = def.rule_for(state.param) {
            rule_handled = true;
            let value = self.apply_rule(rule, node, def, state);
            if state.param.is_multi_valued() {
                if let Some(value) = value {
                    self.accumulate(value, state);
                }
                // Multi-valued searches keep walking: further contributing
                // nodes may sit upstream on the same chain.
            } else if value.is_some() {
                return value;
            }
        }

        if def.has_role(Role::Routing) {
            // Routing is exclusive: one selected branch, no speculative
            // exploration of the others.
            return match def.routing {
                Some(rule) => self.follow_routing(node, rule, state),
                None => None,
            };
        }

        // Static forwarding applies unconditionally; the type-guided guess
        // over declared inputs only when no rule claimed the parameter. A
        // node that knows exactly where a value comes from must not drift
        // into sibling ports when that path dead-ends.
        if def.has_role(Role::PassThrough) || (def.has_role(Role::Transform) && !rule_handled) {
            return self.follow_inputs(node, def, state);
        }

        None
    }

    fn apply_rule(
        &self,
        rule: &ParamRule,
        node: &GraphNode,
        def: &NodeDefinition,
        state: &mut TraversalState,
    ) -> Option<ParamValue> {
        match rule {
            ParamRule::Widget(name) => self.field_value(node, name, state),
            ParamRule::Input(name) | ParamRule::Trace(name) => match node.input(name) {
                Some(InputValue::Literal(value)) => ParamValue::from_json(value),
                Some(InputValue::Link(link)) => self.follow_link(link, state),
                None => None,
            },
            ParamRule::Custom(extractor) => {
                debug!(
                    node = %node.id,
                    extractor = extractor.name,
                    param = %state.param,
                    "running custom extractor"
                );
                (extractor.run)(self, node, state)
            }
        }
    }

    /// Reads a named field the way the two serializations store it: the
    /// input map first (literal or link), then the widget array position
    /// declared by the node's widget ordering.
    pub(crate) fn field_value(
        &self,
        node: &GraphNode,
        name: &str,
        state: &mut TraversalState,
    ) -> Option<ParamValue> {
        match node.input(name) {
            Some(InputValue::Literal(value)) => ParamValue::from_json(value),
            Some(InputValue::Link(link)) => self.follow_link(link, state),
            None => self
                .definition(node)
                .and_then(|def| def.widget_index(name))
                .and_then(|index| node.widget(index))
                .and_then(ParamValue::from_json),
        }
    }

    /// Follows a named input upstream if it is a link; used by extractors
    /// that chain variable-length substructures.
    pub(crate) fn trace_named(
        &self,
        node: &GraphNode,
        name: &str,
        state: &mut TraversalState,
    ) -> Option<ParamValue> {
        match node.input(name) {
            Some(InputValue::Link(link)) => self.follow_link(link, state),
            _ => None,
        }
    }

    fn follow_link(&self, link: &Link, state: &mut TraversalState) -> Option<ParamValue> {
        if !state.visit(link) {
            debug!(
                node = %link.node,
                slot = link.slot,
                param = %state.param,
                "link already visited, dead-ending branch"
            );
            return None;
        }
        self.resolve_at(&link.node, state)
    }

    fn accumulate(&self, value: ParamValue, state: &mut TraversalState) {
        match value {
            ParamValue::Text(text) => {
                if !text.is_empty() {
                    state.push_found(text);
                }
            }
            ParamValue::List(items) => {
                for item in items {
                    state.push_found(item);
                }
            }
            ParamValue::Number(_) => {}
        }
    }

    /// Resolves the control value, builds the dynamic input name, and
    /// continues through exactly that branch.
    fn follow_routing(
        &self,
        node: &GraphNode,
        rule: RoutingRule,
        state: &mut TraversalState,
    ) -> Option<ParamValue> {
        let control = self.control_value(node, rule.control, state)?;
        let selected = format!("{}{}", rule.prefix, control);
        debug!(node = %node.id, input = %selected, "routing through selected branch");

        match node.input(&selected) {
            Some(InputValue::Link(link)) => self.follow_link(link, state),
            Some(InputValue::Literal(value)) => ParamValue::from_json(value),
            None => {
                debug!(node = %node.id, input = %selected, "selected routing branch missing");
                None
            }
        }
    }

    /// The control may be a literal input, a widget, or a link to a value
    /// primitive upstream.
    fn control_value(
        &self,
        node: &GraphNode,
        control: &str,
        state: &mut TraversalState,
    ) -> Option<String> {
        let raw = match node.input(control) {
            Some(InputValue::Literal(value)) => ParamValue::from_json(value),
            Some(InputValue::Link(link)) => {
                if !state.visit(link) {
                    return None;
                }
                self.scalar_at(&link.node)
            }
            None => self
                .definition(node)
                .and_then(|def| def.widget_index(control))
                .and_then(|index| node.widget(index))
                .and_then(ParamValue::from_json),
        }?;

        match raw {
            ParamValue::Number(n) => Some(format!("{}", n as i64)),
            ParamValue::Text(text) => {
                let text = text.trim().to_string();
                (!text.is_empty()).then_some(text)
            }
            ParamValue::List(_) => None,
        }
    }

    /// Reads the bare value a primitive-style node produces, for control
    /// resolution only.
    fn scalar_at(&self, node_id: &str) -> Option<ParamValue> {
        let node = self.graph.get(node_id)?;
        let index = self
            .definition(node)
            .and_then(|def| def.widget_index("value"))
            .unwrap_or(0);
        node.widget(index).and_then(ParamValue::from_json)
    }

    /// Pass-through / transform continuation: static forwarding rules are
    /// followed unconditionally in priority order; otherwise declared inputs
    /// are filtered by port-type compatibility with the parameter's expected
    /// type. Literal (non-link) inputs and already-visited links are skipped.
    fn follow_inputs(
        &self,
        node: &GraphNode,
        def: &NodeDefinition,
        state: &mut TraversalState,
    ) -> Option<ParamValue> {
        let expected = state.param.expected_port();

        let candidates: Vec<String> = if !def.pass_through.is_empty() {
            def.pass_through.iter().map(|s| s.to_string()).collect()
        } else if def.has_role(Role::PassThrough) {
            // A pass-through node with no static rule (a reroute) forwards
            // whatever single link it carries; sorted for determinism.
            let mut names: Vec<String> = node
                .inputs
                .iter()
                .filter(|(_, value)| value.as_link().is_some())
                .map(|(name, _)| name.clone())
                .collect();
            names.sort();
            names
        } else {
            def.inputs
                .iter()
                .filter(|port| port.ty.accepts(expected))
                .map(|port| port.name.to_string())
                .collect()
        };

        for name in candidates {
            let link = match node.input(&name) {
                Some(InputValue::Link(link)) => link.clone(),
                _ => continue,
            };
            let value = self.follow_link(&link, state);
            if !state.param.is_multi_valued() && value.is_some() {
                return value;
            }
            // Multi-valued searches visit every compatible sibling; for
            // single values an empty branch means trying the next sibling.
        }
        None
    }
}
