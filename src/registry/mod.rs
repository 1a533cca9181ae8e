//! The static node catalog.
//!
//! Every node type the engine understands is described by pure data: roles,
//! typed ports, per-parameter extraction rules, the authoritative widget
//! ordering, forwarding rules, and an optional routing descriptor. Adding
//! support for a new node type is a data addition in [`catalog`], never a
//! code change in the traversal engine.

mod catalog;
pub mod extractors;

use crate::graph::GraphNode;
use crate::params::{LogicalParam, ParamValue};
use crate::traversal::{Resolver, TraversalState};
use ahash::AHashMap;

/// Behavioral tags governing how traversal proceeds through a node type.
/// A node type may hold several roles simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A value originates here; no upstream trace is required.
    Source,
    /// A valid traversal anchor.
    Sink,
    /// Derives a value from typed inputs.
    Transform,
    /// Forwards an upstream value unchanged.
    PassThrough,
    /// Selects one of several upstream branches based on a control value.
    Routing,
}

/// Port types used to disambiguate which input of a multi-input node a
/// backward search should follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortType {
    Model,
    Conditioning,
    Latent,
    Image,
    Vae,
    Clip,
    Text,
    Number,
    Any,
}

impl PortType {
    /// Whether a port of this type may carry a search that expects
    /// `expected`. Latent and image ports are interchangeable: the pixel
    /// chain crosses a decode boundary on its way to the terminal sink.
    pub fn accepts(&self, expected: PortType) -> bool {
        if *self == PortType::Any || expected == PortType::Any {
            return true;
        }
        if *self == expected {
            return true;
        }
        matches!(
            (*self, expected),
            (PortType::Latent, PortType::Image) | (PortType::Image, PortType::Latent)
        )
    }
}

/// A declared input port.
#[derive(Debug, Clone, Copy)]
pub struct PortDef {
    pub name: &'static str,
    pub ty: PortType,
}

/// Signature shared by all named custom extractors: the node under
/// inspection, the per-call traversal state, and the resolver for recursive
/// sub-resolution.
pub type ExtractorFn =
    fn(&Resolver<'_>, &GraphNode, &mut TraversalState) -> Option<ParamValue>;

/// A named extraction function registered alongside a node definition.
/// Naming keeps the registry inspectable; closures would not be.
#[derive(Clone, Copy)]
pub struct CustomExtractor {
    pub name: &'static str,
    pub run: ExtractorFn,
}

impl std::fmt::Debug for CustomExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomExtractor")
            .field("name", &self.name)
            .finish()
    }
}

/// How one logical parameter is read off a node type.
#[derive(Debug, Clone, Copy)]
pub enum ParamRule {
    /// Read the named position from the flat widget array. The execution
    /// payload stores the same value as a literal input under the same name,
    /// so the input map is consulted first.
    Widget(&'static str),
    /// Read the declared input directly: used as-is when literal, traced
    /// when linked.
    Input(&'static str),
    /// Follow the named input upstream and resolve the same parameter there.
    Trace(&'static str),
    /// Logic the other kinds cannot express.
    Custom(CustomExtractor),
}

/// Conditional-routing descriptor: the selected input is named
/// `prefix + control_value`; branches not selected are never visited.
#[derive(Debug, Clone, Copy)]
pub struct RoutingRule {
    pub control: &'static str,
    pub prefix: &'static str,
}

/// Terminal classification used by the terminal-node selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    Save,
    Preview,
    Sampler,
}

/// One registry entry. Read-only at traversal time.
#[derive(Debug, Clone, Copy)]
pub struct NodeDefinition {
    pub class_type: &'static str,
    /// Informational grouping, mirrors the node vocabulary's own categories.
    pub category: &'static str,
    pub roles: &'static [Role],
    pub inputs: &'static [PortDef],
    /// Authoritative name-to-index ordering of the flat widget array.
    /// Placeholder slots (e.g. `control_after_generate`) appear explicitly;
    /// omitting one would silently shift every subsequent field.
    pub widget_order: &'static [&'static str],
    pub params: &'static [(LogicalParam, ParamRule)],
    /// Static input-forwarding rule for pass-through traversal, in priority
    /// order. An empty list on a pass-through node means "follow any link".
    pub pass_through: &'static [&'static str],
    pub routing: Option<RoutingRule>,
    pub terminal: Option<TerminalKind>,
}

impl NodeDefinition {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn rule_for(&self, param: LogicalParam) -> Option<&ParamRule> {
        self.params
            .iter()
            .find(|(p, _)| *p == param)
            .map(|(_, rule)| rule)
    }

    pub fn widget_index(&self, name: &str) -> Option<usize> {
        self.widget_order.iter().position(|w| *w == name)
    }

    pub fn port_type(&self, input: &str) -> Option<PortType> {
        self.inputs
            .iter()
            .find(|port| port.name == input)
            .map(|port| port.ty)
    }
}

/// Lookup table from node type name to its definition. Unregistered names
/// resolve to `None` and become ordinary dead ends during traversal.
#[derive(Debug, Clone)]
pub struct Registry {
    defs: AHashMap<&'static str, &'static NodeDefinition>,
}

impl Registry {
    /// The built-in catalog covering the stock node vocabulary plus the
    /// common custom-node families.
    pub fn builtin() -> Self {
        let mut defs = AHashMap::with_capacity(catalog::CATALOG.len());
        for def in catalog::CATALOG {
            defs.insert(def.class_type, def);
        }
        Self { defs }
    }

    pub fn get(&self, class_type: &str) -> Option<&'static NodeDefinition> {
        self.defs.get(class_type).copied()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
