//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the kaidoku crate. Import
//! this module to get access to the core functionality without having to
//! import each type individually.

// Extraction pipeline
pub use crate::extract::{MetadataExtractor, MetadataPayload};

// Graph model and builder
pub use crate::graph::{GraphBuilder, GraphNode, InputValue, Link, NodeMode, WorkflowGraph};

// Registry
pub use crate::registry::{
    NodeDefinition, ParamRule, PortType, Registry, Role, RoutingRule, TerminalKind,
};

// Traversal
pub use crate::traversal::{Resolver, TraversalState, select_terminal};

// Parameters and output record
pub use crate::params::{GenerationParams, LogicalParam, ParamValue};

// String fallback
pub use crate::fallback::{FallbackParams, merge_fallback, parse_parameter_block};

// Error types
pub use crate::error::ExtractError;
