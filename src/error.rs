use thiserror::Error;

/// Errors surfaced by the extraction API.
///
/// Data-quality problems (malformed JSON, unknown node types, cycles,
/// dangling links) never appear here: they degrade to absent parameters
/// inside the engine. The only hard failure is calling the engine without
/// any graph payload at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("metadata payload contains neither a workflow nor a prompt structure")]
    EmptyPayload,
}
