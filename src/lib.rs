//! # Kaidoku - Workflow Metadata Resolution Engine
//!
//! **Kaidoku** extracts generation parameters (prompt text, seed, sampler
//! configuration, model and LoRA references, dimensions) from the node-based
//! workflow graphs that image-generation tools embed as metadata inside the
//! files they produce. The graph is untrusted: it may be cyclic, incomplete,
//! or corrupted, and node types appear and disappear with every custom-node
//! pack. The engine therefore treats every failure as an ordinary dead end
//! and degrades to a partially-populated record instead of erroring.
//!
//! ## Core Workflow
//!
//! 1.  **Build**: merge the UI-authored "workflow" payload and the
//!     execution-time "prompt" payload into one immutable, id-indexed graph.
//! 2.  **Anchor**: select the terminal node — the node representing the final
//!     produced image.
//! 3.  **Resolve**: walk the graph backwards from the terminal, applying the
//!     declarative per-node-type rules of the [`registry`], one independent
//!     search per logical parameter.
//! 4.  **Merge**: parse the companion human-readable parameter block and
//!     substitute its values wherever the graph left a field at its default.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kaidoku::prelude::*;
//!
//! fn main() -> Result<(), ExtractError> {
//!     let prompt_json = r#"{
//!         "1": {"class_type": "CLIPTextEncode", "inputs": {"text": "a cat"}},
//!         "2": {"class_type": "KSampler", "inputs": {
//!             "positive": ["1", 0], "seed": 123, "steps": 20, "cfg": 7,
//!             "sampler_name": "euler", "scheduler": "normal"
//!         }},
//!         "3": {"class_type": "SaveImage", "inputs": {"images": ["2", 0]}}
//!     }"#;
//!
//!     let extractor = MetadataExtractor::new();
//!     let record = extractor.extract(&MetadataPayload {
//!         prompt_json: Some(prompt_json),
//!         ..MetadataPayload::default()
//!     })?;
//!
//!     assert_eq!(record.prompt, "a cat");
//!     assert_eq!(record.seed, 123);
//!     Ok(())
//! }
//! ```
//!
//! Adding support for a new node type is a pure data addition to the
//! [`registry`] catalog; the traversal engine never changes for it.

pub mod error;
pub mod extract;
pub mod fallback;
pub mod graph;
pub mod params;
pub mod prelude;
pub mod registry;
pub mod traversal;
