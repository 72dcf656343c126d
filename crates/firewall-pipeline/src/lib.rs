//! Orchestrates the firewall's validation layers and the LLM markdown
//! extraction that feeds them, as both a library and the shared engine
//! behind the CLI and HTTP service.

pub mod error;
pub mod language;
pub mod llm;
pub mod markdown;
pub mod pipeline;

pub use error::{PipelineError, Result};
pub use language::detect_language;
pub use llm::validate_llm_output;
pub use markdown::{MAX_BLOCKS, MAX_INPUT_SIZE, detect_language_heuristic, extract_code_blocks};
pub use pipeline::{MAX_FILE_SIZE, ValidationPipeline};
