//! Optional advisory augmentation of column classifications.
//!
//! An advisory provider is asked to classify each column and may
//! override the pattern-only semantic type when it is confident enough.
//! The integration is optional: Vaultsmith works fully without it, and
//! any provider failure degrades to the pattern-only result.
//!
//! # Supported Providers
//!
//! - **Anthropic** - Claude models via API (requires `ANTHROPIC_API_KEY`)
//! - **OpenAI** - GPT models via API (requires `OPENAI_API_KEY`)
//! - **Ollama** - Local models, no API key needed (honours `OLLAMA_HOST`)
//! - **Mock** - Scriptable replies for tests
//!
//! # Example
//!
//! ```no_run
//! use vaultsmith::{OllamaProvider, Vaultsmith};
//!
//! // Use a free local model
//! let vaultsmith = Vaultsmith::new()
//!     .with_advisory(OllamaProvider::new().unwrap());
//!
//! // Or use Anthropic API
//! // let vaultsmith = Vaultsmith::new()
//! //     .with_advisory(AnthropicProvider::from_env().unwrap());
//! ```

mod anthropic;
mod mock;
mod ollama;
mod openai;
mod prompts;
mod provider;

pub use anthropic::AnthropicProvider;
pub use mock::{MockProvider, MockReply};
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use prompts::{classification_prompt, system_prompt};
pub use provider::{
    consult, merge, AdvisoryConfig, AdvisoryInsight, AdvisoryProvider, AdvisoryRequest,
    AdvisoryResponse, InsightSource,
};
