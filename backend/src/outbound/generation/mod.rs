//! Text generation provider adapters.

mod openai_http;

pub use openai_http::{OPENAI_PROVIDER, OpenAiSettings, OpenAiTextGenerator};
