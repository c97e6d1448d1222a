mod gemini;
mod gemini_types;
mod http_client;
mod traits;

pub use gemini::{FALLBACK_REPLY, GeminiProvider};
pub use http_client::build_provider_client;
pub use traits::Provider;
