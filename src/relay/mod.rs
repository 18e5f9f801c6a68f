/// Chat relay upstream clients
///
/// The platform does not talk to AI models itself; it forwards prompts to
/// two opaque HTTP collaborators and hands their answers back. One shared
/// reqwest client per upstream, no retry or backoff policy.

pub mod adk;
pub mod openrouter;

pub use adk::AdkClient;
pub use openrouter::OpenRouterClient;
