// Marketing copy generation: chat, platform content, email campaigns, personas.
// All vendor calls go through llm_client; prompts are templated in prompts.rs.

pub mod generator;
pub mod handlers;
pub mod prompts;
