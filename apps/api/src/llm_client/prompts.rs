// Prompt fragments shared across every vendor call.
// Feature-specific templates live next to the feature (see marketing/prompts.rs).

/// System prompt used for Anthropic calls that do not supply one.
pub const DEFAULT_SYSTEM: &str = "You are a helpful AI assistant.";
