// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt that enforces array-only output for ranking calls.
pub const JSON_ARRAY_ONLY_SYSTEM: &str =
    "Return ONLY a JSON array as specified. No prose. No markdown code fences.";
