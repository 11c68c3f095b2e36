// Shared prompt constants. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file contains cross-cutting fragments.

/// System prompt used for every analysis call. Frames the model as a career
/// counselor working within the Ignatian Pedagogical Paradigm.
pub const COUNSELOR_SYSTEM: &str = "You are an expert career counselor and educator trained \
    in the Ignatian Pedagogical Paradigm. You help students discover authentic connections \
    between their background and career aspirations, focusing on growth, reflection, and \
    purposeful action.";

/// Fragment appended to prompts that must return machine-readable output.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
