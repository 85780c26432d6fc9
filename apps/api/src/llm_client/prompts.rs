// Cross-cutting prompt fragments. Feature-specific prompts live next to their feature.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps extraction and rewrites faithful to the source document.
pub const FIDELITY_INSTRUCTION: &str = "\
    Use only facts present in the provided text. Do NOT invent employers, dates, \
    metrics or skills. Preserve the author's wording unless asked to rewrite it.";
