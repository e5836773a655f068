//! Fixed label sets and hypothesis templates for zero-shot classification.

pub const DOCUMENT_TYPES: [&str; 9] = [
    "invoice",
    "contract",
    "report",
    "email",
    "resume",
    "presentation",
    "memo",
    "financial_statement",
    "legal_notice",
];

pub const PRIORITY_LEVELS: [&str; 4] = ["urgent", "high", "medium", "low"];

/// Priorities the keyword heuristic leaves alone.
pub const ELEVATED_PRIORITIES: [&str; 2] = ["urgent", "high"];

/// What the heuristic escalates a lower priority to.
pub const ESCALATED_PRIORITY: &str = "high";

pub const TYPE_HYPOTHESIS: &str = "This document is a {}.";
pub const PRIORITY_HYPOTHESIS: &str = "This document has {} priority.";

/// Number of whitespace tokens sent to the classifier.
pub const SAMPLE_TOKENS: usize = 1024;
