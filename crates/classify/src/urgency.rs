use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::labels::{ELEVATED_PRIORITIES, ESCALATED_PRIORITY};

pub const URGENCY_TERMS: [&str; 6] = [
    "urgent",
    "asap",
    "immediately",
    "emergency",
    "deadline",
    "critical",
];

static DEADLINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(today|tomorrow|next week|due by|due date|deadline)\b")
        .expect("deadline pattern is valid")
});

/// Keyword signals found in the full lowercased text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencySignals {
    /// Any urgency term appears, even inside a longer word.
    pub explicit_terms: bool,
    /// A deadline phrase appears on word boundaries.
    pub deadlines: bool,
}

impl UrgencySignals {
    pub fn scan(text: &str) -> Self {
        let lowered = text.to_lowercase();

        Self {
            explicit_terms: URGENCY_TERMS.iter().any(|term| lowered.contains(term)),
            deadlines: DEADLINE_PATTERN.is_match(&lowered),
        }
    }
}

/// Raise the model's priority to `high` when urgency terms are present.
/// Never lowers a priority.
pub fn escalate_priority(model_priority: &str, signals: UrgencySignals) -> String {
    if signals.explicit_terms && !ELEVATED_PRIORITIES.contains(&model_priority) {
        ESCALATED_PRIORITY.to_string()
    } else {
        model_priority.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_is_case_insensitive() {
        let signals = UrgencySignals::scan("Subject: URGENT: Meeting Tomorrow");
        assert!(signals.explicit_terms);
        assert!(signals.deadlines);
    }

    #[test]
    fn test_terms_match_inside_words() {
        // "critical" inside "uncritical" still counts
        let signals = UrgencySignals::scan("An uncritical review of the data.");
        assert!(signals.explicit_terms);
        assert!(!signals.deadlines);
    }

    #[test]
    fn test_deadline_phrases_need_word_boundaries() {
        assert!(UrgencySignals::scan("Payment is due by Friday").deadlines);
        assert!(UrgencySignals::scan("see you next week").deadlines);
        assert!(!UrgencySignals::scan("todays special").deadlines);
        assert!(!UrgencySignals::scan("nothing to see").deadlines);
    }

    #[test]
    fn test_escalation_only_raises() {
        let urgent = UrgencySignals {
            explicit_terms: true,
            deadlines: false,
        };
        let calm = UrgencySignals::default();

        assert_eq!(escalate_priority("low", urgent), "high");
        assert_eq!(escalate_priority("medium", urgent), "high");
        assert_eq!(escalate_priority("urgent", urgent), "urgent");
        assert_eq!(escalate_priority("high", urgent), "high");
        assert_eq!(escalate_priority("low", calm), "low");
        assert_eq!(escalate_priority("urgent", calm), "urgent");
    }

    #[test]
    fn test_deadline_alone_does_not_escalate() {
        let signals = UrgencySignals::scan("Lunch tomorrow?");
        assert!(signals.deadlines);
        assert_eq!(escalate_priority("low", signals), "low");
    }
}
