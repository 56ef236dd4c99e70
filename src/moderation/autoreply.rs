//! Keyword autoreply matcher.
//!
//! A fixed trigger-to-response table checked with case-insensitive substring
//! containment. First match wins; commands never reach this matcher because
//! the dispatcher filters them out earlier.

/// Trigger phrases and their canned responses, checked in order
const AUTOREPLIES: &[(&str, &str)] = &[
    (
        "what is the rule",
        "Links in bios are not allowed. Please make sure to follow the group rules.",
    ),
    (
        "how can i get approved",
        "Please contact the group admin for approval.",
    ),
    (
        "help",
        "Please follow the group rules. If you need assistance, ask the admin.",
    ),
];

/// Returns the canned response for the first trigger contained in `text`.
#[must_use]
pub fn match_trigger(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    AUTOREPLIES
        .iter()
        .find(|(trigger, _)| lowered.contains(trigger))
        .map(|(_, reply)| *reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_rule_question_gets_rules_text() {
        let reply = match_trigger("What is the rule?");
        assert_eq!(
            reply,
            Some("Links in bios are not allowed. Please make sure to follow the group rules.")
        );
    }

    #[test]
    fn unmatched_text_gets_no_reply() {
        assert_eq!(match_trigger("hello"), None);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(match_trigger("HOW CAN I GET APPROVED???").is_some());
    }

    #[test]
    fn first_match_wins() {
        // Contains both the rules trigger and "help"; table order decides
        let reply = match_trigger("help me, what is the rule here");
        assert_eq!(
            reply,
            Some("Links in bios are not allowed. Please make sure to follow the group rules.")
        );
    }
}
