//! Property-based tests for request building and payload validation

use super::*;
use proptest::prelude::*;
use serde_json::{json, Value};

const REQUIRED_FIELDS: [&str; 6] = [
    "reply",
    "detectedLanguage",
    "englishTranslation",
    "culturalNote",
    "sentiment",
    "suggestedResponses",
];

fn arb_message() -> impl Strategy<Value = Message> {
    (any::<bool>(), "[a-zA-Z0-9 _.!?,\n]{0,60}").prop_map(|(is_user, text)| {
        if is_user {
            Message::user(text)
        } else {
            Message::model(text)
        }
    })
}

fn arb_sentiment() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("positive"), Just("neutral"), Just("negative")]
}

fn valid_payload(sentiment: &str, suggestions: &[String]) -> Value {
    json!({
        "reply": "reply",
        "detectedLanguage": "Uzbek",
        "englishTranslation": "translation",
        "culturalNote": "note",
        "sentiment": sentiment,
        "suggestedResponses": suggestions,
    })
}

proptest! {
    #[test]
    fn prop_history_round_trips_through_wire_format(history in prop::collection::vec(arb_message(), 0..16)) {
        let wire = serde_json::to_value(to_contents(&history)).unwrap();
        let back: Vec<Content> = serde_json::from_value(wire).unwrap();

        prop_assert_eq!(back.len(), history.len());
        for (content, msg) in back.iter().zip(&history) {
            let expected_role = match msg.role {
                Role::User => ContentRole::User,
                Role::Model => ContentRole::Model,
            };
            prop_assert_eq!(content.role, expected_role);
            prop_assert_eq!(content.joined_text(), msg.text.clone());
        }
    }

    #[test]
    fn prop_new_turn_is_always_last(history in prop::collection::vec(arb_message(), 0..10), text in "[a-z]{1,20}") {
        let orchestrator = Orchestrator::new(None, OrchestratorConfig::default());
        let request = orchestrator.build_request(&history, &text);

        prop_assert_eq!(request.contents.len(), history.len() + 1);
        let last = request.contents.last().unwrap();
        prop_assert_eq!(last.role, ContentRole::User);
        prop_assert_eq!(last.joined_text(), text);
    }

    #[test]
    fn prop_valid_payload_passes_through(
        sentiment in arb_sentiment(),
        suggestions in prop::collection::vec("[a-zA-Z ]{0,15}", 0..5),
    ) {
        let reply = parse_payload(&valid_payload(sentiment, &suggestions).to_string()).unwrap();
        prop_assert_eq!(reply.insight.sentiment.as_str(), sentiment);
        prop_assert_eq!(reply.insight.suggested_responses, suggestions);
    }

    #[test]
    fn prop_missing_field_is_malformed(index in 0..REQUIRED_FIELDS.len(), sentiment in arb_sentiment()) {
        let mut payload = valid_payload(sentiment, &["a".to_string()]);
        payload.as_object_mut().unwrap().remove(REQUIRED_FIELDS[index]);

        let err = parse_payload(&payload.to_string()).unwrap_err();
        prop_assert_eq!(err.kind(), TurnErrorKind::MalformedResponse);
    }

    #[test]
    fn prop_unknown_sentiment_is_malformed(sentiment in "[a-z]{1,12}") {
        prop_assume!(!["positive", "neutral", "negative"].contains(&sentiment.as_str()));
        let payload = valid_payload(&sentiment, &[]);

        let err = parse_payload(&payload.to_string()).unwrap_err();
        prop_assert_eq!(err.kind(), TurnErrorKind::MalformedResponse);
    }
}
