//! Property-based tests for the session state machine

use super::state::{Effect, SessionEvent, SessionState};
use super::transition::transition;
use super::SessionError;
use crate::conversation::{Insight, Role, Sentiment};
use crate::llm::LlmError;
use crate::orchestrator::{TurnError, TurnReply};
use proptest::prelude::*;

/// What the store would look like after applying effects
#[derive(Debug, Default)]
struct Model {
    messages: Vec<(Role, String)>,
    insight: Option<Insight>,
    loading: bool,
    in_flight: Option<u64>,
}

impl Model {
    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RequestReply { turn, .. } => {
                    assert!(self.in_flight.is_none(), "overlapping requests");
                    self.in_flight = Some(turn);
                }
                Effect::AppendMessage { role, text } => self.messages.push((role, text)),
                Effect::SetLoading(loading) => self.loading = loading,
                Effect::SetInsight(insight) => self.insight = Some(insight),
                Effect::AbortRequest => self.in_flight = None,
                Effect::SetError(_) | Effect::ToggleSidebar => {}
            }
        }
    }
}

fn insight(language: &str) -> Insight {
    Insight {
        detected_language: language.to_string(),
        english_translation: String::new(),
        cultural_note: String::new(),
        sentiment: Sentiment::Neutral,
        suggested_responses: vec![],
    }
}

fn arb_error() -> impl Strategy<Value = TurnError> {
    prop_oneof![
        Just(TurnError::MissingCredential),
        Just(TurnError::EmptyResponse),
        Just(TurnError::MalformedResponse("bad".to_string())),
        Just(TurnError::Timeout(std::time::Duration::from_secs(1))),
        Just(TurnError::TransportFailure(LlmError::network("down"))),
    ]
}

/// What happens to a submitted turn
#[derive(Debug, Clone)]
enum Outcome {
    Reply(String),
    Fail(TurnError),
    Cancel,
}

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        3 => "[a-z]{1,10}".prop_map(Outcome::Reply),
        1 => arb_error().prop_map(Outcome::Fail),
        1 => Just(Outcome::Cancel),
    ]
}

fn step(state: &mut SessionState, model: &mut Model, event: SessionEvent) -> Result<(), SessionError> {
    let result = transition(state, event)?;
    *state = result.new_state;
    model.apply(result.effects);
    if !state.is_busy() {
        model.in_flight = None;
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_successful_turns_add_two_messages_each(replies in prop::collection::vec("[a-z]{1,10}", 0..12)) {
        let mut state = SessionState::default();
        let mut model = Model::default();

        for (i, reply) in replies.iter().enumerate() {
            step(&mut state, &mut model, SessionEvent::UserSubmit { text: format!("u{i}") }).unwrap();
            let SessionState::AwaitingReply { turn } = state else { panic!("not awaiting") };
            step(&mut state, &mut model, SessionEvent::ReplyReceived {
                turn,
                reply: TurnReply { reply: reply.clone(), insight: insight(reply) },
            }).unwrap();
        }

        prop_assert_eq!(model.messages.len(), replies.len() * 2);
        for pair in model.messages.chunks(2) {
            prop_assert_eq!(pair[0].0, Role::User);
            prop_assert_eq!(pair[1].0, Role::Model);
        }
        prop_assert!(!model.loading);
    }

    #[test]
    fn prop_failure_adds_one_message_and_keeps_insight(error in arb_error()) {
        let mut state = SessionState::default();
        let mut model = Model::default();

        step(&mut state, &mut model, SessionEvent::UserSubmit { text: "first".into() }).unwrap();
        step(&mut state, &mut model, SessionEvent::ReplyReceived {
            turn: 1,
            reply: TurnReply { reply: "ok".into(), insight: insight("English") },
        }).unwrap();
        let before = model.insight.clone();

        step(&mut state, &mut model, SessionEvent::UserSubmit { text: "second".into() }).unwrap();
        let fallback = error.fallback_message().to_string();
        step(&mut state, &mut model, SessionEvent::TurnFailed { turn: 2, error }).unwrap();

        prop_assert_eq!(model.messages.len(), 4);
        prop_assert_eq!(&model.messages[3], &(Role::Model, fallback));
        prop_assert_eq!(model.insight, before);
        prop_assert!(!model.loading);
    }

    #[test]
    fn prop_loading_tracks_busy_state(outcomes in prop::collection::vec(arb_outcome(), 0..16)) {
        let mut state = SessionState::default();
        let mut model = Model::default();
        let mut expected_messages = 0;

        for (i, outcome) in outcomes.into_iter().enumerate() {
            step(&mut state, &mut model, SessionEvent::UserSubmit { text: format!("u{i}") }).unwrap();
            prop_assert!(model.loading);
            prop_assert!(state.is_busy());
            let SessionState::AwaitingReply { turn } = state else { panic!("not awaiting") };

            // A second submission is always refused mid-turn
            prop_assert_eq!(
                step(&mut state, &mut model, SessionEvent::UserSubmit { text: "again".into() }),
                Err(SessionError::Busy)
            );

            match outcome {
                Outcome::Reply(reply) => {
                    step(&mut state, &mut model, SessionEvent::ReplyReceived {
                        turn,
                        reply: TurnReply { reply, insight: insight("English") },
                    }).unwrap();
                    expected_messages += 2;
                }
                Outcome::Fail(error) => {
                    step(&mut state, &mut model, SessionEvent::TurnFailed { turn, error }).unwrap();
                    expected_messages += 2;
                }
                Outcome::Cancel => {
                    step(&mut state, &mut model, SessionEvent::UserCancel).unwrap();
                    // The reply that loses the race changes nothing
                    step(&mut state, &mut model, SessionEvent::ReplyReceived {
                        turn,
                        reply: TurnReply { reply: "late".into(), insight: insight("Late") },
                    }).unwrap();
                    expected_messages += 1;
                }
            }

            prop_assert!(!model.loading);
            prop_assert!(!state.is_busy());
            prop_assert_eq!(model.messages.len(), expected_messages);
        }

        prop_assert!(model.messages.iter().all(|(_, text)| text != "late"));
    }

    #[test]
    fn prop_whitespace_never_starts_a_turn(text in "[ \t\n\r]{0,10}") {
        let result = transition(&SessionState::default(), SessionEvent::UserSubmit { text });
        prop_assert!(matches!(result, Err(SessionError::EmptyInput)));
    }
}
