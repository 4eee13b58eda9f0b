//! Property tests: the cursor never leaves `0..=len` and completed runs
//! leave no variables behind

mod helpers;

use proptest::prelude::*;
use serde_json::json;

use helpers::*;
use ScenarioBot::models::{HttpMethod, Scenario, Step};
use ScenarioBot::state::HandleOutcome;

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        "[a-z ]{0,12}".prop_map(|content| Step::message(content)),
        ("[a-z?]{0,8}", prop::option::of("[a-c]")).prop_map(|(prompt, save_as)| Step::InputText { prompt, save_as }),
        Just(Step::api_call("http://127.0.0.1:9/hook", HttpMethod::Post, Some(json!({ "v": "{{a}}" })))),
        "[a-z]{1,6}".prop_map(|kind| Step::Unknown { kind }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn cursor_stays_in_bounds(
        steps in prop::collection::vec(step_strategy(), 1..8),
        replies in prop::collection::vec("[a-z]{1,5}", 1..12),
    ) {
        tokio_test::block_on(async {
            let len = steps.len();
            let harness = EngineHarness::build(
                Some(Scenario::new("prop", steps)),
                RecordingMessenger::new(),
                std::sync::Arc::new(StubHttpClient::with_status(200)),
            ).await;

            let mut completions = 0;
            for reply in &replies {
                let outcome = harness.send(1, reply).await;
                let progress = harness.progress(1).await.unwrap();
                prop_assert!(progress.step <= len);

                match outcome {
                    HandleOutcome::Completed => {
                        completions += 1;
                        prop_assert_eq!(progress.step, 0);
                        prop_assert!(progress.variables.is_empty());
                    }
                    HandleOutcome::AwaitingInput { step } => {
                        prop_assert_eq!(progress.step, step);
                        prop_assert!(step < len);
                    }
                    HandleOutcome::NoScenario => prop_assert!(false, "scenario is never empty"),
                }
            }

            prop_assert_eq!(harness.messenger.sent_to(OPERATOR_ID).await.len(), completions);
            Ok(())
        })?;
    }
}
