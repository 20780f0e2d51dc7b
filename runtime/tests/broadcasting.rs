//! Integration tests for Store action broadcasting
//!
//! Covers the request-response pattern the checkout flow relies on: send a
//! command, then wait for the terminal action its effects produce.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use learnhub_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use learnhub_runtime::{Store, StoreError};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum TestAction {
    /// Start a multi-step job
    Start { id: u64 },
    /// One step finished
    StepCompleted { id: u64, step: u32 },
    /// Terminal action
    Finished { id: u64 },
    /// Action with no follow-up
    Noop,
}

#[derive(Debug, Clone, Default)]
struct TestState {
    steps: Vec<u32>,
    finished: Vec<u64>,
}

#[derive(Clone)]
struct TestReducer;

impl Reducer for TestReducer {
    type State = TestState;
    type Action = TestAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TestAction::Start { id } => smallvec![Effect::delay(
                Duration::from_millis(5),
                TestAction::StepCompleted { id, step: 1 },
            )],
            TestAction::StepCompleted { id, step } => {
                state.steps.push(step);
                if step < 3 {
                    smallvec![Effect::delay(
                        Duration::from_millis(5),
                        TestAction::StepCompleted { id, step: step + 1 },
                    )]
                } else {
                    smallvec![Effect::Future(Box::pin(async move {
                        Some(TestAction::Finished { id })
                    }))]
                }
            },
            TestAction::Finished { id } => {
                state.finished.push(id);
                smallvec![Effect::None]
            },
            TestAction::Noop => smallvec![Effect::None],
        }
    }
}

#[tokio::test]
async fn waits_for_terminal_action() {
    let store = Store::new(TestState::default(), TestReducer, ());

    let result = store
        .send_and_wait_for(
            TestAction::Start { id: 7 },
            |a| matches!(a, TestAction::Finished { .. }),
            Duration::from_secs(2),
        )
        .await
        .unwrap();

    assert_eq!(result, TestAction::Finished { id: 7 });
    let (steps, finished) = store.state(|s| (s.steps.clone(), s.finished.clone())).await;
    assert_eq!(steps, vec![1, 2, 3]);
    assert_eq!(finished, vec![7]);
}

#[tokio::test]
async fn times_out_when_nothing_matches() {
    let store = Store::new(TestState::default(), TestReducer, ());

    let result = store
        .send_and_wait_for(
            TestAction::Noop,
            |a| matches!(a, TestAction::Finished { .. }),
            Duration::from_millis(50),
        )
        .await;

    assert!(matches!(result, Err(StoreError::Timeout)));
}

#[tokio::test]
async fn subscribers_observe_effect_actions_only() {
    let store = Store::new(TestState::default(), TestReducer, ());
    let mut rx = store.subscribe_actions();

    let _ = store.send(TestAction::Noop).await.unwrap();
    let _ = store.send(TestAction::Start { id: 1 }).await.unwrap();

    let first = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first, TestAction::StepCompleted { id: 1, step: 1 });
}

#[tokio::test]
async fn concurrent_sends_serialize() {
    let store = Store::new(TestState::default(), TestReducer, ());

    let handles: Vec<_> = (0..10)
        .map(|id| {
            let store = store.clone();
            tokio::spawn(async move {
                let mut handle = store.send(TestAction::StepCompleted { id, step: 3 }).await.unwrap();
                handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    let finished = store.state(|s| s.finished.len()).await;
    assert_eq!(finished, 10);
}
