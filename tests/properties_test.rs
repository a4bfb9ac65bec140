//! Property tests across module boundaries
//!
//! Run with: cargo test --test properties_test

mod common;

use common::{agent_with, Reply, ScriptedClient};
use crud_agent::{Collection, Filter, Predicate, Value};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z ]{0,12}".prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
}

fn predicate() -> impl Strategy<Value = Predicate> {
    prop_oneof![
        scalar().prop_map(Predicate::Eq),
        scalar().prop_map(Predicate::Ne),
        scalar().prop_map(Predicate::Gt),
        scalar().prop_map(Predicate::Gte),
        scalar().prop_map(Predicate::Lt),
        scalar().prop_map(Predicate::Lte),
        prop::collection::vec(scalar(), 0..4).prop_map(Predicate::In),
        ("[a-z]{1,8}", any::<bool>()).prop_map(|(pattern, case_insensitive)| Predicate::Regex {
            pattern,
            case_insensitive,
        }),
    ]
}

fn filter() -> impl Strategy<Value = Filter> {
    prop::collection::btree_map("[a-z]{1,8}(\\.[a-z]{1,6})?", predicate(), 0..5).prop_map(
        |fields| {
            let mut filter = Filter::new();
            for (field, predicate) in fields {
                filter.set(field, predicate);
            }
            filter
        },
    )
}

proptest! {
    #[test]
    fn filter_json_round_trip(filter in filter()) {
        let parsed = Filter::from_json(&filter.to_json()).unwrap();
        prop_assert_eq!(parsed, filter);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn failed_model_always_yields_complete_command(text in "\\PC{0,60}") {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let command = runtime.block_on(async {
            let client = ScriptedClient::new(vec![Reply::Fail("down")]);
            let (agent, _) = agent_with(Some(client));
            agent.process(&text).await
        });
        prop_assert!(command.error.is_some());
        prop_assert!(Collection::resolve(command.collection.name()).is_some());
        prop_assert!(command.result.is_some());
    }
}
