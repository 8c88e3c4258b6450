//! Property-based tests for the application document codec.
//!
//! These tests verify the behavioral contracts of the env/secret join:
//! - Round-trip: a coherent model survives encode then decode unchanged
//! - Wire round-trip: a well-formed document survives decode then encode
//! - Mutation semantics: add operations are idempotent and last-write-wins

use proptest::prelude::*;
use serde_json::{Value, json};
use stevedore_api::{Application, EnvValue};

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// Generate environment variable names
fn env_var_name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,15}".prop_map(String::from)
}

/// Generate plain environment values (printable ASCII, exercises escaping)
fn plain_value_strategy() -> impl Strategy<Value = String> {
    "[ -~]{0,20}".prop_map(String::from)
}

/// Generate secret names
fn secret_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}".prop_map(String::from)
}

/// Generate non-empty secret source paths
fn source_strategy() -> impl Strategy<Value = String> {
    "(vault|store)(/[a-z0-9]{1,8}){1,3}".prop_map(String::from)
}

/// Generate a coherent application model through the mutation API.
///
/// Secret-bound variables get a reserved `SECRET_<n>` name; a colliding
/// plain entry is simply overwritten, which keeps the model coherent either
/// way. Both maps are materialized up front so the generated domain matches
/// what a decode produces.
fn application_strategy() -> impl Strategy<Value = Application> {
    (
        prop::collection::btree_map(env_var_name_strategy(), plain_value_strategy(), 0..6),
        prop::collection::btree_map(secret_name_strategy(), source_strategy(), 0..4),
    )
        .prop_map(|(plain, secrets)| {
            let mut app = Application::new("/demo/app");
            app.clear_env().clear_secrets();
            for (name, value) in plain {
                app.add_env(name, value);
            }
            for (i, (secret_name, source)) in secrets.into_iter().enumerate() {
                app.add_secret(format!("SECRET_{i}"), secret_name, source);
            }
            app
        })
}

/// Generate a well-formed wire document: canonical markers, every reference
/// backed by a secrets entry, non-empty sources, empty maps omitted.
fn wire_document_strategy() -> impl Strategy<Value = Value> {
    (
        prop::collection::btree_map(env_var_name_strategy(), plain_value_strategy(), 0..6),
        prop::collection::btree_map(secret_name_strategy(), source_strategy(), 0..4),
    )
        .prop_map(|(plain, secrets)| {
            let mut env = serde_json::Map::new();
            for (name, value) in plain {
                env.insert(name, Value::String(value));
            }
            let mut secret_objects = serde_json::Map::new();
            for (i, (name, source)) in secrets.into_iter().enumerate() {
                env.insert(format!("SECRET_{i}"), json!({ "secret": name.clone() }));
                secret_objects.insert(name, json!({ "source": source }));
            }
            let mut document = serde_json::Map::new();
            if !env.is_empty() {
                document.insert("env".to_string(), Value::Object(env));
            }
            if !secret_objects.is_empty() {
                document.insert("secrets".to_string(), Value::Object(secret_objects));
            }
            Value::Object(document)
        })
}

// =============================================================================
// Property Tests: Round-trips
// =============================================================================

proptest! {
    /// Contract: encoding a coherent model and decoding the result
    /// reproduces the model exactly
    #[test]
    fn model_survives_a_wire_round_trip(app in application_strategy()) {
        let wire = app.to_json().expect("encode should succeed");
        let decoded = Application::from_json(&wire).expect("decode should succeed");
        prop_assert_eq!(decoded, app);
    }

    /// Contract: a well-formed wire document is reproduced structurally
    /// unchanged by decode followed by encode
    #[test]
    fn wire_document_survives_a_model_round_trip(document in wire_document_strategy()) {
        let app: Application =
            serde_json::from_value(document.clone()).expect("decode should succeed");
        let encoded = serde_json::to_value(&app).expect("encode should succeed");
        prop_assert_eq!(encoded, document);
    }

    /// Contract: pretty and compact encodings decode to the same model
    #[test]
    fn pretty_and_compact_encodings_agree(app in application_strategy()) {
        let compact = Application::from_json(&app.to_json().expect("encode"))
            .expect("compact decode");
        let pretty = Application::from_json(&app.to_json_pretty().expect("encode"))
            .expect("pretty decode");
        prop_assert_eq!(compact, pretty);
    }
}

// =============================================================================
// Property Tests: Mutation semantics
// =============================================================================

proptest! {
    /// Contract: setting the same variable twice is the same as setting it
    /// once
    #[test]
    fn add_env_is_idempotent(
        name in env_var_name_strategy(),
        value in plain_value_strategy(),
    ) {
        let mut once = Application::default();
        once.add_env(name.clone(), value.clone());

        let mut twice = Application::default();
        twice.add_env(name.clone(), value.clone()).add_env(name, value);

        prop_assert_eq!(once, twice);
    }

    /// Contract: binding a secret to a variable replaces its plain value
    #[test]
    fn secret_binding_replaces_plain_value(
        name in env_var_name_strategy(),
        value in plain_value_strategy(),
        secret_name in secret_name_strategy(),
        source in source_strategy(),
    ) {
        let mut app = Application::default();
        app.add_env(name.clone(), value)
            .add_secret(name.clone(), secret_name.clone(), source);

        let expected = EnvValue::SecretRef(secret_name);
        prop_assert_eq!(app.env_value(&name), Some(&expected));
    }

    /// Contract: every variable set through the mutation API is visible in
    /// the encoded document
    #[test]
    fn encoded_document_contains_every_added_variable(
        app in application_strategy(),
    ) {
        let encoded = serde_json::to_value(&app).expect("encode should succeed");
        let env = app.env().expect("strategy materializes env");
        for name in env.keys() {
            prop_assert!(
                encoded
                    .get("env")
                    .and_then(|wire_env| wire_env.get(name))
                    .is_some(),
                "variable {} missing from the wire document",
                name
            );
        }
    }
}

// =============================================================================
// Behavioral tests (non-property)
// =============================================================================

#[test]
fn test_empty_model_encodes_to_an_empty_document() {
    let mut app = Application::default();
    app.clear_env().clear_secrets();
    assert_eq!(
        serde_json::to_value(&app).expect("encode"),
        json!({})
    );
}

#[test]
fn test_generated_models_distinguish_plain_from_secret_slots() {
    let mut app = Application::default();
    app.add_env("PLAIN", "value")
        .add_secret("BOUND", "db-pass", "vault/prod/db");
    let env = app.env().expect("materialized");
    assert!(env["PLAIN"].is_plain());
    assert!(env["BOUND"].is_secret_ref());
}
