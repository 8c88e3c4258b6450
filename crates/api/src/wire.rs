//! Wire-format mirror of the application document
//!
//! The scheduler splits each secret across two JSON maps: a marker object
//! inside `env` naming the secret, and a `secrets` entry carrying the
//! source its value is fetched from. Decoding joins the two maps into the
//! [`Application`] model, where a [`Secret`] knows both its variable and
//! its source; encoding splits the model back apart. Every other document
//! field passes through the mirror untouched.

use crate::application::Application;
use crate::environment::{EnvValue, Secret};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Wire form of a `secrets.<name>` entry: only the source crosses the wire.
#[derive(Debug, Serialize, Deserialize)]
struct WireSecret {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    source: String,
}

/// The document as it travels on the wire, with `env` and `secrets` still
/// split. The field list must stay in sync with [`Application`].
#[derive(Debug, Serialize, Deserialize)]
struct WireApplication {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cmd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instances: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpus: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mem: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    env: Option<HashMap<String, EnvValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secrets: Option<HashMap<String, WireSecret>>,
}

impl<'de> Deserialize<'de> for Application {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        WireApplication::deserialize(deserializer).map(join)
    }
}

impl Serialize for Application {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        split(self).serialize(serializer)
    }
}

/// Join the two wire maps into the in-memory model.
///
/// Secret markers in `env` stage provisional bindings with an empty source;
/// the `secrets` map then fills the sources in. A `secrets` entry no marker
/// pointed at is kept with an empty variable name, and a marker with no
/// `secrets` entry keeps its empty source. Both model maps come out
/// materialized even when the wire fields were absent.
fn join(wire: WireApplication) -> Application {
    let mut env: HashMap<String, EnvValue> = HashMap::new();
    let mut secrets: HashMap<String, Secret> = HashMap::new();

    for (name, value) in wire.env.unwrap_or_default() {
        if let EnvValue::SecretRef(secret_name) = &value {
            secrets.insert(secret_name.clone(), Secret::new(name.clone(), ""));
        }
        env.insert(name, value);
    }

    for (name, wire_secret) in wire.secrets.unwrap_or_default() {
        match secrets.entry(name) {
            Entry::Occupied(mut staged) => staged.get_mut().source = wire_secret.source,
            Entry::Vacant(slot) => {
                tracing::debug!(
                    secret = %slot.key(),
                    "secret is not referenced by any environment variable"
                );
                slot.insert(Secret::new("", wire_secret.source));
            }
        }
    }

    Application {
        id: wire.id,
        cmd: wire.cmd,
        args: wire.args,
        user: wire.user,
        instances: wire.instances,
        cpus: wire.cpus,
        mem: wire.mem,
        disk: wire.disk,
        labels: wire.labels,
        env: Some(env),
        secrets: Some(secrets),
    }
}

/// Split the model back into the two wire maps.
///
/// Plain entries are copied through; every secret binding emits its marker
/// in `env` plus its `secrets` entry. The secrets map is the source of
/// truth, so `SecretRef` slots in the model are never copied directly: a
/// dangling reference with no binding disappears from the wire. Orphaned
/// secrets (empty variable name) keep their `secrets` entry but get no
/// marker. Empty maps are left off the wire entirely.
fn split(app: &Application) -> WireApplication {
    let mut env: HashMap<String, EnvValue> = HashMap::new();
    let mut secrets: HashMap<String, WireSecret> = HashMap::new();

    if let Some(model_env) = &app.env {
        for (name, value) in model_env {
            if value.is_plain() {
                env.insert(name.clone(), value.clone());
            }
        }
    }

    if let Some(model_secrets) = &app.secrets {
        for (name, secret) in model_secrets {
            if !secret.env_var.is_empty() {
                env.insert(secret.env_var.clone(), EnvValue::SecretRef(name.clone()));
            }
            secrets.insert(
                name.clone(),
                WireSecret {
                    source: secret.source.clone(),
                },
            );
        }
    }

    WireApplication {
        id: app.id.clone(),
        cmd: app.cmd.clone(),
        args: app.args.clone(),
        user: app.user.clone(),
        instances: app.instances,
        cpus: app.cpus,
        mem: app.mem,
        disk: app.disk,
        labels: app.labels.clone(),
        env: (!env.is_empty()).then_some(env),
        secrets: (!secrets.is_empty()).then_some(secrets),
    }
}
