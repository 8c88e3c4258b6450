//! Application documents for the Stevedore scheduler API
//!
//! An [`Application`] is one deployable unit as the scheduler sees it. Most
//! fields pass through the wire untouched; the `env`/`secrets` pair is the
//! interesting part, decoded from and encoded to the scheduler's split wire
//! shape by [`crate::wire`].

use crate::environment::{EnvValue, Secret};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// A single application definition as submitted to and returned by the
/// scheduler.
///
/// The environment maps distinguish "never initialized" (`None`) from
/// "initialized but empty" (`Some` with zero entries). A freshly constructed
/// application has both maps uninitialized; decoding a document or calling
/// any of the mutation helpers materializes them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Application {
    /// Unique application identifier (path-like, e.g. `/orders/api`)
    pub id: Option<String>,
    /// Command line executed by the scheduler
    pub cmd: Option<String>,
    /// Argument vector, used instead of `cmd` when set
    pub args: Option<Vec<String>>,
    /// Unix user the tasks run as
    pub user: Option<String>,
    /// Number of task instances to keep running
    pub instances: Option<u32>,
    /// CPU shares allocated to each instance
    pub cpus: Option<f64>,
    /// Memory in MiB allocated to each instance
    pub mem: Option<f64>,
    /// Disk in MiB allocated to each instance
    pub disk: Option<f64>,
    /// Free-form labels attached to the application
    pub labels: Option<HashMap<String, String>>,
    /// Environment variables: plain values and secret references side by side
    pub env: Option<HashMap<String, EnvValue>>,
    /// Secret bindings keyed by secret name.
    ///
    /// This map is the source of truth for which variable a secret feeds and
    /// where its value comes from; `SecretRef` slots in the `env` map are
    /// back-references into it.
    pub secrets: Option<HashMap<String, Secret>>,
}

impl Application {
    /// Create an application with only its identifier set
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Set a plain environment variable.
    ///
    /// Overwrites any previous slot of the same name, including a secret
    /// reference. Materializes the environment map if it was uninitialized.
    pub fn add_env(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), EnvValue::Plain(value.into()));
        self
    }

    /// Bind a secret to an environment variable.
    ///
    /// Sets `env[env_var]` to a reference naming `secret_name` and records
    /// the binding in [`Application::secrets()`]. Overwrites any previous
    /// slot for `env_var` and any previous binding for `secret_name`; last
    /// write wins, as with [`Application::add_env`].
    pub fn add_secret(
        &mut self,
        env_var: impl Into<String>,
        secret_name: impl Into<String>,
        source: impl Into<String>,
    ) -> &mut Self {
        let env_var = env_var.into();
        let secret_name = secret_name.into();
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(env_var.clone(), EnvValue::SecretRef(secret_name.clone()));
        self.secrets
            .get_or_insert_with(HashMap::new)
            .insert(secret_name, Secret::new(env_var, source));
        self
    }

    /// Reset the environment map to initialized-but-empty.
    ///
    /// Secret bindings are left alone; the next encode regenerates their
    /// markers from [`Application::secrets()`].
    pub fn clear_env(&mut self) -> &mut Self {
        self.env = Some(HashMap::new());
        self
    }

    /// Reset the secret bindings to initialized-but-empty.
    ///
    /// Any `SecretRef` slots left in the environment map become dangling and
    /// are dropped on the next encode.
    pub fn clear_secrets(&mut self) -> &mut Self {
        self.secrets = Some(HashMap::new());
        self
    }

    /// Environment variables, if the map has been initialized
    #[must_use]
    pub fn env(&self) -> Option<&HashMap<String, EnvValue>> {
        self.env.as_ref()
    }

    /// Secret bindings, if the map has been initialized
    #[must_use]
    pub fn secrets(&self) -> Option<&HashMap<String, Secret>> {
        self.secrets.as_ref()
    }

    /// Look up a single environment variable
    #[must_use]
    pub fn env_value(&self, name: &str) -> Option<&EnvValue> {
        self.env.as_ref().and_then(|env| env.get(name))
    }

    /// Look up a secret binding by secret name
    #[must_use]
    pub fn secret(&self, name: &str) -> Option<&Secret> {
        self.secrets.as_ref().and_then(|secrets| secrets.get(name))
    }

    /// Decode an application document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the input is not valid JSON, and
    /// [`Error::Schema`] when the input is valid JSON that does not match
    /// the wire schema. Schema errors carry the dotted path to the field
    /// that failed (e.g. `env.DATABASE_URL`).
    pub fn from_json(input: &str) -> Result<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(input);
        let app = serde_path_to_error::deserialize(&mut deserializer).map_err(Error::decode)?;
        deserializer.end().map_err(|source| Error::Parse { source })?;
        Ok(app)
    }

    /// Decode an application document from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Same as [`Application::from_json`].
    pub fn from_slice(input: &[u8]) -> Result<Self> {
        let mut deserializer = serde_json::Deserializer::from_slice(input);
        let app = serde_path_to_error::deserialize(&mut deserializer).map_err(Error::decode)?;
        deserializer.end().map_err(|source| Error::Parse { source })?;
        Ok(app)
    }

    /// Encode the document as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the serializer fails; a well-formed
    /// document always encodes.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::encode)
    }

    /// Encode the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Same as [`Application::to_json`].
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::encode)
    }
}

impl fmt::Display for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.to_json_pretty().map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
