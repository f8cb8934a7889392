//! Clients and their estimates, kept in one JSON file.
//!
//! The file has the shape `{ "clients": [...] }`. Each client carries its
//! estimates nested under `estimates`. Clients and estimates are open
//! records: fields the store does not know about are kept as they are and
//! merged on update.
//!
//! Field values are kept as whatever JSON the file holds; only `id` has to
//! be a string or a number. A missing file reads as an empty list, and so
//! does an unparsable one when listing. Changes refuse to run against a
//! file that exists but cannot be parsed, so it is never overwritten. Every
//! write rewrites the whole file, pretty-printed.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Random characters after the timestamp in generated ids.
const ID_SUFFIX_LEN: usize = 9;

/// Fields the store manages itself; updates never overwrite them.
const MANAGED_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

#[derive(Debug, Error, PartialEq)]
pub enum ClientStoreError {
    #[error("Client not found")]
    ClientNotFound,

    #[error("Estimate not found")]
    EstimateNotFound,

    #[error("Client file I/O error: {0}")]
    Io(String),

    #[error("Client data error: {0}")]
    Serialization(String),

    #[error("Client file cannot be parsed: {0}")]
    Corrupt(String),
}

impl From<serde_json::Error> for ClientStoreError {
    fn from(err: serde_json::Error) -> Self {
        ClientStoreError::Serialization(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Value>,
    #[serde(default)]
    pub estimates: Vec<ClientEstimate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An estimate saved against a client. Its content is free-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEstimate {
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Value>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

/// Contact fields repeated next to each estimate in the flattened list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub phone: Option<Value>,
    pub company: Option<Value>,
    pub address: Option<Value>,
    pub website: Option<Value>,
}

/// An estimate together with the client it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateWithCustomer {
    #[serde(flatten)]
    pub estimate: ClientEstimate,
    pub client_id: String,
    pub customer: Customer,
}

impl Client {
    fn customer(&self) -> Customer {
        Customer {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            company: self.company.clone(),
            address: self.address.clone(),
            website: self.website.clone(),
        }
    }
}

/// Ids written by hand are sometimes numbers.
fn record_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {other}"
        ))),
    }
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ClientFile {
    clients: Vec<Client>,
}

/// `<prefix>_<unix millis>_<9 random characters>`
pub fn generate_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{prefix}_{}_{}",
        Utc::now().timestamp_millis(),
        &suffix[..ID_SUFFIX_LEN]
    )
}

/// Shallow merge of `updates` into `current`. Keys in `managed` are skipped.
fn merge<T: Serialize + DeserializeOwned>(
    current: &T,
    updates: &Map<String, Value>,
    managed: &[&str],
) -> Result<T, ClientStoreError> {
    let mut value = serde_json::to_value(current)?;
    if let Value::Object(fields) = &mut value {
        for (key, update) in updates {
            if !managed.contains(&key.as_str()) {
                fields.insert(key.clone(), update.clone());
            }
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Builds a record from request fields plus the managed ones.
fn build<T: DeserializeOwned>(
    fields: &Map<String, Value>,
    managed: Map<String, Value>,
) -> Result<T, ClientStoreError> {
    let mut record = fields.clone();
    record.extend(managed);
    Ok(serde_json::from_value(Value::Object(record))?)
}

pub struct ClientStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl ClientStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file as stored. A missing file is an empty list.
    async fn load(&self) -> Result<ClientFile, ClientStoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Client file does not exist yet");
                return Ok(ClientFile::default());
            }
            Err(e) => return Err(ClientStoreError::Io(e.to_string())),
        };

        serde_json::from_str(&text).map_err(|e| ClientStoreError::Corrupt(e.to_string()))
    }

    /// Like [`Self::load`], but a broken file reads as empty.
    async fn read(&self) -> ClientFile {
        self.load().await.unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Failed to read client file");
            ClientFile::default()
        })
    }

    async fn write(
        &self,
        file: &ClientFile,
    ) -> Result<(), ClientStoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| ClientStoreError::Io(e.to_string()))?;
        }
        let text = serde_json::to_string_pretty(file)?;
        tokio::fs::write(&self.path, text)
            .await
            .map_err(|e| ClientStoreError::Io(e.to_string()))
    }

    // ── clients ──

    pub async fn list(&self) -> Vec<Client> {
        self.read().await.clients
    }

    pub async fn get(
        &self,
        id: &str,
    ) -> Result<Client, ClientStoreError> {
        self.load()
            .await?
            .clients
            .into_iter()
            .find(|c| c.id == id)
            .ok_or(ClientStoreError::ClientNotFound)
    }

    /// Stores a new client with a generated id, the creation time and no
    /// estimates.
    pub async fn create(
        &self,
        fields: &Map<String, Value>,
    ) -> Result<Client, ClientStoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        let mut managed = Map::new();
        managed.insert("id".into(), Value::String(generate_id("client")));
        managed.insert("createdAt".into(), now());
        managed.insert("estimates".into(), Value::Array(Vec::new()));
        managed.insert("updatedAt".into(), Value::Null);
        let client: Client = build(fields, managed)?;

        file.clients.push(client.clone());
        self.write(&file).await?;
        info!(client_id = %client.id, "Client created");
        Ok(client)
    }

    /// Merges `updates` into the client. `id` and `createdAt` are kept;
    /// `updatedAt` is set to now.
    pub async fn update(
        &self,
        id: &str,
        updates: &Map<String, Value>,
    ) -> Result<Client, ClientStoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        let client = file
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ClientStoreError::ClientNotFound)?;
        let mut updated = merge(&*client, updates, &MANAGED_FIELDS)?;
        updated.updated_at = Some(now());
        *client = updated.clone();

        self.write(&file).await?;
        info!(client_id = %id, "Client updated");
        Ok(updated)
    }

    pub async fn delete(
        &self,
        id: &str,
    ) -> Result<(), ClientStoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        let index = file
            .clients
            .iter()
            .position(|c| c.id == id)
            .ok_or(ClientStoreError::ClientNotFound)?;
        file.clients.remove(index);

        self.write(&file).await?;
        info!(client_id = %id, "Client deleted");
        Ok(())
    }

    // ── estimates ──

    /// Every estimate of every client, with the client's contacts attached.
    pub async fn all_estimates(&self) -> Vec<EstimateWithCustomer> {
        self.read()
            .await
            .clients
            .iter()
            .flat_map(|client| {
                client.estimates.iter().map(|estimate| EstimateWithCustomer {
                    estimate: estimate.clone(),
                    client_id: client.id.clone(),
                    customer: client.customer(),
                })
            })
            .collect()
    }

    pub async fn add_estimate(
        &self,
        client_id: &str,
        fields: &Map<String, Value>,
    ) -> Result<ClientEstimate, ClientStoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        let client = file
            .clients
            .iter_mut()
            .find(|c| c.id == client_id)
            .ok_or(ClientStoreError::ClientNotFound)?;

        let created = now();
        let mut managed = Map::new();
        managed.insert("id".into(), Value::String(generate_id("estimate")));
        managed.insert("createdAt".into(), created.clone());
        managed.insert("updatedAt".into(), created);
        let estimate: ClientEstimate = build(fields, managed)?;
        client.estimates.push(estimate.clone());

        self.write(&file).await?;
        info!(client_id, estimate_id = %estimate.id, "Client estimate saved");
        Ok(estimate)
    }

    pub async fn update_estimate(
        &self,
        client_id: &str,
        estimate_id: &str,
        updates: &Map<String, Value>,
    ) -> Result<ClientEstimate, ClientStoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        let estimate = file
            .clients
            .iter_mut()
            .find(|c| c.id == client_id)
            .ok_or(ClientStoreError::ClientNotFound)?
            .estimates
            .iter_mut()
            .find(|e| e.id == estimate_id)
            .ok_or(ClientStoreError::EstimateNotFound)?;
        let mut updated = merge(&*estimate, updates, &MANAGED_FIELDS)?;
        updated.updated_at = Some(now());
        *estimate = updated.clone();

        self.write(&file).await?;
        info!(client_id, estimate_id, "Client estimate updated");
        Ok(updated)
    }

    pub async fn delete_estimate(
        &self,
        client_id: &str,
        estimate_id: &str,
    ) -> Result<(), ClientStoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        let estimates = &mut file
            .clients
            .iter_mut()
            .find(|c| c.id == client_id)
            .ok_or(ClientStoreError::ClientNotFound)?
            .estimates;
        let index = estimates
            .iter()
            .position(|e| e.id == estimate_id)
            .ok_or(ClientStoreError::EstimateNotFound)?;
        estimates.remove(index);

        self.write(&file).await?;
        info!(client_id, estimate_id, "Client estimate deleted");
        Ok(())
    }
}
