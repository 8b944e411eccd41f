use anyhow::{Context, Result};
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::client::{Client, ClientConfig, Error as SpannerError};
use gcloud_spanner::statement::Statement;
use std::sync::Arc;

use crate::config::Config;
use crate::models::Record;

/// Outcome of a create operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Outcome of an update or delete operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    NotFound,
}

/// Shareable handle to the record table, for use across async handlers
///
/// All four operations address exactly one row by its key. Uniqueness is
/// enforced by the table's primary key; create runs its existence check and
/// insert inside a single read-write transaction, so concurrent creates for
/// the same key serialize rather than both succeeding.
#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<Client>,
}

impl RecordStore {
    /// Create a new store handle from configuration
    ///
    /// The gcloud-spanner library automatically detects the
    /// SPANNER_EMULATOR_HOST environment variable and connects to the
    /// emulator when set, or production Spanner otherwise.
    ///
    /// Also performs auto-provisioning: the instance, database, and records
    /// table are created if they don't exist.
    pub async fn from_config(config: &Config) -> Result<Self> {
        auto_provision(config).await?;

        let database_path = format!(
            "projects/{}/instances/{}/databases/{}",
            config.spanner_project, config.spanner_instance, config.spanner_database
        );

        if let Some(emulator) = &config.spanner_emulator_host {
            tracing::info!("Connecting to Spanner emulator at: {}", emulator);
        } else {
            tracing::info!("Connecting to production Spanner");
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    /// Look up the record with the given key
    ///
    /// # Returns
    /// * `Ok(Some(record))` - Record found and returned
    /// * `Ok(None)` - No record with that key
    /// * `Err(_)` - Spanner operation failed
    pub async fn get(&self, key: &str) -> Result<Option<Record>> {
        let key_param = key.to_string();

        let mut statement =
            Statement::new("SELECT record_key, record_value FROM records WHERE record_key = @key");
        statement.add_param("key", &key_param);

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query record from Spanner")?;

        if let Some(row) = result_set.next().await? {
            let key: String = row.column_by_name("record_key")?;
            let value: String = row.column_by_name("record_value")?;

            tracing::debug!("Read record with key: {}", key);
            Ok(Some(Record { key, value }))
        } else {
            tracing::debug!("Record not found with key: {}", key);
            Ok(None)
        }
    }

    /// Insert a new record, refusing to overwrite an existing one
    ///
    /// The existence check and the insert run in one read-write transaction
    /// and therefore observe the same snapshot of the table.
    pub async fn create(&self, key: &str, value: &str) -> Result<CreateOutcome> {
        let key_param = key.to_string();
        let value_param = value.to_string();

        let result: Result<_, SpannerError> = self
            .inner
            .read_write_transaction(|tx| {
                let key = key_param.clone();
                let value = value_param.clone();
                Box::pin(async move {
                    let mut lookup =
                        Statement::new("SELECT record_key FROM records WHERE record_key = @key");
                    lookup.add_param("key", &key);

                    let mut rows = tx.query(lookup).await?;
                    if rows.next().await?.is_some() {
                        return Ok(CreateOutcome::AlreadyExists);
                    }

                    let mut insert = Statement::new(
                        "INSERT INTO records (record_key, record_value) VALUES (@key, @value)",
                    );
                    insert.add_param("key", &key);
                    insert.add_param("value", &value);
                    tx.update(insert).await?;

                    Ok(CreateOutcome::Created)
                })
            })
            .await;

        let (_, outcome) = result.context("Failed to insert record into Spanner")?;

        tracing::debug!("Create for key {}: {:?}", key, outcome);
        Ok(outcome)
    }

    /// Replace the value of an existing record
    ///
    /// A single UPDATE statement addresses the row; zero affected rows means
    /// no record with that key exists.
    pub async fn update(&self, key: &str, new_value: &str) -> Result<WriteOutcome> {
        let key_param = key.to_string();
        let value_param = new_value.to_string();

        let result: Result<_, SpannerError> = self
            .inner
            .read_write_transaction(|tx| {
                let key = key_param.clone();
                let value = value_param.clone();
                Box::pin(async move {
                    let mut statement = Statement::new(
                        "UPDATE records SET record_value = @value WHERE record_key = @key",
                    );
                    statement.add_param("key", &key);
                    statement.add_param("value", &value);
                    Ok(tx.update(statement).await?)
                })
            })
            .await;

        let (_, affected) = result.context("Failed to update record in Spanner")?;

        let outcome = if affected == 0 {
            WriteOutcome::NotFound
        } else {
            WriteOutcome::Applied
        };
        tracing::debug!("Update for key {}: {:?}", key, outcome);
        Ok(outcome)
    }

    /// Remove the record with the given key
    ///
    /// A single DELETE statement addresses the row; zero affected rows means
    /// no record with that key exists.
    pub async fn delete(&self, key: &str) -> Result<WriteOutcome> {
        let key_param = key.to_string();

        let result: Result<_, SpannerError> = self
            .inner
            .read_write_transaction(|tx| {
                let key = key_param.clone();
                Box::pin(async move {
                    let mut statement =
                        Statement::new("DELETE FROM records WHERE record_key = @key");
                    statement.add_param("key", &key);
                    Ok(tx.update(statement).await?)
                })
            })
            .await;

        let (_, affected) = result.context("Failed to delete record from Spanner")?;

        let outcome = if affected == 0 {
            WriteOutcome::NotFound
        } else {
            WriteOutcome::Applied
        };
        tracing::debug!("Delete for key {}: {:?}", key, outcome);
        Ok(outcome)
    }

    /// Perform a health check by executing a simple query
    ///
    /// # Returns
    /// * `Ok(())` - Database is reachable and responsive
    /// * `Err(_)` - Database connection failed or query failed
    pub async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

/// Automatically provision the Spanner instance, database, and records table
///
/// Checks whether the configured resources exist and creates them if needed,
/// enabling zero-setup local development with the emulator.
async fn auto_provision(config: &Config) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.spanner_project);
    let instance_path = format!("{}/instances/{}", project_path, config.spanner_instance);
    let database_path = format!("{}/databases/{}", instance_path, config.spanner_database);

    ensure_instance_exists(&admin_client, config, &project_path, &instance_path).await?;
    ensure_database_exists(&admin_client, &instance_path, &database_path).await?;
    ensure_table_exists(&admin_client, &database_path).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// Ensure the Spanner instance exists, creating it if necessary
async fn ensure_instance_exists(
    admin_client: &AdminClient,
    config: &Config,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let get_request = GetInstanceRequest {
        name: instance_path.to_string(),
        field_mask: None,
    };

    match admin_client.instance().get_instance(get_request, None).await {
        Ok(_) => {
            tracing::info!("Instance already exists: {}", instance_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Instance not found, creating: {}", instance_path);

            let instance_config = if config.spanner_emulator_host.is_some() {
                format!("{}/instanceConfigs/emulator-config", project_path)
            } else {
                format!("{}/instanceConfigs/regional-us-central1", project_path)
            };

            let create_request = CreateInstanceRequest {
                parent: project_path.to_string(),
                instance_id: config.spanner_instance.clone(),
                instance: Some(Instance {
                    name: instance_path.to_string(),
                    config: instance_config,
                    display_name: format!("{} instance", config.spanner_instance),
                    node_count: 1,
                    ..Default::default()
                }),
            };

            let mut operation = admin_client
                .instance()
                .create_instance(create_request, None)
                .await
                .context("Failed to start instance creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create instance")?;

            tracing::info!("Instance created successfully: {}", instance_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check instance existence: {}",
            e.message()
        )),
    }
}

/// Ensure the Spanner database exists, creating it if necessary
async fn ensure_database_exists(
    admin_client: &AdminClient,
    instance_path: &str,
    database_path: &str,
) -> Result<()> {
    let get_request = GetDatabaseRequest {
        name: database_path.to_string(),
    };

    match admin_client.database().get_database(get_request, None).await {
        Ok(_) => {
            tracing::info!("Database already exists: {}", database_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Database not found, creating: {}", database_path);

            let database_id = database_path
                .split('/')
                .next_back()
                .context("Invalid database path")?;

            let create_request = CreateDatabaseRequest {
                parent: instance_path.to_string(),
                create_statement: format!("CREATE DATABASE `{}`", database_id),
                extra_statements: vec![],
                encryption_config: None,
                database_dialect: 1, // Google Standard SQL
                proto_descriptors: vec![],
            };

            let mut operation = admin_client
                .database()
                .create_database(create_request, None)
                .await
                .context("Failed to start database creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create database")?;

            tracing::info!("Database created successfully: {}", database_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check database existence: {}",
            e.message()
        )),
    }
}

/// Ensure the records table exists, creating it if necessary
async fn ensure_table_exists(admin_client: &AdminClient, database_path: &str) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    let table_exists = ddl_response
        .into_inner()
        .statements
        .iter()
        .any(|stmt| stmt.contains("CREATE TABLE records") || stmt.contains("CREATE TABLE `records`"));

    if table_exists {
        tracing::info!("Table 'records' already exists");
        Ok(())
    } else {
        tracing::info!("Table 'records' not found, creating...");

        let create_table_ddl = r#"
CREATE TABLE records (
    record_key STRING(MAX) NOT NULL,
    record_value STRING(MAX) NOT NULL,
) PRIMARY KEY (record_key)
"#
        .trim()
        .to_string();

        let update_request = UpdateDatabaseDdlRequest {
            database: database_path.to_string(),
            statements: vec![create_table_ddl],
            operation_id: String::new(),
            proto_descriptors: vec![],
            throughput_mode: false,
        };

        let mut operation = admin_client
            .database()
            .update_database_ddl(update_request, None)
            .await
            .context("Failed to start table creation")?;

        operation.wait(None).await.context("Failed to create table")?;

        tracing::info!("Table 'records' created successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_is_clonable() {
        // Clone is required for sharing the handle across Axum handlers
        fn assert_clone<T: Clone>() {}
        assert_clone::<RecordStore>();
    }

    #[test]
    fn store_is_send_sync() {
        // Send + Sync are required for use in async handlers
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RecordStore>();
    }

    /// Connect to the local emulator, or None when it is not running
    async fn emulator_store(instance: &str, database: &str) -> Option<RecordStore> {
        unsafe {
            std::env::set_var("SPANNER_EMULATOR_HOST", "localhost:9010");
        }

        let config = Config {
            spanner_emulator_host: Some("localhost:9010".to_string()),
            spanner_project: "test-project".to_string(),
            spanner_instance: instance.to_string(),
            spanner_database: database.to_string(),
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
        };

        RecordStore::from_config(&config).await.ok()
    }

    fn cleanup_env() {
        unsafe {
            std::env::remove_var("SPANNER_EMULATOR_HOST");
        }
    }

    #[tokio::test]
    async fn record_lifecycle() {
        let _env = crate::test_util::env_guard();
        let Some(store) = emulator_store("store-lifecycle-instance", "store-lifecycle-db").await
        else {
            println!("Record lifecycle test skipped (emulator may not be running)");
            cleanup_env();
            return;
        };

        let key = "lifecycle-alpha";

        // Absent key: every operation reports not-found
        assert_eq!(store.get(key).await.unwrap(), None);
        assert_eq!(store.update(key, "1").await.unwrap(), WriteOutcome::NotFound);
        assert_eq!(store.delete(key).await.unwrap(), WriteOutcome::NotFound);

        // Create then read returns the written pair
        assert_eq!(store.create(key, "1").await.unwrap(), CreateOutcome::Created);
        let record = store.get(key).await.unwrap().unwrap();
        assert_eq!(record.key, key);
        assert_eq!(record.value, "1");

        // Update replaces the value but never the key
        assert_eq!(store.update(key, "2").await.unwrap(), WriteOutcome::Applied);
        let record = store.get(key).await.unwrap().unwrap();
        assert_eq!(record.key, key);
        assert_eq!(record.value, "2");

        // Delete removes the row; a second delete reports not-found
        assert_eq!(store.delete(key).await.unwrap(), WriteOutcome::Applied);
        assert_eq!(store.get(key).await.unwrap(), None);
        assert_eq!(store.delete(key).await.unwrap(), WriteOutcome::NotFound);

        cleanup_env();
    }

    #[tokio::test]
    async fn create_conflict_keeps_existing_value() {
        let _env = crate::test_util::env_guard();
        let Some(store) = emulator_store("store-conflict-instance", "store-conflict-db").await
        else {
            println!("Create conflict test skipped (emulator may not be running)");
            cleanup_env();
            return;
        };

        let key = "conflict-beta";
        let _ = store.delete(key).await;

        assert_eq!(store.create(key, "x").await.unwrap(), CreateOutcome::Created);
        assert_eq!(
            store.create(key, "y").await.unwrap(),
            CreateOutcome::AlreadyExists
        );

        let record = store.get(key).await.unwrap().unwrap();
        assert_eq!(record.value, "x");

        cleanup_env();
    }

    #[tokio::test]
    async fn provisioning_is_idempotent() {
        let _env = crate::test_util::env_guard();
        let first = emulator_store("store-idempotent-instance", "store-idempotent-db").await;

        if first.is_some() {
            let second =
                emulator_store("store-idempotent-instance", "store-idempotent-db").await;
            assert!(second.is_some(), "Second provisioning pass should succeed");
        } else {
            println!("Provisioning test skipped (emulator may not be running)");
        }

        cleanup_env();
    }
}
