use mongodb::options::ClientOptions;

use super::error::{MongoDaoError, MongoResult};

const DEFAULT_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DB: &str = "plate_registry";

/// Connection settings for the MongoDB plate store.
#[derive(Clone)]
pub struct MongoConfig {
    /// Driver options parsed from the connection string.
    pub options: ClientOptions,
    /// Database holding the plate collection.
    pub database_name: String,
    /// Collection plate records are written to.
    pub collection_name: String,
}

impl MongoConfig {
    /// Parse `uri`; `db_name` defaults to `plate_registry`.
    pub async fn from_uri(
        uri: &str,
        db_name: Option<&str>,
        collection_name: impl Into<String>,
    ) -> MongoResult<Self> {
        let database_name = db_name.unwrap_or(DEFAULT_DB).to_owned();
        let options =
            ClientOptions::parse(uri)
                .await
                .map_err(|source| MongoDaoError::InvalidUri {
                    uri: uri.to_owned(),
                    source,
                })?;

        Ok(Self {
            options,
            database_name,
            collection_name: collection_name.into(),
        })
    }

    /// Read `MONGO_URI` and `MONGO_DB`, falling back to a local server.
    pub async fn from_env(collection_name: impl Into<String>) -> MongoResult<Self> {
        let uri = std::env::var("MONGO_URI").unwrap_or_else(|_| DEFAULT_URI.into());
        let db = std::env::var("MONGO_DB").ok();
        Self::from_uri(&uri, db.as_deref(), collection_name).await
    }
}
