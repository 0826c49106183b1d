const DEFAULT_BASE_URL: &str = "http://localhost:5984";

/// Runtime configuration describing how to connect to CouchDB.
#[derive(Debug, Clone)]
pub struct CouchConfig {
    /// Server root, without a trailing slash.
    pub base_url: String,
    /// Database holding plate documents.
    pub database: String,
    /// Basic-auth user.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
}

impl CouchConfig {
    /// Construct a configuration from explicit base URL and database name.
    pub fn new(base_url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            database: database.into(),
            username: None,
            password: None,
        }
    }

    /// Attach basic-auth credentials to the configuration.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Build a configuration from the environment.
    ///
    /// CouchDB has no collections inside a database, so the plate collection name doubles as
    /// the database name unless `COUCH_DB` overrides it.
    pub fn from_env(collection: &str) -> Self {
        let base_url =
            std::env::var("COUCH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let database = std::env::var("COUCH_DB").unwrap_or_else(|_| collection.to_owned());

        let mut config = Self::new(base_url, database);

        if let (Some(username), Some(password)) = (
            std::env::var("COUCH_USERNAME").ok(),
            std::env::var("COUCH_PASSWORD").ok(),
        ) {
            config = config.with_credentials(username, password);
        }

        config
    }
}
