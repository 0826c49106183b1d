use mongodb::error::Error as MongoError;
use thiserror::Error;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures raised by the MongoDB plate store.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// The connection string could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// Rejected connection string.
        uri: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The driver refused the parsed client options.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The server never answered a ping while connecting.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Number of pings sent before giving up.
        attempts: u32,
        /// Error from the last ping.
        #[source]
        source: MongoError,
    },
    /// A ping on an established connection failed.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Creating the plate index failed.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Collection holding plate records.
        collection: String,
        /// Index name.
        index: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Inserting a plate record failed.
    #[error("failed to insert plate `{plate}`")]
    InsertPlate {
        /// Plate being registered.
        plate: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Looking up records for a plate failed.
    #[error("failed to query plate `{plate}`")]
    FindPlate {
        /// Plate being looked up.
        plate: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
}
