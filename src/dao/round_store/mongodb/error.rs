use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

/// Result alias returning [`MongoDaoError`] failures.
pub type MongoResult<T> = Result<T, MongoDaoError>;

/// Failures that can occur while interacting with MongoDB.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// The connection URI could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// The offending URI.
        uri: String,
        #[source]
        /// Driver-level cause.
        source: MongoError,
    },
    /// Building the client from parsed options failed.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        /// Driver-level cause.
        source: MongoError,
    },
    /// The initial ping never succeeded within the retry budget.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Number of attempts made before giving up.
        attempts: u32,
        #[source]
        /// Driver-level cause.
        source: MongoError,
    },
    /// A routine ping against an established connection failed.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        /// Driver-level cause.
        source: MongoError,
    },
    /// Index bootstrap failed at connect time.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Collection carrying the index.
        collection: &'static str,
        /// Index name.
        index: &'static str,
        #[source]
        /// Driver-level cause.
        source: MongoError,
    },
    /// Writing a round document failed.
    #[error("failed to save round `{id}`")]
    SaveRound {
        /// Round primary key.
        id: Uuid,
        #[source]
        /// Driver-level cause.
        source: MongoError,
    },
    /// Reading a round document failed.
    #[error("failed to load round `{id}`")]
    LoadRound {
        /// Round primary key.
        id: Uuid,
        #[source]
        /// Driver-level cause.
        source: MongoError,
    },
    /// Listing a user's rounds failed.
    #[error("failed to list rounds for user `{user_id}`")]
    ListRounds {
        /// Owner whose rounds were requested.
        user_id: String,
        #[source]
        /// Driver-level cause.
        source: MongoError,
    },
    /// Deleting a round document failed.
    #[error("failed to delete round `{id}`")]
    DeleteRound {
        /// Round primary key.
        id: Uuid,
        #[source]
        /// Driver-level cause.
        source: MongoError,
    },
    /// Required environment variable is missing.
    #[error("missing MongoDB environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the missing variable.
        var: &'static str,
    },
}
