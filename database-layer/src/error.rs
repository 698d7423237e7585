use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("{entity} with id {id} does not exist")]
    NotFound { entity: &'static str, id: i32 },

    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
