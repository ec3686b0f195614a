//! Connection factory.
//!
//! Every store operation opens its own connection and releases it when done;
//! there is no pool. Callers pair [`connect`] with [`release`] on the success
//! path, and `PgConnection`'s `Drop` closes the socket on every other path.

use sqlx::{Connection, PgConnection};

use crate::config::DbConfig;
use crate::error::TodoError;

/// Open a connection and verify it answers a ping before handing it out.
pub async fn connect(config: &DbConfig) -> Result<PgConnection, TodoError> {
    let mut connection = PgConnection::connect_with(&config.connect_options())
        .await
        .map_err(TodoError::Connection)?;

    if let Err(error) = connection.ping().await {
        release(connection).await;
        return Err(TodoError::Connection(error));
    }

    tracing::trace!(host = %config.host, port = config.port, dbname = %config.dbname, "database connection opened");
    Ok(connection)
}

/// Close gracefully. A failed close has nothing left to protect, so it is
/// only logged.
pub async fn release(connection: PgConnection) {
    if let Err(error) = connection.close().await {
        tracing::debug!(%error, "closing database connection failed");
    }
}
