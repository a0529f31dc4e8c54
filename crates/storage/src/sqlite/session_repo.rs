use async_trait::async_trait;
use course_core::model::SessionContext;

use crate::repository::{SESSION_KEY, SessionRepository, StorageError, decode, encode};

use super::SqliteRepository;

fn conn(err: sqlx::Error) -> StorageError {
    StorageError::Connection(err.to_string())
}

#[async_trait]
impl SessionRepository for SqliteRepository {
    async fn current_session(&self) -> Result<Option<SessionContext>, StorageError> {
        let raw = self.get_raw(SESSION_KEY).await.map_err(conn)?;
        raw.map(|raw| decode(SESSION_KEY, &raw)).transpose()
    }

    async fn save_session(&self, session: &SessionContext) -> Result<(), StorageError> {
        let value = encode(session)?;
        self.put_raw(SESSION_KEY, &value).await.map_err(conn)
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        self.remove_raw(SESSION_KEY).await.map_err(conn)
    }
}
