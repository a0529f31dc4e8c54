use async_trait::async_trait;
use course_core::model::{ProgressKey, ProgressRecord};

use crate::repository::{LocalProgressRepository, StorageError, decode, encode};

use super::SqliteRepository;

fn conn(err: sqlx::Error) -> StorageError {
    StorageError::Connection(err.to_string())
}

#[async_trait]
impl LocalProgressRepository for SqliteRepository {
    async fn load_progress(&self, key: &ProgressKey) -> Result<Option<ProgressRecord>, StorageError> {
        let key = key.to_string();
        let raw = self.get_raw(&key).await.map_err(conn)?;
        raw.map(|raw| decode(&key, &raw)).transpose()
    }

    async fn save_progress(&self, key: &ProgressKey, record: &ProgressRecord) -> Result<(), StorageError> {
        let value = encode(record)?;
        self.put_raw(&key.to_string(), &value).await.map_err(conn)
    }
}
