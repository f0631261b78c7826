#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("token store io error: {0}")]
    Io(String),
    #[error("token store data corrupted: {0}")]
    Corrupted(String),
}
