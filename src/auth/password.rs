use crate::error::DeskError;

/// bcrypt is CPU-bound; keep it off the async workers.
pub async fn hash_password(password: String) -> Result<String, DeskError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| DeskError::UnexpectedError(format!("hash task failed: {e}")))?
        .map_err(DeskError::from)
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, DeskError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| DeskError::UnexpectedError(format!("verify task failed: {e}")))?
        .map_err(DeskError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("Frontdesk2024".to_string()).await.unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("Frontdesk2024".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("frontdesk2024".to_string(), hash).await.unwrap());
    }
}
