use medias_core::AppError;
use std::future::Future;
use std::time::Duration;

/// Run `fut` under a deadline. On expiry the future is dropped, which cancels any in-flight
/// query or presign call and rolls back an open transaction.
pub async fn with_deadline<F>(deadline: Duration, fut: F) -> Result<F::Output, AppError>
where
    F: Future,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(output) => Ok(output),
        Err(_) => {
            tracing::warn!(
                deadline_ms = deadline.as_millis() as u64,
                "Workflow exceeded its deadline"
            );
            Err(AppError::Internal {
                message: "request deadline exceeded".to_string(),
                details: Some(format!("no result after {}ms", deadline.as_millis())),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medias_core::ErrorKind;

    #[tokio::test]
    async fn returns_output_before_deadline() {
        let value = with_deadline(Duration::from_secs(1), async { 7 }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_deadline_is_internal() {
        let err = with_deadline(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.message(), "request deadline exceeded");
    }
}
