use aws_sdk_dynamodb::error::SdkError;

// Classifies an SDK failure as (retryable, reason). DynamoDB and S3 share the smithy error type,
// so the same classification feeds both stores.
pub(crate) fn retryable_sdk_error<T>(err: &SdkError<T>) -> (bool, Option<String>) {
    match err {
        SdkError::ConstructionFailure(_) => { (false, Some("ConstructionFailure".to_string())) }
        SdkError::TimeoutError(_) => { (true, Some("TimeoutError".to_string())) }
        SdkError::DispatchFailure(_) => { (true, Some("DispatchFailure".to_string())) }
        SdkError::ResponseError { .. } => { (true, Some("ResponseError".to_string())) }
        SdkError::ServiceError(ctx) => {
            (ctx.raw().http().status().is_server_error() || has_exceeded_limit(ctx.raw().http().body().bytes()), Some(ctx.raw().http().status().to_string()))
        }
        _ => { (true, Some("Unknown".to_string())) }
    }
}

// HTTP status of a service error, if the request reached the service at all
pub(crate) fn service_status<T>(err: &SdkError<T>) -> Option<u16> {
    match err {
        SdkError::ServiceError(ctx) => Some(ctx.raw().http().status().as_u16()),
        _ => None,
    }
}

fn has_exceeded_limit(opts: Option<&[u8]>) -> bool {
    if let Some(b) = opts {
        return b.windows(6).any(|w| w == b"ceeded");
    }
    false
}

#[cfg(test)]
mod tests {
    use crate::utils::aws::has_exceeded_limit;

    #[tokio::test]
    async fn test_should_detect_exceeded_limit() {
        assert!(has_exceeded_limit(Some(b"ProvisionedThroughputExceededException")));
        assert!(!has_exceeded_limit(Some(b"ok")));
        assert!(!has_exceeded_limit(None));
    }
}
