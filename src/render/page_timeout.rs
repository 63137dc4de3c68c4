//! Timeout utilities for page operations
//!
//! Async timeout wrappers that keep a stuck navigation or evaluation from
//! hanging the whole run.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

use super::BrowserPage;
use crate::errors::VisitError;

/// Wrap an async page operation with an explicit timeout
///
/// Returns distinct messages for the timeout and for the operation failing.
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "{operation_name} timeout after {} ms",
            timeout.as_millis()
        )),
    }
}

/// Navigate `page` to `url`, classifying failures as `VisitError`s
pub async fn goto_with_timeout<P>(page: &P, url: &str, timeout: Duration) -> Result<(), VisitError>
where
    P: BrowserPage + ?Sized,
{
    match tokio::time::timeout(timeout, page.goto(url)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(VisitError::Navigation {
            url: url.to_string(),
            message: format!("{e:#}"),
        }),
        Err(_) => Err(VisitError::Timeout {
            url: url.to_string(),
            timeout,
        }),
    }
}
