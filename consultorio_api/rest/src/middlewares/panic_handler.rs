use std::panic::AssertUnwindSafe;

use anyhow::anyhow;
use axum::{
    extract::Request,
    middleware::{from_fn, Next},
    Router,
};
use futures::FutureExt;

use crate::routes::internal_server_error;

/// Turn a panicking handler into the regular internal error response.
pub fn add<S: Clone + Send + Sync + 'static>(
    error_details: bool,
) -> impl FnOnce(Router<S>) -> Router<S> {
    move |router| {
        router.layer(from_fn(move |request: Request, next: Next| async move {
            match AssertUnwindSafe(next.run(request)).catch_unwind().await {
                Ok(response) => response,
                Err(_) => internal_server_error(anyhow!("request handler panicked"), error_details),
            }
        }))
    }
}
