use std::{
    task::{Context, Poll},
    time::Instant,
};

use futures::future::BoxFuture;
use tower::{Layer, Service};
use uuid::Uuid;

use crate::config::HeaderMaskingConfig;
use crate::consts;

/// Logs every request passing through a tower stack (gRPC or HTTP alike)
/// under a per-request ID, with headers masked per the configured
/// allow-list.
#[derive(Clone, Default)]
pub struct LoggingLayer {
    masking: HeaderMaskingConfig,
}

impl LoggingLayer {
    pub fn new(masking: HeaderMaskingConfig) -> Self {
        Self { masking }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, service: S) -> Self::Service {
        LoggingService {
            inner: service,
            masking: self.masking.clone(),
        }
    }
}

#[derive(Clone)]
pub struct LoggingService<S> {
    inner: S,
    masking: HeaderMaskingConfig,
}

impl<S, ReqBody, ResBody> Service<http::Request<ReqBody>> for LoggingService<S>
where
    S: Service<http::Request<ReqBody>, Response = http::Response<ResBody>>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: http::Request<ReqBody>) -> Self::Future {
        let mut inner = self.inner.clone();
        let masking = self.masking.clone();
        let start_time = Instant::now();

        Box::pin(async move {
            let request_id = request
                .headers()
                .get(consts::X_REQUEST_ID)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let path = request.uri().path().to_owned();
            let headers = masking.mask_headers(request.headers());

            tracing::info!(
                request_id = %request_id,
                path = %path,
                headers = ?headers,
                "request received"
            );

            let response = inner.call(request).await;

            let duration = start_time.elapsed();

            match &response {
                Ok(res) => {
                    tracing::info!(
                        request_id = %request_id,
                        path = %path,
                        status = %res.status(),
                        duration_ms = %duration.as_millis(),
                        "request completed"
                    );
                }
                Err(_) => {
                    tracing::error!(
                        request_id = %request_id,
                        path = %path,
                        duration_ms = %duration.as_millis(),
                        "request failed"
                    );
                }
            }

            response
        })
    }
}
