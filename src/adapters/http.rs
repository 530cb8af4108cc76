//! Local HTTP transport for the relay, built on axum.

use crate::core::relay::ContactRelay;
use crate::core::{ConfigProvider, EmailSender, RelayRequest, RelayResponse, RequestBody};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;

/// Paths the contact form may post to. Both share one handler.
pub const CONTACT_PATHS: [&str; 2] = ["/api/contact", "/api/send-email"];

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.body)).into_response();

        for (name, value) in &self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => tracing::warn!("Dropping invalid response header: {}", name),
            }
        }

        response
    }
}

async fn relay_handler<S, C>(
    State(relay): State<Arc<ContactRelay<S, C>>>,
    method: Method,
    body: Bytes,
) -> RelayResponse
where
    S: EmailSender + 'static,
    C: ConfigProvider + 'static,
{
    let request = RelayRequest::new(method.as_str(), RequestBody::from_bytes(&body));
    relay.handle(request).await
}

pub fn router<S, C>(relay: Arc<ContactRelay<S, C>>) -> Router
where
    S: EmailSender + 'static,
    C: ConfigProvider + 'static,
{
    CONTACT_PATHS
        .iter()
        .fold(Router::new(), |router, path| {
            router.route(path, any(relay_handler::<S, C>))
        })
        .with_state(relay)
}

pub async fn serve<S, C>(relay: Arc<ContactRelay<S, C>>, bind: SocketAddr) -> std::io::Result<()>
where
    S: EmailSender + 'static,
    C: ConfigProvider + 'static,
{
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(
        "Contact relay listening on http://{} ({})",
        listener.local_addr()?,
        CONTACT_PATHS.join(", ")
    );

    axum::serve(listener, router(relay)).await
}
