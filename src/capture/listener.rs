//! CDP Network-domain wiring: one tokio task per event stream, both feeding
//! the shared [`EndpointCollector`].

use crate::capture::collector::EndpointCollector;
use crate::error::DiscoveryError;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventRequestWillBeSent, EventResponseReceived,
};
use chromiumoxide::Page;
use futures::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Listener tasks stay alive for the whole run; abort them before snapshot.
pub struct CaptureHandles {
    tasks: Vec<JoinHandle<()>>,
}

impl CaptureHandles {
    pub fn detach(self) {
        for task in self.tasks {
            task.abort();
        }
    }
}

/// Enable the Network domain on `page` and start forwarding request and
/// response events into `collector`.
pub async fn attach(
    page: &Page,
    collector: Arc<EndpointCollector>,
) -> Result<CaptureHandles, DiscoveryError> {
    page.execute(EnableParams::default())
        .await
        .map_err(|e| DiscoveryError::CaptureFailed(format!("Network.enable: {}", e)))?;

    let mut requests = page
        .event_listener::<EventRequestWillBeSent>()
        .await
        .map_err(|e| DiscoveryError::CaptureFailed(format!("request listener: {}", e)))?;
    let mut responses = page
        .event_listener::<EventResponseReceived>()
        .await
        .map_err(|e| DiscoveryError::CaptureFailed(format!("response listener: {}", e)))?;

    let request_collector = Arc::clone(&collector);
    let request_task = tokio::spawn(async move {
        while let Some(event) = requests.next().await {
            debug!("request: {} {}", event.request.method, event.request.url);
            request_collector
                .record_request(
                    event.request_id.inner(),
                    &event.request.method,
                    &event.request.url,
                )
                .await;
        }
    });

    let response_task = tokio::spawn(async move {
        while let Some(event) = responses.next().await {
            collector
                .record_response(
                    event.request_id.inner(),
                    &event.response.url,
                    &event.response.mime_type,
                )
                .await;
        }
    });

    Ok(CaptureHandles {
        tasks: vec![request_task, response_task],
    })
}
