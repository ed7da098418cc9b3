//! HTTP delivery of resource records

use farmlink::{DeliveryError, Resource, Transport};
use std::time::Duration;

const RESOURCES_PATH: &str = "/api/resources";

/// Resource endpoint for a server base URL (`host:port` gets `http://`)
pub fn resources_endpoint(server: &str) -> String {
    let server = server.trim().trim_end_matches('/');
    if server.contains("://") {
        format!("{}{}", server, RESOURCES_PATH)
    } else {
        format!("http://{}{}", server, RESOURCES_PATH)
    }
}

/// POSTs each record as JSON to the server's resource endpoint
pub struct HttpTransport {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(server: &str, timeout: Duration) -> Self {
        HttpTransport {
            endpoint: resources_endpoint(server),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn deliver(&self, resource: &Resource) -> Result<(), DeliveryError> {
        let body = serde_json::to_value(resource)?;

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Accept", "application/json")
            .send_json(body);

        match response {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, resp)) => {
                let reason = resp.status_text().to_string();
                let body = resp.into_string().unwrap_or_default();
                Err(DeliveryError::Rejected {
                    status,
                    reason,
                    body,
                })
            }
            Err(e) => Err(DeliveryError::Unreachable(e.to_string())),
        }
    }
}
