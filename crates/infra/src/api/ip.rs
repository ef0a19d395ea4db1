//! Outbound IP detection
//!
//! Synchronization requests carry the customer's IP address for PSD2
//! compliance. Detection never fails: public echo services are tried in
//! order, then the local address of an outbound UDP socket, then
//! `0.0.0.0`.

use std::net::{IpAddr, UdpSocket};
use std::time::Duration;

use async_trait::async_trait;
use ponto_domain::constants::{IP_LOOKUP_TIMEOUT_SECS, UNKNOWN_IP_ADDRESS};
use reqwest::Client as ReqwestClient;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const DEFAULT_SERVICES: [&str; 3] =
    ["https://api.ipify.org", "https://ifconfig.me/ip", "https://icanhazip.com"];

/// UDP "connect" only selects a route; nothing is sent.
const ROUTE_TARGET_ADDR: &str = "8.8.8.8:80";

/// Source of the address reported as `customerIpAddress`
#[async_trait]
pub trait OutboundIpResolver: Send + Sync {
    async fn resolve(&self, cancel: &CancellationToken) -> String;
}

/// Resolver backed by public IP echo services
#[derive(Debug, Clone)]
pub struct PublicIpResolver {
    http: ReqwestClient,
    services: Vec<String>,
}

impl PublicIpResolver {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_services(DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect())
    }

    /// Resolver querying `services` in order
    pub fn with_services(services: Vec<String>) -> Result<Self, reqwest::Error> {
        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(IP_LOOKUP_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, services })
    }

    async fn from_services(&self, cancel: &CancellationToken) -> Option<IpAddr> {
        for service in &self.services {
            let lookup = async {
                let response = self.http.get(service).send().await.ok()?;
                let body = response.text().await.ok()?;
                body.trim().parse::<IpAddr>().ok()
            };

            let found = tokio::select! {
                biased;
                _ = cancel.cancelled() => return None,
                found = lookup => found,
            };

            match found {
                Some(ip) => {
                    debug!(service = %service, %ip, "Detected public IP");
                    return Some(ip);
                }
                None => debug!(service = %service, "IP echo service gave no usable answer"),
            }
        }
        None
    }
}

#[async_trait]
impl OutboundIpResolver for PublicIpResolver {
    async fn resolve(&self, cancel: &CancellationToken) -> String {
        match self.from_services(cancel).await {
            Some(ip) => ip.to_string(),
            None => local_ip(),
        }
    }
}

/// Address of the interface that would route to the internet
pub fn local_ip() -> String {
    let route = || -> std::io::Result<IpAddr> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect(ROUTE_TARGET_ADDR)?;
        Ok(socket.local_addr()?.ip())
    };

    match route() {
        Ok(ip) => ip.to_string(),
        Err(e) => {
            debug!(error = %e, "Local IP detection failed");
            UNKNOWN_IP_ADDRESS.to_string()
        }
    }
}
