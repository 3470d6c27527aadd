use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::{
    extract::{ConnectInfo, Request},
    middleware::{from_fn, Next},
    Router,
};
use tracing::{debug, error, warn};

use crate::RealIpConfig;

pub fn add<S: Clone + Send + Sync + 'static>(
    real_ip_config: Option<Arc<RealIpConfig>>,
) -> impl FnOnce(Router<S>) -> Router<S> {
    |router| {
        router.layer(from_fn(move |mut request: Request, next: Next| {
            let client_ip = ClientIp::from_request(&request, real_ip_config.as_deref());
            request.extensions_mut().insert(client_ip);
            next.run(request)
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientIp(pub IpAddr);

impl ClientIp {
    fn from_request(request: &Request, real_ip_config: Option<&RealIpConfig>) -> Self {
        let peer_ip = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let header_value =
            real_ip_config.and_then(|config| request.headers().get(&config.header));

        Self(resolve(peer_ip, header_value, real_ip_config))
    }
}

/// Pick the address reported by the reverse proxy if, and only if, the request
/// came from the proxy itself.
fn resolve(
    peer_ip: IpAddr,
    header_value: Option<&axum::http::HeaderValue>,
    real_ip_config: Option<&RealIpConfig>,
) -> IpAddr {
    let Some(RealIpConfig { set_from, .. }) = real_ip_config else {
        return peer_ip;
    };

    if *set_from != peer_ip {
        if let Some(header_value) = header_value {
            debug!(%peer_ip, ?header_value, "ignoring real ip header value from untrusted source");
        }
        return peer_ip;
    }

    let Some(header_value) = header_value else {
        warn!(%peer_ip, "real ip header not found");
        return peer_ip;
    };

    match header_value
        .to_str()
        .ok()
        .and_then(|real_ip| real_ip.trim().parse().ok())
    {
        Some(real_ip) => real_ip,
        None => {
            error!(%peer_ip, ?header_value, "failed to parse real ip header value");
            peer_ip
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    const PROXY: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    const VISITOR: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));

    fn config() -> RealIpConfig {
        RealIpConfig {
            header: "X-Real-Ip".into(),
            set_from: PROXY,
        }
    }

    #[test]
    fn without_config_uses_peer() {
        let header = HeaderValue::from_static("203.0.113.7");
        assert_eq!(resolve(PROXY, Some(&header), None), PROXY);
    }

    #[test]
    fn trusted_proxy() {
        let header = HeaderValue::from_static("203.0.113.7");
        assert_eq!(resolve(PROXY, Some(&header), Some(&config())), VISITOR);
    }

    #[test]
    fn untrusted_source() {
        let header = HeaderValue::from_static("1.2.3.4");
        assert_eq!(resolve(VISITOR, Some(&header), Some(&config())), VISITOR);
    }

    #[test]
    fn missing_or_invalid_header() {
        let header = HeaderValue::from_static("not an ip");
        assert_eq!(resolve(PROXY, None, Some(&config())), PROXY);
        assert_eq!(resolve(PROXY, Some(&header), Some(&config())), PROXY);
    }
}
