use crate::signaling::{ConnectionGate, OriginPolicy};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Runtime settings. Every flag can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "rendezvous-server")]
#[command(about = "Room-scoped signaling relay for WebRTC peers")]
pub struct ServerConfig {
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Shared secret clients must present as `?token=` when connecting.
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Comma-separated origins allowed to connect, or `*` for any.
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_values = [
            "http://localhost:3000",
            "http://localhost:5000",
            "https://your-production-domain.com",
        ]
    )]
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn gate(&self) -> ConnectionGate {
        ConnectionGate::new(self.auth_token.clone())
    }

    pub fn origin_policy(&self) -> OriginPolicy {
        OriginPolicy::from_origins(self.allowed_origins.iter().cloned())
    }
}
