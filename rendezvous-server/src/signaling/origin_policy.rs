use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Which browser origins may talk to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    Any,
    AllowList(Vec<String>),
}

impl OriginPolicy {
    /// A `*` anywhere in the list makes the policy permissive.
    pub fn from_origins<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let origins: Vec<String> = origins
            .into_iter()
            .map(Into::into)
            .map(|o| o.trim().to_owned())
            .filter(|o| !o.is_empty())
            .collect();

        if origins.iter().any(|o| o == "*") {
            OriginPolicy::Any
        } else {
            OriginPolicy::AllowList(origins)
        }
    }

    /// Requests without an `Origin` header come from non-browser clients and
    /// are let through.
    pub fn permits(&self, origin: Option<&str>) -> bool {
        match (self, origin) {
            (OriginPolicy::Any, _) | (_, None) => true,
            (OriginPolicy::AllowList(allowed), Some(origin)) => {
                allowed.iter().any(|o| o == origin)
            }
        }
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let origin = match self {
            OriginPolicy::Any => AllowOrigin::from(Any),
            OriginPolicy::AllowList(allowed) => AllowOrigin::list(
                allowed
                    .iter()
                    .filter_map(|o| HeaderValue::from_str(o).ok()),
            ),
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
    }
}
