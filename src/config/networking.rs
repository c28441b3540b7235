//! Networking passthrough settings.
//!
//! The core does not interpret these beyond handing them to the platform's
//! ingress-values generator.

use serde::{Deserialize, Serialize};

/// HTTP ingress settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressHttp {
    /// Protect the ingress with platform authentication middleware
    #[serde(default)]
    pub auth: bool,
}

/// Network access configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkingConfig {
    /// HTTP ingress; `None` leaves the app unexposed
    #[serde(default = "default_ingress_http")]
    pub ingress_http: Option<IngressHttp>,
}

fn default_ingress_http() -> Option<IngressHttp> {
    Some(IngressHttp::default())
}

impl Default for NetworkingConfig {
    fn default() -> Self {
        Self {
            ingress_http: default_ingress_http(),
        }
    }
}
