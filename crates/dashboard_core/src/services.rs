/// Identifier of one of the integrable third-party providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceKey {
    Anthropic,
    Luma,
    Spotify,
    Webflow,
}

impl ServiceKey {
    /// Wire identifier sent in the `service` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKey::Anthropic => "anthropic",
            ServiceKey::Luma => "luma",
            ServiceKey::Spotify => "spotify",
            ServiceKey::Webflow => "webflow",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        SERVICES
            .iter()
            .map(|descriptor| descriptor.key)
            .find(|service| service.as_str() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub key: ServiceKey,
    pub label: &'static str,
    pub placeholder: &'static str,
}

/// Services listed on the Integrations screen, in display order.
pub const SERVICES: [ServiceDescriptor; 4] = [
    ServiceDescriptor {
        key: ServiceKey::Anthropic,
        label: "Anthropic (Claude)",
        placeholder: "sk-ant-...",
    },
    ServiceDescriptor {
        key: ServiceKey::Luma,
        label: "Luma Events",
        placeholder: "Your Luma API key",
    },
    ServiceDescriptor {
        key: ServiceKey::Spotify,
        label: "Spotify",
        placeholder: "Client ID / Secret in .env",
    },
    ServiceDescriptor {
        key: ServiceKey::Webflow,
        label: "Webflow CMS",
        placeholder: "Your Webflow API key",
    },
];
