//! Built-in template generators, one module per application.

use std::sync::Arc;

use crate::registry::TemplateGenerator;

pub mod appsmith;
pub mod excalidraw;
pub mod ghost;
pub mod grafana;
pub mod n8n;
pub mod plausible;
pub mod pocketbase;
pub mod umami;
pub mod uptime_kuma;
pub mod wordpress;

pub use appsmith::Appsmith;
pub use excalidraw::Excalidraw;
pub use ghost::Ghost;
pub use grafana::Grafana;
pub use n8n::N8n;
pub use plausible::Plausible;
pub use pocketbase::Pocketbase;
pub use umami::Umami;
pub use uptime_kuma::UptimeKuma;
pub use wordpress::Wordpress;

/// Every built-in generator.
pub fn builtin() -> Vec<Arc<dyn TemplateGenerator>> {
    vec![
        Arc::new(Appsmith),
        Arc::new(Excalidraw),
        Arc::new(Ghost),
        Arc::new(Grafana),
        Arc::new(N8n),
        Arc::new(Plausible),
        Arc::new(Pocketbase),
        Arc::new(Umami),
        Arc::new(UptimeKuma),
        Arc::new(Wordpress),
    ]
}
