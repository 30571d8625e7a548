pub mod in_memory;
pub mod rest;

use serde::Deserialize;

pub use in_memory::InMemoryDirectory;
pub use rest::RestDirectory;

/// Name columns of a patient row, as both adapters read them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientName {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl PatientName {
    /// "First Last", or whichever half is present. `None` if both are blank.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}
