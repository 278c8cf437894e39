//! Service catalog configuration.

/// Position of a service within its catalog.
///
/// Only [`ServiceCatalog`] mints ids, so holding one proves the service is a
/// member of the catalog it came from. Rows are addressed by id, never by
/// free-form name, which makes an orphan row for a misspelled service
/// impossible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceId(usize);

impl ServiceId {
    /// Zero-based catalog position.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The fixed, ordered list of tracked service names.
///
/// Shared by the input form and the process sheet; both iterate it in order,
/// which keeps form rows and report columns aligned. The catalog is
/// configuration: swapping the list touches no form, store, or report logic.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCatalog {
    names: Vec<String>,
}

impl ServiceCatalog {
    /// Catalog from an ordered list of service names.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// The standard clinical service list shipped with the tool.
    pub fn standard() -> Self {
        Self::new(
            [
                "Registration / Front Desk",
                "Triage Assessment",
                "Physician Consultation",
                "Laboratory Investigations",
                "Radiology / Imaging",
                "Pharmacy Dispensing",
                "Billing & Payment",
                "Discharge Counselling",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        )
    }

    /// Number of services.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the catalog has no services.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Service names in catalog order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name for a given id. Panics only on an id from a larger catalog,
    /// which is a caller bug.
    pub fn name(&self, id: ServiceId) -> &str {
        &self.names[id.0]
    }

    /// Resolve a service name to its id. First match wins if the list
    /// contains duplicates.
    pub fn id_of(&self, name: &str) -> Option<ServiceId> {
        self.names.iter().position(|n| n == name).map(ServiceId)
    }

    /// Ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = ServiceId> + '_ {
        (0..self.names.len()).map(ServiceId)
    }
}
