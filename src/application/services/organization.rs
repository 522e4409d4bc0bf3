use tracing::instrument;

use crate::domain::{DomainError, Organization};

/// Registers tenants. There is no persisted registry; the generated id is
/// the only handle an organization ever gets, and clients must keep it.
pub struct OrganizationService;

impl OrganizationService {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self))]
    pub fn register(&self, name: &str) -> Result<Organization, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("Organization name is required"));
        }

        let org = Organization::new(name);
        tracing::info!(organization_id = %org.id, "organization registered");
        Ok(org)
    }
}

impl Default for OrganizationService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rejects_blank_name() {
        let service = OrganizationService::new();
        assert!(matches!(
            service.register("   "),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_register_returns_usable_collection_name() {
        let service = OrganizationService::new();
        let org = service.register("Tech Corp").unwrap();
        assert_eq!(org.collection_name(), org.id);
    }
}
