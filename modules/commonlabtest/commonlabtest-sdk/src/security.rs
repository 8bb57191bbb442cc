use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Privileges guarding the commonlabtest operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Privilege {
    ViewLabTestMetadata,
    ViewLabTest,
    AddLabTest,
    AddLabTestMetadata,
    DeleteLabTest,
    PurgeLabTestMetadata,
}

impl Privilege {
    pub const ALL: [Self; 6] = [
        Self::ViewLabTestMetadata,
        Self::ViewLabTest,
        Self::AddLabTest,
        Self::AddLabTestMetadata,
        Self::DeleteLabTest,
        Self::PurgeLabTestMetadata,
    ];

    /// Name under which the host platform grants the privilege.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ViewLabTestMetadata => "View Common Lab Test Metadata",
            Self::ViewLabTest => "View Common Lab Test",
            Self::AddLabTest => "Add Common Lab Test",
            Self::AddLabTestMetadata => "Add Common Lab Test Metadata",
            Self::DeleteLabTest => "Delete Common Lab Test",
            Self::PurgeLabTestMetadata => "Purge Common Lab Test Metadata",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `SecurityContext` carries the caller identity and the privileges granted to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityContext {
    subject_id: Uuid,
    superuser: bool,
    privileges: BTreeSet<Privilege>,
}

impl SecurityContext {
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Anonymous context: nil subject, no privileges.
    #[must_use]
    pub fn anonymous() -> Self {
        SecurityContextBuilder::default().build()
    }

    /// Context holding every privilege, for system tasks.
    #[must_use]
    pub fn system(subject_id: Uuid) -> Self {
        Self {
            subject_id,
            superuser: true,
            privileges: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn subject_id(&self) -> Uuid {
        self.subject_id
    }

    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.superuser
    }

    #[must_use]
    pub fn has_privilege(&self, privilege: Privilege) -> bool {
        self.superuser || self.privileges.contains(&privilege)
    }
}

#[derive(Default)]
pub struct SecurityContextBuilder {
    subject_id: Option<Uuid>,
    superuser: bool,
    privileges: BTreeSet<Privilege>,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn subject_id(mut self, subject_id: Uuid) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    #[must_use]
    pub fn superuser(mut self) -> Self {
        self.superuser = true;
        self
    }

    #[must_use]
    pub fn grant(mut self, privilege: Privilege) -> Self {
        self.privileges.insert(privilege);
        self
    }

    #[must_use]
    pub fn grant_all(mut self, privileges: impl IntoIterator<Item = Privilege>) -> Self {
        self.privileges.extend(privileges);
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            subject_id: self.subject_id.unwrap_or_default(),
            superuser: self.superuser,
            privileges: self.privileges,
        }
    }
}
