//! Roles, permissions, and the role-permission map.
//!
//! Roles and permissions are closed enumerations: adding either requires a
//! code change, and the exhaustive match in [`permissions_for`] forces the
//! role-permission map to stay total. Unknown tags only exist at the
//! parsing boundary, where they are a configuration error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::acl::AccessMode;
use crate::error::AuthError;
use crate::storage::ConsentType;

// =============================================================================
// Role
// =============================================================================

/// A role in the platform, fixed at deploy time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    OpoCoordinator,
    RecoveryCoordinator,
    TriageCoordinator,
    Surgeon,
    QualityStaff,
    LabStaff,
    Courier,
}

impl Role {
    /// All defined roles.
    pub const ALL: [Role; 8] = [
        Role::Admin,
        Role::OpoCoordinator,
        Role::RecoveryCoordinator,
        Role::TriageCoordinator,
        Role::Surgeon,
        Role::QualityStaff,
        Role::LabStaff,
        Role::Courier,
    ];

    /// The role's stable tag (used in configuration and audit entries).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::OpoCoordinator => "opo-coordinator",
            Role::RecoveryCoordinator => "recovery-coordinator",
            Role::TriageCoordinator => "triage-coordinator",
            Role::Surgeon => "surgeon",
            Role::QualityStaff => "quality-staff",
            Role::LabStaff => "lab-staff",
            Role::Courier => "courier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AuthError::configuration(format!("unknown role '{s}'")))
    }
}

// =============================================================================
// Permission
// =============================================================================

/// A capability an actor can hold, fixed at deploy time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    ViewCase,
    CreateCase,
    UpdateCase,
    CloseCase,
    UploadDocument,
    DownloadDocument,
    ApproveFourEyes,
    ResolveQaAlert,
    ViewAuditLog,
    ManageUsers,
    RecordConsent,
    WithdrawConsent,
    RecordCustodyTransfer,
    ScheduleRecovery,
    ShareForResearch,
}

impl Permission {
    /// All defined permissions.
    pub const ALL: [Permission; 15] = [
        Permission::ViewCase,
        Permission::CreateCase,
        Permission::UpdateCase,
        Permission::CloseCase,
        Permission::UploadDocument,
        Permission::DownloadDocument,
        Permission::ApproveFourEyes,
        Permission::ResolveQaAlert,
        Permission::ViewAuditLog,
        Permission::ManageUsers,
        Permission::RecordConsent,
        Permission::WithdrawConsent,
        Permission::RecordCustodyTransfer,
        Permission::ScheduleRecovery,
        Permission::ShareForResearch,
    ];

    /// The permission's stable tag.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewCase => "view-case",
            Permission::CreateCase => "create-case",
            Permission::UpdateCase => "update-case",
            Permission::CloseCase => "close-case",
            Permission::UploadDocument => "upload-document",
            Permission::DownloadDocument => "download-document",
            Permission::ApproveFourEyes => "approve-four-eyes",
            Permission::ResolveQaAlert => "resolve-qa-alert",
            Permission::ViewAuditLog => "view-audit-log",
            Permission::ManageUsers => "manage-users",
            Permission::RecordConsent => "record-consent",
            Permission::WithdrawConsent => "withdraw-consent",
            Permission::RecordCustodyTransfer => "record-custody-transfer",
            Permission::ScheduleRecovery => "schedule-recovery",
            Permission::ShareForResearch => "share-for-research",
        }
    }

    /// The ACL operation this permission requests on a targeted object.
    #[must_use]
    pub fn access_mode(&self) -> AccessMode {
        match self {
            Permission::ViewCase
            | Permission::DownloadDocument
            | Permission::ViewAuditLog => AccessMode::Read,
            Permission::CreateCase
            | Permission::UpdateCase
            | Permission::CloseCase
            | Permission::UploadDocument
            | Permission::ApproveFourEyes
            | Permission::ResolveQaAlert
            | Permission::ManageUsers
            | Permission::RecordConsent
            | Permission::WithdrawConsent
            | Permission::RecordCustodyTransfer
            | Permission::ScheduleRecovery
            | Permission::ShareForResearch => AccessMode::Write,
        }
    }

    /// The consent a data subject must hold before this action class may
    /// run, if any.
    #[must_use]
    pub fn required_consent(&self) -> Option<ConsentType> {
        match self {
            Permission::ScheduleRecovery => Some(ConsentType::OrganRecovery),
            Permission::ShareForResearch => Some(ConsentType::TissueResearch),
            _ => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|permission| permission.as_str() == s)
            .ok_or_else(|| AuthError::configuration(format!("unknown permission '{s}'")))
    }
}

// =============================================================================
// Role-Permission Map
// =============================================================================

/// The permissions granted to a role.
///
/// Pure and total: the exhaustive match makes it a compile error to add a
/// role without assigning its permission set, and every set is non-empty.
#[must_use]
pub fn permissions_for(role: Role) -> &'static [Permission] {
    use Permission::*;
    match role {
        Role::Admin => &[
            ViewCase,
            CreateCase,
            UpdateCase,
            CloseCase,
            UploadDocument,
            DownloadDocument,
            ApproveFourEyes,
            ResolveQaAlert,
            ViewAuditLog,
            ManageUsers,
            RecordConsent,
            WithdrawConsent,
            RecordCustodyTransfer,
            ScheduleRecovery,
            ShareForResearch,
        ],
        Role::OpoCoordinator => &[
            ViewCase,
            CreateCase,
            UpdateCase,
            UploadDocument,
            DownloadDocument,
            RecordConsent,
            WithdrawConsent,
            ScheduleRecovery,
        ],
        Role::RecoveryCoordinator => &[
            ViewCase,
            UpdateCase,
            UploadDocument,
            DownloadDocument,
            RecordCustodyTransfer,
            ScheduleRecovery,
        ],
        Role::TriageCoordinator => &[ViewCase, CreateCase, UpdateCase, CloseCase, DownloadDocument],
        Role::Surgeon => &[ViewCase, DownloadDocument, ApproveFourEyes],
        Role::QualityStaff => &[
            ViewCase,
            DownloadDocument,
            ApproveFourEyes,
            ResolveQaAlert,
            ViewAuditLog,
        ],
        Role::LabStaff => &[ViewCase, UploadDocument, DownloadDocument, ShareForResearch],
        Role::Courier => &[ViewCase, RecordCustodyTransfer],
    }
}

/// Returns `true` if the role grants the permission. Never panics.
#[must_use]
pub fn has_permission(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_permissions() {
        for role in Role::ALL {
            let permissions = permissions_for(role);
            assert!(
                !permissions.is_empty(),
                "role {role} must map to a non-empty permission set"
            );
            // The map is a pure function: repeated calls agree.
            assert_eq!(permissions, permissions_for(role));
        }
    }

    #[test]
    fn test_permission_sets_are_deduplicated() {
        for role in Role::ALL {
            let permissions = permissions_for(role);
            for (i, permission) in permissions.iter().enumerate() {
                assert!(
                    !permissions[i + 1..].contains(permission),
                    "role {role} lists {permission} twice"
                );
            }
        }
    }

    #[test]
    fn test_has_permission_never_panics() {
        for role in Role::ALL {
            for permission in Permission::ALL {
                let granted = has_permission(role, permission);
                assert_eq!(granted, permissions_for(role).contains(&permission));
            }
        }
    }

    #[test]
    fn test_role_round_trips_through_tag() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!(matches!(
            "janitor".parse::<Role>(),
            Err(AuthError::Configuration { .. })
        ));
    }

    #[test]
    fn test_permission_round_trips_through_tag() {
        for permission in Permission::ALL {
            assert_eq!(
                permission.as_str().parse::<Permission>().unwrap(),
                permission
            );
        }
        assert!(matches!(
            "launch-rockets".parse::<Permission>(),
            Err(AuthError::Configuration { .. })
        ));
    }

    #[test]
    fn test_access_modes() {
        assert_eq!(Permission::ViewCase.access_mode(), AccessMode::Read);
        assert_eq!(Permission::DownloadDocument.access_mode(), AccessMode::Read);
        assert_eq!(Permission::ResolveQaAlert.access_mode(), AccessMode::Write);
        assert_eq!(Permission::UploadDocument.access_mode(), AccessMode::Write);
    }

    #[test]
    fn test_consent_gated_permissions() {
        assert_eq!(
            Permission::ScheduleRecovery.required_consent(),
            Some(ConsentType::OrganRecovery)
        );
        assert_eq!(
            Permission::ShareForResearch.required_consent(),
            Some(ConsentType::TissueResearch)
        );
        assert_eq!(Permission::ViewCase.required_consent(), None);
    }

    #[test]
    fn test_expected_role_grants() {
        assert!(has_permission(Role::QualityStaff, Permission::ResolveQaAlert));
        assert!(has_permission(Role::Surgeon, Permission::ApproveFourEyes));
        assert!(!has_permission(Role::Courier, Permission::UploadDocument));
        assert!(!has_permission(Role::Surgeon, Permission::ManageUsers));
    }
}
