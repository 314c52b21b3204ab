use soroban_sdk::{contracttype, Map, String, Vec};

/// Operation classes a caller can be granted on a record.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    Read,
    Write,
    Audit,
}

/// Permission flags attached to a single user or role entry in an ACL.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
    pub audit: bool,
}

/// Per-record access control list.
///
/// `users` holds per-individual overrides, `roles` holds role-based
/// defaults. An empty map grants nothing; a missing key grants nothing.
/// The owning patient is never looked up here; owner access is implicit.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessControlList {
    pub users: Map<String, Permissions>,
    pub roles: Map<String, Permissions>,
}

/// Lifecycle flag for a record.
///
/// Only `Active` is ever produced today; `Archived` and `Revoked` are
/// reserved for a future archival/revocation path and have no transitions.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordStatus {
    Active,
    Archived,
    Revoked,
}

/// The operation class a history entry records.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HistoryAction {
    Created,
    Accessed,
    Updated,
    AccessControlUpdated,
    AuditQueried,
}

/// One entry in a record's append-only transaction history.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HistoryEntry {
    pub action: HistoryAction,
    pub timestamp: u64,
    pub user_id: String,
}

/// A stored health record.
///
/// `encrypted_data` is an opaque ciphertext blob; key custody and
/// decryption belong to an external collaborator, never this contract.
/// `history` is never truncated, reordered, or edited.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HealthRecord {
    pub record_id: u64,
    pub patient_id: String,
    pub doctor_id: String,
    pub record_type: String,
    pub encrypted_data: String,
    pub access_control_list: AccessControlList,
    pub created_at: u64,
    pub last_modified: u64,
    pub status: RecordStatus,
    pub version: u32,
    pub history: Vec<HistoryEntry>,
}

/// Result shape of an audit-trail query: the trail without record content.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuditTrail {
    pub record_id: u64,
    pub patient_id: String,
    pub history: Vec<HistoryEntry>,
}
