use soroban_sdk::String;

use crate::errors::EhrError;
use crate::types::{AccessControlList, HealthRecord, Operation, Permissions};

fn permits(perms: &Permissions, operation: Operation) -> bool {
    match operation {
        Operation::Read => perms.read,
        Operation::Write => perms.write,
        Operation::Audit => perms.audit,
    }
}

/// Decides whether `user_id` acting as `user_role` may perform
/// `operation` on `record`.
///
/// Evaluation order, first grant wins:
/// 1. Owner bypass: the patient always has full access, checked before
///    any ACL lookup.
/// 2. Per-user entry in `acl.users`. An entry whose flag for the
///    operation is false does not short-circuit; evaluation falls
///    through to the role map.
/// 3. Role entry in `acl.roles`.
/// 4. Deny.
///
/// Pure function over a record snapshot: no storage access, no side
/// effects.
pub fn can_access(
    record: &HealthRecord,
    user_id: &String,
    user_role: &String,
    operation: Operation,
) -> bool {
    if *user_id == record.patient_id {
        return true;
    }

    let acl = &record.access_control_list;

    if let Some(perms) = acl.users.get(user_id.clone()) {
        if permits(&perms, operation) {
            return true;
        }
    }

    if let Some(perms) = acl.roles.get(user_role.clone()) {
        if permits(&perms, operation) {
            return true;
        }
    }

    false
}

/// Structural validation applied when an ACL crosses the contract
/// boundary. A grantee keyed by the empty string can never match a
/// caller and is always a payload bug.
pub fn validate_acl(acl: &AccessControlList) -> Result<(), EhrError> {
    for key in acl.users.keys().iter() {
        if key.is_empty() {
            return Err(EhrError::InvalidInput);
        }
    }
    for key in acl.roles.keys().iter() {
        if key.is_empty() {
            return Err(EhrError::InvalidInput);
        }
    }
    Ok(())
}
