use soroban_sdk::{symbol_short, Env, String};

pub fn publish_initialized(env: &Env) {
    env.events().publish((symbol_short!("EHR_INIT"),), ());
}

pub fn publish_record_created(env: &Env, record_id: u64, patient_id: String, doctor_id: String) {
    env.events()
        .publish((symbol_short!("REC_NEW"), record_id, patient_id), doctor_id);
}

pub fn publish_record_accessed(env: &Env, record_id: u64, user_id: String) {
    env.events()
        .publish((symbol_short!("REC_GET"), record_id), user_id);
}

pub fn publish_record_updated(env: &Env, record_id: u64, user_id: String, version: u32) {
    env.events()
        .publish((symbol_short!("REC_UPD"), record_id, user_id), version);
}

pub fn publish_access_control_updated(env: &Env, record_id: u64, user_id: String) {
    env.events()
        .publish((symbol_short!("ACL_UPD"), record_id), user_id);
}

pub fn publish_audit_queried(env: &Env, record_id: u64, user_id: String) {
    env.events()
        .publish((symbol_short!("AUD_QRY"), record_id), user_id);
}

/// Diagnostic for listings: a record the caller could not read was
/// skipped rather than failing the batch.
pub fn publish_record_skipped(env: &Env, record_id: u64, user_id: String) {
    env.events()
        .publish((symbol_short!("REC_SKIP"), record_id), user_id);
}
