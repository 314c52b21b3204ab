#![no_std]

pub mod access;
pub mod errors;
pub mod events;
pub mod types;


use soroban_sdk::{contract, contractimpl, symbol_short, Env, String, Symbol, Vec};

pub use errors::EhrError;
pub use types::{
    AccessControlList, AuditTrail, HealthRecord, HistoryAction, HistoryEntry, Operation,
    Permissions, RecordStatus,
};

/// Instance storage keys
const INITIALIZED: Symbol = symbol_short!("INIT");
const RECORD_CTR: Symbol = symbol_short!("REC_CTR");

/// Role string granted the hard-coded ACL-update super-rule.
const ROLE_ADMIN: &str = "admin";

/// TTL constants for persistent storage (in ledgers)
const TTL_THRESHOLD: u32 = 17_280; // ~1 day
const TTL_EXTEND_TO: u32 = 518_400; // ~30 days

fn record_key(record_id: u64) -> (Symbol, u64) {
    (symbol_short!("RECORD"), record_id)
}

fn patient_index_key(patient_id: &String) -> (Symbol, String) {
    (symbol_short!("PAT_REC"), patient_id.clone())
}

fn extend_ttl_record_key(env: &Env, key: &(Symbol, u64)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn extend_ttl_index_key(env: &Env, key: &(Symbol, String)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

#[contract]
pub struct EhrContract;

#[contractimpl]
impl EhrContract {
    // ── Initialization ───────────────────────────────────────────────────────

    /// Bootstrap the ledger. Stores nothing beyond the initialization
    /// flag; record operations do not gate on it.
    pub fn init_ledger(env: Env) -> Result<(), EhrError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(EhrError::AlreadyInitialized);
        }

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);

        events::publish_initialized(&env);

        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Record Operations ────────────────────────────────────────────────────

    /// Create a new health record.
    ///
    /// Assigns the next record ID from the monotonic counter, persists
    /// the record with `version = 1` and a single `Created` history
    /// entry attributed to the creating doctor, and indexes the record
    /// under its patient.
    pub fn create_record(
        env: Env,
        patient_id: String,
        doctor_id: String,
        record_type: String,
        encrypted_data: String,
        access_control_list: AccessControlList,
    ) -> Result<u64, EhrError> {
        if patient_id.is_empty() || doctor_id.is_empty() {
            return Err(EhrError::InvalidInput);
        }
        access::validate_acl(&access_control_list)?;

        let record_id = Self::next_record_id(&env);
        let now = env.ledger().timestamp();

        let mut history = Vec::new(&env);
        history.push_back(HistoryEntry {
            action: HistoryAction::Created,
            timestamp: now,
            user_id: doctor_id.clone(),
        });

        let record = HealthRecord {
            record_id,
            patient_id: patient_id.clone(),
            doctor_id: doctor_id.clone(),
            record_type,
            encrypted_data,
            access_control_list,
            created_at: now,
            last_modified: now,
            status: RecordStatus::Active,
            version: 1,
            history,
        };

        Self::store_record(&env, &record);
        Self::index_record(&env, &patient_id, record_id);

        events::publish_record_created(&env, record_id, patient_id, doctor_id);

        Ok(record_id)
    }

    /// Retrieve a health record by ID.
    ///
    /// Reads are not side-effect-free: every authorized read appends an
    /// `Accessed` history entry and re-persists the record, so the audit
    /// trail covers accesses as well as mutations. The returned record
    /// includes the new entry.
    pub fn get_record(
        env: Env,
        record_id: u64,
        user_id: String,
        user_role: String,
    ) -> Result<HealthRecord, EhrError> {
        Self::authorized_read(&env, record_id, &user_id, &user_role)
    }

    /// Replace a record's encrypted payload.
    ///
    /// Requires `Write` permission. Bumps `version` and `last_modified`
    /// and appends an `Updated` history entry. Returns the new version.
    pub fn update_record(
        env: Env,
        record_id: u64,
        user_id: String,
        user_role: String,
        encrypted_data: String,
    ) -> Result<u32, EhrError> {
        let mut record = Self::load_record(&env, record_id)?;

        if !access::can_access(&record, &user_id, &user_role, Operation::Write) {
            return Err(EhrError::AccessDenied);
        }

        record.encrypted_data = encrypted_data;
        record.last_modified = env.ledger().timestamp();
        record.version = record.version.saturating_add(1);
        Self::append_history(&env, &mut record, HistoryAction::Updated, &user_id);

        Self::store_record(&env, &record);

        events::publish_record_updated(&env, record_id, user_id, record.version);

        Ok(record.version)
    }

    /// Replace a record's access control list.
    ///
    /// Authorization is a hard-coded super-rule rather than the ACL
    /// evaluator: only the record's patient, or a caller whose role is
    /// literally `"admin"`, may proceed. ACL grants (including `write`)
    /// carry no weight here. Updates `last_modified` but not `version`;
    /// the asymmetry with `update_record` is preserved from the system
    /// this contract replaces.
    pub fn update_access_control(
        env: Env,
        record_id: u64,
        user_id: String,
        user_role: String,
        access_control_list: AccessControlList,
    ) -> Result<(), EhrError> {
        let mut record = Self::load_record(&env, record_id)?;

        if user_id != record.patient_id && user_role != String::from_str(&env, ROLE_ADMIN) {
            return Err(EhrError::AccessDenied);
        }

        access::validate_acl(&access_control_list)?;

        record.access_control_list = access_control_list;
        record.last_modified = env.ledger().timestamp();
        Self::append_history(&env, &mut record, HistoryAction::AccessControlUpdated, &user_id);

        Self::store_record(&env, &record);

        events::publish_access_control_updated(&env, record_id, user_id);

        Ok(())
    }

    /// List every record of `patient_id` that the caller may read.
    ///
    /// Scans the patient index in insertion order and runs the
    /// `get_record` path per ID. A record the caller cannot read is
    /// skipped with a diagnostic event, not reported as an error; an
    /// empty result is a valid listing. Each returned record gets its
    /// `Accessed` history append, in index order.
    pub fn get_patient_records(
        env: Env,
        patient_id: String,
        user_id: String,
        user_role: String,
    ) -> Vec<HealthRecord> {
        let key = patient_index_key(&patient_id);
        let ids: Vec<u64> = env
            .storage()
            .persistent()
            .get(&key)
            .unwrap_or(Vec::new(&env));
        if !ids.is_empty() {
            extend_ttl_index_key(&env, &key);
        }

        let mut records = Vec::new(&env);
        for record_id in ids.iter() {
            match Self::authorized_read(&env, record_id, &user_id, &user_role) {
                Ok(record) => records.push_back(record),
                Err(_) => events::publish_record_skipped(&env, record_id, user_id.clone()),
            }
        }

        records
    }

    /// Return a record's audit trail without its content.
    ///
    /// Requires `Audit` permission. The query itself is audited: an
    /// `AuditQueried` entry is appended before the trail is returned, so
    /// the result includes it.
    pub fn get_audit_trail(
        env: Env,
        record_id: u64,
        user_id: String,
        user_role: String,
    ) -> Result<AuditTrail, EhrError> {
        let mut record = Self::load_record(&env, record_id)?;

        if !access::can_access(&record, &user_id, &user_role, Operation::Audit) {
            return Err(EhrError::AccessDenied);
        }

        Self::append_history(&env, &mut record, HistoryAction::AuditQueried, &user_id);
        Self::store_record(&env, &record);

        events::publish_audit_queried(&env, record_id, user_id);

        Ok(AuditTrail {
            record_id,
            patient_id: record.patient_id,
            history: record.history,
        })
    }

    // ── Introspection ────────────────────────────────────────────────────────

    /// Total number of records ever created.
    pub fn get_record_count(env: Env) -> u64 {
        env.storage().instance().get(&RECORD_CTR).unwrap_or(0)
    }

    /// Contract code version.
    pub fn version() -> u32 {
        1
    }

    // ── Internal Helpers ─────────────────────────────────────────────────────

    fn next_record_id(env: &Env) -> u64 {
        let record_id: u64 = env
            .storage()
            .instance()
            .get(&RECORD_CTR)
            .unwrap_or(0u64)
            .saturating_add(1);
        env.storage().instance().set(&RECORD_CTR, &record_id);
        record_id
    }

    fn load_record(env: &Env, record_id: u64) -> Result<HealthRecord, EhrError> {
        let key = record_key(record_id);
        let record: HealthRecord = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(EhrError::NotFound)?;
        extend_ttl_record_key(env, &key);
        Ok(record)
    }

    fn store_record(env: &Env, record: &HealthRecord) {
        let key = record_key(record.record_id);
        env.storage().persistent().set(&key, record);
        extend_ttl_record_key(env, &key);
    }

    /// Append one history entry stamped with ledger time. Entries are
    /// only ever pushed; nothing truncates or rewrites the trail.
    fn append_history(
        env: &Env,
        record: &mut HealthRecord,
        action: HistoryAction,
        user_id: &String,
    ) {
        record.history.push_back(HistoryEntry {
            action,
            timestamp: env.ledger().timestamp(),
            user_id: user_id.clone(),
        });
    }

    /// Insert `record_id` into the patient's index. Idempotent: an ID
    /// already present is left alone.
    fn index_record(env: &Env, patient_id: &String, record_id: u64) {
        let key = patient_index_key(patient_id);
        let mut ids: Vec<u64> = env
            .storage()
            .persistent()
            .get(&key)
            .unwrap_or(Vec::new(env));
        if !ids.contains(&record_id) {
            ids.push_back(record_id);
        }
        env.storage().persistent().set(&key, &ids);
        extend_ttl_index_key(env, &key);
    }

    /// Existence check, then `Read` authorization, then the audited
    /// history append. Shared read path for `get_record` and
    /// `get_patient_records`.
    fn authorized_read(
        env: &Env,
        record_id: u64,
        user_id: &String,
        user_role: &String,
    ) -> Result<HealthRecord, EhrError> {
        let mut record = Self::load_record(env, record_id)?;

        if !access::can_access(&record, user_id, user_role, Operation::Read) {
            return Err(EhrError::AccessDenied);
        }

        Self::append_history(env, &mut record, HistoryAction::Accessed, user_id);
        Self::store_record(env, &record);

        events::publish_record_accessed(env, record_id, user_id.clone());

        Ok(record)
    }
}
