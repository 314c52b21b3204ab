#![no_main]

use arbitrary::Arbitrary;
use ehr::{AccessControlList, EhrContract, EhrContractClient, Permissions};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{Env, Map, String};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    CreateRecord {
        patient: u8,
        doctor: u8,
        role_read: bool,
        role_write: bool,
        role_audit: bool,
    },
    GetRecord {
        record_id: u8,
        caller: u8,
        role: u8,
    },
    UpdateRecord {
        record_id: u8,
        caller: u8,
        role: u8,
    },
    UpdateAcl {
        record_id: u8,
        caller: u8,
        role: u8,
        role_read: bool,
    },
    ListRecords {
        patient: u8,
        caller: u8,
        role: u8,
    },
    AuditTrail {
        record_id: u8,
        caller: u8,
        role: u8,
    },
}

fn user_id(env: &Env, n: u8) -> String {
    let id = match n % 4 {
        0 => "user-0",
        1 => "user-1",
        2 => "user-2",
        _ => "user-3",
    };
    String::from_str(env, id)
}

fn role_name(env: &Env, n: u8) -> String {
    let role = match n % 4 {
        0 => "patient",
        1 => "doctor",
        2 => "nurse",
        _ => "admin",
    };
    String::from_str(env, role)
}

fn doctor_acl(env: &Env, read: bool, write: bool, audit: bool) -> AccessControlList {
    let mut roles = Map::new(env);
    roles.set(
        String::from_str(env, "doctor"),
        Permissions { read, write, audit },
    );
    AccessControlList {
        users: Map::new(env),
        roles,
    }
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();

    let contract_id = env.register(EhrContract, ());
    let client = EhrContractClient::new(&env, &contract_id);

    let _ = client.try_init_ledger();

    let mut created: u64 = 0;

    for action in actions {
        match action {
            FuzzAction::CreateRecord {
                patient,
                doctor,
                role_read,
                role_write,
                role_audit,
            } => {
                let result = client.try_create_record(
                    &user_id(&env, patient),
                    &user_id(&env, doctor),
                    &String::from_str(&env, "Lab Results"),
                    &String::from_str(&env, "ciphertext"),
                    &doctor_acl(&env, role_read, role_write, role_audit),
                );
                if result.is_ok() {
                    created += 1;
                }
            }
            FuzzAction::GetRecord {
                record_id,
                caller,
                role,
            } => {
                let _ = client.try_get_record(
                    &(record_id as u64),
                    &user_id(&env, caller),
                    &role_name(&env, role),
                );
            }
            FuzzAction::UpdateRecord {
                record_id,
                caller,
                role,
            } => {
                let _ = client.try_update_record(
                    &(record_id as u64),
                    &user_id(&env, caller),
                    &role_name(&env, role),
                    &String::from_str(&env, "ciphertext-next"),
                );
            }
            FuzzAction::UpdateAcl {
                record_id,
                caller,
                role,
                role_read,
            } => {
                let _ = client.try_update_access_control(
                    &(record_id as u64),
                    &user_id(&env, caller),
                    &role_name(&env, role),
                    &doctor_acl(&env, role_read, false, false),
                );
            }
            FuzzAction::ListRecords {
                patient,
                caller,
                role,
            } => {
                let _ = client.try_get_patient_records(
                    &user_id(&env, patient),
                    &user_id(&env, caller),
                    &role_name(&env, role),
                );
            }
            FuzzAction::AuditTrail {
                record_id,
                caller,
                role,
            } => {
                let _ = client.try_get_audit_trail(
                    &(record_id as u64),
                    &user_id(&env, caller),
                    &role_name(&env, role),
                );
            }
        }
    }

    // The counter only ever moves on successful creation.
    assert_eq!(client.get_record_count(), created);
});
