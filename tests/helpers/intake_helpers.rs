#![allow(dead_code)]
use std::collections::VecDeque;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use leadflow::database::Database;
use leadflow::models::{
    CreateContactRequest, CreateOperatorRequest, CreateSourceRequest, Operator, Source,
    SourceOperatorWeight,
};
use leadflow::services::RandomSource;

/// Deterministic randomness source for lottery tests: a seeded StdRng.
pub struct SeededRandomSource {
    rng: Mutex<StdRng>,
}

impl SeededRandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandomSource {
    fn draw_weight(&self, total: i64) -> i64 {
        self.rng.lock().unwrap().gen_range(1..=total)
    }

    fn draw_index(&self, len: usize) -> usize {
        self.rng.lock().unwrap().gen_range(0..len)
    }
}

/// Randomness source that replays a fixed script of draws, for pinning down
/// the lottery's boundary behavior.
pub struct ScriptedRandomSource {
    weight_draws: Mutex<VecDeque<i64>>,
    index_draws: Mutex<VecDeque<usize>>,
}

impl ScriptedRandomSource {
    pub fn new(weight_draws: Vec<i64>, index_draws: Vec<usize>) -> Self {
        Self {
            weight_draws: Mutex::new(weight_draws.into()),
            index_draws: Mutex::new(index_draws.into()),
        }
    }
}

impl RandomSource for ScriptedRandomSource {
    fn draw_weight(&self, _total: i64) -> i64 {
        self.weight_draws
            .lock()
            .unwrap()
            .pop_front()
            .expect("Scripted weight draws exhausted")
    }

    fn draw_index(&self, _len: usize) -> usize {
        self.index_draws
            .lock()
            .unwrap()
            .pop_front()
            .expect("Scripted index draws exhausted")
    }
}

/// Create a test source with the given name
pub async fn create_test_source(db: &Database, name: &str) -> Source {
    db.create_source(&CreateSourceRequest {
        name: name.to_string(),
        description: None,
    })
    .await
    .expect("Failed to create source")
}

/// Create a test operator with the given name and load limit
pub async fn create_test_operator(db: &Database, name: &str, load_limit: i64) -> Operator {
    db.create_operator(&CreateOperatorRequest {
        name: name.to_string(),
        is_active: true,
        load_limit,
    })
    .await
    .expect("Failed to create operator")
}

/// Bind an operator to a source with the given weight
pub async fn create_test_weight(
    db: &Database,
    source_id: i64,
    operator_id: i64,
    weight: i64,
) -> SourceOperatorWeight {
    db.upsert_weight(source_id, operator_id, weight)
        .await
        .expect("Failed to set weight")
}

/// Request for a contact from the given phone number
pub fn contact_request(source_id: i64, phone: &str) -> CreateContactRequest {
    CreateContactRequest {
        external_id: None,
        phone: Some(phone.to_string()),
        email: None,
        name: None,
        source_id,
        message: Some("Test message".to_string()),
    }
}

/// Zero out a weight row behind the API. The schema CHECK keeps weights >= 1,
/// so the degenerate zero-total lottery path is only reachable this way.
pub async fn force_zero_weight(db: &Database, source_id: i64, operator_id: i64) {
    // The pragma is per-connection, so pin one connection for all three steps.
    let mut conn = db
        .pool()
        .acquire()
        .await
        .expect("Failed to acquire connection");

    sqlx::query("PRAGMA ignore_check_constraints = ON")
        .execute(&mut *conn)
        .await
        .expect("Failed to disable check constraints");

    sqlx::query(
        "UPDATE source_operator_weights SET weight = 0 WHERE source_id = ? AND operator_id = ?",
    )
    .bind(source_id)
    .bind(operator_id)
    .execute(&mut *conn)
    .await
    .expect("Failed to zero weight");

    sqlx::query("PRAGMA ignore_check_constraints = OFF")
        .execute(&mut *conn)
        .await
        .expect("Failed to re-enable check constraints");
}
