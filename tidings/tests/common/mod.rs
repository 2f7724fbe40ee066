#![allow(dead_code)]

use serde_json::Value;
use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};
use tidings::{Action, Capabilities, Data, Handler, HandlerResult, Record, Route, SharedHandler};

// ============================================================================
// Test Stores
// ============================================================================

/// Counts `increment` actions (by `by`, default 1) and resets on `reset`.
/// Publishes and saves its count under `key`.
pub struct CounterStore {
    pub key: &'static str,
    count: AtomicI64,
}

impl CounterStore {
    pub fn new(key: &'static str) -> Arc<Self> {
        Arc::new(Self {
            key,
            count: AtomicI64::new(0),
        })
    }

    pub fn count(&self) -> i64 {
        self.count.load(Ordering::SeqCst)
    }
}

impl Handler<Record> for CounterStore {
    fn capabilities(&self) -> Capabilities {
        Capabilities::APPEND_DATA | Capabilities::SAVE | Capabilities::LOAD
    }

    fn handles(&self, stem: &str) -> bool {
        matches!(stem, "Increment" | "Reset")
    }

    fn on_action(&self, action: &Record) -> HandlerResult {
        match action.kind().map(Route::stem).as_deref() {
            Some("Increment") => {
                let by = action.get("by").and_then(Value::as_i64).unwrap_or(1);
                self.count.fetch_add(by, Ordering::SeqCst);
            }
            Some("Reset") => self.count.store(0, Ordering::SeqCst),
            _ => {}
        }
        Ok(())
    }

    fn append_data_to(&self, data: &mut Data) -> HandlerResult {
        data.insert(self.key, self.count());
        Ok(())
    }

    fn save(&self, snapshot: &mut Data) -> HandlerResult {
        snapshot.insert(self.key, self.count());
        Ok(())
    }

    fn load(&self, snapshot: &Data) -> HandlerResult {
        if let Some(count) = snapshot.get_as::<i64>(self.key)? {
            self.count.store(count, Ordering::SeqCst);
        }
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Coerce a concrete handler into the shared form the dispatcher stores.
pub fn shared<H: Handler<Record>>(handler: &Arc<H>) -> SharedHandler<Record> {
    handler.clone()
}

pub fn increment(by: i64) -> Record {
    Record::new("increment").with("by", by)
}
