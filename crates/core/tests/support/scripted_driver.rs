use std::{
    collections::VecDeque,
    io,
    sync::{Arc, Mutex},
};

use exadialect_core::{
    BoxError, CatalogRequest, ColumnDescription, ConnectArgs, Driver, Error, QueryOutcome, Result,
    ResultSet, Transport, Value, ValueCodec, WireValue,
};

pub const DRIVER_NAME: &str = "scripted";

#[derive(Debug, Default)]
pub struct ScriptedState {
    pub outcomes: VecDeque<QueryOutcome>,
    pub catalog_results: VecDeque<ResultSet>,
    pub executed: Vec<(String, Vec<WireValue>)>,
    pub catalog_requests: Vec<CatalogRequest>,
    pub batches: Vec<(String, usize)>,
    pub connect_attempts: usize,
    pub close_count: usize,
    pub commit_count: usize,
    pub rollback_count: usize,
    pub autocommit_calls: Vec<bool>,
    pub fail_connect: Option<String>,
    pub fail_execute: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedDriver {
    state: Arc<Mutex<ScriptedState>>,
}

#[allow(dead_code)]
impl ScriptedDriver {
    pub fn push_rows(&self, names: &[&str], rows: Vec<Vec<WireValue>>) {
        self.with_state(|state| {
            state
                .outcomes
                .push_back(QueryOutcome::Rows(ResultSet::with_names(names, rows)));
        });
    }

    pub fn push_result_set(&self, result_set: ResultSet) {
        self.with_state(|state| state.outcomes.push_back(QueryOutcome::Rows(result_set)));
    }

    pub fn push_row_count(&self, count: i64) {
        self.with_state(|state| state.outcomes.push_back(QueryOutcome::RowCount(count)));
    }

    pub fn push_catalog(&self, result_set: ResultSet) {
        self.with_state(|state| state.catalog_results.push_back(result_set));
    }

    pub fn fail_connect(&self, message: impl Into<String>) {
        let message = message.into();
        self.with_state(|state| state.fail_connect = Some(message));
    }

    pub fn fail_execute(&self, message: impl Into<String>) {
        let message = message.into();
        self.with_state(|state| state.fail_execute = Some(message));
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.with_state(|state| state.executed.iter().map(|(sql, _)| sql.clone()).collect())
    }

    pub fn with_state<T>(&self, f: impl FnOnce(&mut ScriptedState) -> T) -> T {
        let mut state = self.state.lock().expect("scripted state lock should not be poisoned");
        f(&mut state)
    }
}

impl Driver for ScriptedDriver {
    fn name(&self) -> &str {
        DRIVER_NAME
    }

    fn connect(&self, _args: &ConnectArgs) -> std::result::Result<Box<dyn Transport>, BoxError> {
        let failure = self.with_state(|state| {
            state.connect_attempts += 1;
            state.fail_connect.clone()
        });
        if let Some(message) = failure {
            return Err(Box::new(io::Error::other(message)));
        }
        Ok(Box::new(ScriptedTransport {
            state: Arc::clone(&self.state),
        }))
    }
}

struct ScriptedTransport {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedTransport {
    fn with_state<T>(&self, f: impl FnOnce(&mut ScriptedState) -> T) -> T {
        let mut state = self.state.lock().expect("scripted state lock should not be poisoned");
        f(&mut state)
    }
}

impl Transport for ScriptedTransport {
    fn execute(
        &mut self,
        sql: &str,
        params: &[WireValue],
    ) -> std::result::Result<QueryOutcome, BoxError> {
        self.with_state(|state| {
            state.executed.push((sql.to_string(), params.to_vec()));
            if let Some(message) = &state.fail_execute {
                return Err(Box::new(io::Error::other(message.clone())) as BoxError);
            }
            Ok(state
                .outcomes
                .pop_front()
                .unwrap_or(QueryOutcome::RowCount(0)))
        })
    }

    fn execute_batch(
        &mut self,
        sql: &str,
        param_sets: &[Vec<WireValue>],
    ) -> std::result::Result<i64, BoxError> {
        self.with_state(|state| {
            state.batches.push((sql.to_string(), param_sets.len()));
            Ok(i64::try_from(param_sets.len()).unwrap_or(-1))
        })
    }

    fn catalog(&mut self, request: &CatalogRequest) -> std::result::Result<ResultSet, BoxError> {
        self.with_state(|state| {
            state.catalog_requests.push(request.clone());
            Ok(state
                .catalog_results
                .pop_front()
                .unwrap_or_else(|| ResultSet::with_names(request.layout(), Vec::new())))
        })
    }

    fn set_autocommit(&mut self, enabled: bool) -> std::result::Result<(), BoxError> {
        self.with_state(|state| state.autocommit_calls.push(enabled));
        Ok(())
    }

    fn commit(&mut self) -> std::result::Result<(), BoxError> {
        self.with_state(|state| state.commit_count += 1);
        Ok(())
    }

    fn rollback(&mut self) -> std::result::Result<(), BoxError> {
        self.with_state(|state| state.rollback_count += 1);
        Ok(())
    }

    fn close(&mut self) -> std::result::Result<(), BoxError> {
        self.with_state(|state| state.close_count += 1);
        Ok(())
    }
}

/// Maps values one-to-one onto the nearest wire representation.
#[derive(Debug, Default)]
pub struct PassthroughCodec;

impl ValueCodec for PassthroughCodec {
    fn encode(&self, value: &Value) -> Result<WireValue> {
        Ok(match value {
            Value::Null => WireValue::Null,
            Value::Bool(value) => WireValue::Bool(*value),
            Value::Integer(value) => WireValue::Int(*value),
            Value::Float(value) => WireValue::Double(*value),
            Value::Decimal(value) => WireValue::Text(value.to_string()),
            Value::String(value) => WireValue::Text(value.clone()),
            Value::Date(value) => WireValue::Text(value.to_string()),
            Value::Timestamp(value) => WireValue::Text(value.to_string()),
        })
    }

    fn decode(&self, value: &WireValue, column: &ColumnDescription) -> Result<Value> {
        Ok(match value {
            WireValue::Null => Value::Null,
            WireValue::Bool(value) => Value::Bool(*value),
            WireValue::Int(value) => Value::Integer(*value),
            WireValue::Double(value) => Value::Float(*value),
            WireValue::Text(text) if column.type_code == "INTEGER" => Value::Integer(
                text.parse()
                    .map_err(|_| Error::coercion(text.clone(), "INTEGER"))?,
            ),
            WireValue::Text(text) => Value::String(text.clone()),
        })
    }
}
