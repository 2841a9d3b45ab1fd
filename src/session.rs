// src/session.rs

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// A per-session, string-keyed store of JSON-encoded values.
///
/// Retrieval distinguishes an absent key (`Ok(None)`) from a present but
/// undecodable value (`Err`), instead of collapsing both into a default.
/// The store holds no locks; callers own synchronization.
#[derive(Debug, Default, Clone)]
pub struct SessionStore {
    values: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `value` as JSON text and stores it under `key`,
    /// replacing any previous value.
    pub fn set<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        let encoded = serde_json::to_string(value)?;
        self.values.insert(key.into(), encoded);
        Ok(())
    }

    /// Decodes the value stored under `key` as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        match self.values.get(key) {
            None => Ok(None),
            Some(encoded) => serde_json::from_str(encoded).map(Some),
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::QuizModel;
    use chrono::{TimeZone, Utc};

    #[test]
    fn round_trips_a_typed_value() {
        let mut session = SessionStore::new();
        let model = QuizModel {
            id: 9,
            section_id: None,
            exercise_ids: vec![1, 2, 3],
            expiration_time: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        };

        session.set("current_quiz", &model).unwrap();
        let back: QuizModel = session.get("current_quiz").unwrap().unwrap();
        assert_eq!(back.id, 9);
        assert_eq!(back.exercise_ids, vec![1, 2, 3]);
        assert_eq!(back.expiration_time, model.expiration_time);
    }

    #[test]
    fn absent_key_is_none_not_error() {
        let session = SessionStore::new();
        let value: Option<i64> = session.get("missing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn undecodable_value_is_an_error() {
        let mut session = SessionStore::new();
        session.set("count", &"not a number").unwrap();

        let result: Result<Option<i64>, _> = session.get("count");
        assert!(result.is_err());
    }

    #[test]
    fn set_overwrites_and_remove_clears() {
        let mut session = SessionStore::new();
        session.set("k", &1i64).unwrap();
        session.set("k", &2i64).unwrap();
        assert_eq!(session.get::<i64>("k").unwrap(), Some(2));

        assert!(session.remove("k"));
        assert!(!session.remove("k"));
        assert_eq!(session.get::<i64>("k").unwrap(), None);
    }
}
