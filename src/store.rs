//! Record store over the single durable slot.
//!
//! The whole collection lives in one serialized value. Every mutation reads
//! the current collection, applies the change and writes the full array back.
//! Failures never reach the caller: reads degrade to an empty collection and
//! a failed write leaves the slot (and the returned collection) as it was.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::Student;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("slot read failed: {0}")]
    SlotRead(String),

    #[error("slot write failed: {0}")]
    SlotWrite(String),

    #[error("stored collection is not decodable: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("collection could not be encoded: {0}")]
    Encode(String),

    #[error("stored collection is invalid: {0}")]
    Invalid(String),

    #[error("student already exists: {0}")]
    DuplicateId(String),
}

/// One named storage location holding a string value.
pub trait Slot {
    fn read(&self) -> Result<Option<String>, StoreError>;
    fn write(&mut self, value: &str) -> Result<(), StoreError>;
}

/// Outcome of a mutation: the collection as it now stands in the slot.
/// `matched` says whether the target id was found (for an add: whether the
/// id was new); `applied` says whether the change reached the slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub students: Vec<Student>,
    pub matched: bool,
    pub applied: bool,
}

impl Mutation {
    fn unchanged(students: Vec<Student>) -> Self {
        Self {
            students,
            matched: false,
            applied: false,
        }
    }
}

pub struct RecordStore<S: Slot> {
    slot: S,
}

impl<S: Slot> RecordStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Reads the collection; missing or unreadable data yields an empty list.
    pub fn list(&self) -> Vec<Student> {
        match self.try_list() {
            Ok(students) => students,
            Err(e) => {
                warn!(error = %e, "reading students failed; treating slot as empty");
                Vec::new()
            }
        }
    }

    pub fn add(&mut self, student: Student) -> Mutation {
        let mut current = self.list();
        if current.iter().any(|s| s.id == student.id) {
            warn!(error = %StoreError::DuplicateId(student.id.clone()), "add ignored");
            return Mutation::unchanged(current);
        }
        let id = student.id.clone();
        current.push(student);
        let m = self.persist(current);
        if m.applied {
            info!(student_id = %id, count = m.students.len(), "student added");
        }
        m
    }

    /// Replaces the record with the same id in full; the stored id and join
    /// date always win. A missing id leaves the collection unchanged.
    pub fn update(&mut self, student: Student) -> Mutation {
        let mut current = self.list();
        let Some(idx) = current.iter().position(|s| s.id == student.id) else {
            debug!(student_id = %student.id, "update target not found");
            return Mutation::unchanged(current);
        };
        let date_joined = current[idx].date_joined;
        let id = student.id.clone();
        current[idx] = Student {
            date_joined,
            ..student
        };
        let m = self.persist(current);
        if m.applied {
            info!(student_id = %id, "student updated");
        }
        m
    }

    pub fn remove(&mut self, id: &str) -> Mutation {
        let current = self.list();
        let before = current.len();
        let remaining: Vec<Student> = current.iter().filter(|s| s.id != id).cloned().collect();
        if remaining.len() == before {
            debug!(student_id = %id, "remove target not found");
            return Mutation::unchanged(current);
        }
        let m = self.persist(remaining);
        if m.applied {
            info!(student_id = %id, count = m.students.len(), "student removed");
        }
        m
    }

    /// Replaces the whole collection, as a restore does. The incoming list
    /// must satisfy the same checks as a stored value.
    pub fn replace_all(&mut self, students: Vec<Student>) -> Result<Mutation, StoreError> {
        validate(&students)?;
        Ok(self.persist(students))
    }

    fn try_list(&self) -> Result<Vec<Student>, StoreError> {
        let Some(raw) = self.slot.read()? else {
            return Ok(Vec::new());
        };
        decode_collection(&raw)
    }

    fn persist(&mut self, students: Vec<Student>) -> Mutation {
        match self.try_persist(&students) {
            Ok(()) => Mutation {
                students,
                matched: true,
                applied: true,
            },
            Err(e) => {
                warn!(error = %e, "saving students failed; slot left unchanged");
                Mutation {
                    students: self.list(),
                    matched: true,
                    applied: false,
                }
            }
        }
    }

    fn try_persist(&mut self, students: &[Student]) -> Result<(), StoreError> {
        let raw = encode_collection(students)?;
        self.slot.write(&raw)
    }
}

/// Typed decode of a stored collection. Anything structurally off (wrong
/// shape, unknown class label, negative amounts, repeated ids) is an error.
pub fn decode_collection(raw: &str) -> Result<Vec<Student>, StoreError> {
    let students: Vec<Student> = serde_json::from_str(raw)?;
    validate(&students)?;
    Ok(students)
}

pub fn encode_collection(students: &[Student]) -> Result<String, StoreError> {
    serde_json::to_string(students).map_err(|e| StoreError::Encode(e.to_string()))
}

fn validate(students: &[Student]) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for s in students {
        if !s.is_well_formed() {
            return Err(StoreError::Invalid(format!("malformed record {}", s.id)));
        }
        if !seen.insert(s.id.as_str()) {
            return Err(StoreError::Invalid(format!("repeated id {}", s.id)));
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{ClassName, StudentDraft};
    use chrono::{TimeZone, Utc};

    #[derive(Default)]
    pub(crate) struct MemorySlot {
        pub value: Option<String>,
        pub fail_reads: bool,
        pub fail_writes: bool,
    }

    impl Slot for MemorySlot {
        fn read(&self) -> Result<Option<String>, StoreError> {
            if self.fail_reads {
                return Err(StoreError::SlotRead("unavailable".to_string()));
            }
            Ok(self.value.clone())
        }

        fn write(&mut self, value: &str) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::SlotWrite("quota exceeded".to_string()));
            }
            self.value = Some(value.to_string());
            Ok(())
        }
    }

    pub(crate) fn student(name: &str, class: &str, total: f64, paid: f64) -> Student {
        StudentDraft {
            name: name.to_string(),
            class_name: Some(class.to_string()),
            total_fees: Some(total),
            fees_paid: Some(paid),
        }
        .into_student(Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap())
        .unwrap()
    }

    fn persisted(store: &RecordStore<MemorySlot>) -> Vec<Student> {
        decode_collection(store.slot.value.as_deref().unwrap_or("[]")).unwrap()
    }

    #[test]
    fn empty_slot_lists_nothing() {
        let store = RecordStore::new(MemorySlot::default());
        assert!(store.list().is_empty());
    }

    #[test]
    fn malformed_or_unreadable_slot_lists_nothing() {
        for raw in [
            "not json",
            "{\"id\":1}",
            r#"[{"id":"a","name":"X","className":"12th","totalFees":1,"dateJoined":"2024-01-01T00:00:00Z"}]"#,
            r#"[{"id":"a","name":"X","className":"5th","totalFees":-4,"dateJoined":"2024-01-01T00:00:00Z"}]"#,
        ] {
            let store = RecordStore::new(MemorySlot {
                value: Some(raw.to_string()),
                ..Default::default()
            });
            assert!(store.list().is_empty(), "expected empty for {raw}");
        }

        let store = RecordStore::new(MemorySlot {
            fail_reads: true,
            ..Default::default()
        });
        assert!(store.list().is_empty());
    }

    #[test]
    fn mutations_keep_slot_and_result_in_step() {
        let mut store = RecordStore::new(MemorySlot::default());
        let a = student("Asha", "5th", 5000.0, 2000.0);
        let b = student("Bilal", "6th", 1000.0, 1000.0);

        let after_a = store.add(a.clone()).students;
        assert_eq!(after_a.len(), 1);
        assert_eq!(after_a, persisted(&store));

        let after_b = store.add(b.clone()).students;
        assert_eq!(after_b.len(), 2);
        assert_eq!(after_b, persisted(&store));

        let mut edited = a.clone();
        edited.fees_paid = 4500.0;
        let after_edit = store.update(edited).students;
        assert_eq!(after_edit, persisted(&store));
        assert_eq!(after_edit[0].fees_paid, 4500.0);

        let after_remove = store.remove(&b.id).students;
        assert_eq!(after_remove.len(), 1);
        assert_eq!(after_remove, persisted(&store));
    }

    #[test]
    fn whitespace_name_from_older_builds_survives_reads_and_saves() {
        let asha = student("Asha", "5th", 5000.0, 2000.0);
        let raw = format!(
            "[{},{}]",
            serde_json::to_string(&asha).unwrap(),
            r#"{"id":"x","name":"  ","className":"6th","totalFees":100,"feesPaid":0,"dateJoined":"2024-02-01T00:00:00Z"}"#
        );
        let mut store = RecordStore::new(MemorySlot {
            value: Some(raw),
            ..Default::default()
        });

        let listed = store.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], asha);
        assert_eq!(listed[1].name, "  ");

        let m = store.add(student("New", "7th", 10.0, 0.0));
        assert!(m.applied);
        let kept = persisted(&store);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept, m.students);
        assert!(kept.iter().any(|s| s.id == asha.id));
        assert!(kept.iter().any(|s| s.id == "x"));
    }

    #[test]
    fn add_rejects_repeated_id() {
        let mut store = RecordStore::new(MemorySlot::default());
        let a = student("Asha", "5th", 10.0, 0.0);
        store.add(a.clone());

        let mut twin = student("Other", "9th", 20.0, 0.0);
        twin.id = a.id.clone();
        let m = store.add(twin);
        assert!(!m.matched);
        assert!(!m.applied);
        assert_eq!(m.students, vec![a]);
    }

    #[test]
    fn remove_of_missing_id_is_noop() {
        let mut store = RecordStore::new(MemorySlot::default());
        let before = store.add(student("Asha", "5th", 10.0, 0.0)).students;
        let m = store.remove("no-such-id");
        assert!(!m.matched);
        assert!(!m.applied);
        assert_eq!(m.students, before);
    }

    #[test]
    fn update_keeps_identity_and_join_date() {
        let mut store = RecordStore::new(MemorySlot::default());
        let a = student("Asha", "5th", 5000.0, 2000.0);
        store.add(a.clone());

        let mut edit = a.clone();
        edit.name = "Asha K".to_string();
        edit.class_name = ClassName::Sixth;
        edit.date_joined = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let m = store.update(edit);
        assert!(m.matched && m.applied);
        let after = m.students;

        assert_eq!(after[0].id, a.id);
        assert_eq!(after[0].date_joined, a.date_joined);
        assert_eq!(after[0].name, "Asha K");
        assert_eq!(after[0].class_name, ClassName::Sixth);
        assert_eq!(after[0].total_fees, 5000.0);
    }

    #[test]
    fn update_of_missing_id_is_silent_noop() {
        let mut store = RecordStore::new(MemorySlot::default());
        let before = store.add(student("Asha", "5th", 5000.0, 2000.0)).students;
        let m = store.update(student("Ghost", "8th", 1.0, 0.0));
        assert!(!m.matched);
        assert!(!m.applied);
        assert_eq!(m.students, before);
    }

    #[test]
    fn failed_write_leaves_previous_collection() {
        let mut store = RecordStore::new(MemorySlot::default());
        let a = student("Asha", "5th", 5000.0, 2000.0);
        let before = store.add(a.clone()).students;

        store.slot.fail_writes = true;

        let added = store.add(student("Bilal", "6th", 1.0, 0.0));
        assert!(added.matched);
        assert!(!added.applied);
        assert_eq!(added.students, before);

        let mut edit = a.clone();
        edit.fees_paid = 5000.0;
        let updated = store.update(edit);
        assert!(updated.matched);
        assert!(!updated.applied);
        assert_eq!(updated.students, before);

        let removed = store.remove(&a.id);
        assert!(removed.matched);
        assert!(!removed.applied);
        assert_eq!(removed.students, before);

        assert_eq!(persisted(&store), before);
    }

    #[test]
    fn replace_all_refuses_repeated_ids() {
        let mut store = RecordStore::new(MemorySlot::default());
        let a = student("Asha", "5th", 1.0, 0.0);
        assert!(store.replace_all(vec![a.clone(), a]).is_err());
        assert!(store.list().is_empty());
    }
}
