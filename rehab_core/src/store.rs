//! Entity store for exercises, patients, prescriptions and progress.
//!
//! Handlers talk to the `Repository` trait so the backing store can be
//! swapped without touching request handling. `InMemoryStore` keeps every
//! table behind one lock, so composite mutations such as prescription
//! creation are applied as a single critical section.

use crate::{Error, Exercise, Patient, Prescription, ProgressEvent, Result};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Storage abstraction over the four entity tables
pub trait Repository: Send + Sync {
    fn create_exercise(&self, exercise: Exercise) -> Result<Exercise>;
    fn list_exercises(&self, symptom: Option<&str>) -> Result<Vec<Exercise>>;
    fn get_exercise(&self, id: &str) -> Result<Exercise>;
    fn update_exercise(&self, id: &str, exercise: Exercise) -> Result<Exercise>;
    fn delete_exercise(&self, id: &str) -> Result<()>;

    fn create_patient(&self, patient: Patient) -> Result<Patient>;
    fn list_patients(&self) -> Result<Vec<Patient>>;
    fn get_patient(&self, national_id: &str) -> Result<Patient>;
    fn update_patient(&self, national_id: &str, patient: Patient) -> Result<Patient>;

    /// Insert a prescription and append its exercise id to the patient's
    /// active prescriptions. Nothing is written when any check fails.
    fn create_prescription(&self, prescription: Prescription) -> Result<Prescription>;
    fn get_prescription(&self, id: &str) -> Result<Prescription>;
    fn list_prescriptions(&self, patient_id: Option<&str>) -> Result<Vec<Prescription>>;

    fn get_progress(&self, national_id: &str) -> Result<Vec<ProgressEvent>>;
    fn add_progress(&self, national_id: &str, event: ProgressEvent) -> Result<ProgressEvent>;
}

/// Keyed table that remembers insertion order
#[derive(Debug)]
struct Table<T> {
    order: Vec<String>,
    rows: HashMap<String, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            rows: HashMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn contains(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&T> {
        self.rows.get(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.rows.get_mut(key)
    }

    /// Insert a new row. Callers check for duplicates first.
    fn insert(&mut self, key: String, row: T) {
        self.order.push(key.clone());
        self.rows.insert(key, row);
    }

    /// Replace an existing row in place, keeping its position
    fn replace(&mut self, key: &str, row: T) -> Option<T> {
        self.rows.get_mut(key).map(|slot| std::mem::replace(slot, row))
    }

    fn remove(&mut self, key: &str) -> Option<T> {
        let removed = self.rows.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|k| self.rows.get(k))
    }
}

#[derive(Debug, Default)]
struct Tables {
    exercises: Table<Exercise>,
    patients: Table<Patient>,
    prescriptions: Table<Prescription>,
    progress: HashMap<String, Vec<ProgressEvent>>,
}

/// Process-lifetime store backed by in-memory tables
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| Error::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| Error::LockPoisoned)
    }
}

impl Repository for InMemoryStore {
    fn create_exercise(&self, exercise: Exercise) -> Result<Exercise> {
        let mut tables = self.write()?;
        if tables.exercises.contains(&exercise.id) {
            return Err(Error::AlreadyExists("Exercise"));
        }
        tables.exercises.insert(exercise.id.clone(), exercise.clone());
        tracing::info!("Created exercise {}", exercise.id);
        Ok(exercise)
    }

    fn list_exercises(&self, symptom: Option<&str>) -> Result<Vec<Exercise>> {
        let tables = self.read()?;
        let exercises = tables
            .exercises
            .values()
            .filter(|e| symptom.map_or(true, |s| e.symptom == s))
            .cloned()
            .collect();
        Ok(exercises)
    }

    fn get_exercise(&self, id: &str) -> Result<Exercise> {
        let tables = self.read()?;
        tables
            .exercises
            .get(id)
            .cloned()
            .ok_or(Error::NotFound("Exercise"))
    }

    fn update_exercise(&self, id: &str, exercise: Exercise) -> Result<Exercise> {
        let mut tables = self.write()?;
        tables
            .exercises
            .replace(id, exercise.clone())
            .ok_or(Error::NotFound("Exercise"))?;
        tracing::info!("Replaced exercise {}", id);
        Ok(exercise)
    }

    fn delete_exercise(&self, id: &str) -> Result<()> {
        let mut tables = self.write()?;
        tables
            .exercises
            .remove(id)
            .ok_or(Error::NotFound("Exercise"))?;
        tracing::info!("Deleted exercise {}", id);
        Ok(())
    }

    fn create_patient(&self, patient: Patient) -> Result<Patient> {
        let mut tables = self.write()?;
        if tables.patients.contains(&patient.national_id) {
            return Err(Error::AlreadyExists("Patient"));
        }
        tables
            .patients
            .insert(patient.national_id.clone(), patient.clone());
        tracing::info!("Registered patient {}", patient.national_id);
        Ok(patient)
    }

    fn list_patients(&self) -> Result<Vec<Patient>> {
        let tables = self.read()?;
        Ok(tables.patients.values().cloned().collect())
    }

    fn get_patient(&self, national_id: &str) -> Result<Patient> {
        let tables = self.read()?;
        tables
            .patients
            .get(national_id)
            .cloned()
            .ok_or(Error::NotFound("Patient"))
    }

    fn update_patient(&self, national_id: &str, patient: Patient) -> Result<Patient> {
        let mut tables = self.write()?;
        tables
            .patients
            .replace(national_id, patient.clone())
            .ok_or(Error::NotFound("Patient"))?;
        tracing::info!("Replaced patient {}", national_id);
        Ok(patient)
    }

    fn create_prescription(&self, prescription: Prescription) -> Result<Prescription> {
        let mut tables = self.write()?;
        if tables.prescriptions.contains(&prescription.id) {
            return Err(Error::AlreadyExists("Prescription"));
        }
        if !tables.exercises.contains(&prescription.exercise_id) {
            return Err(Error::NotFound("Exercise"));
        }

        let patient = tables
            .patients
            .get_mut(&prescription.patient_id)
            .ok_or(Error::NotFound("Patient"))?;
        patient
            .active_prescriptions
            .push(prescription.exercise_id.clone());

        tables
            .prescriptions
            .insert(prescription.id.clone(), prescription.clone());

        tracing::info!(
            "Prescribed exercise {} to patient {} ({} reps x {}/day)",
            prescription.exercise_id,
            prescription.patient_id,
            prescription.repetitions,
            prescription.frequency_per_day
        );
        Ok(prescription)
    }

    fn get_prescription(&self, id: &str) -> Result<Prescription> {
        let tables = self.read()?;
        tables
            .prescriptions
            .get(id)
            .cloned()
            .ok_or(Error::NotFound("Prescription"))
    }

    fn list_prescriptions(&self, patient_id: Option<&str>) -> Result<Vec<Prescription>> {
        let tables = self.read()?;
        let prescriptions = tables
            .prescriptions
            .values()
            .filter(|p| patient_id.map_or(true, |id| p.patient_id == id))
            .cloned()
            .collect();
        Ok(prescriptions)
    }

    fn get_progress(&self, national_id: &str) -> Result<Vec<ProgressEvent>> {
        let tables = self.read()?;
        if !tables.patients.contains(national_id) {
            return Err(Error::NotFound("Patient"));
        }
        Ok(tables.progress.get(national_id).cloned().unwrap_or_default())
    }

    fn add_progress(&self, national_id: &str, event: ProgressEvent) -> Result<ProgressEvent> {
        let mut tables = self.write()?;
        if !tables.patients.contains(national_id) {
            return Err(Error::NotFound("Patient"));
        }
        let events = tables.progress.entry(national_id.to_string()).or_default();
        events.push(event.clone());
        tracing::debug!(
            "Logged progress for patient {} ({} events)",
            national_id,
            events.len()
        );
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Comparator, ExerciseStep, MetricObservation, MovementThreshold};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn create_test_exercise(id: &str, symptom: &str) -> Exercise {
        Exercise {
            id: id.into(),
            symptom: symptom.into(),
            title: format!("Exercise {}", id),
            description: "Slow controlled movement".into(),
            steps: vec![ExerciseStep {
                index: 0,
                title: "Hold".into(),
                description: "Hold the position".into(),
                video_url: None,
                avatar_style: "real".into(),
                thresholds: vec![],
            }],
            created_at: Utc::now(),
        }
    }

    fn create_test_patient(national_id: &str) -> Patient {
        Patient {
            national_id: national_id.into(),
            name: "Test Patient".into(),
            birthdate: Utc.with_ymd_and_hms(1985, 3, 14, 0, 0, 0).unwrap(),
            active_prescriptions: vec![],
        }
    }

    fn create_test_prescription(id: &str, patient_id: &str, exercise_id: &str) -> Prescription {
        Prescription {
            id: id.into(),
            patient_id: patient_id.into(),
            exercise_id: exercise_id.into(),
            repetitions: 10,
            frequency_per_day: 3,
            notes: None,
            issued_at: Utc::now(),
        }
    }

    fn create_test_event(repetition_index: i64) -> ProgressEvent {
        ProgressEvent {
            timestamp: Utc::now(),
            exercise_id: "chin_tuck".into(),
            repetition_index,
            success: true,
            metrics: vec![MetricObservation {
                threshold: MovementThreshold {
                    metric: "neck_rotation".into(),
                    comparator: Comparator::AtLeast,
                    value: 30.0,
                    secondary_value: None,
                    unit: "deg".into(),
                    coaching_prompt: "Rotate further".into(),
                },
                actual_value: 32.0,
            }],
            deviation_report: None,
        }
    }

    fn seeded_store() -> InMemoryStore {
        crate::logging::init_test();
        let store = InMemoryStore::new();
        store.create_exercise(create_test_exercise("chin_tuck", "neck")).unwrap();
        store.create_patient(create_test_patient("p1")).unwrap();
        store
    }

    #[test]
    fn test_create_and_get_exercise() {
        let store = InMemoryStore::new();
        let exercise = create_test_exercise("jaw_open", "tmj");

        let stored = store.create_exercise(exercise.clone()).unwrap();
        assert_eq!(stored, exercise);
        assert_eq!(store.get_exercise("jaw_open").unwrap(), exercise);
    }

    #[test]
    fn test_duplicate_exercise_conflicts() {
        let store = seeded_store();
        let err = store
            .create_exercise(create_test_exercise("chin_tuck", "other"))
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists("Exercise")));

        // Original is untouched
        assert_eq!(store.get_exercise("chin_tuck").unwrap().symptom, "neck");
    }

    #[test]
    fn test_list_exercises_filters_by_symptom() {
        let store = InMemoryStore::new();
        store.create_exercise(create_test_exercise("a", "tmj")).unwrap();
        store.create_exercise(create_test_exercise("b", "neck")).unwrap();
        store.create_exercise(create_test_exercise("c", "tmj")).unwrap();

        let tmj: Vec<_> = store
            .list_exercises(Some("tmj"))
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(tmj, vec!["a", "c"]);

        let all: Vec<_> = store
            .list_exercises(None)
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(all, vec!["a", "b", "c"]);

        assert!(store.list_exercises(Some("TMJ")).unwrap().is_empty());
    }

    #[test]
    fn test_update_keeps_insertion_position() {
        let store = InMemoryStore::new();
        store.create_exercise(create_test_exercise("a", "tmj")).unwrap();
        store.create_exercise(create_test_exercise("b", "tmj")).unwrap();

        let mut replacement = create_test_exercise("a", "neck");
        replacement.title = "Renamed".into();
        store.update_exercise("a", replacement).unwrap();

        let listed = store.list_exercises(None).unwrap();
        assert_eq!(listed[0].title, "Renamed");
        assert_eq!(listed[1].id, "b");
    }

    #[test]
    fn test_update_missing_exercise() {
        let store = InMemoryStore::new();
        let err = store
            .update_exercise("ghost", create_test_exercise("ghost", "tmj"))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound("Exercise")));
        assert!(store.list_exercises(None).unwrap().is_empty());
    }

    #[test]
    fn test_delete_then_get_fails() {
        let store = seeded_store();
        store.delete_exercise("chin_tuck").unwrap();

        assert!(matches!(
            store.get_exercise("chin_tuck").unwrap_err(),
            Error::NotFound("Exercise")
        ));
        assert!(matches!(
            store.delete_exercise("chin_tuck").unwrap_err(),
            Error::NotFound("Exercise")
        ));
        assert!(store.list_exercises(None).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_patient_conflicts() {
        let store = seeded_store();
        let err = store.create_patient(create_test_patient("p1")).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists("Patient")));
        assert_eq!(store.list_patients().unwrap().len(), 1);
    }

    #[test]
    fn test_prescription_appends_active_exercise() {
        let store = seeded_store();
        store
            .create_prescription(create_test_prescription("rx1", "p1", "chin_tuck"))
            .unwrap();
        store
            .create_prescription(create_test_prescription("rx2", "p1", "chin_tuck"))
            .unwrap();

        let patient = store.get_patient("p1").unwrap();
        assert_eq!(patient.active_prescriptions, vec!["chin_tuck", "chin_tuck"]);
        assert_eq!(store.list_prescriptions(Some("p1")).unwrap().len(), 2);
    }

    #[test]
    fn test_prescription_for_unknown_patient_writes_nothing() {
        let store = seeded_store();
        let err = store
            .create_prescription(create_test_prescription("rx1", "nobody", "chin_tuck"))
            .unwrap_err();

        assert!(matches!(err, Error::NotFound("Patient")));
        assert!(store.list_prescriptions(None).unwrap().is_empty());
        assert!(store.get_prescription("rx1").is_err());
    }

    #[test]
    fn test_prescription_for_unknown_exercise() {
        let store = seeded_store();
        let err = store
            .create_prescription(create_test_prescription("rx1", "p1", "ghost"))
            .unwrap_err();

        assert!(matches!(err, Error::NotFound("Exercise")));
        assert!(store.get_patient("p1").unwrap().active_prescriptions.is_empty());
    }

    #[test]
    fn test_duplicate_prescription_checked_first() {
        let store = seeded_store();
        store
            .create_prescription(create_test_prescription("rx1", "p1", "chin_tuck"))
            .unwrap();

        // Conflict wins even when the references are also bad
        let err = store
            .create_prescription(create_test_prescription("rx1", "nobody", "ghost"))
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists("Prescription")));
        assert_eq!(store.get_patient("p1").unwrap().active_prescriptions.len(), 1);
    }

    #[test]
    fn test_progress_append_and_read() {
        let store = seeded_store();
        assert!(store.get_progress("p1").unwrap().is_empty());

        store.add_progress("p1", create_test_event(0)).unwrap();
        let event = create_test_event(1);
        store.add_progress("p1", event.clone()).unwrap();

        let events = store.get_progress("p1").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events.last(), Some(&event));
    }

    #[test]
    fn test_progress_requires_patient() {
        let store = seeded_store();
        assert!(matches!(
            store.get_progress("nobody").unwrap_err(),
            Error::NotFound("Patient")
        ));
        assert!(matches!(
            store.add_progress("nobody", create_test_event(0)).unwrap_err(),
            Error::NotFound("Patient")
        ));
    }

    #[test]
    fn test_update_patient_replaces_record() {
        let store = seeded_store();
        let mut patient = create_test_patient("p1");
        patient.name = "Renamed".into();

        store.update_patient("p1", patient).unwrap();
        assert_eq!(store.get_patient("p1").unwrap().name, "Renamed");
        assert!(store
            .update_patient("nobody", create_test_patient("nobody"))
            .is_err());
    }

    #[test]
    fn test_concurrent_prescriptions_all_recorded() {
        let store = Arc::new(seeded_store());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .create_prescription(create_test_prescription(
                            &format!("rx{}", i),
                            "p1",
                            "chin_tuck",
                        ))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let patient = store.get_patient("p1").unwrap();
        assert_eq!(patient.active_prescriptions.len(), 8);
        assert_eq!(store.list_prescriptions(None).unwrap().len(), 8);
    }
}
