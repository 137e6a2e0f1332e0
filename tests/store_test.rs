use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use student_manager::error::AppError;
use student_manager::models::{Course, Grade, Student, UpdateStudentRequest};
use student_manager::store::{CourseStore, GradeStore, StudentStore};

fn students_path(dir: &TempDir) -> PathBuf {
    dir.path().join("students.jsonl")
}

#[test]
fn students_round_trip_preserves_fields_and_order() {
    let dir = TempDir::new().unwrap();
    let path = students_path(&dir);

    let (first, second) = {
        let mut store = StudentStore::open(&path);
        let first = store.add(Student::new("Alice", "alice@example.com")).unwrap();
        let second = store.add(Student::new("Bob", "bob@example.com")).unwrap();
        (first, second)
    };

    let reopened = StudentStore::open(&path);
    let students = reopened.get_all();
    assert_eq!(students.len(), 2);
    assert_eq!(students[0].student_id, first.student_id);
    assert_eq!(students[1].student_id, second.student_id);
    assert_eq!(students[0].name, "Alice");
    assert_eq!(students[0].email, "alice@example.com");
    assert_eq!(students[0].gpa, None);
    assert_eq!(
        students[0].created_at.timestamp(),
        first.created_at.timestamp()
    );
}

#[test]
fn missing_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    let store = StudentStore::open(students_path(&dir));
    assert!(store.get_all().is_empty());
}

#[test]
fn malformed_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = students_path(&dir);
    fs::write(&path, "{ this is not json\n").unwrap();

    let store = StudentStore::open(&path);
    assert!(store.get_all().is_empty());
}

#[test]
fn one_bad_line_discards_the_load() {
    let dir = TempDir::new().unwrap();
    let path = students_path(&dir);

    {
        let mut store = StudentStore::open(&path);
        store.add(Student::new("Alice", "alice@example.com")).unwrap();
    }
    let mut contents = fs::read_to_string(&path).unwrap();
    contents.push_str("not a record\n");
    fs::write(&path, contents).unwrap();

    let store = StudentStore::open(&path);
    assert!(store.get_all().is_empty());
}

#[test]
fn unparsable_timestamp_falls_back_to_now() {
    let dir = TempDir::new().unwrap();
    let path = students_path(&dir);
    let line = r#"{"student_id":"s-1","name":"Alice","email":"alice@example.com","created_at":"yesterday-ish","gpa":null}"#;
    fs::write(&path, format!("{line}\n")).unwrap();
    let before = chrono::Utc::now();

    let store = StudentStore::open(&path);
    let student = store.get_by_id("s-1").unwrap();
    assert!(student.created_at >= before);
}

#[test]
fn blocked_save_keeps_the_mutation_in_memory() {
    let dir = TempDir::new().unwrap();
    // a plain file where the data directory should be makes every write fail
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    let path = blocker.join("students.jsonl");

    let mut store = StudentStore::open(&path);
    let alice = store.add(Student::new("Alice", "alice@example.com")).unwrap();

    assert_eq!(store.get_all().len(), 1);
    assert_eq!(store.get_by_id(&alice.student_id).unwrap().name, "Alice");
    assert!(!path.exists());

    assert!(store.delete(&alice.student_id));
    assert!(store.get_all().is_empty());
}

#[test]
fn deleting_preserves_the_order_of_the_rest() {
    let dir = TempDir::new().unwrap();
    let path = students_path(&dir);

    let (a, b, c) = {
        let mut store = StudentStore::open(&path);
        let a = store.add(Student::new("A", "a@example.com")).unwrap();
        let b = store.add(Student::new("B", "b@example.com")).unwrap();
        let c = store.add(Student::new("C", "c@example.com")).unwrap();
        assert!(store.delete(&b.student_id));
        (a, b, c)
    };

    let reopened = StudentStore::open(&path);
    let ids: Vec<String> = reopened
        .get_all()
        .into_iter()
        .map(|s| s.student_id)
        .collect();
    assert_eq!(ids, vec![a.student_id, c.student_id]);
    assert!(reopened.get_by_id(&b.student_id).is_none());
}

#[test]
fn duplicate_email_is_rejected_before_persisting() {
    let dir = TempDir::new().unwrap();
    let path = students_path(&dir);
    let mut store = StudentStore::open(&path);

    store.add(Student::new("Alice", "alice@example.com")).unwrap();
    let err = store
        .add(Student::new("Imposter", "alice@example.com"))
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    assert_eq!(store.get_all().len(), 1);
    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 1);
}

#[test]
fn update_patches_only_present_fields() {
    let dir = TempDir::new().unwrap();
    let path = students_path(&dir);

    let id = {
        let mut store = StudentStore::open(&path);
        let alice = store.add(Student::new("Alice", "alice@example.com")).unwrap();
        let updated = store
            .update(
                &alice.student_id,
                UpdateStudentRequest {
                    name: Some("Alice Smith".to_string()),
                    email: None,
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Alice Smith");
        assert_eq!(updated.email, "alice@example.com");
        alice.student_id
    };

    let reopened = StudentStore::open(&path);
    assert_eq!(reopened.get_by_id(&id).unwrap().name, "Alice Smith");
}

#[test]
fn update_unknown_id_is_none() {
    let dir = TempDir::new().unwrap();
    let mut store = StudentStore::open(students_path(&dir));
    let result = store
        .update(
            "missing",
            UpdateStudentRequest {
                name: Some("X".to_string()),
                email: None,
            },
        )
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn changing_email_to_another_students_is_a_conflict() {
    let dir = TempDir::new().unwrap();
    let mut store = StudentStore::open(students_path(&dir));

    store.add(Student::new("Alice", "alice@example.com")).unwrap();
    let bob = store.add(Student::new("Bob", "bob@example.com")).unwrap();

    let err = store
        .update(
            &bob.student_id,
            UpdateStudentRequest {
                name: None,
                email: Some("alice@example.com".to_string()),
            },
        )
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // re-submitting your own email is not a conflict
    let kept = store
        .update(
            &bob.student_id,
            UpdateStudentRequest {
                name: None,
                email: Some("bob@example.com".to_string()),
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(kept.email, "bob@example.com");
}

#[test]
fn set_gpa_round_trips_and_validates() {
    let dir = TempDir::new().unwrap();
    let path = students_path(&dir);

    let id = {
        let mut store = StudentStore::open(&path);
        let alice = store.add(Student::new("Alice", "alice@example.com")).unwrap();
        let updated = store.set_gpa(&alice.student_id, Some(4.25)).unwrap().unwrap();
        assert_eq!(updated.gpa, Some(4.25));

        let err = store.set_gpa(&alice.student_id, Some(5.5)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        alice.student_id
    };

    let mut reopened = StudentStore::open(&path);
    assert_eq!(reopened.get_by_id(&id).unwrap().gpa, Some(4.25));

    let cleared = reopened.set_gpa(&id, None).unwrap().unwrap();
    assert_eq!(cleared.gpa, None);
}

#[test]
fn course_codes_are_unique() {
    let dir = TempDir::new().unwrap();
    let mut store = CourseStore::open(dir.path().join("courses.jsonl"));

    let cs = store.add(Course::new("CS101", "Programming", 4)).unwrap();
    let err = store
        .add(Course::new("CS101", "Programming again", 3))
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    assert_eq!(store.get_by_code("CS101").unwrap().course_id, cs.course_id);
    assert!(store.get_by_code("MA201").is_none());
}

#[test]
fn grade_queries_filter_by_student_and_course() {
    let dir = TempDir::new().unwrap();
    let mut store = GradeStore::open(dir.path().join("grades.jsonl"));

    store.add(Grade::new("s-1", "c-1", 90.0)).unwrap();
    store.add(Grade::new("s-1", "c-2", 70.0)).unwrap();
    store.add(Grade::new("s-2", "c-1", 50.0)).unwrap();

    assert_eq!(store.get_by_student("s-1").len(), 2);
    assert_eq!(store.get_by_course("c-1").len(), 2);
    let both = store.get_by_student_and_course("s-1", "c-1");
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].score, 90.0);
    assert!(store.get_by_student_and_course("s-2", "c-2").is_empty());
}

#[test]
fn update_score_recomputes_the_letter_and_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grades.jsonl");

    let id = {
        let mut store = GradeStore::open(&path);
        let grade = store.add(Grade::new("s-1", "c-1", 95.0)).unwrap();
        assert_eq!(grade.letter_grade, "5");

        let updated = store.update_score(&grade.grade_id, 59.0).unwrap();
        assert_eq!(updated.score, 59.0);
        assert_eq!(updated.letter_grade, "1");
        grade.grade_id
    };

    let reopened = GradeStore::open(&path);
    let grade = reopened.get_by_id(&id).unwrap();
    assert_eq!(grade.score, 59.0);
    assert_eq!(grade.letter_grade, "1");
}

#[test]
fn letter_is_recomputed_when_the_file_disagrees() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grades.jsonl");
    let line = r#"{"grade_id":"g-1","student_id":"s-1","course_id":"c-1","score":95.0,"letter_grade":"1","date":"2024-05-01T10:00:00+00:00"}"#;
    fs::write(&path, format!("{line}\n")).unwrap();

    let store = GradeStore::open(&path);
    assert_eq!(store.get_by_id("g-1").unwrap().letter_grade, "5");
}

#[test]
fn student_gpa_distinguishes_no_grades_from_low_grades() {
    let dir = TempDir::new().unwrap();
    let mut store = GradeStore::open(dir.path().join("grades.jsonl"));

    assert_eq!(store.student_gpa("s-1"), None);

    store.add(Grade::new("s-1", "c-1", 100.0)).unwrap();
    store.add(Grade::new("s-1", "c-2", 80.0)).unwrap();
    store.add(Grade::new("s-1", "c-3", 60.0)).unwrap();
    assert_eq!(store.student_gpa("s-1"), Some(4.0));

    store.add(Grade::new("s-2", "c-1", 0.0)).unwrap();
    assert_eq!(store.student_gpa("s-2"), Some(0.0));
}

#[test]
fn cyrillic_text_survives_on_disk_verbatim() {
    let dir = TempDir::new().unwrap();
    let path = students_path(&dir);

    {
        let mut store = StudentStore::open(&path);
        store
            .add(Student::new("Иван Иванов", "ivan@example.com"))
            .unwrap();
    }

    let contents = fs::read_to_string(&path).unwrap();
    assert!(
        contents.contains("Иван Иванов"),
        "expected raw UTF-8 in the file, got: {contents}"
    );

    let reopened = StudentStore::open(&path);
    assert_eq!(reopened.get_all()[0].name, "Иван Иванов");
}
