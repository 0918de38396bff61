use super::common::*;
use crate::electives::course::CourseCode;
use crate::electives::demographics::{Gender, Grade};
use crate::electives::ingest::IngestError;
use crate::electives::profile::ProfileId;
use crate::electives::registry::{BuildOutcome, IngestDiagnostic, ProfileRegistry};

fn build(body: &str, sink: &RecordingSink) -> (ProfileRegistry, Result<BuildOutcome, IngestError>) {
    let mut registry = ProfileRegistry::new();
    let result = registry.build(&profile_rows(body), &catalog(), sink);
    (registry, result)
}

#[test]
fn build_parses_every_field() {
    let sink = RecordingSink::default();
    let (registry, result) = build(
        "ada1001@school.org,Ada,Lovelace,F,11,150,77,HIKE,,RAFT\n\
         alan1002@school.org,Alan,Turing,m,9,0,78\n",
        &sink,
    );

    match result.expect("build succeeds") {
        BuildOutcome::Built(report) => {
            assert_eq!(report.profiles, 2);
            assert!(report.diagnostics.is_empty());
        }
        other => panic!("expected a fresh build, got {other:?}"),
    }
    assert_eq!(registry.count(), 2);
    assert!(sink.reports().is_empty());

    let ada = registry.get(ProfileId(1001)).expect("ada registered");
    assert_eq!(ada.full_name(), "Ada Lovelace");
    assert_eq!(ada.cell(), (Grade::Junior, Gender::Female));
    assert_eq!(ada.points(), 150);
    assert_eq!(ada.lotto_number(), 77);
    assert_eq!(
        ada.previous_courses(),
        &[CourseCode::new("HIKE"), CourseCode::new("RAFT")]
    );

    let alan = registry.get(ProfileId(1002)).expect("alan registered");
    assert_eq!(alan.grade(), Grade::Freshman);
    assert!(alan.previous_courses().is_empty());
    assert!(registry.get(ProfileId(9999)).is_none());
}

#[test]
fn lottery_collision_is_a_warning_not_a_failure() {
    let sink = RecordingSink::default();
    let logs = CapturedLogs::default();
    let (registry, result) = logs.capture(|| {
        build(
            "a2001@school.org,A,One,M,10,10,5\n\
             b2002@school.org,B,Two,F,10,10,5\n",
            &sink,
        )
    });

    match result.expect("build succeeds") {
        BuildOutcome::Built(report) => assert_eq!(
            report.diagnostics,
            vec![IngestDiagnostic::LotteryCollision {
                id: ProfileId(2002),
                lotto_number: 5,
            }]
        ),
        other => panic!("expected a fresh build, got {other:?}"),
    }
    assert_eq!(registry.count(), 2);
    assert!(sink.reports().is_empty());

    let output = logs.contents();
    assert!(output.contains("WARN"), "{output}");
    assert!(output.contains("shares a lottery number"), "{output}");
    assert!(output.contains("lotto_number=5"), "{output}");
}

#[test]
fn negative_lottery_number_is_accepted() {
    let sink = RecordingSink::default();
    let (registry, result) = build(
        "neg9001@school.org,Neg,Lotto,F,11,10,-3\n\
         pos9002@school.org,Pos,Lotto,M,11,10,3\n",
        &sink,
    );

    match result.expect("build succeeds") {
        BuildOutcome::Built(report) => {
            assert_eq!(report.profiles, 2);
            assert!(report.diagnostics.is_empty());
        }
        other => panic!("expected a fresh build, got {other:?}"),
    }
    assert!(sink.reports().is_empty());
    assert_eq!(
        registry
            .get(ProfileId(9001))
            .expect("registered")
            .lotto_number(),
        -3
    );
}

#[test]
fn second_build_leaves_first_contents_intact() {
    let sink = RecordingSink::default();
    let catalog = catalog();
    let mut registry = ProfileRegistry::new();

    registry
        .build(
            &profile_rows("first3001@school.org,First,Build,F,12,40,1\n"),
            &catalog,
            &sink,
        )
        .expect("first build");
    let second = registry
        .build(
            &profile_rows(
                "second3002@school.org,Second,Build,M,9,40,2\n\
                 third3003@school.org,Third,Build,M,9,40,3\n",
            ),
            &catalog,
            &sink,
        )
        .expect("second build is a no-op");

    assert_eq!(second, BuildOutcome::AlreadyBuilt);
    assert_eq!(registry.count(), 1);
    assert!(registry.get(ProfileId(3001)).is_some());
    assert!(registry.get(ProfileId(3002)).is_none());
}

#[test]
fn missing_columns_abort_the_batch_atomically() {
    let sink = RecordingSink::default();
    let (registry, result) = build(
        "ok4001@school.org,Ok,Row,F,10,10,1\n\
         short4002@school.org,Short,Row,M,10\n\
         late4003@school.org,Late,Row,M,10,10,3\n",
        &sink,
    );

    match result {
        Err(IngestError::MalformedRecord {
            row,
            found,
            expected,
        }) => {
            assert_eq!(row, 1);
            assert_eq!(found, 5);
            assert_eq!(expected, 7);
        }
        other => panic!("expected malformed record, got {other:?}"),
    }
    assert_eq!(registry.count(), 0);
    assert!(!registry.is_built());

    let reports = sink.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, "Validated student data is missing.");
    assert!(reports[0].1.contains("record 1"));
}

#[test]
fn failed_batch_can_be_retried() {
    let sink = RecordingSink::default();
    let catalog = catalog();
    let mut registry = ProfileRegistry::new();

    registry
        .build(
            &profile_rows("bad5001@school.org,Bad,Row,X,10,10,1\n"),
            &catalog,
            &sink,
        )
        .expect_err("bad gender");
    let outcome = registry
        .build(
            &profile_rows("good5002@school.org,Good,Row,F,10,10,1\n"),
            &catalog,
            &sink,
        )
        .expect("retry succeeds");

    assert!(matches!(outcome, BuildOutcome::Built(_)));
    assert_eq!(registry.count(), 1);
}

fn expect_bad_data(body: &str, expected_column: usize) {
    let sink = RecordingSink::default();
    let (registry, result) = build(body, &sink);
    match result {
        Err(IngestError::BadData { row, column, .. }) => {
            assert_eq!(row, 0);
            assert_eq!(column, expected_column);
        }
        other => panic!("expected bad data in column {expected_column}, got {other:?}"),
    }
    assert_eq!(registry.count(), 0);
    assert_eq!(sink.reports().len(), 1);
}

#[test]
fn unrecognized_gender_is_bad_data() {
    expect_bad_data("x6001@school.org,X,Y,Q,10,10,1\n", 3);
}

#[test]
fn unrecognized_grade_is_bad_data() {
    expect_bad_data("x6002@school.org,X,Y,M,8,10,1\n", 4);
    expect_bad_data("x6003@school.org,X,Y,M,senior,10,1\n", 4);
}

#[test]
fn non_integer_points_are_bad_data() {
    expect_bad_data("x6004@school.org,X,Y,M,10,ten,1\n", 5);
    expect_bad_data("x6005@school.org,X,Y,M,10,-4,1\n", 5);
}

#[test]
fn non_integer_lottery_number_is_bad_data() {
    expect_bad_data("x6006@school.org,X,Y,F,11,10,1.5\n", 6);
    expect_bad_data("x6008@school.org,X,Y,F,11,10,lucky\n", 6);
}

#[test]
fn unknown_previous_course_is_bad_data() {
    expect_bad_data("x6007@school.org,X,Y,F,11,10,1,HIKE,SAIL\n", 8);
}

#[test]
fn email_without_student_number_is_bad_data() {
    expect_bad_data("nobody@school.org,X,Y,F,11,10,1\n", 0);
}

#[test]
fn duplicate_student_id_is_bad_data() {
    let sink = RecordingSink::default();
    let (registry, result) = build(
        "x7001@school.org,X,Y,F,11,10,1\n\
         y7001@school.org,Y,Z,M,11,10,2\n",
        &sink,
    );
    assert!(matches!(
        result,
        Err(IngestError::BadData { row: 1, column: 0, .. })
    ));
    assert_eq!(registry.count(), 0);
}

#[test]
fn from_reader_builds_a_populated_registry() {
    let csv = format!("{PROFILE_HEADER}\nz8001@school.org,Z,Q,F,12,25,4,CAVE\n");
    let (registry, report) =
        ProfileRegistry::from_reader(csv.as_bytes(), &catalog(), &RecordingSink::default())
            .expect("registry builds");

    assert_eq!(report.profiles, 1);
    assert_eq!(registry.count(), 1);
    assert_eq!(
        registry
            .get(ProfileId(8001))
            .expect("registered")
            .previous_courses(),
        &[CourseCode::new("CAVE")]
    );
}
