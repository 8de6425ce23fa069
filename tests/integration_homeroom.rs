mod common;

use axum::http::StatusCode;
use common::{
    ClassFixture, complete_records, create_class, create_class_fixture, create_student,
    current_class_of, get, history_count, json_request, lazy_pool, record_behavior,
    record_final_score, record_score, send, setup_test_app, token_for,
};
use edurapor::edurapor_auth::Role;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

fn homeroom_token(fixture: &ClassFixture) -> String {
    token_for(fixture.teacher_id, Role::Homeroom)
}

// Requests below are rejected before any query runs, so the pool never connects.

#[tokio::test]
async fn test_validate_requires_token() {
    let app = setup_test_app(lazy_pool());

    let (status, body) = send(
        app,
        get("/api/homeroom/validate-semester-completion", None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_validate_rejects_invalid_token() {
    let app = setup_test_app(lazy_pool());

    let (status, _) = send(
        app,
        get("/api/homeroom/validate-semester-completion", Some("not-a-jwt")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_homeroom_routes_forbid_other_roles() {
    for role in [Role::Admin, Role::Tutor, Role::Student] {
        let app = setup_test_app(lazy_pool());
        let token = token_for(Uuid::new_v4(), role);

        let (status, body) = send(
            app,
            get("/api/homeroom/my-students-for-promotion", Some(&token)),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN, "role {role}");
        assert!(body["message"].as_str().unwrap().contains("homeroom"));
    }
}

#[tokio::test]
async fn test_promote_with_empty_batch_is_unprocessable() {
    let app = setup_test_app(lazy_pool());
    let token = token_for(Uuid::new_v4(), Role::Homeroom);

    let (status, body) = send(
        app,
        json_request(
            "PATCH",
            "/api/homeroom/promote-students",
            &token,
            &json!({
                "promotions": [],
                "targetAcademicYearId": Uuid::new_v4(),
                "targetClassIdForPassed": Uuid::new_v4()
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("at least one student")
    );
}

#[tokio::test]
async fn test_promote_without_promotions_field_is_bad_request() {
    let app = setup_test_app(lazy_pool());
    let token = token_for(Uuid::new_v4(), Role::Homeroom);

    let (status, body) = send(
        app,
        json_request(
            "PATCH",
            "/api/homeroom/promote-students",
            &token,
            &json!({ "targetAcademicYearId": Uuid::new_v4() }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "promotions is required");
}

#[tokio::test]
async fn test_promote_with_malformed_student_id_is_bad_request() {
    let app = setup_test_app(lazy_pool());
    let token = token_for(Uuid::new_v4(), Role::Homeroom);

    let (status, _) = send(
        app,
        json_request(
            "PATCH",
            "/api/homeroom/promote-students",
            &token,
            &json!({
                "promotions": [{ "studentId": "not-a-uuid", "naikKelas": true }]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app(lazy_pool());

    let (status, body) = send(app, get("/api-docs/openapi.json", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/homeroom/promote-students"]["patch"].is_object());
}

// Database-backed flows. Run with DATABASE_URL set and `cargo test -- --ignored`.

/// Student A has every record; student B is missing the UAS for Matematika.
async fn seed_genap_pair(pool: &PgPool, fixture: &ClassFixture) -> (Uuid, Uuid) {
    let student_a = create_student(pool, "Andi Saputra", "0012345601", fixture.class_id).await;
    let student_b = create_student(pool, "Budi Santoso", "0012345602", fixture.class_id).await;

    complete_records(
        pool,
        fixture,
        student_a,
        fixture.genap_id,
        &[fixture.ganjil_id, fixture.genap_id],
    )
    .await;

    let (bin_id, _) = fixture
        .subjects
        .iter()
        .find(|(_, name)| name == "Bahasa Indonesia")
        .cloned()
        .unwrap();
    let (mtk_id, _) = fixture
        .subjects
        .iter()
        .find(|(_, name)| name == "Matematika")
        .cloned()
        .unwrap();

    record_score(pool, student_b, bin_id, fixture.genap_id, "UTS", 70.0).await;
    record_score(pool, student_b, bin_id, fixture.genap_id, "UAS", 72.0).await;
    record_final_score(pool, student_b, bin_id, fixture.genap_id, 71.2).await;
    record_score(pool, student_b, mtk_id, fixture.genap_id, "UTS", 65.0).await;
    record_behavior(pool, student_b, fixture.ganjil_id, 100).await;
    record_behavior(pool, student_b, fixture.genap_id, 100).await;

    (student_a, student_b)
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_validate_reports_missing_uas(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GENAP").await;
    let (student_a, student_b) = seed_genap_pair(&pool, &fixture).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        app,
        get(
            "/api/homeroom/validate-semester-completion",
            Some(&homeroom_token(&fixture)),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classInfo"]["namaKelas"], "11A");
    assert_eq!(body["validation"]["totalStudents"], 2);
    assert_eq!(body["validation"]["invalidStudents"], 1);
    assert_eq!(body["validation"]["allValid"], false);

    let students = body["students"].as_array().unwrap();
    let a = students
        .iter()
        .find(|s| s["studentId"] == student_a.to_string())
        .unwrap();
    let b = students
        .iter()
        .find(|s| s["studentId"] == student_b.to_string())
        .unwrap();

    assert_eq!(a["isValid"], true);
    assert_eq!(b["isValid"], false);
    assert_eq!(b["issues"].as_array().unwrap().len(), 1);
    assert_eq!(b["issues"][0]["type"], "UAS");
    assert_eq!(b["issues"][0]["missing"], json!(["Matematika"]));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_promotion_batch_with_incomplete_student_is_rejected_atomically(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GENAP").await;
    let (student_a, student_b) = seed_genap_pair(&pool, &fixture).await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        app,
        json_request(
            "PATCH",
            "/api/homeroom/promote-students",
            &homeroom_token(&fixture),
            &json!({
                "promotions": [
                    { "studentId": student_a, "naikKelas": true },
                    { "studentId": student_b, "naikKelas": true }
                ],
                "targetAcademicYearId": fixture.next_year_id,
                "targetClassIdForPassed": fixture.target_class_id
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let invalid = body["invalidStudents"].as_array().unwrap();
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0]["id"], student_b.to_string());
    assert_eq!(invalid[0]["issues"][0]["type"], "UAS");

    assert_eq!(current_class_of(&pool, student_a).await, Some(fixture.class_id));
    assert_eq!(current_class_of(&pool, student_b).await, Some(fixture.class_id));
    assert_eq!(history_count(&pool, student_a).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_promotion_moves_passed_and_keeps_repeater(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GENAP").await;
    let (student_a, student_b) = seed_genap_pair(&pool, &fixture).await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        app,
        json_request(
            "PATCH",
            "/api/homeroom/promote-students",
            &homeroom_token(&fixture),
            &json!({
                "promotions": [
                    { "studentId": student_a, "naikKelas": true },
                    { "studentId": student_b, "naikKelas": false }
                ],
                "targetAcademicYearId": fixture.next_year_id,
                "targetClassIdForPassed": fixture.target_class_id,
                "targetClassIdForFailed": ""
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["promotedCount"], 1);
    assert_eq!(body["repeatedCount"], 0);
    assert_eq!(body["unchangedCount"], 1);
    assert_eq!(body["acknowledgedIssues"][0]["id"], student_b.to_string());

    assert_eq!(
        current_class_of(&pool, student_a).await,
        Some(fixture.target_class_id)
    );
    assert_eq!(current_class_of(&pool, student_b).await, Some(fixture.class_id));
    assert_eq!(history_count(&pool, student_a).await, 1);
    assert_eq!(history_count(&pool, student_b).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_promotion_requires_target_class(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GENAP").await;
    let (student_a, _) = seed_genap_pair(&pool, &fixture).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        app,
        json_request(
            "PATCH",
            "/api/homeroom/promote-students",
            &homeroom_token(&fixture),
            &json!({
                "promotions": [{ "studentId": student_a, "naikKelas": true }],
                "targetAcademicYearId": fixture.next_year_id
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("must be selected"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_promotion_is_forbidden_in_ganjil(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GANJIL").await;
    let student = create_student(&pool, "Citra Lestari", "0012345603", fixture.class_id).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        app,
        json_request(
            "PATCH",
            "/api/homeroom/promote-students",
            &homeroom_token(&fixture),
            &json!({
                "promotions": [{ "studentId": student, "naikKelas": true }],
                "targetAcademicYearId": fixture.next_year_id,
                "targetClassIdForPassed": fixture.target_class_id
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["academicYear"].is_object());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_promotion_rejects_student_outside_class(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GENAP").await;
    seed_genap_pair(&pool, &fixture).await;
    let outsider = Uuid::new_v4();
    let app = setup_test_app(pool);

    let (status, body) = send(
        app,
        json_request(
            "PATCH",
            "/api/homeroom/promote-students",
            &homeroom_token(&fixture),
            &json!({
                "promotions": [{ "studentId": outsider, "naikKelas": true }],
                "targetAcademicYearId": fixture.next_year_id,
                "targetClassIdForPassed": fixture.target_class_id
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["unknownStudentIds"], json!([outsider]));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_move_to_new_semester_creates_continuation(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GANJIL").await;
    let student = create_student(&pool, "Dewi Anggraini", "0012345604", fixture.class_id).await;
    complete_records(&pool, &fixture, student, fixture.ganjil_id, &[fixture.ganjil_id]).await;
    let token = homeroom_token(&fixture);

    let (status, body) = send(
        setup_test_app(pool.clone()),
        json_request(
            "POST",
            "/api/homeroom/move-to-new-semester",
            &token,
            &json!({ "targetAcademicYearId": fixture.genap_id }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movedStudents"], 1);

    let new_class_id: Uuid = body["classId"].as_str().unwrap().parse().unwrap();
    assert_ne!(new_class_id, fixture.class_id);
    assert_eq!(current_class_of(&pool, student).await, Some(new_class_id));

    let (name, year_id, homeroom): (String, Uuid, Option<Uuid>) = sqlx::query_as(
        "SELECT nama_kelas, academic_year_id, homeroom_teacher_id FROM classes WHERE id = $1",
    )
    .bind(new_class_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(name, "11A");
    assert_eq!(year_id, fixture.genap_id);
    assert_eq!(homeroom, Some(fixture.teacher_id));

    let subject_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM class_subjects WHERE class_id = $1")
            .bind(new_class_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(subject_count, 2);

    let (status, history) = send(
        setup_test_app(pool),
        get(
            &format!("/api/homeroom/students/{}/history", student),
            Some(&token),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["kind"], "SEMESTER_MOVE");
    assert_eq!(history[0]["naikKelas"], false);
    assert_eq!(history[0]["fromClassName"], "11A");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_move_to_new_semester_blocked_by_incomplete_records(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GANJIL").await;
    let student = create_student(&pool, "Eko Prasetyo", "0012345605", fixture.class_id).await;
    // Scores complete, behavior record missing
    complete_records(&pool, &fixture, student, fixture.ganjil_id, &[]).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        json_request(
            "POST",
            "/api/homeroom/move-to-new-semester",
            &homeroom_token(&fixture),
            &json!({ "targetAcademicYearId": fixture.genap_id }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["invalidStudents"][0]["issues"][0]["type"], "BEHAVIOR");
    assert_eq!(current_class_of(&pool, student).await, Some(fixture.class_id));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_move_to_new_semester_rejects_other_year(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GANJIL").await;

    let (status, _) = send(
        setup_test_app(pool),
        json_request(
            "POST",
            "/api/homeroom/move-to-new-semester",
            &homeroom_token(&fixture),
            &json!({ "targetAcademicYearId": fixture.next_year_id }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_students_for_promotion_suggests_naik_kelas(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GENAP").await;
    let student = create_student(&pool, "Fajar Nugroho", "0012345606", fixture.class_id).await;
    complete_records(
        &pool,
        &fixture,
        student,
        fixture.genap_id,
        &[fixture.ganjil_id, fixture.genap_id],
    )
    .await;
    for (subject_id, _) in &fixture.subjects {
        record_final_score(&pool, student, *subject_id, fixture.ganjil_id, 70.0).await;
    }

    let (status, body) = send(
        setup_test_app(pool),
        get(
            "/api/homeroom/my-students-for-promotion",
            Some(&homeroom_token(&fixture)),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["className"], "11A");
    let candidate = &body["students"][0];
    assert_eq!(candidate["nilaiSemesterGanjil"], 70.0);
    assert_eq!(candidate["nilaiSemesterGenap"], 82.4);
    assert_eq!(candidate["nilaiTotal"], 76.2);
    assert_eq!(candidate["attendanceSummary"]["hadir"], 200);
    assert_eq!(candidate["suggestedNaikKelas"], true);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_available_classes_for_target_year(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GENAP").await;

    let (status, body) = send(
        setup_test_app(pool),
        get(
            &format!(
                "/api/homeroom/available-classes?academicYearId={}",
                fixture.next_year_id
            ),
            Some(&homeroom_token(&fixture)),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let classes = body.as_array().unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0]["id"], fixture.target_class_id.to_string());
    assert_eq!(classes[0]["studentCount"], 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_promotion_years_are_after_class_year(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GENAP").await;

    let (status, body) = send(
        setup_test_app(pool),
        get(
            "/api/homeroom/available-academic-years-for-promotion",
            Some(&homeroom_token(&fixture)),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let years = body.as_array().unwrap();
    assert_eq!(years.len(), 1);
    assert_eq!(years[0]["id"], fixture.next_year_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_teacher_without_class_gets_not_found(pool: PgPool) {
    create_class_fixture(&pool, "GENAP").await;

    let (status, _) = send(
        setup_test_app(pool),
        get(
            "/api/homeroom/validate-semester-completion",
            Some(&token_for(Uuid::new_v4(), Role::Homeroom)),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn create_teacher(pool: &PgPool, name: &str, email: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO teachers (name, email) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn promote_body(fixture: &ClassFixture, passed_class: Uuid, student: Uuid) -> serde_json::Value {
    json!({
        "promotions": [{ "studentId": student, "naikKelas": true }],
        "targetAcademicYearId": fixture.next_year_id,
        "targetClassIdForPassed": passed_class
    })
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_move_to_new_semester_refuses_class_of_other_homeroom(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GANJIL").await;
    let other_teacher = create_teacher(&pool, "Pak Budi", "budi@sekolah.sch.id").await;
    let foreign_class = create_class(
        &pool,
        "11A",
        fixture.genap_id,
        fixture.program_id,
        Some(other_teacher),
    )
    .await;
    let student = create_student(&pool, "Fajar Nugroho", "0012345606", fixture.class_id).await;
    complete_records(&pool, &fixture, student, fixture.ganjil_id, &[fixture.ganjil_id]).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        json_request(
            "POST",
            "/api/homeroom/move-to-new-semester",
            &homeroom_token(&fixture),
            &json!({ "targetAcademicYearId": fixture.genap_id }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("different homeroom teacher"));
    assert_eq!(current_class_of(&pool, student).await, Some(fixture.class_id));
    assert_ne!(current_class_of(&pool, student).await, Some(foreign_class));
    assert_eq!(history_count(&pool, student).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_move_to_new_semester_reuses_own_continuation(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GANJIL").await;
    let continuation = create_class(
        &pool,
        "11A",
        fixture.genap_id,
        fixture.program_id,
        Some(fixture.teacher_id),
    )
    .await;
    let student = create_student(&pool, "Gita Permata", "0012345607", fixture.class_id).await;
    complete_records(&pool, &fixture, student, fixture.ganjil_id, &[fixture.ganjil_id]).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        json_request(
            "POST",
            "/api/homeroom/move-to-new-semester",
            &homeroom_token(&fixture),
            &json!({ "targetAcademicYearId": fixture.genap_id }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classId"], continuation.to_string());
    assert_eq!(current_class_of(&pool, student).await, Some(continuation));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_teacher_cannot_homeroom_two_classes_in_one_year(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GENAP").await;

    let result = sqlx::query(
        r#"INSERT INTO classes (nama_kelas, academic_year_id, program_id, homeroom_teacher_id)
           VALUES ('11B', $1, $2, $3)"#,
    )
    .bind(fixture.genap_id)
    .bind(fixture.program_id)
    .bind(fixture.teacher_id)
    .execute(&pool)
    .await;

    let err = result.unwrap_err();
    let db_err = err.as_database_error().unwrap();
    assert!(db_err.is_unique_violation());
    assert_eq!(db_err.constraint(), Some("classes_unique_homeroom"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_promotion_failing_midway_changes_no_student(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GENAP").await;
    let (student_a, student_b) = seed_genap_pair(&pool, &fixture).await;
    let failed_class =
        create_class(&pool, "11A", fixture.next_year_id, fixture.program_id, None).await;

    // Once A's history row is written, B leaves the class, so B's guarded update finds no row.
    sqlx::query(&format!(
        r#"CREATE FUNCTION deactivate_second_student() RETURNS trigger AS $$
           BEGIN
               UPDATE students SET status = 'INACTIVE' WHERE id = '{}';
               RETURN NEW;
           END
           $$ LANGUAGE plpgsql"#,
        student_b
    ))
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(&format!(
        r#"CREATE TRIGGER deactivate_second_student
           AFTER INSERT ON promotion_history
           FOR EACH ROW WHEN (NEW.student_id = '{}')
           EXECUTE FUNCTION deactivate_second_student()"#,
        student_a
    ))
    .execute(&pool)
    .await
    .unwrap();

    let (status, _) = send(
        setup_test_app(pool.clone()),
        json_request(
            "PATCH",
            "/api/homeroom/promote-students",
            &homeroom_token(&fixture),
            &json!({
                "promotions": [
                    { "studentId": student_a, "naikKelas": true },
                    { "studentId": student_b, "naikKelas": false }
                ],
                "targetAcademicYearId": fixture.next_year_id,
                "targetClassIdForPassed": fixture.target_class_id,
                "targetClassIdForFailed": failed_class
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(current_class_of(&pool, student_a).await, Some(fixture.class_id));
    assert_eq!(current_class_of(&pool, student_b).await, Some(fixture.class_id));
    assert_eq!(history_count(&pool, student_a).await, 0);
    assert_eq!(history_count(&pool, student_b).await, 0);

    let status_b: String = sqlx::query_scalar("SELECT status FROM students WHERE id = $1")
        .bind(student_b)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status_b, "ACTIVE");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_promotion_rejects_target_class_from_other_year(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GENAP").await;
    let (student_a, _) = seed_genap_pair(&pool, &fixture).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        json_request(
            "PATCH",
            "/api/homeroom/promote-students",
            &homeroom_token(&fixture),
            &promote_body(&fixture, fixture.class_id, student_a),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("does not belong"));
    assert_eq!(current_class_of(&pool, student_a).await, Some(fixture.class_id));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_promotion_with_unknown_target_class_is_not_found(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GENAP").await;
    let (student_a, _) = seed_genap_pair(&pool, &fixture).await;

    let (status, _) = send(
        setup_test_app(pool.clone()),
        json_request(
            "PATCH",
            "/api/homeroom/promote-students",
            &homeroom_token(&fixture),
            &promote_body(&fixture, Uuid::new_v4(), student_a),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(current_class_of(&pool, student_a).await, Some(fixture.class_id));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_history_of_student_outside_class_is_not_found(pool: PgPool) {
    let fixture = create_class_fixture(&pool, "GENAP").await;
    let outsider =
        create_student(&pool, "Hadi Wijaya", "0012345608", fixture.target_class_id).await;

    let (status, _) = send(
        setup_test_app(pool),
        get(
            &format!("/api/homeroom/students/{}/history", outsider),
            Some(&homeroom_token(&fixture)),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
