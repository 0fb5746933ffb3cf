//! Integration tests for the student / subject / score REST API.
//!
//! Each test spins up an Axum server on a random port backed by a fresh
//! database file, and exercises the real HTTP contract with reqwest.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use gradebook::api::router;
use gradebook::store::{Database, LibSqlBackend};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

struct TestServer {
    base: String,
    client: reqwest::Client,
    _tmp: tempfile::TempDir,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn post(&self, path: &str, query: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .query(query)
            .send()
            .await
            .unwrap()
    }

    async fn put(&self, path: &str, query: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .query(query)
            .send()
            .await
            .unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client.delete(self.url(path)).send().await.unwrap()
    }
}

/// Start an Axum server on a random port with an empty database.
async fn start_server() -> TestServer {
    let tmp = tempfile::tempdir().unwrap();
    let db: Arc<dyn Database> = Arc::new(
        LibSqlBackend::new_local(&tmp.path().join("grades.db"))
            .await
            .unwrap(),
    );
    let app = router(db);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        base: format!("http://127.0.0.1:{port}"),
        client: reqwest::Client::new(),
        _tmp: tmp,
    }
}

async fn create_student(server: &TestServer, name: &str, surname: &str) -> Value {
    let resp = server
        .post("/students/", &[("name", name), ("surname", surname)])
        .await;
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

// ── Students ─────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_student() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;

        let earlier = create_student(&server, "Alan", "Turing").await;
        let created = create_student(&server, "Ada", "Lovelace").await;
        assert_eq!(created["name"], "Ada");
        assert_eq!(created["surname"], "Lovelace");
        assert_ne!(created["id"], earlier["id"]);

        let id = created["id"].as_i64().unwrap();
        let resp = server.get(&format!("/students/{id}")).await;
        assert_eq!(resp.status(), 200);
        let fetched: Value = resp.json().await.unwrap();
        assert_eq!(fetched, json!({"id": id, "name": "Ada", "surname": "Lovelace"}));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn list_students_returns_all_in_order() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;

        let resp = server.get("/students/").await;
        assert_eq!(resp.status(), 200);
        let empty: Value = resp.json().await.unwrap();
        assert!(empty.as_array().unwrap().is_empty());

        create_student(&server, "Ada", "Lovelace").await;
        create_student(&server, "Grace", "Hopper").await;

        let list: Value = server.get("/students/").await.json().await.unwrap();
        let names: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn get_unknown_student_returns_404() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;

        let resp = server.get("/students/12345").await;
        assert_eq!(resp.status(), 404);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({"detail": "Student not found"}));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn update_surname_only_keeps_name() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;
        let created = create_student(&server, "Ada", "Lovelace").await;
        let id = created["id"].as_i64().unwrap();

        let resp = server
            .put(&format!("/students/{id}"), &[("surname", "King")])
            .await;
        assert_eq!(resp.status(), 200);
        let updated: Value = resp.json().await.unwrap();
        assert_eq!(updated, json!({"id": id, "name": "Ada", "surname": "King"}));

        let fetched: Value = server
            .get(&format!("/students/{id}"))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(fetched, updated);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn update_with_empty_name_leaves_name_unchanged() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;
        let created = create_student(&server, "Ada", "Lovelace").await;
        let id = created["id"].as_i64().unwrap();

        let resp = server
            .put(&format!("/students/{id}"), &[("name", ""), ("surname", "Byron")])
            .await;
        assert_eq!(resp.status(), 200);
        let updated: Value = resp.json().await.unwrap();
        assert_eq!(updated["name"], "Ada");
        assert_eq!(updated["surname"], "Byron");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn update_unknown_student_returns_404() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;

        let resp = server.put("/students/99", &[("name", "Ghost")]).await;
        assert_eq!(resp.status(), 404);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["detail"], "Student not found");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn delete_student_removes_it_but_keeps_scores() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;
        let student = create_student(&server, "Ada", "Lovelace").await;
        let id = student["id"].as_i64().unwrap();
        let id_str = id.to_string();

        let resp = server
            .post(
                "/scores/",
                &[("student_id", id_str.as_str()), ("subject_id", "1"), ("score", "88")],
            )
            .await;
        assert_eq!(resp.status(), 200);
        let score: Value = resp.json().await.unwrap();

        let resp = server.delete(&format!("/students/{id}")).await;
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({"message": "Student deleted"}));

        assert_eq!(server.get(&format!("/students/{id}")).await.status(), 404);
        let list: Value = server.get("/students/").await.json().await.unwrap();
        assert!(list.as_array().unwrap().is_empty());

        // No cascade: the score still points at the deleted student.
        let scores: Value = server.get("/scores/").await.json().await.unwrap();
        assert_eq!(scores, json!([score]));

        // Deleting again is a not-found.
        assert_eq!(server.delete(&format!("/students/{id}")).await.status(), 404);
    })
    .await
    .expect("test timed out");
}

// ── Subjects ─────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_subject_fails_without_second_record() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;

        let resp = server.post("/subjects/", &[("name", "Math")]).await;
        assert_eq!(resp.status(), 200);
        let math: Value = resp.json().await.unwrap();
        assert_eq!(math["name"], "Math");

        let resp = server.post("/subjects/", &[("name", "Math")]).await;
        assert_eq!(resp.status(), 500);

        let subjects: Value = server.get("/subjects/").await.json().await.unwrap();
        assert_eq!(subjects, json!([math]));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn delete_subject_and_unknown_subject() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;

        let subject: Value = server
            .post("/subjects/", &[("name", "Physics")])
            .await
            .json()
            .await
            .unwrap();
        let id = subject["id"].as_i64().unwrap();

        let resp = server.delete(&format!("/subjects/{id}")).await;
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({"message": "Subject deleted"}));

        let resp = server.delete(&format!("/subjects/{id}")).await;
        assert_eq!(resp.status(), 404);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({"detail": "Subject not found"}));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn subjects_have_no_single_fetch() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;
        server.post("/subjects/", &[("name", "Art")]).await;

        let resp = server.get("/subjects/1").await;
        assert_eq!(resp.status(), 405);
    })
    .await
    .expect("test timed out");
}

// ── Scores ───────────────────────────────────────────────────────────

#[tokio::test]
async fn scores_round_trip_any_integer() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;

        for value in ["0", "-42", "100", "9223372036854775807"] {
            let resp = server
                .post(
                    "/scores/",
                    &[("student_id", "7"), ("subject_id", "3"), ("score", value)],
                )
                .await;
            assert_eq!(resp.status(), 200);
            let created: Value = resp.json().await.unwrap();
            let id = created["id"].as_i64().unwrap();

            let fetched: Value = server
                .get(&format!("/scores/{id}"))
                .await
                .json()
                .await
                .unwrap();
            assert_eq!(fetched, created);
            assert_eq!(fetched["score"].to_string(), value);
            assert_eq!(fetched["student_id"], 7);
            assert_eq!(fetched["subject_id"], 3);
        }
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn score_for_never_created_ids_is_accepted() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;

        let resp = server
            .post(
                "/scores/",
                &[("student_id", "4040"), ("subject_id", "5050"), ("score", "61")],
            )
            .await;
        assert_eq!(resp.status(), 200);
        let created: Value = resp.json().await.unwrap();
        assert_eq!(created["student_id"], 4040);
        assert_eq!(created["subject_id"], 5050);

        let id = created["id"].as_i64().unwrap();
        let fetched: Value = server
            .get(&format!("/scores/{id}"))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(fetched, created);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn delete_subject_keeps_its_scores() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;

        let subject: Value = server
            .post("/subjects/", &[("name", "History")])
            .await
            .json()
            .await
            .unwrap();
        let subject_id = subject["id"].as_i64().unwrap().to_string();

        let resp = server
            .post(
                "/scores/",
                &[("student_id", "1"), ("subject_id", subject_id.as_str()), ("score", "64")],
            )
            .await;
        assert_eq!(resp.status(), 200);
        let score: Value = resp.json().await.unwrap();

        let resp = server.delete(&format!("/subjects/{subject_id}")).await;
        assert_eq!(resp.status(), 200);

        let subjects: Value = server.get("/subjects/").await.json().await.unwrap();
        assert!(subjects.as_array().unwrap().is_empty());

        // No cascade: the score still points at the deleted subject.
        let scores: Value = server.get("/scores/").await.json().await.unwrap();
        assert_eq!(scores, json!([score]));
    })
    .await
    .expect("test timed out");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_all_succeed() {
    timeout(Duration::from_secs(20), async {
        let server = Arc::new(start_server().await);

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let server = Arc::clone(&server);
                tokio::spawn(async move {
                    let surname = format!("Lovelace {i}");
                    let value = i.to_string();
                    if i % 2 == 0 {
                        server
                            .post("/students/", &[("name", "Ada"), ("surname", surname.as_str())])
                            .await
                            .status()
                    } else {
                        server
                            .post(
                                "/scores/",
                                &[("student_id", "1"), ("subject_id", "1"), ("score", value.as_str())],
                            )
                            .await
                            .status()
                    }
                })
            })
            .collect();

        for handle in handles {
            let status = handle.await.expect("task panicked");
            assert_eq!(status, 200);
        }

        let students: Value = server.get("/students/").await.json().await.unwrap();
        assert_eq!(students.as_array().unwrap().len(), 16);
        let scores: Value = server.get("/scores/").await.json().await.unwrap();
        assert_eq!(scores.as_array().unwrap().len(), 16);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn score_with_non_integer_value_is_rejected() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;

        let resp = server
            .post(
                "/scores/",
                &[("student_id", "1"), ("subject_id", "1"), ("score", "A+")],
            )
            .await;
        assert_eq!(resp.status(), 400);

        let scores: Value = server.get("/scores/").await.json().await.unwrap();
        assert!(scores.as_array().unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn delete_score_then_not_found() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server().await;

        let created: Value = server
            .post(
                "/scores/",
                &[("student_id", "1"), ("subject_id", "2"), ("score", "75")],
            )
            .await
            .json()
            .await
            .unwrap();
        let id = created["id"].as_i64().unwrap();

        let resp = server.delete(&format!("/scores/{id}")).await;
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({"message": "Score deleted"}));

        let resp = server.get(&format!("/scores/{id}")).await;
        assert_eq!(resp.status(), 404);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({"detail": "Score not found"}));
    })
    .await
    .expect("test timed out");
}
