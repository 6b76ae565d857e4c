use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use survey_submit::api::build_app;
use survey_submit::{
    App, AppState, ColumnLayout, Config, Question, QuestionStore, RowStore, StorageError,
    WorkbookRow, XlsxWorkbookStore,
};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestEnv {
    dir: TempDir,
    config: Config,
    store: Arc<XlsxWorkbookStore>,
    router: Router,
}

fn questions() -> Vec<Question> {
    vec![
        Question::new(1, "Câți ani ai?"),
        Question::new(2, "Culoarea preferată?"),
        Question::new(3, "Orașul?"),
    ]
}

fn test_config(dir: &TempDir) -> Config {
    Config {
        data_dir: dir.path().join("users"),
        static_dir: dir.path().join("templates"),
        questions_file: dir.path().join("q.json"),
        ..Config::default()
    }
}

fn setup() -> TestEnv {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let store = Arc::new(XlsxWorkbookStore::new(
        config.results_path(),
        config.sheet_name.clone(),
    ));
    let row_store: Arc<dyn RowStore> = store.clone();
    let state = AppState::new(&config, Arc::new(QuestionStore::new(questions())), row_store);
    let router = build_app(state, &config.static_dir);

    TestEnv {
        dir,
        config,
        store,
        router,
    }
}

fn submit_request(body: serde_json::Value) -> Request<Body> {
    Request::post("/submit")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn user_dir(env: &TestEnv, username: &str) -> PathBuf {
    env.config.data_dir.join(username)
}

#[tokio::test]
async fn test_questions_returns_configured_list_in_order() {
    let env = setup();

    let (status, body) = send(
        &env.router,
        Request::get("/questions").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let returned: Vec<Question> = serde_json::from_str(&body).unwrap();
    assert_eq!(returned, questions());
}

#[tokio::test]
async fn test_first_submission_creates_workbook_with_header() {
    let env = setup();

    let (status, body) = send(
        &env.router,
        submit_request(json!({
            "name": "Popescu",
            "username": "ion",
            "userData": ["30", "albastru", "Târgu Jiu"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Success!");
    assert!(user_dir(&env, "ion").is_dir());

    let rows = env.store.read_rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        vec![
            "Nume",
            "Prenume",
            "Varsta",
            "Culoare preferata",
            "Mancare preferata",
            "Locatie",
            "Carte preferata",
            "Q1",
            "Q2",
            "Q3"
        ]
    );
    assert_eq!(
        rows[1],
        vec![
            "Popescu",
            "ion",
            "30",
            "albastru",
            "Târgu Jiu",
            "",
            "",
            "30",
            "albastru",
            "Târgu Jiu"
        ]
    );
}

#[tokio::test]
async fn test_second_submission_appends_row_and_keeps_header() {
    let env = setup();

    for (name, username) in [("Popescu", "ion"), ("Ionescu", "maria")] {
        let (status, _) = send(
            &env.router,
            submit_request(json!({
                "name": name,
                "username": username,
                "userData": ["a", "b", "c"]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let rows = env.store.read_rows().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0],
        ColumnLayout::from_config(&env.config, &questions()).headers()
    );
    assert_eq!(rows[1][0], "Popescu");
    assert_eq!(rows[2][0], "Ionescu");
    assert_eq!(rows[2][1], "maria");
}

#[tokio::test]
async fn test_answer_count_mismatch_leaves_disk_untouched() {
    let env = setup();

    let (status, body) = send(
        &env.router,
        submit_request(json!({
            "name": "Popescu",
            "username": "ion",
            "userData": ["only one"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid request data");
    assert!(!env.config.results_path().exists());
    assert!(!user_dir(&env, "ion").exists());
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let env = setup();
    let bodies = [
        json!({ "username": "ion", "userData": ["a", "b", "c"] }),
        json!({ "name": "Popescu", "userData": ["a", "b", "c"] }),
        json!({ "name": "Popescu", "username": "ion" }),
        json!({ "name": "", "username": "ion", "userData": ["a", "b", "c"] }),
        json!({}),
    ];

    for body in bodies {
        let (status, text) = send(&env.router, submit_request(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(text, "Invalid request data");
    }
    assert!(!env.config.results_path().exists());
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_error() {
    let env = setup();

    let not_json = Request::post("/submit")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&env.router, not_json).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid request data");

    let no_content_type = Request::post("/submit")
        .body(Body::from(r#"{"name":"a","username":"b","userData":["1","2","3"]}"#))
        .unwrap();
    let (status, _) = send(&env.router, no_content_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_username_cannot_escape_data_dir() {
    let env = setup();

    for username in ["..", "../escape", "a/b"] {
        let (status, _) = send(
            &env.router,
            submit_request(json!({
                "name": "Popescu",
                "username": username,
                "userData": ["a", "b", "c"]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "username: {}", username);
    }
    assert!(!env.dir.path().join("escape").exists());
}

#[tokio::test]
async fn test_username_matching_results_file_is_rejected() {
    let env = setup();

    let (status, _) = send(
        &env.router,
        submit_request(json!({
            "name": "Popescu",
            "username": "results.xlsx",
            "userData": ["a", "b", "c"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!env.config.results_path().exists());

    let (status, body) = send(
        &env.router,
        submit_request(json!({
            "name": "Ionescu",
            "username": "ion",
            "userData": ["a", "b", "c"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Success!");
    assert!(env.config.results_path().is_file());
    assert_eq!(env.store.read_rows().unwrap().len(), 2);
}

fn form_request(body: &'static str) -> Request<Body> {
    Request::post("/submit")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_form_submission_is_saved() {
    let env = setup();

    let (status, body) = send(
        &env.router,
        form_request(
            "name=Popescu&username=ion&userData%5B%5D=30&userData%5B%5D=albastru&userData%5B%5D=T%C3%A2rgu+Jiu",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Success!");
    let rows = env.store.read_rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], "Popescu");
    assert_eq!(rows[1][1], "ion");
    assert_eq!(rows[1][7], "30");
    assert_eq!(rows[1][9], "Târgu Jiu");
}

#[tokio::test]
async fn test_form_submission_is_validated_like_json() {
    let env = setup();

    let (status, body) = send(
        &env.router,
        form_request("name=Popescu&username=ion&userData%5B0%5D=30"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid request data");
    assert!(!env.config.results_path().exists());
}

struct FailingStore;

impl RowStore for FailingStore {
    fn append_row(&self, _layout: &ColumnLayout, _row: &WorkbookRow) -> Result<(), StorageError> {
        Err(StorageError::write_failed("memory", "disk full"))
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[tokio::test]
async fn test_storage_failure_returns_500_without_cleanup() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let state = AppState::new(
        &config,
        Arc::new(QuestionStore::new(questions())),
        Arc::new(FailingStore),
    );
    let router = build_app(state, &config.static_dir);

    let (status, body) = send(
        &router,
        submit_request(json!({
            "name": "Popescu",
            "username": "ion",
            "userData": ["a", "b", "c"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal server error");
    assert!(config.data_dir.join("ion").is_dir());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_are_all_kept() {
    let env = setup();
    let count = 10;

    let requests = (0..count).map(|i| {
        send(
            &env.router,
            submit_request(json!({
                "name": format!("user{}", i),
                "username": format!("user{}", i),
                "userData": ["a", "b", "c"]
            })),
        )
    });
    let results = futures::future::join_all(requests).await;

    assert!(results.iter().all(|(status, _)| *status == StatusCode::OK));
    let rows = env.store.read_rows().unwrap();
    assert_eq!(rows.len(), count + 1);

    let mut names: Vec<&str> = rows[1..].iter().map(|r| r[0].as_str()).collect();
    names.sort_unstable();
    let mut expected: Vec<String> = (0..count).map(|i| format!("user{}", i)).collect();
    expected.sort_unstable();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_static_front_end_is_served() {
    let env = setup();
    std::fs::create_dir_all(&env.config.static_dir).unwrap();
    std::fs::write(env.config.static_dir.join("index.html"), "<h1>Chestionar</h1>").unwrap();

    let (status, body) = send(&env.router, Request::get("/").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>Chestionar</h1>");
}

#[tokio::test]
async fn test_app_initializes_from_question_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    std::fs::write(
        &config.questions_file,
        r#"[{"number": 7, "question": "Unu"}, {"number": 2, "question": "Doi"}]"#,
    )
    .unwrap();

    let app = App::initialize(config.clone()).await.unwrap();
    let router = app.router();

    let (status, body) = send(
        &router,
        Request::get("/questions").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let returned: Vec<Question> = serde_json::from_str(&body).unwrap();
    assert_eq!(returned, vec![Question::new(7, "Unu"), Question::new(2, "Doi")]);

    let (status, _) = send(
        &router,
        submit_request(json!({ "name": "A", "username": "a", "userData": ["x", "y"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let rows = XlsxWorkbookStore::new(config.results_path(), "Sheet1")
        .read_rows()
        .unwrap();
    assert_eq!(rows[0][7], "Q7");
    assert_eq!(rows[0][8], "Q2");
    assert_eq!(rows[1][7], "x");
    assert_eq!(rows[1][8], "y");
}

#[test]
fn test_missing_question_file_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let result = tokio_test::block_on(App::initialize(config));

    assert!(result.is_err());
}
