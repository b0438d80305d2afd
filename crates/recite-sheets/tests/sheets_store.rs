use recite_core::error::StoreError;
use recite_core::model::{ProgressTable, QuestionRecord, RecordIdentity};
use recite_core::traits::{AddOutcome, ProgressStore};
use recite_sheets::SheetsStore;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VALUES_PATH: &str = "/v4/spreadsheets/sheet-1/values/incorrect!A:F";

fn store(server: &MockServer) -> SheetsStore {
    SheetsStore::new("sheet-1", "tok", Some(server.uri()))
}

fn incorrect_range() -> serde_json::Value {
    json!({
        "range": "incorrect!A1:F3",
        "majorDimension": "ROWS",
        "values": [
            ["major", "middle", "minor", "eng", "kor", "key"],
            ["Tenses", "Past", "Regular", "I walked.", "나는 걸었다.", "Tenses-Past-Regular"],
            ["Tenses", "Past", "Irregular", "I went.", "나는 갔다.", "Tenses-Past-Irregular"]
        ]
    })
}

async fn mount_range(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(VALUES_PATH))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(incorrect_range()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn list_maps_rows() {
    let server = MockServer::start().await;
    mount_range(&server).await;

    let rows = store(&server).list(ProgressTable::Incorrect).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[1],
        QuestionRecord::new("Tenses", "Past", "Irregular", "I went.", "나는 갔다.")
    );
}

#[tokio::test]
async fn list_of_empty_sheet() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/mastered!A:F"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"range": "mastered!A1:F1000"})),
        )
        .mount(&server)
        .await;

    let rows = store(&server).list(ProgressTable::Mastered).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn add_appends_new_row() {
    let server = MockServer::start().await;
    mount_range(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("{VALUES_PATH}:append")))
        .and(query_param("valueInputOption", "RAW"))
        .and(body_json(json!({
            "values": [["Tenses", "Future", "Will", "I will go.", "나는 갈 것이다.", "Tenses-Future-Will"]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updates": {"updatedRows": 1}})))
        .expect(1)
        .mount(&server)
        .await;

    let record = QuestionRecord::new("Tenses", "Future", "Will", "I will go.", "나는 갈 것이다.");
    let outcome = store(&server)
        .add(ProgressTable::Incorrect, &record)
        .await
        .unwrap();
    assert_eq!(outcome, AddOutcome::Inserted);
}

#[tokio::test]
async fn add_skips_existing_identity() {
    let server = MockServer::start().await;
    mount_range(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("{VALUES_PATH}:append")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let mut record = QuestionRecord::new("Tenses", "Past", "Regular", "I walked.", "나는 걸었다.");
    record.eng = " I walked. ".into();
    let outcome = store(&server)
        .add(ProgressTable::Incorrect, &record)
        .await
        .unwrap();
    assert_eq!(outcome, AddOutcome::AlreadyPresent);
}

#[tokio::test]
async fn remove_deletes_matching_row() {
    let server = MockServer::start().await;
    mount_range(&server).await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1"))
        .and(query_param("fields", "sheets.properties(sheetId,title)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sheets": [
                {"properties": {"sheetId": 0, "title": "mastered"}},
                {"properties": {"sheetId": 917, "title": "incorrect"}}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-1:batchUpdate"))
        .and(body_json(json!({
            "requests": [{
                "deleteDimension": {
                    "range": {"sheetId": 917, "dimension": "ROWS", "startIndex": 2, "endIndex": 3}
                }
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"replies": [{}]})))
        .expect(1)
        .mount(&server)
        .await;

    let removed = store(&server)
        .remove(
            ProgressTable::Incorrect,
            &RecordIdentity::new("Tenses-Past-Irregular", "I went."),
        )
        .await
        .unwrap();
    assert!(removed);
}

#[tokio::test]
async fn remove_without_match_is_noop() {
    let server = MockServer::start().await;
    mount_range(&server).await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-1:batchUpdate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let removed = store(&server)
        .remove(
            ProgressTable::Incorrect,
            &RecordIdentity::new("Tenses-Past-Irregular", "I goed."),
        )
        .await
        .unwrap();
    assert!(!removed);
}

#[tokio::test]
async fn api_errors_carry_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VALUES_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;

    let err = store(&server)
        .list(ProgressTable::Incorrect)
        .await
        .unwrap_err();
    match err {
        StoreError::Api { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("permission"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_store_is_network_error() {
    let store = SheetsStore::new("sheet-1", "tok", Some("http://127.0.0.1:1".into()));
    let err = store.list(ProgressTable::Incorrect).await.unwrap_err();
    assert!(matches!(err, StoreError::Network(_)));
}

#[tokio::test]
async fn malformed_header_is_schema_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VALUES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [["word", "meaning"], ["hi", "안녕"]]
        })))
        .mount(&server)
        .await;

    let err = store(&server)
        .list(ProgressTable::Incorrect)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Schema { .. }));
}
