use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use smart_inventory::api::create_router;
use smart_inventory::codes::CodeGenerator;
use smart_inventory::db::Database;
use smart_inventory::inventory::Inventory;
use smart_inventory::models::*;
use tempfile::TempDir;
use uuid::Uuid;

/// Test server plus the temp dir holding its QR codes; the dir must outlive
/// the server.
struct TestApp {
    server: TestServer,
    codes: CodeGenerator,
    _dir: TempDir,
}

fn setup() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let codes = CodeGenerator::new(dir.path(), "http://inventory.test");
    let app = create_router(Inventory::new(db, codes.clone()));
    TestApp {
        server: TestServer::new(app).expect("Failed to create test server"),
        codes,
        _dir: dir,
    }
}

async fn create_drill(server: &TestServer) -> Equipment {
    server
        .post("/equipment/add")
        .json(&json!({ "name": "Drill", "location": "Shelf A", "notes": null }))
        .await
        .json::<Equipment>()
}

mod add_equipment {
    use super::*;

    #[tokio::test]
    async fn json_body_returns_created_record() {
        let app = setup();

        let response = app
            .server
            .post("/equipment/add")
            .json(&json!({ "name": "Drill", "location": "Shelf A", "notes": "18V" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let equipment: Equipment = response.json();
        assert_eq!(equipment.name, "Drill");
        assert_eq!(equipment.notes, Some("18V".to_string()));
        assert_eq!(equipment.status, EquipmentStatus::Available);
        assert!(app.codes.image_path(equipment.id).exists());
    }

    #[tokio::test]
    async fn form_submission_redirects_to_list() {
        let app = setup();

        let response = app
            .server
            .post("/equipment/add")
            .form(&[("name", "Ladder"), ("location", "Garage"), ("notes", "")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/");

        let list: Vec<Equipment> = app.server.get("/equipment").await.json();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Ladder");
        assert!(list[0].notes.is_none());
    }

    #[tokio::test]
    async fn missing_name_is_bad_request() {
        let app = setup();

        let response = app
            .server
            .post("/equipment/add")
            .json(&json!({ "location": "Shelf A" }))
            .await;

        response.assert_status_bad_request();
        assert!(response.text().contains("name is required"));
    }

    #[tokio::test]
    async fn form_without_location_is_bad_request() {
        let app = setup();

        let response = app
            .server
            .post("/equipment/add")
            .form(&[("name", "Drill"), ("location", "")])
            .await;

        response.assert_status_bad_request();
    }
}

mod list_equipment {
    use super::*;

    #[tokio::test]
    async fn returns_items_ordered_by_name() {
        let app = setup();
        for name in ["Saw", "Drill"] {
            app.server
                .post("/equipment/add")
                .json(&json!({ "name": name, "location": "Shelf A" }))
                .await;
        }

        let response = app.server.get("/equipment").await;

        response.assert_status_ok();
        let list: Vec<Equipment> = response.json();
        let names: Vec<&str> = list.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Drill", "Saw"]);
    }
}

mod get_equipment {
    use super::*;

    #[tokio::test]
    async fn returns_detail_with_empty_history_after_creation() {
        let app = setup();
        let created = create_drill(&app.server).await;

        let response = app.server.get(&format!("/equipment/{}", created.id)).await;

        response.assert_status_ok();
        let detail: EquipmentDetail = response.json();
        assert_eq!(detail.equipment.id, created.id);
        assert_eq!(detail.equipment.status, EquipmentStatus::Available);
        assert!(detail.history.is_empty());
    }

    #[tokio::test]
    async fn unknown_identifier_is_not_found() {
        let app = setup();

        let response = app.server.get(&format!("/equipment/{}", Uuid::new_v4())).await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn malformed_identifier_is_not_found() {
        let app = setup();

        let response = app.server.get("/equipment/not-a-uuid").await;

        response.assert_status_not_found();
    }
}

mod update_status {
    use super::*;

    #[tokio::test]
    async fn changes_status() {
        let app = setup();
        let created = create_drill(&app.server).await;

        let response = app
            .server
            .patch(&format!("/equipment/{}/status", created.id))
            .json(&json!({ "status": "issued" }))
            .await;

        response.assert_status_ok();
        let equipment: Equipment = response.json();
        assert_eq!(equipment.status, EquipmentStatus::Issued);
    }

    #[tokio::test]
    async fn invalid_status_is_rejected_and_status_is_unchanged() {
        let app = setup();
        let created = create_drill(&app.server).await;

        let response = app
            .server
            .patch(&format!("/equipment/{}/status", created.id))
            .json(&json!({ "status": "broken" }))
            .await;

        response.assert_status_bad_request();
        assert!(response.text().contains("Invalid status"));

        let detail: EquipmentDetail = app
            .server
            .get(&format!("/equipment/{}", created.id))
            .await
            .json();
        assert_eq!(detail.equipment.status, EquipmentStatus::Available);
    }

    #[tokio::test]
    async fn unknown_identifier_is_not_found() {
        let app = setup();

        let response = app
            .server
            .patch(&format!("/equipment/{}/status", Uuid::new_v4()))
            .json(&json!({ "status": "lost" }))
            .await;

        response.assert_status_not_found();
    }
}

mod history {
    use super::*;

    #[tokio::test]
    async fn appended_entries_are_returned_in_order() {
        let app = setup();
        let created = create_drill(&app.server).await;

        for action in ["checked out", "returned", "checked out"] {
            app.server
                .post(&format!("/equipment/{}/history", created.id))
                .json(&json!({ "action": action }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let detail: EquipmentDetail = app
            .server
            .get(&format!("/equipment/{}", created.id))
            .await
            .json();
        let actions: Vec<&str> = detail.history.iter().map(|h| h.action.as_str()).collect();
        assert_eq!(actions, vec!["checked out", "returned", "checked out"]);
    }

    #[tokio::test]
    async fn records_optional_user() {
        let app = setup();
        let created = create_drill(&app.server).await;

        let response = app
            .server
            .post(&format!("/equipment/{}/history", created.id))
            .json(&json!({ "action": "repaired", "user": "sam" }))
            .await;

        let detail: EquipmentDetail = response.json();
        assert_eq!(detail.history[0].user, Some("sam".to_string()));
    }

    #[tokio::test]
    async fn unknown_identifier_is_not_found() {
        let app = setup();

        let response = app
            .server
            .post(&format!("/equipment/{}/history", Uuid::new_v4()))
            .json(&json!({ "action": "checked out" }))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn empty_action_is_bad_request() {
        let app = setup();
        let created = create_drill(&app.server).await;

        let response = app
            .server
            .post(&format!("/equipment/{}/history", created.id))
            .json(&json!({ "action": "" }))
            .await;

        response.assert_status_bad_request();
    }
}

mod pages {
    use super::*;

    #[tokio::test]
    async fn index_lists_items_and_form() {
        let app = setup();
        create_drill(&app.server).await;

        let response = app.server.get("/").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Drill"));
        assert!(html.contains(r#"action="/equipment/add""#));
    }

    #[tokio::test]
    async fn scan_page_hosts_reader() {
        let app = setup();

        let response = app.server.get("/scan").await;

        response.assert_status_ok();
        assert!(response.text().contains("Html5QrcodeScanner"));
    }

    #[tokio::test]
    async fn item_page_shows_detail_and_code() {
        let app = setup();
        let created = create_drill(&app.server).await;

        let response = app.server.get(&format!("/item/{}", created.id)).await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Shelf A"));
        assert!(html.contains(&format!("/static/qrcodes/{}.png", created.id)));
    }

    #[tokio::test]
    async fn item_page_for_unknown_identifier_is_not_found() {
        let app = setup();

        let response = app.server.get(&format!("/item/{}", Uuid::new_v4())).await;

        response.assert_status_not_found();
        assert!(response.text().contains("Equipment not found"));
    }

    #[tokio::test]
    async fn generated_code_is_served_as_static_file() {
        let app = setup();
        let created = create_drill(&app.server).await;

        let response = app
            .server
            .get(&format!("/static/{}", created.qrcode_path))
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "image/png");
    }
}

mod scenario {
    use super::*;

    #[tokio::test]
    async fn create_issue_and_log_a_drill() {
        let app = setup();

        let created = create_drill(&app.server).await;
        assert_eq!(created.status, EquipmentStatus::Available);
        assert!(image::open(app.codes.image_path(created.id)).is_ok());

        app.server
            .patch(&format!("/equipment/{}/status", created.id))
            .json(&json!({ "status": "issued" }))
            .await
            .assert_status_ok();

        let detail: EquipmentDetail = app
            .server
            .get(&format!("/equipment/{}", created.id))
            .await
            .json();
        assert_eq!(detail.equipment.status, EquipmentStatus::Issued);

        app.server
            .post(&format!("/equipment/{}/history", created.id))
            .json(&json!({ "action": "checked out" }))
            .await
            .assert_status(StatusCode::CREATED);

        let detail: EquipmentDetail = app
            .server
            .get(&format!("/equipment/{}", created.id))
            .await
            .json();
        assert_eq!(detail.history.len(), 1);
        assert_eq!(detail.history[0].action, "checked out");
    }
}

#[tokio::test]
async fn health_returns_ok() {
    let app = setup();

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));
}
