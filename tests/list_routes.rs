mod common;

use axum::http::{Method, StatusCode};
use chrono::{FixedOffset, TimeZone};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use serde_json::json;

use common::{TestApp, id_of, ids};
use shopping_lists::{
    db::dao::{DaoContext, NewList, NewListItem},
    db::entities::list,
    db::entities::list_permission::ListRight,
    db::entities::prelude::{List, ListItem},
    error::AppError,
    services::{ServiceContext, list_service::CreateList},
};

/// Sets `finished_at` to the given UTC `(year, month, day, hour, minute, second)`.
async fn mark_finished(app: &TestApp, list_id: i32, at: (i32, u32, u32, u32, u32, u32)) {
    let (year, month, day, hour, minute, second) = at;
    let finished_at = FixedOffset::east_opt(0)
        .expect("offset should be valid")
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .expect("timestamp should be valid");
    list::ActiveModel {
        id: Set(list_id),
        finished_at: Set(Some(finished_at)),
        ..Default::default()
    }
    .update(&app.state.db)
    .await
    .expect("list should update");
}

#[tokio::test]
async fn missing_or_unknown_user_is_unauthorized() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/lists", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);

    let (status, _) = app.get("/lists", 999).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/lists/1", 999).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn groceries_scenario() {
    let app = TestApp::new().await;
    let user = app.user("ada").await;

    let (status, body) = app
        .post("/lists", user, json!({ "name": "Groceries", "isTemplate": false }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let created = &body["data"];
    assert_eq!(created["name"], "Groceries");
    assert_eq!(created["isTemplate"], false);
    assert_eq!(created["items"], json!([]));
    let list_id = id_of(created);

    let (status, body) = app.get(&format!("/lists/{list_id}"), user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Groceries");

    let (_, body) = app.get("/lists?isTemplate=false", user).await;
    assert_eq!(ids(&body["data"]["objects"]), vec![list_id]);
    assert_eq!(body["data"]["totalCount"], 1);

    let (_, body) = app.get("/lists?isTemplate=true", user).await;
    assert_eq!(body["data"]["objects"], json!([]));
    assert_eq!(body["data"]["totalCount"], 0);
}

#[tokio::test]
async fn lists_of_other_users_are_not_found() {
    let app = TestApp::new().await;
    let owner = app.user("owner").await;
    let stranger = app.user("stranger").await;
    let list_id = app
        .list(owner, json!({ "name": "Private", "items": [{ "name": "Milk" }] }))
        .await;

    let path = format!("/lists/{list_id}");
    let (status, body) = app.get(&path, stranger).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let invisible_message = body["message"].clone();

    let (status, body) = app.get("/lists/424242", stranger).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"].as_str().map(|m| m.replace("424242", "")),
        invisible_message
            .as_str()
            .map(|m| m.replace(&list_id.to_string(), ""))
    );

    let (status, _) = app.put(&path, stranger, json!({ "name": "Mine now" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.delete(&path, stranger).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/lists", stranger).await;
    assert_eq!(body["data"]["totalCount"], 0);

    let (status, body) = app.get(&path, owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Private");
}

#[tokio::test]
async fn pagination_counts_the_whole_filtered_set() {
    let app = TestApp::new().await;
    let user = app.user("ada").await;
    let other = app.user("bob").await;
    let mut created = Vec::new();
    for name in ["a", "b", "c"] {
        created.push(
            app.list(user, json!({ "name": name, "items": [{ "name": "x" }, { "name": "y" }] }))
                .await,
        );
    }
    app.list(other, json!({ "name": "not mine" })).await;

    let (status, body) = app.get("/lists?limit=2&offset=0", user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]["objects"]), created[..2].to_vec());
    assert_eq!(body["data"]["totalCount"], 3);
    assert_eq!(
        body["data"]["objects"][0]["items"]
            .as_array()
            .map(Vec::len),
        Some(2)
    );

    let (_, body) = app.get("/lists?limit=2&offset=2", user).await;
    assert_eq!(ids(&body["data"]["objects"]), created[2..].to_vec());
    assert_eq!(body["data"]["totalCount"], 3);
}

#[tokio::test]
async fn negative_pagination_is_rejected() {
    let app = TestApp::new().await;
    let user = app.user("ada").await;

    let (status, body) = app.get("/lists?limit=-1", user).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["limit"]["min"].is_string());

    let (status, body) = app.get("/lists?offset=-3", user).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["offset"]["min"].is_string());
}

#[tokio::test]
async fn deleted_lists_only_show_up_when_asked_for() {
    let app = TestApp::new().await;
    let user = app.user("ada").await;
    let kept = app.list(user, json!({ "name": "kept" })).await;
    let removed = app.list(user, json!({ "name": "removed" })).await;

    let (status, _) = app.delete(&format!("/lists/{removed}"), user).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/lists", user).await;
    assert_eq!(ids(&body["data"]["objects"]), vec![kept]);

    let (_, body) = app.get("/lists?isDeleted=false", user).await;
    assert_eq!(ids(&body["data"]["objects"]), vec![kept]);

    let (_, body) = app.get("/lists?isDeleted=true", user).await;
    assert_eq!(ids(&body["data"]["objects"]), vec![removed]);
    assert!(body["data"]["objects"][0]["deletedAt"].is_string());

    let (status, _) = app.get(&format!("/lists/{removed}"), user).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn finished_lists_filter_by_year_month_and_date_range() {
    let app = TestApp::new().await;
    let user = app.user("ada").await;
    let march = app.list(user, json!({ "name": "march" })).await;
    let april = app.list(user, json!({ "name": "april" })).await;
    let open = app.list(user, json!({ "name": "open" })).await;
    let last_second_of_march = app.list(user, json!({ "name": "late march" })).await;
    let first_second_of_april = app.list(user, json!({ "name": "early april" })).await;
    mark_finished(&app, march, (2024, 3, 15, 12, 0, 0)).await;
    mark_finished(&app, april, (2024, 4, 1, 12, 0, 0)).await;
    mark_finished(&app, last_second_of_march, (2024, 3, 31, 23, 59, 59)).await;
    mark_finished(&app, first_second_of_april, (2024, 4, 1, 0, 0, 0)).await;

    let (_, body) = app.get("/lists?isFinished=true", user).await;
    assert_eq!(
        ids(&body["data"]["objects"]),
        vec![march, april, last_second_of_march, first_second_of_april]
    );

    let (_, body) = app.get("/lists", user).await;
    assert_eq!(ids(&body["data"]["objects"]), vec![open]);

    let (status, body) = app
        .get("/lists?isFinished=true&stringYearMonth=2024-03", user)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ids(&body["data"]["objects"]),
        vec![march, last_second_of_march]
    );
    assert_eq!(body["data"]["totalCount"], 2);

    let (_, body) = app
        .get("/lists?isFinished=true&stringYearMonth=2024-04", user)
        .await;
    assert_eq!(
        ids(&body["data"]["objects"]),
        vec![april, first_second_of_april]
    );

    let (_, body) = app
        .get(
            "/lists?isFinished=true&startDateRange=2024-03-01&endDateRange=2024-03-15",
            user,
        )
        .await;
    assert_eq!(ids(&body["data"]["objects"]), vec![march]);

    let (_, body) = app
        .get(
            "/lists?isFinished=true&startDateRange=2024-03-31&endDateRange=2024-03-31",
            user,
        )
        .await;
    assert_eq!(ids(&body["data"]["objects"]), vec![last_second_of_march]);

    let (_, body) = app
        .get("/lists?isFinished=true&startDateRange=2024-03-16", user)
        .await;
    assert_eq!(body["data"]["totalCount"], 4);
}

#[tokio::test]
async fn malformed_year_month_is_a_validation_error() {
    let app = TestApp::new().await;
    let user = app.user("ada").await;

    let (status, body) = app.get("/lists?stringYearMonth=2024-13", user).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["stringYearMonth"].is_object());
}

#[tokio::test]
async fn update_replaces_fields_and_sets_finished_at() {
    let app = TestApp::new().await;
    let user = app.user("ada").await;
    let list_id = app
        .list(
            user,
            json!({ "name": "Weekend", "category": "food", "items": [{ "name": "Eggs" }] }),
        )
        .await;
    let path = format!("/lists/{list_id}");

    let (status, body) = app
        .put(&path, user, json!({ "name": "Weekend trip", "price": 12.5, "finished": true }))
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let updated = &body["data"];
    assert_eq!(updated["name"], "Weekend trip");
    assert_eq!(updated["price"], 12.5);
    assert!(updated["category"].is_null());
    assert!(updated["finishedAt"].is_string());
    assert_eq!(updated["items"].as_array().map(Vec::len), Some(1));

    let (_, body) = app.put(&path, user, json!({ "name": "Weekend trip" })).await;
    assert!(body["data"]["finishedAt"].is_null());
    assert!(body["data"]["price"].is_null());
}

#[tokio::test]
async fn invalid_payloads_are_rejected_before_writing() {
    let app = TestApp::new().await;
    let user = app.user("ada").await;

    let (status, body) = app
        .post(
            "/lists",
            user,
            json!({ "name": "x".repeat(255), "items": [{ "unit": "y".repeat(32) }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["name"]["maxLength"].is_string());
    assert!(body["errors"]["items.0.unit"]["maxLength"].is_string());

    let (_, body) = app.get("/lists", user).await;
    assert_eq!(body["data"]["totalCount"], 0);

    let list_id = app.list(user, json!({ "name": "ok" })).await;
    let (status, body) = app
        .put(&format!("/lists/{list_id}"), user, json!({ "price": -1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["price"]["min"].is_string());
}

#[tokio::test]
async fn duplicate_users_conflict() {
    let app = TestApp::new().await;
    app.user("ada").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/users",
            None,
            Some(json!({ "username": "someone", "email": "ada@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn creation_grants_exactly_one_owner_permission() {
    let app = TestApp::new().await;
    let user = app.user("ada").await;
    let list_id = app.list(user, json!({ "name": "Groceries" })).await;

    let permissions = DaoContext::new(&app.state.db)
        .permission()
        .find_for_list(list_id)
        .await
        .expect("permissions should load");

    assert_eq!(permissions.len(), 1);
    assert_eq!(permissions[0].user_id, user);
    assert_eq!(
        ListRight::try_from(permissions[0].user_right.as_str()),
        Ok(ListRight::Owner)
    );
}

#[tokio::test]
async fn failed_ownership_write_rolls_back_the_whole_list() {
    let app = TestApp::new().await;
    let missing_owner = 4242;

    let input = CreateList {
        list: NewList {
            name: Some("Orphan".to_string()),
            description: None,
            category: None,
            is_template: false,
        },
        items: vec![NewListItem {
            name: Some("Milk".to_string()),
            amount: Some(1.0),
            unit: None,
        }],
    };

    let err = ServiceContext::from_state(app.state.as_ref())
        .list()
        .create_list(input, missing_owner)
        .await
        .expect_err("owner does not exist");
    assert!(
        matches!(&err, AppError::Internal(message) if message == "Failed to save list ownership"),
        "{err:?}"
    );

    let lists = List::find()
        .count(&app.state.db)
        .await
        .expect("lists should count");
    let items = ListItem::find()
        .count(&app.state.db)
        .await
        .expect("items should count");
    assert_eq!(lists, 0);
    assert_eq!(items, 0);
}
