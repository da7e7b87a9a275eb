// SPDX-License-Identifier: MIT

//! User account lifecycle against a real MongoDB.
//!
//! Gated on MONGODB_URI; skipped otherwise.

use mongodb::bson::doc;
use postboard::repository::users::NewUser;

mod common;

fn new_user(email: &str) -> NewUser {
    NewUser {
        name: "Test User".to_string(),
        email: email.to_string(),
        password: "hunter22".to_string(),
        gender: None,
    }
}

#[tokio::test]
async fn test_duplicate_signup_creates_nothing() {
    require_mongo!();
    let db = common::test_db().await;
    let state = common::state_with(db.clone());
    let email = common::unique_email("dup");

    let first = state.users.sign_up(new_user(&email)).await.unwrap();
    assert!(first.is_ok());

    let second = state.users.sign_up(new_user(&email)).await.unwrap();
    assert!(second.is_err(), "duplicate email must fail");

    let count = db
        .users()
        .unwrap()
        .count_documents(doc! { "email": &email })
        .await
        .unwrap();
    assert_eq!(count, 1, "duplicate signup must not insert a record");
}

#[tokio::test]
async fn test_signup_stores_hash_not_plaintext() {
    require_mongo!();
    let db = common::test_db().await;
    let state = common::state_with(db.clone());
    let email = common::unique_email("hash");

    state.users.sign_up(new_user(&email)).await.unwrap().unwrap();

    let stored = db
        .users()
        .unwrap()
        .find_one(doc! { "email": &email })
        .await
        .unwrap()
        .expect("user should exist");

    assert_ne!(stored.password, "hunter22");
    assert!(bcrypt::verify("hunter22", &stored.password).unwrap());
}

#[tokio::test]
async fn test_each_signin_appends_one_distinct_token() {
    require_mongo!();
    let db = common::test_db().await;
    let state = common::state_with(db.clone());
    let email = common::unique_email("signin");
    let key = state.config.jwt_signing_key.clone();

    state.users.sign_up(new_user(&email)).await.unwrap().unwrap();

    let first = state
        .users
        .sign_in(&email, "hunter22", &key)
        .await
        .unwrap()
        .expect("sign-in should succeed");
    let second = state
        .users
        .sign_in(&email, "hunter22", &key)
        .await
        .unwrap()
        .expect("sign-in should succeed");

    assert_ne!(first.token, second.token, "tokens must be distinct");

    let stored = db
        .users()
        .unwrap()
        .find_one(doc! { "email": &email })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.login_tokens, vec![first.token, second.token]);
}

#[tokio::test]
async fn test_signin_rejects_bad_credentials() {
    require_mongo!();
    let db = common::test_db().await;
    let state = common::state_with(db);
    let email = common::unique_email("badpw");
    let key = state.config.jwt_signing_key.clone();

    state.users.sign_up(new_user(&email)).await.unwrap().unwrap();

    let wrong_pw = state.users.sign_in(&email, "wrong", &key).await.unwrap();
    assert!(wrong_pw.is_err());

    let unknown = state
        .users
        .sign_in("nobody@example.com", "hunter22", &key)
        .await
        .unwrap();
    assert!(unknown.is_err());
}

#[tokio::test]
async fn test_logout_removes_only_presented_token() {
    require_mongo!();
    let db = common::test_db().await;
    let state = common::state_with(db.clone());
    let email = common::unique_email("logout");
    let key = state.config.jwt_signing_key.clone();

    let details = state.users.sign_up(new_user(&email)).await.unwrap().unwrap();
    let user_id = mongodb::bson::oid::ObjectId::parse_str(&details.id).unwrap();

    let first = state.users.sign_in(&email, "hunter22", &key).await.unwrap().unwrap();
    let second = state.users.sign_in(&email, "hunter22", &key).await.unwrap().unwrap();

    state
        .users
        .logout(&user_id, &first.token)
        .await
        .unwrap()
        .expect("logout should succeed");

    let stored = db
        .users()
        .unwrap()
        .find_one(doc! { "email": &email })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.login_tokens, vec![second.token], "other sessions stay intact");
}

#[tokio::test]
async fn test_logout_all_devices_empties_token_list() {
    require_mongo!();
    let db = common::test_db().await;
    let state = common::state_with(db.clone());
    let email = common::unique_email("logoutall");
    let key = state.config.jwt_signing_key.clone();

    let details = state.users.sign_up(new_user(&email)).await.unwrap().unwrap();
    let user_id = mongodb::bson::oid::ObjectId::parse_str(&details.id).unwrap();

    for _ in 0..3 {
        state.users.sign_in(&email, "hunter22", &key).await.unwrap().unwrap();
    }

    state
        .users
        .logout_all_devices(&user_id)
        .await
        .unwrap()
        .expect("logout-all should succeed");

    let stored = db
        .users()
        .unwrap()
        .find_one(doc! { "email": &email })
        .await
        .unwrap()
        .unwrap();
    assert!(stored.login_tokens.is_empty());
}

#[tokio::test]
async fn test_details_never_include_credentials() {
    require_mongo!();
    let db = common::test_db().await;
    let state = common::state_with(db);
    let email = common::unique_email("details");
    let key = state.config.jwt_signing_key.clone();

    let details = state.users.sign_up(new_user(&email)).await.unwrap().unwrap();
    state.users.sign_in(&email, "hunter22", &key).await.unwrap().unwrap();

    let fetched = state
        .users
        .get_details(&details.id)
        .await
        .unwrap()
        .expect("user should exist");
    let json = serde_json::to_value(&fetched).unwrap();
    assert!(json.get("password").is_none());
    assert!(json.get("login_tokens").is_none());

    for user in state.users.get_all_details().await.unwrap() {
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("login_tokens").is_none());
    }
}

#[tokio::test]
async fn test_update_details_merges_fields() {
    require_mongo!();
    let db = common::test_db().await;
    let state = common::state_with(db);
    let email = common::unique_email("merge");

    let details = state.users.sign_up(new_user(&email)).await.unwrap().unwrap();
    let user_id = mongodb::bson::oid::ObjectId::parse_str(&details.id).unwrap();

    let updated = state
        .users
        .update_details(
            &user_id,
            &details.id,
            postboard::repository::users::ProfileChanges {
                name: Some("Renamed".to_string()),
                gender: None,
            },
        )
        .await
        .unwrap()
        .expect("update should succeed");

    // The untouched field survives the merge
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.email, email);
}
