//! Filter translation and pagination-follow tests.

use std::collections::HashMap;
use usher_storage::{InviteStatus, Store};
use usher_store_memory::MemoryStore;

use crate::query::{run_query, ReviewFilter};
use crate::tests::common::invitation;

fn status_filter(status: &str) -> ReviewFilter {
    ReviewFilter {
        invite_status: Some(status.to_string()),
        ..ReviewFilter::default()
    }
}

#[test]
fn filter_reads_the_three_recognized_params() {
    let mut params = HashMap::new();
    params.insert("invite_status".to_string(), "confirmed".to_string());
    params.insert("email".to_string(), "abc@gmail.com".to_string());
    params.insert("code".to_string(), "AAAAaaaa".to_string());
    params.insert("volume".to_string(), "11".to_string());

    let filter = ReviewFilter::from_query_params(&params);
    assert_eq!(filter.invite_status.as_deref(), Some("confirmed"));
    assert_eq!(filter.email.as_deref(), Some("abc@gmail.com"));
    assert_eq!(filter.code.as_deref(), Some("AAAAaaaa"));
}

#[tokio::test]
async fn status_query_orders_by_expiry_ascending() {
    let store = MemoryStore::new();
    store
        .create_invitation(&invitation("a@x.com", "CODEaaaa", InviteStatus::Unconfirmed, 9))
        .await
        .unwrap();
    store
        .create_invitation(&invitation("b@x.com", "CODEbbbb", InviteStatus::Unconfirmed, 3))
        .await
        .unwrap();
    store
        .create_invitation(&invitation("c@x.com", "CODEcccc", InviteStatus::Unconfirmed, 6))
        .await
        .unwrap();

    let items = run_query(&store, &status_filter("unconfirmed")).await.unwrap();
    let codes: Vec<&str> = items.iter().map(|item| item.code.as_str()).collect();
    assert_eq!(codes, ["CODEbbbb", "CODEcccc", "CODEaaaa"]);
}

#[tokio::test]
async fn unknown_status_matches_nothing_without_erroring() {
    let store = MemoryStore::new();
    store
        .create_invitation(&invitation("a@x.com", "CODEaaaa", InviteStatus::Unconfirmed, 9))
        .await
        .unwrap();

    let items = run_query(&store, &status_filter("limbo")).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn status_filter_narrows_by_email_and_code_client_side() {
    let store = MemoryStore::new();
    store
        .create_invitation(&invitation("a@x.com", "CODEaaaa", InviteStatus::Unconfirmed, 9))
        .await
        .unwrap();
    store
        .create_invitation(&invitation("a@x.com", "CODEbbbb", InviteStatus::Unconfirmed, 3))
        .await
        .unwrap();
    store
        .create_invitation(&invitation("b@x.com", "CODEcccc", InviteStatus::Unconfirmed, 6))
        .await
        .unwrap();

    let filter = ReviewFilter {
        invite_status: Some("unconfirmed".to_string()),
        email: Some("a@x.com".to_string()),
        code: Some("CODEbbbb".to_string()),
    };
    let items = run_query(&store, &filter).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].code, "CODEbbbb");
}

#[tokio::test]
async fn email_with_code_pins_a_single_record() {
    let store = MemoryStore::new();
    store
        .create_invitation(&invitation("a@x.com", "CODEaaaa", InviteStatus::Unconfirmed, 9))
        .await
        .unwrap();
    store
        .create_invitation(&invitation("a@x.com", "CODEbbbb", InviteStatus::Confirmed, 9))
        .await
        .unwrap();

    let filter = ReviewFilter {
        invite_status: None,
        email: Some("a@x.com".to_string()),
        code: Some("CODEbbbb".to_string()),
    };
    let items = run_query(&store, &filter).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].invite_status, InviteStatus::Confirmed);
}

#[tokio::test]
async fn every_path_survives_multi_page_reads() {
    let store = MemoryStore::with_page_size(2);
    for n in 0..5 {
        store
            .create_invitation(&invitation(
                "bulk@x.com",
                &format!("CODE{n:04}"),
                InviteStatus::Unconfirmed,
                7,
            ))
            .await
            .unwrap();
    }
    for n in 0..2 {
        store
            .create_invitation(&invitation(
                "other@x.com",
                &format!("CODE{n:04}"),
                InviteStatus::Unconfirmed,
                7,
            ))
            .await
            .unwrap();
    }

    let scanned = run_query(&store, &ReviewFilter::default()).await.unwrap();
    assert_eq!(scanned.len(), 7);

    let by_email = run_query(
        &store,
        &ReviewFilter {
            email: Some("bulk@x.com".to_string()),
            ..ReviewFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_email.len(), 5);

    let by_status = run_query(&store, &status_filter("unconfirmed")).await.unwrap();
    assert_eq!(by_status.len(), 7);
}
