//! End-to-end lifecycle and concurrency tests over the in-memory stores.

use std::collections::HashSet;
use std::sync::Arc;

use app::{KitchenError, KitchenService};
use common::OrderId;
use domain::{DeliveryStatus, PreparationStatus};
use store::{InMemoryDeliveryStore, InMemoryPreparationStore};
use uuid::Uuid;

type Service = KitchenService<InMemoryPreparationStore, InMemoryDeliveryStore>;

fn service() -> Service {
    KitchenService::new(InMemoryPreparationStore::new(), InMemoryDeliveryStore::new())
}

fn order_id() -> OrderId {
    OrderId::from_uuid(Uuid::new_v4())
}

#[tokio::test]
async fn full_lifecycle() {
    let svc = service();
    let order = order_id();

    // Payment confirmed: preparation enters the queue
    let prep = svc
        .create_preparation(order, r#"{"items":[{"sku":"burger","qty":2}]}"#)
        .await
        .unwrap();
    assert_eq!(prep.status(), PreparationStatus::Received);

    // A worker claims it
    let claimed = svc.take_next().await.unwrap();
    assert_eq!(claimed.id(), prep.id());
    assert_eq!(claimed.status(), PreparationStatus::InProgress);

    // Cooking done: delivery provisioned
    let (finished, delivery_id) = svc.finish_preparation(prep.id()).await.unwrap();
    assert_eq!(finished.status(), PreparationStatus::Finished);

    let delivery = svc.get_delivery(delivery_id).await.unwrap().unwrap();
    assert_eq!(delivery.status(), DeliveryStatus::ReadyForPickup);
    assert_eq!(delivery.order_id(), Some(order));

    // Customer picks up
    let finalized = svc.finalize_delivery(delivery_id).await.unwrap();
    assert_eq!(finalized.status(), DeliveryStatus::Finalized);
    assert!(finalized.finalized_at().is_some());

    // Replayed finish reports the terminal status instead of double work
    let err = svc.finish_preparation(prep.id()).await.unwrap_err();
    assert!(matches!(
        err,
        KitchenError::Preparation(domain::PreparationError::InvalidTransition {
            current: PreparationStatus::Finished,
            ..
        })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_take_next_never_double_claims() {
    let svc = Arc::new(service());

    const PENDING: usize = 16;
    for _ in 0..PENDING {
        svc.create_preparation(order_id(), "{}").await.unwrap();
    }

    let mut handles = Vec::new();
    for _ in 0..PENDING {
        let svc = svc.clone();
        handles.push(tokio::spawn(async move { svc.take_next().await }));
    }

    let mut claimed = HashSet::new();
    for handle in handles {
        let prep = handle.await.unwrap().unwrap();
        assert_eq!(prep.status(), PreparationStatus::InProgress);
        // No two workers may claim the same preparation
        assert!(claimed.insert(prep.id()));
    }
    assert_eq!(claimed.len(), PENDING);

    let err = svc.take_next().await.unwrap_err();
    assert!(matches!(err, KitchenError::NoPendingPreparation));
}

#[tokio::test]
async fn take_next_exhausts_oldest_first() {
    let svc = service();

    let mut created = Vec::new();
    for _ in 0..5 {
        created.push(svc.create_preparation(order_id(), "{}").await.unwrap());
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    for expected in &created {
        let claimed = svc.take_next().await.unwrap();
        assert_eq!(claimed.id(), expected.id());
    }

    assert!(matches!(
        svc.take_next().await.unwrap_err(),
        KitchenError::NoPendingPreparation
    ));
}

#[tokio::test]
async fn concurrent_duplicate_creates_yield_one_record() {
    let svc = Arc::new(service());
    let order = order_id();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let svc = svc.clone();
        handles.push(tokio::spawn(async move {
            svc.create_preparation(order, "{}").await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(KitchenError::PreparationExists(o)) => assert_eq!(o, order),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(successes, 1);

    let page = svc.list_preparations(1, 10, None).await.unwrap();
    assert_eq!(page.total_count, 1);
}

#[tokio::test]
async fn pagination_concatenation_reproduces_full_set() {
    let svc = service();

    for _ in 0..7 {
        svc.create_preparation(order_id(), "{}").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }

    let page_size = 3;
    let mut seen = Vec::new();
    let mut page_number = 1;
    loop {
        let page = svc
            .list_preparations(page_number, page_size, None)
            .await
            .unwrap();
        // Total is invariant under the page number
        assert_eq!(page.total_count, 7);
        if page.items.is_empty() {
            break;
        }
        seen.extend(page.items);
        page_number += 1;
    }

    assert_eq!(seen.len(), 7);
    let distinct: HashSet<_> = seen.iter().map(|p| p.id()).collect();
    assert_eq!(distinct.len(), 7);

    // Newest first across the concatenation
    for window in seen.windows(2) {
        assert!(window[0].created_at() >= window[1].created_at());
    }
}

#[tokio::test]
async fn ready_deliveries_are_listed_oldest_first() {
    let svc = service();

    let mut delivery_ids = Vec::new();
    for _ in 0..3 {
        let prep = svc.create_preparation(order_id(), "{}").await.unwrap();
        svc.take_next().await.unwrap();
        let (_, delivery_id) = svc.finish_preparation(prep.id()).await.unwrap();
        delivery_ids.push(delivery_id);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let page = svc.list_ready_deliveries(1, 10).await.unwrap();
    assert_eq!(page.total_count, 3);
    let listed: Vec<_> = page.items.iter().map(|d| d.id()).collect();
    assert_eq!(listed, delivery_ids);

    // Finalizing removes a delivery from the ready list
    svc.finalize_delivery(delivery_ids[0]).await.unwrap();
    let page = svc.list_ready_deliveries(1, 10).await.unwrap();
    assert_eq!(page.total_count, 2);
    assert_eq!(page.items[0].id(), delivery_ids[1]);
}

#[tokio::test]
async fn retried_delivery_provisioning_is_idempotent() {
    let svc = service();
    let prep = svc.create_preparation(order_id(), "{}").await.unwrap();
    svc.take_next().await.unwrap();

    let (_, first_delivery) = svc.finish_preparation(prep.id()).await.unwrap();

    // Simulate the retried-finish path hitting provisioning directly:
    // an explicit create against the same preparation must conflict,
    // and the stored delivery must be the original.
    let err = svc.create_delivery(prep.id(), None).await.unwrap_err();
    assert!(matches!(err, KitchenError::DeliveryExists(_)));

    let stored = svc
        .get_delivery_by_preparation(prep.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id(), first_delivery);
}
