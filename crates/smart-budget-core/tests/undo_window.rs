use std::{sync::Arc, time::Duration};

use smart_budget_core::{
    InMemoryItemStore, ItemStore, ListSettings, ShoppingList, UndoAction, UndoCoordinator,
    UndoKind, UndoOutcome,
};
use smart_budget_domain::{NewItem, Tier};

fn list_with_window(seconds: u64) -> (ShoppingList, Arc<dyn ItemStore>) {
    let store: Arc<dyn ItemStore> = Arc::new(InMemoryItemStore::new());
    let settings = ListSettings {
        undo_window: Duration::from_secs(seconds),
        ..ListSettings::default()
    };
    (ShoppingList::new(Arc::clone(&store), settings), store)
}

#[tokio::test(start_paused = true)]
async fn pending_undo_expires_after_window() {
    let (list, store) = list_with_window(5);
    let id = list
        .add_item(NewItem::new("Batteries", 6.0, Tier::Need))
        .await
        .expect("add item");

    let pending = list.pending_undo().await.expect("armed");
    assert_eq!(pending.kind, UndoKind::Add);
    assert!(pending.expires_in <= Duration::from_secs(5));

    tokio::time::sleep(Duration::from_secs(6)).await;

    assert!(list.pending_undo().await.is_none());
    assert_eq!(list.undo().await.unwrap(), UndoOutcome::NothingPending);
    assert!(store.get(id).await.unwrap().is_some());
}

#[tokio::test(start_paused = true)]
async fn undo_inside_window_still_applies() {
    let (list, store) = list_with_window(5);
    let id = list
        .add_item(NewItem::new("Batteries", 6.0, Tier::Need))
        .await
        .expect("add item");

    tokio::time::sleep(Duration::from_secs(4)).await;

    assert_eq!(
        list.undo().await.unwrap(),
        UndoOutcome::Reverted(UndoKind::Add)
    );
    assert!(store.get(id).await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn replacement_restarts_the_window() {
    let (list, store) = list_with_window(5);
    list.add_item(NewItem::new("First", 1.0, Tier::Nice))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;
    let second = list
        .add_item(NewItem::new("Second", 2.0, Tier::Nice))
        .await
        .unwrap();

    // The first timer would have fired here; the replacement must survive it.
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(
        list.undo().await.unwrap(),
        UndoOutcome::Reverted(UndoKind::Add)
    );
    assert!(store.get(second).await.unwrap().is_none());
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn coordinator_can_be_driven_directly() {
    let store: Arc<dyn ItemStore> = Arc::new(InMemoryItemStore::new());
    let coordinator = UndoCoordinator::new(Arc::clone(&store), Duration::from_secs(2));
    let id = store
        .add(NewItem::new("Filters", 9.0, Tier::Good))
        .await
        .unwrap();
    let before = store.get(id).await.unwrap().unwrap();
    store.delete(id).await.unwrap();

    coordinator
        .record(UndoAction::Deleted {
            before: before.clone(),
        })
        .await;
    assert_eq!(coordinator.window(), Duration::from_secs(2));

    assert_eq!(
        coordinator.undo().await.unwrap(),
        UndoOutcome::Reverted(UndoKind::Delete)
    );
    assert_eq!(store.get(id).await.unwrap(), Some(before));
    assert_eq!(coordinator.undo().await.unwrap(), UndoOutcome::NothingPending);
}
