//! Contract test macro for `RecordStore<Booking>` implementations.
//!
//! # Generated Tests
//!
//! - key assignment, explicit keys, duplicate keys, exhausted key space
//! - unique-field enforcement on create and update
//! - record invariants checked against the stored record on update
//! - filtered count independent of the window
//! - sorting, windowing, offset past the end, zero limit
//! - not-found as a value for `find_by_id`, `update` and `delete`

/// Generate the store contract suite for a backend.
///
/// `$store_factory` must produce an `impl RecordStore<Booking>`.
#[macro_export]
macro_rules! record_store_tests {
    ($store_factory:expr) => {
        mod record_store_tests {
            use super::*;
            use bookings::core::query::{Filter, SortDirection, SortOrder};
            use bookings::core::store::RecordStore;
            use bookings::entities::{Booking, BookingPatch};

            fn by_room(direction: SortDirection) -> SortOrder {
                SortOrder {
                    field: "roomNumber".to_string(),
                    direction,
                }
            }

            async fn seeded(rooms: &[i64]) -> impl RecordStore<Booking> {
                let store = $store_factory;
                for (i, room) in rooms.iter().enumerate() {
                    store
                        .create(None, booking(*room, &format!("guest-{i}")))
                        .await
                        .unwrap();
                }
                store
            }

            #[tokio::test]
            async fn test_store_assigns_distinct_keys() {
                let store = seeded(&[1, 2, 3]).await;
                let all = store.find(&Filter::All, None, 0, None).await.unwrap();
                let mut ids: Vec<i64> = all.iter().map(|b| b.id).collect();
                ids.sort();
                ids.dedup();
                assert_eq!(ids.len(), 3);
            }

            #[tokio::test]
            async fn test_store_explicit_key() {
                let store = $store_factory;
                let created = store.create(Some(77), booking(1, "x")).await.unwrap();
                assert_eq!(created.id, 77);
                assert_eq!(store.find_by_id(77).await.unwrap().unwrap().name_id, "x");
            }

            #[tokio::test]
            async fn test_store_duplicate_key_rejected() {
                let store = $store_factory;
                store.create(Some(5), booking(1, "x")).await.unwrap();
                assert!(store.create(Some(5), booking(2, "y")).await.is_err());
            }

            #[tokio::test]
            async fn test_store_key_space_exhausted() {
                let store = $store_factory;
                store.create(Some(i64::MAX), booking(1, "last")).await.unwrap();

                assert!(store.create(None, booking(2, "next")).await.is_err());
                // the store still serves every operation afterwards
                assert_eq!(store.count(&Filter::All).await.unwrap(), 1);
                assert!(store.find_by_id(i64::MAX).await.unwrap().is_some());
                assert!(store.create(Some(1), booking(3, "first")).await.is_ok());
            }

            #[tokio::test]
            async fn test_store_update_checks_invariants_on_stored_record() {
                let store = $store_factory;
                let mut long_stay = booking(1, "long");
                long_stay.leave_day_number = 25;
                let id = store.create(None, long_stay).await.unwrap().id;

                let later_arrival = BookingPatch {
                    arrival_day_number: Some(20),
                    ..Default::default()
                };
                let earlier_leave = BookingPatch {
                    leave_day_number: Some(15),
                    ..Default::default()
                };
                assert!(store.update(id, &later_arrival).await.unwrap().is_some());
                assert!(store.update(id, &earlier_leave).await.is_err());

                let stored = store.find_by_id(id).await.unwrap().unwrap();
                assert!(stored.leave_day_number >= stored.arrival_day_number);
            }

            #[tokio::test]
            async fn test_store_unique_field_on_create() {
                let store = $store_factory;
                store.create(None, booking(1, "same")).await.unwrap();
                let err = store.create(None, booking(2, "same")).await.unwrap_err();
                assert!(err.to_string().contains("nameId"));
            }

            #[tokio::test]
            async fn test_store_unique_field_on_update() {
                let store = seeded(&[1, 2]).await;
                let all = store.find(&Filter::All, None, 0, None).await.unwrap();
                let patch = BookingPatch {
                    name_id: Some(all[0].name_id.clone()),
                    ..Default::default()
                };
                assert!(store.update(all[1].id, &patch).await.is_err());
            }

            #[tokio::test]
            async fn test_store_count_matches_filter() {
                let store = seeded(&[1, 2, 3]).await;
                store.create(None, booking(4, "VIP-guest")).await.unwrap();

                let filter = Filter::keyword(&["nameId"], Some("vip"));
                assert_eq!(store.count(&filter).await.unwrap(), 1);
                assert_eq!(store.count(&Filter::keyword(&["nameId"], Some("GUEST"))).await.unwrap(), 4);
                assert_eq!(store.count(&Filter::All).await.unwrap(), 4);
            }

            #[tokio::test]
            async fn test_store_sorted_window() {
                let store = seeded(&[5, 1, 3, 2, 4]).await;
                let asc = store
                    .find(&Filter::All, Some(&by_room(SortDirection::Ascending)), 0, Some(2))
                    .await
                    .unwrap();
                assert_eq!(asc.iter().map(|b| b.room_number).collect::<Vec<_>>(), vec![1, 2]);

                let desc = store
                    .find(&Filter::All, Some(&by_room(SortDirection::Descending)), 3, Some(10))
                    .await
                    .unwrap();
                assert_eq!(desc.iter().map(|b| b.room_number).collect::<Vec<_>>(), vec![2, 1]);
            }

            #[tokio::test]
            async fn test_store_offset_past_end_and_zero_limit() {
                let store = seeded(&[1, 2]).await;
                assert!(store.find(&Filter::All, None, 5, Some(3)).await.unwrap().is_empty());
                assert!(store.find(&Filter::All, None, 0, Some(0)).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_store_not_found_is_a_value() {
                let store = $store_factory;
                assert!(store.find_by_id(404).await.unwrap().is_none());
                assert!(store.update(404, &BookingPatch::default()).await.unwrap().is_none());
                assert!(!store.delete(404).await.unwrap());
            }

            #[tokio::test]
            async fn test_store_update_merges() {
                let store = seeded(&[3]).await;
                let id = store.find(&Filter::All, None, 0, None).await.unwrap()[0].id;
                let patch = BookingPatch {
                    had_breakfast: Some(true),
                    ..Default::default()
                };
                let updated = store.update(id, &patch).await.unwrap().unwrap();
                assert!(updated.had_breakfast);
                assert_eq!(updated.room_number, 3);
                assert_eq!(store.find_by_id(id).await.unwrap().unwrap(), updated);
            }

            #[tokio::test]
            async fn test_store_delete_removes() {
                let store = seeded(&[3]).await;
                let id = store.find(&Filter::All, None, 0, None).await.unwrap()[0].id;
                assert!(store.delete(id).await.unwrap());
                assert!(store.find_by_id(id).await.unwrap().is_none());
                assert_eq!(store.count(&Filter::All).await.unwrap(), 0);
            }
        }
    };
}
