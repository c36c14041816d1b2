#[cfg(test)]
mod saved_property_store {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use homesaver::models::{CurrentUser, SavePropertyPayload};
    use homesaver::{
        PropertyView, SavedPropertyApi, SavedPropertyRecord, SavedPropertyStore, StoreError,
        StoreResult,
    };
    use reqwest::StatusCode;
    use serde_json::{json, Value};

    const PLACEHOLDER: &str = "https://via.placeholder.com/800x500?text=Property+Image";

    /// In-memory marketplace.
    struct FakeApi {
        user: Option<CurrentUser>,
        saved: Mutex<Vec<Value>>,
        next_id: AtomicUsize,
        save_calls: AtomicUsize,
        remove_calls: AtomicUsize,
        fail_save: bool,
        save_reply: Option<Value>,
    }

    impl FakeApi {
        fn signed_in(saved: Vec<Value>) -> FakeApi {
            FakeApi {
                user: Some(CurrentUser {
                    username: "asha".to_string(),
                    email: "asha@example.com".to_string(),
                }),
                saved: Mutex::new(saved),
                next_id: AtomicUsize::new(100),
                save_calls: AtomicUsize::new(0),
                remove_calls: AtomicUsize::new(0),
                fail_save: false,
                save_reply: None,
            }
        }

        fn anonymous() -> FakeApi {
            FakeApi {
                user: None,
                ..FakeApi::signed_in(Vec::new())
            }
        }
    }

    #[async_trait]
    impl SavedPropertyApi for FakeApi {
        async fn current_user(&self) -> StoreResult<Option<CurrentUser>> {
            Ok(self.user.clone())
        }

        async fn saved_properties(&self) -> StoreResult<Vec<SavedPropertyRecord>> {
            let saved = self.saved.lock().unwrap();
            Ok(saved.iter().map(SavedPropertyRecord::from_value).collect())
        }

        async fn save_property(&self, payload: &SavePropertyPayload) -> StoreResult<Value> {
            self.save_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_save {
                return Err(StoreError::Remote {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "database unavailable".to_string(),
                });
            }
            if let Some(reply) = &self.save_reply {
                return Ok(reply.clone());
            }

            let mut record = serde_json::to_value(payload).unwrap();
            record["id"] = json!(self.next_id.fetch_add(1, Ordering::SeqCst));
            self.saved.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn remove_property(&self, id: &str) -> StoreResult<()> {
            self.remove_calls.fetch_add(1, Ordering::SeqCst);
            let mut saved = self.saved.lock().unwrap();
            let before = saved.len();
            saved.retain(|r| r["id"].to_string().trim_matches('"') != id);
            if saved.len() == before {
                return Err(StoreError::Remote {
                    status: StatusCode::NOT_FOUND,
                    message: "Property not found or unauthorized".to_string(),
                });
            }
            Ok(())
        }
    }

    fn andheri() -> PropertyView {
        PropertyView::from_value(&json!({
            "id": 871,
            "city": "Mumbai",
            "location": "Andheri",
            "property_type": "Apartment",
            "bedrooms": 2,
            "area_sqft": 850,
            "price": 9000000,
            "connectivity": "Excellent",
            "neighbourhood": "Average",
            "safety": "High",
            "livability": "Good"
        }))
        .unwrap()
    }

    fn baner() -> PropertyView {
        PropertyView::from_value(&json!({
            "city": "Pune",
            "location": "Baner",
            "property_type": "Villa",
            "price": 21000000
        }))
        .unwrap()
    }

    fn saved_baner() -> Value {
        json!({
            "id": 7,
            "city": "Pune",
            "location": "Baner",
            "property_type": "Villa",
            "price": "21000000.00",
            "Connectivity": "4.00"
        })
    }

    #[tokio::test]
    async fn mount_loads_saved_list_for_signed_in_user() {
        let api = Arc::new(FakeApi::signed_in(vec![saved_baner()]));
        let store = SavedPropertyStore::mount(api, PLACEHOLDER).await;

        assert!(store.is_authenticated());
        assert_eq!(store.len(), 1);
        assert!(store.is_saved(&baner()));
        assert!(!store.is_saved(&andheri()));
        assert_eq!(store.records()[0].ratings.connectivity, 4);
    }

    #[tokio::test]
    async fn anonymous_save_asks_for_login_without_request() {
        let api = Arc::new(FakeApi::anonymous());
        let mut store = SavedPropertyStore::mount(api.clone(), PLACEHOLDER).await;

        let result = store.save(&andheri()).await;

        assert!(matches!(result, Err(StoreError::AuthenticationRequired)));
        assert_eq!(api.save_calls.load(Ordering::SeqCst), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn save_mirrors_the_returned_record() {
        let api = Arc::new(FakeApi::signed_in(vec![saved_baner()]));
        let mut store = SavedPropertyStore::mount(api.clone(), PLACEHOLDER).await;

        let record = store.save(&andheri()).await.unwrap();

        assert_eq!(record.id.as_deref(), Some("100"));
        assert_eq!(record.ratings.connectivity, 5);
        assert_eq!(record.property_image.as_deref(), Some(PLACEHOLDER));
        assert!(store.is_saved(&andheri()));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn saving_twice_is_a_no_op() {
        let api = Arc::new(FakeApi::signed_in(Vec::new()));
        let mut store = SavedPropertyStore::mount(api.clone(), PLACEHOLDER).await;

        let first = store.save(&andheri()).await.unwrap();
        let second = store.save(&andheri()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(api.save_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn save_then_remove_restores_the_mirror() {
        let api = Arc::new(FakeApi::signed_in(vec![saved_baner()]));
        let mut store = SavedPropertyStore::mount(api.clone(), PLACEHOLDER).await;
        let before = store.len();

        store.save(&andheri()).await.unwrap();
        store.remove(&andheri()).await.unwrap();

        assert_eq!(store.len(), before);
        assert!(!store.is_saved(&andheri()));
        assert!(store.is_saved(&baner()));
        assert_eq!(api.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bare_id_reply_is_added_to_the_mirror() {
        let api = Arc::new(FakeApi {
            save_reply: Some(json!({ "id": 100 })),
            ..FakeApi::signed_in(vec![saved_baner()])
        });
        let mut store = SavedPropertyStore::mount(api.clone(), PLACEHOLDER).await;

        let record = store.save(&andheri()).await.unwrap();

        assert_eq!(record.id.as_deref(), Some("100"));
        assert_eq!(store.len(), 2);
        assert!(store.is_saved(&andheri()));
        assert!(store.is_saved(&baner()));

        store.save(&andheri()).await.unwrap();
        assert_eq!(api.save_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn unpriced_listing_is_not_mistaken_for_a_saved_one() {
        let api = Arc::new(FakeApi::signed_in(vec![saved_baner()]));
        let mut store = SavedPropertyStore::mount(api.clone(), PLACEHOLDER).await;
        let unpriced = PropertyView::from_value(&json!({
            "city": "Pune",
            "location": "Baner",
            "property_type": "Villa"
        }))
        .unwrap();

        assert!(!store.is_saved(&unpriced));
        assert!(store.toggle(&unpriced).await.unwrap());
        assert_eq!(api.save_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn failed_save_leaves_property_unsaved() {
        let api = Arc::new(FakeApi {
            fail_save: true,
            ..FakeApi::signed_in(vec![saved_baner()])
        });
        let mut store = SavedPropertyStore::mount(api.clone(), PLACEHOLDER).await;

        let result = store.save(&andheri()).await;

        assert!(matches!(result, Err(StoreError::Remote { .. })));
        assert!(!store.is_saved(&andheri()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn malformed_save_reply_keeps_a_local_record() {
        let api = Arc::new(FakeApi {
            save_reply: Some(json!(["created"])),
            ..FakeApi::signed_in(Vec::new())
        });
        let mut store = SavedPropertyStore::mount(api.clone(), PLACEHOLDER).await;

        let record = store.save(&andheri()).await.unwrap();

        assert!(record.id.is_some());
        assert_eq!(record.city.as_deref(), Some("Mumbai"));
        assert_eq!(record.price, Some(9000000.0));
        assert!(store.is_saved(&andheri()));
    }

    #[tokio::test]
    async fn removing_unknown_property_makes_no_request() {
        let api = Arc::new(FakeApi::signed_in(vec![saved_baner()]));
        let mut store = SavedPropertyStore::mount(api.clone(), PLACEHOLDER).await;

        let result = store.remove(&andheri()).await;

        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(api.remove_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn record_without_id_cannot_be_removed() {
        let legacy = json!({ "city": "Pune", "location": "Baner", "property_type": "Villa" });
        let api = Arc::new(FakeApi::signed_in(vec![legacy]));
        let mut store = SavedPropertyStore::mount(api.clone(), PLACEHOLDER).await;

        assert!(store.is_saved(&baner()));
        let result = store.remove(&baner()).await;

        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(api.remove_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn toggle_flips_saved_state() {
        let api = Arc::new(FakeApi::signed_in(Vec::new()));
        let mut store = SavedPropertyStore::mount(api.clone(), PLACEHOLDER).await;

        assert!(store.toggle(&baner()).await.unwrap());
        assert!(store.is_saved(&baner()));
        assert!(!store.toggle(&baner()).await.unwrap());
        assert!(!store.is_saved(&baner()));
        assert_eq!(api.save_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.remove_calls.load(Ordering::SeqCst), 1);
    }
}
