use crate::store::DiaryStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub pet_name: Arc<str>,
    pub store: Arc<Mutex<DiaryStore>>,
}

impl AppState {
    pub fn new(pet_name: impl Into<String>, store: DiaryStore) -> Self {
        let pet_name: String = pet_name.into();
        Self {
            pet_name: Arc::from(pet_name),
            store: Arc::new(Mutex::new(store)),
        }
    }
}
