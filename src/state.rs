use crate::loader::{load_documents, load_manifest, load_schema};
use crate::source::DataSource;
use crate::store::EntryStore;
use crate::viewer::Viewer;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub viewer: Arc<Mutex<Viewer>>,
}

impl AppState {
    pub fn new(viewer: Viewer) -> Self {
        Self {
            viewer: Arc::new(Mutex::new(viewer)),
        }
    }

    /// Loads the schema and every data file named by the manifest, then
    /// draws the first chart.
    pub async fn load(source: &DataSource) -> Self {
        let entries = async {
            let files = load_manifest(source).await;
            info!("loading {} data files", files.len());
            load_documents(source, &files).await
        };
        let (schema, documents) = tokio::join!(load_schema(source), entries);

        let store = EntryStore::from_documents(documents);
        info!("loaded {} entries", store.len());
        Self::new(Viewer::new(store, schema))
    }
}
