use crate::chart::{ChartSlot, WeightChart};
use crate::errors::ImportError;
use crate::exchange::{export_view, parse_upload, EXPORT_FILE_NAME};
use crate::models::Entry;
use crate::render::render_entries;
use crate::store::EntryStore;
use crate::view::{current_entries, ViewQuery};
use serde_json::Value;
use tracing::{info, warn};

/// A control interaction from the page.
#[derive(Debug, Clone)]
pub enum Event {
    /// Month filter typed or sort direction changed.
    ViewChanged(ViewQuery),
    DownloadRequested(ViewQuery),
    /// Text of the file chosen in the upload picker.
    UploadSelected { view: ViewQuery, text: String },
}

/// What the page should do in response to an [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RenderEntries(String),
    RedrawChart { generation: u64 },
    OfferDownload { file_name: &'static str, body: String },
    Notify(String),
}

/// Session state: the entry store and the live chart. Only `handle` with an
/// upload mutates the store.
#[derive(Debug, Default)]
pub struct Viewer {
    store: EntryStore,
    chart: ChartSlot,
    schema: Option<Value>,
}

impl Viewer {
    pub fn new(store: EntryStore, schema: Option<Value>) -> Self {
        let mut viewer = Self {
            store,
            chart: ChartSlot::default(),
            schema,
        };
        viewer.chart.redraw(viewer.store.entries());
        viewer
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    pub fn chart(&self) -> Option<&WeightChart> {
        self.chart.current()
    }

    pub fn view(&self, query: &ViewQuery) -> Vec<&Entry> {
        current_entries(self.store.entries(), query)
    }

    pub fn render(&self, query: &ViewQuery) -> String {
        render_entries(&self.view(query))
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::ViewChanged(query) => vec![Effect::RenderEntries(self.render(&query))],
            Event::DownloadRequested(query) => match export_view(&self.view(&query)) {
                Ok(body) => vec![Effect::OfferDownload {
                    file_name: EXPORT_FILE_NAME,
                    body,
                }],
                Err(err) => vec![Effect::Notify(format!("Export failed: {err}"))],
            },
            Event::UploadSelected { view, text } => match self.import(&text) {
                Ok(_) => {
                    let generation = self.chart.redraw(self.store.entries()).generation;
                    vec![
                        Effect::RenderEntries(self.render(&view)),
                        Effect::RedrawChart { generation },
                    ]
                }
                Err(err) => vec![Effect::Notify(err.to_string())],
            },
        }
    }

    /// Prepends an uploaded batch; returns how many entries it held.
    pub fn import(&mut self, text: &str) -> Result<usize, ImportError> {
        let batch = parse_upload(text).inspect_err(|err| warn!("rejected upload: {err}"))?;
        let count = batch.len();
        self.store.prepend(batch);
        info!("imported {count} entries, store now holds {}", self.store.len());
        Ok(count)
    }
}
