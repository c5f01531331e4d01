pub mod api;

use crate::config::SourceConfig;
use crate::snapshot::Snapshot;
use crate::source::LifecycleSource;
use anyhow::Result;
use async_trait::async_trait;

use self::api::WebLogicClient;

/// WebLogic source - polls `serverLifeCycleRuntimes` on an admin server
/// and projects the response into a name -> state snapshot.
pub struct WebLogicSource {
    name: String,
    client: WebLogicClient,
}

impl WebLogicSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            name: config.name.clone(),
            client: WebLogicClient::new(config)?,
        })
    }

    /// URL polled by this source.
    pub fn url(&self) -> &str {
        self.client.url()
    }
}

#[async_trait]
impl LifecycleSource for WebLogicSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Snapshot> {
        let collection = self.client.fetch_lifecycle().await?;
        Ok(Snapshot::from_items(
            collection
                .items
                .into_iter()
                .map(|item| (item.name, item.state)),
        ))
    }
}
