//! Source page abstraction

use anyhow::Result;
use async_trait::async_trait;

/// Supplies the raw markup of the page holding the bank table.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self) -> Result<String>;
}
