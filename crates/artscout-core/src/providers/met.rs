// Met provider - bridges the API client with the CatalogSource trait
use async_trait::async_trait;
use artscout_api::{MetClient, MetObject};
use tracing::info;

use crate::{
    catalog::CatalogSource,
    models::{ObjectId, ObjectRecord},
    Result,
};

/// Wrapper around MetClient that implements CatalogSource
pub struct MetCatalog {
    client: MetClient,
}

impl MetCatalog {
    pub fn new(client: MetClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogSource for MetCatalog {
    async fn search_ids(&self, query: &str) -> Result<Vec<ObjectId>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        info!("Searching the Met for: {}", query);
        Ok(self.client.search_object_ids(query).await?)
    }

    async fn get_object(&self, id: ObjectId) -> Result<ObjectRecord> {
        let object = self.client.get_object(id).await?;
        Ok(met_to_record(object))
    }
}

/// Convert a Met API object into our internal ObjectRecord
fn met_to_record(met: MetObject) -> ObjectRecord {
    ObjectRecord {
        object_id: met.object_id,
        primary_image: met.primary_image,
        primary_image_small: met.primary_image_small,
        title: met.title,
        artist_display_name: met.artist_display_name,
        artist_display_bio: met.artist_display_bio,
        object_name: met.object_name,
        department: met.department,
        object_date: met.object_date,
        object_begin_date: met.object_begin_date,
        object_end_date: met.object_end_date,
        medium: met.medium,
        dimensions: met.dimensions,
        culture: met.culture,
        period: met.period,
        city: met.city,
        state: met.state,
        country: met.country,
        region: met.region,
        accession_number: met.accession_number,
        accession_year: met.accession_year,
        credit_line: met.credit_line,
        tags: met
            .tags
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tag| tag.term)
            .collect(),
        object_url: met.object_url,
    }
}
