use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::models::{CacheEntry, Paste, PasteRecord};
use crate::token::generate_id;
use crate::App;

/// Create a paste from a submission: generate the public id and store
/// key, persist the record, then populate the cache best-effort.
pub async fn create(
    app: &mut App,
    content: String,
    title: Option<String>,
    language: Option<String>,
    author_email: &str,
) -> crate::ApiResult<Paste> {
    let record = PasteRecord {
        key: Uuid::new_v4().to_string(),
        id: generate_id(app.config.pastes.id_length),
        content,
        timestamp: Utc::now(),
        email: Some(author_email.to_owned()),
        title,
        language,
    };

    info!(
        "new paste: id='{id}', author='{author_email}', size={size}",
        id = record.id,
        size = record.content.len()
    );

    app.database.insert_paste(&record).await?;

    let paste = Paste::from(record);
    app.cache.add(paste.id(), paste.projection());

    Ok(paste)
}

/// Cache-aside read: try the cache first, fall back to the store on a
/// miss and repopulate the cache with the result.
pub async fn fetch(app: &mut App, id: &str) -> crate::ApiResult<CacheEntry> {
    if let Some(entry) = app.cache.read(id) {
        return Ok(entry);
    }

    let record = app.database.get_paste_by_id(id).await?;
    let entry = Paste::from(record).projection();
    app.cache.set(id, entry.clone());

    Ok(entry)
}

/// Delete the paste named by its store key and drop its cache entry.
/// A key that matches nothing is treated as already deleted.
pub async fn delete(app: &mut App, store_key: &str) -> crate::ApiResult<()> {
    let Some(record) = app.database.get_paste_by_key(store_key).await? else {
        return Ok(());
    };

    info!("deleting paste: id='{}'", record.id);

    app.cache.invalidate(&record.id);
    app.database.delete_paste(store_key).await?;

    Ok(())
}
