use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A paste row as stored in the database.
///
/// `email`, `title` and `language` are nullable: rows written by earlier
/// deployments predate those columns.
#[derive(Debug, Clone, FromRow)]
pub struct PasteRecord {
    pub key: String,
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub language: Option<String>,
}

/// A stored paste.
///
/// The variant records which schema generation the row belongs to:
/// `Legacy` rows predate attribution metadata, `Attributed` rows carry
/// the submitter's email and optional display metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum Paste {
    Legacy {
        key: String,
        id: String,
        content: String,
        timestamp: DateTime<Utc>,
    },
    Attributed {
        key: String,
        id: String,
        content: String,
        timestamp: DateTime<Utc>,
        email: String,
        title: Option<String>,
        language: Option<String>,
    },
}

impl Paste {
    /// Internal store key. Distinct from the public id; only ever leaves
    /// the process inside the deletion cookie.
    pub fn key(&self) -> &str {
        match self {
            Paste::Legacy { key, .. } | Paste::Attributed { key, .. } => key,
        }
    }

    /// Public identifier.
    pub fn id(&self) -> &str {
        match self {
            Paste::Legacy { id, .. } | Paste::Attributed { id, .. } => id,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Paste::Legacy { content, .. } | Paste::Attributed { content, .. } => content,
        }
    }

    /// Project this paste into its cacheable form. Legacy pastes expose
    /// content only; attributed pastes also carry display metadata and
    /// the attribution block.
    pub fn projection(&self) -> CacheEntry {
        match self {
            Paste::Legacy { content, .. } => CacheEntry {
                content: content.clone(),
                title: None,
                language: None,
                attribution: None,
            },
            Paste::Attributed {
                content,
                timestamp,
                email,
                title,
                language,
                ..
            } => CacheEntry {
                content: content.clone(),
                title: title.clone(),
                language: language.clone(),
                attribution: Some(Attribution {
                    email: email.clone(),
                    timestamp: *timestamp,
                }),
            },
        }
    }
}

impl From<PasteRecord> for Paste {
    fn from(record: PasteRecord) -> Self {
        match record.email {
            Some(email) => Paste::Attributed {
                key: record.key,
                id: record.id,
                content: record.content,
                timestamp: record.timestamp,
                email,
                title: record.title,
                language: record.language,
            },
            None => Paste::Legacy {
                key: record.key,
                id: record.id,
                content: record.content,
                timestamp: record.timestamp,
            },
        }
    }
}

/// Disposable projection of a paste held by the cache layer. The store
/// remains the source of truth; an entry can vanish at any time.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub content: String,
    pub title: Option<String>,
    pub language: Option<String>,
    pub attribution: Option<Attribution>,
}

/// Submitter attribution, only present on pastes written by the current
/// schema generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribution {
    pub email: String,
    pub timestamp: DateTime<Utc>,
}
