//! Call history browser.
//!
//! Every call across all users is fetched once, newest first. The page
//! shows a growing window over that list; asking for more widens the window
//! without fetching again.

use std::collections::HashMap;

use database::{call, user_mirror, CallRecord, Database};
use serde::Serialize;

/// Rows added to the window per page.
pub const PAGE_SIZE: usize = 10;

/// One line of the call history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRow {
    pub id: String,
    pub user_id: String,
    /// `None` when the user record no longer exists.
    pub user_email: Option<String>,
    pub category_id: Option<String>,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub updated_at: String,
    pub has_recording: bool,
    pub has_video: bool,
}

impl CallRow {
    fn from_record(record: CallRecord, user_email: Option<String>) -> Self {
        Self {
            has_recording: record.recording_url.is_some(),
            has_video: record.video_url.is_some(),
            id: record.id,
            user_id: record.user_id,
            user_email,
            category_id: record.category_id,
            started_at: record.started_at,
            ended_at: record.ended_at,
            updated_at: record.updated_at,
        }
    }
}

/// Sorted call list plus the visible window.
#[derive(Debug, Clone)]
pub struct CallHistory {
    rows: Vec<CallRow>,
    pages: usize,
}

impl CallHistory {
    /// Sort `rows` newest first and show the first page. Calls updated at
    /// the same moment are ordered by user ID, then call ID.
    pub fn new(mut rows: Vec<CallRow>) -> Self {
        rows.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| (&a.user_id, &a.id).cmp(&(&b.user_id, &b.id)))
        });
        Self { rows, pages: 1 }
    }

    /// Fetch every call and resolve the owning user's email.
    ///
    /// The whole collection is read on each load.
    pub async fn load(db: &Database) -> database::Result<Self> {
        let pool = db.pool();
        let records = call::list_all_calls(pool).await?;

        // Each user is looked up once, however many calls they have.
        let mut emails: HashMap<String, Option<String>> = HashMap::new();
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let email = match emails.get(&record.user_id) {
                Some(email) => email.clone(),
                None => {
                    let email = user_mirror::get_user_email(pool, &record.user_id).await?;
                    emails.insert(record.user_id.clone(), email.clone());
                    email
                }
            };
            rows.push(CallRow::from_record(record, email));
        }

        tracing::debug!(calls = rows.len(), users = emails.len(), "Loaded call history");
        Ok(Self::new(rows))
    }

    /// Show `pages` pages at once. At least one page is always shown.
    pub fn with_pages(mut self, pages: usize) -> Self {
        self.pages = pages.max(1);
        self
    }

    /// The rows currently shown: `min(total, pages * PAGE_SIZE)` of them.
    pub fn visible(&self) -> &[CallRow] {
        let end = self.rows.len().min(self.pages.saturating_mul(PAGE_SIZE));
        &self.rows[..end]
    }

    /// Widen the window by one page.
    pub fn load_more(&mut self) {
        if self.has_more() {
            self.pages += 1;
        }
    }

    pub fn has_more(&self) -> bool {
        self.visible().len() < self.rows.len()
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn pages(&self) -> usize {
        self.pages
    }
}
