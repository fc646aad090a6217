//! Derived notification view.
//!
//! Notifications are not stored rows. They are synthesized on each request
//! from two sources scoped to the caller's applications: document remarks
//! (`remark:<id>`) and application status rows
//! (`status:<application_id>:<unix_ts>`). A per-user read marker table
//! overlays the `read` flag.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;

use crate::error::Result;
use crate::models::prelude::{Application, DocumentRemark, NotificationRead};
use crate::models::{application, document_remark, notification_read};

/// Cap applied to each notification source per request.
const PER_SOURCE_LIMIT: u64 = 50;

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub notification_key: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub application_id: i64,
    pub title: String,
    pub message: String,
    pub date: DateTime<Utc>,
    pub ts: i64,
    pub read: bool,
}

/// Build the caller's notification feed, newest first.
pub async fn build_notifications<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> Result<Vec<Notification>> {
    let app_ids: Vec<i64> = Application::find()
        .filter(application::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|a| a.id)
        .collect();

    if app_ids.is_empty() {
        return Ok(Vec::new());
    }

    let remarks = DocumentRemark::find()
        .filter(document_remark::Column::ApplicationId.is_in(app_ids.clone()))
        .order_by_desc(document_remark::Column::CreatedAt)
        .limit(PER_SOURCE_LIMIT)
        .all(db)
        .await?;

    // Drafts have no meaningful status to announce
    let status_rows = Application::find()
        .filter(application::Column::UserId.eq(user_id))
        .filter(application::Column::IsDraft.eq(false))
        .order_by_desc(application::Column::UpdatedAt)
        .limit(PER_SOURCE_LIMIT)
        .all(db)
        .await?;

    let mut items: Vec<Notification> = Vec::with_capacity(remarks.len() + status_rows.len());

    for r in remarks {
        items.push(Notification {
            notification_key: format!("remark:{}", r.id),
            kind: "remark",
            application_id: r.application_id,
            title: r.document_name.clone(),
            message: r.remark,
            date: r.created_at,
            ts: r.created_at.timestamp(),
            read: false,
        });
    }

    for a in status_rows {
        items.push(Notification {
            notification_key: format!("status:{}:{}", a.id, a.updated_at.timestamp()),
            kind: "status",
            application_id: a.id,
            title: format!("Application Status: {}", a.status.as_str()),
            message: a.status.as_str().to_string(),
            date: a.updated_at,
            ts: a.updated_at.timestamp(),
            read: false,
        });
    }

    sort_newest_first(&mut items);

    let keys: Vec<String> = items.iter().map(|n| n.notification_key.clone()).collect();
    let read_keys: HashSet<String> = NotificationRead::find()
        .filter(notification_read::Column::UserId.eq(user_id))
        .filter(notification_read::Column::NotificationKey.is_in(keys))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.notification_key)
        .collect();

    for item in &mut items {
        item.read = read_keys.contains(&item.notification_key);
    }

    Ok(items)
}

/// Sort strictly descending by timestamp; the key breaks timestamp ties so
/// the order is deterministic.
fn sort_newest_first(items: &mut [Notification]) {
    items.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.notification_key.cmp(&a.notification_key))
    });
}

/// Mark one notification as seen. Idempotent under the unique
/// (user_id, notification_key) index.
pub async fn mark_read<C: ConnectionTrait>(db: &C, user_id: i64, key: &str) -> Result<()> {
    let entry = notification_read::ActiveModel {
        user_id: Set(user_id),
        notification_key: Set(key.to_string()),
        read_at: Set(Utc::now()),
        ..Default::default()
    };

    NotificationRead::insert(entry)
        .on_conflict(
            OnConflict::columns([
                notification_read::Column::UserId,
                notification_read::Column::NotificationKey,
            ])
            .update_column(notification_read::Column::ReadAt)
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}
