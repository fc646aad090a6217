//! Maintenance CLI: delete all non-administrator accounts and their data.
//!
//! Lists the affected users and related-row counts, asks the operator to
//! type YES, then performs the multi-table delete inside one transaction.
//! Any failure rolls the whole deletion back.

use std::io::{self, BufRead, Write};

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait};

use eteeap_backend::db;
use eteeap_backend::models::prelude::*;
use eteeap_backend::models::user::{self, Role};
use eteeap_backend::models::{
    activity_log, application, document_remark, notification_read, verified_file,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let conn = db::connect().await?;

    let users = User::find()
        .filter(user::Column::Role.ne(Role::Admin))
        .all(&conn)
        .await?;

    if users.is_empty() {
        println!("No non-admin users found. Nothing to do.");
        return Ok(());
    }

    println!("Non-admin users to be removed:");
    for u in &users {
        println!(" - {}: {} <{}> (role={})", u.id, u.fullname, u.email, u.role.as_str());
    }

    let user_ids: Vec<i64> = users.iter().map(|u| u.id).collect();

    let app_count = Application::find()
        .filter(application::Column::UserId.is_in(user_ids.clone()))
        .count(&conn)
        .await?;
    let log_count = ActivityLog::find()
        .filter(activity_log::Column::UserId.is_in(user_ids.clone()))
        .count(&conn)
        .await?;

    println!();
    println!("Related rows: applications={}, activity_logs={}", app_count, log_count);
    println!(
        "This will also remove related document remarks, verified files, and \
         notification read markers for those applications/users."
    );

    print!("Type YES to confirm deletion of these accounts and related data: ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    if answer.trim() != "YES" {
        println!("Aborted by user. No changes made.");
        return Ok(());
    }

    println!("Proceeding with deletion...");

    let txn = conn.begin().await?;

    let apps = Application::find()
        .filter(application::Column::UserId.is_in(user_ids.clone()))
        .all(&txn)
        .await?;
    let app_ids: Vec<i64> = apps.iter().map(|a| a.id).collect();

    if !app_ids.is_empty() {
        VerifiedFile::delete_many()
            .filter(verified_file::Column::ApplicationId.is_in(app_ids.clone()))
            .exec(&txn)
            .await?;
        DocumentRemark::delete_many()
            .filter(document_remark::Column::ApplicationId.is_in(app_ids.clone()))
            .exec(&txn)
            .await?;
        Application::delete_many()
            .filter(application::Column::Id.is_in(app_ids))
            .exec(&txn)
            .await?;
    }

    NotificationRead::delete_many()
        .filter(notification_read::Column::UserId.is_in(user_ids.clone()))
        .exec(&txn)
        .await?;
    ActivityLog::delete_many()
        .filter(activity_log::Column::UserId.is_in(user_ids.clone()))
        .exec(&txn)
        .await?;
    User::delete_many()
        .filter(user::Column::Id.is_in(user_ids))
        .exec(&txn)
        .await?;

    match txn.commit().await {
        Ok(()) => {
            println!("Deletion complete.");
            Ok(())
        }
        Err(e) => {
            eprintln!("Error during deletion, changes rolled back: {}", e);
            Err(e.into())
        }
    }
}
