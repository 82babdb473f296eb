//! Marriage Consistency Sweep
//!
//! Marriage links are written to both rows in one transaction, but a status
//! change on one partner clears only that partner's link. The sweep reports
//! links left pointing one way so an admin can reconcile them.

use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinHandle;

use crate::db::find_one_sided_marriages;

/// Log every one-sided marriage link. Returns how many were found.
pub async fn check_marriage_links(pool: &PgPool) -> sqlx::Result<usize> {
    let broken = find_one_sided_marriages(pool).await?;
    for link in &broken {
        tracing::warn!(
            user_id = %link.user_id,
            partner_id = %link.partner_id,
            partner_married_with = ?link.partner_married_with,
            "One-sided marriage link"
        );
    }
    Ok(broken.len())
}

/// Run [`check_marriage_links`] every `every`.
pub fn spawn_consistency_sweep(pool: PgPool, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match check_marriage_links(&pool).await {
                Ok(0) => tracing::debug!("Marriage links consistent"),
                Ok(count) => tracing::info!(count, "Consistency sweep found one-sided marriages"),
                Err(err) => tracing::error!(%err, "Consistency sweep failed"),
            }
        }
    })
}
