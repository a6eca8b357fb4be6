//! Seed the database with empty page sections.
//!
//! The public pages skip any section without a row, and the admin editors
//! show a blank form for it. Seeding gives every section a row titled with
//! its label so the pages render a skeleton before any content is written.
//! Running it again creates nothing.

use tracing::{error, info};

use tezukuri_admin::db::SectionRepository;
use tezukuri_core::SectionPage;

use super::connect;

/// Insert a row for every section key of both pages that is missing.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn sections() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    let repo = SectionRepository::new(&pool);

    for page in [SectionPage::Home, SectionPage::About] {
        let created = match repo.seed_missing(page).await {
            Ok(created) => created,
            Err(e) => {
                error!(page = %page, error = %e, "Failed to seed sections");
                return Err(e.into());
            }
        };
        info!(page = %page, created, "Sections seeded");
    }

    info!("Seeding complete!");
    Ok(())
}
