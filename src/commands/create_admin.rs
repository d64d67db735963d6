//! Create-admin command - Bootstraps an admin account.
//!
//! The HTTP admin-creation route needs an existing admin, so the first one
//! comes from here.

use std::sync::Arc;

use crate::cli::args::CreateAdminArgs;
use crate::config::Config;
use crate::domain::{Credentials, Registration};
use crate::errors::AppResult;
use crate::infra::{Database, UserStore};
use crate::services::Authenticator;

/// Execute the create-admin command
pub async fn execute(args: CreateAdminArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let repo = Arc::new(UserStore::new(db.get_connection()));
    let authenticator = Authenticator::from_config(repo, &config)?;

    let registration = Registration::new(Credentials::new(args.email, args.password))
        .with_names(args.first_name, args.last_name);
    let identity = authenticator.provision_admin(registration).await?;

    println!("Created admin {} (id {})", identity.email, identity.id);
    Ok(())
}
