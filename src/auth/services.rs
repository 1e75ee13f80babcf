use anyhow::Context;
use tracing::info;

use crate::{
    auth::{
        claims::ADMIN_ROLE,
        password,
        repo::{NewUser, UserRepo},
    },
    config::AdminSeed,
};

/// Creates the configured admin account unless a user with that username exists.
/// Returns whether a user was created.
pub async fn ensure_admin(users: &dyn UserRepo, seed: &AdminSeed) -> anyhow::Result<bool> {
    let existing = users
        .find_by_username(&seed.username)
        .await
        .context("look up admin user")?;
    if existing.is_some() {
        return Ok(false);
    }

    let hash = password::hash(seed.password.clone()).await?;
    let user = users
        .create(NewUser {
            full_name: Some(seed.full_name.clone()),
            username: seed.username.clone(),
            password_hash: hash,
            role: Some(ADMIN_ROLE.to_string()),
        })
        .await
        .context("create admin user")?;

    info!(user_id = %user.id, username = %user.username, "admin user created");
    Ok(true)
}
