//! # Integrator Commands

use anyhow::{anyhow, bail};
use clap::Subcommand;

use solar_core::discount::{closest_secondary_factor, INTEGRATOR_SECONDARY_TIERS};
use solar_core::types::Factor;
use solar_db::Database;

#[derive(Debug, Subcommand)]
pub enum IntegratorCommand {
    /// Register an integrator
    Add {
        #[arg(long)]
        username: String,

        #[arg(long, env = "SOLAR_QUOTE_INTEGRATOR_SECRET", hide_env_values = true)]
        secret: String,

        #[arg(long)]
        display_name: Option<String>,

        /// Secondary factor tier, 0 (standard x0.84) to 4 (x0.80)
        #[arg(long, default_value_t = 0, conflicts_with = "secondary")]
        tier: usize,

        /// Explicit secondary factor, e.g. 0.825
        #[arg(long)]
        secondary: Option<f64>,
    },

    /// Change an integrator's tier, secret or display name
    ///
    /// Omitted options keep their current value; the id is preserved, so
    /// archived quotes stay linked.
    Update {
        username: String,

        /// New secret (the current one is kept when omitted)
        #[arg(long)]
        secret: Option<String>,

        #[arg(long)]
        display_name: Option<String>,

        /// New secondary factor tier, 0 (x0.84) to 4 (x0.80)
        #[arg(long, conflicts_with = "secondary")]
        tier: Option<usize>,

        /// New explicit secondary factor, e.g. 0.825
        #[arg(long)]
        secondary: Option<f64>,
    },

    /// List integrators with their multiplier and nearest tier
    List,

    /// Remove an integrator by username
    Remove { username: String },
}

pub async fn run(db: &Database, command: IntegratorCommand) -> anyhow::Result<()> {
    let repo = db.integrators();

    match command {
        IntegratorCommand::Add {
            username,
            secret,
            display_name,
            tier,
            secondary,
        } => {
            let factor = secondary_factor(tier, secondary)?;
            let profile = repo
                .create(&username, &secret, display_name.as_deref(), factor)
                .await?;
            println!(
                "Registered {} ({}) with multiplier {}",
                profile.username,
                profile.label(),
                profile.final_discount_multiplier
            );
        }
        IntegratorCommand::Update {
            username,
            secret,
            display_name,
            tier,
            secondary,
        } => {
            let factor = match (tier, secondary) {
                (None, None) => None,
                (tier, secondary) => Some(secondary_factor(tier.unwrap_or(0), secondary)?),
            };
            let current = repo
                .get_by_username(&username)
                .await?
                .ok_or_else(|| anyhow!("Integrator not found: {username}"))?;
            let profile = repo
                .update(
                    &current.id,
                    secret.as_deref(),
                    display_name.as_deref(),
                    factor,
                )
                .await?;
            println!(
                "Updated {} ({}) with multiplier {}",
                profile.username,
                profile.label(),
                profile.final_discount_multiplier
            );
        }
        IntegratorCommand::List => {
            let profiles = repo.list().await?;
            if profiles.is_empty() {
                println!("No integrators registered.");
            }
            for profile in profiles {
                let tier = closest_secondary_factor(profile.final_discount_multiplier);
                println!(
                    "{:<20}  {:<28}  {}  {}{}",
                    profile.username,
                    profile.label(),
                    profile.final_discount_multiplier,
                    tier.label,
                    if tier.exact { "" } else { " (approx.)" }
                );
            }
        }
        IntegratorCommand::Remove { username } => {
            let profile = repo
                .get_by_username(&username)
                .await?
                .ok_or_else(|| anyhow!("Integrator not found: {username}"))?;
            repo.delete(&profile.id).await?;
            println!("Removed {username}");
        }
    }

    Ok(())
}

/// Resolves `--tier` / `--secondary` into a factor.
fn secondary_factor(tier: usize, secondary: Option<f64>) -> anyhow::Result<Factor> {
    if let Some(value) = secondary {
        return Factor::from_decimal(value)
            .filter(|f| f.ppm() > 0)
            .ok_or_else(|| anyhow!("secondary factor must be in (0, 1], got {value}"));
    }

    match INTEGRATOR_SECONDARY_TIERS.get(tier) {
        Some(t) => Ok(t.factor),
        None => bail!(
            "tier must be between 0 and {}",
            INTEGRATOR_SECONDARY_TIERS.len() - 1
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_db::DbConfig;

    #[test]
    fn test_secondary_factor_from_tier() {
        assert_eq!(secondary_factor(0, None).unwrap(), Factor::from_ppm(840_000));
        assert_eq!(secondary_factor(4, None).unwrap(), Factor::from_ppm(800_000));
        assert!(secondary_factor(5, None).is_err());
    }

    #[test]
    fn test_explicit_secondary_factor() {
        assert_eq!(
            secondary_factor(0, Some(0.825)).unwrap(),
            Factor::from_ppm(825_000)
        );
        assert!(secondary_factor(0, Some(0.0)).is_err());
        assert!(secondary_factor(0, Some(1.5)).is_err());
    }

    #[tokio::test]
    async fn test_update_command_changes_tier_only() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        run(
            &db,
            IntegratorCommand::Add {
                username: "solartec".to_string(),
                secret: "s3cret-pass".to_string(),
                display_name: Some("SolarTec".to_string()),
                tier: 0,
                secondary: None,
            },
        )
        .await
        .unwrap();
        let before = db
            .integrators()
            .get_by_username("solartec")
            .await
            .unwrap()
            .unwrap();

        run(
            &db,
            IntegratorCommand::Update {
                username: "solartec".to_string(),
                secret: None,
                display_name: None,
                tier: Some(4),
                secondary: None,
            },
        )
        .await
        .unwrap();

        let after = db
            .integrators()
            .authenticate("solartec", "s3cret-pass")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.label(), "SolarTec");
        assert_eq!(after.final_discount_multiplier.ppt(), 408_038_400_000);
    }

    #[tokio::test]
    async fn test_update_unknown_integrator() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = run(
            &db,
            IntegratorCommand::Update {
                username: "nobody".to_string(),
                secret: None,
                display_name: None,
                tier: Some(1),
                secondary: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Integrator not found: nobody");
    }
}
