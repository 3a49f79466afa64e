//! Status command handler.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use mingle_core::auth::tokens::{self, mask_token};

pub fn run() -> Result<()> {
    match tokens::load_tokens().context("load tokens")? {
        Some(stored) => {
            println!(
                "Signed in since {} ({})",
                stored.saved_at.format("%Y-%m-%d %H:%M:%S UTC"),
                format_age(stored.saved_at)
            );
            println!("  access token  {}", mask_token(&stored.pair.access_token));
            println!("  refresh token {}", mask_token(&stored.pair.refresh_token));
        }
        None => {
            println!("Not signed in. Run `mingle login` to sign in.");
        }
    }
    Ok(())
}

/// Formats a save timestamp as a short relative age ("2m ago", "3h ago").
fn format_age(saved_at: DateTime<Utc>) -> String {
    let seconds = Utc::now().signed_duration_since(saved_at).num_seconds().max(0);

    let mins = seconds / 60;
    if mins < 1 {
        return "just now".to_string();
    }
    if mins < 60 {
        return format!("{mins}m ago");
    }

    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }

    let days = hours / 24;
    if days < 7 {
        return format!("{days}d ago");
    }

    let weeks = days / 7;
    format!("{weeks}w ago")
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    /// Age tiers: minutes, hours, days, weeks.
    #[test]
    fn test_format_age_tiers() {
        let now = Utc::now();
        assert_eq!(format_age(now), "just now");
        assert_eq!(format_age(now - Duration::minutes(5)), "5m ago");
        assert_eq!(format_age(now - Duration::hours(3)), "3h ago");
        assert_eq!(format_age(now - Duration::days(2)), "2d ago");
        assert_eq!(format_age(now - Duration::days(15)), "2w ago");
    }

    /// A timestamp from the future never goes negative.
    #[test]
    fn test_format_age_future_clamps() {
        assert_eq!(format_age(Utc::now() + Duration::hours(1)), "just now");
    }
}
