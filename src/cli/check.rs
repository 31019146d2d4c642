use std::path::Path;

use anyhow::{Context, Result, bail};

use linkhub::domain::{Hostname, VerificationToken, challenge_host, instructions_for};
use linkhub::infrastructure::config::AppConfig;
use linkhub::infrastructure::dns::{DnsChecker, HickoryChecker};
use linkhub::infrastructure::store::DomainStore;

/// One-shot DNS challenge check against the live resolver, without touching
/// stored verification state. Useful for debugging a customer's DNS setup.
#[tokio::main]
pub async fn execute(config_path: &Path, hostname: &str, token: Option<String>) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let targets = config.routing_targets();

    let hostname = Hostname::parse(hostname, &config.platform.domain)?;

    let token = match token {
        Some(value) => VerificationToken::from_stored(value),
        None => {
            let store = DomainStore::open(config.store_path.clone())
                .context("Failed to open domain record store")?;
            let record = store
                .find_by_hostname(hostname.as_str())?
                .context("Hostname is not connected; pass --token to check anyway")?;
            match record.token {
                Some(token) => token,
                None => bail!("Record for {} carries no verification token", hostname),
            }
        }
    };

    let checker = HickoryChecker::new(targets.clone(), config.dns.lookup_timeout);
    let check = checker.check(&hostname, &token).await?;

    println!("Hostname:  {hostname}");
    println!(
        "TXT {}:  {}",
        challenge_host(&hostname),
        if check.txt_verified { "ok" } else { "missing" }
    );
    if check.txt_verified {
        println!(
            "Routing:   {}",
            if check.routing_ok {
                "ok"
            } else {
                "not configured"
            }
        );
    } else {
        println!("Routing:   skipped (ownership unproven)");
    }

    if !(check.txt_verified && check.routing_ok) {
        println!("\nExpected records:");
        for instruction in instructions_for(&hostname, &token, &targets) {
            println!(
                "  {:<5} {} -> {}",
                instruction.record_type, instruction.host, instruction.value
            );
        }
    }

    Ok(())
}
