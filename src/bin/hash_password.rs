//! Prints a bcrypt hash for seeding accounts by hand.
//!
//! Usage: `hash-password <password>` (cost taken from `BCRYPT_COST`).

use anyhow::{Result, bail};

use cortico_expense::Config;
use cortico_expense::services::auth::hash_password;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let Some(password) = std::env::args().nth(1) else {
        bail!("usage: hash-password <password>");
    };

    let config = Config::from_env_only()?;
    log::debug!("Hashing with cost {}", config.bcrypt_cost);
    println!("{}", hash_password(&password, config.bcrypt_cost)?);

    Ok(())
}
