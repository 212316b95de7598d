//! Operational tooling for the deletion engine.
//!
//! `bazari-ops scan <user-id> [--json]` — read-only blocking-reference report
//! `bazari-ops delete-user <user-id>` — full user cascade
//! `bazari-ops delete-product <product-id>` — product cascade

use anyhow::{bail, Context};
use bazari::cascade;
use bazari::db::{get_db_pool, init_db};
use env_logger::Env;

#[actix_rt::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, id) = match args.as_slice() {
        [command, id, ..] => (command.as_str(), id.as_str()),
        _ => bail!("usage: bazari-ops <scan|delete-user|delete-product> <id> [--json]"),
    };
    let id: i32 = id.parse().with_context(|| format!("invalid id '{}'", id))?;

    init_db(std::env::var("DATABASE_URL").expect("DATABASE_URL must be set.")).await;
    let db = get_db_pool();

    match command {
        "scan" => {
            let report = cascade::scan_blocking_references(db, id).await?;
            if args.iter().any(|a| a == "--json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.is_empty() {
                println!("user {}: no blocking references", id);
            } else {
                for (key, count) in report.iter() {
                    println!("{}: {}", key, count);
                }
            }
        }
        "delete-user" => {
            cascade::delete_user_safely(db, id).await?;
            println!("user {} deleted", id);
        }
        "delete-product" => {
            cascade::delete_product_safely(db, id).await?;
            println!("product {} deleted", id);
        }
        other => bail!("unknown command '{}'", other),
    }
    Ok(())
}
