//! Command-line entry point.
//!
//! # Responsibility
//! - Load configuration and start logging before any command runs.
//! - Drive the route API against a fresh in-memory store.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use log::info;
use memberbase_api::{ApiResponse, MemberbaseApi};
use memberbase_core::CoreConfig;
use serde_json::json;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match CoreConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => CoreConfig::default(),
    }
    .with_env_overrides()
    .with_overrides(cli.log_level.clone(), cli.log_dir.clone());

    if let Err(err) = config.init_logging() {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    match cli.command {
        Commands::Ping => {
            println!("memberbase_core ping={}", memberbase_core::ping());
            ExitCode::SUCCESS
        }
        Commands::Version => {
            println!("memberbase_core version={}", memberbase_core::core_version());
            ExitCode::SUCCESS
        }
        Commands::Demo => run_demo(),
    }
}

/// Two users, `u1` follows `u2`, `u2` is deleted, `u1` is read back.
fn run_demo() -> ExitCode {
    let api = match MemberbaseApi::open_in_memory() {
        Ok(api) => api,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!("event=demo_start module=cli status=ok");

    let u1 = api.users_create(json!({
        "firstName": "Una",
        "lastName": "One",
        "email": "u1@example.com",
    }));
    let u2 = api.users_create(json!({
        "firstName": "Duo",
        "lastName": "Two",
        "email": "u2@example.com",
    }));
    let (Some(u1_id), Some(u2_id)) = (record_id(&u1), record_id(&u2)) else {
        print_step("create", &u1);
        print_step("create", &u2);
        return ExitCode::FAILURE;
    };

    let steps = [
        ("create u1", u1.clone()),
        ("create u2", u2.clone()),
        (
            "u1 subscribeTo u2",
            api.users_subscribe_to(&u1_id, json!({ "userId": u2_id })),
        ),
        ("delete u2", api.users_delete(&u2_id)),
        ("get u1", api.users_get(&u1_id)),
        ("get u2", api.users_get(&u2_id)),
    ];

    for (label, response) in &steps {
        print_step(label, response);
    }

    // Reading the deleted user back is the only step expected to fail.
    let ok = steps[..5].iter().all(|(_, response)| response.is_success())
        && steps[5].1.status == 404;
    info!(
        "event=demo_finish module=cli status={}",
        if ok { "ok" } else { "error" }
    );
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn record_id(response: &ApiResponse) -> Option<String> {
    response.body["id"].as_str().map(str::to_owned)
}

fn print_step(label: &str, response: &ApiResponse) {
    let rendered = json!({
        "step": label,
        "status": response.status,
        "body": response.body,
    });
    println!("{rendered}");
}
