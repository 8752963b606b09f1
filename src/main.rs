//! RAX Login Gateway - Entry Point
//!
//! Validates logins and guards protected paths for a web front end.
//!
//! Usage:
//!   rax-login-gateway [CONFIG]              serve (CONFIG must exist if given;
//!                                           otherwise `config` is read if present)
//!   rax-login-gateway hash-password <PASS>  print a verifier for `[[users]]`

use log::info;
use std::process::ExitCode;

use rax_login_gateway::Server;
use rax_login_gateway::auth::hash_password;
use rax_login_gateway::config::GatewayConfig;
use rax_login_gateway::error::GatewayError;
use rax_login_gateway::error::handlers::handle_error;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.first().map(String::as_str) == Some("hash-password") {
        return match args.get(1) {
            Some(password) => match hash_password(password) {
                Ok(phc) => {
                    println!("{}", phc);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    handle_error(&GatewayError::from(e));
                    ExitCode::FAILURE
                }
            },
            None => {
                eprintln!("usage: rax-login-gateway hash-password <password>");
                ExitCode::FAILURE
            }
        };
    }

    let config = match GatewayConfig::load(args.first().map(String::as_str)) {
        Ok(config) => config,
        Err(e) => {
            handle_error(&GatewayError::from(e));
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Launching login gateway with {} registered users...",
        config.users.len()
    );

    let server = match Server::bind(&config).await {
        Ok(server) => server,
        Err(e) => {
            handle_error(&e);
            return ExitCode::FAILURE;
        }
    };
    server.start().await;

    ExitCode::SUCCESS
}
