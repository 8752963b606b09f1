//! Command handlers module for the RAX login gateway.
//!
//! Translates protocol commands into calls on the validator and the access
//! guard, and their results into reply lines.

use log::{error, info};
use std::sync::Arc;

use crate::auth::{LoginOutcome, LoginResult, process_login};
use crate::client::Client;
use crate::error::handlers::{error_to_reply_code, handle_error};
use crate::messages::{self, login_form};
use crate::protocol::responses::{self, format_response};
use crate::protocol::{Command, CommandResult, CommandStatus};
use crate::server::GatewayContext;
use crate::session::{AccessRequest, Decision};

/// Dispatches a received command to its corresponding handler.
///
/// # Arguments
///
/// * `client` - Mutable reference to the client sending the command.
/// * `command` - Reference to the parsed command.
/// * `ctx` - Shared gateway state.
///
/// # Returns
///
/// * `CommandResult` - Result of the command execution, including status and reply.
pub async fn handle_command(
    client: &mut Client,
    command: &Command,
    ctx: &GatewayContext,
) -> CommandResult {
    match command {
        Command::LOGIN { username, password } => {
            handle_cmd_login(client, username.as_deref(), password.as_deref(), ctx).await
        }
        Command::CHECK { path, token } => handle_cmd_check(client, path, token.as_deref(), ctx).await,
        Command::FORM => handle_cmd_form(),
        Command::QUIT => handle_cmd_quit(),
        Command::UNKNOWN => handle_cmd_unknown(),
    }
}

/// Handles a login submission.
///
/// Rejections are replied with their fixed message; a store failure is
/// logged and replied with a generic message only.
async fn handle_cmd_login(
    client: &mut Client,
    username: Option<&str>,
    password: Option<&str>,
    ctx: &GatewayContext,
) -> CommandResult {
    let result = process_login(
        username.map(String::from),
        password.map(String::from),
        Arc::clone(&ctx.users),
        &ctx.sessions,
    )
    .await;

    match result {
        Ok(result) => login_reply(client, result),
        Err(err) => {
            handle_error(&err);
            let code = error_to_reply_code(&err);
            let text = if code == responses::SERVICE_UNAVAILABLE {
                messages::SERVICE_UNAVAILABLE
            } else {
                messages::INTERNAL_ERROR
            };
            failure(code, text)
        }
    }
}

/// Turns a finished login into its reply, logging the client in on success.
fn login_reply(client: &mut Client, result: LoginResult) -> CommandResult {
    match result.outcome {
        LoginOutcome::Authenticated(principal) => match result.session_token {
            Some(token) => {
                let reply = format_response(responses::SESSION_CREATED, &token);
                client.authenticate(principal.username, token);
                CommandResult {
                    status: CommandStatus::Success,
                    message: Some(reply),
                }
            }
            None => {
                error!("Login for {} succeeded without a session", principal.username);
                failure(responses::INTERNAL_ERROR, messages::INTERNAL_ERROR)
            }
        },
        LoginOutcome::MissingUsername => {
            failure(responses::BAD_SUBMISSION, messages::USERNAME_MISSING)
        }
        LoginOutcome::MissingPassword => {
            failure(responses::BAD_SUBMISSION, messages::PASSWORD_MISSING)
        }
        LoginOutcome::UnknownUser => failure(responses::AUTH_FAILED, messages::USERNAME_NOT_FOUND),
        LoginOutcome::InvalidPassword => {
            failure(responses::AUTH_FAILED, messages::PASSWORD_INCORRECT)
        }
    }
}

fn failure(code: u16, text: &str) -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure(text.into()),
        message: Some(format_response(code, text)),
    }
}

/// Handles an access check, falling back to the client's own session when
/// no token is supplied.
async fn handle_cmd_check(
    client: &Client,
    path: &str,
    token: Option<&str>,
    ctx: &GatewayContext,
) -> CommandResult {
    let request = AccessRequest {
        path,
        session_token: token.or(client.session_token()),
    };

    let decision = {
        let sessions = ctx.sessions.lock().await;
        ctx.guard.authorize(&request, &*sessions)
    };

    match decision {
        Decision::Admit => {
            info!("Admitted {} to {}", client.peer(), path);
            CommandResult {
                status: CommandStatus::Success,
                message: Some(format_response(responses::OK, "Access granted")),
            }
        }
        Decision::Deny {
            redirect_to,
            message,
        } => CommandResult {
            status: CommandStatus::Failure(message.into()),
            message: Some(format_response(
                responses::REDIRECT,
                &format!("{} {}", redirect_to, message),
            )),
        },
    }
}

/// Describes the login form as `subtitle|Label:kind|...|submit`.
fn handle_cmd_form() -> CommandResult {
    let form = login_form();
    let mut parts = vec![form.subtitle.to_string()];
    parts.extend(
        form.fields
            .iter()
            .map(|f| format!("{}:{}", f.label, f.kind.as_str())),
    );
    parts.push(form.submit_label.to_string());

    CommandResult {
        status: CommandStatus::Success,
        message: Some(format_response(responses::OK, &parts.join("|"))),
    }
}

fn handle_cmd_quit() -> CommandResult {
    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_response(responses::GOODBYE, "Goodbye")),
    }
}

fn handle_cmd_unknown() -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure("Unknown command".into()),
        message: Some(format_response(responses::UNKNOWN_COMMAND, "Unknown command")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Principal, UserStore, hash_password};
    use crate::config::GatewayConfig;
    use crate::error::StoreError;

    fn context() -> GatewayContext {
        let toml = format!(
            "[[users]]\nusername = \"zoe\"\npassword_hash = \"{}\"\n",
            hash_password("password").unwrap()
        );
        GatewayContext::from_config(&GatewayConfig::from_toml_str(&toml).unwrap())
    }

    fn login(username: Option<&str>, password: Option<&str>) -> Command {
        Command::LOGIN {
            username: username.map(String::from),
            password: password.map(String::from),
        }
    }

    fn check(path: &str) -> Command {
        Command::CHECK {
            path: path.into(),
            token: None,
        }
    }

    async fn reply(client: &mut Client, command: Command, ctx: &GatewayContext) -> String {
        handle_command(client, &command, ctx).await.message.unwrap()
    }

    #[tokio::test]
    async fn login_rejections_use_fixed_messages() {
        let ctx = context();
        let mut client = Client::new("test");

        assert_eq!(
            reply(&mut client, login(None, None), &ctx).await,
            "400 You must enter a username\r\n"
        );
        assert_eq!(
            reply(&mut client, login(Some("bielefeld"), Some("")), &ctx).await,
            "400 You must enter a password\r\n"
        );
        assert_eq!(
            reply(&mut client, login(Some("bielefeld"), Some("password")), &ctx).await,
            "401 Could not find a user with that username\r\n"
        );
        assert_eq!(
            reply(&mut client, login(Some("zoe"), Some("nope")), &ctx).await,
            "401 Incorrect password\r\n"
        );
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn login_then_check_admits() {
        let ctx = context();
        let mut client = Client::new("test");

        assert_eq!(
            reply(&mut client, check("/private"), &ctx).await,
            "302 /login You need to login to access this page\r\n"
        );

        let created = reply(&mut client, login(Some("zoe"), Some("password")), &ctx).await;
        assert!(created.starts_with("201 "));
        assert_eq!(
            created.trim_end().trim_start_matches("201 "),
            client.session_token().unwrap()
        );

        assert_eq!(
            reply(&mut client, check("/private"), &ctx).await,
            "200 Access granted\r\n"
        );
    }

    #[tokio::test]
    async fn token_from_another_connection_is_honoured() {
        let ctx = context();
        let mut first = Client::new("first");
        reply(&mut first, login(Some("zoe"), Some("password")), &ctx).await;
        let token = first.session_token().unwrap().to_string();

        let mut second = Client::new("second");
        let command = Command::CHECK {
            path: "/private".into(),
            token: Some(token),
        };
        assert_eq!(reply(&mut second, command, &ctx).await, "200 Access granted\r\n");
        assert!(!second.is_logged_in());
    }

    #[tokio::test]
    async fn form_describes_masked_password() {
        let ctx = context();
        let mut client = Client::new("test");
        assert_eq!(
            reply(&mut client, Command::FORM, &ctx).await,
            "200 You need to login to access this page|Username:text|Password:password|Login\r\n"
        );
    }

    struct DownStore;

    impl UserStore for DownStore {
        fn find_principal_by_username(&self, _: &str) -> Result<Option<Principal>, StoreError> {
            Err(StoreError::Unavailable("db01 refused connection".into()))
        }
    }

    #[tokio::test]
    async fn store_failure_does_not_leak_details() {
        let config = GatewayConfig::from_toml_str("").unwrap();
        let ctx = GatewayContext::new(Arc::new(DownStore), &config);
        let mut client = Client::new("test");

        let reply = reply(&mut client, login(Some("zoe"), Some("password")), &ctx).await;
        assert_eq!(reply, "503 Service temporarily unavailable\r\n");
        assert!(!reply.contains("db01"));
    }

    #[tokio::test]
    async fn quit_closes_the_connection() {
        let ctx = context();
        let mut client = Client::new("test");
        let result = handle_command(&mut client, &Command::QUIT, &ctx).await;
        assert_eq!(result.status, CommandStatus::CloseConnection);
    }

    #[test]
    fn login_without_a_session_is_an_internal_error() {
        let mut client = Client::new("test");
        let result = LoginResult {
            outcome: LoginOutcome::Authenticated(Principal {
                username: "zoe".into(),
                password_hash: String::new(),
            }),
            session_token: None,
        };

        let reply = login_reply(&mut client, result);
        assert_eq!(reply.message.as_deref(), Some("500 Internal error\r\n"));
        assert!(!client.is_logged_in());
    }
}
