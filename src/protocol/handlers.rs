//! Module `handlers`
//!
//! One handler per [`Command`] variant. Handlers mutate the session, talk to
//! storage and transfer, and return the final reply. Transfer commands write
//! their preliminary `150` themselves, just before dialing.

use log::{info, warn};
use std::io;
use tokio::io::AsyncWrite;

use crate::auth::validate_password;
use crate::client::session::SessionContext;
use crate::client::state::Session;
use crate::error::{FtpServerError, NavigateError, StorageError, error_to_reply, handle_error};
use crate::navigate::change_directory;
use crate::protocol::commands::{Command, CommandStatus};
use crate::protocol::responses::{self, Reply, send_reply};
use crate::storage::{list_directory, prepare_file_retrieval, render_listing};
use crate::transfer::{TransferType, parse_port_argument, retrieve_file, transmit_listing};

/// Outcome of one command: how the session proceeds and what to send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub reply: Reply,
}

impl CommandResult {
    fn success(code: u16, text: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Success,
            reply: Reply::new(code, text),
        }
    }

    fn close(code: u16, text: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::CloseConnection,
            reply: Reply::new(code, text),
        }
    }

    fn failure(code: u16, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            status: CommandStatus::Failure(text.clone()),
            reply: Reply::new(code, text),
        }
    }

    fn from_error(err: impl Into<FtpServerError>) -> Self {
        let err = err.into();
        match &err {
            FtpServerError::Transfer(_) => handle_error(&err),
            _ => warn!("Command failed: {}", err),
        }
        let reply = error_to_reply(&err);
        Self {
            status: CommandStatus::Failure(err.to_string()),
            reply,
        }
    }
}

/// Dispatches `command` against `session`.
///
/// `control` is the control-connection writer; only LIST and RETR use it,
/// for their preliminary reply. An `Err` means the control connection itself
/// failed and the session must end.
pub async fn handle_command<W>(
    session: &mut Session,
    ctx: &SessionContext,
    command: &Command,
    control: &mut W,
) -> io::Result<CommandResult>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let result = match command {
        Command::USER(arg) => handle_cmd_user(session, ctx, arg.as_deref()),
        Command::PASS(arg) => handle_cmd_pass(session, ctx, arg.as_deref()),
        Command::PWD => handle_cmd_pwd(session),
        Command::SYST => handle_cmd_syst(ctx),
        Command::TYPE(arg) => handle_cmd_type(session, arg.as_deref()),
        Command::PORT(arg) => handle_cmd_port(session, arg.as_deref()),
        Command::LIST(arg) => handle_cmd_list(session, ctx, arg.as_deref(), control).await?,
        Command::RETR(arg) => handle_cmd_retr(session, ctx, arg.as_deref(), control).await?,
        Command::CWD(arg) => handle_cmd_cwd(session, ctx, arg.as_deref()),
        Command::CDUP => handle_cmd_cwd(session, ctx, Some("..")),
        Command::NOOP => CommandResult::success(responses::OK, "OK"),
        Command::QUIT => CommandResult::close(responses::CLOSING, "Goodbye"),
        Command::UNKNOWN(verb) => handle_cmd_unknown(verb),
    };
    Ok(result)
}

fn handle_cmd_user(session: &mut Session, ctx: &SessionContext, arg: Option<&str>) -> CommandResult {
    let require_auth = ctx.config().require_auth;
    session.begin_login(arg.map(str::to_string), require_auth);

    if require_auth {
        CommandResult::success(responses::PASSWORD_REQUIRED, "Username ok, need password")
    } else {
        info!("User {:?} logged in without password", session.username());
        CommandResult::success(responses::LOGIN_SUCCESS, "User logged in")
    }
}

fn handle_cmd_pass(session: &mut Session, ctx: &SessionContext, arg: Option<&str>) -> CommandResult {
    let password = arg.unwrap_or_default();
    match validate_password(ctx.credentials(), session.username(), password) {
        Ok(()) => {
            session.complete_login();
            info!("User {:?} logged in", session.username());
            CommandResult::success(responses::LOGIN_SUCCESS, "User logged in")
        }
        Err(e) => CommandResult::from_error(e),
    }
}

fn handle_cmd_pwd(session: &Session) -> CommandResult {
    let trimmed = session.current_virtual_path().trim_end_matches('/');
    CommandResult::success(
        responses::PATHNAME_CREATED,
        format!("\"{}/\" is current directory", trimmed),
    )
}

fn handle_cmd_syst(ctx: &SessionContext) -> CommandResult {
    let config = ctx.config();
    if config.allow_syst {
        CommandResult::success(responses::SYSTEM_TYPE, config.system_type.clone())
    } else {
        CommandResult::failure(responses::NOT_IMPLEMENTED_SUPERFLUOUS, "Command not implemented")
    }
}

fn handle_cmd_type(session: &mut Session, arg: Option<&str>) -> CommandResult {
    match TransferType::from_type_code(arg) {
        Ok(transfer_type) => {
            session.set_transfer_type(transfer_type);
            CommandResult::success(responses::OK, "OK")
        }
        Err(e) => CommandResult::from_error(e),
    }
}

fn handle_cmd_port(session: &mut Session, arg: Option<&str>) -> CommandResult {
    match parse_port_argument(arg) {
        Ok(endpoint) => {
            info!("Active mode endpoint set to {}", endpoint);
            session.set_active_endpoint(endpoint);
            CommandResult::success(responses::OK, "OK")
        }
        Err(e) => CommandResult::from_error(e),
    }
}

async fn handle_cmd_list<W>(
    session: &mut Session,
    ctx: &SessionContext,
    arg: Option<&str>,
    control: &mut W,
) -> io::Result<CommandResult>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let root = ctx.server_root().to_path_buf();
    let cwd = session.current_virtual_path().to_string();
    let argument = arg.map(str::to_string);

    let entries = tokio::task::spawn_blocking(move || {
        list_directory(&root, &cwd, argument.as_deref())
    })
    .await
    .map_err(|e| StorageError::Io(io::Error::other(e)))
    .and_then(|listed| listed);

    let entries = match entries {
        Ok(entries) => entries,
        Err(e) => return Ok(CommandResult::from_error(e)),
    };

    let Some(endpoint) = session.take_data_endpoint() else {
        info!("LIST without data connection; {} entries not sent", entries.len());
        return Ok(CommandResult::success(responses::TRANSFER_COMPLETE, "Transfer complete"));
    };

    send_reply(control, &preliminary_reply()).await?;

    let listing = render_listing(&entries);
    match transmit_listing(endpoint, &listing, ctx.connect_timeout()).await {
        Ok(_) => Ok(CommandResult::success(responses::TRANSFER_COMPLETE, "Transfer complete")),
        Err(e) => Ok(CommandResult::from_error(e)),
    }
}

async fn handle_cmd_retr<W>(
    session: &mut Session,
    ctx: &SessionContext,
    arg: Option<&str>,
    control: &mut W,
) -> io::Result<CommandResult>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let filename = arg.unwrap_or_default();
    let path = match prepare_file_retrieval(ctx.server_root(), session.current_virtual_path(), filename) {
        Ok(path) => path,
        Err(e) => return Ok(CommandResult::from_error(e)),
    };

    send_reply(control, &preliminary_reply()).await?;

    match session.take_data_endpoint() {
        Some(endpoint) => {
            let transfer_type = session.transfer_type();
            if let Err(e) = retrieve_file(endpoint, &path, transfer_type, ctx.connect_timeout()).await {
                return Ok(CommandResult::from_error(e));
            }
        }
        None => warn!("RETR {} without data connection; nothing sent", filename),
    }

    Ok(CommandResult::success(
        responses::TRANSFER_COMPLETE,
        "Closing data connection. Requested file action successful",
    ))
}

fn handle_cmd_cwd(session: &mut Session, ctx: &SessionContext, arg: Option<&str>) -> CommandResult {
    let Some(target) = arg.filter(|target| !target.is_empty()) else {
        return CommandResult::from_error(NavigateError::EmptyPath);
    };

    match change_directory(ctx.server_root(), session.current_virtual_path(), target) {
        Ok(new_path) => {
            session.set_current_virtual_path(new_path);
            CommandResult::success(responses::FILE_ACTION_OK, "Requested file action okay, completed")
        }
        Err(e) => CommandResult::from_error(e),
    }
}

fn handle_cmd_unknown(verb: &str) -> CommandResult {
    info!("Unrecognized command verb {:?}", verb);
    CommandResult::failure(responses::NOT_IMPLEMENTED_SUPERFLUOUS, "Command not implemented")
}

fn preliminary_reply() -> Reply {
    Reply::new(
        responses::FILE_STATUS_OK,
        "File status okay; about to open data connection",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, UserEntry};
    use std::fs;

    fn context(require_auth: bool) -> (tempfile::TempDir, SessionContext) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.txt"), b"hello world").unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();

        let config = ServerConfig {
            server_root: dir.path().to_string_lossy().into_owned(),
            require_auth,
            users: vec![UserEntry {
                username: "alice".into(),
                password: "secret".into(),
            }],
            ..ServerConfig::default()
        };
        let ctx = SessionContext::new(config).unwrap();
        (dir, ctx)
    }

    async fn run(session: &mut Session, ctx: &SessionContext, line: &str) -> (CommandResult, Vec<u8>) {
        let command = crate::protocol::parse_command(line).unwrap();
        let mut control = Vec::new();
        let result = handle_command(session, ctx, &command, &mut control).await.unwrap();
        (result, control)
    }

    #[tokio::test]
    async fn login_flow() {
        let (_dir, ctx) = context(true);
        let mut session = Session::default();

        let (result, _) = run(&mut session, &ctx, "USER alice").await;
        assert_eq!(result.reply.code(), 331);
        let (result, _) = run(&mut session, &ctx, "PASS secret").await;
        assert_eq!(result.reply.code(), 230);
        assert!(session.is_logged_in());
    }

    #[tokio::test]
    async fn auth_failures_are_indistinguishable() {
        let (_dir, ctx) = context(true);

        let mut unknown = Session::default();
        run(&mut unknown, &ctx, "USER mallory").await;
        let (unknown_user, _) = run(&mut unknown, &ctx, "PASS secret").await;

        let mut wrong = Session::default();
        run(&mut wrong, &ctx, "USER alice").await;
        let (wrong_password, _) = run(&mut wrong, &ctx, "PASS nope").await;

        assert_eq!(unknown_user.reply.to_wire(), wrong_password.reply.to_wire());
        assert_eq!(unknown_user.reply.code(), 430);
        assert!(!wrong.is_logged_in());
    }

    #[tokio::test]
    async fn pass_without_user_is_rejected() {
        let (_dir, ctx) = context(true);
        let mut session = Session::default();
        let (result, _) = run(&mut session, &ctx, "PASS secret").await;
        assert_eq!(result.reply.code(), 430);
    }

    #[tokio::test]
    async fn user_without_auth_requirement() {
        let (_dir, ctx) = context(false);
        let mut session = Session::default();
        let (result, _) = run(&mut session, &ctx, "USER anyone").await;
        assert_eq!(result.reply.code(), 230);
        assert!(session.is_logged_in());
    }

    #[tokio::test]
    async fn type_and_port_settings() {
        let (_dir, ctx) = context(true);
        let mut session = Session::default();

        let (result, _) = run(&mut session, &ctx, "TYPE A").await;
        assert_eq!(result.reply.to_wire(), "200 OK\r\n");
        assert_eq!(session.transfer_type(), TransferType::Text);

        let (result, _) = run(&mut session, &ctx, "TYPE E").await;
        assert_eq!(result.reply.code(), 504);
        assert_eq!(session.transfer_type(), TransferType::Text);

        let (result, _) = run(&mut session, &ctx, "PORT 127,0,0,1,31,64").await;
        assert_eq!(result.reply.to_wire(), "200 OK\r\n");

        let (result, _) = run(&mut session, &ctx, "PORT 127,0,0,1,31").await;
        assert_eq!(result.reply.code(), 501);
        assert_eq!(
            session.take_data_endpoint(),
            Some("127.0.0.1:8000".parse().unwrap())
        );
    }

    #[tokio::test]
    async fn retr_rejections_happen_before_preliminary_reply() {
        let (_dir, ctx) = context(true);
        let mut session = Session::default();

        for (line, code) in [
            ("RETR", 501),
            ("RETR nofile.txt", 550),
            ("RETR ../readme.txt", 550),
            ("RETR docs", 550),
        ] {
            let (result, control) = run(&mut session, &ctx, line).await;
            assert_eq!(result.reply.code(), code, "{}", line);
            assert!(control.is_empty(), "{}", line);
        }
    }

    #[tokio::test]
    async fn list_without_port_completes_without_preliminary() {
        let (_dir, ctx) = context(true);
        let mut session = Session::default();
        let (result, control) = run(&mut session, &ctx, "LIST").await;
        assert_eq!(result.reply.to_wire(), "226 Transfer complete\r\n");
        assert!(control.is_empty());

        let (result, _) = run(&mut session, &ctx, "LIST missing").await;
        assert_eq!(result.reply.code(), 550);
    }

    #[tokio::test]
    async fn cwd_pwd_and_cdup() {
        let (_dir, ctx) = context(true);
        let mut session = Session::default();

        let (result, _) = run(&mut session, &ctx, "PWD").await;
        assert_eq!(result.reply.to_wire(), "257 \"/\" is current directory\r\n");

        let (result, _) = run(&mut session, &ctx, "CWD docs").await;
        assert_eq!(result.reply.code(), 250);
        let (result, _) = run(&mut session, &ctx, "PWD").await;
        assert_eq!(result.reply.text(), "\"/docs/\" is current directory");

        let (result, _) = run(&mut session, &ctx, "CWD readme.txt").await;
        assert_eq!(result.reply.code(), 550);
        let (result, _) = run(&mut session, &ctx, "CWD").await;
        assert_eq!(result.reply.code(), 501);

        run(&mut session, &ctx, "CDUP").await;
        assert_eq!(session.current_virtual_path(), "/");
    }

    #[tokio::test]
    async fn misc_commands() {
        let (_dir, ctx) = context(true);
        let mut session = Session::default();

        let (result, _) = run(&mut session, &ctx, "SYST").await;
        assert_eq!(result.reply.to_wire(), "215 Windows_NT\r\n");
        let (result, _) = run(&mut session, &ctx, "NOOP").await;
        assert_eq!(result.reply.code(), 200);
        let (result, _) = run(&mut session, &ctx, "FEAT").await;
        assert_eq!(result.reply.to_wire(), "202 Command not implemented\r\n");
        let (result, _) = run(&mut session, &ctx, "QUIT").await;
        assert_eq!(result.status, CommandStatus::CloseConnection);
        assert_eq!(result.reply.code(), 221);
    }
}
