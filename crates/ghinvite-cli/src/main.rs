#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Context;
use clap::Parser;
use ghinvite_core::dispatch::{invite_collaborator, CollaboratorRequest};
use ghinvite_core::http::SlackClient;
use ghinvite_core::logging::{init_logging, LogFormat};
use ghinvite_core::step::run_step;
use ghinvite_core::username::extract_with_source;
use ghinvite_core::{
    dispatch, InvitationConfig, InvitationOutcome, InvitationRequest, NoDirectory, Permission,
    ReactionEvent, ReactionWorkflow, SlackConfig,
};
use std::collections::HashMap;
use std::io::{Read, Write};

/// Exit code for a well-formed failure outcome or an empty extraction
const EXIT_FAILURE_OUTCOME: i32 = 2;

#[derive(Parser)]
#[command(
    name = "ghinvite",
    version,
    about = "Invite GitHub users named in chat messages"
)]
struct Cli {
    /// Output format: text or json
    #[arg(long, global = true, env = "GHINVITE_OUTPUT_FORMAT")]
    output_format: Option<String>,

    /// Log format: pretty or json
    #[arg(long, global = true, env = "GHINVITE_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Extract a GitHub username from a message
    Extract(ExtractArgs),
    /// Invite a user to the configured organization
    Invite(InviteArgs),
    /// Invite a user as a repository collaborator
    InviteRepo(InviteRepoArgs),
    /// Run a workflow step: JSON inputs on stdin, JSON outputs on stdout
    Step(StepArgs),
    /// Handle one reaction on a chat message end to end
    Reaction(ReactionArgs),
}

#[derive(clap::Args)]
struct GitHubArgs {
    /// GitHub token for API access
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Organization to invite into
    #[arg(long, env = "GITHUB_ORG")]
    org: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,
}

impl GitHubArgs {
    fn config(&self) -> InvitationConfig {
        let config = InvitationConfig::new(
            clean_opt(&self.token).map(str::to_string),
            clean_opt(&self.org).map(str::to_string),
        );
        match clean_opt(&self.api_url) {
            Some(url) => config.with_api_url(url),
            None => config,
        }
    }
}

#[derive(clap::Args)]
struct SlackArgs {
    /// Slack bot token, used to look up the inviter's name
    #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true)]
    slack_token: Option<String>,

    /// Slack Web API base URL
    #[arg(long, env = "SLACK_API_URL")]
    slack_api_url: Option<String>,
}

impl SlackArgs {
    fn config(&self) -> SlackConfig {
        let config = SlackConfig::new(clean_opt(&self.slack_token).map(str::to_string));
        match clean_opt(&self.slack_api_url) {
            Some(url) => config.with_api_url(url),
            None => config,
        }
    }
}

#[derive(clap::Args)]
struct ExtractArgs {
    /// Message text (read from stdin when omitted)
    #[arg(long)]
    message: Option<String>,
}

#[derive(clap::Args)]
struct InviteArgs {
    /// GitHub username to invite
    #[arg(long)]
    username: String,

    /// Chat user id of the person sending the invitation
    #[arg(long)]
    inviter: Option<String>,

    #[command(flatten)]
    github: GitHubArgs,

    #[command(flatten)]
    slack: SlackArgs,
}

#[derive(clap::Args)]
struct InviteRepoArgs {
    /// GitHub username to invite
    #[arg(long)]
    username: String,

    /// Repository as owner/repo
    #[arg(long)]
    repository: String,

    /// Permission level: read, write, or admin
    #[arg(long, default_value = "read")]
    permission: String,

    #[command(flatten)]
    github: GitHubArgs,
}

#[derive(clap::Args)]
struct StepArgs {
    /// Function callback id (e.g. extract_github_username_function)
    callback_id: String,
}

#[derive(clap::Args)]
struct ReactionArgs {
    /// User who added the reaction
    #[arg(long)]
    user: String,

    /// Channel of the reacted message
    #[arg(long)]
    channel: String,

    /// Timestamp of the reacted message
    #[arg(long)]
    ts: String,

    /// Reaction that was added
    #[arg(long, default_value = "")]
    reaction: String,

    /// Only act on this reaction
    #[arg(long, env = "GHINVITE_TRIGGER_REACTION")]
    trigger_reaction: Option<String>,

    #[command(flatten)]
    github: GitHubArgs,

    #[command(flatten)]
    slack: SlackArgs,
}

/// Output format for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// Full JSON to stdout
    Json,
    /// Human-readable text to stdout
    Text,
}

impl OutputFormat {
    fn detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_format = cli.log_format.parse().unwrap_or_else(|e| {
        eprintln!("Warning: {e}, using pretty logs");
        LogFormat::Pretty
    });
    init_logging(log_format);

    let output_format = OutputFormat::detect(clean_opt(&cli.output_format));
    let code = match run(cli.command, output_format) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    };
    std::process::exit(code);
}

/// Filter empty string from Option (env vars may produce "" for empty values)
fn clean_opt(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

fn run(command: Commands, format: OutputFormat) -> anyhow::Result<i32> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;

    rt.block_on(async {
        match command {
            Commands::Extract(args) => run_extract(&args, format),
            Commands::Invite(args) => run_invite(args, format).await,
            Commands::InviteRepo(args) => run_invite_repo(args, format).await,
            Commands::Step(args) => run_step_command(args).await,
            Commands::Reaction(args) => run_reaction(args, format).await,
        }
    })
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

fn run_extract(args: &ExtractArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let text = match &args.message {
        Some(message) => message.clone(),
        None => {
            let mut buf = read_stdin()?;
            let trimmed = buf.trim_end_matches(['\n', '\r']).len();
            buf.truncate(trimmed);
            buf
        }
    };

    let found = extract_with_source(&text);
    let username = found.map_or("", |f| f.username);
    let source = found.map(|f| f.source.as_str());

    let stdout = std::io::stdout();
    let mut w = stdout.lock();
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "github_username": username,
                "source": source,
            });
            serde_json::to_writer(&mut w, &output)?;
            writeln!(w)?;
        }
        OutputFormat::Text => {
            if username.is_empty() {
                eprintln!("No GitHub username found");
            } else {
                writeln!(w, "{username}")?;
            }
        }
    }

    Ok(if username.is_empty() {
        EXIT_FAILURE_OUTCOME
    } else {
        0
    })
}

async fn run_invite(args: InviteArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let config = args.github.config();
    let slack = args.slack.config();

    let mut request = InvitationRequest::new(args.username.as_str());
    if let Some(inviter) = clean_opt(&args.inviter) {
        request = request.with_inviter(inviter);
    }

    let outcome = if slack.bot_token.is_some() {
        let directory = SlackClient::from_config(&slack);
        dispatch(&request, &config, &directory).await
    } else {
        dispatch(&request, &config, &NoDirectory).await
    };

    write_outcome(&outcome, format)
}

async fn run_invite_repo(args: InviteRepoArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let permission: Permission = args.permission.parse()?;
    let request = CollaboratorRequest {
        username: args.username,
        repository: args.repository,
        permission,
    };

    let outcome = invite_collaborator(&request, &args.github.config()).await;
    write_outcome(&outcome, format)
}

async fn run_step_command(args: StepArgs) -> anyhow::Result<i32> {
    let raw = read_stdin()?;
    let inputs: serde_json::Value = if raw.trim().is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_str(&raw).context("step inputs must be a JSON object")?
    };

    let env: HashMap<String, String> = std::env::vars().collect();
    let outputs = run_step(&args.callback_id, inputs, &env).await?;

    let stdout = std::io::stdout();
    let mut w = stdout.lock();
    serde_json::to_writer(&mut w, &outputs)?;
    writeln!(w)?;

    Ok(step_exit_code(&outputs))
}

/// Exit code for a step's outputs: a failed outcome or empty username is 2
fn step_exit_code(outputs: &serde_json::Value) -> i32 {
    let failed = outputs.get("success").and_then(serde_json::Value::as_bool) == Some(false);
    let empty = outputs.get("github_username").and_then(serde_json::Value::as_str) == Some("");
    if failed || empty {
        EXIT_FAILURE_OUTCOME
    } else {
        0
    }
}

async fn run_reaction(args: ReactionArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let config = args.github.config();
    let slack = SlackClient::from_config(&args.slack.config());

    let event = ReactionEvent {
        user_id: args.user,
        channel_id: args.channel,
        message_ts: args.ts,
        reaction: args.reaction,
    };

    let mut workflow = ReactionWorkflow::new(&slack, &config);
    if let Some(trigger) = clean_opt(&args.trigger_reaction) {
        workflow = workflow.with_trigger_reaction(trigger);
    }

    match workflow.handle(&event).await? {
        Some(outcome) => write_outcome(&outcome, format),
        None => {
            tracing::info!(reaction = %event.reaction, "reaction does not trigger an invitation");
            Ok(0)
        }
    }
}

fn write_outcome(outcome: &InvitationOutcome, format: OutputFormat) -> anyhow::Result<i32> {
    let stdout = std::io::stdout();
    let mut w = stdout.lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut w, outcome)?;
            writeln!(w)?;
        }
        OutputFormat::Text => writeln!(w, "{}", outcome.message)?,
    }

    Ok(if outcome.success {
        0
    } else {
        EXIT_FAILURE_OUTCOME
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_clean_opt_drops_empty_values() {
        assert_eq!(clean_opt(&Some(String::new())), None);
        assert_eq!(clean_opt(&None), None);
        assert_eq!(clean_opt(&Some("testorg".into())), Some("testorg"));
    }

    #[test]
    fn test_output_format_detect() {
        assert_eq!(OutputFormat::detect(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::detect(Some("text")), OutputFormat::Text);
        assert_eq!(OutputFormat::detect(None), OutputFormat::Text);
    }

    #[test]
    fn test_step_exit_code() {
        assert_eq!(step_exit_code(&serde_json::json!({ "github_username": "octocat" })), 0);
        assert_eq!(step_exit_code(&serde_json::json!({ "github_username": "" })), 2);
        assert_eq!(
            step_exit_code(&serde_json::json!({ "success": true, "message": "ok" })),
            0
        );
        assert_eq!(
            step_exit_code(&serde_json::json!({ "success": false, "message": "no" })),
            2
        );
    }

    #[test]
    fn test_invite_subcommand_parses() {
        let cli = Cli::try_parse_from([
            "ghinvite",
            "--output-format",
            "json",
            "invite",
            "--username",
            "octocat",
            "--inviter",
            "U12345678",
            "--org",
            "testorg",
        ])
        .unwrap();

        assert_eq!(cli.output_format.as_deref(), Some("json"));
        match cli.command {
            Commands::Invite(args) => {
                assert_eq!(args.username, "octocat");
                assert_eq!(args.inviter.as_deref(), Some("U12345678"));
                assert_eq!(args.github.org.as_deref(), Some("testorg"));
            }
            _ => panic!("expected invite"),
        }
    }
}
