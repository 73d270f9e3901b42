//! explain-changes entry point.
//!
//! Runs the MCP server by default; the other subcommands render offline,
//! pick up the panel handoff, and carry out panel messages.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use explain_changes::application::explain::{decode_prompt, render_document, validate_request};
use explain_changes::application::host::{ExplanationHost, HostSettings};
use explain_changes::application::panel::{PanelOutcome, dispatch_panel_message};
use explain_changes::domain::{DiffLayout, Editor, ExplainRequest, PanelMessage};
use explain_changes::infra::app_config::{Delivery, config_path, load_config, save_config};
use explain_changes::infra::handoff::{save_pending, take_pending};
use explain_changes::infra::mcp::{ServerConfig, run_explain_mcp_server};
use explain_changes::templates;

#[derive(Parser, Debug)]
#[command(name = "explain-changes")]
#[command(version)]
#[command(about = "Render annotated diff explanations for AI assistants", long_about = None)]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Default, Clone)]
struct ServeArgs {
    /// Where explanations go: browser or panel
    #[arg(long)]
    delivery: Option<Delivery>,

    /// Directory rendered pages are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Never open the browser
    #[arg(long)]
    no_open: bool,

    /// Append server logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Editor assumed when a request says auto
    #[arg(long)]
    editor: Option<Editor>,

    /// Layout pages open in (side-by-side or line-by-line)
    #[arg(long)]
    layout: Option<DiffLayout>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server on stdio (default)
    Serve(ServeArgs),

    /// Render an explanation page without the MCP server
    Render {
        /// Tool arguments as JSON (title, diff, annotations, ...)
        #[arg(long)]
        request: Option<PathBuf>,

        /// Diff file; read from stdin when omitted
        #[arg(long)]
        diff: Option<PathBuf>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        summary: Option<String>,

        #[arg(long)]
        editor: Option<Editor>,

        #[arg(long)]
        layout: Option<DiffLayout>,

        /// Output file; printed to stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Open the written page in the browser
        #[arg(long, requires = "out")]
        open: bool,
    },

    /// Render the explanation handed off to the panel and open it
    OpenPending {
        /// Only take explanations meant for this workspace
        #[arg(long)]
        workspace: Option<PathBuf>,
    },

    /// Carry out one message posted by a rendered page
    Dispatch {
        /// Message JSON, e.g. {"command":"openFile","file":"src/a.rs","line":3}
        message: String,

        /// executeAction prompt is an encoded data-prompt payload
        #[arg(long)]
        encoded: bool,

        #[arg(long, default_value = "auto")]
        editor: Editor,

        /// Workspace relative paths are resolved against
        #[arg(long)]
        workspace: Option<PathBuf>,
    },

    /// Show or change the saved defaults
    Config {
        #[arg(long)]
        editor: Option<Editor>,

        #[arg(long)]
        layout: Option<DiffLayout>,

        #[arg(long)]
        delivery: Option<Delivery>,

        /// Open written pages in the browser
        #[arg(long)]
        open_browser: Option<bool>,

        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Print the assistant instructions
    Prompt {
        /// Instructions for the editor panel flow
        #[arg(long)]
        panel: bool,
    },
}

impl ServeArgs {
    fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig::from_env();
        config.delivery = self.delivery.or(config.delivery);
        config.output_dir = self.output_dir.or(config.output_dir);
        config.no_open |= self.no_open;
        config.log_file = self.log_file.or(config.log_file);
        config.editor = self.editor.or(config.editor);
        config.layout = self.layout.or(config.layout);
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => serve(cli.serve).await,
        Some(Commands::Serve(args)) => serve(args).await,
        Some(Commands::Render {
            request,
            diff,
            title,
            summary,
            editor,
            layout,
            out,
            open,
        }) => {
            let mut req = match request {
                Some(path) => read_request(&path)?,
                None => ExplainRequest::default(),
            };
            if let Some(path) = diff {
                req.diff = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read diff from {}", path.display()))?;
            } else if req.diff.is_empty()
                && let Some(stdin) = try_read_stdin()?
            {
                req.diff = stdin;
            }
            if let Some(title) = title {
                req.title = title;
            }
            if req.title.is_empty() {
                req.title = "Diff explanation".to_string();
            }
            req.summary = summary.or(req.summary);
            req.editor = editor.unwrap_or(req.editor);

            let layout = layout.unwrap_or_else(|| load_config().layout);
            render_to(&req, layout, out.as_deref(), open)
        }
        Some(Commands::OpenPending { workspace }) => open_pending(workspace.as_deref()),
        Some(Commands::Dispatch {
            message,
            encoded,
            editor,
            workspace,
        }) => {
            let mut message: PanelMessage =
                serde_json::from_str(&message).context("Failed to parse panel message")?;
            if encoded && let PanelMessage::ExecuteAction { prompt } = &mut message {
                *prompt = decode_prompt(prompt).context("Failed to decode action payload")?;
            }
            let outcome = dispatch_panel_message(message, editor, workspace.as_deref())?;
            match outcome {
                PanelOutcome::OpenedFile(path) => println!("Opened {}", path.display()),
                PanelOutcome::SentPrompt => println!("Sent prompt to the assistant"),
                PanelOutcome::CopiedPrompt => println!("Copied prompt to clipboard"),
            }
            Ok(())
        }
        Some(Commands::Config {
            editor,
            layout,
            delivery,
            open_browser,
            output_dir,
        }) => {
            let mut config = load_config();
            let before = config.clone();
            config.editor = editor.unwrap_or(config.editor);
            config.layout = layout.unwrap_or(config.layout);
            config.delivery = delivery.unwrap_or(config.delivery);
            config.open_browser = open_browser.unwrap_or(config.open_browser);
            config.output_dir = output_dir.or(config.output_dir);
            if config != before {
                save_config(&config)
                    .with_context(|| format!("Failed to save {}", config_path().display()))?;
            }
            println!("# {}", config_path().display());
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Some(Commands::Prompt { panel }) => {
            let text = templates::render("explain_changes", &serde_json::json!({ "panel": panel }))?;
            println!("{text}");
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let config = args.into_config();
    run_explain_mcp_server(config)
        .await
        .map_err(|e| anyhow::anyhow!("MCP server failed: {e}"))
}

fn read_request(path: &Path) -> Result<ExplainRequest> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request from {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&json).context("Failed to parse request JSON")?;
    Ok(ExplainRequest::from_value(value)?)
}

fn try_read_stdin() -> Result<Option<String>> {
    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok((!buffer.is_empty()).then_some(buffer))
}

fn render_to(request: &ExplainRequest, layout: DiffLayout, out: Option<&Path>, open: bool) -> Result<()> {
    validate_request(request)?;
    let html = render_document(request, layout)?;

    let Some(out) = out else {
        println!("{html}");
        return Ok(());
    };

    std::fs::write(out, html).with_context(|| format!("Failed to write {}", out.display()))?;
    if open {
        open::that(out).with_context(|| format!("Failed to open {}", out.display()))?;
    }
    eprintln!("Wrote {}", out.display());
    Ok(())
}

fn open_pending(workspace: Option<&Path>) -> Result<()> {
    let Some(pending) = take_pending()? else {
        println!("No pending explanation");
        return Ok(());
    };

    if let Some(workspace) = workspace
        && !pending.matches_workspace(workspace)
    {
        save_pending(&pending)?;
        bail!(
            "Pending explanation belongs to {}, not {}",
            pending.request.workspace_path.as_deref().unwrap_or_default(),
            workspace.display()
        );
    }

    let mut settings = HostSettings::from(&load_config());
    settings.open_browser = true;
    let host = ExplanationHost::new(settings);

    let mut request = pending.request;
    // Cursor pages are normally opened by the assistant; here nobody else will.
    if request.editor == Editor::Cursor {
        request.editor = Editor::Auto;
    }
    let published = host.publish_as(&request, Delivery::Browser)?;
    println!("{}", published.message());
    Ok(())
}
