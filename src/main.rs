//! Tabpress - content manager for a multi-tab publishing site.
//!
//! # Usage
//!
//! ```bash
//! tabpress show contact
//! tabpress edit publishing --title "Our House" --body-file body.txt
//! tabpress watch bookstore
//! tabpress export > tab-content.js
//! ```

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use tabpress::body::serialize_body;
use tabpress::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use tabpress::content::ContentTree;
use tabpress::defaults::{builtin_defaults, export_script, load_defaults_file};
use tabpress::editor::{ContactField, ContentEditor, EditorMessage, EditorState};
use tabpress::render::{RenderOptions, render_tab, render_tabs};
use tabpress::storage::FileStorage;
use tabpress::store::ContentStore;
use tabpress::watcher::StorageWatcher;

/// Content manager for a multi-tab publishing site
#[derive(Parser, Debug)]
#[command(name = "tabpress", version, about, long_about = None)]
struct Cli {
    /// Directory holding stored overrides
    #[arg(long, value_name = "DIR", global = true)]
    storage_dir: Option<PathBuf>,

    /// Read default content from this page script instead of the built-in one
    #[arg(long, value_name = "FILE", global = true)]
    defaults: Option<PathBuf>,

    /// Wrap rendered text at this width
    #[arg(long, value_name = "N", global = true)]
    width: Option<usize>,

    /// Disable styled output
    #[arg(long, global = true)]
    plain: bool,

    /// Save current command-line flags as defaults in the global config
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults in the global config
    #[arg(long, global = true)]
    clear_config: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the effective content (all tabs, or one)
    Show {
        #[arg(value_name = "TAB")]
        tab: Option<String>,
    },
    /// Print the effective content as a page script
    Export,
    /// Print a tab's body in its editable text form
    Body {
        #[arg(value_name = "TAB")]
        tab: String,
    },
    /// Edit one tab and store the result
    Edit(EditArgs),
    /// Remove all stored overrides
    Clear,
    /// Re-render whenever another process changes the stored overrides
    Watch {
        #[arg(value_name = "TAB")]
        tab: Option<String>,
    },
}

#[derive(Args, Debug)]
struct EditArgs {
    #[arg(value_name = "TAB")]
    tab: String,

    #[arg(long)]
    title: Option<String>,

    /// Body text: paragraphs separated by blank lines, `- ` list items
    #[arg(long, conflicts_with = "body_file")]
    body: Option<String>,

    /// Read the body text from a file
    #[arg(long, value_name = "FILE")]
    body_file: Option<PathBuf>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    email: Option<String>,

    /// Contact form recipient
    #[arg(long)]
    recipient: Option<String>,

    /// Contact form relay endpoint
    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long)]
    submitting: Option<String>,

    #[arg(long)]
    success: Option<String>,

    #[arg(long)]
    error: Option<String>,
}

impl EditArgs {
    fn messages(self) -> Result<Vec<EditorMessage>> {
        let mut messages = vec![EditorMessage::SelectTab(self.tab)];
        if let Some(title) = self.title {
            messages.push(EditorMessage::SetTitle(title));
        }
        let body = match self.body_file {
            Some(path) => Some(
                std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read body file {}", path.display()))?,
            ),
            None => self.body,
        };
        if let Some(body) = body {
            messages.push(EditorMessage::SetBody(body));
        }
        let contact = [
            (ContactField::Phone, self.phone),
            (ContactField::Email, self.email),
            (ContactField::Recipient, self.recipient),
            (ContactField::Endpoint, self.endpoint),
            (ContactField::Submitting, self.submitting),
            (ContactField::Success, self.success),
            (ContactField::Error, self.error),
        ];
        for (field, value) in contact {
            if let Some(value) = value {
                messages.push(EditorMessage::SetContactField(field, value));
            }
        }
        messages.push(EditorMessage::Submit);
        Ok(messages)
    }
}

fn load_defaults(flags: &ConfigFlags) -> Result<ContentTree> {
    match &flags.defaults {
        Some(path) => load_defaults_file(path)
            .with_context(|| format!("Failed to load defaults {}", path.display())),
        None => builtin_defaults().context("Built-in defaults are malformed"),
    }
}

fn render_options(flags: &ConfigFlags) -> RenderOptions {
    let terminal = std::io::stdout().is_terminal();
    let width = flags.width.unwrap_or_else(|| {
        if terminal {
            crossterm::terminal::size().map_or(80, |(cols, _)| usize::from(cols))
        } else {
            80
        }
    });
    RenderOptions {
        width,
        styled: terminal && !flags.plain,
    }
}

fn render(tree: &ContentTree, tab: Option<&str>, options: &RenderOptions) -> Result<String> {
    match tab {
        Some(key) => render_tab(tree, key, options).with_context(|| format!("Unknown tab: {key}")),
        None => {
            let mut sections = vec![render_tabs(tree, None)];
            sections.extend(tree.keys().filter_map(|key| render_tab(tree, key, options)));
            Ok(sections.join("\n\n"))
        }
    }
}

fn run_edit(store: &mut ContentStore<FileStorage>, args: EditArgs) -> Result<()> {
    let mut editor = ContentEditor::new(store);
    for message in args.messages()? {
        editor.update(store, message);
    }
    let status = editor.status_message();
    if editor.state() != &EditorState::Saved {
        anyhow::bail!("{status}");
    }
    println!("{status}");
    Ok(())
}

fn run_watch(
    mut store: ContentStore<FileStorage>,
    tab: Option<String>,
    options: RenderOptions,
) -> Result<()> {
    let mut watcher = StorageWatcher::new(store.storage(), store.key(), Duration::from_millis(100))
        .context("Failed to watch stored overrides")?;
    println!("{}", render(store.effective(), tab.as_deref(), &options)?);

    store.subscribe(move |tree| match render(tree, tab.as_deref(), &options) {
        Ok(text) => println!("\n{text}"),
        Err(err) => tracing::warn!(error = %err, "unable to render updated content"),
    });

    loop {
        if watcher.take_change_ready() {
            store.handle_external_change(Some(watcher.key()));
        }
        std::thread::sleep(Duration::from_millis(250));
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear_config {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear_config {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let defaults = load_defaults(&effective)?;
    let storage = FileStorage::new(effective.storage_dir_or_default());
    let mut store = ContentStore::new(defaults, storage);
    let options = render_options(&effective);

    match cli.command {
        Command::Show { tab } => println!("{}", render(store.effective(), tab.as_deref(), &options)?),
        Command::Export => {
            println!("{}", export_script(store.effective()).context("Failed to export content")?);
        }
        Command::Body { tab } => {
            let content = store
                .tab(&tab)
                .with_context(|| format!("Unknown tab: {tab}"))?;
            println!("{}", serialize_body(&content.body));
        }
        Command::Edit(args) => run_edit(&mut store, args)?,
        Command::Clear => {
            if !store.clear_overrides() {
                anyhow::bail!(EditorState::ClearFailed.message());
            }
            println!("{}", EditorState::Cleared.message());
        }
        Command::Watch { tab } => run_watch(store, tab, options)?,
    }
    Ok(())
}
