use clap::{Parser, Subcommand};
use color_eyre::{
  eyre::{eyre, WrapErr},
  Result,
};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use lazytrello::{
  Closable, Config, Connection, Entity, EntityKind, Labelable, Snapshot,
};

#[derive(Parser, Debug)]
#[command(name = "lazytrello")]
#[command(about = "Browse and poke at Trello from the command line")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/lazytrello/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Write logs to this file instead of stderr
  #[arg(long)]
  log_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show the member owning the token
  Me,
  /// Show every declared field of an entity
  Show { kind: String, id: String },
  /// List the cards on a board
  Cards { board_id: String },
  /// Create a card on a list
  AddCard {
    list_id: String,
    name: String,
    #[arg(long)]
    desc: Option<String>,
  },
  /// Comment on a card
  Comment { card_id: String, text: String },
  /// Set (or with --clear, remove) a label colour on a card
  Label {
    card_id: String,
    color: String,
    #[arg(long)]
    clear: bool,
  },
  /// Close a board, card or list
  Close { kind: String, id: String },
}

fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _guard = init_logging(args.log_file.as_deref())?;

  let config = Config::load(args.config.as_deref())?;
  let conn = Connection::from_config(&config)?;

  run(&conn, args.command)
}

/// Log to stderr, or to `log_file` through a non-blocking writer. The returned
/// guard must live until exit so buffered lines are flushed.
fn init_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
  let filter =
    EnvFilter::try_from_env("LAZYTRELLO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

  match log_file {
    Some(path) => {
      let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
      let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("Invalid log file path: {}", path.display()))?;
      let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
      Ok(Some(guard))
    }
    None => {
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
      Ok(None)
    }
  }
}

fn run(conn: &Connection, command: Command) -> Result<()> {
  match command {
    Command::Me => print_snapshot(&Snapshot::of(&conn.me())?),
    Command::Show { kind, id } => {
      let kind = parse_kind(&kind)?;
      let snapshot = kind
        .snapshot(conn, &id)
        .wrap_err_with(|| format!("Failed to load {} {}", kind, id))?;
      print_snapshot(&snapshot);
    }
    Command::Cards { board_id } => {
      let board = conn.board(&board_id);
      let cards = board
        .cards()
        .wrap_err_with(|| format!("Failed to list cards of board {}", board_id))?;
      for card in cards.iter() {
        println!("{}\t{}", card.id(), card.name().ok().flatten().unwrap_or_default());
      }
    }
    Command::AddCard {
      list_id,
      name,
      desc,
    } => {
      let card = conn
        .list(&list_id)
        .add_card(&name, desc.as_deref())
        .wrap_err("Failed to create card")?;
      println!("{}\t{}", card.id(), card.url().ok().flatten().unwrap_or_default());
    }
    Command::Comment { card_id, text } => {
      conn
        .card(&card_id)
        .add_comment(&text)
        .wrap_err("Failed to post comment")?;
    }
    Command::Label {
      card_id,
      color,
      clear,
    } => {
      let card = conn.card(&card_id);
      if clear {
        card.clear_label(&color)?;
      } else {
        card.set_label(&color)?;
      }
    }
    Command::Close { kind, id } => match parse_kind(&kind)? {
      EntityKind::Board => conn.board(&id).close()?,
      EntityKind::Card => conn.card(&id).close()?,
      EntityKind::List => conn.list(&id).close()?,
      other => return Err(eyre!("{} cannot be closed", other)),
    },
  }

  Ok(())
}

fn parse_kind(name: &str) -> Result<EntityKind> {
  EntityKind::from_name(name).ok_or_else(|| eyre!("Unknown entity kind: {}", name))
}

fn print_snapshot(snapshot: &Snapshot) {
  println!("{}", snapshot.label);
  let width = snapshot
    .fields
    .iter()
    .map(|(spec, _)| spec.name.len())
    .max()
    .unwrap_or(0);
  for (spec, value) in &snapshot.fields {
    println!("  {:width$}  {}", spec.name, value, width = width);
  }
}
