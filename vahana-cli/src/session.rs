//! Interactive comparison session.
//!
//! Reads one command per line, applies it to a selection store and re-renders
//! the comparison matrix whenever the selection or the view changes.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tokio::sync::watch;
use vahana_core::{
    Catalog, MatrixBuilder, Notification, NotificationSink, NotifyError, SelectionStore,
    Severity, SortKey, VahanaConfig, Vehicle, ViewOptions, render_text,
};

/// Prints notifications to stderr, colored by severity.
pub(crate) struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let color = match notification.severity() {
            Severity::Success => "32",
            Severity::Info => "36",
            Severity::Error => "31",
        };
        eprintln!("\x1b[{color}m{notification}\x1b[0m");
        Ok(())
    }
}

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Add(String),
    Remove(String),
    Clear,
    List,
    Catalog(Option<String>),
    Sort(SortKey),
    Diff(bool),
    Show,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parse one input line. A leading `/` is accepted and ignored.
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        let input = input.strip_prefix('/').unwrap_or(input);
        let mut parts = input.split_whitespace();
        let Some(name) = parts.next() else {
            return Err("empty command".to_string());
        };
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(format!("too many arguments for '{name}'"));
        }

        let required = |usage: &str| {
            arg.map(str::to_string)
                .ok_or_else(|| format!("usage: {usage}"))
        };

        match name.to_ascii_lowercase().as_str() {
            "add" | "a" => required("add <id>").map(SessionCommand::Add),
            "remove" | "rm" => required("remove <id>").map(SessionCommand::Remove),
            "clear" => Ok(SessionCommand::Clear),
            "list" | "ls" => Ok(SessionCommand::List),
            "catalog" | "search" => Ok(SessionCommand::Catalog(arg.map(str::to_string))),
            "sort" => arg
                .unwrap_or("none")
                .parse::<SortKey>()
                .map(SessionCommand::Sort),
            "diff" => match arg.map(str::to_ascii_lowercase).as_deref() {
                Some("on") | Some("true") | Some("yes") => Ok(SessionCommand::Diff(true)),
                Some("off") | Some("false") | Some("no") => Ok(SessionCommand::Diff(false)),
                _ => Err("usage: diff on|off".to_string()),
            },
            "show" => Ok(SessionCommand::Show),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "exit" | "q" => Ok(SessionCommand::Quit),
            other => Err(format!("unknown command '{other}' (type help)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

const HELP: &str = "\
Commands:
  add <id>           add a vehicle to the comparison
  remove <id>        remove a vehicle
  clear              remove every vehicle
  list               show the current selection
  catalog [query]    browse the catalog
  sort <key>         none, price-asc, price-desc, mileage-desc
  diff on|off        only show rows that differ
  show               print the comparison matrix
  help               this text
  quit               leave the session";

pub struct Session {
    catalog: Catalog,
    store: SelectionStore,
    builder: MatrixBuilder,
    view: ViewOptions,
    updates: watch::Receiver<Vec<Arc<Vehicle>>>,
}

impl Session {
    pub fn new(config: &VahanaConfig, catalog: Catalog, sink: Arc<dyn NotificationSink>) -> Self {
        let store = config.selection_store(sink);
        let updates = store.subscribe();
        Self {
            catalog,
            store,
            builder: config.matrix_builder(),
            view: config.initial_view(),
            updates,
        }
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn view(&self) -> ViewOptions {
        self.view
    }

    /// Run the read-eval-print loop on stdin/stdout until `quit` or end of input.
    pub fn run(mut self) -> anyhow::Result<()> {
        println!(
            "  Vahana comparison session | up to {} vehicles | {} in catalog",
            self.store.max_comparison(),
            self.catalog.len()
        );
        println!("  Type help for commands, quit to exit\n");

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        loop {
            print!("\x1b[1;34mvahana> \x1b[0m");
            stdout.flush()?;

            let mut input = String::new();
            if stdin.lock().read_line(&mut input).is_err() || input.is_empty() {
                break;
            }
            if input.trim().is_empty() {
                continue;
            }

            match SessionCommand::parse(&input) {
                Ok(command) => {
                    if self.execute(command, &mut stdout)? == Flow::Quit {
                        break;
                    }
                }
                Err(message) => writeln!(stdout, "{message}")?,
            }
        }
        Ok(())
    }

    /// Apply `command`, writing any output to `out`. The matrix is re-rendered
    /// when the selection changed or the view was adjusted.
    pub fn execute(&mut self, command: SessionCommand, out: &mut impl Write) -> io::Result<Flow> {
        let mut view_changed = false;
        match command {
            SessionCommand::Add(id) => match self.catalog.get(&id) {
                Some(vehicle) => {
                    self.store.add(vehicle);
                }
                None => writeln!(out, "No vehicle with id '{id}' (try: catalog {id})")?,
            },
            SessionCommand::Remove(id) => {
                if self.store.remove(&id).is_none() {
                    writeln!(out, "'{id}' is not in the comparison")?;
                }
            }
            SessionCommand::Clear => self.store.clear(),
            SessionCommand::List => self.write_selection(out)?,
            SessionCommand::Catalog(query) => self.write_catalog(query.as_deref(), out)?,
            SessionCommand::Sort(sort) => {
                view_changed = self.view.sort != sort;
                self.view.sort = sort;
                writeln!(out, "Sort: {}", sort.description())?;
            }
            SessionCommand::Diff(on) => {
                view_changed = self.view.diff_only != on;
                self.view.diff_only = on;
                writeln!(
                    out,
                    "Differences only: {}",
                    if on { "on" } else { "off" }
                )?;
            }
            SessionCommand::Show => {
                self.updates.mark_unchanged();
                self.write_matrix(out)?;
                return Ok(Flow::Continue);
            }
            SessionCommand::Help => writeln!(out, "{HELP}")?,
            SessionCommand::Quit => return Ok(Flow::Quit),
        }

        let selection_changed = self.updates.has_changed().unwrap_or(false);
        if selection_changed || view_changed {
            self.updates.mark_unchanged();
            self.write_matrix(out)?;
        }
        Ok(Flow::Continue)
    }

    fn write_matrix(&self, out: &mut impl Write) -> io::Result<()> {
        let selected = self.updates.borrow().clone();
        if selected.is_empty() {
            return writeln!(out, "No vehicles selected. Use: add <id>");
        }
        let matrix = self.builder.build(&selected, self.view);
        write!(out, "{}", render_text(&matrix))
    }

    fn write_selection(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(
            out,
            "Selected ({}/{}):",
            self.store.len(),
            self.store.max_comparison()
        )?;
        for vehicle in self.store.list() {
            writeln!(out, "  {} ({} {})", vehicle.id, vehicle.brand, vehicle.name)?;
        }
        Ok(())
    }

    fn write_catalog(&self, query: Option<&str>, out: &mut impl Write) -> io::Result<()> {
        let matches = self.catalog.search(query.unwrap_or_default());
        if matches.is_empty() {
            return writeln!(out, "No vehicles match.");
        }
        for vehicle in matches {
            let marker = if self.store.contains(&vehicle.id) { "*" } else { " " };
            writeln!(
                out,
                "{marker} {:<26} {} {} ({})",
                vehicle.id, vehicle.brand, vehicle.name, vehicle.category
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vahana_core::RecordingSink;

    fn session() -> (Session, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let catalog = Catalog::builtin().unwrap();
        (
            Session::new(&VahanaConfig::default(), catalog, sink.clone()),
            sink,
        )
    }

    fn run(session: &mut Session, line: &str) -> String {
        let mut out = Vec::new();
        let command = SessionCommand::parse(line).unwrap();
        session.execute(command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            SessionCommand::parse("add honda-activa-6g"),
            Ok(SessionCommand::Add("honda-activa-6g".into()))
        );
        assert_eq!(
            SessionCommand::parse("/rm ktm-duke-200"),
            Ok(SessionCommand::Remove("ktm-duke-200".into()))
        );
        assert_eq!(
            SessionCommand::parse("sort price-desc"),
            Ok(SessionCommand::Sort(SortKey::PriceDescending))
        );
        assert_eq!(SessionCommand::parse("sort"), Ok(SessionCommand::Sort(SortKey::None)));
        assert_eq!(SessionCommand::parse("DIFF On"), Ok(SessionCommand::Diff(true)));
        assert_eq!(SessionCommand::parse("catalog"), Ok(SessionCommand::Catalog(None)));
        assert_eq!(SessionCommand::parse("  exit "), Ok(SessionCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(SessionCommand::parse("").is_err());
        assert!(SessionCommand::parse("add").is_err());
        assert!(SessionCommand::parse("add a b").is_err());
        assert!(SessionCommand::parse("diff maybe").is_err());
        assert!(SessionCommand::parse("sort cheapest").is_err());
        assert!(SessionCommand::parse("fly").is_err());
    }

    #[test]
    fn test_add_renders_matrix() {
        let (mut session, sink) = session();
        let out = run(&mut session, "add honda-activa-6g");
        assert!(out.contains("Compare Vehicles (1/5)"));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_rejected_add_does_not_rerender() {
        let (mut session, sink) = session();
        run(&mut session, "add honda-activa-6g");
        let out = run(&mut session, "add honda-activa-6g");
        assert_eq!(out, "");
        assert_eq!(
            sink.last(),
            Some(Notification::AlreadyPresent {
                name: "Activa 6G".into()
            })
        );
    }

    #[test]
    fn test_unknown_id_and_missing_remove() {
        let (mut session, sink) = session();
        assert!(run(&mut session, "add tractor").contains("No vehicle with id 'tractor'"));
        assert!(run(&mut session, "remove tractor").contains("not in the comparison"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_view_changes_rerender() {
        let (mut session, _) = session();
        run(&mut session, "add bajaj-pulsar-ns200");
        run(&mut session, "add honda-activa-6g");

        let out = run(&mut session, "sort price-asc");
        let activa = out.find("Activa 6G").unwrap();
        let pulsar = out.find("Pulsar NS200").unwrap();
        assert!(activa < pulsar);
        assert_eq!(session.view().sort, SortKey::PriceAscending);

        // Same sort again changes nothing.
        assert_eq!(run(&mut session, "sort price-asc").lines().count(), 1);

        let out = run(&mut session, "diff on");
        assert!(!out.contains("Fuel Type"));
        assert!(out.contains("On-road Price"));
        assert!(session.view().diff_only);
    }

    #[test]
    fn test_clear_and_list() {
        let (mut session, sink) = session();
        run(&mut session, "clear");
        assert_eq!(sink.len(), 1);

        run(&mut session, "add ktm-duke-200");
        assert!(run(&mut session, "list").contains("Selected (1/3):"));
        let out = run(&mut session, "clear");
        assert!(out.contains("No vehicles selected"));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_catalog_marks_selected() {
        let (mut session, _) = session();
        run(&mut session, "add tvs-jupiter-125");
        let out = run(&mut session, "catalog tvs");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().any(|l| l.starts_with("* tvs-jupiter-125")));
        assert!(lines.iter().any(|l| l.starts_with("  tvs-iqube-electric")));
    }

    #[test]
    fn test_quit() {
        let (mut session, _) = session();
        let mut out = Vec::new();
        assert_eq!(
            session.execute(SessionCommand::Quit, &mut out).unwrap(),
            Flow::Quit
        );
    }
}
