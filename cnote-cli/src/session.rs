//! The REPL session: command handlers over a [`NoteCollection`].

use crate::command::Command;
use crate::display::{self, count};
use crate::editor::Editor;
use crate::prompt::{self, confirm};
use crate::settings::{self, AppSettings};
use anyhow::Result;
use cnote_core::{CnoteError, NoteCollection, NoteId, Pick, SearchQuery, Selection};
use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Whether the loop should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything a command needs: the notes, the settings, the editor and the
/// terminal streams.
pub struct Session<R, W, E> {
    collection: NoteCollection,
    settings: AppSettings,
    settings_path: PathBuf,
    editor: E,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write, E: Editor> Session<R, W, E> {
    pub fn new(
        collection: NoteCollection,
        settings: AppSettings,
        settings_path: PathBuf,
        editor: E,
        input: R,
        out: W,
    ) -> Self {
        Self {
            collection,
            settings,
            settings_path,
            editor,
            input,
            out,
        }
    }

    pub fn collection(&self) -> &NoteCollection {
        &self.collection
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Reads and runs commands until `quit` or end of input.
    pub fn run_repl(&mut self, greeting: Option<&str>) -> Result<()> {
        if let Some(greeting) = greeting {
            writeln!(self.out, "{greeting}")?;
        }
        loop {
            write!(self.out, "{} ", self.settings.prompt())?;
            self.out.flush()?;
            let Some(line) = prompt::read_line(&mut self.input)? else {
                writeln!(self.out)?;
                return Ok(());
            };
            if self.run_line(&line)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Parses and runs one line.
    pub fn run_line(&mut self, line: &str) -> Result<Flow> {
        self.execute(Command::parse(line))
    }

    /// Runs a command. Command failures are printed, never returned; only a
    /// broken output stream is an error.
    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        log::debug!("executing {command:?}");
        let result = match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::New { name, tags } => self.create(name, &tags),
            Command::Edit(target) => self.edit(target),
            Command::Delete(target) => self.delete(target),
            Command::Peek(target) => self.peek(target),
            Command::Tag { target, tags } => self.tag(target, &tags, true),
            Command::Untag { target, tags } => self.tag(target, &tags, false),
            Command::Search(term) => self.search(&term),
            Command::List => self.list(),
            Command::Info(target) => self.info(target),
            Command::Tags => self.tags(),
            Command::Config(params) => self.config(&params),
            Command::Help => self.help(),
            Command::Unknown(action) => {
                log::debug!("unknown action {action:?}");
                writeln!(self.out, "Sorry, didn't quite get that...")?;
                self.help()
            }
        };

        if let Err(e) = result {
            let message = match e.downcast_ref::<CnoteError>() {
                Some(core) => core.user_message(),
                None => format!("{e:#}"),
            };
            writeln!(self.out, "{message}")?;
        }
        Ok(Flow::Continue)
    }

    // --- helpers ---

    fn confirm(&mut self, message: &str) -> Result<bool> {
        Ok(confirm(&mut self.input, &mut self.out, message)?)
    }

    fn show(&mut self, title: &str, detailed: bool) -> Result<()> {
        let entries = self.collection.filtered();
        display::print_list(&mut self.out, title, &entries, self.collection.root(), detailed)?;
        Ok(())
    }

    /// Resolves `target`, printing one line per ordinal that does not exist.
    fn select(&mut self, target: Option<String>) -> Result<Option<Selection>> {
        let Some(target) = target else {
            writeln!(self.out, "Please enter note number(s) as the first parameter")?;
            return Ok(None);
        };
        let selection = self.collection.resolve(&target);
        for token in selection.missing() {
            writeln!(self.out, "Note {token} doesn't exist!")?;
        }
        Ok(Some(selection))
    }

    fn select_one(&self, target: Option<&str>) -> Option<NoteId> {
        target.and_then(|t| self.collection.resolve_one(t))
    }

    // --- commands ---

    fn create(&mut self, name: Option<String>, tags: &[String]) -> Result<()> {
        let Some(name) = name else {
            writeln!(self.out, "Please enter a filename as the first parameter")?;
            return Ok(());
        };
        let path = self.collection.new_note_path(&name)?;

        match self.collection.check_vacant(&path) {
            Ok(()) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
            }
            Err(CnoteError::DuplicateTarget(_)) => {
                if !self.confirm("Whoa! That file already exists. Overwrite it?")? {
                    return Ok(());
                }
                self.collection.discard_path(&path)?;
                writeln!(self.out, "Removed!")?;
            }
            Err(e) => return Err(e.into()),
        }

        self.editor.open(&self.settings.editor(), &path)?;

        if !path.exists() {
            writeln!(self.out, "Scrapped the blank note...")?;
            return Ok(());
        }

        let id = self.collection.insert(&path)?;
        if !tags.is_empty() {
            self.collection.add_tags(id, tags)?;
        }
        self.collection.mark_created(id)?;
        self.collection.set_filtered(vec![id]);
        self.show("Created", false)
    }

    fn edit(&mut self, target: Option<String>) -> Result<()> {
        let Some(target) = target else {
            writeln!(self.out, "Please enter note number(s) as the first parameter")?;
            return Ok(());
        };
        let Some(id) = self.collection.resolve_one(&target) else {
            writeln!(self.out, "Hey! There is no note {target}! Nice try.")?;
            return Ok(());
        };
        let path = match self.collection.get(id) {
            Some(note) => note.path().to_path_buf(),
            None => return Err(CnoteError::NoteNotFound(id).into()),
        };

        self.editor.open(&self.settings.editor(), &path)?;
        self.collection.touch(id)?;
        Ok(())
    }

    fn delete(&mut self, target: Option<String>) -> Result<()> {
        let Some(selection) = self.select(target)? else {
            return Ok(());
        };

        for pick in &selection.picks {
            let &Pick::Note { ordinal, id } = pick else {
                continue;
            };
            let Some(title) = self.collection.get(id).map(|n| n.title().to_string()) else {
                continue;
            };
            let question =
                format!("You're sure you want to delete note {ordinal} with title {title}?");
            if self.confirm(&question)? {
                self.collection.delete(id)?;
                writeln!(self.out, "Deleted!")?;
            } else {
                writeln!(self.out, "Whew! That was close.")?;
            }
        }
        Ok(())
    }

    fn peek(&mut self, target: Option<String>) -> Result<()> {
        if target.as_deref().is_some_and(|t| t.eq_ignore_ascii_case("config")) {
            let json = serde_json::to_string_pretty(&self.settings)?;
            writeln!(self.out, "{json}")?;
            return Ok(());
        }

        match self.select_one(target.as_deref()).and_then(|id| self.collection.get(id)) {
            Some(note) => display::print_peek(&mut self.out, note)?,
            None => writeln!(self.out, "Note doesn't exist!")?,
        }
        Ok(())
    }

    fn tag(&mut self, target: Option<String>, tags: &[String], add: bool) -> Result<()> {
        let Some(selection) = self.select(target)? else {
            return Ok(());
        };
        if tags.is_empty() {
            writeln!(self.out, "Please enter at least one tag after the note number(s)")?;
            return Ok(());
        }

        let ids = selection.ids();
        for &id in &ids {
            if add {
                self.collection.add_tags(id, tags)?;
            } else {
                self.collection.remove_tags(id, tags)?;
            }
        }

        self.collection.set_filtered(ids.clone());
        self.show("Changed", false)?;
        if add {
            writeln!(
                self.out,
                "Added {} to {}.",
                count(tags.len(), "tag"),
                count(ids.len(), "note")
            )?;
        } else {
            writeln!(
                self.out,
                "Removed {} from {}.",
                count(tags.len(), "tag"),
                count(ids.len(), "note")
            )?;
        }
        Ok(())
    }

    fn search(&mut self, term: &str) -> Result<()> {
        let query = SearchQuery::parse(term)?;
        let found = self.collection.search(&query).len();
        let title = format!("Found {found} Match{}", if found == 1 { "" } else { "es" });
        self.show(&title, false)
    }

    fn list(&mut self) -> Result<()> {
        self.collection.list();
        self.show("All Notes", false)
    }

    fn info(&mut self, target: Option<String>) -> Result<()> {
        let Some(selection) = self.select(target)? else {
            return Ok(());
        };
        let ids = selection.ids();
        let printed = ids.len();
        self.collection.set_filtered(ids);
        self.show("Note Info", true)?;
        writeln!(self.out, "Printed info for {}.", count(printed, "note"))?;
        Ok(())
    }

    fn tags(&mut self) -> Result<()> {
        let counts = self.collection.tag_counts();
        display::print_tags(&mut self.out, &counts)?;
        Ok(())
    }

    fn config(&mut self, params: &[String]) -> Result<()> {
        let Some(action) = params.first() else {
            settings::save_settings(&self.settings_path, &self.settings)?;
            let path = self.settings_path.clone();
            self.editor.open(&self.settings.editor(), &path)?;
            self.settings = settings::load_settings(&path);
            return Ok(());
        };
        let key = params.get(1).map(String::as_str);
        let value = params.get(2..).map(|v| v.join(" ")).unwrap_or_default();

        match (action.as_str(), key) {
            ("get", Some(key)) => {
                let current = self.settings.get(key)?.unwrap_or_default();
                writeln!(self.out, "{key}: \"{current}\"")?;
            }
            ("get", None) => {
                let json = serde_json::to_string_pretty(&self.settings)?;
                writeln!(self.out, "{json}")?;
            }
            ("set", Some(_)) if value.is_empty() => {
                writeln!(self.out, "Can't set a key to a value if no value is given.")?;
            }
            ("set", Some(key)) => {
                let old = self.settings.get(key)?.unwrap_or_default().to_string();
                self.settings.set(key, &value)?;
                settings::save_settings(&self.settings_path, &self.settings)?;
                writeln!(self.out, "Config: {key} changed from '{old}' to '{value}'")?;
                if key == "notePath" {
                    writeln!(self.out, "The new note folder is used from the next start.")?;
                }
            }
            ("set", None) => writeln!(self.out, "Can't set a key if one wasn't given.")?,
            (other, _) => writeln!(self.out, "Invalid action: {other}")?,
        }
        Ok(())
    }

    fn help(&mut self) -> Result<()> {
        display::print_help(&mut self.out, self.settings.prompt())?;
        Ok(())
    }
}
