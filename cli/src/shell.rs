// Interactive shell — reads commands line by line until `exit`
//
// Lines are parsed with the same clap definitions as one-shot mode, so
// `add Alice 1234567890` behaves exactly like `contactbook add Alice 1234567890`.

use crate::commands::{self, BookCommand};
use anyhow::Result;
use clap::Parser;
use colored::*;
use contactbook_core::{AddressBook, LoadOutcome};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "contactbook",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
struct ShellLine {
    #[command(subcommand)]
    command: BookCommand,
}

const HELP: &str = "\
Commands:
  add <name> <phone> [birthday]       Add a contact (birthday as dd-mm-yyyy),
                                      or add a phone to an existing one
  birthday <name> <date>              Add or update a contact's birthday
  change <name> <old> <new>           Change a phone number
  phone <name>                        Show a contact's phone numbers
  when <name>                         Days until a contact's birthday
  remove <name> <phone>               Remove a phone number from a contact
  delete <name>                       Delete a contact
  search [query]                      Search by name or phone
  show all                            List contacts page by page
  clear all                           Delete every contact
  save [file]                         Save the address book
  load [file]                         Load (or start) an address book
  hello, help
  exit, close, good bye               Save and quit";

/// What the loop should do after a line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R, W> {
    book: AddressBook,
    path: PathBuf,
    page_size: usize,
    autosave: bool,
    /// `path` exists but could not be loaded; autosave must not replace it
    load_failed: bool,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(
        book: AddressBook,
        path: PathBuf,
        page_size: usize,
        autosave: bool,
        input: R,
        output: W,
    ) -> Self {
        Self {
            book,
            path,
            page_size,
            autosave,
            load_failed: false,
            input,
            output,
        }
    }

    #[cfg(test)]
    pub fn book(&self) -> &AddressBook {
        &self.book
    }

    /// Runs until `exit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "{}", greeting())?;

        loop {
            let Some(line) = self.prompt(&format!("\n{} ", "Enter command:".bold()))? else {
                // EOF behaves like exit
                self.save_on_exit()?;
                break;
            };

            if self.handle(&line)? == Flow::Quit {
                break;
            }
        }

        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn handle(&mut self, line: &str) -> Result<Flow> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = words.first() else {
            return Ok(Flow::Continue);
        };
        let keyword = first.to_lowercase();
        let rest = &words[1..];
        // Fixed keywords match in any case; arguments keep theirs
        let lowered: Vec<String> = rest.iter().map(|w| w.to_lowercase()).collect();
        let lowered: Vec<&str> = lowered.iter().map(String::as_str).collect();

        match (keyword.as_str(), lowered.as_slice()) {
            ("hello", []) => writeln!(self.output, "{}", greeting())?,
            ("help", []) => writeln!(self.output, "{}", HELP)?,
            ("exit" | "close", []) | ("good", ["bye"]) => {
                self.save_on_exit()?;
                writeln!(self.output, "Good bye!")?;
                return Ok(Flow::Quit);
            }
            ("show", [] | ["all"]) => self.paginate()?,
            ("clear", [] | ["all"]) => self.clear()?,
            ("save", [] | [_]) => self.save(rest.first().map(PathBuf::from))?,
            ("load", [] | [_]) => {
                let path = rest
                    .first()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| self.path.clone());
                self.load(path)?;
            }
            ("search", []) => {
                let Some(query) = self.prompt("Enter the search query: ")? else {
                    return Ok(Flow::Continue);
                };
                self.run_command(&BookCommand::Search { query })?;
            }
            _ => {
                let mut args = vec![keyword.as_str()];
                args.extend_from_slice(rest);
                match ShellLine::try_parse_from(args) {
                    Ok(parsed) => self.run_command(&parsed.command)?,
                    Err(err) => self.parse_error(line, &err)?,
                }
            }
        }

        Ok(Flow::Continue)
    }

    fn run_command(&mut self, command: &BookCommand) -> Result<()> {
        match commands::execute(&mut self.book, command) {
            Ok(reply) => writeln!(self.output, "{}", reply.message)?,
            Err(err) => writeln!(self.output, "{} {}", "✗".red(), err)?,
        }
        Ok(())
    }

    fn parse_error(&mut self, line: &str, err: &clap::Error) -> Result<()> {
        use clap::error::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSubcommand => writeln!(
                self.output,
                "Unknown command: {}. Type 'help' for available commands.",
                line
            )?,
            _ => {
                let detail = err.to_string();
                let detail = detail.lines().next().unwrap_or("invalid arguments");
                writeln!(self.output, "{} Invalid command format: {}", "✗".red(), detail)?;
            }
        }
        Ok(())
    }

    fn paginate(&mut self) -> Result<()> {
        let total = self.book.pages(self.page_size).len();
        if total == 0 {
            writeln!(self.output, "{}", commands::empty_message())?;
            return Ok(());
        }

        let pages: Vec<String> = self
            .book
            .pages(self.page_size)
            .enumerate()
            .map(|(i, page)| commands::format_page(page, i + 1, total))
            .collect();

        let mut current = 0;
        writeln!(self.output, "{}", pages[current])?;

        while total > 1 {
            let answer = match self.prompt(
                "Type 'next' to view the next page, 'prev' for the previous page, or 'exit' to quit: ",
            )? {
                Some(answer) => answer.to_lowercase(),
                None => break,
            };

            match answer.as_str() {
                "next" if current + 1 < total => current += 1,
                "prev" if current > 0 => current -= 1,
                "exit" => break,
                _ => {
                    writeln!(
                        self.output,
                        "Invalid command. Please enter 'next', 'prev', or 'exit'."
                    )?;
                    continue;
                }
            }
            writeln!(self.output, "{}", pages[current])?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let answer = self.prompt("Are you sure you want to delete all contacts? (y/n) ")?;
        let yes = answer.is_some_and(|a| a.eq_ignore_ascii_case("y"));
        self.run_command(&BookCommand::Clear { yes })
    }

    /// Saves to `target` (or the current file). The current file only
    /// changes once a save to the new path succeeds.
    fn save(&mut self, target: Option<PathBuf>) -> Result<()> {
        let path = target.unwrap_or_else(|| self.path.clone());
        match self.book.save(&path) {
            Ok(count) => {
                writeln!(
                    self.output,
                    "{} Address book saved to {} ({} contacts)",
                    "✓".green(),
                    path.display(),
                    count
                )?;
                self.path = path;
                self.load_failed = false;
            }
            Err(err) => writeln!(self.output, "{} {}", "✗".red(), err)?,
        }
        Ok(())
    }

    /// Loads `path` and makes it the current file. On failure the book and
    /// the current file stay as they were; if the failed file is the current
    /// one, autosave stops writing to it.
    pub fn load(&mut self, path: PathBuf) -> Result<()> {
        match self.book.load(&path) {
            Ok(LoadOutcome::Loaded(count)) => writeln!(
                self.output,
                "{} Address book loaded from {} ({} contacts)",
                "✓".green(),
                path.display(),
                count
            )?,
            Ok(LoadOutcome::Missing) => writeln!(
                self.output,
                "{}",
                "File not found. Creating a new address book.".dimmed()
            )?,
            Err(err) => {
                writeln!(self.output, "{} {}", "✗".red(), err)?;
                if path == self.path {
                    self.load_failed = true;
                }
                return Ok(());
            }
        }

        self.path = path;
        self.load_failed = false;
        Ok(())
    }

    fn save_on_exit(&mut self) -> Result<()> {
        if !self.autosave {
            return Ok(());
        }
        if self.load_failed {
            writeln!(
                self.output,
                "{} Not saving over {}: it could not be loaded. Use 'save' to overwrite it.",
                "!".yellow(),
                self.path.display()
            )?;
            return Ok(());
        }
        self.save(None)
    }
}

fn greeting() -> String {
    format!(
        "{}\nType 'help' to see available commands.",
        "Welcome to your address book!".bold()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use contactbook_core::Record;
    use std::io::Cursor;

    fn run_shell(book: AddressBook, path: PathBuf, input: &str) -> (AddressBook, String) {
        colored::control::set_override(false);

        let mut output = Vec::new();
        let book = {
            let mut shell = Shell::new(book, path, 2, true, Cursor::new(input), &mut output);
            shell.run().unwrap();
            shell.book().clone()
        };
        (book, String::from_utf8(output).unwrap())
    }

    /// Starts the shell the way `main` does: empty book, then load `path`.
    fn run_after_load(path: PathBuf, input: &str) -> (AddressBook, String) {
        colored::control::set_override(false);

        let mut output = Vec::new();
        let book = {
            let mut shell = Shell::new(
                AddressBook::new(),
                path.clone(),
                2,
                true,
                Cursor::new(input),
                &mut output,
            );
            shell.load(path).unwrap();
            shell.run().unwrap();
            shell.book().clone()
        };
        (book, String::from_utf8(output).unwrap())
    }

    const BAD_BOOK: &str = r#"[
        {"name": "Alice", "phones": ["1234567890"], "birthday": null},
        {"name": "Bob", "phones": ["12"], "birthday": null}
    ]"#;

    fn book_with(names: &[&str]) -> AddressBook {
        let mut book = AddressBook::new();
        for name in names {
            let mut record = Record::new(name, None).unwrap();
            record.add_phone("1234567890").unwrap();
            book.add_record(record);
        }
        book
    }

    #[test]
    fn test_session_edits_and_saves_on_exit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");

        let input = "add Alice 1234567890 01-01-1990\n\
                     add Alice 5555555555\n\
                     change alice 1234567890 1112223333\n\
                     exit\n";
        let (book, output) = run_shell(AddressBook::new(), path.clone(), input);

        assert!(output.contains("Contact Alice with number 1234567890 and birthday 01-01-1990 saved."));
        assert!(output.contains("Information added to existing contact: Alice"));
        assert!(output.contains("Good bye!"));

        let mut reloaded = AddressBook::new();
        reloaded.load(&path).unwrap();
        assert_eq!(reloaded, book);
        assert_eq!(reloaded.find("Alice").unwrap().phones().len(), 2);
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let dir = tempfile::tempdir().unwrap();
        let input = "add Bob 12\nfly away\nphone\nwhen Ghost\nadd Bob 1234567890\nclose\n";
        let (book, output) = run_shell(AddressBook::new(), dir.path().join("b.json"), input);

        assert!(output.contains("Invalid phone \"12\""));
        assert!(output.contains("Unknown command: fly away."));
        assert!(output.contains("Invalid command format"));
        assert!(output.contains("Contact Ghost not found"));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_search_prompts_for_query() {
        let dir = tempfile::tempdir().unwrap();
        let input = "search\n555\nexit\n";
        let mut book = AddressBook::new();
        let mut record = Record::new("Carol", None).unwrap();
        record.add_phone("5555550000").unwrap();
        book.add_record(record);

        let (_, output) = run_shell(book, dir.path().join("b.json"), input);
        assert!(output.contains("Search results for '555':"));
        assert!(output.contains("Carol"));
    }

    #[test]
    fn test_show_all_pages() {
        let dir = tempfile::tempdir().unwrap();
        let input = "show all\nnext\nnext\nprev\nexit\nexit\n";
        let (_, output) = run_shell(
            book_with(&["A", "B", "C"]),
            dir.path().join("b.json"),
            input,
        );

        assert_eq!(output.matches("Page 1/2:").count(), 2);
        assert_eq!(output.matches("Page 2/2:").count(), 1);
        assert!(output.contains("Invalid command. Please enter 'next', 'prev', or 'exit'."));
    }

    #[test]
    fn test_clear_all_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let (book, output) = run_shell(
            book_with(&["A", "B"]),
            dir.path().join("b.json"),
            "clear all\nn\nexit\n",
        );
        assert!(output.contains("Removal canceled"));
        assert_eq!(book.len(), 2);

        let (book, _) = run_shell(
            book_with(&["A", "B"]),
            dir.path().join("b.json"),
            "clear all\ny\nexit\n",
        );
        assert!(book.is_empty());
    }

    #[test]
    fn test_load_missing_file_starts_new_book() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let input = format!("load {}\nexit\n", missing.display());

        let (book, output) = run_shell(AddressBook::new(), dir.path().join("b.json"), &input);
        assert!(output.contains("File not found. Creating a new address book."));
        assert!(book.is_empty());
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("no-such-dir").join("book.json");
        let input = format!("save {}\nadd Dan 1234567890\ngood bye\n", bad.display());

        let (book, output) = run_shell(AddressBook::new(), dir.path().join("b.json"), &input);
        assert!(output.contains("✗ Cannot access"));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_unloadable_book_survives_exit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");
        std::fs::write(&path, BAD_BOOK).unwrap();

        let (book, output) = run_after_load(path.clone(), "add Eve 1234567890\nexit\n");

        assert!(output.contains("Invalid phone \"12\""));
        assert!(output.contains("Not saving over"));
        assert_eq!(book.len(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), BAD_BOOK);
    }

    #[test]
    fn test_unloadable_book_survives_eof() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");
        std::fs::write(&path, "not json").unwrap();

        run_after_load(path.clone(), "");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }

    #[test]
    fn test_explicit_save_overwrites_unloadable_book() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");
        std::fs::write(&path, BAD_BOOK).unwrap();

        run_after_load(path.clone(), "add Eve 1234567890\nsave\nexit\n");

        let mut reloaded = AddressBook::new();
        assert_eq!(reloaded.load(&path).unwrap(), LoadOutcome::Loaded(1));
        assert!(reloaded.find("Eve").is_some());
    }

    #[test]
    fn test_failed_load_keeps_current_book_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let current = dir.path().join("book.json");
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, BAD_BOOK).unwrap();

        let input = format!("load {}\nexit\n", bad.display());
        let (book, output) = run_shell(book_with(&["Ann"]), current.clone(), &input);

        assert!(output.contains("✗ Invalid phone"));
        assert_eq!(book.len(), 1);
        assert_eq!(std::fs::read_to_string(&bad).unwrap(), BAD_BOOK);

        let mut reloaded = AddressBook::new();
        reloaded.load(&current).unwrap();
        assert!(reloaded.find("Ann").is_some());
    }

    #[test]
    fn test_fixed_keywords_ignore_case() {
        let dir = tempfile::tempdir().unwrap();
        let (book, output) = run_shell(
            book_with(&["Ann"]),
            dir.path().join("b.json"),
            "Show All\nCLEAR ALL\nn\ngood Bye\n",
        );

        assert!(output.contains("Page 1/1:"));
        assert!(output.contains("Removal canceled"));
        assert!(output.contains("Good bye!"));
        assert!(!output.contains("Invalid command format"));
        assert_eq!(book.len(), 1);
    }
}
