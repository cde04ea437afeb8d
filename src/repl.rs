//! Line-editing REPL front end
//!
//! History is kept in `~/.cadr_history` between runs.

use rustyline::{DefaultEditor, Result as RustylineResult};
use std::path::PathBuf;

const HISTORY_FILE: &str = ".cadr_history";

pub struct Repl {
    editor: DefaultEditor,
}

impl Repl {
    pub fn new() -> RustylineResult<Self> {
        let mut editor = DefaultEditor::new()?;
        // A missing history file is normal on first run.
        let _ = editor.load_history(&Self::history_file_path());
        Ok(Self { editor })
    }

    fn history_file_path() -> PathBuf {
        match home_dir() {
            Some(home) => home.join(HISTORY_FILE),
            None => PathBuf::from(HISTORY_FILE),
        }
    }

    pub fn read_line(&mut self, prompt: &str) -> RustylineResult<String> {
        self.editor.readline(prompt)
    }

    pub fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }

    /// Persist history.
    pub fn finalize(&mut self) {
        let _ = self.editor.save_history(&Self::history_file_path());
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(unix)]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(any(unix, windows)))]
    {
        None
    }
}
