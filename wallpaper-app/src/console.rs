use std::io::{self, BufRead, Write};
use tokio::runtime::{Handle, RuntimeFlavor};
use wallpaper_controller::{Background, Display, Notice, Prompt};
use wallpaper_theme::ThemePalette;

/// Prints each background change to stdout.
pub struct ConsoleDisplay;

impl Display for ConsoleDisplay {
    fn show(&mut self, background: &Background) {
        match background {
            Background::None => {
                println!("Background: none (data-bg={})", background.data_attribute());
            }
            Background::Image { kind, bytes, theme } => {
                println!(
                    "Background: {} image, {} bytes (data-bg={})",
                    kind,
                    bytes.len(),
                    background.data_attribute()
                );
                if let Some(theme) = theme {
                    print_theme(theme);
                }
            }
        }
    }
}

pub fn print_theme(theme: &ThemePalette) {
    println!("Theme color: {}", theme.dominant);
    println!(
        "  background {}  primary {}  secondary {}  accent {}",
        theme.background, theme.primary, theme.secondary, theme.accent
    );
}

/// Asks on stdin, or answers yes to everything with `assume_yes`.
pub struct ConsolePrompt {
    assume_yes: bool,
}

impl ConsolePrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompt for ConsolePrompt {
    fn confirm(&self, notice: Notice) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", notice);
        if io::stdout().flush().is_err() {
            return false;
        }

        // Reading stdin blocks; keep it off the runtime's worker when we can.
        let multi_thread = Handle::try_current()
            .map(|h| h.runtime_flavor() == RuntimeFlavor::MultiThread)
            .unwrap_or(false);
        if multi_thread {
            tokio::task::block_in_place(|| read_answer(io::stdin().lock()))
        } else {
            read_answer(io::stdin().lock())
        }
    }

    fn alert(&self, notice: Notice) {
        println!("{}", notice);
    }
}

fn read_answer<R: BufRead>(mut input: R) -> bool {
    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(e) => {
            log::error!("Failed to read confirmation: {}", e);
            false
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
