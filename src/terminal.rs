use std::fs;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::client::ScrapeApi;
use crate::api::models::ScrapingType;
use crate::controller::{Command, FormInput, RequestController};
use crate::error::{ClientError, Result};
use crate::view::{NoticeKind, View};

pub const RESULTS_FILE: &str = "scrape_results.html";

pub const HELP: &str = "\
Commands:
  type <kind>                      select a scraping type (text, titles, links, images, custom)
  scrape <url> <kind> [selector]   scrape a page; custom needs a CSS selector
  export                           save the last result as JSON
  help                             show this text
  quit                             exit";

/// One parsed line of terminal input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(Command),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_line(line: &str) -> Input {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Input::Empty;
    };

    match verb {
        "type" => Input::Command(Command::SelectType(words.next().and_then(parse_kind))),
        "scrape" => {
            let url = words.next().unwrap_or_default().to_string();
            let scraping_type = words.next().and_then(parse_kind);
            let custom_selector = words.collect::<Vec<_>>().join(" ");
            Input::Command(Command::Submit(FormInput { url, scraping_type, custom_selector }))
        }
        "export" => Input::Command(Command::Export),
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => Input::Unknown(other.to_string()),
    }
}

// Anything outside the select's options counts as no selection.
fn parse_kind(word: &str) -> Option<ScrapingType> {
    word.parse().ok()
}

/// Feeds terminal input to the controller until `quit` or end of input.
///
/// While a scrape is in flight the submit control is disabled: further
/// `scrape` lines are dropped, other commands run once the request is done,
/// and `quit` abandons the request.
pub async fn run<A: ScrapeApi, V: View>(
    controller: &mut RequestController<A, V>,
    inputs: &mut mpsc::Receiver<Input>,
) {
    while let Some(input) = inputs.recv().await {
        let command = match input {
            Input::Command(command) => command,
            Input::Quit => return,
            other => {
                answer(other);
                continue;
            }
        };
        let Command::Submit(form) = command else {
            controller.dispatch(command).await;
            continue;
        };

        let mut deferred = Vec::new();
        let mut closed = false;
        {
            let submission = controller.submit(&form);
            tokio::pin!(submission);
            loop {
                tokio::select! {
                    _ = &mut submission => break,
                    next = inputs.recv(), if !closed => match next {
                        Some(Input::Command(Command::Submit(form))) => {
                            debug!("Submit ignored while a request is outstanding: {}", form.url);
                        }
                        Some(Input::Command(other)) => deferred.push(other),
                        Some(Input::Quit) => return,
                        Some(other) => answer(other),
                        None => closed = true,
                    },
                }
            }
        }

        for command in deferred {
            controller.dispatch(command).await;
        }
        if closed {
            return;
        }
    }
}

fn answer(input: Input) {
    match input {
        Input::Help => println!("{}", HELP),
        Input::Unknown(verb) => println!("Unknown command '{}', try 'help'", verb),
        _ => {}
    }
}

/// Prints notices to stdout and writes the results panel and exports into
/// `output_dir`.
pub struct TerminalView {
    output_dir: PathBuf,
}

impl TerminalView {
    pub fn new(output_dir: PathBuf) -> Self {
        TerminalView { output_dir }
    }
}

impl View for TerminalView {
    fn set_loading(&mut self, visible: bool) {
        if visible {
            println!("Scraping...");
        }
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        debug!("Submit enabled: {}", enabled);
    }

    fn set_custom_selector_visible(&mut self, visible: bool) {
        if visible {
            println!("Custom scraping needs a CSS selector after the type.");
        }
    }

    fn show_results(&mut self, html: &str) -> Result<()> {
        let path = self.output_dir.join(RESULTS_FILE);
        fs::write(&path, html)
            .map_err(|e| ClientError::Display(format!("could not write {}: {}", path.display(), e)))?;
        println!("Results written to {}", path.display());
        Ok(())
    }

    fn hide_results(&mut self) {
        debug!("Results panel hidden");
    }

    fn show_notice(&mut self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Error => println!("✖ {}", message),
            NoticeKind::Success => println!("✔ {}", message),
        }
    }

    fn hide_notice(&mut self, kind: NoticeKind) {
        debug!("{:?} notice dismissed", kind);
    }

    fn download(&mut self, file_name: &str, contents: &str) -> Result<()> {
        let path = self.output_dir.join(file_name);
        fs::write(&path, contents)?;
        println!("Saved {}", path.display());
        Ok(())
    }
}
