//! Terminal listing of search results.
//!
//! Results are shown `page_size` at a time. When more than one screen is
//! needed the user steers with `n` (next), `p` (previous), `q` (quit) or a
//! screen number. End of input quits as well.

use crate::models::NewsRecord;
use std::io::{self, BufRead, Write};

const CLEAR_SCREEN: &str = "\x1bc";
const RULE: &str = "--------------------------------------------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Quit,
    Jump(usize),
    Unknown,
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let input = input.trim().to_lowercase();
        match input.as_str() {
            "n" => Self::Next,
            "p" => Self::Previous,
            "q" => Self::Quit,
            s if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
                s.parse().map(Self::Jump).unwrap_or(Self::Unknown)
            }
            _ => Self::Unknown,
        }
    }
}

/// Paging state over a borrowed result list.
#[derive(Debug)]
pub struct Pager<'a> {
    records: &'a [NewsRecord],
    page_size: usize,
    current: usize,
}

impl<'a> Pager<'a> {
    pub fn new(records: &'a [NewsRecord], page_size: usize) -> Self {
        Self {
            records,
            page_size: page_size.max(1),
            current: 1,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.records.len().div_ceil(self.page_size)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Apply a command; `Err` carries a message for the user.
    pub fn apply(&mut self, command: Command) -> Result<(), String> {
        let total = self.total_pages();
        match command {
            Command::Next => self.current = (self.current + 1).min(total),
            Command::Previous => self.current = self.current.saturating_sub(1).max(1),
            Command::Jump(n) if (1..=total).contains(&n) => self.current = n,
            Command::Jump(_) => {
                return Err(format!("Page out of range, enter a number between 1 and {total}"));
            }
            Command::Quit | Command::Unknown => {}
        }
        Ok(())
    }

    /// The current screen of results.
    pub fn render(&self) -> String {
        let total_items = self.records.len();
        let start = (self.current - 1) * self.page_size;
        let end = (start + self.page_size).min(total_items);

        let mut out = String::new();
        out.push_str("===== Baidu News Results =====\n");
        out.push_str(&format!(
            "{} results in total, showing page {}/{}\n",
            total_items,
            self.current,
            self.total_pages()
        ));
        out.push_str("==============================\n\n");

        for (offset, item) in self.records[start..end].iter().enumerate() {
            out.push_str(&render_item(start + offset + 1, item));
        }
        out
    }
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() { "unknown" } else { value }
}

/// One numbered entry of the listing.
pub fn render_item(index: usize, item: &NewsRecord) -> String {
    format!(
        "[{index}] {}\n{}\n{}\nSource: {} | Time: {}\n{RULE}\n",
        item.title,
        item.url,
        item.summary,
        or_unknown(&item.source),
        or_unknown(&item.time)
    )
}

/// Show `records` on `output`, reading pager commands from `input`.
///
/// `clear` emits a terminal reset before every screen.
pub fn display_results<R: BufRead, W: Write>(
    records: &[NewsRecord],
    page_size: usize,
    mut input: R,
    mut output: W,
    clear: bool,
) -> io::Result<()> {
    if records.is_empty() {
        writeln!(output, "No matching news found.")?;
        return Ok(());
    }

    let mut pager = Pager::new(records, page_size);
    let total = pager.total_pages();

    loop {
        if clear {
            write!(output, "{CLEAR_SCREEN}")?;
        }
        write!(output, "{}", pager.render())?;

        if total <= 1 {
            break;
        }

        writeln!(output, "\n[Page {}/{}]", pager.current(), total)?;
        writeln!(output, "n: next | p: previous | q: quit | number: jump to page")?;
        write!(output, "Choose an action: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        let command = Command::parse(&line);
        if command == Command::Quit {
            break;
        }
        if let Err(message) = pager.apply(command) {
            writeln!(output, "{message}")?;
        }
    }
    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<NewsRecord> {
        (1..=n)
            .map(|i| NewsRecord {
                title: format!("标题{i}"),
                url: format!("https://example.com/{i}"),
                summary: format!("摘要{i}"),
                source: if i % 2 == 0 { "新华网".to_string() } else { String::new() },
                time: String::new(),
                ..NewsRecord::default()
            })
            .collect()
    }

    fn run(records: &[NewsRecord], page_size: usize, input: &str) -> String {
        let mut out = Vec::new();
        display_results(records, page_size, input.as_bytes(), &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("n\n"), Command::Next);
        assert_eq!(Command::parse(" P "), Command::Previous);
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse("12"), Command::Jump(12));
        assert_eq!(Command::parse("-1"), Command::Unknown);
        assert_eq!(Command::parse(""), Command::Unknown);
        assert_eq!(Command::parse("next"), Command::Unknown);
    }

    #[test]
    fn test_pager_navigation_is_clamped() {
        let items = records(25);
        let mut pager = Pager::new(&items, 10);
        assert_eq!(pager.total_pages(), 3);

        pager.apply(Command::Previous).unwrap();
        assert_eq!(pager.current(), 1);
        pager.apply(Command::Next).unwrap();
        pager.apply(Command::Next).unwrap();
        pager.apply(Command::Next).unwrap();
        assert_eq!(pager.current(), 3);
        pager.apply(Command::Jump(2)).unwrap();
        assert_eq!(pager.current(), 2);
        assert!(pager.apply(Command::Jump(4)).is_err());
        assert!(pager.apply(Command::Jump(0)).is_err());
        assert_eq!(pager.current(), 2);
    }

    #[test]
    fn test_render_slices_current_page() {
        let items = records(25);
        let mut pager = Pager::new(&items, 10);
        pager.apply(Command::Jump(3)).unwrap();
        let screen = pager.render();

        assert!(screen.contains("25 results in total, showing page 3/3"));
        assert!(screen.contains("[21] 标题21"));
        assert!(screen.contains("[25] 标题25"));
        assert!(!screen.contains("[20]"));
    }

    #[test]
    fn test_render_item_unknown_fields() {
        let item = &records(1)[0];
        let text = render_item(1, item);
        assert!(text.starts_with("[1] 标题1\nhttps://example.com/1\n摘要1\n"));
        assert!(text.contains("Source: unknown | Time: unknown"));
    }

    #[test]
    fn test_empty_results_message() {
        assert_eq!(run(&[], 10, ""), "No matching news found.\n");
    }

    #[test]
    fn test_single_page_needs_no_prompt() {
        let out = run(&records(3), 10, "");
        assert!(out.contains("[3] 标题3"));
        assert!(out.contains("Source: 新华网 | Time: unknown"));
        assert!(!out.contains("Choose an action"));
    }

    #[test]
    fn test_interactive_session() {
        let out = run(&records(15), 10, "n\n9\nq\n");
        assert_eq!(out.matches("Choose an action").count(), 3);
        assert!(out.contains("showing page 2/2"));
        assert!(out.contains("Page out of range, enter a number between 1 and 2"));
    }

    #[test]
    fn test_end_of_input_quits() {
        let out = run(&records(15), 10, "");
        assert_eq!(out.matches("Choose an action").count(), 1);
    }

    #[test]
    fn test_clear_screen_when_requested() {
        let mut out = Vec::new();
        display_results(&records(1), 10, "".as_bytes(), &mut out, true).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with(CLEAR_SCREEN));
    }
}
