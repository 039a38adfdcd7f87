use regex::Regex;

use crate::{
    LINK1, deck::JobDeck, error::ParseError, is_blank, section::read_section,
};


/// The parts of the input format that identify each section. These are fixed
/// by Gaussian itself, so [Syntax::default] is the only value real inputs need,
/// but holding them in a value keeps the parser free of globals
#[derive(Clone, Debug)]
pub struct Syntax {
    /// prefix marking a Link0 directive
    pub link0: String,

    /// matches the first line of the route section
    pub route: Regex,

    /// the job separator, compared case-insensitively against a whole
    /// trimmed line
    pub link1: String,

    /// matches a route requesting the geometry (and title) from the
    /// checkpoint file
    pub allchk: Regex,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            link0: String::from("%"),
            route: Regex::new(r"(?i)^#[npt]?\s").unwrap(),
            link1: String::from(LINK1),
            allchk: Regex::new(r"(?i)geom(=|=\(|\()allch(ec)?k").unwrap(),
        }
    }
}

/// shorthand for [Syntax::parse] with [Syntax::default]
pub fn parse(text: &str) -> Result<Vec<JobDeck>, ParseError> {
    Syntax::default().parse(text)
}

impl Syntax {
    /// Parse every job in `text`, in the order they are declared
    pub fn parse(&self, text: &str) -> Result<Vec<JobDeck>, ParseError> {
        let lines = split_lines(text);
        let mut decks = Vec::new();
        let mut start = 0;
        loop {
            let (deck, next) = self
                .parse_job(&lines[start..])
                .ok_or(ParseError::MissingCommandSection(decks.len()))?;
            decks.push(deck);
            match next {
                Some(n) => start += n,
                None => break,
            }
        }
        log::debug!("parsed {} job(s)", decks.len());
        Ok(decks)
    }

    fn is_link1(&self, line: &str) -> bool {
        line.trim().eq_ignore_ascii_case(&self.link1)
    }

    /// Parse a single job from the start of `lines`. Returns `None` if there
    /// is no route section. Otherwise, returns the job and, if a separator
    /// follows it, the index of the first line of the next job
    fn parse_job(&self, lines: &[String]) -> Option<(JobDeck, Option<usize>)> {
        let mut deck = JobDeck::new();

        let mut route_start = None;
        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim_start();
            if is_blank(line) {
                continue;
            } else if trimmed.starts_with(&self.link0) {
                deck.link0.push_line(trimmed);
            } else if self.route.is_match(trimmed) {
                route_start = Some(i);
                break;
            } else {
                log::warn!("ignoring line before route section: {}", line.trim_end());
            }
        }

        let mut pos = route_start?;
        pos += read_section(&lines[pos..], &mut deck.route);

        deck.geom_from_chk = self.allchk.is_match(&deck.route_line());
        if !deck.geom_from_chk {
            pos += read_section(&lines[pos..], &mut deck.title);
            pos += read_section(&lines[pos..], &mut deck.molecule);
        }

        // tail
        let mut blanks = 0;
        let mut next = None;
        while pos < lines.len() {
            let line = &lines[pos];
            pos += 1;
            if self.is_link1(line) {
                next = Some(pos);
                break;
            }
            if is_blank(line) {
                blanks += 1;
                if blanks == 2 {
                    break;
                }
            } else {
                blanks = 0;
            }
            deck.tail.push(line.clone());
        }
        while deck.tail.last().is_some_and(|l| is_blank(l)) {
            deck.tail.pop();
        }

        // a separator can still follow the double blank line that ended the
        // tail
        if next.is_none() && pos < lines.len() {
            let rest = &lines[pos..];
            match rest.iter().position(|l| !is_blank(l)) {
                Some(i) if self.is_link1(&rest[i]) => next = Some(pos + i + 1),
                Some(i) => log::warn!(
                    "ignoring {} line(s) after the end of the job",
                    rest.len() - i
                ),
                None => {}
            }
        }

        Some((deck, next))
    }
}

/// split `text` into lines that each end with `\n`. CRLF terminators become
/// `\n`, and a final line without a terminator gets one
fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n')
        .map(|l| {
            let l = l.strip_suffix('\n').unwrap_or(l);
            let l = l.strip_suffix('\r').unwrap_or(l);
            format!("{l}\n")
        })
        .collect()
}
