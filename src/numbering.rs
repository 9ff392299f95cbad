//! Hierarchical heading numbering.
//!
//! Maintains one counter per heading depth and injects composed prefixes
//! (`2`, `2.1`, `2.1.3`) into heading text. The counters are the only
//! mutable numbering state in the pipeline; the composer owns one
//! instance per run and signals chapter boundaries explicitly via
//! [`HeadingCounters::start_chapter`].

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesText, Event};

use crate::error::Result;
use crate::markup::heading_level;

/// Per-depth heading counters scoped to the current chapter.
///
/// Depth-1 numbering runs continuously through the whole document so
/// chapters count up across divider boundaries; a chapter boundary resets
/// the counters for every deeper level. Prefixes are composed by
/// inheriting the parent depth's already-rendered prefix, never recomputed
/// from scratch.
#[derive(Debug, Clone)]
pub struct HeadingCounters {
    max_depth: u8,
    counts: Vec<u32>,
    prefixes: Vec<String>,
}

impl HeadingCounters {
    /// Create counters numbering depths `1..=max_depth` (at least 1).
    pub fn new(max_depth: u8) -> Self {
        let max_depth = max_depth.max(1);
        let slots = max_depth as usize + 1;
        Self {
            max_depth,
            counts: vec![0; slots],
            prefixes: vec![String::new(); slots],
        }
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Signal a chapter boundary: zero every counter below depth 1.
    ///
    /// The depth-1 counter carries across chapters so the composed
    /// document numbers its chapters 1, 2, 3 in document order.
    pub fn start_chapter(&mut self) {
        for d in 2..=self.max_depth as usize {
            self.counts[d] = 0;
            self.prefixes[d].clear();
        }
    }

    /// Advance the counter at `depth` and return the composed prefix.
    ///
    /// Counters deeper than `depth` reset to zero; the prefix inherits the
    /// parent depth's rendered prefix with `.{n}` appended.
    pub fn advance(&mut self, depth: u8) -> String {
        let d = depth.clamp(1, self.max_depth) as usize;

        for i in (d + 1)..=self.max_depth as usize {
            self.counts[i] = 0;
            self.prefixes[i].clear();
        }
        self.counts[d] += 1;

        let number = if d == 1 {
            self.counts[1].to_string()
        } else {
            let parent = if self.prefixes[d - 1].is_empty() {
                // No ancestor heading seen yet; render the raw counters.
                self.counts[1..d]
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(".")
            } else {
                self.prefixes[d - 1].clone()
            };
            format!("{parent}.{}", self.counts[d])
        };

        self.prefixes[d] = number.clone();
        number
    }
}

/// Inject heading numbers into a content fragment.
///
/// Scans headings in document order; headings deeper than the counters'
/// max depth are left untouched. The prefix is injected before the
/// heading's visible text, followed by a space; the heading tag itself is
/// unchanged. Pure with respect to `counters`: the same fragment and
/// starting state always produce the same output.
pub fn number_fragment(html: &str, counters: &mut HeadingCounters) -> Result<String> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().check_end_names = false;
    let mut writer = Writer::new(Vec::new());

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let numbered = heading_level(e.name().as_ref())
                    .filter(|&level| level <= counters.max_depth());
                writer.write_event(Event::Start(e))?;
                if let Some(level) = numbered {
                    let prefix = format!("{} ", counters.advance(level));
                    writer.write_event(Event::Text(BytesText::new(&prefix)))?;
                }
            }
            Ok(ev) => writer.write_event(ev)?,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(String::from_utf8(writer.into_inner())?)
}
