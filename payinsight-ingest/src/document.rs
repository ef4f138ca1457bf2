//! Navigable activity-export documents.
//!
//! An exported activity page is a list of `div.outer-cell` blocks. Each block
//! carries a body cell with the entry text and, usually, a caption cell that
//! lists the product and the settlement status:
//!
//! ```text
//! <div class="outer-cell ...">
//!   <div class="content-cell mdl-cell mdl-cell--6-col mdl-typography--body-1">
//!     Paid ₹250.00 to Swiggy using Bank Account XXXXXX1234<br>12 Jan 2024, 14:35:22 GMT+05:30
//!   </div>
//!   <div class="content-cell mdl-cell mdl-cell--12-col mdl-typography--caption">
//!     <b>Details:</b><br>&emsp;Completed
//!   </div>
//! </div>
//! ```

use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

use crate::error::Result;

/// Text recovered from one candidate block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFragment {
    /// Primary entry text; `None` when the block has no body cell
    pub text: Option<String>,
    /// Caption text holding the status word
    pub caption: Option<String>,
}

impl RawFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Anything that can hand out candidate transaction blocks in document order
pub trait FragmentSource {
    fn fragments(&self) -> Vec<RawFragment>;
}

impl FragmentSource for [RawFragment] {
    fn fragments(&self) -> Vec<RawFragment> {
        self.to_vec()
    }
}

impl FragmentSource for Vec<RawFragment> {
    fn fragments(&self) -> Vec<RawFragment> {
        self.clone()
    }
}

fn block_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("div.outer-cell").expect("invalid block selector"))
}

fn body_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| {
        Selector::parse("div.content-cell.mdl-cell--6-col.mdl-typography--body-1")
            .expect("invalid body selector")
    })
}

fn caption_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| {
        Selector::parse("div.content-cell.mdl-cell--12-col.mdl-typography--caption")
            .expect("invalid caption selector")
    })
}

/// Descendant text nodes, trimmed, empties dropped, joined by single spaces
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A parsed activity-export page
pub struct ActivityDocument {
    html: Html,
}

impl ActivityDocument {
    /// Parse markup. HTML parsing is lenient and never fails.
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Decode raw bytes as UTF-8, then parse. Undecodable input is fatal.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let markup = std::str::from_utf8(bytes)?;
        Ok(Self::parse(markup))
    }

    /// Number of candidate blocks in the page
    pub fn block_count(&self) -> usize {
        self.html.select(block_selector()).count()
    }
}

impl FragmentSource for ActivityDocument {
    fn fragments(&self) -> Vec<RawFragment> {
        self.html
            .select(block_selector())
            .map(|block| RawFragment {
                text: block.select(body_selector()).next().map(element_text),
                caption: block.select(caption_selector()).next().map(element_text),
            })
            .collect()
    }
}
