use std::path::Path;

use distframe_core::config::Layout;
use distframe_core::html::escape;

use crate::error::EmbedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// What a host page can display.
pub trait HostPage {
    fn set_page(&mut self, title: &str, layout: Layout);
    fn heading(&mut self, text: &str);
    fn text(&mut self, text: &str);
    fn notice(&mut self, kind: NoticeKind, text: &str);
    fn caption(&mut self, text: &str);
    /// Reference `url` from a sandboxed inline frame.
    fn iframe(&mut self, url: &str, height: u32, scrolling: bool);
    /// Inject `markup` as-is, isolated in its own frame.
    fn raw_html(&mut self, markup: &str, height: u32, scrolling: bool);
    /// Drop everything rendered so far; a new render pass starts from scratch.
    fn reset(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Text(String),
    Notice(NoticeKind, String),
    Caption(String),
    Frame {
        url: String,
        height: u32,
        scrolling: bool,
    },
    Inline {
        markup: String,
        height: u32,
        scrolling: bool,
    },
}

/// Renders the page as one standalone HTML document.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    title: String,
    layout: Layout,
    blocks: Vec<Block>,
}

impl Default for HtmlPage {
    fn default() -> Self {
        Self {
            title: "distframe".to_string(),
            layout: Layout::Wide,
            blocks: Vec::new(),
        }
    }
}

impl HtmlPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn notices(&self, kind: NoticeKind) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(move |b| match b {
            Block::Notice(k, text) if *k == kind => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn render(&self) -> String {
        let max_width = match self.layout {
            Layout::Wide => "none",
            Layout::Centered => "46rem",
        };
        let body: String = self.blocks.iter().map(render_block).collect();
        format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
             <title>{title}</title>\
             <style>body{{font-family:system-ui,-apple-system,sans-serif;margin:0;padding:1.5rem 2rem;color:#1e293b}}\
             main{{max-width:{max_width};margin:0 auto}}\
             .notice{{padding:.75rem 1rem;border-radius:.5rem;margin:.75rem 0;white-space:pre-wrap}}\
             .info{{background:#e0f2fe}}.success{{background:#dcfce7}}.error{{background:#fee2e2;color:#991b1b}}\
             .caption{{color:#64748b;font-size:.875rem}}iframe{{width:100%;border:none}}</style>\
             </head><body><main>\n{body}</main></body></html>\n",
            title = escape(&self.title),
        )
    }

    pub fn write_to_file(&self, path: &Path) -> Result<(), EmbedError> {
        std::fs::write(path, self.render()).map_err(|source| EmbedError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl HostPage for HtmlPage {
    fn set_page(&mut self, title: &str, layout: Layout) {
        self.title = title.to_string();
        self.layout = layout;
    }

    fn heading(&mut self, text: &str) {
        self.blocks.push(Block::Heading(text.to_string()));
    }

    fn text(&mut self, text: &str) {
        self.blocks.push(Block::Text(text.to_string()));
    }

    fn notice(&mut self, kind: NoticeKind, text: &str) {
        self.blocks.push(Block::Notice(kind, text.to_string()));
    }

    fn caption(&mut self, text: &str) {
        self.blocks.push(Block::Caption(text.to_string()));
    }

    fn iframe(&mut self, url: &str, height: u32, scrolling: bool) {
        self.blocks.push(Block::Frame {
            url: url.to_string(),
            height,
            scrolling,
        });
    }

    fn raw_html(&mut self, markup: &str, height: u32, scrolling: bool) {
        self.blocks.push(Block::Inline {
            markup: markup.to_string(),
            height,
            scrolling,
        });
    }

    fn reset(&mut self) {
        self.blocks.clear();
    }
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Heading(text) => format!("<h1>{}</h1>\n", escape(text)),
        Block::Text(text) => format!("<p>{}</p>\n", escape(text)),
        Block::Notice(kind, text) => {
            let class = match kind {
                NoticeKind::Info => "info",
                NoticeKind::Success => "success",
                NoticeKind::Error => "error",
            };
            format!("<div class=\"notice {}\">{}</div>\n", class, escape(text))
        }
        Block::Caption(text) => format!("<p class=\"caption\">{}</p>\n", escape(text)),
        Block::Frame {
            url,
            height,
            scrolling,
        } => format!(
            "<iframe src=\"{}\" style=\"height:{}px\" scrolling=\"{}\" \
             sandbox=\"allow-scripts allow-same-origin allow-forms allow-popups allow-downloads\" \
             loading=\"lazy\"></iframe>\n",
            escape(url),
            height,
            scrolling_attr(*scrolling)
        ),
        // srcdoc without allow-same-origin: the injected app stays isolated from the host.
        Block::Inline {
            markup,
            height,
            scrolling,
        } => format!(
            "<iframe srcdoc=\"{}\" style=\"height:{}px\" scrolling=\"{}\" \
             sandbox=\"allow-scripts allow-forms allow-popups\"></iframe>\n",
            escape(markup),
            height,
            scrolling_attr(*scrolling)
        ),
    }
}

fn scrolling_attr(scrolling: bool) -> &'static str {
    if scrolling {
        "yes"
    } else {
        "no"
    }
}
