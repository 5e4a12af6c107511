//! Pure rendering: `ViewModel -> Node`, then `Node -> HTML`.
//!
//! Text children are [`SafeText`] only and are written verbatim; the
//! escaping already happened when the view model was built. Tag, class and
//! attribute names are `&'static str`, so nothing from the backend can land
//! in markup position.

use std::fmt::Write as _;

use crate::config::theme::Theme;
use crate::view::{
    ArticleText, PoliticalBlock, ReliabilityBlock, SafeText, SentenceView, ViewModel,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element {
        tag: &'static str,
        classes: Vec<&'static str>,
        attrs: Vec<(&'static str, SafeText)>,
        children: Vec<Node>,
    },
    Text(SafeText),
}

impl Node {
    pub fn el(tag: &'static str) -> Self {
        Node::Element {
            tag,
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(t: SafeText) -> Self {
        Node::Text(t)
    }

    pub fn class(mut self, c: &'static str) -> Self {
        if let Node::Element { classes, .. } = &mut self {
            classes.push(c);
        }
        self
    }

    pub fn attr(mut self, name: &'static str, value: SafeText) -> Self {
        if let Node::Element { attrs, .. } = &mut self {
            attrs.push((name, value));
        }
        self
    }

    pub fn child(mut self, n: Node) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.push(n);
        }
        self
    }

    pub fn children(mut self, ns: impl IntoIterator<Item = Node>) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.extend(ns);
        }
        self
    }

    /// Shorthand for an element wrapping one text child.
    pub fn with_text(self, t: SafeText) -> Self {
        self.child(Node::Text(t))
    }

    pub fn has_class(&self, c: &str) -> bool {
        matches!(self, Node::Element { classes, .. } if classes.iter().any(|x| *x == c))
    }

    /// Depth-first search for the first element carrying class `c`.
    pub fn find_class(&self, c: &str) -> Option<&Node> {
        if self.has_class(c) {
            return Some(self);
        }
        match self {
            Node::Element { children, .. } => children.iter().find_map(|n| n.find_class(c)),
            Node::Text(_) => None,
        }
    }

    /// Concatenated text content, still escaped.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t.as_str()),
            Node::Element { children, .. } => children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t.as_str()),
            Node::Element {
                tag,
                classes,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                if !classes.is_empty() {
                    let _ = write!(out, " class=\"{}\"", classes.join(" "));
                }
                for (name, value) in attrs {
                    let _ = write!(out, " {name}=\"{value}\"");
                }
                out.push('>');
                for c in children {
                    c.write_html(out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

fn label(s: &'static str) -> SafeText {
    SafeText::from_static(s)
}

/// Plain text; callers escape once when they wrap it.
fn fmt_score(v: Option<f64>) -> String {
    match v {
        Some(x) => format!("{x:.3}"),
        None => "N/A".to_string(),
    }
}

fn fmt_signed(x: f64) -> SafeText {
    SafeText::escape(&format!("{x:+.3}"))
}

/// The results panel.
pub fn view(vm: &ViewModel) -> Node {
    Node::el("section")
        .class("results")
        .child(header(vm))
        .child(metrics(vm))
        .child(reliability(&vm.reliability))
        .child(political(&vm.political))
        .child(sentences(&vm.sentences))
        .child(article(&vm.article))
}

/// The single error block; replaces any previous result.
pub fn error_view(message: &str) -> Node {
    Node::el("section")
        .class("error-message")
        .child(Node::el("p").with_text(SafeText::escape(message)))
}

fn header(vm: &ViewModel) -> Node {
    Node::el("header")
        .class("article-header")
        .child(Node::el("h2").class("article-title").with_text(vm.title.clone()))
        .child(Node::el("span").class("language").with_text(vm.language.clone()))
}

fn metric(name: &'static str, value: SafeText) -> Node {
    Node::el("div")
        .class("metric")
        .child(Node::el("span").class("metric-label").with_text(label(name)))
        .child(Node::el("span").class("metric-value").with_text(value))
}

fn metrics(vm: &ViewModel) -> Node {
    let m = &vm.metrics;
    Node::el("div")
        .class("metrics")
        .child(metric("Bias", m.label.clone()).class("bias"))
        .child(
            metric("Polarity", SafeText::escape(&fmt_score(m.polarity)))
                .class("polarity")
                .class(m.tone.as_str()),
        )
        .child(
            metric("Subjectivity", SafeText::escape(&fmt_score(m.subjectivity)))
                .class("subjectivity"),
        )
        .child(
            metric("Confidence", SafeText::escape(&fmt_score(m.confidence)))
                .class("confidence"),
        )
}

fn reliability(block: &ReliabilityBlock) -> Node {
    let panel = Node::el("div")
        .class("reliability")
        .child(Node::el("h3").with_text(label("Source Reliability")));
    match block {
        ReliabilityBlock::Available { score, label: l, tier } => panel
            .class(tier.as_str())
            .attr("data-tier", SafeText::from_static(tier.as_str()))
            .child(
                Node::el("span")
                    .class("reliability-score")
                    .with_text(SafeText::escape(&format!("{score}/100"))),
            )
            .child(Node::el("span").class("reliability-label").with_text(l.clone())),
        ReliabilityBlock::Unavailable { placeholder } => panel
            .class("unavailable")
            .child(Node::el("p").class("placeholder").with_text(placeholder.clone())),
    }
}

fn political(block: &PoliticalBlock) -> Node {
    let panel = Node::el("div")
        .class("political")
        .child(Node::el("h3").with_text(label("Political Sentiment")));
    match block {
        PoliticalBlock::Entries { parties } => panel.child(
            Node::el("ul").children(parties.iter().map(|p| {
                Node::el("li")
                    .class("party")
                    .class(p.sentiment.as_str())
                    .child(Node::el("span").class("party-name").with_text(p.party.clone()))
                    .child(Node::el("span").class("party-score").with_text(fmt_signed(p.score)))
            })),
        ),
        PoliticalBlock::NoMentions { placeholder } => {
            panel.child(Node::el("p").class("placeholder").with_text(placeholder.clone()))
        }
    }
}

fn sentence(s: &SentenceView) -> Node {
    let scores = format!(
        "Polarity: {} | Subjectivity: {}",
        fmt_score(s.polarity),
        fmt_score(s.subjectivity)
    );
    let li = Node::el("li")
        .class("sentence")
        .class(s.sentiment.as_str())
        .child(Node::el("p").class("sentence-text").with_text(s.text.clone()))
        .child(
            Node::el("span")
                .class("sentence-scores")
                .with_text(SafeText::escape(&scores)),
        );
    match &s.mentions {
        Some(m) => li.child(
            Node::el("span")
                .class("mentions")
                .child(Node::text(label("Mentions: ")))
                .child(Node::text(m.clone())),
        ),
        None => li,
    }
}

fn sentences(items: &[SentenceView]) -> Node {
    let panel = Node::el("div")
        .class("sentences")
        .child(Node::el("h3").with_text(label("Sentence Breakdown")));
    if items.is_empty() {
        return panel.child(
            Node::el("p")
                .class("placeholder")
                .with_text(label("No sentence breakdown available")),
        );
    }
    panel.child(Node::el("ol").children(items.iter().map(sentence)))
}

fn text_panel(name: &'static str, text: &SafeText, active: bool) -> Node {
    let panel = Node::el("div").class("text-panel").class(name);
    let panel = if active { panel.class("active") } else { panel };
    panel.child(Node::el("p").with_text(text.clone()))
}

fn article(a: &ArticleText) -> Node {
    let panel = Node::el("div")
        .class("article-text")
        .child(Node::el("h3").with_text(label("Article Text")));
    match a {
        ArticleText::Original { text } => panel.child(text_panel("original", text, true)),
        ArticleText::Translated {
            translated,
            original,
            show_translated,
        } => panel
            .class("has-translation")
            .child(
                Node::el("div")
                    .class("text-toggle")
                    .child(Node::el("span").with_text(label("Translated (English)")))
                    .child(Node::el("span").with_text(label("Original"))),
            )
            .child(text_panel("translated", translated, *show_translated))
            .child(text_panel("original", original, !*show_translated)),
    }
}

/// Chart series as JSON that is safe inside a `<script>` element.
pub fn chart_json(vm: &ViewModel) -> String {
    serde_json::to_string(&vm.charts)
        .unwrap_or_else(|_| "{}".to_string())
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 0; line-height: 1.5; }
body.theme-light { --bg: #f5f5f7; --card: #ffffff; --text: #1d1d1f; --dim: #86868b; }
body.theme-dark { --bg: #0d1117; --card: #161b22; --text: #e6edf3; --dim: #7d8590; }
body { background: var(--bg); color: var(--text); }
.container { max-width: 1100px; margin: 0 auto; padding: 2rem; }
.results > div, .error-message { background: var(--card); border-radius: 12px; padding: 1.25rem; margin-bottom: 1rem; }
.metrics { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; }
.metric-label { display: block; color: var(--dim); font-size: 0.8rem; text-transform: uppercase; }
.positive, .high { color: #34c759; }
.medium { color: #ff9f0a; }
.negative, .low { color: #ff3b30; }
.placeholder { color: var(--dim); font-style: italic; }
.text-panel { display: none; }
.text-panel.active { display: block; }
.error-message { color: #ff3b30; }
"#;

fn page(body: &str, theme: Theme, title: &str, charts: Option<&str>) -> String {
    let mut out = String::with_capacity(body.len() + STYLE.len() + 512);
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n\
         <body class=\"{}\">\n<main class=\"container\">\n{body}\n</main>\n",
        theme.body_class()
    );
    if let Some(json) = charts {
        let _ = write!(
            out,
            "<script type=\"application/json\" id=\"chart-data\">{json}</script>\n"
        );
    }
    out.push_str("</body>\n</html>\n");
    out
}

/// Full standalone HTML report for one result.
pub fn document(vm: &ViewModel, theme: Theme) -> String {
    let title = format!("Truth Lens: {}", vm.title);
    page(&view(vm).to_html(), theme, &title, Some(&chart_json(vm)))
}

/// Full standalone HTML page showing only an error.
pub fn error_document(message: &str, theme: Theme) -> String {
    page(&error_view(message).to_html(), theme, "Truth Lens: error", None)
}
