use std::fmt;

use ego_tree::NodeId;
use html5ever::{local_name, ns, Attribute, LocalName, QualName};
use scraper::node::{Element, Text};
use scraper::{Html, Node, Selector, StrTendril};

use crate::GeneratedFile;

const STYLESHEET_LINKS: &str = r#"link[rel="stylesheet"][href]"#;
const EXTERNAL_SCRIPTS: &str = "script[src]";

/// A self-contained HTML document built from a project's entry page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Filename of the HTML file the preview was built from.
    pub source: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct PreviewError {
    /// Filename of the HTML file being assembled.
    pub entry: String,
    pub kind: PreviewFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewFailure {
    InvalidSelector(String),
    MissingNode,
    /// The assembly task died before producing a document.
    Aborted(String),
}

impl fmt::Display for PreviewFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewFailure::InvalidSelector(selector) => write!(f, "invalid selector {selector}"),
            PreviewFailure::MissingNode => write!(f, "document node vanished while inlining"),
            PreviewFailure::Aborted(reason) => write!(f, "preview assembly aborted: {reason}"),
        }
    }
}

/// First file, in list order, whose name ends with `.html`.
pub fn entry_point(files: &[GeneratedFile]) -> Option<&GeneratedFile> {
    files.iter().find(|f| f.filename.ends_with(".html"))
}

/// Inlines the stylesheets and scripts the entry page references.
///
/// `<link rel="stylesheet" href>` becomes `<style>` and `<script src>` becomes an
/// inline `<script>` (keeping `type`) when another file matches the reference.
/// A reference matches the first file whose name ends with it after stripping a
/// leading `./`, so `style.css` also matches `sub/style.css`. Unmatched
/// references are left as they are. Returns `None` when there is no HTML file.
pub fn build_preview(files: &[GeneratedFile]) -> Result<Option<Preview>, PreviewError> {
    let Some(entry) = entry_point(files) else {
        return Ok(None);
    };
    let fail = |kind| PreviewError {
        entry: entry.filename.clone(),
        kind,
    };

    let mut document = Html::parse_document(&entry.content);
    let replacements = plan_replacements(&document, files).map_err(fail)?;
    for replacement in replacements {
        splice(&mut document, replacement).map_err(fail)?;
    }

    Ok(Some(Preview {
        source: entry.filename.clone(),
        html: document.html(),
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InlineKind {
    Style,
    Script,
}

impl InlineKind {
    fn tag(self) -> &'static str {
        match self {
            InlineKind::Style => "style",
            InlineKind::Script => "script",
        }
    }

    fn local_name(self) -> LocalName {
        match self {
            InlineKind::Style => local_name!("style"),
            InlineKind::Script => local_name!("script"),
        }
    }
}

struct Replacement {
    target: NodeId,
    kind: InlineKind,
    /// Value of the original `type` attribute, scripts only.
    script_type: Option<String>,
    text: String,
}

fn plan_replacements(
    document: &Html,
    files: &[GeneratedFile],
) -> Result<Vec<Replacement>, PreviewFailure> {
    let stylesheets = parse_selector(STYLESHEET_LINKS)?;
    let scripts = parse_selector(EXTERNAL_SCRIPTS)?;
    let mut replacements = Vec::new();

    for link in document.select(&stylesheets) {
        let Some(file) = link.value().attr("href").and_then(|href| resolve(files, href)) else {
            continue;
        };
        replacements.push(Replacement {
            target: link.id(),
            kind: InlineKind::Style,
            script_type: None,
            text: escape_raw_text(&file.content, InlineKind::Style),
        });
    }

    for script in document.select(&scripts) {
        let Some(file) = script.value().attr("src").and_then(|src| resolve(files, src)) else {
            continue;
        };
        replacements.push(Replacement {
            target: script.id(),
            kind: InlineKind::Script,
            script_type: script.value().attr("type").map(ToOwned::to_owned),
            text: escape_raw_text(&file.content, InlineKind::Script),
        });
    }

    Ok(replacements)
}

fn resolve<'a>(files: &'a [GeneratedFile], reference: &str) -> Option<&'a GeneratedFile> {
    if reference.is_empty() {
        return None;
    }
    let wanted = reference.strip_prefix("./").unwrap_or(reference);
    files.iter().find(|f| f.filename.ends_with(wanted))
}

/// Puts a new inline element holding the file text where `target` was.
fn splice(document: &mut Html, replacement: Replacement) -> Result<(), PreviewFailure> {
    let attributes = replacement
        .script_type
        .map(|value| Attribute {
            name: QualName::new(None, ns!(), local_name!("type")),
            value: value.as_str().into(),
        })
        .into_iter()
        .collect();
    let element = Element::new(
        QualName::new(None, ns!(html), replacement.kind.local_name()),
        attributes,
    );

    let mut target = document
        .tree
        .get_mut(replacement.target)
        .ok_or(PreviewFailure::MissingNode)?;
    {
        let mut inline = target.insert_before(Node::Element(element));
        inline.append(Node::Text(Text {
            text: StrTendril::from(replacement.text.as_str()),
        }));
    }
    target.detach();
    Ok(())
}

fn parse_selector(selector: &str) -> Result<Selector, PreviewFailure> {
    Selector::parse(selector)
        .map_err(|err| PreviewFailure::InvalidSelector(format!("{selector}: {err:?}")))
}

/// Style and script text is serialized raw, so sequences that would end the
/// element early get a backslash: `</style` or `</script` becomes `<\/style` or
/// `<\/script`, and in scripts `<!--` becomes `<\!--`. Everything else,
/// `&` and `<` included, is kept byte for byte.
fn escape_raw_text(content: &str, kind: InlineKind) -> String {
    let tag = kind.tag();
    let mut escaped = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(pos) = rest.find('<') {
        escaped.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if closes_element(tail, tag) {
            escaped.push_str("<\\/");
            rest = &tail[2..];
        } else if kind == InlineKind::Script && tail.starts_with("<!--") {
            escaped.push_str("<\\!--");
            rest = &tail[4..];
        } else {
            escaped.push('<');
            rest = &tail[1..];
        }
    }
    escaped.push_str(rest);
    escaped
}

fn closes_element(tail: &str, tag: &str) -> bool {
    tail.strip_prefix("</")
        .and_then(|after| after.get(..tag.len()))
        .is_some_and(|name| name.eq_ignore_ascii_case(tag))
}
