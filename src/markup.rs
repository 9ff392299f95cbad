//! Streaming passes over rendered page fragments.
//!
//! The core never parses HTML from scratch; pages arrive as well-formed
//! XHTML fragments produced by the site renderer. This module provides the
//! narrow operations the assembly pipeline needs: locating the content
//! container, collecting heading text, and rewriting relative references.
//! All passes stream `quick-xml` events and preserve the fragment verbatim
//! apart from the requested edits.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::error::Result;

/// Characters percent-encoded when a rewritten path is emitted as a
/// fragment href (the URL fragment set).
const FRAGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// A heading found in a fragment, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading depth (h1 → 1).
    pub level: u8,
    /// Visible text, whitespace-normalized, including any injected number.
    pub text: String,
}

/// True for references that leave the site (left untouched by rewriting
/// and excluded from slots and the TOC).
pub fn is_external(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
        || url.starts_with("//")
}

/// Map a tag name to a heading depth.
pub(crate) fn heading_level(name: &[u8]) -> Option<u8> {
    match name {
        b"h1" => Some(1),
        b"h2" => Some(2),
        b"h3" => Some(3),
        b"h4" => Some(4),
        b"h5" => Some(5),
        b"h6" => Some(6),
        _ => None,
    }
}

/// Anchor href pointing at a merged-document article.
pub fn anchor_for(url: &str) -> String {
    format!("#{}", utf8_percent_encode(url, FRAGMENT))
}

// ============================================================================
// Content container extraction
// ============================================================================

/// Extract the inner markup of a page's content container.
///
/// Prefers the first `<article>` element; falls back to the first
/// `<div role="main">`. Returns `None` when neither exists; the caller
/// treats that page as unresolvable.
pub fn extract_container(html: &str) -> Result<Option<String>> {
    if let Some(inner) = extract_element(html, |name, _| name == b"article")? {
        return Ok(Some(inner));
    }
    extract_element(html, |name, e| {
        name == b"div" && has_attr_value(e, b"role", b"main")
    })
}

fn extract_element(
    html: &str,
    matches: impl Fn(&[u8], &BytesStart) -> bool,
) -> Result<Option<String>> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().check_end_names = false;

    let mut container: Option<(Vec<u8>, usize)> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                match &container {
                    None => {
                        if matches(name.as_ref(), &e) {
                            container =
                                Some((name.as_ref().to_vec(), reader.buffer_position() as usize));
                            depth = 0;
                        }
                    }
                    Some((tag, _)) if name.as_ref() == tag.as_slice() => depth += 1,
                    Some(_) => {}
                }
            }
            Ok(Event::End(e)) => {
                if let Some((tag, start)) = &container
                    && e.name().as_ref() == tag.as_slice()
                {
                    if depth == 0 {
                        // buffer_position is past "</tag>"; back up over it.
                        let end = reader.buffer_position() as usize - (tag.len() + 3);
                        return Ok(Some(html[*start..end].to_string()));
                    }
                    depth -= 1;
                }
            }
            Ok(Event::Empty(e)) => {
                if container.is_none() && matches(e.name().as_ref(), &e) {
                    return Ok(Some(String::new()));
                }
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }
}

fn has_attr_value(e: &BytesStart, key: &[u8], value: &[u8]) -> bool {
    e.attributes()
        .flatten()
        .any(|a| a.key.as_ref() == key && a.value.as_ref() == value)
}

// ============================================================================
// Heading collection
// ============================================================================

/// Collect all headings from a fragment in document order.
///
/// Text inside inline markup (`<em>`, `<code>`, anchors) is flattened;
/// whitespace is normalized.
pub fn collect_headings(html: &str) -> Result<Vec<Heading>> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().check_end_names = false;

    let mut headings = Vec::new();
    let mut current: Option<(u8, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if current.is_none()
                    && let Some(level) = heading_level(e.name().as_ref())
                {
                    current = Some((level, String::new()));
                }
            }
            Ok(Event::Text(t)) => {
                if let Some((_, buf)) = current.as_mut() {
                    let raw = String::from_utf8_lossy(t.as_ref()).into_owned();
                    match unescape(&raw) {
                        Ok(text) => buf.push_str(&text),
                        Err(_) => buf.push_str(&raw),
                    }
                }
            }
            Ok(Event::GeneralRef(r)) => {
                if let Some((_, buf)) = current.as_mut()
                    && let Some(c) = resolve_entity(r.as_ref())
                {
                    buf.push(c);
                }
            }
            Ok(Event::End(e)) => {
                if let Some(level) = heading_level(e.name().as_ref())
                    && let Some((open_level, buf)) = current.take()
                {
                    if open_level == level {
                        headings.push(Heading {
                            level,
                            text: normalize_text(&buf),
                        });
                    } else {
                        current = Some((open_level, buf));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(headings)
}

/// Collapse runs of whitespace into single spaces and trim.
pub(crate) fn normalize_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve a general entity reference to its character.
///
/// Covers the XML builtins, `nbsp`, and numeric character references;
/// anything else is dropped from collected text.
fn resolve_entity(name: &[u8]) -> Option<char> {
    match name {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        b"nbsp" => Some('\u{00a0}'),
        _ => {
            let s = std::str::from_utf8(name).ok()?;
            let num = s.strip_prefix('#')?;
            let code = if let Some(hex) = num.strip_prefix(['x', 'X']) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                num.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

// ============================================================================
// Reference rewriting
// ============================================================================

/// Rewrite relative references so they resolve from the merged document.
///
/// `href` attributes pointing at other pages become in-document anchors;
/// `src` attributes (images, scripts) are resolved against the page's base
/// location. External URLs, `data:` URIs, and in-page fragments are left
/// untouched. Applied once, before the fragment is attached to an article.
pub fn rewrite_links(html: &str, base_url: &str, page_url: &str) -> Result<String> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().check_end_names = false;
    let mut writer = Writer::new(Vec::new());

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                if has_link_attr(&e) {
                    writer.write_event(Event::Start(rewrite_element(&e, base_url, page_url)))?;
                } else {
                    writer.write_event(Event::Start(e))?;
                }
            }
            Ok(Event::Empty(e)) => {
                if has_link_attr(&e) {
                    writer.write_event(Event::Empty(rewrite_element(&e, base_url, page_url)))?;
                } else {
                    writer.write_event(Event::Empty(e))?;
                }
            }
            Ok(ev) => writer.write_event(ev)?,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(String::from_utf8(writer.into_inner())?)
}

fn has_link_attr(e: &BytesStart) -> bool {
    e.attributes()
        .flatten()
        .any(|a| matches!(a.key.as_ref(), b"href" | b"src"))
}

fn rewrite_element(e: &BytesStart, base_url: &str, page_url: &str) -> BytesStart<'static> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);

    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        let value = match key.as_str() {
            "href" => rewrite_href(&value, page_url),
            "src" => rewrite_src(&value, base_url),
            _ => value,
        };
        out.push_attribute((key.as_str(), value.as_str()));
    }

    out
}

fn rewrite_href(href: &str, page_url: &str) -> String {
    let href = href.trim();
    if href.is_empty() || is_external(href) || href.starts_with('#') {
        return href.to_string();
    }

    let (path, fragment) = match href.split_once('#') {
        Some((p, f)) => (p, Some(f)),
        None => (href, None),
    };
    let path = path.split_once('?').map_or(path, |(p, _)| p);

    // The target page's element ids survive the merge, so a cross-page
    // fragment collapses to the fragment itself.
    if let Some(frag) = fragment
        && !frag.is_empty()
    {
        return format!("#{frag}");
    }

    let decoded = percent_decode_str(path).decode_utf8_lossy();
    if decoded.is_empty() {
        return anchor_for(page_url);
    }
    anchor_for(&resolve_relative(page_url, &decoded))
}

fn rewrite_src(src: &str, base_url: &str) -> String {
    let src = src.trim();
    if src.is_empty() || is_external(src) || src.starts_with("data:") {
        return src.to_string();
    }
    join_base(base_url, src)
}

/// Resolve a page-relative path against the page's url.
///
/// Page urls are directory-style (`guide/install/`) or file-style
/// (`guide/install.html`); either way the final segment after the last `/`
/// is dropped to obtain the page's directory.
pub(crate) fn resolve_relative(page_url: &str, path: &str) -> String {
    let trailing = path.ends_with('/');
    let mut segments: Vec<&str> = Vec::new();

    if !path.starts_with('/')
        && let Some(pos) = page_url.rfind('/')
    {
        segments.extend(page_url[..pos].split('/').filter(|s| !s.is_empty()));
    }

    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut out = segments.join("/");
    if trailing && !out.is_empty() {
        out.push('/');
    }
    out
}

/// Join an asset path onto the page's base location.
pub(crate) fn join_base(base_url: &str, src: &str) -> String {
    if src.starts_with('/') {
        return src.to_string();
    }
    let trailing = src.ends_with('/');
    let mut segments: Vec<&str> = base_url.split('/').filter(|s| !s.is_empty()).collect();

    for seg in src.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut out = segments.join("/");
    if base_url.starts_with('/') {
        out.insert(0, '/');
    }
    if trailing {
        out.push('/');
    }
    out
}

// ============================================================================
// Escaping
// ============================================================================

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
