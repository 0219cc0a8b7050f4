//! Whitelist HTML filter applied to user-supplied text before it leaves the service.
//!
//! Text is escaped, known-safe tags survive with only their safe attributes,
//! and everything else that looks like a tag is escaped as text. Output is
//! safe to drop into an HTML page.

/// Tags that may pass through, with the attributes each one keeps.
const WHITELIST: &[(&str, &[&str])] = &[
    ("a", &["target", "href", "title"]),
    ("abbr", &["title"]),
    ("address", &[]),
    ("article", &[]),
    ("aside", &[]),
    ("b", &[]),
    ("bdi", &["dir"]),
    ("bdo", &["dir"]),
    ("big", &[]),
    ("blockquote", &["cite"]),
    ("br", &[]),
    ("caption", &[]),
    ("center", &[]),
    ("cite", &[]),
    ("code", &[]),
    ("col", &["align", "valign", "span", "width"]),
    ("colgroup", &["align", "valign", "span", "width"]),
    ("dd", &[]),
    ("del", &["datetime"]),
    ("details", &["open"]),
    ("div", &[]),
    ("dl", &[]),
    ("dt", &[]),
    ("em", &[]),
    ("figcaption", &[]),
    ("figure", &[]),
    ("font", &["color", "size", "face"]),
    ("footer", &[]),
    ("h1", &[]),
    ("h2", &[]),
    ("h3", &[]),
    ("h4", &[]),
    ("h5", &[]),
    ("h6", &[]),
    ("header", &[]),
    ("hr", &[]),
    ("i", &[]),
    ("img", &["src", "alt", "title", "width", "height"]),
    ("ins", &["datetime"]),
    ("li", &[]),
    ("mark", &[]),
    ("nav", &[]),
    ("ol", &[]),
    ("p", &[]),
    ("pre", &[]),
    ("s", &[]),
    ("section", &[]),
    ("small", &[]),
    ("span", &[]),
    ("strike", &[]),
    ("strong", &[]),
    ("sub", &[]),
    ("summary", &[]),
    ("sup", &[]),
    ("table", &["width", "border", "align", "valign"]),
    ("tbody", &["align", "valign"]),
    ("td", &["width", "rowspan", "colspan", "align", "valign"]),
    ("tfoot", &["align", "valign"]),
    ("th", &["width", "rowspan", "colspan", "align", "valign"]),
    ("thead", &["align", "valign"]),
    ("tr", &["rowspan", "align", "valign"]),
    ("tt", &[]),
    ("u", &[]),
    ("ul", &[]),
];

/// URL prefixes accepted in `href` and `src`.
const SAFE_URL_PREFIXES: &[&str] = &[
    "http://",
    "https://",
    "mailto:",
    "tel:",
    "data:image/",
    "ftp://",
    "./",
    "../",
    "#",
    "/",
];

/// Filters `input` for safe embedding in HTML.
///
/// ```
/// use bookmarks_api::services::xss_filter::filter_xss;
///
/// assert_eq!(filter_xss("<script>x</script>"), "&lt;script&gt;x&lt;/script&gt;");
/// assert_eq!(filter_xss("<b onclick=\"x()\">hi</b>"), "<b>hi</b>");
/// ```
pub fn filter_xss(input: &str) -> String {
    let input = strip_comments(input);
    let mut out = String::with_capacity(input.len());
    let mut rest = input.as_str();

    while let Some(open) = rest.find('<') {
        out.push_str(&escape_text(&rest[..open]));
        let candidate = &rest[open..];
        match tag_end(candidate) {
            TagEnd::Closed(end) => {
                out.push_str(&filter_tag(&candidate[..=end]));
                rest = &candidate[end + 1..];
            }
            TagEnd::Restart(next) => {
                out.push_str(&escape_text(&candidate[..next]));
                rest = &candidate[next..];
            }
            TagEnd::Unterminated => {
                out.push_str(&escape_text(candidate));
                rest = "";
            }
        }
    }
    out.push_str(&escape_text(rest));
    out
}

/// Escapes angle brackets in plain text.
pub fn escape_text(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr_value(value: &str) -> String {
    escape_text(&value.replace('"', "&quot;"))
}

fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("<!--") {
        match rest[start + 4..].find("-->") {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + 4 + end + 3..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

enum TagEnd {
    /// Byte offset of the closing `>`.
    Closed(usize),
    /// Another `<` opened before this one closed; resume scanning there.
    Restart(usize),
    Unterminated,
}

/// Finds where the tag starting at `s[0] == '<'` ends, honouring quoted attribute values.
fn tag_end(s: &str) -> TagEnd {
    let mut quote: Option<char> = None;
    for (idx, ch) in s.char_indices().skip(1) {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' if preceded_by_equals(&s[..idx]) => quote = Some(ch),
                '>' => return TagEnd::Closed(idx),
                '<' => return TagEnd::Restart(idx),
                _ => {}
            },
        }
    }
    TagEnd::Unterminated
}

fn preceded_by_equals(before: &str) -> bool {
    before.trim_end().ends_with('=')
}

fn allowed_attributes(tag: &str) -> Option<&'static [&'static str]> {
    WHITELIST
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, attrs)| *attrs)
}

/// Rewrites one complete `<...>` tag.
fn filter_tag(tag: &str) -> String {
    let inner = &tag[1..tag.len() - 1];
    let (closing, body) = match inner.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, inner),
    };

    let name_len = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    let name = body[..name_len].to_ascii_lowercase();
    let allowed = match allowed_attributes(&name) {
        Some(attrs) if !name.is_empty() => attrs,
        _ => return escape_text(tag),
    };

    if closing {
        return format!("</{name}>");
    }

    let attr_src = &body[name_len..];
    let self_closing = attr_src.trim_end().ends_with('/');

    let kept: Vec<String> = parse_attributes(attr_src)
        .into_iter()
        .filter(|(attr, _)| allowed.contains(&attr.as_str()))
        .map(|(attr, value)| {
            let value = safe_attr_value(&attr, &value);
            if value.is_empty() {
                attr
            } else {
                format!("{attr}=\"{value}\"")
            }
        })
        .collect();

    let mut out = format!("<{name}");
    if !kept.is_empty() {
        out.push(' ');
        out.push_str(&kept.join(" "));
    }
    if self_closing {
        out.push_str(" /");
    }
    out.push('>');
    out
}

/// Splits `name="value" name2='v' flag name3=bare` into lowercase names and raw values.
fn parse_attributes(src: &str) -> Vec<(String, String)> {
    let chars: Vec<char> = src.chars().collect();
    let mut attrs = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        while i < chars.len() && (chars[i].is_whitespace() || chars[i] == '/') {
            i += 1;
        }
        let name_start = i;
        while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '=' && chars[i] != '/' {
            i += 1;
        }
        if name_start == i {
            // Stray '=' or similar; skip it so the loop advances.
            i += 1;
            continue;
        }
        let name: String = chars[name_start..i].iter().collect::<String>().to_ascii_lowercase();

        let mut j = i;
        while j < chars.len() && chars[j].is_whitespace() {
            j += 1;
        }
        if j >= chars.len() || chars[j] != '=' {
            attrs.push((name, String::new()));
            continue;
        }
        j += 1;
        while j < chars.len() && chars[j].is_whitespace() {
            j += 1;
        }

        let value: String;
        if j < chars.len() && (chars[j] == '"' || chars[j] == '\'') {
            let quote = chars[j];
            let value_start = j + 1;
            let mut k = value_start;
            while k < chars.len() && chars[k] != quote {
                k += 1;
            }
            value = chars[value_start..k].iter().collect();
            i = (k + 1).min(chars.len());
        } else {
            let value_start = j;
            let mut k = value_start;
            while k < chars.len() && !chars[k].is_whitespace() {
                k += 1;
            }
            value = chars[value_start..k].iter().collect();
            i = k;
        }
        attrs.push((name, value));
    }
    attrs
}

fn safe_attr_value(attr: &str, value: &str) -> String {
    let value = value.trim();
    if attr == "href" || attr == "src" {
        let lower = value.to_ascii_lowercase();
        if !SAFE_URL_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
            return String::new();
        }
    }
    escape_attr_value(value)
}
