use html5_core::dom::{Dom, ElementData, NodeId, NodeKind};
use html5_core::Options;
use std::collections::VecDeque;
use std::io::{self, Write};

/// Invisible separator character to ensure proper Markdown formatting
const SEP: &str = "\u{2063}";

/// Converts a parsed HTML tree to Markdown
pub struct HtmlToMarkdown {
    /// Current line buffer before indentation and prefixing
    line: String,

    /// Store type of every open un/ordered list and its counter
    ol_counts: Vec<(String, usize)>,

    /// Temporarily stores last `<a>`'s attributes
    last_attrs: Option<Vec<(String, String)>>,

    /// Trap for link content during processing
    link_swap: String,

    /// Tracks nested emphasis depth
    em_depth: i32,

    /// Tracks nested strong depth
    strong_depth: i32,

    /// Base URL for resolving relative links
    base_url: String,

    /// Approximate maximum line width
    width: usize,
}

impl HtmlToMarkdown {
    /// Creates a new HtmlToMarkdown converter.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL for the page, if provided, otherwise inferred from the HTML
    /// * `width` - Approximate max line length (default: 80)
    fn new(base_url: &str, width: usize) -> Self {
        Self {
            line: String::new(),
            ol_counts: Vec::new(),
            last_attrs: None,
            link_swap: String::new(),
            em_depth: 0,
            strong_depth: 0,
            base_url: base_url.to_string(),
            width,
        }
    }

    /// Parses `html` and writes its Markdown rendering to `writer`.
    fn convert<W: Write>(&mut self, html: &[u8], writer: &mut W) -> io::Result<()> {
        let result = html5_core::parse_bytes(html, Options::new());
        let mut breadcrumbs = Vec::new();
        self.walk(&result.dom, result.dom.document, &mut breadcrumbs, writer)?;
        self.flush_line(&[], writer)
    }

    /// Converts HTML to Markdown, writing the result to `writer`.
    pub fn convert_to_writer<W: Write>(
        html: &[u8],
        writer: &mut W,
        base_url: &str,
        width: usize,
    ) -> io::Result<()> {
        let mut converter = HtmlToMarkdown::new(base_url, width);
        converter.convert(html, writer)
    }

    /// Converts HTML to Markdown, returning the result as bytes.
    pub fn convert_to_vec(html: &[u8], base_url: &str, width: usize) -> io::Result<Vec<u8>> {
        let mut converter = HtmlToMarkdown::new(base_url, width);
        let mut v = Vec::new();
        converter.convert(html, &mut v)?;
        Ok(v)
    }

    /// Depth-first walk over the parsed tree. `breadcrumbs` holds the tag
    /// names of open ancestors (excluding the implicit `html`/`body` root),
    /// mirroring the reference processor's tag-open/tag-close token pairs
    /// with a pre-order visit and a post-order visit per element.
    fn walk<W: Write>(
        &mut self,
        dom: &Dom,
        node: NodeId,
        breadcrumbs: &mut Vec<String>,
        writer: &mut W,
    ) -> io::Result<()> {
        match &dom.node(node).kind {
            NodeKind::Text(text) => {
                if text.is_empty() {
                    return Ok(());
                }
                if text.trim().is_empty() && text.contains('\n') {
                    return Ok(());
                }
                let in_pre = breadcrumbs.iter().any(|t| t == "pre");
                let text = if in_pre {
                    text.clone()
                } else {
                    Self::escape_ascii_punctuation(text)
                };
                self.append_with_normalization(&text, in_pre);
                Ok(())
            }
            NodeKind::Element(_) => {
                let el = dom.node(node).as_element().unwrap().clone();
                let tag = el.name.as_str().to_string();
                let skip_breadcrumb = tag == "html" || tag == "body";

                self.handle_tag(&tag, false, &el, breadcrumbs, writer)?;
                if !skip_breadcrumb {
                    breadcrumbs.push(tag.clone());
                }

                let children: Vec<NodeId> = dom.children(node).collect();
                for child in children {
                    self.walk(dom, child, breadcrumbs, writer)?;
                }

                if !skip_breadcrumb {
                    breadcrumbs.pop();
                }
                self.handle_tag(&tag, true, &el, breadcrumbs, writer)
            }
            _ => {
                let children: Vec<NodeId> = dom.children(node).collect();
                for child in children {
                    self.walk(dom, child, breadcrumbs, writer)?;
                }
                Ok(())
            }
        }
    }

    /// Dispatches a single tag-open or tag-close event. Mirrors the
    /// reference's per-token match over tag names, just keyed on a plain
    /// `&str` rather than an enum variant (this crate's `TagName` doesn't
    /// carry one).
    fn handle_tag<W: Write>(
        &mut self,
        tag: &str,
        is_closer: bool,
        el: &ElementData,
        breadcrumbs: &[String],
        writer: &mut W,
    ) -> io::Result<()> {
        match tag {
            "a" => {
                if is_closer {
                    if let Some(ref attrs) = self.last_attrs {
                        let href = attrs
                            .iter()
                            .find(|(name, _)| name == "href")
                            .map(|(_, value)| value.clone())
                            .unwrap_or_default();

                        let url = Self::to_url(&href, &self.base_url);
                        let url = Self::escape_ascii_punctuation(&url);
                        let link_label = trim_string(&self.line);
                        self.line = self.link_swap.clone();

                        let title = attrs
                            .iter()
                            .find(|(name, _)| name == "title")
                            .map(|(_, value)| {
                                format!(" \"{}\"", Self::escape_ascii_punctuation(value))
                            })
                            .unwrap_or_default();

                        if url.is_empty() {
                            self.append(&link_label);
                        } else {
                            self.append(&format!("[{link_label}]({url}{title})"));
                        }
                    }
                } else {
                    self.last_attrs = Some(
                        ["href", "title"]
                            .iter()
                            .filter_map(|name| el.attribute(name).map(|v| (name.to_string(), v.to_string())))
                            .collect(),
                    );
                    self.link_swap = self.line.clone();
                    self.line.clear();
                }
            }

            "b" | "strong" => {
                self.strong_depth += if is_closer { -1 } else { 1 };
                if (self.strong_depth == 1 && !is_closer) || (self.strong_depth == 0 && is_closer) {
                    let left_flank = if is_closer { "" } else { SEP };
                    let right_flank = if is_closer { SEP } else { "" };
                    self.append(&format!("{left_flank}**{right_flank}"));
                }
            }

            "base" => {
                if !is_closer && self.base_url.is_empty() {
                    if let Some(href) = el.attribute("href") {
                        let href = href.trim();
                        if !href.is_empty() {
                            self.base_url = Self::to_url(href, &self.base_url);
                        }
                    }
                }
            }

            "br" => {
                if !is_closer {
                    if !self.line.is_empty() {
                        self.append("  ");
                    }
                    self.flush_line(breadcrumbs, writer)?;
                }
            }

            "code" => {
                let in_pre = breadcrumbs.iter().any(|t| t == "pre");
                if in_pre {
                    if is_closer {
                        self.flush_line(breadcrumbs, writer)?;
                        self.append("```");
                        self.flush_line(breadcrumbs, writer)?;
                    } else {
                        self.append("```");

                        let mut lang = String::new();
                        if let Some(class_list) = el.attribute("class") {
                            for class_name in class_list.split_whitespace() {
                                let class_name = class_name.to_lowercase();
                                if let Some(stripped) = class_name.strip_prefix("language-") {
                                    lang = stripped.to_string();
                                    break;
                                }
                                if KNOWN_LANGUAGES.contains(&class_name.as_str()) {
                                    lang = class_name;
                                    break;
                                }
                            }
                        }

                        if lang.is_empty() {
                            for attr_name in [
                                "data-lang",
                                "data-language",
                                "data-codetag",
                                "syntax",
                                "data-programming-language",
                                "type",
                            ] {
                                if let Some(attr_value) = el.attribute(attr_name) {
                                    let attr_str = attr_value.trim().to_string();
                                    if KNOWN_LANGUAGES.contains(&attr_str.as_str()) {
                                        lang = attr_str;
                                        break;
                                    }
                                }
                            }
                        }

                        let lang = lang.trim().to_string();
                        if !lang.is_empty() && !lang.ends_with('`') {
                            self.append(&lang);
                        }
                        self.append("\n");
                    }
                } else if !is_closer {
                    self.append("`");
                }
            }

            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                if is_closer {
                    self.line = trim_string(&self.line);
                    self.flush_line(breadcrumbs, writer)?;
                } else {
                    self.append("\n");
                    self.flush_line(breadcrumbs, writer)?;
                    let level: usize = tag[1..].parse().unwrap_or(1);
                    self.append(&format!("{} ", "#".repeat(level)));
                }
            }

            "hr" => {
                if !is_closer {
                    self.flush_line(breadcrumbs, writer)?;
                    self.append("***"); // avoids clashing with setext headings, which use '-'
                    self.flush_line(breadcrumbs, writer)?;
                }
            }

            "i" | "em" => {
                self.em_depth += if is_closer { -1 } else { 1 };
                if (self.em_depth == 1 && !is_closer) || (self.em_depth == 0 && is_closer) {
                    let left_flank = if is_closer { "" } else { SEP };
                    let right_flank = if is_closer { SEP } else { "" };
                    self.append(&format!("{left_flank}_{right_flank}"));
                }
            }

            "img" if !is_closer => {
                let alt = el.attribute("alt").unwrap_or("").to_string();
                let src = el.attribute("src").unwrap_or("").trim().to_string();

                let url = Self::to_url(&src, &self.base_url);
                let url = Self::escape_ascii_punctuation(&url);

                let title = match el.attribute("title") {
                    Some(title) if !title.is_empty() => {
                        format!(" \"{}\"", Self::escape_ascii_punctuation(title))
                    }
                    _ => String::new(),
                };

                self.append(&format!("![{alt}]({url}{title})"));
            }

            "li" => {
                if !is_closer {
                    self.flush_line(breadcrumbs, writer)?;
                    if let Some(last) = self.ol_counts.last_mut() {
                        last.1 += 1;
                    }
                }
            }

            "ol" => {
                self.flush_line(breadcrumbs, writer)?;
                if is_closer {
                    self.ol_counts.pop();
                } else {
                    self.ol_counts.push(("decimal".to_string(), 0));
                }
            }

            "ul" => {
                self.flush_line(breadcrumbs, writer)?;
                if is_closer {
                    self.ol_counts.pop();
                } else {
                    self.ol_counts.push(("-".to_string(), 0));
                }
            }

            "blockquote" | "p" => {
                self.flush_line(breadcrumbs, writer)?;
            }

            _ => {}
        }
        Ok(())
    }

    /// Escapes ASCII punctuation characters in plaintext
    fn escape_ascii_punctuation(plaintext: &str) -> String {
        // Special case for URLs in links/images - don't escape the standard URL characters
        if plaintext.starts_with("http://")
            || plaintext.starts_with("https://")
            || plaintext.starts_with("mailto:")
        {
            return plaintext.to_string();
        }

        let mut result = String::with_capacity(plaintext.len() * 2);
        for c in plaintext.chars() {
            if "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~".contains(c) {
                result.push('\\');
            }
            result.push(c);
        }
        result
    }

    /// Returns a list marker for the specified list type and position
    fn list_marker(list_type: &str, count: usize) -> String {
        match list_type {
            "-" => {
                // Alternate between *, +, and -
                let markers = ['*', '+', '-'];
                markers[count % 3].to_string()
            }
            "decimal" => {
                // Limit to 999,999,999 as per CommonMark spec
                let count = count.clamp(1, 999_999_999);
                format!("{count}.")
            }
            _ => String::new(),
        }
    }

    /// Normalizes URLs and joins base URL to relative paths
    fn to_url(href: &str, base_url: &str) -> String {
        // Protocol-relative URL
        if let Some(rest) = href.strip_prefix("//") {
            return format!("https://{rest}");
        }

        // Common URL schemes
        if href.starts_with("http://")
            || href.starts_with("https://")
            || href.starts_with("mailto:")
            || href.starts_with("ftp://")
            || href.starts_with("tel:")
            || href.starts_with("sms:")
        {
            return href.to_string();
        }

        // Handle absolute paths vs relative paths
        if let Some(path) = href.strip_prefix('/') {
            // It's an absolute path, use just the domain from base_url if available
            if !base_url.is_empty()
                && (base_url.starts_with("http://") || base_url.starts_with("https://"))
            {
                if let Some(domain_end) = base_url.find('/') {
                    return format!("{}/{path}", &base_url[0..domain_end]);
                }
                return format!("{base_url}/{path}");
            } else {
                return format!("/{path}");
            }
        }

        // Handle fragment-only URLs
        if href.starts_with('#') {
            return href.to_string();
        }

        // It's a relative path
        let base = if base_url.is_empty() { "/" } else { base_url };
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        format!("{base}{href}")
    }

    /// Appends text to the current line buffer, unmodified
    fn append(&mut self, chunk: &str) {
        self.line.push_str(chunk);
    }

    /// Appends text to the current line buffer, normalizing runs of
    /// whitespace to a single space unless inside `<pre>`.
    fn append_with_normalization(&mut self, chunk: &str, in_pre: bool) {
        if in_pre {
            self.line.push_str(chunk);
            return;
        }

        let normalized = chunk
            .replace(['\t', ' '], " ")
            .replace("\n\n", "\n");
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        self.line.push_str(&normalized);
    }

    /// Flushes the current line to the output markdown
    fn flush_line<W: Write>(&mut self, breadcrumbs: &[String], writer: &mut W) -> io::Result<()> {
        let mut first_prefix = String::new();
        let mut line_prefix = String::new();
        let mut in_pre = false;
        let mut no_newlines = false;
        let mut list_depth = 0;

        // Block-level elements create line prefixes
        for tag in breadcrumbs {
            match tag.as_str() {
                "blockquote" => {
                    first_prefix.push_str("> ");
                    line_prefix.push_str("> ");
                }

                "code" => {
                    if in_pre {
                        first_prefix.push_str("    ");
                        line_prefix.push_str("    ");
                    }
                }

                "li" => {
                    if list_depth == 0 {
                        continue;
                    }

                    let list_idx = list_depth - 1;
                    if list_idx >= self.ol_counts.len() {
                        continue;
                    }

                    let (list_type, count) = &self.ol_counts[list_idx];

                    let marker = Self::list_marker(
                        list_type,
                        if list_type == "-" { list_depth } else { *count },
                    );

                    let indent = " ".repeat(marker.chars().count());

                    if list_depth != self.ol_counts.len() {
                        first_prefix.push_str(&format!("{marker} "));
                    } else {
                        first_prefix.push_str(&format!("{indent} "));
                    }

                    line_prefix.push_str(&format!("{indent} "));
                }

                "pre" => in_pre = true,

                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => no_newlines = true,

                "ol" | "ul" => list_depth += 1,

                _ => {}
            }
        }

        if !in_pre {
            self.line = self
                .line
                .trim_matches(|c| c == ' ' || c == '\t')
                .to_string();
        }

        if no_newlines {
            writer.write_all(format!("{first_prefix}{}\n", self.line).as_bytes())?;
            self.line.clear();
            return Ok(());
        }

        // Simple word wrapping
        if !self.line.is_empty() {
            let mut current_line = first_prefix.clone();
            let mut current_length = first_prefix.chars().count();
            let prefix_length = line_prefix.chars().count();

            let words: VecDeque<&str> = self.line.split_whitespace().collect();

            if !words.is_empty() {
                for (i, word) in words.iter().enumerate() {
                    let word_length = word.chars().count();

                    // Keep trailing punctuation on the same line
                    let is_punctuation = word.trim().chars().all(|c| ",.?!".contains(c));

                    if word_length + current_length > self.width && !is_punctuation && i > 0 {
                        writer.write_all(format!("{current_line}\n").as_bytes())?;
                        current_line = format!("{line_prefix}{word}");
                        current_length = prefix_length + word_length;
                    } else {
                        if !current_line.is_empty() && !current_line.ends_with(' ') {
                            current_line.push(' ');
                            current_length += 1;
                        }
                        current_line.push_str(word);
                        current_length += word_length;
                    }
                }

                writer.write_all(format!("{current_line}\n").as_bytes())?;
            } else {
                writer.write_all(b"\n")?;
            }
        } else {
            writer.write_all(b"\n")?;
        }

        self.line.clear();
        Ok(())
    }
}

/// Trims whitespace from a string
fn trim_string(s: &str) -> String {
    s.trim().to_string()
}

/// List of known programming languages for code block detection
const KNOWN_LANGUAGES: [&str; 62] = [
    "apl",
    "asm",
    "assembly",
    "bash",
    "c",
    "c#",
    "c++",
    "clojure",
    "cobol",
    "cpp",
    "csharp",
    "css",
    "d",
    "dart",
    "elixir",
    "elm",
    "erlang",
    "f#",
    "fish",
    "fortran",
    "fsharp",
    "go",
    "groovy",
    "guile",
    "haskell",
    "html",
    "java",
    "javascript",
    "js",
    "julia",
    "kotlin",
    "less",
    "lisp",
    "lua",
    "matlab",
    "objectivec",
    "objective-c",
    "ocaml",
    "perl",
    "php",
    "powershell",
    "python",
    "python2",
    "python3",
    "r",
    "racket",
    "raku",
    "ruby",
    "rust",
    "sass",
    "scala",
    "scheme",
    "sgml",
    "sh",
    "shell",
    "sql",
    "swift",
    "typescript",
    "ts",
    "vba",
    "xml",
    "zsh",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_basic_formatting() {
        let html = br#"<p><strong>Bold</strong> and <em>italic</em> text</p>"#;
        let expected = "**Bold** and _italic_ text";

        let result = HtmlToMarkdown::convert_to_vec(html, "", 80).unwrap();
        assert_eq!(String::from_utf8_lossy(&result), expected);
    }

    #[test]
    fn test_convert_links() {
        let html = br#"<p>Check out <a href="https://example.com">this website</a></p>"#;
        let expected = "Check out [this website](https://example.com)";

        let result = HtmlToMarkdown::convert_to_vec(html, "", 80).unwrap();
        assert_eq!(String::from_utf8_lossy(&result), expected);
    }

    #[test]
    fn test_convert_headings() {
        let html = br#"<h1>Title</h1><h2>Subtitle</h2>"#;
        let expected = "# Title\n\n## Subtitle";

        let result = HtmlToMarkdown::convert_to_vec(html, "", 80).unwrap();
        assert_eq!(String::from_utf8_lossy(&result), expected);
    }

    #[test]
    fn test_convert_image() {
        let html = br#"<img src="image.jpg" alt="Image description">"#;
        let expected = "![Image description](/image.jpg)";

        let result = HtmlToMarkdown::convert_to_vec(html, "", 80).unwrap();
        assert_eq!(String::from_utf8_lossy(&result), expected);
    }
}
