use serde::{Deserialize, Serialize};

/// Popup bound to a marker; the content is an HTML fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub content: String,
    /// Offset of the popup tip relative to the marker's icon anchor
    pub offset: (i32, i32),
}

impl Popup {
    pub fn new(content: String) -> Self {
        Self {
            content,
            offset: (0, 0),
        }
    }

    pub fn with_offset(mut self, offset: (i32, i32)) -> Self {
        self.offset = offset;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Escapes text for inclusion in HTML markup
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(escape_html("<b>\"x\"</b>"), "&lt;b&gt;&quot;x&quot;&lt;/b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_popup_offset() {
        let popup = Popup::new("<b>Berlin</b>".to_string()).with_offset((1, -34));
        assert_eq!(popup.offset, (1, -34));
        assert!(!popup.is_empty());
    }
}
