//! The single-page form: sidebar inputs, status banner, embedded graph.

use kgraph_ingest::ACCEPTED_EXTENSIONS;

/// Height of the iframe that embeds the rendered graph, in pixels.
pub const GRAPH_FRAME_HEIGHT: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Upload,
    Text,
}

impl InputMode {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "text" => Self::Text,
            _ => Self::Upload,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Text => "text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }
}

/// Everything the page shows for one response.
#[derive(Debug, Clone, Default)]
pub struct PageView {
    pub mode: InputMode,
    /// Text to put back into the text area.
    pub text: String,
    pub banner: Option<Banner>,
    /// Source of the embedded graph, if one was just generated.
    pub graph_src: Option<String>,
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
  body { margin: 0; font-family: sans-serif; display: flex; min-height: 100vh; }
  #sidebar { width: 320px; padding: 16px; background: #f0f2f6; box-sizing: border-box; }
  #main { flex: 1; padding: 16px 32px; }
  textarea { width: 100%; height: 300px; box-sizing: border-box; }
  button { margin-top: 12px; padding: 8px 12px; }
  .banner { padding: 12px; border-radius: 4px; margin-bottom: 16px; }
  .banner.success { background: #d4edda; color: #155724; }
  .banner.warning { background: #fff3cd; color: #856404; }
  .banner.error { background: #f8d7da; color: #721c24; }
  iframe { width: 100%; border: none; }
  .hidden { display: none; }
"#;

const SCRIPT: &str = r#"
  (function () {
    var form = document.getElementById("generate-form");
    var file = document.getElementById("file");
    var text = document.getElementById("text");
    var button = document.getElementById("generate");
    function mode() {
      return form.querySelector("input[name=mode]:checked").value;
    }
    function refresh() {
      var m = mode();
      document.getElementById("upload-input").classList.toggle("hidden", m !== "upload");
      document.getElementById("text-input").classList.toggle("hidden", m !== "text");
      button.disabled = m === "upload"
        ? file.files.length === 0
        : text.value.trim().length === 0;
    }
    form.addEventListener("change", refresh);
    text.addEventListener("input", refresh);
    form.addEventListener("submit", function () {
      button.disabled = true;
      document.getElementById("progress").classList.remove("hidden");
    });
    refresh();
  })();
"#;

/// Render the whole page.
pub fn render(view: &PageView) -> String {
    let accept = ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",");
    let checked = |mode: InputMode| if view.mode == mode { " checked" } else { "" };

    let mut page = String::with_capacity(4096);
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<title>Knowledge Graph From Text</title>\n");
    page.push_str(&format!("<style>{}</style>\n", STYLE));
    page.push_str("</head>\n<body>\n<div id=\"sidebar\">\n");
    page.push_str(
        "<form id=\"generate-form\" method=\"post\" action=\"/generate\" \
         enctype=\"multipart/form-data\">\n<h3>Input</h3>\n",
    );
    for (mode, label) in [(InputMode::Upload, "Upload file"), (InputMode::Text, "Input text")] {
        page.push_str(&format!(
            "<label><input type=\"radio\" name=\"mode\" value=\"{}\"{}> {}</label><br>\n",
            mode.as_str(),
            checked(mode),
            label
        ));
    }
    page.push_str(&format!(
        "<div id=\"upload-input\"><p><input type=\"file\" id=\"file\" name=\"file\" \
         accept=\"{}\"></p></div>\n",
        accept
    ));
    page.push_str(&format!(
        "<div id=\"text-input\"><p><textarea id=\"text\" name=\"text\" \
         placeholder=\"Enter your text here\">{}</textarea></p></div>\n",
        escape_html(&view.text)
    ));
    page.push_str(
        "<button id=\"generate\" type=\"submit\" disabled>Generate Knowledge Graph</button>\n\
         <p id=\"progress\" class=\"hidden\">Generating knowledge graph...</p>\n</form>\n</div>\n",
    );

    page.push_str("<div id=\"main\">\n<h1>Knowledge Graph From Text</h1>\n");
    if let Some(banner) = &view.banner {
        let class = match banner.kind {
            BannerKind::Success => "success",
            BannerKind::Warning => "warning",
            BannerKind::Error => "error",
        };
        page.push_str(&format!(
            "<div class=\"banner {}\">{}</div>\n",
            class,
            escape_html(&banner.message)
        ));
    }
    if let Some(src) = &view.graph_src {
        page.push_str(&format!(
            "<iframe src=\"{}\" height=\"{}\"></iframe>\n",
            escape_html(src),
            GRAPH_FRAME_HEIGHT
        ));
    }
    page.push_str("</div>\n");
    page.push_str(&format!("<script>{}</script>\n</body>\n</html>\n", SCRIPT));
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form() {
        let page = render(&PageView::default());
        assert!(page.contains("accept=\".pdf,.docx,.txt\""));
        assert!(page.contains("value=\"upload\" checked"));
        assert!(page.contains("type=\"submit\" disabled>Generate Knowledge Graph"));
        assert!(!page.contains("<iframe"));
        assert!(!page.contains("class=\"banner"));
    }

    #[test]
    fn test_success_view_embeds_graph() {
        let page = render(&PageView {
            mode: InputMode::Text,
            text: "Alice & Bob".into(),
            banner: Some(Banner::success("Knowledge graph generated successfully!")),
            graph_src: Some("/graph?v=abc".into()),
        });
        assert!(page.contains("value=\"text\" checked"));
        assert!(page.contains(">Alice &amp; Bob</textarea>"));
        assert!(page.contains("banner success"));
        assert!(page.contains("<iframe src=\"/graph?v=abc\" height=\"1000\">"));
    }

    #[test]
    fn test_text_cannot_escape_textarea() {
        let page = render(&PageView {
            mode: InputMode::Text,
            text: "</textarea><script>alert(1)</script>".into(),
            ..Default::default()
        });
        assert!(page.contains("&lt;/textarea&gt;&lt;script&gt;"));
        assert_eq!(page.matches("</textarea>").count(), 1);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(InputMode::parse("text"), InputMode::Text);
        assert_eq!(InputMode::parse("upload"), InputMode::Upload);
        assert_eq!(InputMode::parse("other"), InputMode::Upload);
    }
}
