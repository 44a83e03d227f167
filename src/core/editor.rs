use crate::domain::ports::RichTextEditor;
use crate::utils::error::{PbnError, Result};
use std::future::Future;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Unloaded,
    Loading,
    Ready,
    Failed(String),
}

/// Editor capability that is only materialized on first use.
///
/// Content written before the editor is ready is buffered and handed over
/// once loading succeeds. Reading HTML before that is an `EditorUnavailable`
/// error, so a form cannot submit an empty body by accident.
pub struct LazyEditor<E: RichTextEditor> {
    state: EditorState,
    editor: Option<E>,
    pending: Option<String>,
}

impl<E: RichTextEditor> Default for LazyEditor<E> {
    fn default() -> Self {
        Self {
            state: EditorState::Unloaded,
            editor: None,
            pending: None,
        }
    }
}

impl<E: RichTextEditor> LazyEditor<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == EditorState::Ready
    }

    /// Moves to `Loading`. Returns false when a load is running or already done.
    pub fn begin_load(&mut self) -> bool {
        match self.state {
            EditorState::Unloaded | EditorState::Failed(_) => {
                self.state = EditorState::Loading;
                true
            }
            EditorState::Loading | EditorState::Ready => false,
        }
    }

    pub fn finish_load(&mut self, loaded: Result<E>) {
        match loaded {
            Ok(mut editor) => {
                if let Some(raw) = self.pending.take() {
                    editor.set_content(&raw);
                }
                tracing::debug!("Editor '{}' ready", editor.name());
                self.editor = Some(editor);
                self.state = EditorState::Ready;
            }
            Err(e) => {
                tracing::warn!("⚠️ Editor failed to load: {}", e);
                self.state = EditorState::Failed(e.to_string());
            }
        }
    }

    /// Runs `loader` unless the editor is already loading or ready.
    pub async fn load<F, Fut>(&mut self, loader: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<E>>,
    {
        if !self.begin_load() {
            return match &self.state {
                EditorState::Ready => Ok(()),
                _ => Err(PbnError::Busy {
                    operation: "editor loading".to_string(),
                }),
            };
        }
        self.finish_load(loader().await);
        match &self.state {
            EditorState::Failed(message) => Err(PbnError::EditorUnavailable {
                message: message.clone(),
            }),
            _ => Ok(()),
        }
    }

    pub fn set_content(&mut self, raw: &str) {
        match self.editor.as_mut() {
            Some(editor) => editor.set_content(raw),
            None => self.pending = Some(raw.to_string()),
        }
    }

    pub fn to_html(&self) -> Result<String> {
        match (&self.state, &self.editor) {
            (EditorState::Ready, Some(editor)) => Ok(editor.to_html()),
            (EditorState::Failed(message), _) => Err(PbnError::EditorUnavailable {
                message: message.clone(),
            }),
            _ => Err(PbnError::EditorUnavailable {
                message: "Loading editor...".to_string(),
            }),
        }
    }
}

/// Terminal editor: HTML is kept as typed, plain text becomes `<p>` paragraphs.
#[derive(Debug, Clone, Default)]
pub struct HtmlEditor {
    html: String,
}

impl HtmlEditor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RichTextEditor for HtmlEditor {
    fn name(&self) -> &str {
        "html"
    }

    fn set_content(&mut self, raw: &str) {
        let trimmed = raw.trim();
        self.html = if trimmed.starts_with('<') {
            trimmed.to_string()
        } else {
            plain_text_to_html(trimmed)
        };
    }

    fn to_html(&self) -> String {
        self.html.clone()
    }
}

fn plain_text_to_html(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| {
            let lines: Vec<String> = paragraph.lines().map(|l| escape_html(l.trim())).collect();
            format!("<p>{}</p>", lines.join("<br>"))
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_becomes_paragraphs() {
        let mut editor = HtmlEditor::new();
        editor.set_content("Apa itu PBN?\nJaringan blog.\n\nHarga < 1 juta & cepat");
        assert_eq!(
            editor.to_html(),
            "<p>Apa itu PBN?<br>Jaringan blog.</p><p>Harga &lt; 1 juta &amp; cepat</p>"
        );
    }

    #[test]
    fn test_html_passes_through() {
        let mut editor = HtmlEditor::new();
        editor.set_content("  <h2>Judul</h2><p>Isi</p>\n");
        assert_eq!(editor.to_html(), "<h2>Judul</h2><p>Isi</p>");
        assert!(!editor.is_empty());

        editor.set_content("   ");
        assert!(editor.is_empty());
    }

    #[test]
    fn test_lazy_editor_buffers_content_until_ready() {
        let mut lazy: LazyEditor<HtmlEditor> = LazyEditor::new();
        lazy.set_content("Halo");
        assert!(matches!(lazy.to_html(), Err(PbnError::EditorUnavailable { .. })));

        assert!(lazy.begin_load());
        assert_eq!(lazy.state(), &EditorState::Loading);
        assert!(!lazy.begin_load());

        lazy.finish_load(Ok(HtmlEditor::new()));
        assert!(lazy.is_ready());
        assert_eq!(lazy.to_html().unwrap(), "<p>Halo</p>");
    }

    #[tokio::test]
    async fn test_failed_load_can_be_retried() {
        let mut lazy: LazyEditor<HtmlEditor> = LazyEditor::new();

        let failed = lazy
            .load(|| async {
                Err(PbnError::EditorUnavailable {
                    message: "chunk missing".to_string(),
                })
            })
            .await;
        assert!(failed.is_err());
        assert!(matches!(lazy.state(), EditorState::Failed(_)));

        lazy.load(|| async { Ok(HtmlEditor::new()) }).await.unwrap();
        assert!(lazy.is_ready());

        // 已載入就不再呼叫 loader
        lazy.load(|| async {
            Err(PbnError::EditorUnavailable {
                message: "loader called twice".to_string(),
            })
        })
        .await
        .unwrap();
        assert!(lazy.is_ready());
    }
}
