// Rendered command output

use console_application::{Notice, NoticeLevel};

use crate::views::table::render_table;

/// One frame of output. Watch commands emit a new screen per refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Screen {
    pub title: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    /// Detail views: `(label, value)` pairs shown instead of a table.
    pub fields: Vec<(String, String)>,
    pub total_label: Option<String>,
    pub footer: Option<String>,
    pub notices: Vec<Notice>,
}

impl Screen {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self::titled(text)
    }

    pub fn with_table(mut self, headers: Vec<&'static str>, rows: Vec<Vec<String>>) -> Self {
        self.headers = headers;
        self.rows = rows;
        self
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total_label = Some(total.to_string());
        self
    }

    pub fn field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((label.into(), value.into()));
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn render(&self) -> String {
        let mut out = Vec::new();
        if !self.title.is_empty() {
            out.push(self.title.clone());
        }
        if !self.fields.is_empty() {
            let width = self
                .fields
                .iter()
                .map(|(label, _)| label.chars().count())
                .max()
                .unwrap_or(0);
            for (label, value) in &self.fields {
                out.push(format!("{label:<width$}  {value}"));
            }
        }
        if !self.headers.is_empty() {
            if self.rows.is_empty() {
                out.push("(no data)".to_string());
            } else {
                out.push(render_table(&self.headers, &self.rows));
            }
        }
        if let Some(total) = &self.total_label {
            out.push(format!("total: {total}"));
        }
        if let Some(footer) = &self.footer {
            out.push(footer.clone());
        }
        for notice in &self.notices {
            out.push(render_notice(notice));
        }
        out.join("\n")
    }
}

pub fn render_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warn",
        NoticeLevel::Error => "error",
    };
    format!("[{tag}] {}", notice.message)
}
