//! Cover page block prepended to a transformed document.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::html::{escape_html, markup};

/// Title page fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverPage {
    /// Institution name
    pub university: String,
    /// Course or department
    pub course: String,
    /// Document title
    pub title: String,
    /// Author name
    pub student: String,
    /// Free-form date line
    pub date: String,
}

impl CoverPage {
    /// Create a cover page with a title and today's date.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: Self::format_date(Local::now().date_naive()),
            ..Default::default()
        }
    }

    /// Set the institution name.
    pub fn with_university(mut self, university: impl Into<String>) -> Self {
        self.university = university.into();
        self
    }

    /// Set the course line.
    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        self.course = course.into();
        self
    }

    /// Set the author name.
    pub fn with_student(mut self, student: impl Into<String>) -> Self {
        self.student = student.into();
        self
    }

    /// Set the date line.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Long-form date, e.g. "March 9, 2024".
    pub fn format_date(date: NaiveDate) -> String {
        date.format("%B %-d, %Y").to_string()
    }

    /// Render the cover page block.
    ///
    /// The block is non-editable and starts with the `cover-page` wrapper,
    /// which re-transforming the combined markup passes through untouched.
    pub fn render_html(&self) -> String {
        format!(
            "<div class=\"{}\" contenteditable=\"false\">\n\
             \x20 <h2 class=\"text-xl uppercase tracking-widest mb-2 opacity-60\">{}</h2>\n\
             \x20 <h3 class=\"text-lg font-medium mb-12 opacity-50\">{}</h3>\n\
             \x20 <h1 class=\"text-5xl font-extrabold mb-8 leading-tight\">{}</h1>\n\
             \x20 <div class=\"inline-block border-t border-slate-300 w-24 mb-8\"></div>\n\
             \x20 <p class=\"text-xl font-medium mb-2\">{}</p>\n\
             \x20 <p class=\"text-slate-500\">{}</p>\n\
             </div>",
            markup::COVER_PAGE,
            escape_html(&self.university),
            escape_html(&self.course),
            escape_html(&self.title),
            escape_html(&self.student),
            escape_html(&self.date)
        )
    }

    /// Prepend the cover page to markup.
    pub fn prepend_to(&self, markup: &str) -> String {
        if markup.is_empty() {
            return self.render_html();
        }
        format!("{}\n{}", self.render_html(), markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cover() -> CoverPage {
        CoverPage::default()
            .with_university("State U")
            .with_course("CS 101")
            .with_student("A. Student")
            .with_date("March 9, 2024")
    }

    #[test]
    fn test_render_escapes_fields() {
        let mut page = cover();
        page.title = "Cats & Dogs".to_string();
        let html = page.render_html();
        assert!(html.starts_with("<div class=\"cover-page "));
        assert!(html.contains("contenteditable=\"false\""));
        assert!(html.contains(">Cats &amp; Dogs</h1>"));
        assert!(html.contains("\n  <p class=\"text-slate-500\">March 9, 2024</p>\n"));
        assert!(html.ends_with("</div>"));
    }

    #[test]
    fn test_prepend() {
        let out = cover().prepend_to("<p>body</p>");
        assert!(out.starts_with("<div class=\"cover-page"));
        assert!(out.ends_with("</div>\n<p>body</p>"));
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(CoverPage::format_date(date), "March 9, 2024");
    }
}
