use scraper::{Html, Selector};

use super::probe::SetupError;

/// Metadata pulled out of a fetched HTML document.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub title: Option<String>,
    pub meta_description: Option<String>,
}

/// Extracts the page title and the description meta tag.
///
/// Selectors are compiled once, so extraction itself cannot fail: html5ever
/// accepts any input. Only the first matching element counts, so a leading
/// `<meta name="description">` without content hides any later one. Empty
/// values are reported as absent.
#[derive(Debug, Clone)]
pub struct PageParser {
    title: Selector,
    description: Selector,
}

impl PageParser {
    pub fn new() -> Result<Self, SetupError> {
        Ok(Self {
            title: selector("title")?,
            description: selector(r#"meta[name="description"]"#)?,
        })
    }

    pub fn extract(&self, body: &str) -> PageInfo {
        let document = Html::parse_document(body);

        let title = document
            .select(&self.title)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());

        let meta_description = document
            .select(&self.description)
            .next()
            .and_then(|el| el.value().attr("content"))
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        PageInfo {
            title,
            meta_description,
        }
    }
}

fn selector(css: &str) -> Result<Selector, SetupError> {
    Selector::parse(css).map_err(|e| SetupError::Selector(format!("`{css}`: {e}")))
}
