use crate::error::ResolveError;
use scraper::{Html, Selector};

fn selector(css: &str) -> Result<Selector, ResolveError> {
    Selector::parse(css).map_err(|e| ResolveError::HtmlParse(e.to_string()))
}

/// Look up the first `<meta property="og:{name}">` and return its `content`.
///
/// Only the first matching tag is considered; if it carries no `content`
/// attribute the property counts as absent.
fn opengraph_property(document: &Html, name: &str) -> Result<Option<String>, ResolveError> {
    let sel = selector(&format!(r#"meta[property="og:{name}"]"#))?;
    Ok(document
        .select(&sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(String::from))
}

/// Trim and fold every interior whitespace run (newlines included) into
/// one space, so a title always fits on a single chat line.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the display title of an HTML page.
///
/// `og:title` wins over `<title>`; an empty `og:title` falls back to
/// `<title>`. When `og:description` is present the result reads
/// `"<title> | <description>"`.
pub fn extract_title(html: &str) -> Result<String, ResolveError> {
    let document = Html::parse_document(html);

    let og_title = opengraph_property(&document, "title")?.filter(|t| !t.is_empty());
    let og_description = opengraph_property(&document, "description")?
        .map(|d| collapse_whitespace(&d))
        .filter(|d| !d.is_empty());

    let title = match og_title {
        Some(title) => title,
        None => {
            let sel = selector("title")?;
            let element = document.select(&sel).next().ok_or(ResolveError::NoTitle)?;
            element.text().collect::<String>()
        }
    };
    let title = collapse_whitespace(&title);

    let composed = match og_description {
        Some(description) => format!("{title} | {description}"),
        None => title,
    };

    if composed.is_empty() {
        return Err(ResolveError::NoTitle);
    }
    Ok(composed)
}
