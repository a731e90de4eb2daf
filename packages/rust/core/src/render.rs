//! Course page template.
//!
//! Wraps an extracted fragment in the site's fixed page skeleton. Only the
//! title, the breadcrumb group label and the content vary between pages.

/// Indentation of content inside `<main class="lab-content">`.
const CONTENT_INDENT: &str = "            ";

/// Render a complete page document.
pub fn render_page(title: &str, group: &str, fragment: &str) -> String {
    let content = wrap_fragment(fragment);
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Remote Sensing Course</title>
    <link rel="stylesheet" href="../../css/style.css">
</head>
<body>
    <div class="container">
        <nav class="breadcrumb">
            <a href="../../index.html">Home</a> &gt; <a href="../../index.html#schedule">Schedule</a> &gt; {group}
        </nav>

        <header class="lab-header">
            <h1>{title}</h1>
        </header>

        <main class="lab-content">
{content}
        </main>

        <footer>
            <p><a href="../../index.html">← Back to Course Home</a></p>
            <p><strong>Remote Sensing with Google Earth Engine</strong></p>
        </footer>
    </div>
</body>
</html>
"##
    )
}

/// Put a fragment in a `<section>` unless it already starts with one.
///
/// Already-sectioned content is trusted as-is and only re-indented line by line.
pub fn wrap_fragment(fragment: &str) -> String {
    if fragment.starts_with("<section") {
        fragment
            .split('\n')
            .map(|line| format!("{CONTENT_INDENT}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        format!("{CONTENT_INDENT}<section>\n{fragment}\n{CONTENT_INDENT}</section>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn wraps_unsectioned_fragment() {
        assert_eq!(
            wrap_fragment("<p>Hello</p>"),
            "            <section>\n<p>Hello</p>\n            </section>"
        );
    }

    #[test]
    fn reindents_sectioned_fragment() {
        let fragment = "<section class=\"intro\">\n<p>Hi</p>\n</section>";
        assert_eq!(
            wrap_fragment(fragment),
            "            <section class=\"intro\">\n            <p>Hi</p>\n            </section>"
        );
    }

    #[test]
    fn wraps_empty_fragment() {
        assert_eq!(
            wrap_fragment(""),
            "            <section>\n\n            </section>"
        );
    }

    #[test]
    fn page_interpolates_title_and_group() {
        let page = render_page("Variables", "Week 1", "<p>Body</p>");
        assert!(page.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(page.contains("<title>Variables | Remote Sensing Course</title>"));
        assert!(page.contains("<h1>Variables</h1>"));
        assert!(page.contains("Schedule</a> &gt; Week 1\n"));
        assert!(page.contains("<p>Body</p>"));
        assert!(page.ends_with("</html>\n"));
    }

    #[test]
    fn template_text_is_invariant() {
        let a = render_page("Alpha Page", "Week 0", "<p>x</p>");
        let b = render_page("Beta Page", "Week 12", "<p>longer content</p>");

        let strip = |page: &str, title: &str, group: &str, content: &str| {
            page.replace(content, "{content}")
                .replace(title, "{title}")
                .replace(group, "{group}")
        };
        assert_eq!(
            strip(&a, "Alpha Page", "Week 0", "<p>x</p>"),
            strip(&b, "Beta Page", "Week 12", "<p>longer content</p>")
        );
    }

    #[test]
    fn page_structure_parses() {
        let page = render_page("T", "Week 0", "<p>Hello</p>");
        let doc = Html::parse_document(&page);

        let content = Selector::parse("main.lab-content > section > p").unwrap();
        let p = doc.select(&content).next().expect("content paragraph");
        assert_eq!(p.text().collect::<String>(), "Hello");

        let stylesheet = Selector::parse("link[rel=stylesheet]").unwrap();
        let link = doc.select(&stylesheet).next().expect("stylesheet");
        assert_eq!(link.value().attr("href"), Some("../../css/style.css"));

        let footer = Selector::parse("footer strong").unwrap();
        assert_eq!(
            doc.select(&footer).next().unwrap().text().collect::<String>(),
            "Remote Sensing with Google Earth Engine"
        );
    }
}
