use axum::{extract::Query, response::Html};
use serde::Deserialize;

use crate::ui::{escape_html, Dropdown};

#[derive(Debug, Deserialize)]
pub struct DropdownQuery {
    pub selected: Option<String>,
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        body
    ))
}

pub fn job_category_dropdown() -> Dropdown {
    Dropdown::new("job-category", "Job category")
        .placeholder("Select a category")
        .option("engineering", "Engineering")
        .option("design", "Design")
        .option("marketing", "Marketing")
        .option("sales", "Sales")
        .option("operations", "Operations")
}

/// GET /
pub async fn index() -> Html<String> {
    page(
        "Job Board",
        "<h1>Job Board</h1>\n<ul>\n  <li><a href=\"/test-dropdown\">Dropdown test page</a></li>\n  <li><a href=\"/api/test-connection\">Backend connection test</a></li>\n</ul>\n",
    )
}

/// GET /test-dropdown - renders the dropdown component for manual checks
pub async fn test_dropdown(Query(query): Query<DropdownQuery>) -> Html<String> {
    let dropdown = job_category_dropdown().select(query.selected.as_deref());

    let status = match dropdown.selected_option() {
        Some(option) => format!(
            "<p id=\"selection\">Selected: {} ({})</p>\n",
            escape_html(&option.label),
            escape_html(&option.value)
        ),
        None => "<p id=\"selection\">Nothing selected</p>\n".to_string(),
    };

    let body = format!(
        "<h1>Dropdown test</h1>\n<form method=\"get\" action=\"/test-dropdown\">\n{}<button type=\"submit\">Apply</button>\n</form>\n{}",
        dropdown.render(),
        status
    );

    page("Dropdown test", &body)
}
