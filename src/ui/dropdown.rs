#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

/// Server-rendered `<select>` with a label and optional placeholder
#[derive(Debug, Clone, Default)]
pub struct Dropdown {
    id: String,
    label: String,
    placeholder: Option<String>,
    options: Vec<DropdownOption>,
    selected: Option<String>,
}

impl Dropdown {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(DropdownOption {
            value: value.into(),
            label: label.into(),
        });
        self
    }

    /// Select `value` if it is one of the options; unknown values are ignored
    pub fn select(mut self, value: Option<&str>) -> Self {
        self.selected = value
            .filter(|v| self.options.iter().any(|o| o.value == *v))
            .map(str::to_string);
        self
    }

    pub fn selected_option(&self) -> Option<&DropdownOption> {
        let selected = self.selected.as_deref()?;
        self.options.iter().find(|o| o.value == selected)
    }

    pub fn render(&self) -> String {
        let id = escape_html(&self.id);
        let mut html = String::new();

        html.push_str(&format!("<label for=\"{}\">{}</label>\n", id, escape_html(&self.label)));
        html.push_str(&format!("<select id=\"{id}\" name=\"{id}\" class=\"dropdown\">\n"));

        if let Some(placeholder) = &self.placeholder {
            let selected = if self.selected.is_none() { " selected" } else { "" };
            html.push_str(&format!(
                "  <option value=\"\" disabled{}>{}</option>\n",
                selected,
                escape_html(placeholder)
            ));
        }

        for option in &self.options {
            let selected = if self.selected.as_deref() == Some(option.value.as_str()) {
                " selected"
            } else {
                ""
            };
            html.push_str(&format!(
                "  <option value=\"{}\"{}>{}</option>\n",
                escape_html(&option.value),
                selected,
                escape_html(&option.label)
            ));
        }

        html.push_str("</select>\n");
        html
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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
