//! Shell template and template environment setup.
//!
//! Every page is rendered inside a shell that owns the document head and
//! places navigation above content. The shell exposes two blocks,
//! `navigation` and `content`; page fragments are injected into `content`
//! through template inheritance.

use std::sync::LazyLock;

use minijinja::{AutoEscape, Environment, Value};
use regex::Regex;

/// Name the shell is registered under. Not a valid manifest file name, so
/// it can't collide with a page.
pub(crate) const SHELL_NAME: &str = "folio:shell.html";

/// Built-in shell template.
pub const DEFAULT_SHELL: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{{ title|strip_tags }} - {{ site_title }}</title>
    <link rel="stylesheet" href="{{ stylesheet }}"/>
</head>
<body>
    <nav>
    {%- block navigation %}
    {%- if prev_url %}
        <a href="{{ prev_url }}">Previous</a>
    {%- endif %}
    {%- if next_url %}
        <a href="{{ next_url }}">Next</a>
    {%- endif %}
    {%- endblock %}
    </nav>
    <main>
{% block content %}{% endblock %}
    </main>
</body>
</html>
"#;

/// Opening or closing tag. A bare `<` followed by a space or digit is text.
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").unwrap());

/// Wrap a page fragment so it extends the shell and fills its `content` block.
pub(crate) fn wrap_fragment(fragment: &str) -> String {
    format!(
        "{{% extends {SHELL_NAME:?} %}}{{% block content %}}{fragment}{{% endblock %}}"
    )
}

/// Auto-escape HTML for markup outputs, nothing for anything else.
fn auto_escape_for(name: &str) -> AutoEscape {
    let lower = name.to_ascii_lowercase();
    if [".html", ".htm", ".xml", ".svg"]
        .iter()
        .any(|ext| lower.ends_with(ext))
    {
        AutoEscape::Html
    } else {
        AutoEscape::None
    }
}

/// Remove markup tags, for places like `<title>` that only take text.
fn strip_tags(value: &str) -> Value {
    Value::from_safe_string(TAG_PATTERN.replace_all(value, "").into_owned())
}

/// Create an environment with the shell registered under [`SHELL_NAME`].
pub(crate) fn site_environment(shell: &str) -> Result<Environment<'_>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(auto_escape_for);
    env.add_filter("strip_tags", strip_tags);
    env.add_template(SHELL_NAME, shell)?;
    Ok(env)
}
