//! Page rendering.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use folio_config::{Manifest, PageEntry};
use minijinja::{Value, context};
use rayon::prelude::*;

use crate::error::BuildError;
use crate::template::{site_environment, wrap_fragment};

/// Renders manifest pages into the shell template.
pub(crate) struct PageRenderer<'a> {
    shell: &'a str,
    site_title: &'a str,
    stylesheet: &'a str,
}

impl<'a> PageRenderer<'a> {
    pub(crate) fn new(shell: &'a str, site_title: &'a str, stylesheet: &'a str) -> Self {
        Self {
            shell,
            site_title,
            stylesheet,
        }
    }

    /// Render every manifest page from `input_dir` into `output_dir`.
    ///
    /// All page sources are read up front, in manifest order, so a missing
    /// page fails the phase before any page is written. Rendering then runs
    /// in parallel; each page only depends on its manifest index.
    ///
    /// A source listed more than once is written once, with the navigation
    /// of its last manifest entry. Returns the number of files written.
    pub(crate) fn render_all(
        &self,
        manifest: &Manifest,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<usize, BuildError> {
        let pages = manifest.pages();
        let sources = pages
            .iter()
            .map(|page| read_fragment(input_dir, page))
            .collect::<Result<Vec<_>, _>>()?;

        let mut env = site_environment(self.shell).map_err(|source| BuildError::Template {
            page: "shell".to_owned(),
            source,
        })?;
        for (page, fragment) in pages.iter().zip(&sources) {
            env.add_template(&page.source, fragment)
                .map_err(|source| BuildError::Template {
                    page: page.source.clone(),
                    source,
                })?;
        }

        let targets = last_occurrences(pages);
        targets.par_iter().try_for_each(|&index| {
            let page = &pages[index];
            let nav = manifest.navigation(index);
            let html = env
                .get_template(&page.source)
                .and_then(|template| {
                    template.render(context! {
                        title => Value::from_safe_string(page.title.clone()),
                        prev_url => nav.prev_url.unwrap_or_default(),
                        next_url => nav.next_url.unwrap_or_default(),
                        site_title => self.site_title,
                        stylesheet => self.stylesheet,
                    })
                })
                .map_err(|source| BuildError::Template {
                    page: page.source.clone(),
                    source,
                })?;

            let dest = output_dir.join(&page.source);
            fs::write(&dest, html).map_err(BuildError::io(&dest))?;
            tracing::debug!(page = %page.source, index, "Rendered page");
            Ok::<(), BuildError>(())
        })?;

        Ok(targets.len())
    }
}

/// Indices of the manifest entries whose source isn't listed again later.
fn last_occurrences(pages: &[PageEntry]) -> Vec<usize> {
    let mut seen = HashSet::new();
    let mut indices: Vec<usize> = (0..pages.len())
        .rev()
        .filter(|&index| seen.insert(pages[index].source.as_str()))
        .collect();
    indices.reverse();
    indices
}

/// Read a page fragment and wrap it into the shell.
fn read_fragment(input_dir: &Path, page: &PageEntry) -> Result<String, BuildError> {
    let path = input_dir.join(&page.source);
    if !path.is_file() {
        return Err(BuildError::PageNotFound(path));
    }
    let fragment = fs::read_to_string(&path).map_err(BuildError::io(&path))?;
    Ok(wrap_fragment(&fragment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::DEFAULT_SHELL;
    use pretty_assertions::assert_eq;

    fn renderer() -> PageRenderer<'static> {
        PageRenderer::new(DEFAULT_SHELL, "Docs", "style.css")
    }

    fn abc_manifest() -> Manifest {
        Manifest::new(
            vec![
                PageEntry::new("a.html", "A"),
                PageEntry::new("b.html", "B"),
                PageEntry::new("c.html", "C"),
            ],
            Vec::new(),
        )
    }

    fn write_pages(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), format!("<p>{name} says {{{{ title }}}}</p>")).unwrap();
        }
    }

    #[test]
    fn test_renders_navigation_by_manifest_position() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_pages(input.path(), &["a.html", "b.html", "c.html"]);

        let rendered = renderer()
            .render_all(&abc_manifest(), input.path(), output.path())
            .unwrap();
        assert_eq!(rendered, 3);

        let a = fs::read_to_string(output.path().join("a.html")).unwrap();
        let b = fs::read_to_string(output.path().join("b.html")).unwrap();
        let c = fs::read_to_string(output.path().join("c.html")).unwrap();

        assert!(!a.contains("Previous"));
        assert!(a.contains("<a href=\"b.html\">Next</a>"));
        assert!(b.contains("<a href=\"a.html\">Previous</a>"));
        assert!(b.contains("<a href=\"c.html\">Next</a>"));
        assert!(c.contains("<a href=\"b.html\">Previous</a>"));
        assert!(!c.contains("Next"));
    }

    #[test]
    fn test_fragment_sees_title_and_is_wrapped() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_pages(input.path(), &["a.html", "b.html", "c.html"]);

        renderer()
            .render_all(&abc_manifest(), input.path(), output.path())
            .unwrap();

        let b = fs::read_to_string(output.path().join("b.html")).unwrap();
        assert!(b.starts_with("<!DOCTYPE html>"));
        assert!(b.contains("<title>B - Docs</title>"));
        assert!(b.contains("<p>b.html says B</p>"));
    }

    #[test]
    fn test_title_markup_is_not_escaped() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("canvas.html"), "<h1>{{ title }}</h1>").unwrap();
        let manifest = Manifest::new(
            vec![PageEntry::new("canvas.html", "The <code>canvas</code> element")],
            Vec::new(),
        );

        renderer()
            .render_all(&manifest, input.path(), output.path())
            .unwrap();

        let html = fs::read_to_string(output.path().join("canvas.html")).unwrap();
        assert!(html.contains("<h1>The <code>canvas</code> element</h1>"));
        assert!(html.contains("<title>The canvas element - Docs</title>"));
    }

    #[test]
    fn test_missing_page_fails_before_writing() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_pages(input.path(), &["a.html", "c.html"]);

        let err = renderer()
            .render_all(&abc_manifest(), input.path(), output.path())
            .unwrap_err();

        match err {
            BuildError::PageNotFound(path) => assert_eq!(path, input.path().join("b.html")),
            other => panic!("Expected PageNotFound, got {other:?}"),
        }
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_template_syntax_error_names_page() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("bad.html"), "{% if %}").unwrap();
        let manifest = Manifest::new(vec![PageEntry::new("bad.html", "Bad")], Vec::new());

        let err = renderer()
            .render_all(&manifest, input.path(), output.path())
            .unwrap_err();

        assert!(
            matches!(&err, BuildError::Template { page, .. } if page == "bad.html"),
            "Expected Template error, got {err:?}"
        );
    }

    #[test]
    fn test_overwrites_existing_output() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("a.html"), "fresh").unwrap();
        fs::write(output.path().join("a.html"), "stale").unwrap();
        let manifest = Manifest::new(vec![PageEntry::new("a.html", "A")], Vec::new());

        renderer()
            .render_all(&manifest, input.path(), output.path())
            .unwrap();

        let html = fs::read_to_string(output.path().join("a.html")).unwrap();
        assert!(html.contains("fresh"));
        assert!(!html.contains("stale"));
    }

    #[test]
    fn test_custom_shell_navigation_block() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_pages(input.path(), &["a.html", "b.html", "c.html"]);
        let shell = "<nav>{% block navigation %}[{{ prev_url }}|{{ next_url }}]{% endblock %}</nav>\
                     <article>{% block content %}{% endblock %}</article>";

        PageRenderer::new(shell, "Docs", "style.css")
            .render_all(&abc_manifest(), input.path(), output.path())
            .unwrap();

        assert_eq!(
            fs::read_to_string(output.path().join("b.html")).unwrap(),
            "<nav>[a.html|c.html]</nav><article><p>b.html says B</p></article>"
        );
        assert_eq!(
            fs::read_to_string(output.path().join("a.html")).unwrap(),
            "<nav>[|b.html]</nav><article><p>a.html says A</p></article>"
        );
    }

    #[test]
    fn test_last_occurrences_keeps_final_entry() {
        let pages = vec![
            PageEntry::new("a.html", "A"),
            PageEntry::new("b.html", "B"),
            PageEntry::new("a.html", "A again"),
            PageEntry::new("c.html", "C"),
        ];
        assert_eq!(last_occurrences(&pages), vec![1, 2, 3]);
        assert_eq!(last_occurrences(abc_manifest().pages()), vec![0, 1, 2]);
    }

    #[test]
    fn test_duplicate_page_uses_last_entry_navigation() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_pages(input.path(), &["a.html", "b.html", "c.html"]);
        let manifest = Manifest::new(
            vec![
                PageEntry::new("a.html", "First"),
                PageEntry::new("b.html", "B"),
                PageEntry::new("a.html", "Again"),
                PageEntry::new("c.html", "C"),
            ],
            Vec::new(),
        );

        for _ in 0..2 {
            let rendered = renderer()
                .render_all(&manifest, input.path(), output.path())
                .unwrap();
            assert_eq!(rendered, 3);

            let a = fs::read_to_string(output.path().join("a.html")).unwrap();
            assert!(a.contains("<p>a.html says Again</p>"));
            assert!(a.contains("<a href=\"b.html\">Previous</a>"));
            assert!(a.contains("<a href=\"c.html\">Next</a>"));
        }
    }

    #[test]
    fn test_empty_manifest_renders_nothing() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let rendered = renderer()
            .render_all(&Manifest::default(), input.path(), output.path())
            .unwrap();

        assert_eq!(rendered, 0);
    }
}
