//! Slide deck assembly: turns notebook cells into an ordered list of slides.

use crate::charts::{ChartError, ChartRenderer, StackedBarChart};
use crate::config::RenderConfig;
use crate::error::Result;
use crate::notebook::{extract_chart, has_bar_calls, CellKind, Notebook};

const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq)]
pub enum SlideBody {
    Title { subtitle: Option<String> },
    Text(Vec<String>),
    Code(String),
    Figure { png: Vec<u8>, width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub heading: Option<String>,
    pub body: SlideBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub title: String,
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn from_notebook(notebook: &Notebook, config: &RenderConfig) -> Result<Self> {
        Self::from_notebook_with(notebook, config, ChartRenderer::render_png_bytes)
    }

    /// Build the deck, rendering figures with `render(chart, width, height)`.
    pub fn from_notebook_with<F>(notebook: &Notebook, config: &RenderConfig, render: F) -> Result<Self>
    where
        F: Fn(&StackedBarChart, u32, u32) -> std::result::Result<Vec<u8>, ChartError>,
    {
        let title = config
            .deck
            .title
            .clone()
            .or_else(|| notebook.title().map(str::to_string))
            .unwrap_or_else(|| UNTITLED.to_string());
        let subtitle = notebook
            .metadata
            .extra
            .get("subtitle")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let mut slides = vec![Slide {
            heading: Some(title.clone()),
            body: SlideBody::Title { subtitle },
        }];

        let (width, height) = (config.figure.width, config.figure.height);
        for cell in &notebook.cells {
            match cell.kind {
                CellKind::Markdown => slides.extend(markdown_slides(&cell.source)),
                CellKind::Code => {
                    if !cell.hides_code() && !cell.source.is_empty() {
                        slides.push(Slide {
                            heading: cell.title.clone(),
                            body: SlideBody::Code(cell.source.clone()),
                        });
                    }
                    if has_bar_calls(&cell.source) {
                        let chart = extract_chart(&cell.source)?;
                        let png = render(&chart, width, height)?;
                        tracing::debug!(
                            "Rendered chart from cell at line {} ({} bytes)",
                            cell.line,
                            png.len()
                        );
                        slides.push(Slide {
                            heading: None,
                            body: SlideBody::Figure { png, width, height },
                        });
                    }
                }
                CellKind::Raw => {
                    tracing::debug!("Skipping raw cell at line {}", cell.line);
                }
            }
        }

        Ok(Self { title, slides })
    }

    pub fn figure_count(&self) -> usize {
        self.slides
            .iter()
            .filter(|s| matches!(s.body, SlideBody::Figure { .. }))
            .count()
    }
}

/// Split markdown into slides: `#`/`##` headings and `---` rules start a new
/// slide; paragraphs are joined lines between blank lines.
pub fn markdown_slides(source: &str) -> Vec<Slide> {
    let mut slides = Vec::new();
    let mut heading: Option<String> = None;
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    fn end_paragraph(current: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
        if !current.is_empty() {
            paragraphs.push(current.join(" "));
            current.clear();
        }
    }

    fn end_slide(heading: &mut Option<String>, paragraphs: &mut Vec<String>, slides: &mut Vec<Slide>) {
        if heading.is_some() || !paragraphs.is_empty() {
            slides.push(Slide {
                heading: heading.take(),
                body: SlideBody::Text(std::mem::take(paragraphs)),
            });
        }
    }

    for line in source.lines() {
        let trimmed = line.trim();
        let heading_text = trimmed
            .strip_prefix("## ")
            .or_else(|| trimmed.strip_prefix("# "));
        if let Some(text) = heading_text {
            end_paragraph(&mut current, &mut paragraphs);
            end_slide(&mut heading, &mut paragraphs, &mut slides);
            heading = Some(text.trim().to_string());
        } else if trimmed == "---" {
            end_paragraph(&mut current, &mut paragraphs);
            end_slide(&mut heading, &mut paragraphs, &mut slides);
        } else if trimmed.is_empty() {
            end_paragraph(&mut current, &mut paragraphs);
        } else {
            current.push(trimmed);
        }
    }
    end_paragraph(&mut current, &mut paragraphs);
    end_slide(&mut heading, &mut paragraphs, &mut slides);
    slides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SlidesError;
    use crate::notebook::fixtures::DEMO_NOTEBOOK;
    use crate::notebook::ScriptError;

    fn fake_png(_: &StackedBarChart, _: u32, _: u32) -> std::result::Result<Vec<u8>, ChartError> {
        Ok(b"\x89PNG fake".to_vec())
    }

    #[test]
    fn test_demo_deck_slides() {
        let nb = Notebook::parse(DEMO_NOTEBOOK).unwrap();
        let deck = Deck::from_notebook_with(&nb, &RenderConfig::default(), fake_png).unwrap();

        assert_eq!(deck.title, "MPL slides");
        assert_eq!(deck.slides.len(), 3);
        assert_eq!(deck.slides[0].body, SlideBody::Title { subtitle: None });
        assert_eq!(deck.slides[1].heading.as_deref(), Some("Slide"));
        assert_eq!(
            deck.slides[1].body,
            SlideBody::Text(vec!["Here is my side again.".into()])
        );
        // the chart cell is tagged hide-code, so only its figure appears
        assert!(matches!(
            deck.slides[2].body,
            SlideBody::Figure { width: 800, height: 600, .. }
        ));
        assert_eq!(deck.figure_count(), 1);
    }

    #[test]
    fn test_config_title_and_visible_code() {
        let nb = Notebook::parse("# %% Setup\nimport math\n").unwrap();
        let mut config = RenderConfig::default();
        config.deck.title = Some("Override".into());
        let deck = Deck::from_notebook_with(&nb, &config, fake_png).unwrap();
        assert_eq!(deck.title, "Override");
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[1].heading.as_deref(), Some("Setup"));
        assert_eq!(deck.slides[1].body, SlideBody::Code("import math".into()));
    }

    #[test]
    fn test_broken_chart_cell_propagates() {
        let nb = Notebook::parse("# %%\nax.bar(names, [1])\n").unwrap();
        let err = Deck::from_notebook_with(&nb, &RenderConfig::default(), fake_png).unwrap_err();
        assert!(matches!(
            err,
            SlidesError::Script(ScriptError::UnknownName(ref n)) if n == "names"
        ));
    }

    #[test]
    fn test_render_failure_propagates() {
        let nb = Notebook::parse("# %%\nax.bar(['a'], [1])\n").unwrap();
        let err = Deck::from_notebook_with(&nb, &RenderConfig::default(), |_, _, _| {
            Err(ChartError::Render("no font".into()))
        })
        .unwrap_err();
        assert!(matches!(err, SlidesError::Chart(ChartError::Render(_))));
    }

    #[test]
    fn test_commented_bar_call_stays_a_code_slide() {
        let nb = Notebook::parse("# %%\n# ax.bar(x, y) was too slow\nprint(1)\n").unwrap();
        let deck = Deck::from_notebook_with(&nb, &RenderConfig::default(), fake_png).unwrap();
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.figure_count(), 0);
        assert!(matches!(deck.slides[1].body, SlideBody::Code(_)));
    }

    #[test]
    fn test_raw_cells_are_skipped() {
        let nb = Notebook::parse(
            "# %% [raw]\n# \\begin{frame}\n\n# %% [markdown]\n# ## After raw\n",
        )
        .unwrap();
        assert_eq!(nb.cells[0].kind, CellKind::Raw);
        let deck = Deck::from_notebook_with(&nb, &RenderConfig::default(), fake_png).unwrap();
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[1].heading.as_deref(), Some("After raw"));
    }

    #[test]
    fn test_one_figure_per_chart_cell() {
        let nb = Notebook::parse(
            "# %% [markdown]\n# ## Charts\n\n# %% tags=[\"hide-code\"]\nax.bar(['a'], [1])\n\n# %% tags=[\"hide-code\"]\nax.bar(['b', 'c'], [2, 3])\n",
        )
        .unwrap();
        let deck = Deck::from_notebook_with(&nb, &RenderConfig::default(), fake_png).unwrap();
        assert_eq!(deck.figure_count(), 2);
        assert_eq!(deck.slides.len(), 4);
    }

    #[test]
    fn test_markdown_slide_splitting() {
        let slides = markdown_slides("Intro line\n\n## First\na\nb\n\nc\n---\n## Second\n");
        assert_eq!(slides.len(), 3);
        assert_eq!(slides[0].heading, None);
        assert_eq!(slides[0].body, SlideBody::Text(vec!["Intro line".into()]));
        assert_eq!(
            slides[1].body,
            SlideBody::Text(vec!["a b".into(), "c".into()])
        );
        assert_eq!(slides[2].heading.as_deref(), Some("Second"));
        assert_eq!(slides[2].body, SlideBody::Text(Vec::new()));
    }
}
