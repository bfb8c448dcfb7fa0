//! Diagram generation from start to finish.
//!
//! [`generate`] is pure: it resolves every line, plans the pages and draws
//! them, returning the markup. Compiling and writing the result are left to
//! the caller.

use askama::Template;
use tracing::debug;

use crate::compile::{CompileError, Compiler};
use crate::document::DiagramDocument;
use crate::domain::Station;
use crate::layout::{Compositor, DiagramConfig, LayoutError, Page, StationAxis, plan_pages};
use crate::schedule::{Line, ResolveError, resolve_line};

/// Errors that abort diagram generation.
///
/// A failure in any line aborts the whole diagram; no partial pages are
/// produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiagramError {
    /// A line could not be resolved into runs
    #[error("line {line:?}: {source}")]
    Line {
        line: String,
        #[source]
        source: ResolveError,
    },

    /// The diagram could not be laid out
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Generated diagram markup, one entry per page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    pages: Vec<String>,
}

impl Diagram {
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All pages concatenated in page order.
    pub fn markup(&self) -> String {
        self.pages.concat()
    }

    /// Complete document source around the pages.
    pub fn document(&self) -> Result<String, askama::Error> {
        DiagramDocument::new(&self.pages).render()
    }
}

/// Generate the diagram for `lines` over `stations`.
pub fn generate(
    stations: &[Station],
    lines: &[Line],
    config: &DiagramConfig,
) -> Result<Diagram, DiagramError> {
    config.validate()?;
    let axis = StationAxis::build(stations, config)?;

    let mut runs = Vec::new();
    for line in lines {
        let resolved = resolve_line(line).map_err(|source| DiagramError::Line {
            line: line.options.name.clone(),
            source,
        })?;
        runs.extend(resolved);
    }

    let page_count = plan_pages(&runs, &config.pages);
    let compositor = Compositor::new(config, &axis, page_count);
    let pages = (0..page_count)
        .map(|index| compositor.compose_page(&Page::window(&config.pages, index), &runs))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        stations = stations.len(),
        lines = lines.len(),
        runs = runs.len(),
        pages = pages.len(),
        "generated diagram"
    );
    Ok(Diagram { pages })
}

/// Errors from turning a diagram into an output document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to render document: {0}")]
    Template(#[from] askama::Error),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Wrap the diagram in its document and compile it.
pub async fn compile_diagram<C: Compiler>(
    diagram: &Diagram,
    compiler: &C,
) -> Result<Vec<u8>, RenderError> {
    let source = diagram.document()?;
    Ok(compiler.compile(&source).await?)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::{StyleOptions, TimeValue};
    use crate::schedule::{LineOptions, RunDescriptor, StopEntry};

    fn stations() -> Vec<Station> {
        vec![
            Station::new("A", "Adorf"),
            Station::new("B", "Bestadt"),
            Station::new("C", "Cehausen"),
        ]
    }

    fn line(name: &str, anchors: &[f64]) -> Line {
        Line {
            options: LineOptions {
                name: name.into(),
                stops: vec![
                    StopEntry("A".into(), 0.0.into(), 0.0.into()),
                    StopEntry("B".into(), 10.0.into(), 11.0.into()),
                    StopEntry("C".into(), 20.0.into(), 20.0.into()),
                ],
                ..LineOptions::default()
            },
            runs: anchors.iter().map(|a| RunDescriptor::Anchor(*a)).collect(),
        }
    }

    /// Compiler that records its input and returns a fixed artifact.
    #[derive(Default)]
    struct MockCompiler {
        sources: Mutex<Vec<String>>,
    }

    impl Compiler for MockCompiler {
        async fn compile(&self, source: &str) -> Result<Vec<u8>, CompileError> {
            self.sources.lock().unwrap().push(source.to_string());
            Ok(b"%PDF".to_vec())
        }
    }

    struct FailingCompiler;

    impl Compiler for FailingCompiler {
        async fn compile(&self, _source: &str) -> Result<Vec<u8>, CompileError> {
            Err(CompileError::Failed {
                program: "mock".into(),
                diagnostics: "! Undefined control sequence.".into(),
            })
        }
    }

    #[test]
    fn one_page_per_window() {
        let diagram = generate(
            &stations(),
            &[line("RB 1", &[420.0, 480.0, 750.0])],
            &DiagramConfig::default(),
        )
        .unwrap();

        assert_eq!(diagram.page_count(), 2);
        assert_eq!(diagram.pages()[0].matches("{RB 1}").count(), 2 * 4);
        assert_eq!(diagram.pages()[1].matches("{RB 1}").count(), 4);
        assert_eq!(diagram.markup(), diagram.pages().concat());
    }

    #[test]
    fn run_style_reaches_markup() {
        let mut line = line("S 2", &[420.0]);
        line.options.color = Some("red".into());
        line.options.style = StyleOptions::new().flag("thick");
        let mut config = DiagramConfig::default();
        config.styles.run = StyleOptions::new().flag("dashed");

        let diagram = generate(&stations(), &[line], &config).unwrap();
        assert!(diagram.markup().contains("\\draw[dashed,red,thick]\n"));
    }

    #[test]
    fn empty_first_page_gives_no_pages() {
        let diagram = generate(
            &stations(),
            &[line("RB 1", &[750.0, 800.0])],
            &DiagramConfig::default(),
        )
        .unwrap();

        assert_eq!(diagram.page_count(), 0);
        assert_eq!(diagram.markup(), "");
    }

    #[test]
    fn single_station_is_rejected() {
        let err = generate(&stations()[..1], &[], &DiagramConfig::default()).unwrap_err();
        assert_eq!(err, DiagramError::Layout(LayoutError::DegenerateAxis { count: 1 }));
    }

    #[test]
    fn unknown_station_is_rejected() {
        let err = generate(
            &stations()[..2],
            &[line("RB 1", &[420.0])],
            &DiagramConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, DiagramError::Layout(LayoutError::UnknownStation("C".into())));
    }

    #[test]
    fn bad_time_names_the_line() {
        let mut line = line("RE 9", &[]);
        line.runs.push(RunDescriptor::AnchorText("7:xx".into()));

        let err = generate(&stations(), &[line], &DiagramConfig::default()).unwrap_err();
        match &err {
            DiagramError::Line { line, .. } => assert_eq!(line, "RE 9"),
            other => panic!("expected Line error, got {other:?}"),
        }
        assert!(err.to_string().starts_with("line \"RE 9\": invalid time \"7:xx\""));
    }

    #[test]
    fn bad_stop_time_names_the_line() {
        let mut line = line("RE 9", &[420.0]);
        line.options.stops[1].2 = TimeValue::Clock("soon".into());

        let err = generate(&stations(), &[line], &DiagramConfig::default()).unwrap_err();
        assert!(matches!(err, DiagramError::Line { .. }));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = DiagramConfig::default();
        config.pages.width = -1.0;
        let err = generate(&stations(), &[], &config).unwrap_err();
        assert_eq!(err, DiagramError::Layout(LayoutError::InvalidPageWidth(-1.0)));
    }

    #[test]
    fn deterministic() {
        let lines = [line("RB 1", &[420.0, 450.0]), line("RB 2", &[430.0, 900.0])];
        let config = DiagramConfig::default();
        let first = generate(&stations(), &lines, &config).unwrap();
        let second = generate(&stations(), &lines, &config).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn compile_passes_document_to_compiler() {
        let diagram =
            generate(&stations(), &[line("RB 1", &[420.0])], &DiagramConfig::default()).unwrap();
        let compiler = MockCompiler::default();

        let bytes = compile_diagram(&diagram, &compiler).await.unwrap();
        assert_eq!(bytes, b"%PDF");

        let sources = compiler.sources.lock().unwrap();
        assert_eq!(sources.len(), 1);
        assert!(sources[0].starts_with("\\documentclass"));
        assert!(sources[0].contains(&diagram.pages()[0]));
    }

    #[tokio::test]
    async fn compile_failure_is_passed_through() {
        let diagram =
            generate(&stations(), &[line("RB 1", &[420.0])], &DiagramConfig::default()).unwrap();

        let err = compile_diagram(&diagram, &FailingCompiler).await.unwrap_err();
        assert!(matches!(err, RenderError::Compile(CompileError::Failed { .. })));
    }
}
