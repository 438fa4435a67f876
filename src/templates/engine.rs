use std::path::Path;

use minijinja::Environment;
use serde::Serialize;
use serde_json::Value;

use crate::core::{RenderConfig, ShowtimesResult};
use crate::metrics;
use crate::models::{Movie, Report, Screening};
use super::helpers;

pub const SHOWTIMES_TEMPLATE: &str = "showtimes.html";

const BUILTIN_LAYOUT: &str = include_str!("../../templates/showtimes.html");

/// Renders reports into the showtimes HTML layout.
///
/// The environment is built once and only read afterwards, so a renderer can
/// be shared between threads and used for any number of concurrent renders.
pub struct ShowtimesRenderer {
    env: Environment<'static>,
    config: RenderConfig,
}

#[derive(Serialize)]
struct RenderContext<'a> {
    today: &'a str,
    end_date: &'a str,
    date_format: &'a str,
    fallback_text: &'a str,
    movie_details: Vec<MovieView<'a>>,
}

#[derive(Serialize)]
struct MovieView<'a> {
    title: &'a str,
    link: &'a str,
    genre: &'a str,
    production_year: &'a str,
    description: &'a str,
    /// Only screenings with at least one showtime.
    screening_times: Vec<&'a Screening>,
}

impl<'a> From<&'a Movie> for MovieView<'a> {
    fn from(movie: &'a Movie) -> Self {
        MovieView {
            title: &movie.title,
            link: &movie.link,
            genre: &movie.genre,
            production_year: &movie.production_year,
            description: &movie.description,
            screening_times: movie
                .screening_times
                .iter()
                .filter(|s| s.has_times())
                .collect(),
        }
    }
}

impl ShowtimesRenderer {
    pub fn new(config: RenderConfig) -> ShowtimesResult<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        env.add_filter("date", helpers::date_filter);
        env.add_filter("safe_url", helpers::safe_url_filter);

        match &config.templates_dir {
            Some(dir) => match load_override(dir)? {
                Some(content) => {
                    tracing::info!("Loaded template override from {:?}", dir);
                    env.add_template_owned(SHOWTIMES_TEMPLATE.to_string(), content)?;
                }
                None => {
                    tracing::warn!(
                        "No {} in {:?}, using the built-in layout",
                        SHOWTIMES_TEMPLATE,
                        dir
                    );
                    env.add_template(SHOWTIMES_TEMPLATE, BUILTIN_LAYOUT)?;
                }
            },
            None => env.add_template(SHOWTIMES_TEMPLATE, BUILTIN_LAYOUT)?,
        }

        Ok(ShowtimesRenderer { env, config })
    }

    /// Renders the full HTML document for `report`. Output depends only on
    /// the report and the renderer's configuration.
    pub fn render(&self, report: &Report) -> ShowtimesResult<String> {
        let result = self.render_inner(report);
        metrics::record_render(result.is_ok());

        match &result {
            Ok(html) => tracing::debug!(
                movies = report.movie_details.len(),
                bytes = html.len(),
                "Rendered showtimes report"
            ),
            Err(e) => tracing::error!("Failed to render showtimes report: {}", e),
        }

        result
    }

    /// Validates a JSON payload and renders it.
    pub fn render_value(&self, data: &Value) -> ShowtimesResult<String> {
        let report = Report::from_value(data)?;
        self.render(&report)
    }

    fn render_inner(&self, report: &Report) -> ShowtimesResult<String> {
        let template = self.env.get_template(SHOWTIMES_TEMPLATE)?;

        let context = RenderContext {
            today: &report.today,
            end_date: &report.end_date,
            date_format: &self.config.date_format,
            fallback_text: &self.config.fallback_text,
            movie_details: report.movie_details.iter().map(MovieView::from).collect(),
        };

        Ok(template.render(&context)?)
    }
}

fn load_override(dir: &Path) -> ShowtimesResult<Option<String>> {
    let path = dir.join(SHOWTIMES_TEMPLATE);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)?;
    Ok(Some(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ShowtimesError;
    use serde_json::json;

    fn movie(title: &str, screenings: Vec<Screening>) -> Movie {
        Movie {
            title: title.to_string(),
            link: format!("https://www.kinonh.pl/{}", title.to_lowercase()),
            genre: "Dramat".to_string(),
            production_year: "2023".to_string(),
            description: "Opis filmu.".to_string(),
            screening_times: screenings,
        }
    }

    fn renderer() -> ShowtimesRenderer {
        ShowtimesRenderer::new(RenderConfig::default()).unwrap()
    }

    #[test]
    fn screenings_with_no_times_fall_back() {
        let report = Report::new(
            "2024-01-01",
            "2024-01-07",
            vec![movie("Perfect", vec![Screening::new("2024-01-03", vec![])])],
        );
        let html = renderer().render(&report).unwrap();

        assert!(html.contains("Brak dostępnych godzin seansów"));
        assert!(!html.contains("2024-01-03:"));
    }

    #[test]
    fn only_screenings_with_times_are_listed() {
        let report = Report::new(
            "2024-01-01",
            "2024-01-07",
            vec![movie(
                "Perfect",
                vec![
                    Screening::new("2024-01-02", vec!["17:15".to_string()]),
                    Screening::new("2024-01-03", vec![]),
                ],
            )],
        );
        let html = renderer().render(&report).unwrap();

        assert!(html.contains("2024-01-02: 17:15"));
        assert!(!html.contains("2024-01-03:"));
        assert!(!html.contains("Brak dostępnych godzin seansów"));
    }

    #[test]
    fn custom_fallback_and_date_format() {
        let config = RenderConfig {
            date_format: "%d.%m.%Y".to_string(),
            fallback_text: "No screening times available".to_string(),
            ..RenderConfig::default()
        };
        let report = Report::new("2024-01-01", "2024-01-07", vec![movie("Perfect", vec![])]);
        let html = ShowtimesRenderer::new(config).unwrap().render(&report).unwrap();

        assert!(html.contains("Nowe filmy na: 01.01.2024 - 07.01.2024"));
        assert!(html.contains("No screening times available"));
    }

    #[test]
    fn render_value_reports_missing_fields() {
        let err = renderer()
            .render_value(&json!({
                "today": "2024-01-01",
                "end_date": "2024-01-07",
                "movie_details": [{"title": "X", "genre": "Y", "production_year": 2020, "description": "Z"}]
            }))
            .unwrap_err();

        assert_eq!(err, ShowtimesError::missing("movie_details[0].link"));
    }

    #[test]
    fn missing_override_uses_builtin_layout() {
        let dir = tempfile::tempdir().unwrap();
        let config = RenderConfig {
            templates_dir: Some(dir.path().to_path_buf()),
            ..RenderConfig::default()
        };
        let report = Report::new("2024-01-01", "2024-01-07", vec![]);
        let html = ShowtimesRenderer::new(config).unwrap().render(&report).unwrap();

        assert!(html.contains("Nowe filmy na: 2024-01-01 - 2024-01-07"));
    }

    #[test]
    fn override_layout_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SHOWTIMES_TEMPLATE),
            "{% for movie in movie_details %}[{{ movie.title }}]{% endfor %}",
        )
        .unwrap();
        let config = RenderConfig {
            templates_dir: Some(dir.path().to_path_buf()),
            ..RenderConfig::default()
        };
        let report = Report::new(
            "2024-01-01",
            "2024-01-07",
            vec![movie("A", vec![]), movie("B & C", vec![])],
        );
        let html = ShowtimesRenderer::new(config).unwrap().render(&report).unwrap();

        assert_eq!(html, "[A][B &amp; C]");
    }

    #[test]
    fn override_sees_report_field_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SHOWTIMES_TEMPLATE),
            "{{ today }}/{{ end_date }}\
             {% for movie in movie_details %}[{{ movie.title }}:\
             {% for s in movie.screening_times %}{{ s.date }}={{ s.times|join(\",\") }}{% endfor %}]\
             {% endfor %}",
        )
        .unwrap();
        let config = RenderConfig {
            templates_dir: Some(dir.path().to_path_buf()),
            ..RenderConfig::default()
        };
        let report = Report::new(
            "2024-01-01",
            "2024-01-07",
            vec![movie(
                "Dune",
                vec![
                    Screening::new("2024-01-02", vec!["18:00".to_string(), "21:00".to_string()]),
                    Screening::new("2024-01-03", vec![]),
                ],
            )],
        );
        let html = ShowtimesRenderer::new(config).unwrap().render(&report).unwrap();

        assert_eq!(html, "2024-01-01/2024-01-07[Dune:2024-01-02=18:00,21:00]");
    }

    #[test]
    fn broken_override_is_a_template_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SHOWTIMES_TEMPLATE), "{% for movie in %}").unwrap();
        let config = RenderConfig {
            templates_dir: Some(dir.path().to_path_buf()),
            ..RenderConfig::default()
        };

        assert!(matches!(
            ShowtimesRenderer::new(config),
            Err(ShowtimesError::Template(_))
        ));
    }
}
