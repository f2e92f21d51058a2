//! HTML views rendered with tera
//!
//! Templates are compiled into the binary so the service has no runtime
//! file dependencies.

use serde::Serialize;
use tera::{Context, Tera};

use crate::client::Forecast;
use crate::error::WebError;

const LAYOUT: &str = include_str!("../templates/_layout.html");
const INDEX: &str = include_str!("../templates/index.html");
const ERROR: &str = include_str!("../templates/error.html");

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One table row on the index page
#[derive(Debug, Serialize)]
struct ForecastRow {
    date: String,
    temperature_c: i32,
    summary: String,
}

impl From<&Forecast> for ForecastRow {
    fn from(forecast: &Forecast) -> Self {
        Self {
            date: forecast.date.format(DATE_FORMAT).to_string(),
            temperature_c: forecast.temperature_c,
            summary: forecast.summary.clone().unwrap_or_default(),
        }
    }
}

/// Compiled page templates
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, WebError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("_layout.html", LAYOUT),
            ("index.html", INDEX),
            ("error.html", ERROR),
        ])?;

        Ok(Self { tera })
    }

    /// Forecast list with the generate form, rows in the given order
    pub fn index(&self, forecasts: &[Forecast]) -> Result<String, WebError> {
        let rows: Vec<ForecastRow> = forecasts.iter().map(ForecastRow::from).collect();

        let mut context = Context::new();
        context.insert("title", "Home Page");
        context.insert("forecasts", &rows);

        Ok(self.tera.render("index.html", &context)?)
    }

    /// Error page; `detail` is only passed in development
    pub fn error(&self, request_id: Option<&str>, detail: Option<&str>) -> Result<String, WebError> {
        let mut context = Context::new();
        context.insert("title", "Error");
        context.insert("request_id", &request_id);
        context.insert("detail", &detail);

        Ok(self.tera.render("error.html", &context)?)
    }
}
