//! Server-rendered HTML for the interactive prediction form.

use std::fmt::Write;

use crate::format::format_price;
use crate::models::{
    FeatureRecord, ModelInfo, PropertyType, BUILDING_AREA_BOUNDS, LANDSIZE_BOUNDS, ROOM_BOUNDS,
};

/// Result of a form submission, shown under the form.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Price(f64),
    Error(String),
}

/// Everything the form page needs to render.
pub struct FormView<'a> {
    /// Values to prefill.
    pub record: &'a FeatureRecord,
    pub suburbs: &'a [String],
    pub info: &'a ModelInfo,
    pub outcome: Option<Outcome>,
}

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:.75rem}\
input,select{width:100%;padding:.3rem}\
button{margin-top:1rem;padding:.5rem 1rem}\
.success{background:#e6f4ea;padding:1rem;margin-top:1rem}\
.error{background:#fce8e6;padding:1rem;margin-top:1rem}\
aside{color:#555;border-left:3px solid #ccc;padding-left:1rem;margin-top:2rem}";

pub fn render_form(view: &FormView<'_>) -> String {
    let record = view.record;
    let mut html = String::with_capacity(4096 + view.suburbs.len() * 48);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Melbourne House Price Predictor</title>\n");
    let _ = writeln!(html, "<style>{}</style>\n</head>\n<body>", STYLE);
    html.push_str("<h1>Melbourne Property Price Prediction</h1>\n");
    html.push_str("<p>Enter property details below to predict the price.</p>\n");

    html.push_str("<form method=\"post\" action=\"/\">\n");
    number_input(&mut html, "landsize", "Land size (m²)", LANDSIZE_BOUNDS.max, record.landsize);
    number_input(
        &mut html,
        "building_area",
        "Building area (m²)",
        BUILDING_AREA_BOUNDS.max,
        record.building_area,
    );
    number_input(&mut html, "bedrooms", "Number of Bedrooms", ROOM_BOUNDS.max, record.bedroom2 as f64);
    number_input(&mut html, "bathrooms", "Number of Bathrooms", ROOM_BOUNDS.max, record.bathroom as f64);
    number_input(&mut html, "car", "Car spaces", ROOM_BOUNDS.max, record.car as f64);

    html.push_str("<label for=\"type\">Property Type</label>\n<select id=\"type\" name=\"type\">\n");
    for property_type in PropertyType::ALL {
        option(
            &mut html,
            property_type.as_code(),
            &format!("{} ({})", property_type.as_code(), property_type.label()),
            property_type == record.property_type,
        );
    }
    html.push_str("</select>\n");

    html.push_str("<label for=\"suburb\">Suburb</label>\n<select id=\"suburb\" name=\"suburb\">\n");
    for suburb in view.suburbs {
        option(&mut html, suburb, suburb, *suburb == record.suburb);
    }
    html.push_str("</select>\n");

    html.push_str("<button type=\"submit\">Predict Price</button>\n</form>\n");

    match &view.outcome {
        Some(Outcome::Price(price)) => {
            let _ = writeln!(
                html,
                "<p class=\"success\">Estimated Property Price: <strong>{}</strong></p>",
                format_price(*price)
            );
        }
        Some(Outcome::Error(message)) => {
            let _ = writeln!(html, "<p class=\"error\">{}</p>", escape_html(message));
        }
        None => {}
    }

    let _ = writeln!(
        html,
        "<aside><h2>About</h2><p>This app uses a <strong>{}</strong> ({} trees) \
         to predict Melbourne property prices from {} known suburbs.</p></aside>",
        estimator_label(&view.info.summary.kind),
        view.info.summary.trees,
        view.info.known_suburbs
    );
    html.push_str("</body>\n</html>\n");
    html
}

fn number_input(html: &mut String, name: &str, label: &str, max: f64, value: f64) {
    let _ = writeln!(
        html,
        "<label for=\"{name}\">{label}</label>\n\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"0\" max=\"{max}\" step=\"any\" value=\"{value}\">"
    );
}

fn option(html: &mut String, value: &str, label: &str, selected: bool) {
    let _ = writeln!(
        html,
        "<option value=\"{}\"{}>{}</option>",
        escape_html(value),
        if selected { " selected" } else { "" },
        escape_html(label)
    );
}

fn estimator_label(kind: &str) -> String {
    match kind {
        "random_forest" => "Random Forest Regressor".to_string(),
        "gradient_boosting" => "Gradient Boosting Regressor".to_string(),
        other => escape_html(other),
    }
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
