use serde::{Deserialize, Serialize};

use crate::error::InferenceError;
use crate::models::Cell;

/// Turns one table column into model input slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnEncoder {
    /// Passes a number through. Non-finite values are replaced by `fill`.
    Numeric {
        column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<f64>,
    },
    /// One indicator slot per category. Unknown categories encode as all zeros.
    OneHot {
        column: String,
        categories: Vec<String>,
    },
}

impl ColumnEncoder {
    pub fn column(&self) -> &str {
        match self {
            Self::Numeric { column, .. } | Self::OneHot { column, .. } => column,
        }
    }

    /// Number of slots this encoder contributes.
    pub fn width(&self) -> usize {
        match self {
            Self::Numeric { .. } => 1,
            Self::OneHot { categories, .. } => categories.len(),
        }
    }

    pub fn encode_into(&self, cell: &Cell, out: &mut Vec<f64>) -> Result<(), InferenceError> {
        match self {
            Self::Numeric { column, fill } => {
                let value = cell.as_number().ok_or_else(|| InferenceError::TypeMismatch {
                    column: column.clone(),
                    expected: "numeric",
                })?;
                let value = if value.is_finite() {
                    value
                } else {
                    fill.ok_or_else(|| InferenceError::MissingValue(column.clone()))?
                };
                out.push(value);
            }
            Self::OneHot { column, categories } => {
                let value = cell.as_text().ok_or_else(|| InferenceError::TypeMismatch {
                    column: column.clone(),
                    expected: "text",
                })?;
                out.extend(
                    categories
                        .iter()
                        .map(|category| if category == value { 1.0 } else { 0.0 }),
                );
            }
        }
        Ok(())
    }
}
