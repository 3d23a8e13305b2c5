use super::prompt::{GET_AVAILABILITY_SPECIFIC, GET_AVAILABILITY_TODAY, GET_AVAILABILITY_TOMORROW};
use crate::availability::AvailabilityQuery;
use crate::openai::FunctionCall;
use chrono::NaiveDate;
use serde::Deserialize;

/// A function call from the model, resolved against the functions we offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    Availability(AvailabilityQuery),
}

/// Outcome of resolving a function call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResolution {
    Run(ToolRequest),
    MissingDate,
    InvalidDate(String),
    Unknown(String),
}

#[derive(Debug, Default, Deserialize)]
struct SpecificDateArgs {
    #[serde(default)]
    date: Option<String>,
}

impl ToolRequest {
    pub fn resolve(call: &FunctionCall) -> ToolResolution {
        match call.name.as_str() {
            GET_AVAILABILITY_TODAY => {
                ToolResolution::Run(ToolRequest::Availability(AvailabilityQuery::Today))
            }
            GET_AVAILABILITY_TOMORROW => {
                ToolResolution::Run(ToolRequest::Availability(AvailabilityQuery::Tomorrow))
            }
            GET_AVAILABILITY_SPECIFIC => resolve_specific(&call.arguments),
            other => ToolResolution::Unknown(other.to_string()),
        }
    }
}

fn resolve_specific(arguments: &str) -> ToolResolution {
    let arguments = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };

    // Unparsable arguments are treated like an absent date
    let args: SpecificDateArgs = serde_json::from_str(arguments).unwrap_or_default();

    let date = match args.date.as_deref().map(str::trim) {
        Some(date) if !date.is_empty() => date,
        _ => return ToolResolution::MissingDate,
    };

    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(date) => ToolResolution::Run(ToolRequest::Availability(AvailabilityQuery::Specific(
            date,
        ))),
        Err(_) => ToolResolution::InvalidDate(date.to_string()),
    }
}
