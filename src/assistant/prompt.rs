use crate::openai::FunctionDefinition;
use chrono::NaiveDate;
use serde_json::json;

pub const GET_AVAILABILITY_TODAY: &str = "get_availability_today";
pub const GET_AVAILABILITY_TOMORROW: &str = "get_availability_tomorrow";
pub const GET_AVAILABILITY_SPECIFIC: &str = "get_availability_specific";

pub fn system_prompt(today: NaiveDate) -> String {
    format!(
        "You are a helpful assistant that can check golf bay availability and answer other questions. \
         Today's date is {}. \
         When providing availability information, present it in plain text without any markdown or special formatting characters. \
         Please be concise and focus on delivering the necessary information. \
         When asking the user for a date, request it in YYYY-MM-DD format.",
        today.format("%Y-%m-%d")
    )
}

pub fn availability_functions() -> Vec<FunctionDefinition> {
    let no_parameters = json!({
        "type": "object",
        "properties": {},
        "required": [],
        "additionalProperties": false
    });

    vec![
        FunctionDefinition {
            name: GET_AVAILABILITY_TODAY.to_string(),
            description: "Retrieve the availability for today.".to_string(),
            parameters: no_parameters.clone(),
        },
        FunctionDefinition {
            name: GET_AVAILABILITY_TOMORROW.to_string(),
            description: "Retrieve the availability for tomorrow.".to_string(),
            parameters: no_parameters,
        },
        FunctionDefinition {
            name: GET_AVAILABILITY_SPECIFIC.to_string(),
            description: "Retrieve the availability for a specific date.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "date": {
                        "type": "string",
                        "description": "The date to check availability for, in YYYY-MM-DD format."
                    }
                },
                "required": ["date"],
                "additionalProperties": false
            }),
        },
    ]
}
