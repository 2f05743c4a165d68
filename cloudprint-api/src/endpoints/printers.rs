use crate::macros::setter;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{Request, RequestData};

// Common

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Printer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
}

// Requests

#[derive(Default, Debug, Clone, Serialize)]
pub struct SearchPrinters {
    #[serde(skip_serializing_if = "Option::is_none")]
    q: Option<String>,
}

impl SearchPrinters {
    pub fn new() -> Self {
        Self::default()
    }

    setter!(opt q: String);
}

impl Request for SearchPrinters {
    type Data = Self;
    type Response = PrintersResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        "/search".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Query(self)
    }
}

// Responses

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintersResponse {
    pub printers: Vec<Printer>,
}
