pub mod accountdtos;
pub mod feedbackdtos;
pub mod skilldtos;
pub mod workrequestdtos;

pub use accountdtos::*;
pub use feedbackdtos::*;
pub use skilldtos::*;
pub use workrequestdtos::*;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

/// Envelope for successful payloads: `{"status": "success", "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub status: &'static str,
    pub results: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            status: "success",
            results: data.len(),
            data,
        }
    }
}
