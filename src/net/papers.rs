//! Paper and citation-tree endpoints.

#[cfg(test)]
#[path = "papers_test.rs"]
mod papers_test;

use std::rc::Rc;

use super::error::ApiError;
use super::pipeline::RequestPipeline;
use super::transport::{MultipartForm, Transport};
use super::types::{CitationNode, Paper, PaperUpload};

const PDF_CONTENT_TYPE: &str = "application/pdf";

fn paper_endpoint(id: i64) -> String {
    format!("/papers/{id}")
}

fn paper_tree_endpoint(id: i64) -> String {
    format!("/papers/{id}/tree")
}

pub struct PapersApi<T> {
    pipeline: Rc<RequestPipeline<T>>,
}

impl<T: Transport> PapersApi<T> {
    pub fn new(pipeline: Rc<RequestPipeline<T>>) -> Self {
        Self { pipeline }
    }

    /// Upload a PDF as multipart field `file`.
    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<PaperUpload, ApiError> {
        let form = MultipartForm::new().file("file", filename, PDF_CONTENT_TYPE, bytes);
        self.pipeline.post_multipart("/papers/upload", form).await
    }

    pub async fn list(&self) -> Result<Vec<Paper>, ApiError> {
        self.pipeline.get("/papers/list").await
    }

    pub async fn tree(&self, id: i64) -> Result<CitationNode, ApiError> {
        self.pipeline.get(&paper_tree_endpoint(id)).await
    }

    pub async fn get(&self, id: i64) -> Result<Paper, ApiError> {
        self.pipeline.get(&paper_endpoint(id)).await
    }
}
