//! In-memory document backend that records submitted batches.
//!
//! Used to produce an offline operation plan: ids are allocated locally
//! and every batch is kept in submission order.

use crate::batch::PlaceholderLookup;
use crate::collaborators::{BatchReply, DocumentApi};
use crate::error::{Error, Result};
use crate::operation::{Operation, OperationBatch};
use serde::Serialize;

/// A batch as submitted, with the presentation it targeted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedBatch {
    pub presentation_id: String,
    #[serde(flatten)]
    pub batch: OperationBatch,
}

/// Records batches instead of sending them anywhere.
#[derive(Debug, Clone, Default)]
pub struct PlanRecorder {
    presentations: Vec<String>,
    slides: Vec<String>,
    batches: Vec<RecordedBatch>,
}

impl PlanRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches in submission order.
    pub fn batches(&self) -> &[RecordedBatch] {
        &self.batches
    }

    /// Ids of slides created so far.
    pub fn slide_ids(&self) -> &[String] {
        &self.slides
    }
}

impl DocumentApi for PlanRecorder {
    fn create_presentation(&mut self, title: &str) -> Result<String> {
        let id = format!("presentation_{}", self.presentations.len() + 1);
        log::debug!("Recording presentation {} ({:?})", id, title);
        self.presentations.push(id.clone());
        Ok(id)
    }

    fn batch_update(
        &mut self,
        presentation_id: &str,
        batch: &OperationBatch,
    ) -> Result<BatchReply> {
        if !self.presentations.iter().any(|p| p == presentation_id) {
            return Err(Error::OperationBatch(format!(
                "unknown presentation {}",
                presentation_id
            )));
        }
        batch.validate()?;

        let mut reply = BatchReply::default();
        for op in batch {
            if let Operation::CreateSlide { .. } = op {
                let id = format!("slide_{}", self.slides.len() + 1);
                self.slides.push(id.clone());
                reply.created_object_ids.push(id);
            }
        }

        self.batches.push(RecordedBatch {
            presentation_id: presentation_id.to_string(),
            batch: batch.clone(),
        });

        Ok(reply)
    }

    fn get_placeholders(
        &mut self,
        _presentation_id: &str,
        slide_id: &str,
    ) -> Result<PlaceholderLookup> {
        if !self.slides.iter().any(|s| s == slide_id) {
            return Ok(PlaceholderLookup::default());
        }

        Ok(PlaceholderLookup {
            title_id: Some(format!("{}_title", slide_id)),
            body_id: Some(format!("{}_body", slide_id)),
        })
    }
}
