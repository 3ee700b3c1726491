//! Interfaces to the external services a build talks to.
//!
//! Every call is blocking and is made at most once; retries are left to
//! the implementations.

use crate::batch::{diagram_batch, slide_creation_batch, PlaceholderLookup};
use crate::error::{Error, Result};
use crate::layout::LayoutDecision;
use crate::operation::OperationBatch;
use crate::placement::DiagramPlacement;
use crate::types::PresentationContent;
use std::path::{Path, PathBuf};

/// Produces structured content for a topic, usually via a language model.
pub trait ContentGenerator {
    /// Fails with [`Error::UpstreamContent`] when the model's answer is not
    /// a usable presentation. See
    /// [`ContentNormalizer::parse_presentation`](crate::ContentNormalizer::parse_presentation).
    fn generate(&self, topic: &str, description: &str) -> Result<PresentationContent>;
}

/// Reply to a submitted batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReply {
    /// Ids of objects created by the batch, in operation order.
    pub created_object_ids: Vec<String>,
}

/// The remote rich-text presentation API.
pub trait DocumentApi {
    /// Create an empty presentation and return its id.
    fn create_presentation(&mut self, title: &str) -> Result<String>;

    /// Submit a batch. Either every operation is applied or none is.
    fn batch_update(&mut self, presentation_id: &str, batch: &OperationBatch)
        -> Result<BatchReply>;

    /// Find the title and body placeholder elements of a slide.
    fn get_placeholders(&mut self, presentation_id: &str, slide_id: &str)
        -> Result<PlaceholderLookup>;

    /// Create a slide and return its id.
    fn create_slide(
        &mut self,
        presentation_id: &str,
        layout: LayoutDecision,
        insertion_index: usize,
    ) -> Result<String> {
        let batch = slide_creation_batch(layout, insertion_index);
        let reply = self.batch_update(presentation_id, &batch)?;

        reply.created_object_ids.into_iter().next().ok_or_else(|| {
            Error::OperationBatch("slide creation returned no slide id".to_string())
        })
    }

    /// Place an image from a public URL on a slide.
    fn create_image(
        &mut self,
        presentation_id: &str,
        slide_id: &str,
        url: &str,
        placement: DiagramPlacement,
    ) -> Result<()> {
        let batch = diagram_batch(slide_id, url, placement);
        self.batch_update(presentation_id, &batch)?;
        Ok(())
    }
}

/// Renders a diagram for a prompt into a local image file.
pub trait DiagramGenerator {
    fn generate_image(&self, prompt: &str) -> Result<PathBuf>;
}

/// Uploads a local file and returns a publicly readable URL.
pub trait FileHost {
    fn upload(&self, path: &Path) -> Result<String>;
}

/// Diagram generation followed by upload of the rendered image.
pub struct DiagramPipeline {
    generator: Box<dyn DiagramGenerator>,
    host: Box<dyn FileHost>,
}

impl DiagramPipeline {
    pub fn new(generator: Box<dyn DiagramGenerator>, host: Box<dyn FileHost>) -> Self {
        Self { generator, host }
    }

    /// Render `prompt` and return the hosted image URL.
    ///
    /// The local file is removed once the upload has been attempted, whether
    /// or not it succeeded. A failed removal is only logged.
    pub fn render(&self, prompt: &str) -> Result<String> {
        let path = self.generator.generate_image(prompt)?;
        log::debug!("Diagram rendered to {}", path.display());

        let uploaded = self.host.upload(&path);

        if let Err(e) = std::fs::remove_file(&path) {
            log::warn!(
                "Could not delete temporary image file {}: {}",
                path.display(),
                e
            );
        }

        uploaded
    }
}

impl std::fmt::Debug for DiagramPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramPipeline").finish_non_exhaustive()
    }
}
