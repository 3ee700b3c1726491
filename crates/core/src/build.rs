//! Presentation assembly: drives the compiler and the collaborators.
//!
//! Slides are processed strictly in source order. A failure on one slide
//! is logged and recorded in the [`BuildReport`], and the build moves on to
//! the next slide. Only failing to generate content or to create the
//! presentation itself aborts the build.

use crate::batch::BatchBuilder;
use crate::collaborators::{ContentGenerator, DiagramPipeline, DocumentApi};
use crate::error::{Error, Result};
use crate::flatten::{FlattenedText, TextFlattener};
use crate::layout::{self, LayoutDecision};
use crate::normalize::ContentNormalizer;
use crate::placement::PageGeometry;
use crate::style::StyleResolver;
use crate::theme::Theme;
use crate::types::{PresentationContent, SlideContent};
use std::time::{Duration, Instant};

/// Settings for one build.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    pub page: PageGeometry,

    /// Slides not started within this time are skipped.
    pub deadline: Option<Duration>,
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Everything the compiler derives from one slide, before any remote call.
#[derive(Debug, Clone, PartialEq)]
pub struct SlidePlan {
    /// The slide after validation and size limiting.
    pub slide: SlideContent,
    pub layout: LayoutDecision,
    pub body: FlattenedText,
}

/// A slide that was created and filled.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideSuccess {
    /// Position in the source content, 0-based.
    pub index: usize,
    pub slide_id: String,
    pub layout: LayoutDecision,

    /// Hosted URL of the inserted diagram, if one was placed.
    pub diagram_url: Option<String>,
}

/// A slide, or a slide's diagram, that could not be completed.
#[derive(Debug)]
pub struct SlideFailure {
    /// Position in the source content, 0-based.
    pub index: usize,
    pub error: Error,
}

/// Outcome of a build.
#[derive(Debug)]
pub struct BuildReport {
    pub presentation_id: String,
    pub succeeded: Vec<SlideSuccess>,

    /// Slides skipped entirely.
    pub skipped: Vec<SlideFailure>,

    /// Slides that were built but whose diagram could not be placed.
    pub diagram_failures: Vec<SlideFailure>,
}

impl BuildReport {
    fn new(presentation_id: String) -> Self {
        Self {
            presentation_id,
            succeeded: Vec::new(),
            skipped: Vec::new(),
            diagram_failures: Vec::new(),
        }
    }

    /// Ids of created slides, in order.
    pub fn slide_ids(&self) -> Vec<&str> {
        self.succeeded.iter().map(|s| s.slide_id.as_str()).collect()
    }

    /// Whether every slide and diagram was built.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.diagram_failures.is_empty()
    }
}

/// Assembles presentations in one theme.
#[derive(Debug)]
pub struct PresentationBuilder<'a> {
    theme: &'a Theme,
    normalizer: ContentNormalizer,
    flattener: TextFlattener,
    config: BuildConfig,
    diagrams: Option<DiagramPipeline>,
}

impl<'a> PresentationBuilder<'a> {
    /// Create a builder with default limits and no diagram support.
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            normalizer: ContentNormalizer::new(),
            flattener: TextFlattener::new(),
            config: BuildConfig::default(),
            diagrams: None,
        }
    }

    pub fn with_normalizer(mut self, normalizer: ContentNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable diagrams for slides with a diagram prompt.
    pub fn with_diagrams(mut self, pipeline: DiagramPipeline) -> Self {
        self.diagrams = Some(pipeline);
        self
    }

    /// Validate, lay out and flatten a slide. No remote calls.
    pub fn plan_slide(&self, slide: &SlideContent) -> Result<SlidePlan> {
        let slide = self.normalizer.normalize_slide(slide)?;
        let layout = layout::select(&slide);
        let body = self.flattener.flatten(&slide.blocks);

        Ok(SlidePlan {
            slide,
            layout,
            body,
        })
    }

    /// Generate content for a topic and build it.
    pub fn generate_and_build(
        &self,
        generator: &dyn ContentGenerator,
        topic: &str,
        description: &str,
        docs: &mut dyn DocumentApi,
    ) -> Result<BuildReport> {
        log::info!("Generating content for topic: {}", topic);
        let content = generator.generate(topic, description)?;
        self.build(&content, docs)
    }

    /// Create the presentation and every slide of `content`.
    pub fn build(
        &self,
        content: &PresentationContent,
        docs: &mut dyn DocumentApi,
    ) -> Result<BuildReport> {
        let started = Instant::now();

        let presentation_id = docs
            .create_presentation(&content.title)
            .map_err(|e| match e {
                Error::PresentationCreation(_) => e,
                other => Error::PresentationCreation(other.to_string()),
            })?;
        log::info!(
            "Created presentation {} ({} slides)",
            presentation_id,
            content.slides.len()
        );

        let mut report = BuildReport::new(presentation_id);
        let mut insertion_index = 0;

        for (index, slide) in content.slides.iter().enumerate() {
            if self.deadline_passed(started) {
                log::warn!("Deadline passed, skipping slide {}", index + 1);
                report.skipped.push(SlideFailure {
                    index,
                    error: Error::DeadlineExceeded { index },
                });
                continue;
            }

            let (slide_id, plan) = match self.build_slide(
                docs,
                &report.presentation_id,
                slide,
                &mut insertion_index,
            ) {
                Ok(built) => built,
                Err(error) => {
                    log::error!("Skipping slide {}: {}", index + 1, error);
                    report.skipped.push(SlideFailure { index, error });
                    continue;
                }
            };
            log::debug!("Built slide {} as {}", index + 1, slide_id);

            let mut success = SlideSuccess {
                index,
                slide_id,
                layout: plan.layout,
                diagram_url: None,
            };

            if let (Some(pipeline), Some(prompt)) = (&self.diagrams, plan.slide.diagram_prompt()) {
                let placed = if self.deadline_passed(started) {
                    Err(Error::DeadlineExceeded { index })
                } else {
                    self.place_diagram(
                        pipeline,
                        docs,
                        &report.presentation_id,
                        &success.slide_id,
                        prompt,
                    )
                };

                match placed {
                    Ok(url) => success.diagram_url = Some(url),
                    Err(error) => {
                        log::error!(
                            "Error generating/inserting diagram for slide {}: {}",
                            index + 1,
                            error
                        );
                        report.diagram_failures.push(SlideFailure { index, error });
                    }
                }
            }

            report.succeeded.push(success);
        }

        log::info!(
            "Presentation {}: {} slides built, {} skipped, {} diagram failures",
            report.presentation_id,
            report.succeeded.len(),
            report.skipped.len(),
            report.diagram_failures.len()
        );

        Ok(report)
    }

    /// Generate a diagram for an existing slide and place it.
    pub fn insert_diagram(
        &self,
        docs: &mut dyn DocumentApi,
        presentation_id: &str,
        slide_id: &str,
        prompt: &str,
    ) -> Result<String> {
        let pipeline = self.diagrams.as_ref().ok_or_else(|| {
            Error::DiagramGeneration("no diagram generator configured".to_string())
        })?;

        self.place_diagram(pipeline, docs, presentation_id, slide_id, prompt)
    }

    fn build_slide(
        &self,
        docs: &mut dyn DocumentApi,
        presentation_id: &str,
        slide: &SlideContent,
        insertion_index: &mut usize,
    ) -> Result<(String, SlidePlan)> {
        let plan = self.plan_slide(slide)?;

        let slide_id = docs.create_slide(presentation_id, plan.layout, *insertion_index)?;
        *insertion_index += 1;

        let placeholders = docs
            .get_placeholders(presentation_id, &slide_id)?
            .resolve(&slide_id)?;

        let builder = BatchBuilder::new(StyleResolver::new(self.theme), self.config.page);
        let batch =
            builder.content_batch(&plan.slide, plan.layout, &plan.body, &slide_id, &placeholders)?;

        docs.batch_update(presentation_id, &batch)
            .map_err(as_batch_error)?;

        Ok((slide_id, plan))
    }

    fn place_diagram(
        &self,
        pipeline: &DiagramPipeline,
        docs: &mut dyn DocumentApi,
        presentation_id: &str,
        slide_id: &str,
        prompt: &str,
    ) -> Result<String> {
        let url = pipeline.render(prompt)?;
        docs.create_image(
            presentation_id,
            slide_id,
            &url,
            self.config.page.diagram_placement(),
        )
        .map_err(as_batch_error)?;

        Ok(url)
    }

    fn deadline_passed(&self, started: Instant) -> bool {
        self.config
            .deadline
            .is_some_and(|deadline| started.elapsed() >= deadline)
    }
}

fn as_batch_error(error: Error) -> Error {
    match error {
        Error::OperationBatch(_) => error,
        other => Error::OperationBatch(other.to_string()),
    }
}
