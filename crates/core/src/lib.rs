//! Content-to-operations compiler for assembling generated outlines into
//! remote presentation documents.
//!
//! Structured slide content is validated, flattened into body text with
//! style ranges, laid out, styled from a theme, and turned into ordered
//! operation batches for a document API. The compiler itself performs no
//! I/O; remote services are reached through the traits in
//! [`collaborators`].

pub mod batch;
pub mod build;
pub mod collaborators;
pub mod error;
pub mod flatten;
pub mod layout;
pub mod normalize;
pub mod operation;
pub mod placement;
pub mod recorder;
pub mod style;
pub mod theme;
pub mod types;

pub use batch::{BatchBuilder, PlaceholderLookup, Placeholders};
pub use build::{BuildConfig, BuildReport, PresentationBuilder, SlideFailure, SlidePlan, SlideSuccess};
pub use collaborators::{
    BatchReply, ContentGenerator, DiagramGenerator, DiagramPipeline, DocumentApi, FileHost,
};
pub use error::{Error, PlaceholderKind, Result};
pub use flatten::{FlattenedText, TextFlattener};
pub use layout::LayoutDecision;
pub use normalize::{ContentNormalizer, NormalizerLimits, SentenceSummarizer, Summarizer};
pub use operation::{Operation, OperationBatch, Phase};
pub use placement::{DiagramPlacement, PageGeometry};
pub use recorder::{PlanRecorder, RecordedBatch};
pub use style::{BackgroundFill, StyleResolver, TextStyle};
pub use theme::{Rgb, Theme, ThemeRegistry};
pub use types::{
    BulletItem, ContentBlock, PresentationContent, SlideContent, StyleKind, StyleRange,
};
