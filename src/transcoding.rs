use crate::binary::BinaryDecision;
use crate::constants::header;
use crate::response::CapturedResponse;
use crate::util::{normalize_lower, split_list};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::{DeflateEncoder, GzEncoder};
use indexmap::IndexMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use thiserror::Error;

/// Applies one `Content-Encoding` coding to a body.
pub trait ContentCoder: Send + Sync {
    fn encode(&self, body: &[u8]) -> io::Result<Vec<u8>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GzipCoder;

impl ContentCoder for GzipCoder {
    fn encode(&self, body: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder =
            GzEncoder::new(Vec::with_capacity(body.len() / 2), Compression::default());
        encoder.write_all(body)?;
        encoder.finish()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DeflateCoder;

impl ContentCoder for DeflateCoder {
    fn encode(&self, body: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder =
            DeflateEncoder::new(Vec::with_capacity(body.len() / 2), Compression::default());
        encoder.write_all(body)?;
        encoder.finish()
    }
}

/// One step of the outgoing byte pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscodingStage {
    /// Compresses the body according to its `Content-Encoding` header.
    ContentEncoding,
    /// Base64-encodes the body of platform-binary responses.
    Base64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("base64 transcoding must be the last stage of the pipeline")]
    Base64NotLast,
    #[error("pipeline has no base64 stage for platform-binary bodies")]
    MissingBase64,
    #[error("stage {0:?} is listed more than once")]
    DuplicateStage(TranscodingStage),
}

/// Explicitly ordered list of body transformations, fixed at construction.
///
/// `Base64` is always present and always last, so a platform-binary body
/// leaves the pipeline base64-encoded.
#[derive(Clone)]
pub struct TranscodingPipeline {
    stages: Vec<TranscodingStage>,
    coders: IndexMap<String, Arc<dyn ContentCoder>>,
}

impl TranscodingPipeline {
    pub fn new<I>(stages: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = TranscodingStage>,
    {
        let stages: Vec<TranscodingStage> = stages.into_iter().collect();

        for (index, stage) in stages.iter().enumerate() {
            if stages[..index].contains(stage) {
                return Err(PipelineError::DuplicateStage(*stage));
            }
        }

        match stages
            .iter()
            .position(|stage| *stage == TranscodingStage::Base64)
        {
            None => return Err(PipelineError::MissingBase64),
            Some(position) if position + 1 != stages.len() => {
                return Err(PipelineError::Base64NotLast);
            }
            Some(_) => {}
        }

        Ok(Self {
            stages,
            coders: default_coders(),
        })
    }

    /// Registers or replaces the coder used for a `Content-Encoding` token.
    pub fn with_coder<C>(mut self, coding: &str, coder: C) -> Self
    where
        C: ContentCoder + 'static,
    {
        self.coders
            .insert(normalize_lower(coding.trim()), Arc::new(coder));
        self
    }

    pub fn stages(&self) -> &[TranscodingStage] {
        &self.stages
    }

    /// Runs every stage in order over the response body.
    pub fn process(
        &self,
        response: &mut CapturedResponse,
        decision: BinaryDecision,
    ) -> io::Result<()> {
        for stage in &self.stages {
            match stage {
                TranscodingStage::ContentEncoding => self.encode_content(response)?,
                TranscodingStage::Base64 if decision.platform_binary => {
                    response.body = STANDARD.encode(&response.body).into_bytes();
                }
                TranscodingStage::Base64 => {}
            }
        }
        Ok(())
    }

    fn encode_content(&self, response: &mut CapturedResponse) -> io::Result<()> {
        let codings: Vec<String> = response
            .headers
            .get_all(header::CONTENT_ENCODING)
            .iter()
            .flat_map(|value| split_list(value))
            .map(normalize_lower)
            .filter(|coding| coding != "identity")
            .collect();

        if codings.is_empty() {
            return Ok(());
        }

        let Some(coders) = codings
            .iter()
            .map(|coding| self.coders.get(coding))
            .collect::<Option<Vec<_>>>()
        else {
            tracing::debug!(?codings, "unknown content-encoding, passing body through");
            return Ok(());
        };

        for coder in coders {
            response.body = coder.encode(&response.body)?;
        }
        response.headers.remove(header::CONTENT_LENGTH);
        Ok(())
    }
}

fn default_coders() -> IndexMap<String, Arc<dyn ContentCoder>> {
    let mut coders: IndexMap<String, Arc<dyn ContentCoder>> = IndexMap::new();
    coders.insert("gzip".into(), Arc::new(GzipCoder));
    coders.insert("x-gzip".into(), Arc::new(GzipCoder));
    coders.insert("deflate".into(), Arc::new(DeflateCoder));
    coders
}

/// `[ContentEncoding, Base64]`: base64 always wraps the compressed bytes.
impl Default for TranscodingPipeline {
    fn default() -> Self {
        Self {
            stages: vec![TranscodingStage::ContentEncoding, TranscodingStage::Base64],
            coders: default_coders(),
        }
    }
}

impl fmt::Debug for TranscodingPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscodingPipeline")
            .field("stages", &self.stages)
            .field("codings", &self.coders.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[path = "transcoding_test.rs"]
mod transcoding_test;
