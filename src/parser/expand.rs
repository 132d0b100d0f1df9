//! Embedded presentation expansion.
//!
//! An embedded-object shape re-enters the whole pipeline over the
//! nested document opened from its payload. Each recursion point mints
//! a path id extending the parent path. Cycle safety comes from a
//! digest stack of every payload currently open: revisiting a digest
//! aborts only that branch with a placeholder reference, so sibling
//! content survives. A quiet open failure may fall back to the
//! interactive host application; if that fails too, the placeholder
//! still carries the minted path id.

use crate::model::{Block, EmbeddedPayload, EmbeddedReference, PathId, Slide};

use super::deck_parser::DeckParser;
use super::source::DeckSource;

impl DeckParser {
    /// Expand one embedded object into an [`EmbeddedReference`] block.
    pub(crate) fn expand_embedded(
        &mut self,
        source: &dyn DeckSource,
        payload: &EmbeddedPayload,
        path: PathId,
    ) -> Block {
        if !payload.is_presentation() {
            log::debug!(
                "embedded object {} at {} is not a presentation",
                payload.prog_id,
                path
            );
            return Block::Embedded(EmbeddedReference::placeholder(
                path,
                format!("embedded object: {}", payload.prog_id),
            ));
        }

        let nested = match self.open_nested(source, payload, &path) {
            Some(nested) => nested,
            None => {
                return Block::Embedded(EmbeddedReference::placeholder(
                    path,
                    "embedded presentation could not be opened",
                ))
            }
        };

        let digest = nested.digest();
        if self.stack.contains(&digest) {
            log::warn!("embedded object cycle detected at {}, pruning branch", path);
            return Block::Embedded(EmbeddedReference::placeholder(
                path,
                "recursion cycle detected",
            ));
        }

        self.stack.push(digest);
        let slides = self.expand_slides(nested.as_ref(), &path);
        self.stack.pop();

        Block::Embedded(EmbeddedReference::expanded(path, slides))
    }

    /// Quiet open first; interactive host open only as a fallback.
    fn open_nested(
        &self,
        source: &dyn DeckSource,
        payload: &EmbeddedPayload,
        path: &PathId,
    ) -> Option<Box<dyn DeckSource>> {
        match source.open_embedded(payload) {
            Ok(nested) => Some(nested),
            Err(quiet_err) => {
                log::debug!("quiet open of {} failed: {}", path, quiet_err);
                let host = self.host.as_ref()?;
                match host.open_document(&payload.bytes) {
                    Ok(nested) => Some(nested),
                    Err(host_err) => {
                        log::warn!(
                            "interactive open of {} failed, keeping placeholder: {}",
                            path,
                            host_err
                        );
                        None
                    }
                }
            }
        }
    }

    fn expand_slides(&mut self, nested: &dyn DeckSource, path: &PathId) -> Vec<Slide> {
        let mut slides = Vec::new();
        for index in 1..=nested.slide_count() {
            if self.is_cancelled() {
                break;
            }
            match nested.slide(index) {
                Ok(shapes) => {
                    let slide = self.process_slide(nested, shapes, path.child_slide(index));
                    slides.push(slide);
                }
                Err(e) => {
                    log::warn!("failed to read nested slide {} of {}: {}", index, path, e);
                    slides.push(Slide::new(index));
                }
            }
        }
        slides
    }
}
