//! Integration tests for the legacy-image conversion cascade: strategy
//! ordering, probe caching, and placeholder degradation through the
//! whole pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use undeck::{
    Block, Bounds, CascadeOptions, CascadeOutcome, DeckParser, DeckSource, EmbeddedPayload, Error,
    ImageCascade, Metadata, ParseOptions, PayloadDigest, PictureData, PictureFormat, RasterRequest,
    RasterStrategy, Result, Shape, SlideShapes,
};

/// Strategy stub with call and probe counters.
struct CountingStrategy {
    name: &'static str,
    available: bool,
    succeed: bool,
    calls: Arc<AtomicUsize>,
    probes: Arc<AtomicUsize>,
}

impl RasterStrategy for CountingStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn available(&self, _options: &CascadeOptions) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.available
    }

    fn convert(&self, _request: &RasterRequest<'_>, _options: &CascadeOptions) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.succeed {
            Ok(vec![0x89, 0x50, 0x4E, 0x47])
        } else {
            Err(Error::Other("configured to fail".into()))
        }
    }
}

struct Counters {
    calls: Arc<AtomicUsize>,
    probes: Arc<AtomicUsize>,
}

fn strategy(
    name: &'static str,
    available: bool,
    succeed: bool,
) -> (Box<dyn RasterStrategy>, Counters) {
    let calls = Arc::new(AtomicUsize::new(0));
    let probes = Arc::new(AtomicUsize::new(0));
    let counters = Counters {
        calls: calls.clone(),
        probes: probes.clone(),
    };
    (
        Box::new(CountingStrategy {
            name,
            available,
            succeed,
            calls,
            probes,
        }),
        counters,
    )
}

fn request(payload: &[u8]) -> RasterRequest<'_> {
    RasterRequest {
        payload,
        digest: PayloadDigest::of(payload),
        slide_index: 1,
        bounds: Bounds::new(0.0, 0.0, 200.0, 100.0),
    }
}

#[test]
fn test_first_strategy_success_short_circuits_the_rest() {
    let (s1, c1) = strategy("one", true, true);
    let (s2, c2) = strategy("two", true, true);
    let (s3, c3) = strategy("three", true, true);
    let (s4, c4) = strategy("four", true, true);
    let mut cascade =
        ImageCascade::with_strategies(vec![s1, s2, s3, s4], CascadeOptions::default());

    match cascade.convert(&request(b"legacy-image")) {
        CascadeOutcome::Converted { strategy, .. } => assert_eq!(strategy, "one"),
        CascadeOutcome::Exhausted => panic!("first strategy should convert"),
    }

    assert_eq!(c1.calls.load(Ordering::SeqCst), 1);
    assert_eq!(c2.calls.load(Ordering::SeqCst), 0);
    assert_eq!(c3.calls.load(Ordering::SeqCst), 0);
    assert_eq!(c4.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failures_fall_through_in_priority_order() {
    let (s1, c1) = strategy("one", true, false);
    let (s2, c2) = strategy("two", true, false);
    let (s3, c3) = strategy("three", true, true);
    let mut cascade = ImageCascade::with_strategies(vec![s1, s2, s3], CascadeOptions::default());

    match cascade.convert(&request(b"legacy-image")) {
        CascadeOutcome::Converted { strategy, .. } => assert_eq!(strategy, "three"),
        CascadeOutcome::Exhausted => panic!("third strategy should convert"),
    }

    assert_eq!(c1.calls.load(Ordering::SeqCst), 1);
    assert_eq!(c2.calls.load(Ordering::SeqCst), 1);
    assert_eq!(c3.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unavailable_strategy_is_skipped_without_conversion() {
    let (s1, c1) = strategy("one", false, true);
    let (s2, c2) = strategy("two", true, true);
    let mut cascade = ImageCascade::with_strategies(vec![s1, s2], CascadeOptions::default());

    match cascade.convert(&request(b"legacy-image")) {
        CascadeOutcome::Converted { strategy, .. } => assert_eq!(strategy, "two"),
        CascadeOutcome::Exhausted => panic!("second strategy should convert"),
    }
    assert_eq!(c1.calls.load(Ordering::SeqCst), 0);
    assert_eq!(c2.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_availability_probes_run_once_per_run() {
    let (s1, c1) = strategy("one", false, false);
    let (s2, c2) = strategy("two", true, true);
    let mut cascade = ImageCascade::with_strategies(vec![s1, s2], CascadeOptions::default());

    for payload in [b"first".as_slice(), b"second", b"third"] {
        cascade.convert(&request(payload));
    }

    assert_eq!(c1.probes.load(Ordering::SeqCst), 1);
    assert_eq!(c2.probes.load(Ordering::SeqCst), 1);
    assert_eq!(c2.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_identical_payloads_convert_once() {
    let (s1, c1) = strategy("one", true, true);
    let mut cascade = ImageCascade::with_strategies(vec![s1], CascadeOptions::default());

    cascade.convert(&request(b"same-bytes"));
    cascade.convert(&request(b"same-bytes"));
    cascade.convert(&request(b"other-bytes"));

    assert_eq!(c1.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_exhaustion_is_an_outcome_not_an_error() {
    let (s1, _) = strategy("one", true, false);
    let (s2, _) = strategy("two", false, true);
    let mut cascade = ImageCascade::with_strategies(vec![s1, s2], CascadeOptions::default());

    assert!(matches!(
        cascade.convert(&request(b"legacy-image")),
        CascadeOutcome::Exhausted
    ));
}

// ---------------------------------------------------------------------------
// Whole-pipeline behavior
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct PictureSource {
    picture: PictureData,
}

impl DeckSource for PictureSource {
    fn metadata(&self) -> Metadata {
        Metadata::with_title("Cascade Deck")
    }

    fn slide_count(&self) -> u32 {
        1
    }

    fn slide(&self, _index: u32) -> Result<SlideShapes> {
        let mut slide = SlideShapes::new(1, 960.0, 540.0);
        slide.shapes = vec![
            Shape::picture(Bounds::new(100.0, 80.0, 300.0, 200.0), self.picture.clone()),
            Shape::text_box(
                Bounds::new(100.0, 400.0, 400.0, 40.0),
                "Caption paragraph after the image.",
            ),
        ];
        Ok(slide)
    }

    fn digest(&self) -> PayloadDigest {
        PayloadDigest::of(&self.picture.bytes)
    }

    fn open_embedded(&self, _payload: &EmbeddedPayload) -> Result<Box<dyn DeckSource>> {
        Err(Error::EmbeddedOpen("no embedded documents".into()))
    }
}

fn cascade_options() -> CascadeOptions {
    // Keep the external tiers quiet in tests: no host, short timeout.
    CascadeOptions::default()
        .with_host_export(false)
        .with_timeout(std::time::Duration::from_secs(2))
}

#[test]
fn test_legacy_image_converted_in_process_when_decodable() {
    // A decodable payload mislabeled as WMF exercises the codec tier.
    let img = image::DynamicImage::new_rgb8(2, 2);
    let mut png = std::io::Cursor::new(Vec::new());
    img.write_to(&mut png, image::ImageFormat::Png).unwrap();

    let source = PictureSource {
        picture: PictureData {
            bytes: png.into_inner(),
            format: PictureFormat::Wmf,
            alt_text: "legacy diagram".into(),
        },
    };

    let parser = DeckParser::new(ParseOptions::default(), cascade_options());
    let deck = parser.parse(&source).unwrap();

    assert_eq!(deck.resources.len(), 1);
    assert_eq!(deck.resources[0].file_name, "Cascade_Deck_1.png");
    assert!(!deck.resources[0].bytes.is_empty());
    assert!(matches!(
        &deck.slides[0].blocks[0],
        Block::Image {
            resource: Some(_),
            ..
        }
    ));
}

#[test]
fn test_exhausted_cascade_degrades_to_placeholder_and_continues() {
    let source = PictureSource {
        picture: PictureData {
            bytes: b"not an image at all".to_vec(),
            format: PictureFormat::Wmf,
            alt_text: "flow chart".into(),
        },
    };

    let parser = DeckParser::new(ParseOptions::default(), cascade_options());
    let deck = parser.parse(&source).unwrap();

    assert!(deck.resources.is_empty());
    match &deck.slides[0].blocks[0] {
        Block::Image { resource, alt_text } => {
            assert!(resource.is_none());
            assert_eq!(alt_text, "flow chart");
        }
        other => panic!("expected placeholder image, got {:?}", other),
    }
    // The slide keeps converting past the failed image.
    assert_eq!(
        deck.slides[0].blocks[1].plain_text(),
        "Caption paragraph after the image."
    );
}

#[test]
fn test_wmf_conversion_disabled_skips_the_cascade() {
    let source = PictureSource {
        picture: PictureData {
            bytes: b"raw wmf bytes".to_vec(),
            format: PictureFormat::Wmf,
            alt_text: "vector drawing".into(),
        },
    };

    let options = ParseOptions::default().with_wmf_conversion(false);
    let parser = DeckParser::new(options, cascade_options());
    let deck = parser.parse(&source).unwrap();

    // The payload is extracted as-is, keeping its legacy extension.
    assert_eq!(deck.resources.len(), 1);
    assert_eq!(deck.resources[0].file_name, "Cascade_Deck_1.wmf");
    assert_eq!(deck.resources[0].bytes, b"raw wmf bytes");
}
