// End-to-end generation scenarios through the public API
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use promo_generator::error::PromoError;
use promo_generator::promo::{
    DecodedImage, EncodedImage, EngineConfig, Fill, FontSpec, ImageError, ImageSource,
    OutputSlot, PromoGenerator, PromoRequest, Rect, Rgba as Color, Shadow, Surface,
    SurfaceFactory, TextStyle, VisualStyle, generate_fallback,
};
use tiny_skia::Path;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn create_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        let r = (x % 255) as u8;
        let g = (y % 255) as u8;
        let b = ((x + y) % 255) as u8;
        Rgba([r, g, b, 255])
    });

    let dyn_img = DynamicImage::ImageRgba8(img);
    let mut cursor = Cursor::new(Vec::new());
    dyn_img
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("failed to encode test image");
    cursor.into_inner()
}

fn png(width: u32, height: u32) -> ImageSource {
    ImageSource::from_bytes(create_png_bytes(width, height))
}

fn decoded_dimensions(encoded: &EncodedImage) -> (u32, u32) {
    let bytes = encoded.png_bytes().expect("png bytes");
    let image = image::load_from_memory(&bytes).expect("decode output png");
    (image.width(), image.height())
}

#[test]
fn icon_without_screenshots_yields_two_images() {
    init_logger();
    let generator = PromoGenerator::new(EngineConfig::default());
    let request = PromoRequest::new(png(256, 256), "Test Extension", "A useful extension.");

    let bundle = generator.generate_all(&request).expect("generate");

    assert_eq!(decoded_dimensions(&bundle.small_tile), (440, 280));
    assert_eq!(decoded_dimensions(&bundle.marquee_tile), (1400, 560));
    assert!(bundle.screenshots.is_empty());
    assert!(bundle.degraded().is_empty());
    assert!(bundle.small_tile.as_data_url().starts_with("data:image/png;base64,"));
}

#[test]
fn invalid_middle_screenshot_is_isolated() {
    init_logger();
    let generator = PromoGenerator::new(EngineConfig::default());
    let request = PromoRequest::new(png(128, 128), "Name", "Description").with_screenshots([
        png(1920, 1080),
        ImageSource::from_bytes(b"definitely not an image".to_vec()),
        png(800, 1200),
    ]);

    let bundle = generator.generate_all(&request).expect("generate");
    let fallback =
        generate_fallback(1280, 800, "Screenshot Generation Failed").expect("fallback");

    assert_eq!(bundle.screenshots.len(), 3);
    assert_eq!(bundle.degraded(), &[OutputSlot::Screenshot(1)]);
    assert_eq!(bundle.screenshots[1], fallback);
    assert_ne!(bundle.screenshots[0], fallback);
    assert_ne!(bundle.screenshots[2], fallback);
    for screenshot in &bundle.screenshots {
        assert_eq!(decoded_dimensions(screenshot), (1280, 800));
    }
}

#[test]
fn broken_first_screenshot_keeps_marquee() {
    init_logger();
    let generator = PromoGenerator::new(EngineConfig::default());
    let request = PromoRequest::new(png(64, 64), "Name", "")
        .with_screenshot(ImageSource::from_bytes(vec![0x89, b'P', b'N', b'G']));

    let bundle = generator.generate_all(&request).expect("generate");

    assert!(!bundle.is_degraded(OutputSlot::Marquee));
    assert!(bundle.is_degraded(OutputSlot::Screenshot(0)));
}

#[test]
fn missing_icon_is_reported() {
    let generator = PromoGenerator::new(EngineConfig::default());
    let request = PromoRequest {
        name: "Name".to_string(),
        screenshots: vec![png(32, 20)],
        ..PromoRequest::default()
    };

    let err = generator.generate_all(&request).err().expect("missing icon");

    assert!(matches!(err, PromoError::MissingInput("icon")));
}

#[test]
fn six_screenshots_exceed_default_limit() {
    let generator = PromoGenerator::new(EngineConfig::default());
    let request =
        PromoRequest::new(png(32, 32), "Name", "").with_screenshots((0..6).map(|_| png(16, 10)));

    let result = generator.generate_all(&request);

    assert!(matches!(result, Err(PromoError::InvalidInput(_))));
}

#[test]
fn generation_is_byte_identical() {
    let request = PromoRequest::new(png(200, 150), "Deterministic", "Same input, same bytes.")
        .with_screenshot(png(640, 400))
        .with_tile_style(VisualStyle::GradientPurple)
        .with_marquee_style(VisualStyle::Vibrant);

    let first = PromoGenerator::new(EngineConfig::default())
        .generate_all(&request)
        .expect("first run");
    let second = PromoGenerator::new(EngineConfig::default())
        .generate_all(&request)
        .expect("second run");

    assert_eq!(first, second);
    assert_eq!(first.to_json().expect("json"), second.to_json().expect("json"));
}

#[test]
fn data_url_icon_is_accepted() {
    let data_url = format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(create_png_bytes(96, 96))
    );
    let request = PromoRequest::new(ImageSource::from_encoded(data_url), "Name", "");

    let bundle = PromoGenerator::new(EngineConfig::default())
        .generate_all(&request)
        .expect("generate");

    assert!(bundle.degraded().is_empty());
}

#[test]
fn assets_and_json_follow_download_contract() {
    let request = PromoRequest::new(png(48, 48), "Name", "").with_screenshot(png(320, 200));
    let bundle = PromoGenerator::new(EngineConfig::default())
        .generate_all(&request)
        .expect("generate");

    let assets = bundle.assets().expect("assets");
    let names: Vec<&str> = assets.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec!["small-tile.png", "marquee.png", "screenshots/screenshot-1.png"]
    );
    assert!(assets.iter().all(|(_, bytes)| bytes.starts_with(&[0x89, b'P', b'N', b'G'])));

    let json: serde_json::Value =
        serde_json::from_str(&bundle.to_json().expect("json")).expect("parse json");
    assert_eq!(json["smallTile"], bundle.small_tile.as_data_url());
    assert_eq!(json["marqueeTile"], bundle.marquee_tile.as_data_url());
    assert_eq!(json["screenshots"][0], bundle.screenshots[0].as_data_url());
}

// ── Injected surfaces ───────────────────────────────────────────────

#[derive(Clone, Default)]
struct RecordingBackend {
    ops: Arc<Mutex<Vec<String>>>,
}

impl RecordingBackend {
    fn ops(&self) -> Vec<String> {
        self.ops.lock().expect("ops lock").clone()
    }
}

struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Arc<Mutex<Vec<String>>>,
}

impl RecordingSurface {
    fn record(&self, op: String) {
        self.ops.lock().expect("ops lock").push(op);
    }
}

impl SurfaceFactory for RecordingBackend {
    fn create_surface(&self, width: u32, height: u32) -> Result<Box<dyn Surface>, ImageError> {
        self.ops
            .lock()
            .expect("ops lock")
            .push(format!("create {}x{}", width, height));
        Ok(Box::new(RecordingSurface {
            width,
            height,
            ops: Arc::clone(&self.ops),
        }))
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, _fill: &Fill) -> Result<(), ImageError> {
        self.record(format!("fill_rect {}x{}", rect.width, rect.height));
        Ok(())
    }

    fn fill_path(
        &mut self,
        _path: &Path,
        _fill: &Fill,
        shadow: Option<&Shadow>,
    ) -> Result<(), ImageError> {
        self.record(format!("fill_path shadow={}", shadow.is_some()));
        Ok(())
    }

    fn stroke_path(&mut self, _path: &Path, _color: Color, _width: f32) -> Result<(), ImageError> {
        self.record("stroke_path".to_string());
        Ok(())
    }

    fn draw_image(&mut self, _image: &DecodedImage, dest: Rect) -> Result<(), ImageError> {
        self.record(format!(
            "draw_image {}x{} @ ({}, {})",
            dest.width, dest.height, dest.x, dest.y
        ));
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        _style: &TextStyle,
    ) -> Result<(), ImageError> {
        self.record(format!("fill_text {:?} @ ({}, {})", text, x, y));
        Ok(())
    }

    fn measure_text(&self, text: &str, _font: FontSpec) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    fn encode(&self) -> Result<EncodedImage, ImageError> {
        self.record("encode".to_string());
        Ok(EncodedImage::from_png_bytes(&[], self.width, self.height))
    }
}

struct BrokenBackend;

impl SurfaceFactory for BrokenBackend {
    fn create_surface(&self, width: u32, height: u32) -> Result<Box<dyn Surface>, ImageError> {
        Err(ImageError::Composition(format!(
            "backend unavailable for {}x{}",
            width, height
        )))
    }
}

// Always hands out a 10x10 surface regardless of the requested size
#[derive(Default)]
struct WrongSizeBackend {
    ops: Arc<Mutex<Vec<String>>>,
}

impl SurfaceFactory for WrongSizeBackend {
    fn create_surface(&self, _width: u32, _height: u32) -> Result<Box<dyn Surface>, ImageError> {
        Ok(Box::new(RecordingSurface {
            width: 10,
            height: 10,
            ops: Arc::clone(&self.ops),
        }))
    }
}

#[test]
fn small_tile_layout_is_driven_through_surface() {
    let backend = RecordingBackend::default();
    let generator = PromoGenerator::with_surfaces(EngineConfig::default(), backend.clone());
    let request = PromoRequest::new(png(256, 256), "Test Extension", "");

    generator.generate_all(&request).expect("generate");
    let ops = backend.ops();

    assert_eq!(
        &ops[..5],
        &[
            "create 440x280",
            "fill_rect 440x280",
            "draw_image 128x128 @ (156, 50)",
            "fill_text \"Test Extension\" @ (220, 208)",
            "encode",
        ]
    );
}

#[test]
fn marquee_card_state_depends_on_screenshot() {
    let empty = RecordingBackend::default();
    PromoGenerator::with_surfaces(EngineConfig::default(), empty.clone())
        .generate_all(&PromoRequest::new(png(64, 64), "Name", "Words"))
        .expect("generate");
    let ops = empty.ops();
    assert!(ops.contains(&"fill_path shadow=false".to_string()));
    assert!(ops.contains(&"stroke_path".to_string()));

    let filled = RecordingBackend::default();
    PromoGenerator::with_surfaces(EngineConfig::default(), filled.clone())
        .generate_all(&PromoRequest::new(png(64, 64), "Name", "Words").with_screenshot(png(1280, 800)))
        .expect("generate");
    let ops = filled.ops();
    assert!(ops.contains(&"fill_path shadow=true".to_string()));
    assert!(ops.contains(&"draw_image 740x462.5 @ (610, 48.75)".to_string()));
    assert!(!ops.contains(&"stroke_path".to_string()));
}

#[test]
fn long_name_is_truncated_before_drawing() {
    let backend = RecordingBackend::default();
    let generator = PromoGenerator::with_surfaces(EngineConfig::default(), backend.clone());
    let name = "An Extraordinarily Long Extension Name That Cannot Possibly Fit";

    generator
        .generate_all(&PromoRequest::new(png(64, 64), name, ""))
        .expect("generate");

    // small tile name budget is 380px, the stub measures 10px per char
    let drawn = backend
        .ops()
        .into_iter()
        .find(|op| op.starts_with("fill_text"))
        .expect("name drawn");
    assert!(drawn.contains("...\""));
    assert!(!drawn.contains(name));
}

#[test]
fn broken_backend_still_produces_fallbacks() {
    init_logger();
    let generator = PromoGenerator::with_surfaces(EngineConfig::default(), BrokenBackend);
    let request = PromoRequest::new(png(64, 64), "Name", "").with_screenshot(png(100, 100));

    let bundle = generator.generate_all(&request).expect("generate");

    assert_eq!(
        bundle.degraded(),
        &[
            OutputSlot::SmallTile,
            OutputSlot::Marquee,
            OutputSlot::Screenshot(0)
        ]
    );
    assert_eq!(decoded_dimensions(&bundle.small_tile), (440, 280));
    assert_eq!(decoded_dimensions(&bundle.marquee_tile), (1400, 560));
    assert_eq!(decoded_dimensions(&bundle.screenshots[0]), (1280, 800));
}

#[test]
fn wrong_size_surface_falls_back_to_store_dimensions() {
    init_logger();
    let generator =
        PromoGenerator::with_surfaces(EngineConfig::default(), WrongSizeBackend::default());
    let request = PromoRequest::new(png(64, 64), "Name", "").with_screenshot(png(100, 100));

    let bundle = generator.generate_all(&request).expect("generate");

    assert_eq!(
        bundle.degraded(),
        &[
            OutputSlot::SmallTile,
            OutputSlot::Marquee,
            OutputSlot::Screenshot(0)
        ]
    );
    assert_eq!(decoded_dimensions(&bundle.small_tile), (440, 280));
    assert_eq!(decoded_dimensions(&bundle.marquee_tile), (1400, 560));
    assert_eq!(decoded_dimensions(&bundle.screenshots[0]), (1280, 800));
}
