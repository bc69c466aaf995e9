use chrono::{FixedOffset, TimeZone};
use rx_label::layout::{plan, Field};
use rx_label::{
    render, Font, FontRole, FontSpec, Info, LabelContent, LabelError, LayoutVariant,
    OverflowPolicy, RenderConfig,
};

fn scenario() -> LabelContent {
    LabelContent::builder()
        .patient_name("Jane Doe")
        .medication_name("Amoxicillin")
        .dose("500 mg")
        .dispense_amount(30.0)
        .sig("Take one capsule twice daily")
        .code_payload("https://example.com/medications/MED1")
        .build()
}

fn load(pdf: &[u8]) -> lopdf::Document {
    lopdf::Document::load_mem(pdf).expect("renders a readable pdf")
}

fn media_box(doc: &lopdf::Document) -> Vec<f32> {
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);
    let page_id = *pages.values().next().unwrap();
    doc.get_dictionary(page_id)
        .unwrap()
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_float().unwrap())
        .collect()
}

fn page_content(doc: &lopdf::Document) -> String {
    let page_id = *doc.get_pages().values().next().unwrap();
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}

/// The code image drawn on the page, as (width, height, grey pixels)
fn code_image(doc: &lopdf::Document) -> Option<(usize, usize, Vec<u8>)> {
    let page_id = *doc.get_pages().values().next()?;
    let page = doc.get_dictionary(page_id).ok()?;
    let resources = page.get(b"Resources").ok()?.as_dict().ok()?;
    let xobjects = resources.get(b"XObject").ok()?.as_dict().ok()?;
    let image_ref = xobjects.get(b"I0").ok()?.as_reference().ok()?;
    let stream = doc.get_object(image_ref).ok()?.as_stream().ok()?;
    let width = stream.dict.get(b"Width").ok()?.as_i64().ok()? as usize;
    let height = stream.dict.get(b"Height").ok()?.as_i64().ok()? as usize;
    // lopdf won't decode image streams itself
    let pixels = miniz_oxide::inflate::decompress_to_vec_zlib(&stream.content).ok()?;
    Some((width, height, pixels))
}

#[test]
fn scenario_renders_a_two_by_one_inch_page() {
    let pdf = render(&scenario(), &RenderConfig::default()).unwrap();
    let doc = load(&pdf);
    assert_eq!(media_box(&doc), vec![0.0, 0.0, 288.0, 144.0]);
    assert!(page_content(&doc).contains("/I0 Do"));

    let plan = plan(&scenario(), &RenderConfig::default());
    assert_eq!(
        plan.fields(),
        vec![
            Field::PatientName,
            Field::Medication,
            Field::Sig,
            Field::PharmacyIdentifier
        ]
    );
}

#[test]
fn embedded_code_decodes_to_the_payload() {
    let pdf = render(&scenario(), &RenderConfig::default()).unwrap();
    let (width, height, pixels) = code_image(&load(&pdf)).expect("code image is present");
    assert_eq!(pixels.len(), width * height);

    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| pixels[y * width + x]);
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1);
    let (_, decoded) = grids[0].decode().unwrap();
    assert_eq!(decoded, "https://example.com/medications/MED1");
}

#[test]
fn rendering_is_deterministic() {
    let mut config = RenderConfig::rich(300.0);
    let mut info = Info::new();
    info.title("Amoxicillin").creation_date(
        FixedOffset::east_opt(-5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, 9, 30, 0)
            .unwrap(),
    );
    config.info = Some(info);

    let a = render(&scenario(), &config).unwrap();
    let b = render(&scenario(), &config).unwrap();
    assert_eq!(a, b);
    assert!(String::from_utf8_lossy(&a).contains("D:20240301093000"));
}

#[test]
fn page_size_tracks_dpi() {
    for (dpi, width, height) in [(72.0, 144.0, 72.0), (300.0, 600.0, 300.0)] {
        let pdf = render(&scenario(), &RenderConfig::simple(dpi)).unwrap();
        assert_eq!(media_box(&load(&pdf)), vec![0.0, 0.0, width, height]);
    }
}

#[test]
fn missing_code_leaves_the_zone_blank() {
    let mut content = scenario();
    content.code_payload = None;
    let pdf = render(&content, &RenderConfig::default()).unwrap();
    let doc = load(&pdf);
    assert!(!page_content(&doc).contains(" Do"));
    assert!(code_image(&doc).is_none());
}

#[test]
fn broken_code_image_still_renders() {
    let mut content = scenario();
    content.code_image = Some(vec![0x89, b'P', b'N', b'G', 0, 0]);
    content.code_payload = None;
    let pdf = render(&content, &RenderConfig::default()).unwrap();
    assert_eq!(media_box(&load(&pdf)), vec![0.0, 0.0, 288.0, 144.0]);
}

#[test]
fn invalid_dpi_is_an_error() {
    assert!(matches!(
        render(&scenario(), &RenderConfig::simple(0.0)),
        Err(LabelError::InvalidDpi(_))
    ));
    assert!(scenario().generate_pdf_label(f32::NAN).is_none());
    assert!(scenario().generate_pdf_label(144.0).is_some());
}

#[test]
fn overflow_policies() {
    let mut content = scenario();
    content.sig = lipsum::lipsum(200);

    let mut config = RenderConfig::default();
    config.overflow = OverflowPolicy::Fail;
    assert!(matches!(
        render(&content, &config),
        Err(LabelError::Overflow { .. })
    ));

    config.overflow = OverflowPolicy::Clip;
    let clipped = render(&content, &config).unwrap();
    assert!(page_content(&load(&clipped)).contains("re W n"));

    config.overflow = OverflowPolicy::Shrink;
    let shrunk = render(&content, &config).unwrap();
    assert_eq!(media_box(&load(&shrunk)), vec![0.0, 0.0, 288.0, 144.0]);
}

#[test]
fn fitting_text_is_not_clipped() {
    let pdf = render(&scenario(), &RenderConfig::default()).unwrap();
    assert!(!page_content(&load(&pdf)).contains("re W n"));
}

#[test]
fn rich_labels_use_their_own_fonts() {
    let content = LabelContent::builder()
        .patient_name("Doe, Jane")
        .medication_name("Amoxicillin")
        .dispense_amount(30.0)
        .sig("Take one twice daily")
        .pharmacy_name("Beaker")
        .build();
    let pdf = render(&content, &RenderConfig::rich(300.0)).unwrap();
    let text = String::from_utf8_lossy(&pdf);
    assert!(text.contains("/Courier"));
    assert!(text.contains("/Helvetica-Bold"));
    assert!(text.contains("/WinAnsiEncoding"));
}

#[test]
fn renders_from_toml_config() {
    let config = RenderConfig::from_toml_str(
        r#"
        dpi = 72
        variant = "rich"
        overflow = "clip"
        "#,
    )
    .unwrap();
    assert_eq!(config.variant, LayoutVariant::Rich);
    let pdf = render(&scenario(), &config).unwrap();
    assert_eq!(media_box(&load(&pdf)), vec![0.0, 0.0, 144.0, 72.0]);
}

#[test]
fn inputs_can_be_shared_between_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<LabelContent>();
    assert_send_sync::<RenderConfig>();

    let config = std::sync::Arc::new(RenderConfig::default());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let config = config.clone();
            std::thread::spawn(move || render(&scenario(), &config).unwrap())
        })
        .collect();
    let outputs: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(outputs.windows(2).all(|pair| pair[0] == pair[1]));
}

fn serif_config() -> RenderConfig {
    let font = Font::load(include_bytes!("fonts/DejaVuSerif.ttf").to_vec()).unwrap();
    let mut config = RenderConfig::default();
    let cap = config.fonts.get(FontRole::PatientName).cap;
    let ratio = config.fonts.get(FontRole::PatientName).ratio;
    config.fonts.set(FontRole::PatientName, FontSpec::new(font, *cap, ratio));
    config
}

#[test]
fn embedded_fonts_keep_their_text_extractable() {
    let mut content = scenario();
    content.patient_name = "Doe, Jane".to_string();
    let pdf = render(&content, &serif_config()).unwrap();
    let text = String::from_utf8_lossy(&pdf);
    assert!(text.contains("/Identity-H"));
    assert!(text.contains("/FontFile2"));

    let doc = load(&pdf);
    let extracted = doc.extract_text(&[1]).unwrap();
    assert!(extracted.contains("Doe, Jane"), "{extracted:?}");
}

#[test]
fn embedded_font_unicode_map_is_utf16() {
    let pdf = render(&scenario(), &serif_config()).unwrap();
    let doc = load(&pdf);
    let cmap = doc
        .objects
        .values()
        .filter_map(|object| object.as_stream().ok())
        .filter_map(|stream| miniz_oxide::inflate::decompress_to_vec_zlib(&stream.content).ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .find(|content| content.contains("beginbfchar"))
        .expect("font has a unicode map");

    let destinations: Vec<&str> = cmap
        .lines()
        .filter_map(|line| line.strip_prefix('<'))
        .filter_map(|line| line.split_once("> <"))
        .map(|(_, dest)| dest.trim_end_matches('>'))
        .collect();
    assert!(!destinations.is_empty());
    assert!(destinations.iter().all(|d| d.len() == 4 || d.len() == 8));
}
